//! Integration tests for `SummaryProvider`: reference resolution, cached
//! reads and regeneration through the driver seam.

mod common;

use std::fs;

use common::{FakeDriver, GRID_SS_SUMMARY, Workspace};
use serial_test::serial;
use simval::{ErrorKind, SimulationRef, SimvalError, SummaryProvider};

// ── Cached reads ─────────────────────────────────────────────────────────────

#[test]
#[serial(simval_workdir)]
fn cached_reads_are_idempotent_and_never_run_the_driver() {
    let ws = Workspace::new();
    ws.touch("Group15_Grid_SS.sim");
    ws.cache_summary("Group15_Grid_SS.sim", GRID_SS_SUMMARY);

    let provider = SummaryProvider::with_driver(ws.config.clone(), FakeDriver::silent());
    for reference in [SimulationRef::ByGroupId(15), SimulationRef::path("Group15_Grid_SS.sim")] {
        let first = provider.get(&reference, false).unwrap();
        let second = provider.get(&reference, false).unwrap();
        assert_eq!(first, GRID_SS_SUMMARY);
        assert_eq!(first, second);
    }
    assert_eq!(provider.driver().calls(), 0);
}

#[test]
fn missing_artifact_is_not_found() {
    let ws = Workspace::new();
    ws.touch("Group1_A.sim");

    let provider = SummaryProvider::with_driver(ws.config.clone(), FakeDriver::silent());
    let err = provider.get(&SimulationRef::path("Group1_A.sim"), false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(err, SimvalError::ArtifactNotFound { .. }));
    assert_eq!(provider.driver().calls(), 0);
}

#[test]
fn resolve_names_the_artifact_after_the_simulation() {
    let ws = Workspace::new();
    let provider = SummaryProvider::with_driver(ws.config.clone(), FakeDriver::silent());
    let artifact = provider.resolve(&SimulationRef::path("Group7_Run_DES.sim")).unwrap();
    assert_eq!(artifact, ws.root().join("Summary_Group7_Run_DES.ref"));
}

// ── Group id resolution ──────────────────────────────────────────────────────

#[test]
#[serial(simval_workdir)]
fn group_id_picks_the_latest_simulation() {
    let ws = Workspace::new();
    let files = ws.simulations(&["Group15_1_SS.sim", "Group15_2_Mid.sim", "Group15_3_DES.sim"]);
    ws.touch("Group15_pic.png");
    ws.touch("Group150_Other.sim");

    let listed = simval::simulations(&ws.config, 15).unwrap();
    assert_eq!(listed, files);

    let provider = SummaryProvider::with_driver(ws.config.clone(), FakeDriver::silent());
    let artifact = provider.resolve(&SimulationRef::ByGroupId(15)).unwrap();
    assert_eq!(artifact, ws.root().join("Summary_Group15_3_DES.ref"));
}

#[test]
#[serial(simval_workdir)]
fn unknown_group_is_not_found_and_restores_workdir() {
    let ws = Workspace::new();
    let before = std::env::current_dir().unwrap();

    let provider = SummaryProvider::with_driver(ws.config.clone(), FakeDriver::silent());
    let err = provider.get(&SimulationRef::ByGroupId(4), false).unwrap_err();
    assert!(matches!(err, SimvalError::SimulationNotFound { .. }));
    assert!(err.to_string().contains("\"Group4_*.sim\""));
    assert_eq!(std::env::current_dir().unwrap(), before);
}

// ── Regeneration ─────────────────────────────────────────────────────────────

#[test]
fn overwrite_replaces_the_cached_summary() {
    let ws = Workspace::new().with_macro();
    let sim = ws.touch("Group15_Grid_SS.sim");
    ws.cache_summary("Group15_Grid_SS.sim", "Cell Count: 1\n");

    let provider =
        SummaryProvider::with_driver(ws.config.clone(), FakeDriver::writing(GRID_SS_SUMMARY));
    let reference = SimulationRef::path("Group15_Grid_SS.sim");

    let text = provider.get(&reference, true).unwrap();
    assert_eq!(text, GRID_SS_SUMMARY);
    assert_eq!(provider.driver().calls(), 1);

    let requests = provider.driver().requests();
    assert_eq!(requests[0].sim_file, sim);
    assert_eq!(requests[0].macro_file, ws.root().join("WriteSummaryTest.java"));
    assert_eq!(requests[0].workers, 1);
    assert_eq!(requests[0].work_dir, ws.root());

    // Later cached reads see the regenerated text.
    assert_eq!(provider.get(&reference, false).unwrap(), GRID_SS_SUMMARY);
    assert_eq!(provider.driver().calls(), 1);
}

#[test]
fn artifact_missing_after_driver_is_generation_failure() {
    let ws = Workspace::new().with_macro();
    ws.touch("Group2_A.sim");
    let stale = ws.cache_summary("Group2_A.sim", "Cell Count: 1\n");

    let provider = SummaryProvider::with_driver(ws.config.clone(), FakeDriver::silent());
    let err = provider.get(&SimulationRef::path("Group2_A.sim"), true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GenerationFailed);
    assert!(!stale.exists(), "stale summary is deleted before regeneration");
}

#[test]
fn nonzero_exit_still_succeeds_when_the_artifact_exists() {
    let ws = Workspace::new().with_macro();
    ws.touch("Group2_A.sim");

    let driver = FakeDriver::writing("Iteration: 5\n").with_exit_code(3);
    let provider = SummaryProvider::with_driver(ws.config.clone(), driver);
    let text = provider.get(&SimulationRef::path("Group2_A.sim"), true).unwrap();
    assert_eq!(text, "Iteration: 5\n");
}

#[test]
fn missing_macro_is_not_found() {
    let ws = Workspace::new();
    ws.touch("Group2_A.sim");

    let provider =
        SummaryProvider::with_driver(ws.config.clone(), FakeDriver::writing(GRID_SS_SUMMARY));
    let err = provider.get(&SimulationRef::path("Group2_A.sim"), true).unwrap_err();
    assert!(matches!(err, SimvalError::MacroNotFound { .. }));
    assert_eq!(provider.driver().calls(), 0);
}

#[test]
fn regenerating_a_missing_simulation_is_not_found() {
    let ws = Workspace::new().with_macro();
    let provider =
        SummaryProvider::with_driver(ws.config.clone(), FakeDriver::writing(GRID_SS_SUMMARY));
    let err = provider.get(&SimulationRef::path("Group9_Gone.sim"), true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(provider.driver().calls(), 0);
}

#[test]
fn simulation_in_subdirectory_keeps_its_summary_alongside() {
    let ws = Workspace::new().with_macro();
    ws.touch("runs/Group3_B.sim");

    let provider =
        SummaryProvider::with_driver(ws.config.clone(), FakeDriver::writing("Time: 1\n"));
    provider.get(&SimulationRef::path("runs/Group3_B.sim"), true).unwrap();
    let written = fs::read_to_string(ws.root().join("runs/Summary_Group3_B.ref")).unwrap();
    assert_eq!(written, "Time: 1\n");
}

// ── Usage errors ─────────────────────────────────────────────────────────────

#[test]
fn both_group_and_path_is_rejected_before_any_io() {
    let err = SimulationRef::from_parts(Some(15), Some("Group15_Grid_SS.sim".into())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);
}
