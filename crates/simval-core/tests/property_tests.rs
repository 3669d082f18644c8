//! Property-based tests for the tolerance comparator and extractor.

use proptest::prelude::*;
use simval_core::{
    CheckError, Pattern, ToleranceMode, TolerancePolicy, compare, extract, extract_int,
};

// ── Strategies ──────────────────────────────────────────────────────────────

fn arb_value() -> impl Strategy<Value = f64> {
    prop_oneof![(-1.0e6..1.0e6f64), (-1.0..1.0f64), Just(0.0)]
}

fn arb_nonzero() -> impl Strategy<Value = f64> {
    arb_value().prop_filter("nonzero", |v| *v != 0.0)
}

// ── Property tests ───────────────────────────────────────────────────────────

proptest! {
    /// Identical values always pass, whatever the requested relative threshold.
    #[test]
    fn equal_values_pass_in_absolute_mode(value in arb_nonzero(), tolerance in 0.0..1.0f64) {
        let record = compare("p", value, value, TolerancePolicy::relative(tolerance)).unwrap();
        prop_assert_eq!(record.mode, ToleranceMode::Absolute);
        prop_assert!(record.passed);
    }

    /// A zero baseline forces absolute mode for the comparison.
    #[test]
    fn zero_expected_forces_absolute(actual in arb_value(), tolerance in 0.0..1.0f64) {
        let record = compare("p", actual, 0.0, TolerancePolicy::relative(tolerance)).unwrap();
        prop_assert_eq!(record.mode, ToleranceMode::Absolute);
        prop_assert_eq!(record.passed, actual.abs() <= tolerance);
    }

    /// A zero baseline still rejects a negative threshold.
    #[test]
    fn zero_expected_rejects_negative_tolerance(
        actual in arb_value(),
        tolerance in -1.0..-1e-9f64,
    ) {
        let err = compare("p", actual, 0.0, TolerancePolicy::relative(tolerance)).unwrap_err();
        let is_invalid = matches!(err, CheckError::InvalidTolerance { .. });
        prop_assert!(is_invalid);
    }

    /// Relative mode that stays relative rejects any non-positive threshold.
    #[test]
    fn relative_rejects_non_positive_tolerance(
        expected in arb_nonzero(),
        delta in 1e-3..1e3f64,
        tolerance in -1.0..=0.0f64,
    ) {
        let err = compare("p", expected + delta, expected, TolerancePolicy::relative(tolerance))
            .unwrap_err();
        let is_invalid =
            matches!(err, CheckError::InvalidTolerance { mode: ToleranceMode::Relative, .. });
        prop_assert!(is_invalid);
    }

    /// Absolute mode rejects every negative threshold.
    #[test]
    fn absolute_rejects_negative_tolerance(
        actual in arb_value(),
        expected in arb_value(),
        tolerance in -1.0e3..-1e-9f64,
    ) {
        let err = compare("p", actual, expected, TolerancePolicy::absolute(tolerance)).unwrap_err();
        let is_invalid =
            matches!(err, CheckError::InvalidTolerance { mode: ToleranceMode::Absolute, .. });
        prop_assert!(is_invalid);
    }

    /// Relative verdicts agree with |actual - expected| <= tolerance * |expected|.
    #[test]
    fn relative_verdict_matches_scaled_bound(
        expected in arb_nonzero(),
        actual in arb_value(),
        tolerance in 1e-4..0.5f64,
    ) {
        let record = compare("p", actual, expected, TolerancePolicy::relative(tolerance)).unwrap();
        if record.mode == ToleranceMode::Relative {
            let normalized = (actual - expected) / expected;
            prop_assert_eq!(record.passed, normalized.abs() <= tolerance);
        }
    }

    /// Integer counts survive a trip through report text.
    #[test]
    fn count_lines_extract_exactly(key in "(Cell|Face|Vertex)", count in 0u32..10_000_000) {
        let text = format!("Header\n{key} Count: {count}\nTrailer\n");
        prop_assert_eq!(extract_int(&Pattern::count(key), &text).unwrap(), i64::from(count));
    }

    /// Report names with punctuation are matched literally.
    #[test]
    fn report_names_match_literally(
        name in "[A-Za-z][A-Za-z +().-]{0,20}",
        value in -1.0e3..1.0e3f64,
    ) {
        let text = format!("Report -> {name}: {value}\n");
        prop_assert_eq!(extract(&Pattern::report(name.clone()), &text).unwrap(), value);
    }
}
