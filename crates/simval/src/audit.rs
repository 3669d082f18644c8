//! Audit trail of every comparison made by the assertion façade.

use std::fs;
use std::path::Path;

use simval_core::Comparison;

use crate::error::{Result, SimvalError};

#[derive(Debug, Clone, Default)]
pub struct AuditTrail {
    records: Vec<Comparison>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, comparison: Comparison) {
        self.records.push(comparison);
    }

    pub fn records(&self) -> &[Comparison] {
        &self.records
    }

    pub fn failures(&self) -> impl Iterator<Item = &Comparison> {
        self.records.iter().filter(|r| !r.passed)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One JSON object per line, in the order the comparisons ran.
    pub fn to_jsonl(&self) -> Result<String> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_jsonl()?).map_err(|source| SimvalError::io(path, source))
    }
}
