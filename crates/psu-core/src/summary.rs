use serde::Serialize;

use crate::{TestOutcome, TestStatus};

/// Per-status tally over a merged result set.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub broken: usize,
    pub duration: f64,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[TestOutcome]) -> Self {
        let mut s = Summary::default();
        for o in outcomes {
            match o.status {
                TestStatus::Pass => s.passed += 1,
                TestStatus::Fail => s.failed += 1,
                TestStatus::Skip => s.skipped += 1,
                TestStatus::Broken => s.broken += 1,
            }
            s.duration += o.duration;
        }
        s
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.broken
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.broken > 0
    }
}
