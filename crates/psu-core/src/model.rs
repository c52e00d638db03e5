use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
    /// The run itself produced no results (empty report, runner could not start).
    Broken,
}

impl TestStatus {
    /// Fail and Broken both count against the change under review.
    pub fn is_failure(self) -> bool {
        matches!(self, TestStatus::Fail | TestStatus::Broken)
    }

    pub fn label(self) -> &'static str {
        match self {
            TestStatus::Pass => "PASS",
            TestStatus::Fail => "FAIL",
            TestStatus::Skip => "SKIP",
            TestStatus::Broken => "BROKEN",
        }
    }
}
