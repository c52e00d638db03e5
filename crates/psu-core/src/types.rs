use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::TestStatus;

/// One normalized test result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Suite-qualified name, `"<suite>: <case>"`.
    pub name: String,
    pub status: TestStatus,
    /// Seconds, never negative.
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl TestOutcome {
    pub fn new(name: impl Into<String>, status: TestStatus, duration: f64) -> Self {
        Self {
            name: name.into(),
            status,
            duration: clamp_duration(duration),
            detail: None,
        }
    }

    /// Synthetic outcome for a run that produced no report.
    pub fn broken(name: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Broken,
            duration: 0.0,
            detail: Some(stderr.into()),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Outcomes of a single runner invocation, in report order.
pub type ReportBatch = Vec<TestOutcome>;

/// A changed source file paired with the spec file that exercises it.
/// For a source file that is itself a spec, both paths are the same.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedTest {
    pub source: PathBuf,
    pub spec: PathBuf,
}

fn clamp_duration(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 {
        secs
    } else {
        0.0
    }
}
