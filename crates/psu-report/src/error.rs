use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Non-empty runner output that is not a JUnit document. Fatal for the batch.
    #[error(
        "runner output is not a well-formed JUnit report ({reason}, near byte {position}); \
         it probably means the spec runner failed before writing its report. \
         Re-run with `psu run --trace` and run the logged runner command yourself to see why"
    )]
    Malformed { position: u64, reason: String },
}

impl ReportError {
    pub(crate) fn malformed(position: u64, reason: impl std::fmt::Display) -> Self {
        ReportError::Malformed { position, reason: reason.to_string() }
    }
}
