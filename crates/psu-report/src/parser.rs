use psu_core::{ReportBatch, TestOutcome, TestStatus};
use tracing::debug;

use crate::error::ReportError;
use crate::junit::{read_cases, Failure, JunitCase};

/// Name given to the synthetic outcome of a run that printed nothing.
pub const DEFAULT_BROKEN_NAME: &str = "Tests";

/// Turns one runner invocation's output into outcomes.
#[derive(Clone, Debug, Default)]
pub struct JunitReportParser {
    name: Option<String>,
    stderr: String,
}

impl JunitReportParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifies the invocation (usually the spec path) when it breaks.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    /// Empty output becomes a single Broken outcome carrying stderr;
    /// anything else must be a well-formed JUnit document.
    pub fn parse(&self, stdout: &str) -> Result<ReportBatch, ReportError> {
        if stdout.trim().is_empty() {
            let name = self.name.as_deref().unwrap_or(DEFAULT_BROKEN_NAME);
            debug!(name, "empty report");
            return Ok(vec![TestOutcome::broken(name, self.stderr.clone())]);
        }

        let cases = read_cases(stdout)?;
        debug!(cases = cases.len(), "parsed report");
        Ok(cases.into_iter().map(normalize_case).collect())
    }
}

pub fn parse_report(stdout: &str, stderr: &str) -> Result<ReportBatch, ReportError> {
    JunitReportParser::new().with_stderr(stderr).parse(stdout)
}

/// `"{type}: {message}"`. With neither field present there is nothing to
/// say and the detail is empty.
pub fn failure_detail(failure: &Failure) -> String {
    match (failure.kind.as_deref(), failure.message.as_deref()) {
        (None, None) => String::new(),
        (kind, message) => format!("{}: {}", kind.unwrap_or_default(), message.unwrap_or_default()),
    }
}

fn normalize_case(case: JunitCase) -> TestOutcome {
    let name = format!("{}: {}", case.suite, case.name);
    let duration = parse_seconds(case.time.as_deref());
    match case.status.as_deref() {
        Some("passed") => TestOutcome::new(name, TestStatus::Pass, duration),
        Some("skipped") => TestOutcome::new(name, TestStatus::Skip, duration),
        _ => {
            let detail = case.failure.as_ref().map(failure_detail).unwrap_or_default();
            TestOutcome::new(name, TestStatus::Fail, duration).with_detail(detail)
        }
    }
}

fn parse_seconds(time: Option<&str>) -> f64 {
    time.and_then(|t| t.trim().parse::<f64>().ok()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(cases: &str) -> String {
        format!(r#"<?xml version="1.0" encoding="UTF-8" ?><testsuites><testsuite name="Calc">{cases}</testsuite></testsuites>"#)
    }

    #[test]
    fn passed_case() {
        let batch = parse_report(&report(r#"<testcase name="adds numbers" status="passed" time="0.01"/>"#), "").unwrap();
        assert_eq!(batch, vec![TestOutcome::new("Calc: adds numbers", TestStatus::Pass, 0.01)]);
    }

    #[test]
    fn empty_output_is_broken() {
        let batch = parse_report("", "fatal error: syntax").unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].status, TestStatus::Broken);
        assert_eq!(batch[0].name, DEFAULT_BROKEN_NAME);
        assert_eq!(batch[0].duration, 0.0);
        assert_eq!(batch[0].detail.as_deref(), Some("fatal error: syntax"));
    }

    #[test]
    fn whitespace_output_is_broken_and_named() {
        let batch = JunitReportParser::new()
            .with_name("/proj/spec/CalcSpec.php")
            .with_stderr("segfault")
            .parse("\n  \n")
            .unwrap();
        assert_eq!(batch[0].name, "/proj/spec/CalcSpec.php");
        assert_eq!(batch[0].status, TestStatus::Broken);
    }

    #[test]
    fn failed_case_detail() {
        let xml = report(
            r#"<testcase name="rejects" status="failed" time="0.2"><failure type="InvalidArgumentException" message="bad input"/></testcase>"#,
        );
        let batch = parse_report(&xml, "").unwrap();
        assert_eq!(batch[0].status, TestStatus::Fail);
        assert_eq!(batch[0].detail.as_deref(), Some("InvalidArgumentException: bad input"));
        assert_eq!(batch[0].duration, 0.2);
    }

    #[test]
    fn broken_case_uses_error_element() {
        let xml = report(r#"<testcase name="x" status="broken"><error type="TypeError" message="oops"/></testcase>"#);
        let batch = parse_report(&xml, "").unwrap();
        assert_eq!(batch[0].status, TestStatus::Fail);
        assert_eq!(batch[0].detail.as_deref(), Some("TypeError: oops"));
    }

    #[test]
    fn skipped_case() {
        let batch = parse_report(&report(r#"<testcase name="later" status="skipped" time="0"><skipped/></testcase>"#), "").unwrap();
        assert_eq!(batch[0].status, TestStatus::Skip);
        assert_eq!(batch[0].detail, None);
    }

    #[test]
    fn missing_failure_element_gives_empty_detail() {
        let batch = parse_report(&report(r#"<testcase name="odd" status="failed"/>"#), "").unwrap();
        assert_eq!(batch[0].status, TestStatus::Fail);
        assert_eq!(batch[0].detail.as_deref(), Some(""));
    }

    #[test]
    fn absent_status_is_fail() {
        let batch = parse_report(&report(r#"<testcase name="n"/>"#), "").unwrap();
        assert_eq!(batch[0].status, TestStatus::Fail);
    }

    #[test]
    fn bad_time_defaults_to_zero() {
        let batch = parse_report(
            &report(r#"<testcase name="a" status="passed" time="fast"/><testcase name="b" status="passed" time="-3"/>"#),
            "",
        )
        .unwrap();
        assert_eq!(batch[0].duration, 0.0);
        assert_eq!(batch[1].duration, 0.0);
    }

    #[test]
    fn not_xml_is_fatal() {
        let err = parse_report("not xml", "").unwrap_err();
        assert!(err.to_string().contains("--trace"));
    }

    #[test]
    fn detail_with_one_field() {
        assert_eq!(failure_detail(&Failure { kind: Some("E".into()), message: None }), "E: ");
        assert_eq!(failure_detail(&Failure::default()), "");
    }

    #[test]
    fn document_order_is_kept() {
        let xml = r#"<testsuites>
            <testsuite name="B"><testcase name="2" status="passed"/><testcase name="1" status="passed"/></testsuite>
            <testsuite name="A"><testcase name="3" status="skipped"/></testsuite>
        </testsuites>"#;
        let names: Vec<String> = parse_report(xml, "").unwrap().into_iter().map(|o| o.name).collect();
        assert_eq!(names, vec!["B: 2", "B: 1", "A: 3"]);
    }
}
