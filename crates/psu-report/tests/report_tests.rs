use std::path::Path;

use psu_core::{Summary, TestStatus};
use psu_report::{parse_report, JunitReportParser, ReportError};

fn fixture(name: &str) -> String {
    let p = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    std::fs::read_to_string(p).unwrap()
}

#[test]
fn test_phpspec_mixed_report() {
    let batch = parse_report(&fixture("phpspec_mixed.xml"), "").unwrap();
    let statuses: Vec<TestStatus> = batch.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![TestStatus::Pass, TestStatus::Fail, TestStatus::Fail, TestStatus::Fail, TestStatus::Pass]
    );

    assert_eq!(batch[0].name, r"spec\Acme\Billing\InvoiceSpec: it is initializable");
    assert_eq!(
        batch[1].detail.as_deref(),
        Some("PhpSpec\\Exception\\Example\\FailureException: expected [integer:120], but got [integer:100].")
    );
    assert_eq!(batch[2].detail.as_deref(), Some("TypeError: Argument #1 ($qty) must be of type int, string given"));
    // "pending" is neither passed nor skipped
    assert_eq!(batch[3].detail.as_deref(), Some(""));
    assert_eq!(batch[4].name, r"spec\Acme\Billing\MoneySpec: it adds amounts & currencies");

    let summary = Summary::from_outcomes(&batch);
    assert_eq!((summary.passed, summary.failed), (2, 3));
    assert!(batch.iter().all(|o| o.duration >= 0.0));
}

#[test]
fn test_runner_crash_output_is_fatal() {
    let stdout = "PHP Fatal error:  Uncaught Error: Class \"Acme\\Calc\" not found in /proj/spec/CalcSpec.php:12";
    let err = JunitReportParser::new().with_name("/proj/spec/CalcSpec.php").parse(stdout).unwrap_err();
    assert!(matches!(err, ReportError::Malformed { .. }));
}

#[test]
fn test_truncated_report_is_fatal() {
    let full = fixture("phpspec_mixed.xml");
    let truncated = &full[..full.len() / 2];
    assert!(parse_report(truncated, "").is_err());
}
