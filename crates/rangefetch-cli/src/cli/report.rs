//! Human-readable summary lines for a finished run.

use rangefetch_core::VerificationReport;

/// Total, both digests and the verdict, one per line.
pub fn summary_lines(report: &VerificationReport) -> Vec<String> {
    vec![
        format!("total received: {} bytes", report.received),
        format!("computed sha256: {}", report.computed),
        format!("expected sha256: {}", report.expected),
        format!("verdict: {}", report.verdict),
    ]
}

pub fn early_end_line(report: &VerificationReport) -> String {
    format!(
        "server returned no more data after {}/{} bytes; verifying what was received",
        report.received, report.total_bytes
    )
}
