//! Shared output formatting for validation reports.

use anyhow::Result;
use rulebook::ValidationReport;

use crate::OutputFormat;

/// Print a validation report in the specified format.
pub fn print(report: &ValidationReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn print_text(report: &ValidationReport) {
    print!("{}", report.format_findings());

    let (errors, warnings) = report.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!("{summary_color}{}\x1b[0m", report.status_line());
}

fn print_json(report: &ValidationReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &ValidationReport) {
    for v in &report.violations {
        let line = v.location.line.map(|l| format!(":{l}")).unwrap_or_default();
        println!(
            "{}{line}: {} [{}] {}",
            v.location.file.display(),
            v.severity,
            v.code,
            v.message,
        );
    }
    println!("{}", report.status_line());
}
