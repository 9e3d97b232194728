use crate::analyzer::{Confidence, Diagnostic};
use crate::commands::{FileFailure, FixSummary, ScanReport};
use crate::constants::{DIAGNOSTIC_ID, DIAGNOSTIC_TITLE};
use crate::utils::normalize_display_path;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Print the exclusion list in styled format.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_exclusion_list(writer: &mut impl Write, folders: &[String]) -> std::io::Result<()> {
    if folders.is_empty() {
        let defaults = crate::constants::DEFAULT_EXCLUDE_FOLDERS();
        let mut sorted_defaults: Vec<&str> = defaults.iter().copied().collect();
        sorted_defaults.sort_unstable();
        writeln!(
            writer,
            "{} {}",
            "[OK] Using default exclusions only:".green(),
            sorted_defaults.join(", ").dimmed()
        )?;
    } else {
        writeln!(writer, "{} {}", "Excluding:".yellow().bold(), folders.join(", "))?;
    }
    Ok(())
}

/// Create a progress bar with file count.
///
/// Hidden in test builds and when `hidden` is set (machine formats, quiet).
#[must_use]
pub fn create_progress_bar(total_files: u64, hidden: bool) -> ProgressBar {
    if cfg!(test) || hidden {
        return ProgressBar::hidden();
    }

    let pb =
        ProgressBar::with_draw_target(Some(total_files), ProgressDrawTarget::stderr_with_hz(20));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message("scanning...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print the main header with box-drawing characters.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_header(writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "╔════════════════════════════════════════╗".cyan())?;
    writeln!(writer, "{}", "║  DebuggerStepThrough Scan Results      ║".cyan().bold())?;
    writeln!(writer, "{}", "╚════════════════════════════════════════╝".cyan())?;
    writeln!(writer)?;
    Ok(())
}

fn create_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

fn confidence_label(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "",
        Confidence::Low => " (name match only)",
    }
}

/// One diagnostic as `path:line:col: warning ID: message`.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_diagnostic(
    writer: &mut impl Write,
    file: &Path,
    diagnostic: &Diagnostic,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "{}:{}:{}: {} {}: {}{}",
        normalize_display_path(file).bold(),
        diagnostic.location.line,
        diagnostic.location.column,
        diagnostic.severity.to_string().yellow(),
        diagnostic.id.dimmed(),
        diagnostic.message,
        confidence_label(diagnostic.confidence).dimmed()
    )
}

/// Print every diagnostic, grouped by file in path order.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_report(writer: &mut impl Write, report: &ScanReport) -> std::io::Result<()> {
    print_header(writer)?;

    if report.diagnostic_count() == 0 {
        writeln!(writer, "{}", "✓ All clean! No DebuggerStepThrough attributes found.".green())?;
    }

    for file in report.files_with_diagnostics() {
        for diagnostic in &file.diagnostics {
            print_diagnostic(writer, &file.file, diagnostic)?;
        }
    }

    print_failures(writer, "Unreadable Files", &report.failures)?;
    Ok(())
}

/// Print files that could not be processed.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_failures(
    writer: &mut impl Write,
    title: &str,
    failures: &[FileFailure],
) -> std::io::Result<()> {
    if failures.is_empty() {
        return Ok(());
    }

    writeln!(writer, "\n{}", title.bold().underline().red())?;
    let mut table = create_table(vec!["File", "Error"]);
    for failure in failures {
        table.add_row(vec![
            Cell::new(normalize_display_path(&failure.file)).add_attribute(Attribute::Bold),
            Cell::new(&failure.error).fg(Color::Red),
        ]);
    }
    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print the summary table.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_summary(
    writer: &mut impl Write,
    report: &ScanReport,
    fix: Option<&FixSummary>,
) -> std::io::Result<()> {
    let count_cell = |count: usize, bad: bool| {
        let cell = Cell::new(count);
        if count > 0 && bad {
            cell.fg(Color::Red).add_attribute(Attribute::Bold)
        } else {
            cell.fg(Color::Green)
        }
    };

    writeln!(writer, "\n{}", "Summary".bold().underline())?;
    let mut table = create_table(vec!["Metric", "Count"]);
    table.add_row(vec![Cell::new("Files scanned"), Cell::new(report.files.len())]);
    table.add_row(vec![
        Cell::new("Generated files skipped"),
        Cell::new(report.skipped_generated.len()).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Files with syntax errors"),
        count_cell(report.files.iter().filter(|f| f.has_errors).count(), true),
    ]);
    table.add_row(vec![
        Cell::new("Unreadable files"),
        count_cell(report.failures.len(), true),
    ]);
    table.add_row(vec![
        Cell::new(DIAGNOSTIC_TITLE),
        count_cell(report.diagnostic_count(), true),
    ]);
    table.add_row(vec![
        Cell::new("Suppressed by #pragma"),
        Cell::new(report.suppressed_count()).add_attribute(Attribute::Dim),
    ]);
    if let Some(fix) = fix {
        table.add_row(vec![Cell::new("Removed"), count_cell(fix.written_count(), false)]);
        table.add_row(vec![
            Cell::new("Fix skipped"),
            count_cell(fix.skipped.len(), true),
        ]);
    }
    writeln!(writer, "{table}")?;
    Ok(())
}

/// Quiet mode: a one-line recap.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_report_quiet(writer: &mut impl Write, report: &ScanReport) -> std::io::Result<()> {
    writeln!(
        writer,
        "[SUMMARY] {} DebuggerStepThrough attribute(s) in {} of {} file(s)",
        report.diagnostic_count(),
        report.files_with_diagnostics().count(),
        report.files.len()
    )
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    file: String,
    #[serde(flatten)]
    diagnostic: &'a Diagnostic,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    files_scanned: usize,
    skipped_generated: usize,
    suppressed: usize,
    diagnostics: Vec<JsonDiagnostic<'a>>,
    failures: &'a [FileFailure],
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<&'a FixSummary>,
}

/// Print the whole run as one JSON document.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn print_json(
    writer: &mut impl Write,
    report: &ScanReport,
    fix: Option<&FixSummary>,
) -> anyhow::Result<()> {
    let diagnostics = report
        .files
        .iter()
        .flat_map(|file| {
            file.diagnostics.iter().map(|diagnostic| JsonDiagnostic {
                file: normalize_display_path(&file.file),
                diagnostic,
            })
        })
        .collect();
    let json = JsonReport {
        version: env!("CARGO_PKG_VERSION"),
        files_scanned: report.files.len(),
        skipped_generated: report.skipped_generated.len(),
        suppressed: report.suppressed_count(),
        diagnostics,
        failures: &report.failures,
        fix,
    };
    serde_json::to_writer_pretty(&mut *writer, &json)?;
    writeln!(writer)?;
    Ok(())
}

/// Escape a GitHub workflow command property or message.
fn escape_workflow(value: &str, property: bool) -> String {
    let escaped = value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    if property {
        escaped.replace(':', "%3A").replace(',', "%2C")
    } else {
        escaped
    }
}

/// Print diagnostics as GitHub Actions `::warning` commands.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_github(writer: &mut impl Write, report: &ScanReport) -> std::io::Result<()> {
    for file in report.files_with_diagnostics() {
        let path = escape_workflow(&normalize_display_path(&file.file), true);
        for diagnostic in &file.diagnostics {
            writeln!(
                writer,
                "::warning file={path},line={},col={},title={}::{}",
                diagnostic.location.line,
                diagnostic.location.column,
                escape_workflow(DIAGNOSTIC_ID, true),
                escape_workflow(&diagnostic.message, false)
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Location;
    use crate::commands::FileReport;
    use crate::syntax::TextRange;
    use std::path::PathBuf;

    fn report() -> ScanReport {
        let diagnostic = Diagnostic::warning(
            "Type 'Worker' is decorated with DebuggerStepThrough attribute",
            Location {
                range: TextRange::new(26, 47),
                line: 2,
                column: 1,
            },
            Confidence::High,
        );
        ScanReport {
            files: vec![FileReport {
                file: PathBuf::from("./src/Worker.cs"),
                diagnostics: vec![diagnostic],
                suppressed: 0,
                has_errors: false,
            }],
            ..ScanReport::default()
        }
    }

    #[test]
    fn test_github_format() {
        let mut out = Vec::new();
        print_github(&mut out, &report()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "::warning file=src/Worker.cs,line=2,col=1,title=DebuggerStepThroughRemover::Type 'Worker' is decorated with DebuggerStepThrough attribute\n"
        );
    }

    #[test]
    fn test_json_format() {
        let mut out = Vec::new();
        print_json(&mut out, &report(), None).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["files_scanned"], 1);
        let diagnostic = &value["diagnostics"][0];
        assert_eq!(diagnostic["file"], "src/Worker.cs");
        assert_eq!(diagnostic["id"], "DebuggerStepThroughRemover");
        assert_eq!(diagnostic["severity"], "warning");
        assert_eq!(diagnostic["location"]["line"], 2);
        assert!(value.get("fix").is_none());
    }

    #[test]
    fn test_text_report() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        print_report(&mut out, &report()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(
            "src/Worker.cs:2:1: warning DebuggerStepThroughRemover: Type 'Worker' is decorated"
        ));
    }
}
