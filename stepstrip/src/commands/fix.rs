//! `--fix`: remove the reported attributes, previewing by default.

use super::scan::{FileFailure, FileReport, ScanReport, ScanSettings};
use crate::analyzer::Document;
use crate::fix::Rewriter;
use crate::syntax::{CsParser, TextRange};
use crate::utils::{normalize_display_path, validate_output_path};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options for the fix command
#[derive(Debug, Clone)]
pub struct FixOptions {
    /// Show what would change without writing
    pub dry_run: bool,
    /// Verbose output
    pub verbose: bool,
    /// Files may only be written below this directory
    pub analysis_root: PathBuf,
    /// Settings the diagnostics were produced with
    pub scan: ScanSettings,
}

/// Result for one fixed file
#[derive(Debug, Clone, Serialize)]
pub struct FixResult {
    /// File that was fixed
    pub file: PathBuf,
    /// Number of attributes removed
    pub removed: usize,
    /// Whether the file was written
    pub written: bool,
}

/// Outcome of the fix command
#[derive(Debug, Clone, Default, Serialize)]
pub struct FixSummary {
    /// Files with removals
    pub results: Vec<FixResult>,
    /// Files left untouched and why
    pub skipped: Vec<FileFailure>,
}

impl FixSummary {
    /// Attributes removed (or that would be removed in a dry run)
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.results.iter().map(|r| r.removed).sum()
    }

    /// Attributes actually written out
    #[must_use]
    pub fn written_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.written)
            .map(|r| r.removed)
            .sum()
    }
}

/// Remove every diagnostic of `report`, one file at a time.
///
/// Problems with a single file are recorded in [`FixSummary::skipped`] and
/// do not stop the run.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails or no parser can be created.
pub fn run_fix<W: Write>(
    report: &ScanReport,
    options: &FixOptions,
    writer: &mut W,
) -> Result<FixSummary> {
    if options.dry_run {
        writeln!(
            writer,
            "\n{}",
            "[DRY-RUN] DebuggerStepThrough attributes that would be removed:".yellow()
        )?;
    } else {
        writeln!(writer, "\n{}", "Removing DebuggerStepThrough attributes...".cyan())?;
    }

    let mut parser = CsParser::new()?;
    let rewriter = Rewriter::new(options.scan.options);
    let mut summary = FixSummary::default();

    for file in report.files_with_diagnostics() {
        let display = normalize_display_path(&file.file);
        if file.has_errors {
            writeln!(
                writer,
                "  {} {display}: file has syntax errors, not rewritten",
                "Skipped".yellow()
            )?;
            summary.skipped.push(FileFailure {
                file: file.file.clone(),
                error: "file has syntax errors".to_owned(),
            });
            continue;
        }

        match fix_file(&mut parser, &rewriter, file, options) {
            Ok(result) => {
                print_result(writer, file, &result, options)?;
                summary.results.push(result);
            }
            Err(e) => {
                writeln!(writer, "  {} {display}: {e:#}", "Failed".red())?;
                summary.skipped.push(FileFailure {
                    file: file.file.clone(),
                    error: format!("{e:#}"),
                });
            }
        }
    }

    if summary.results.is_empty() && summary.skipped.is_empty() {
        writeln!(writer, "  Nothing to fix.")?;
    }
    Ok(summary)
}

fn fix_file(
    parser: &mut CsParser,
    rewriter: &Rewriter,
    file: &FileReport,
    options: &FixOptions,
) -> Result<FixResult> {
    let source = fs::read_to_string(&file.file)
        .with_context(|| format!("Failed to read {}", file.file.display()))?;
    let document = Document::parse_with(parser, &source, Arc::clone(&options.scan.catalog))?
        .with_path(&file.file);
    let ranges: Vec<TextRange> = file.diagnostics.iter().map(|d| d.location.range).collect();
    let fixed = rewriter.fix_all(&document, &ranges)?;

    let mut written = false;
    if !options.dry_run && fixed.text() != source {
        let target = validate_output_path(&file.file, Some(&options.analysis_root))?;
        fs::write(&target, fixed.text())
            .with_context(|| format!("Failed to write {}", target.display()))?;
        written = true;
        log::debug!("Wrote {}", target.display());
    }

    Ok(FixResult {
        file: file.file.clone(),
        removed: ranges.len(),
        written,
    })
}

fn print_result<W: Write>(
    writer: &mut W,
    file: &FileReport,
    result: &FixResult,
    options: &FixOptions,
) -> Result<()> {
    let display = normalize_display_path(&file.file);
    if options.dry_run {
        writeln!(
            writer,
            "  Would remove {} attribute(s) from {}",
            result.removed,
            display.bold()
        )?;
        for diagnostic in &file.diagnostics {
            writeln!(
                writer,
                "    - {}:{} {}",
                diagnostic.location.line,
                diagnostic.location.column,
                diagnostic.message.dimmed()
            )?;
        }
    } else {
        writeln!(
            writer,
            "  {} {} ({} removed)",
            "Fixed".green(),
            display.bold(),
            result.removed
        )?;
        if options.verbose {
            for diagnostic in &file.diagnostics {
                writeln!(writer, "[VERBOSE]   {}", diagnostic.message)?;
            }
        }
    }
    Ok(())
}

/// Fix one in-memory file; the text is returned instead of written.
///
/// # Errors
///
/// Returns an error if the source cannot be parsed or a diagnostic can no
/// longer be located.
pub fn fix_source(source: &str, path: &Path, settings: &ScanSettings) -> Result<String> {
    let Some(report) = super::scan::scan_source(source, path, settings)? else {
        return Ok(source.to_owned());
    };
    let document = Document::parse_with_catalog(source, Arc::clone(&settings.catalog))?;
    let ranges: Vec<TextRange> = report.diagnostics.iter().map(|d| d.location.range).collect();
    let fixed = Rewriter::new(settings.options).fix_all(&document, &ranges)?;
    Ok(fixed.text().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::scan_files;
    use indicatif::ProgressBar;
    use tempfile::tempdir;

    const SOURCE: &str = "using System;\nusing System.Diagnostics;\n\n[Obsolete, DebuggerStepThrough]\nclass A {}\n\n[DebuggerStepThrough]\nclass B {}\n";
    const FIXED: &str = "using System;\nusing System.Diagnostics;\n\n[Obsolete]\nclass A {}\n\nclass B {}\n";

    fn options(root: &Path, dry_run: bool) -> FixOptions {
        FixOptions {
            dry_run,
            verbose: false,
            analysis_root: root.to_path_buf(),
            scan: ScanSettings::default(),
        }
    }

    #[test]
    fn test_dry_run_leaves_files_untouched() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("A.cs");
        fs::write(&file, SOURCE)?;

        let report = scan_files(&[file.clone()], &ScanSettings::default(), &ProgressBar::hidden());
        let mut out = Vec::new();
        let summary = run_fix(&report, &options(dir.path(), true), &mut out)?;

        assert_eq!(summary.removed_count(), 2);
        assert_eq!(summary.written_count(), 0);
        assert_eq!(fs::read_to_string(&file)?, SOURCE);
        let text = String::from_utf8(out)?;
        assert!(text.contains("[DRY-RUN]"));
        assert!(text.contains("Would remove 2 attribute(s)"));
        Ok(())
    }

    #[test]
    fn test_apply_writes_fixed_source() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("A.cs");
        fs::write(&file, SOURCE)?;

        let report = scan_files(&[file.clone()], &ScanSettings::default(), &ProgressBar::hidden());
        let summary = run_fix(&report, &options(dir.path(), false), &mut Vec::new())?;

        assert_eq!(summary.written_count(), 2);
        assert_eq!(fs::read_to_string(&file)?, FIXED);
        Ok(())
    }

    #[test]
    fn test_files_with_syntax_errors_are_skipped() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("Broken.cs");
        let broken = "using System.Diagnostics;\n[DebuggerStepThrough]\nclass Broken { void M( }\n";
        fs::write(&file, broken)?;

        let report = scan_files(&[file.clone()], &ScanSettings::default(), &ProgressBar::hidden());
        let summary = run_fix(&report, &options(dir.path(), false), &mut Vec::new())?;

        assert!(summary.results.is_empty());
        assert_eq!(summary.skipped.len(), report.files_with_diagnostics().count());
        assert_eq!(fs::read_to_string(&file)?, broken);
        Ok(())
    }

    #[test]
    fn test_fix_source() -> Result<()> {
        let fixed = fix_source(SOURCE, Path::new("A.cs"), &ScanSettings::default())?;
        assert_eq!(fixed, FIXED);
        Ok(())
    }
}
