//! Scanning a set of files in parallel.

use crate::analyzer::{Diagnostic, Document, ScanOptions, Scanner};
use crate::semantic::TypeCatalog;
use crate::suppression::Suppressions;
use crate::syntax::CsParser;
use crate::utils::{has_generated_header, is_generated_path, normalize_display_path};

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Settings shared by every file of a run.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Matching and declaration options
    pub options: ScanOptions,
    /// Scan generated files too
    pub include_generated: bool,
    /// Types the binder knows from metadata
    pub catalog: Arc<TypeCatalog>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            options: ScanOptions::default(),
            include_generated: false,
            catalog: TypeCatalog::shared_default(),
        }
    }
}

/// Diagnostics of one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// File path as given to the scanner
    pub file: PathBuf,
    /// Reported diagnostics, suppressed ones removed
    pub diagnostics: Vec<Diagnostic>,
    /// Diagnostics hidden by `#pragma warning disable`
    pub suppressed: usize,
    /// The parser recovered from syntax errors
    pub has_errors: bool,
}

/// A file that could not be scanned.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    /// File path
    pub file: PathBuf,
    /// Error description
    pub error: String,
}

/// Outcome of one scan run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Scanned files in input order
    pub files: Vec<FileReport>,
    /// Generated files that were skipped
    pub skipped_generated: Vec<PathBuf>,
    /// Files that could not be read or parsed
    pub failures: Vec<FileFailure>,
}

impl ScanReport {
    /// Total reported diagnostics
    #[must_use]
    pub fn diagnostic_count(&self) -> usize {
        self.files.iter().map(|f| f.diagnostics.len()).sum()
    }

    /// Total suppressed diagnostics
    #[must_use]
    pub fn suppressed_count(&self) -> usize {
        self.files.iter().map(|f| f.suppressed).sum()
    }

    /// Files with at least one diagnostic
    pub fn files_with_diagnostics(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.diagnostics.is_empty())
    }
}

enum Outcome {
    Scanned(FileReport),
    Generated(PathBuf),
    Failed(FileFailure),
}

/// Scan `files` on the rayon pool, one parser per worker.
#[must_use]
pub fn scan_files(files: &[PathBuf], settings: &ScanSettings, progress: &ProgressBar) -> ScanReport {
    let scanner = Scanner::new(settings.options);
    let outcomes: Vec<Outcome> = files
        .par_iter()
        .map_init(CsParser::new, |parser, path| {
            let outcome = match parser {
                Ok(parser) => scan_file(parser, &scanner, path, settings),
                Err(e) => Outcome::Failed(FileFailure {
                    file: path.clone(),
                    error: e.to_string(),
                }),
            };
            progress.inc(1);
            outcome
        })
        .collect();

    let mut report = ScanReport::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Scanned(file) => report.files.push(file),
            Outcome::Generated(path) => report.skipped_generated.push(path),
            Outcome::Failed(failure) => report.failures.push(failure),
        }
    }
    report
}

/// Scan in-memory source as if read from `path`.
///
/// # Errors
///
/// Returns an error if the source cannot be parsed at all.
pub fn scan_source(
    source: &str,
    path: &Path,
    settings: &ScanSettings,
) -> anyhow::Result<Option<FileReport>> {
    let mut parser = CsParser::new()?;
    scan_text(&mut parser, &Scanner::new(settings.options), path, source, settings)
}

fn scan_file(parser: &mut CsParser, scanner: &Scanner, path: &Path, settings: &ScanSettings) -> Outcome {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            log::warn!("Skipping {}: {e}", normalize_display_path(path));
            return Outcome::Failed(FileFailure {
                file: path.to_path_buf(),
                error: e.to_string(),
            });
        }
    };

    match scan_text(parser, scanner, path, &source, settings) {
        Ok(Some(report)) => Outcome::Scanned(report),
        Ok(None) => Outcome::Generated(path.to_path_buf()),
        Err(e) => Outcome::Failed(FileFailure {
            file: path.to_path_buf(),
            error: e.to_string(),
        }),
    }
}

/// `Ok(None)` when the file is generated and skipped.
fn scan_text(
    parser: &mut CsParser,
    scanner: &Scanner,
    path: &Path,
    source: &str,
    settings: &ScanSettings,
) -> anyhow::Result<Option<FileReport>> {
    if !settings.include_generated
        && (is_generated_path(&path.to_string_lossy()) || has_generated_header(source))
    {
        log::debug!("Skipping generated file {}", normalize_display_path(path));
        return Ok(None);
    }

    let document = Document::parse_with(parser, source, Arc::clone(&settings.catalog))?
        .with_path(path);
    if document.tree().has_errors() {
        log::warn!("{} has syntax errors", normalize_display_path(path));
    }

    let (diagnostics, suppressed) =
        Suppressions::from_document(&document).filter(scanner.scan(&document));
    Ok(Some(FileReport {
        file: path.to_path_buf(),
        diagnostics,
        suppressed,
        has_errors: document.tree().has_errors(),
    }))
}
