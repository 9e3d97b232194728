//! Commands module - the scan and fix passes run by the CLI.
//!
//! Both work on whole file sets: `scan` parses files in parallel and applies
//! generated-file and pragma filtering, `fix` re-locates and removes what a
//! scan reported.

mod fix;
mod scan;

pub use fix::{fix_source, run_fix, FixOptions, FixResult, FixSummary};
pub use scan::{scan_files, scan_source, FileFailure, FileReport, ScanReport, ScanSettings};
