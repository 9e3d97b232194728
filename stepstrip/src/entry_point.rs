use crate::cli::{Cli, OutputFormat};
use crate::commands::{run_fix, scan_files, FixOptions, FixSummary, ScanReport, ScanSettings};
use crate::config::Config;
use crate::output;
use crate::semantic::TypeCatalog;
use crate::utils::{collect_csharp_files, normalize_display_path};

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Runs stepstrip with the given arguments.
///
/// # Errors
///
/// Returns an error if argument parsing fails, or if the command execution fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run stepstrip with the given arguments, writing output to the specified writer.
///
/// This is the testable version of `run_with_args` that allows output capture.
/// Returns the process exit code.
///
/// # Errors
///
/// Returns an error if writing the report fails.
#[allow(clippy::too_many_lines)]
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["stepstrip".to_owned()];
    program_args.extend(args);
    let cli_var = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                write!(writer, "{e}")?;
                writer.flush()?;
                return Ok(0);
            }
            _ => {
                eprint!("{e}");
                return Ok(1);
            }
        },
    };

    init_logging(cli_var.output.verbose);
    let format = cli_var.output.format;
    let machine = format != OutputFormat::Text;

    let paths: Vec<PathBuf> = match (&cli_var.paths.root, cli_var.paths.paths.is_empty()) {
        (Some(root), _) => vec![root.clone()],
        (None, true) => vec![PathBuf::from(".")],
        (None, false) => cli_var.paths.paths.clone(),
    };
    for path in &paths {
        if !path.exists() {
            eprintln!(
                "Error: The file or directory '{}' does not exist.",
                path.display()
            );
            return Ok(1);
        }
    }

    // Load config from the first path or current directory
    let config = Config::load_from_path(&paths[0]);
    let section = &config.stepstrip;

    let mut scan_options = section.scan_options();
    if cli_var.matching.members {
        scan_options.include_members = true;
    }
    if cli_var.matching.textual {
        scan_options.mode = crate::analyzer::MatchMode::Textual;
    }
    let include_generated =
        cli_var.matching.include_generated || section.include_generated.unwrap_or(false);

    let mut catalog = TypeCatalog::with_defaults();
    if let Some(known) = &section.known_types {
        catalog.extend_known_types(known.iter().map(String::as_str));
    }
    let settings = ScanSettings {
        options: scan_options,
        include_generated,
        catalog: Arc::new(catalog),
    };

    let mut exclude_folders = section.exclude_folders.clone().unwrap_or_default();
    exclude_folders.extend(cli_var.exclude_folders.iter().cloned());
    let mut include_folders = section.include_folders.clone().unwrap_or_default();
    include_folders.extend(cli_var.include_folders.iter().cloned());

    if cli_var.output.verbose && !machine {
        eprintln!("[VERBOSE] stepstrip v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("[VERBOSE] Using {} threads", rayon::current_num_threads());
        eprintln!("[VERBOSE] Configuration:");
        if let Some(file) = &config.config_file_path {
            eprintln!("   Config file: {}", normalize_display_path(file));
        }
        eprintln!("   Match mode: {:?}", settings.options.mode);
        eprintln!("   Include members: {}", settings.options.include_members);
        eprintln!("   Include generated: {include_generated}");
        eprintln!("   Known types: {}", settings.catalog.len());
        eprintln!("   Paths: {paths:?}");
        eprintln!();
    }

    if !machine && !cli_var.output.quiet {
        output::print_exclusion_list(writer, &exclude_folders).ok();
    }

    let files = gather_files(&paths, &exclude_folders, &include_folders);
    let start = Instant::now();
    let progress =
        output::create_progress_bar(files.len() as u64, machine || cli_var.output.quiet);
    let report = scan_files(&files, &settings, &progress);
    progress.finish_and_clear();

    if cli_var.output.verbose && !machine {
        eprintln!(
            "[VERBOSE] Scanned {} files in {:.2}s",
            report.files.len(),
            start.elapsed().as_secs_f64()
        );
        for skipped in &report.skipped_generated {
            eprintln!("[VERBOSE]   skipped generated {}", normalize_display_path(skipped));
        }
    }

    let fix_summary = if cli_var.fix {
        let analysis_root = match &cli_var.paths.root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };
        let options = FixOptions {
            dry_run: !cli_var.apply,
            verbose: cli_var.output.verbose,
            analysis_root,
            scan: settings.clone(),
        };
        let summary = if machine {
            run_fix(&report, &options, &mut std::io::sink())?
        } else {
            run_fix(&report, &options, writer)?
        };
        Some(summary)
    } else {
        None
    };

    match format {
        OutputFormat::Json => output::print_json(writer, &report, fix_summary.as_ref())?,
        OutputFormat::Github => output::print_github(writer, &report)?,
        OutputFormat::Text if cli_var.output.quiet => {
            output::print_report_quiet(writer, &report)?;
        }
        OutputFormat::Text => {
            if fix_summary.is_none() {
                output::print_report(writer, &report)?;
            } else {
                output::print_failures(writer, "Unreadable Files", &report.failures)?;
            }
            output::print_summary(writer, &report, fix_summary.as_ref())?;
        }
    }

    Ok(exit_code(
        &report,
        fix_summary.as_ref(),
        cli_var.output.fail_on_findings,
    ))
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    // A second initialisation keeps the first logger.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init()
        .ok();
}

fn gather_files(paths: &[PathBuf], exclude: &[String], include: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let (found, dirs) = collect_csharp_files(path, exclude, include);
            log::debug!(
                "{}: {} file(s) in {dirs} folder(s)",
                normalize_display_path(path),
                found.len()
            );
            files.extend(found);
        } else if is_csharp_file(path) {
            files.push(path.clone());
        } else {
            log::warn!("Skipping {}: not a C# file", normalize_display_path(path));
        }
    }
    files.sort();
    files.dedup();
    files
}

fn is_csharp_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("cs"))
}

/// Diagnostics still present after the run decide the exit code.
fn exit_code(report: &ScanReport, fix: Option<&FixSummary>, fail_on_findings: bool) -> i32 {
    let remaining = report
        .diagnostic_count()
        .saturating_sub(fix.map_or(0, FixSummary::written_count));
    i32::from(fail_on_findings && remaining > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn run(args: &[&str]) -> (i32, String) {
        let mut out = Vec::new();
        let code = run_with_args_to(args.iter().map(|s| (*s).to_owned()).collect(), &mut out)
            .expect("run");
        (code, String::from_utf8_lossy(&out).into_owned())
    }

    #[test]
    fn test_help_exits_zero() {
        let (code, out) = run(&["--help"]);
        assert_eq!(code, 0);
        assert!(out.contains("DebuggerStepThrough"));
    }

    #[test]
    fn test_missing_path_exits_one() {
        let (code, _) = run(&["definitely/not/here"]);
        assert_eq!(code, 1);
    }

    #[test]
    fn test_fail_on_findings() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("Worker.cs"),
            "using System.Diagnostics;\n[DebuggerStepThrough]\nclass Worker {}\n",
        )?;
        let path = dir.path().to_string_lossy().into_owned();

        let (code, out) = run(&[&path, "--format", "json"]);
        assert_eq!(code, 0);
        let value: serde_json::Value = serde_json::from_str(&out)?;
        assert_eq!(value["diagnostics"].as_array().map(Vec::len), Some(1));

        let (code, _) = run(&[&path, "--format", "github", "--fail-on-findings"]);
        assert_eq!(code, 1);
        Ok(())
    }

    #[test]
    fn test_config_known_types_and_members() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join(".stepstrip.toml"),
            "[stepstrip]\ninclude_members = true\n",
        )?;
        fs::write(
            dir.path().join("Worker.cs"),
            "using System.Diagnostics;\nclass Worker\n{\n    [DebuggerStepThrough]\n    void Run() {}\n}\n",
        )?;
        let path = dir.path().to_string_lossy().into_owned();

        let (_, out) = run(&[&path, "--format", "github"]);
        assert!(out.contains("Member 'Worker.Run'"));
        Ok(())
    }

    #[test]
    fn test_exit_code_counts_written_fixes() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("Worker.cs"),
            "using System.Diagnostics;\n[DebuggerStepThrough]\nclass Worker {}\n",
        )?;
        let files = vec![dir.path().join("Worker.cs")];
        let report = scan_files(&files, &ScanSettings::default(), &indicatif::ProgressBar::hidden());
        assert_eq!(exit_code(&report, None, true), 1);
        assert_eq!(exit_code(&report, None, false), 0);

        let dry_run = FixSummary {
            results: vec![crate::commands::FixResult {
                file: files[0].clone(),
                removed: 1,
                written: false,
            }],
            skipped: Vec::new(),
        };
        assert_eq!(exit_code(&report, Some(&dry_run), true), 1);

        let mut applied = dry_run.clone();
        applied.results[0].written = true;
        assert_eq!(exit_code(&report, Some(&applied), true), 0);
        Ok(())
    }
}
