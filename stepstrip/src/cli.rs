use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.stepstrip.toml):
  Create this file in your project root to set defaults.

  [stepstrip]
  include_members = false    # Also report methods, accessors, local functions
  semantic = true            # false: match by name only (low confidence)
  include_generated = false  # Scan *.g.cs, *.Designer.cs and <auto-generated> files

  # Path filters
  exclude_folders = [\"bin\", \"obj\", \"packages\"]
  include_folders = [\"src\"]  # Force-include these

  # Extra attribute types the binder should know, fully qualified
  known_types = [\"MyCompany.Tracing.TraceAttribute\"]
";

/// Report format.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored, human readable text.
    #[default]
    Text,
    /// One JSON document with every diagnostic.
    Json,
    /// GitHub Actions workflow commands (`::warning ...`).
    Github,
}

/// Options for output formatting and verbosity.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputOptions {
    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose output for debugging (shows files being analyzed).
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: show only the summary (no per-diagnostic lines).
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Exit with code 1 if any diagnostic remains.
    #[arg(long)]
    pub fail_on_findings: bool,
}

/// Options controlling what counts as a finding.
#[derive(Args, Debug, Default, Clone)]
pub struct MatchOptions {
    /// Also report the attribute on methods, constructors, accessors and
    /// local functions.
    #[arg(long)]
    pub members: bool,

    /// Match by attribute name only, without resolving types.
    /// Findings are reported with low confidence.
    #[arg(long)]
    pub textual: bool,

    /// Scan generated files (*.g.cs, *.Designer.cs, <auto-generated> headers).
    #[arg(long)]
    pub include_generated: bool,
}

/// Shared path arguments (mutually exclusive paths/root).
#[derive(Args, Debug, Default, Clone)]
pub struct PathArgs {
    /// Paths to analyze (files or directories).
    /// When no paths are provided, defaults to the current directory.
    /// Cannot be used with --root.
    #[arg(conflicts_with = "root")]
    pub paths: Vec<PathBuf>,

    /// Project root for path containment and analysis.
    /// When specified, this path is used as both the analysis target and the
    /// boundary files may be rewritten in.
    #[arg(long, conflicts_with = "paths")]
    pub root: Option<PathBuf>,
}

/// Command line interface configuration using `clap`.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "stepstrip - find and remove [DebuggerStepThrough] from C# sources",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    /// Path options (paths vs root).
    #[command(flatten)]
    pub paths: PathArgs,

    /// Output formatting options.
    #[command(flatten)]
    pub output: OutputOptions,

    /// Matching options.
    #[command(flatten)]
    pub matching: MatchOptions,

    /// Folders to exclude from analysis.
    #[arg(long, alias = "exclude-folder")]
    pub exclude_folders: Vec<String>,

    /// Folders to force-include in analysis (overrides default exclusions).
    #[arg(long, alias = "include-folder")]
    pub include_folders: Vec<String>,

    /// Remove the attribute. By default, shows a preview of what would be
    /// changed (dry-run). Use --apply to actually modify files.
    #[arg(long)]
    pub fix: bool,

    /// Apply the fixes to files (use with --fix).
    #[arg(short = 'a', long, requires = "fix")]
    pub apply: bool,
}
