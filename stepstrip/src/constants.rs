use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Identifier reported on every diagnostic.
pub const DIAGNOSTIC_ID: &str = "DebuggerStepThroughRemover";

/// Short title of the diagnostic.
pub const DIAGNOSTIC_TITLE: &str = "Type is decorated with DebuggerStepThrough attribute";

/// Metadata name of the marker attribute type.
pub const MARKER_METADATA_NAME: &str = "System.Diagnostics.DebuggerStepThroughAttribute";

/// Marker name as usually written in source.
pub const MARKER_SHORT_NAME: &str = "DebuggerStepThrough";

/// Suffix the C# compiler appends when looking up attribute names.
pub const ATTRIBUTE_SUFFIX: &str = "Attribute";

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = ".stepstrip.toml";

/// Regex matching file names of generated C# sources.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_generated_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(?:\.g\.cs|\.g\.i\.cs|\.designer\.cs|\.generated\.cs|\.AssemblyAttributes\.cs)$|(?:^|[/\\])TemporaryGeneratedFile_[^/\\]*\.cs$",
        )
        .expect("Invalid generated file regex pattern")
    })
}

/// Regex matching the `<auto-generated>` header of tool-generated files.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_generated_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?://|/\*)\s*<auto-?generated")
            .expect("Invalid generated header regex pattern")
    })
}

/// Regex for `#pragma warning disable|restore [ids]` lines.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_pragma_warning_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"^\s*#\s*pragma\s+warning\s+(disable|restore)\b([^/\r\n]*)")
            .expect("Invalid pragma regex pattern")
    })
}

/// Set of folders to exclude by default.
pub fn get_default_exclude_folders() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        s.insert("bin");
        s.insert("obj");
        s.insert(".git");
        s.insert(".vs");
        s.insert(".idea");
        s.insert("packages");
        s.insert("node_modules");
        s.insert("TestResults");
        s.insert("artifacts");
        s
    })
}

pub use get_default_exclude_folders as DEFAULT_EXCLUDE_FOLDERS;
pub use get_generated_file_re as GENERATED_FILE_RE;
pub use get_generated_header_re as GENERATED_HEADER_RE;
pub use get_pragma_warning_re as PRAGMA_WARNING_RE;
