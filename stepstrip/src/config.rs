use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::analyzer::{MatchMode, ScanOptions};
use crate::constants::CONFIG_FILE_NAME;

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The `[stepstrip]` section.
    pub stepstrip: StepstripConfig,
    /// The path to the configuration file this was loaded from.
    /// Set during `load_from_path`, `None` if using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<std::path::PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
/// Configuration options for stepstrip.
pub struct StepstripConfig {
    /// List of folders to exclude.
    pub exclude_folders: Option<Vec<String>>,
    /// List of folders to include.
    pub include_folders: Option<Vec<String>>,
    /// Whether to report the attribute on members too.
    pub include_members: Option<bool>,
    /// Whether to match by resolved type (true) or by name only (false).
    pub semantic: Option<bool>,
    /// Whether to scan generated files.
    pub include_generated: Option<bool>,
    /// Additional fully qualified attribute types for the binder.
    pub known_types: Option<Vec<String>>,
}

impl StepstripConfig {
    /// Scanner options described by this section.
    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            mode: if self.semantic.unwrap_or(true) {
                MatchMode::Semantic
            } else {
                MatchMode::Textual
            },
            include_members: self.include_members.unwrap_or(false),
        }
    }
}

impl Config {
    /// Loads configuration from the current directory or its parents.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    ///
    /// A file that cannot be read or parsed is reported and skipped.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                match Self::read(&candidate) {
                    Ok(config) => return config,
                    Err(e) => log::warn!("Ignoring {}: {e:#}", candidate.display()),
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }

    /// Reads and parses one configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this schema.
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config = toml::from_str::<Config>(&content)?;
        config.config_file_path = Some(path.to_path_buf());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_path_no_config() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_path(dir.path());
        assert!(config.config_file_path.is_none());
        assert_eq!(config.stepstrip.scan_options(), ScanOptions::default());
    }

    #[test]
    fn test_load_from_path_stepstrip_toml() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join(".stepstrip.toml")).unwrap();
        writeln!(
            file,
            r#"[stepstrip]
include_members = true
semantic = false
known_types = ["Acme.TraceAttribute"]
"#
        )
        .unwrap();

        let config = Config::load_from_path(dir.path());
        let options = config.stepstrip.scan_options();
        assert!(options.include_members);
        assert_eq!(options.mode, MatchMode::Textual);
        assert_eq!(
            config.stepstrip.known_types.as_deref(),
            Some(&["Acme.TraceAttribute".to_owned()][..])
        );
    }

    #[test]
    fn test_load_from_path_traverses_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("src").join("Core");
        std::fs::create_dir_all(&nested).unwrap();

        let mut file = std::fs::File::create(dir.path().join(".stepstrip.toml")).unwrap();
        writeln!(
            file,
            r#"[stepstrip]
exclude_folders = ["Generated"]
"#
        )
        .unwrap();

        let config = Config::load_from_path(&nested);
        assert_eq!(
            config.stepstrip.exclude_folders,
            Some(vec!["Generated".to_owned()])
        );
    }

    #[test]
    fn test_load_from_file_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".stepstrip.toml"),
            "[stepstrip]\ninclude_generated = true\n",
        )
        .unwrap();
        let cs_file = dir.path().join("Program.cs");
        std::fs::write(&cs_file, "class Program {}").unwrap();

        let config = Config::load_from_path(&cs_file);
        assert_eq!(config.stepstrip.include_generated, Some(true));
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".stepstrip.toml"),
            "[stepstrip]\nunknown_key = 1\n",
        )
        .unwrap();

        assert!(Config::read(&dir.path().join(".stepstrip.toml")).is_err());
        let config = Config::load_from_path(dir.path());
        assert!(config.config_file_path.is_none());
    }
}
