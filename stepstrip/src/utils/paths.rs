//! Path utilities: display normalization, traversal checks and C# file
//! discovery.

use crate::constants::DEFAULT_EXCLUDE_FOLDERS;
use anyhow::Context;

/// Normalizes a path for CLI display.
///
/// - Converts backslashes to forward slashes (for cross-platform consistency)
/// - Strips leading "./" or ".\" prefix (for cleaner output)
///
/// # Examples
/// ```
/// use std::path::Path;
/// use stepstrip::utils::normalize_display_path;
///
/// assert_eq!(normalize_display_path(Path::new(".\\src\\Program.cs")), "src/Program.cs");
/// assert_eq!(normalize_display_path(Path::new("./src/App.cs")), "src/App.cs");
/// ```
#[must_use]
pub fn normalize_display_path(path: &std::path::Path) -> String {
    let s = path.to_string_lossy();
    // Strip Windows extended path prefix if present
    let clean = s.trim_start_matches(r"\\?\");
    let normalized = clean.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_owned()
}

/// Checks if a name matches any exclusion pattern.
/// Supports exact matching and wildcard patterns starting with `*.`.
#[must_use]
pub fn is_excluded(name: &str, excludes: &[String]) -> bool {
    for exclude in excludes {
        if exclude.starts_with("*.") {
            if name.ends_with(&exclude[1..]) {
                return true;
            }
        } else if name == exclude {
            return true;
        }
    }
    false
}

/// Validates that a file about to be rewritten stays inside `root`.
///
/// When `root` is `None` the current working directory is the boundary.
/// The longest existing ancestor is canonicalized so symlinks cannot escape,
/// and the part of the path that does not exist yet may not contain `..`.
///
/// # Errors
///
/// Returns an error if the boundary cannot be resolved or the path leaves it.
pub fn validate_output_path(
    path: &std::path::Path,
    root: Option<&std::path::Path>,
) -> anyhow::Result<std::path::PathBuf> {
    let current_dir = std::env::current_dir()?;
    let root_dir = root.unwrap_or(&current_dir);
    let canonical_root = root_dir
        .canonicalize()
        .with_context(|| format!("Failed to canonicalize root directory {}", root_dir.display()))?;

    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        canonical_root.join(path)
    };

    let ancestor = absolute_path
        .ancestors()
        .find(|candidate| candidate.exists())
        .unwrap_or(&absolute_path);
    let canonical_ancestor = ancestor
        .canonicalize()
        .with_context(|| format!("Failed to canonicalize {}", ancestor.display()))?;

    if !canonical_ancestor.starts_with(&canonical_root) {
        anyhow::bail!(
            "Refusing to write '{}': it is outside '{}'",
            normalize_display_path(&canonical_ancestor),
            normalize_display_path(&canonical_root)
        );
    }

    if let Ok(remainder) = absolute_path.strip_prefix(ancestor) {
        if remainder
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            anyhow::bail!("Path contains '..' in its non-existent portion: '{}'", path.display());
        }
    }

    Ok(absolute_path)
}

/// Collects C# source files from a directory with gitignore support.
///
/// Uses the `ignore` crate to respect .gitignore, .git/info/exclude, and global gitignore
/// in addition to the default exclusions (`bin`, `obj`, `.vs`, ...).
///
/// # Arguments
/// * `root` - Root directory to search
/// * `exclude` - Additional user-specified exclusion patterns
/// * `include` - Folders to force-include (overrides excludes)
///
/// # Returns
/// Tuple of (Vector of `PathBuf` for all `.cs` files found, directory count)
#[must_use]
pub fn collect_csharp_files(
    root: &std::path::Path,
    exclude: &[String],
    include: &[String],
) -> (Vec<std::path::PathBuf>, usize) {
    use ignore::WalkBuilder;

    let default_excludes: Vec<String> = DEFAULT_EXCLUDE_FOLDERS()
        .iter()
        .map(|&s| s.to_owned())
        .collect();
    let mut all_excludes: Vec<String> = exclude.iter().cloned().chain(default_excludes).collect();
    all_excludes.retain(|ex| !include.iter().any(|inc| ex == inc));

    let root_for_filter = root.to_path_buf();
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .filter_entry(move |entry| {
            if entry.path() == root_for_filter {
                return true;
            }
            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }
            entry
                .file_name()
                .to_str()
                .is_none_or(|name| !is_excluded(name, &all_excludes))
        })
        .build();

    let mut files = Vec::new();
    let mut dir_count = 0;

    for result in walker {
        match result {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    if path != root {
                        dir_count += 1;
                    }
                    continue;
                }
                if path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("cs"))
                {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => log::debug!("Walk error: {e}"),
        }
    }

    files.sort();
    (files, dir_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn test_validate_output_path_with_root() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("src"))?;
        fs::write(root.join("src/App.cs"), "class App {}")?;

        assert!(validate_output_path(&root.join("src/App.cs"), Some(root)).is_ok());
        assert!(validate_output_path(Path::new("src/New.cs"), Some(root)).is_ok());
        assert!(validate_output_path(Path::new("../Outside.cs"), Some(root)).is_err());
        assert!(validate_output_path(Path::new("src/missing/../../../x.cs"), Some(root)).is_err());

        Ok(())
    }

    #[test]
    fn test_collect_csharp_files_exclusion() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let root = temp.path();

        fs::write(root.join("Program.cs"), "class Program {}")?;
        fs::write(root.join("readme.md"), "# readme")?;
        fs::create_dir_all(root.join("obj/Debug"))?;
        fs::write(root.join("obj/Debug/AssemblyInfo.cs"), "// generated")?;
        fs::create_dir_all(root.join("bin"))?;
        fs::write(root.join("bin/Copy.cs"), "class Copy {}")?;
        fs::create_dir_all(root.join("src/Models"))?;
        fs::write(root.join("src/Models/User.CS"), "class User {}")?;

        let (files, _) = collect_csharp_files(root, &[], &[]);

        let file_names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name())
            .filter_map(|f| f.to_str())
            .collect();
        assert_eq!(file_names, vec!["Program.cs", "User.CS"]);

        Ok(())
    }

    #[test]
    fn test_collect_csharp_files_force_include() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let root = temp.path();

        fs::create_dir_all(root.join("bin"))?;
        fs::write(root.join("bin/Kept.cs"), "class Kept {}")?;
        fs::create_dir_all(root.join("legacy"))?;
        fs::write(root.join("legacy/Old.cs"), "class Old {}")?;

        let (files, _) = collect_csharp_files(root, &["legacy".to_owned()], &["bin".to_owned()]);

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("bin/Kept.cs"));

        Ok(())
    }

    #[test]
    fn test_is_excluded_wildcard() {
        let excludes = vec!["*.Tests".to_owned(), "obj".to_owned()];
        assert!(is_excluded("Core.Tests", &excludes));
        assert!(is_excluded("obj", &excludes));
        assert!(!is_excluded("object", &excludes));
    }
}
