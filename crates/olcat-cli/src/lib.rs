//! # olcat-cli — Category Export & Validation CLI
//!
//! Provides the `olcat` command-line interface. Every subcommand maps onto
//! one operation of `olcat-core` or `olcat-schema`; this crate owns file
//! I/O, configuration and reporting only.
//!
//! ## Subcommands
//!
//! ```bash
//! olcat export --input raw.json --shape map
//! olcat validate categories-20250517.json
//! olcat check-schema schemas/OutlookCategory.yaml --root-key OutlookCategory
//! olcat schema drift
//! ```
//!
//! Exit codes: 0 success, 1 validation failure, 2 operational error.

pub mod config;
pub mod export;
pub mod schema;
pub mod validate;

use std::path::{Path, PathBuf};

/// Resolve a path that may be relative to the repository root.
///
/// If the path is absolute, returns it as-is. If relative and the file
/// exists relative to `repo_root`, uses that. Otherwise returns the path
/// relative to the current directory.
pub fn resolve_path(path: &Path, repo_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let repo_relative = repo_root.join(path);
    if repo_relative.exists() {
        repo_relative
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_path_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let abs = tmp.path().join("x.json");
        assert_eq!(resolve_path(&abs, Path::new("/elsewhere")), abs);
    }

    #[test]
    fn relative_path_prefers_repo_root_when_present() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("data.json"), "[]").unwrap();
        assert_eq!(
            resolve_path(Path::new("data.json"), tmp.path()),
            tmp.path().join("data.json")
        );
        assert_eq!(
            resolve_path(Path::new("absent.json"), tmp.path()),
            PathBuf::from("absent.json")
        );
    }
}
