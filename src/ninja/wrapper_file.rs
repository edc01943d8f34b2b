//! Intermediate ninja file
//!
//! The executor is pointed at a small wrapper that declares the pool the
//! Android graph expects and then includes the real graph.

use crate::core::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Suffix appended to the real ninja file path
pub const TEMP_NINJA_SUFFIX: &str = ".tmp_commands";

/// Resolve a possibly relative ninja file against the source root
pub fn resolve_ninja_path(ninja_file: &Path, source_root: &Path) -> PathBuf {
    if ninja_file.is_absolute() {
        ninja_file.to_path_buf()
    } else {
        source_root.join(ninja_file)
    }
}

fn wrapper_contents(ninja_file: &Path) -> String {
    format!(
        "\npool highmem_pool\n  depth = 1\nsubninja {}\n",
        ninja_file.display()
    )
}

/// Write `<ninja_file>.tmp_commands` next to the real ninja file and return its path.
///
/// The file is overwritten on every run and left in place afterwards.
pub fn create_temp_ninja_file(ninja_file: &Path, source_root: &Path) -> Result<PathBuf> {
    let ninja_file = resolve_ninja_path(ninja_file, source_root);

    let mut temp_name = OsString::from(ninja_file.as_os_str());
    temp_name.push(TEMP_NINJA_SUFFIX);
    let temp_path = PathBuf::from(temp_name);

    std::fs::write(&temp_path, wrapper_contents(&ninja_file)).map_err(|source| {
        Error::NinjaFile {
            path: temp_path.clone(),
            source,
        }
    })?;

    debug!(path = %temp_path.display(), "Created temporary ninja file");
    Ok(temp_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relative_path_resolved_against_root() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("out")).unwrap();

        let path = create_temp_ninja_file(Path::new("out/combined.ninja"), temp.path()).unwrap();
        assert_eq!(path, temp.path().join("out/combined.ninja.tmp_commands"));

        let content = std::fs::read_to_string(&path).unwrap();
        let expected = format!(
            "\npool highmem_pool\n  depth = 1\nsubninja {}\n",
            temp.path().join("out/combined.ninja").display()
        );
        assert_eq!(content, expected);
    }

    #[test]
    fn test_absolute_path_kept() {
        let temp = TempDir::new().unwrap();
        let ninja = temp.path().join("build.ninja");

        let path = create_temp_ninja_file(&ninja, Path::new("/nonexistent-root")).unwrap();
        assert_eq!(path, temp.path().join("build.ninja.tmp_commands"));
    }

    #[test]
    fn test_overwrites_previous_file() {
        let temp = TempDir::new().unwrap();
        let ninja = temp.path().join("build.ninja");
        std::fs::write(temp.path().join("build.ninja.tmp_commands"), "stale").unwrap();

        let path = create_temp_ninja_file(&ninja, temp.path()).unwrap();
        assert!(!std::fs::read_to_string(path).unwrap().contains("stale"));
    }

    #[test]
    fn test_missing_directory_is_error() {
        let temp = TempDir::new().unwrap();
        let err = create_temp_ninja_file(Path::new("missing/dir/build.ninja"), temp.path())
            .unwrap_err();
        assert!(matches!(err, Error::NinjaFile { .. }));
    }
}
