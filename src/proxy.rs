//! Downstream consumer hand-off

use crate::core::error::{Error, Result};
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Run `<tool> -w <source_root> -c <file_name>` from `out_dir`.
///
/// The consumer shares our stdout and stderr. A non-zero exit is an error.
pub fn run_proxy(tool: &str, source_root: &Path, file_name: &str, out_dir: &Path) -> Result<()> {
    info!(tool = %tool, root = %source_root.display(), "Running proxy command");

    let status = Command::new(tool)
        .arg("-w")
        .arg(source_root)
        .arg("-c")
        .arg(file_name)
        .current_dir(out_dir)
        .status()
        .map_err(|e| Error::Proxy {
            message: format!("failed to start {}: {}", tool, e),
        })?;

    if !status.success() {
        return Err(Error::Proxy {
            message: format!("{} exited with {}", tool, status),
        });
    }

    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_tool() {
        let temp = TempDir::new().unwrap();
        let err = run_proxy(
            "ninjadb-no-such-proxy",
            temp.path(),
            "compile_commands.json",
            temp.path(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Proxy { .. }));
    }

    #[test]
    fn test_exit_status() {
        let temp = TempDir::new().unwrap();
        assert!(run_proxy("true", temp.path(), "compile_commands.json", temp.path()).is_ok());

        let err = run_proxy("false", temp.path(), "compile_commands.json", temp.path()).unwrap_err();
        assert!(err.to_string().contains("false exited with"));
    }
}
