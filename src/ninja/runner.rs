//! Subprocess-backed executor

use super::wrapper_file::create_temp_ninja_file;
use super::GraphExecutor;
use crate::core::error::{Error, Result};
use crate::resolve::parse_targets_output;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Locate `tool` the way a shell started in `base_dir` would.
///
/// A tool given with a directory component is checked directly, relative
/// paths against `base_dir`; a bare name is searched in `path_var`
/// (normally the value of `PATH`).
pub fn check_tool_exists(
    tool: &str,
    path_var: Option<&OsStr>,
    base_dir: &Path,
) -> Result<PathBuf> {
    let not_found = || Error::ToolNotFound {
        tool: tool.to_string(),
    };

    let candidate = Path::new(tool);
    if candidate.components().count() > 1 {
        let candidate = base_dir.join(candidate);
        return if is_executable(&candidate) {
            Ok(candidate)
        } else {
            Err(not_found())
        };
    }

    let path_var = path_var.ok_or_else(not_found)?;
    std::env::split_paths(path_var)
        .map(|dir| dir.join(tool))
        .find(|path| is_executable(path))
        .ok_or_else(not_found)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Runs the executor binary against the intermediate ninja file
#[derive(Debug, Clone)]
pub struct NinjaRunner {
    tool: String,
    ninja_file: PathBuf,
    working_dir: PathBuf,
}

impl NinjaRunner {
    /// `ninja_file` is the intermediate file; every call runs in `working_dir`
    pub fn new(tool: impl Into<String>, ninja_file: PathBuf, working_dir: PathBuf) -> Self {
        Self {
            tool: tool.into(),
            ninja_file,
            working_dir,
        }
    }

    /// Runner for `ninja_file` working from `source_root`.
    ///
    /// A relative `tool` path is taken from `source_root`, where the executor
    /// runs. Fails when the executor is not installed or the intermediate
    /// ninja file cannot be written.
    pub fn prepare(tool: &str, ninja_file: &Path, source_root: &Path) -> Result<Self> {
        let path_var = std::env::var_os("PATH");
        let tool_path = check_tool_exists(tool, path_var.as_deref(), source_root)?;
        debug!(tool = %tool_path.display(), "Found executor");

        let temp_file = create_temp_ninja_file(ninja_file, source_root)?;
        info!(path = %temp_file.display(), "Temporary ninja file");

        let tool = if Path::new(tool).components().count() > 1 {
            tool_path.to_string_lossy().to_string()
        } else {
            tool.to_string()
        };
        Ok(Self::new(tool, temp_file, source_root.to_path_buf()))
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        let failure = |message: String| Error::Subprocess {
            tool: self.tool.clone(),
            args: args.join(" "),
            message,
        };

        debug!(tool = %self.tool, args = ?args, "Running executor");
        let output = Command::new(&self.tool)
            .arg("-f")
            .arg(&self.ninja_file)
            .args(args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| failure(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failure(format!("{}: {}", output.status, stderr.trim())));
        }

        Ok(output.stdout)
    }
}

impl GraphExecutor for NinjaRunner {
    fn compdb(&self) -> Result<Vec<u8>> {
        self.run(&["-t", "compdb"])
    }

    fn compdb_targets(&self, target: &str) -> Result<Vec<u8>> {
        self.run(&["-t", "compdb-targets", target])
    }

    fn targets(&self) -> Result<Vec<String>> {
        let output = self.run(&["-t", "targets"])?;
        Ok(parse_targets_output(&String::from_utf8_lossy(&output)))
    }
}
