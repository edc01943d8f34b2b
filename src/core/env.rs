//! Build environment snapshot
//!
//! Everything the classifier and resolver need from the process environment
//! is captured here exactly once per run, so decision logic never reads
//! globals.

use crate::core::error::Result;
use std::path::{Path, PathBuf};

/// Source-tree root exported by `envsetup.sh`/`lunch`
pub const BUILD_TOP_VAR: &str = "ANDROID_BUILD_TOP";

/// Single makefile an `mm` invocation was scoped to
pub const ONE_SHOT_MAKEFILE_VAR: &str = "ONE_SHOT_MAKEFILE";

/// Whitespace-separated module list
pub const MODULES_VAR: &str = "MODULES";

/// Immutable view of the environment a build was invoked from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSnapshot {
    /// Source-tree root, if known
    pub build_top: Option<PathBuf>,
    /// Directory the build was invoked from
    pub cwd: PathBuf,
    pub one_shot_makefile: Option<String>,
    pub modules: Option<String>,
}

impl EnvSnapshot {
    /// Capture the current process environment
    pub fn capture() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self {
            build_top: non_empty_var(BUILD_TOP_VAR).map(PathBuf::from),
            cwd,
            one_shot_makefile: non_empty_var(ONE_SHOT_MAKEFILE_VAR),
            modules: non_empty_var(MODULES_VAR),
        })
    }

    /// Snapshot with only a working directory set
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            build_top: None,
            cwd: cwd.into(),
            one_shot_makefile: None,
            modules: None,
        }
    }

    pub fn with_build_top(mut self, build_top: impl Into<PathBuf>) -> Self {
        self.build_top = Some(build_top.into());
        self
    }

    pub fn with_one_shot_makefile(mut self, makefile: impl Into<String>) -> Self {
        self.one_shot_makefile = Some(makefile.into());
        self
    }

    pub fn with_modules(mut self, modules: impl Into<String>) -> Self {
        self.modules = Some(modules.into());
        self
    }

    /// Root the executor and the proxy run from: the build top, else the cwd
    pub fn source_root(&self) -> &Path {
        self.build_top.as_deref().unwrap_or(&self.cwd)
    }

    /// Whether the cwd lies inside the source tree (the root itself included)
    pub fn is_inside_tree(&self) -> bool {
        match &self.build_top {
            Some(top) => self.cwd.starts_with(top),
            None => false,
        }
    }

    /// Path of the cwd relative to the build top.
    ///
    /// `None` when there is no build top, the cwd lies outside it, or the cwd
    /// is the root itself.
    pub fn cwd_relative_to_top(&self) -> Option<String> {
        let top = self.build_top.as_ref()?;
        let rel = self.cwd.strip_prefix(top).ok()?;
        if rel.as_os_str().is_empty() {
            return None;
        }
        Some(rel.to_string_lossy().to_string())
    }

    /// Last component of the cwd
    pub fn cwd_base_name(&self) -> String {
        base_name(&self.cwd.to_string_lossy())
    }

    /// Directory of the one-shot makefile, `.` for a bare file name
    pub fn one_shot_dir(&self) -> Option<String> {
        let makefile = self.one_shot_makefile.as_deref()?;
        let dir = match Path::new(makefile).parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                parent.to_string_lossy().to_string()
            }
            _ => ".".to_string(),
        };
        Some(dir)
    }

    /// Module names from the module list variable
    pub fn module_list(&self) -> Vec<String> {
        self.modules
            .as_deref()
            .map(|m| m.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Final `/`-separated segment of a path string, ignoring trailing slashes
pub fn base_name(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { ".".to_string() } else { "/".to_string() };
    }
    trimmed
        .rsplit('/')
        .next()
        .unwrap_or(trimmed)
        .to_string()
}
