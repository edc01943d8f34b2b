//! Build invocation classification
//!
//! Decides from the arguments typed to the build wrapper which kind of build
//! was requested and, for module builds, which modules it names.

use crate::core::env::EnvSnapshot;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Single-argument commands that only inspect the build environment
const ENV_CHECK_COMMANDS: &[&str] = &["nothing", "showcommands", "dumpvars"];

/// Make-style directory target marker, e.g. `MODULES-IN-system-core`
const MODULES_IN_PREFIX: &str = "MODULES-IN-";

/// Build the module in the current directory
const MM: &str = "mm";

/// Build modules in the listed directories
const MMM: &str = "mmm";

const BUILD_SCRIPT: &str = "./build.sh";
const BUILD_SCRIPT_SUFFIX: &str = "/build.sh";

/// Leading build commands skipped before module names
const BUILD_COMMANDS: &[&str] = &["m", "make"];

/// Kind of build requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompileType {
    Full,
    Module,
    EnvCheck,
}

impl CompileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompileType::Full => "full",
            CompileType::Module => "module",
            CompileType::EnvCheck => "env_check",
        }
    }
}

impl fmt::Display for CompileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a build invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub compile_type: CompileType,
    /// Directory paths or module names, only for module builds
    pub module_targets: Vec<String>,
}

impl Invocation {
    fn full() -> Self {
        Self {
            compile_type: CompileType::Full,
            module_targets: Vec::new(),
        }
    }

    fn env_check() -> Self {
        Self {
            compile_type: CompileType::EnvCheck,
            module_targets: Vec::new(),
        }
    }

    fn module(targets: Vec<String>) -> Self {
        Self {
            compile_type: CompileType::Module,
            module_targets: targets,
        }
    }
}

/// Classify a build invocation; rules are applied in order, first match wins
pub fn classify_invocation(build_args: &[String], env: &EnvSnapshot) -> Invocation {
    if build_args.is_empty() {
        debug!("No build arguments provided, assuming full build");
        return Invocation::full();
    }

    if build_args.len() == 1 && ENV_CHECK_COMMANDS.contains(&build_args[0].as_str()) {
        info!(command = %build_args[0], "Environment check command detected");
        return Invocation::env_check();
    }

    if let Some(dir) = build_args
        .iter()
        .find_map(|arg| arg.strip_prefix(MODULES_IN_PREFIX))
    {
        let target = dir.replace('-', "/");
        debug!(target = %target, "Module directory build detected");
        return Invocation::module(vec![target]);
    }

    for (i, arg) in build_args.iter().enumerate() {
        match arg.as_str() {
            MM => return Invocation::module(mm_targets(env)),
            MMM => {
                let rest = &build_args[i + 1..];
                let targets = if !rest.is_empty() {
                    rest.to_vec()
                } else {
                    mmm_fallback_targets(env)
                };
                debug!(targets = ?targets, "mmm command detected");
                return Invocation::module(targets);
            }
            _ => {}
        }
    }

    let first = build_args[0].as_str();
    if first == BUILD_SCRIPT || first.ends_with(BUILD_SCRIPT_SUFFIX) {
        return match build_args.get(1) {
            Some(module) if !module.starts_with('-') => {
                debug!(module = %module, "build.sh module build detected");
                Invocation::module(vec![module.clone()])
            }
            _ => {
                debug!("build.sh full build detected");
                Invocation::full()
            }
        };
    }

    if first != "all" {
        let start = usize::from(BUILD_COMMANDS.contains(&first));
        let targets: Vec<String> = build_args[start..]
            .iter()
            .filter(|arg| !arg.starts_with('-'))
            .cloned()
            .collect();
        if !targets.is_empty() {
            debug!(targets = ?targets, "Module build detected");
            return Invocation::module(targets);
        }
    }

    debug!(args = ?build_args, "Full build mode detected");
    Invocation::full()
}

/// Targets for `mm`: cwd relative to the tree, else the one-shot makefile
/// directory, else the cwd name. At the tree root no target is produced.
fn mm_targets(env: &EnvSnapshot) -> Vec<String> {
    if env.is_inside_tree() {
        return match env.cwd_relative_to_top() {
            Some(rel) => {
                debug!(dir = %rel, "mm command detected in directory");
                vec![rel]
            }
            None => {
                debug!("mm command executed at source root");
                Vec::new()
            }
        };
    }

    if let Some(dir) = env.one_shot_dir() {
        debug!(dir = %dir, "mm command with one-shot makefile");
        return vec![dir];
    }

    let name = env.cwd_base_name();
    debug!(dir = %name, "mm command, using current directory name");
    vec![name]
}

fn mmm_fallback_targets(env: &EnvSnapshot) -> Vec<String> {
    let modules = env.module_list();
    if !modules.is_empty() {
        return modules;
    }
    vec![env.cwd_base_name()]
}

/// Infer module targets when a module build named none.
///
/// Combines the one-shot makefile directory and the module list; without
/// either, the cwd relative to the tree or the cwd name is used.
pub fn detect_module_targets(env: &EnvSnapshot) -> Vec<String> {
    let mut targets: Vec<String> = env.one_shot_dir().into_iter().collect();
    targets.extend(env.module_list());

    if targets.is_empty() {
        let fallback = env
            .cwd_relative_to_top()
            .unwrap_or_else(|| env.cwd_base_name());
        targets.push(fallback);
    }

    info!(targets = ?targets, "Detected module targets");
    targets
}
