//! Configuration management

use crate::core::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the final compilation database file
pub const COMPILE_COMMANDS_FILE: &str = "compile_commands.json";

/// Default graph executor binary
pub const DEFAULT_NINJA_TOOL: &str = "distninja";

/// Default downstream consumer binary
pub const DEFAULT_PROXY_TOOL: &str = "proxy";

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub output: OutputConfig,
    pub resolve: ResolveConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Ninja-compatible executor used for `-t compdb`, `-t compdb-targets`, `-t targets`
    pub ninja: String,
    /// Consumer invoked after the database is written
    pub proxy: String,
    /// Run the consumer at all
    pub run_proxy: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File name of the database inside the output directory
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Substrings marking analysis-only targets (never real build artifacts)
    pub auxiliary_markers: Vec<String>,
    /// Query the whole graph when both exact and fuzzy resolution miss
    pub fallback_to_full: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ninja: DEFAULT_NINJA_TOOL.to_string(),
            proxy: DEFAULT_PROXY_TOOL.to_string(),
            run_proxy: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: COMPILE_COMMANDS_FILE.to_string(),
        }
    }
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            auxiliary_markers: vec![
                ".tidy".to_string(),
                ".lint".to_string(),
                ".analyze".to_string(),
            ],
            fallback_to_full: false,
        }
    }
}

impl Config {
    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file, falling back to defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = Self::ninjadb_home()?;
        Ok(home.join("config.toml"))
    }

    /// Get the ninjadb home directory
    pub fn ninjadb_home() -> Result<PathBuf> {
        // Check NINJADB_HOME env var first
        if let Ok(home) = std::env::var("NINJADB_HOME") {
            return Ok(PathBuf::from(home));
        }

        ProjectDirs::from("dev", "ninjadb", "ninjadb")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| Error::ConfigError {
                message: "Could not determine ninjadb home directory".to_string(),
            })
    }
}

/// Settings for a single extraction run.
///
/// Built once from [`Config`] plus command-line overrides and never mutated
/// afterwards.
#[derive(Debug, Clone)]
pub struct WrapperConfig {
    /// Directory receiving the database
    pub out_dir: PathBuf,
    /// The real build graph file the executor should load
    pub ninja_file: PathBuf,
    pub ninja_tool: String,
    pub proxy_tool: String,
    pub run_proxy: bool,
    pub output_file_name: String,
    pub auxiliary_markers: Vec<String>,
    pub fallback_to_full: bool,
    /// Arguments the developer passed to the build wrapper
    pub build_arguments: Vec<String>,
}

impl WrapperConfig {
    pub fn new(
        config: &Config,
        out_dir: PathBuf,
        ninja_file: PathBuf,
        build_arguments: Vec<String>,
    ) -> Self {
        Self {
            out_dir,
            ninja_file,
            ninja_tool: config.tools.ninja.clone(),
            proxy_tool: config.tools.proxy.clone(),
            run_proxy: config.tools.run_proxy,
            output_file_name: config.output.file_name.clone(),
            auxiliary_markers: config.resolve.auxiliary_markers.clone(),
            fallback_to_full: config.resolve.fallback_to_full,
            build_arguments,
        }
    }

    /// Override the executor binary
    pub fn with_ninja_tool(mut self, tool: impl Into<String>) -> Self {
        self.ninja_tool = tool.into();
        self
    }

    /// Enable or disable the downstream consumer
    pub fn with_proxy(mut self, run_proxy: bool) -> Self {
        self.run_proxy = run_proxy;
        self
    }

    /// Final path of the database file
    pub fn output_path(&self) -> PathBuf {
        self.out_dir.join(&self.output_file_name)
    }
}
