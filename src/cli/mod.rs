//! CLI command definitions and handlers

pub mod classify;
pub mod extract;
pub mod resolve;

use crate::core::env::EnvSnapshot;
use crate::core::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const LONG_ABOUT: &str = r#"
Extract a compilation database from an Android build graph.

ninjadb looks at the arguments a build was started with (m, mm, mmm,
./build.sh, ...), works out which part of the ninja graph that build
touches, and writes the matching compiler invocations to
compile_commands.json.

COMMANDS:
    ninjadb extract -- <build args>     Write the compilation database
    ninjadb classify -- <build args>    Show how a build is classified
    ninjadb resolve -- <build args>     Show the graph targets a module build maps to

ENVIRONMENT:
    ANDROID_BUILD_TOP     Source tree root (falls back to the current directory)
    ONE_SHOT_MAKEFILE     Makefile an mm build was scoped to
    MODULES               Module list used when mmm names no directory
    NINJADB_HOME          Directory holding config.toml
    NINJADB_LOG           Log filter, e.g. NINJADB_LOG=ninjadb=debug

EXAMPLES:
    ninjadb extract                          Full tree database
    ninjadb extract -- m libutils            Database for libutils only
    ninjadb extract --no-proxy -- mmm system/core/init
    ninjadb classify --json -- mm
"#;

/// Default build graph, relative to the source root
pub const DEFAULT_NINJA_FILE: &str = "out/soong/build.ninja";

/// Default output directory, relative to the source root
pub const DEFAULT_OUT_DIR: &str = "out";

/// Compilation database extraction for Android builds
#[derive(Parser, Debug)]
#[command(name = "ninjadb")]
#[command(author, version)]
#[command(about = "Compilation database extraction for Android builds")]
#[command(long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract compile_commands.json for a build invocation
    #[command(visible_alias = "x")]
    Extract(ExtractArgs),

    /// Classify a build invocation without touching the build graph
    #[command(visible_alias = "c")]
    Classify(ClassifyArgs),

    /// Resolve a module build to build graph targets
    #[command(visible_alias = "r")]
    Resolve(ResolveArgs),
}

/// Build graph location and executor, shared by commands that query the graph
#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    /// Ninja file describing the build graph (relative to the source root)
    #[arg(long, default_value = DEFAULT_NINJA_FILE)]
    pub ninja_file: PathBuf,

    /// Executor binary (default from config, else distninja)
    #[arg(long)]
    pub ninja_tool: Option<String>,

    /// Source tree root (default: $ANDROID_BUILD_TOP)
    #[arg(long)]
    pub source_root: Option<PathBuf>,
}

/// Arguments for the extract command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    ninjadb extract                               Full build
    ninjadb extract -- m libutils                 Module build
    ninjadb extract -- mm                         Module in the current directory
    ninjadb extract --out-dir /tmp/db -- mmm frameworks/native
    ninjadb extract --no-proxy --json -- m libc   Skip the proxy, JSON summary")]
pub struct ExtractArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Output directory (relative to the source root)
    #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Do not run the proxy after writing the database
    #[arg(long)]
    pub no_proxy: bool,

    /// JSON output
    #[arg(long)]
    pub json: bool,

    /// Arguments the build was invoked with
    #[arg(last = true)]
    pub build_args: Vec<String>,
}

/// Arguments for the classify command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    ninjadb classify -- m libutils         module: libutils
    ninjadb classify -- mmm system/core    module: system/core
    ninjadb classify -- showcommands       env_check
    ninjadb classify --json                full")]
pub struct ClassifyArgs {
    /// Source tree root (default: $ANDROID_BUILD_TOP)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// JSON output
    #[arg(long)]
    pub json: bool,

    /// Arguments the build was invoked with
    #[arg(last = true)]
    pub build_args: Vec<String>,
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    ninjadb resolve -- m libutils
    ninjadb resolve --ninja-file out/combined.ninja -- mmm system/core/init")]
pub struct ResolveArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// JSON output
    #[arg(long)]
    pub json: bool,

    /// Arguments the build was invoked with
    #[arg(last = true)]
    pub build_args: Vec<String>,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Capture the environment, letting `--source-root` override `ANDROID_BUILD_TOP`
pub(crate) fn capture_env(source_root: Option<PathBuf>) -> Result<EnvSnapshot> {
    let env = EnvSnapshot::capture()?;
    Ok(match source_root {
        Some(root) => {
            let root = env.cwd.join(root);
            env.with_build_top(root)
        }
        None => env,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_args() {
        let cli = Cli::try_parse_from([
            "ninjadb", "extract", "--no-proxy", "--out-dir", "/tmp/db", "--", "m", "libutils", "-j8",
        ])
        .unwrap();
        match cli.command {
            Commands::Extract(args) => {
                assert!(args.no_proxy);
                assert_eq!(args.out_dir, PathBuf::from("/tmp/db"));
                assert_eq!(args.graph.ninja_file, PathBuf::from(DEFAULT_NINJA_FILE));
                assert_eq!(args.build_args, vec!["m", "libutils", "-j8"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_classify_without_build_args() {
        let cli = Cli::try_parse_from(["ninjadb", "classify", "--json"]).unwrap();
        match cli.command {
            Commands::Classify(args) => {
                assert!(args.json);
                assert!(args.build_args.is_empty());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_output_format() {
        assert_eq!(OutputFormat::from_json_flag(true), OutputFormat::Json);
        assert_eq!(OutputFormat::from_json_flag(false), OutputFormat::Human);
    }
}
