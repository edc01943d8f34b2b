//! Resolve command implementation

use crate::cli::{capture_env, OutputFormat, ResolveArgs};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::invocation::{classify_invocation, CompileType};
use crate::ninja::NinjaRunner;
use crate::output::{format_invocation, format_resolution};
use crate::resolve::resolve_module_targets;

/// Run the resolve command
pub fn run(args: ResolveArgs) -> Result<()> {
    let config = Config::load()?;
    let env = capture_env(args.graph.source_root)?;
    let format = OutputFormat::from_json_flag(args.json);

    let invocation = classify_invocation(&args.build_args, &env);
    if invocation.compile_type != CompileType::Module {
        // nothing to resolve, the whole graph (or nothing) is queried
        print!("{}", format_invocation(&invocation, format));
        return Ok(());
    }

    let tool = args
        .graph
        .ninja_tool
        .unwrap_or_else(|| config.tools.ninja.clone());
    let runner = NinjaRunner::prepare(&tool, &args.graph.ninja_file, env.source_root())?;

    let resolution = resolve_module_targets(
        &runner,
        &invocation.module_targets,
        &env,
        &config.resolve.auxiliary_markers,
    );
    print!("{}", format_resolution(&resolution, format));
    Ok(())
}
