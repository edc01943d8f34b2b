//! Extract command implementation

use crate::cli::{capture_env, ExtractArgs, OutputFormat};
use crate::core::config::{Config, WrapperConfig};
use crate::core::error::Result;
use crate::ninja::NinjaRunner;
use crate::output::format_summary;
use crate::pipeline;
use crate::proxy::run_proxy;
use tracing::info;

/// Run the extract command
pub fn run(args: ExtractArgs) -> Result<()> {
    let config = Config::load()?;
    let env = capture_env(args.graph.source_root)?;
    let source_root = env.source_root().to_path_buf();

    let mut wrapper = WrapperConfig::new(
        &config,
        source_root.join(&args.out_dir),
        args.graph.ninja_file,
        args.build_args,
    );
    if let Some(tool) = args.graph.ninja_tool {
        wrapper = wrapper.with_ninja_tool(tool);
    }
    if args.no_proxy {
        wrapper = wrapper.with_proxy(false);
    }
    info!(
        root = %source_root.display(),
        out_dir = %wrapper.out_dir.display(),
        args = ?wrapper.build_arguments,
        "Starting extraction"
    );

    let runner = NinjaRunner::prepare(&wrapper.ninja_tool, &wrapper.ninja_file, &source_root)?;
    let summary = pipeline::run(&wrapper, &env, &runner)?;

    print!(
        "{}",
        format_summary(&summary, OutputFormat::from_json_flag(args.json))
    );

    if summary.output_path.is_some() && wrapper.run_proxy {
        run_proxy(
            &wrapper.proxy_tool,
            &source_root,
            &wrapper.output_file_name,
            &wrapper.out_dir,
        )?;
    }

    Ok(())
}
