//! Classify command implementation

use crate::cli::{capture_env, ClassifyArgs, OutputFormat};
use crate::core::error::Result;
use crate::invocation::classify_invocation;
use crate::output::format_invocation;

/// Run the classify command
pub fn run(args: ClassifyArgs) -> Result<()> {
    let env = capture_env(args.source_root)?;
    let invocation = classify_invocation(&args.build_args, &env);

    print!(
        "{}",
        format_invocation(&invocation, OutputFormat::from_json_flag(args.json))
    );
    Ok(())
}
