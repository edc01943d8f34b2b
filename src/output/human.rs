//! Human-readable output formatting

use crate::invocation::{CompileType, Invocation};
use crate::pipeline::RunSummary;
use crate::resolve::{MatchStrategy, Resolution};

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

fn strategy_label(strategy: MatchStrategy) -> &'static str {
    match strategy {
        MatchStrategy::Exact => "exact",
        MatchStrategy::Fuzzy => "fuzzy",
        MatchStrategy::Unresolved => "unresolved",
    }
}

/// Format an extraction summary
pub fn format_summary(summary: &RunSummary) -> String {
    let mut output = format!("Detected compile type: {}\n", summary.compile_type);

    match summary.compile_type {
        CompileType::EnvCheck => {
            output.push_str("Environment check only, no compilation database written\n");
            return output;
        }
        CompileType::Full => {
            output.push_str("Full build mode: generating complete compilation database\n");
        }
        CompileType::Module => {
            output.push_str(&format!(
                "Module targets: {}\n",
                join_or_none(&summary.module_targets)
            ));
            if let Some(strategy) = summary.strategy {
                output.push_str(&format!(
                    "Resolved {} build targets ({})\n",
                    summary.resolved_targets,
                    strategy_label(strategy)
                ));
            }
        }
    }

    output.push_str(&format!(
        "Extracted {} compilation commands\n",
        summary.commands
    ));
    if let Some(path) = &summary.output_path {
        output.push_str(&format!(
            "Compilation command database has been written to: {}\n",
            path.display()
        ));
    }

    output
}

/// Format an invocation classification
pub fn format_invocation(invocation: &Invocation) -> String {
    let mut output = format!("Compile type: {}\n", invocation.compile_type);
    if invocation.compile_type == CompileType::Module {
        output.push_str(&format!(
            "Module targets: {}\n",
            join_or_none(&invocation.module_targets)
        ));
    }
    output
}

/// Format a target resolution, one build target per line
pub fn format_resolution(resolution: &Resolution) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Module targets: {}\n",
        join_or_none(&resolution.module_targets)
    ));
    output.push_str(&format!(
        "Expanded targets: {}\n",
        join_or_none(&resolution.expanded_targets)
    ));

    if resolution.targets.is_empty() {
        output.push_str("No build targets found\n");
        return output;
    }

    output.push_str(&format!(
        "Found {} build targets ({}):\n",
        resolution.targets.len(),
        strategy_label(resolution.strategy)
    ));
    for target in &resolution.targets {
        output.push_str(&format!("  {}\n", target));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_module_summary() {
        let summary = RunSummary {
            compile_type: CompileType::Module,
            module_targets: vec!["libutils".to_string()],
            strategy: Some(MatchStrategy::Fuzzy),
            resolved_targets: 2,
            commands: 7,
            output_path: Some(PathBuf::from("/aosp/out/compile_commands.json")),
        };
        let text = format_summary(&summary);
        assert!(text.starts_with("Detected compile type: module\n"));
        assert!(text.contains("Resolved 2 build targets (fuzzy)"));
        assert!(text.contains("Extracted 7 compilation commands"));
        assert!(text.contains("written to: /aosp/out/compile_commands.json"));
    }

    #[test]
    fn test_env_check_summary() {
        let summary = RunSummary {
            compile_type: CompileType::EnvCheck,
            module_targets: Vec::new(),
            strategy: None,
            resolved_targets: 0,
            commands: 0,
            output_path: None,
        };
        let text = format_summary(&summary);
        assert!(text.contains("no compilation database written"));
        assert!(!text.contains("Extracted"));
    }

    #[test]
    fn test_empty_resolution() {
        let resolution = Resolution {
            module_targets: vec!["libnothing".to_string()],
            expanded_targets: vec!["libnothing".to_string(), "nothing".to_string()],
            targets: Vec::new(),
            strategy: MatchStrategy::Unresolved,
        };
        let text = format_resolution(&resolution);
        assert!(text.contains("Expanded targets: libnothing, nothing"));
        assert!(text.ends_with("No build targets found\n"));
    }
}
