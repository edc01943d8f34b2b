//! Output formatting

pub mod human;
pub mod json;

use crate::cli::OutputFormat;
use crate::invocation::Invocation;
use crate::pipeline::RunSummary;
use crate::resolve::Resolution;

/// Format an extraction summary for output
pub fn format_summary(summary: &RunSummary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => human::format_summary(summary),
        OutputFormat::Json => json::format(summary),
    }
}

/// Format an invocation classification for output
pub fn format_invocation(invocation: &Invocation, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => human::format_invocation(invocation),
        OutputFormat::Json => json::format(invocation),
    }
}

/// Format a target resolution for output
pub fn format_resolution(resolution: &Resolution, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => human::format_resolution(resolution),
        OutputFormat::Json => json::format(resolution),
    }
}
