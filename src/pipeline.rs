//! Extraction pipeline
//!
//! Turns a build invocation into a written compilation database. Only the
//! final write can fail a run here; executor trouble on individual calls is
//! logged and skipped.

use crate::compdb::{parse_compdb_entry, parse_compdb_output, CommandDatabase};
use crate::core::config::WrapperConfig;
use crate::core::env::EnvSnapshot;
use crate::core::error::Result;
use crate::invocation::{classify_invocation, CompileType};
use crate::ninja::{resolve_ninja_path, GraphExecutor};
use crate::resolve::{resolve_module_targets, MatchStrategy};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// What a run did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub compile_type: CompileType,
    pub module_targets: Vec<String>,
    /// Absent for full builds and environment checks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<MatchStrategy>,
    pub resolved_targets: usize,
    pub commands: usize,
    /// Absent when nothing was written
    pub output_path: Option<PathBuf>,
}

/// Run the whole extraction and write the database
pub fn run(
    config: &WrapperConfig,
    env: &EnvSnapshot,
    executor: &dyn GraphExecutor,
) -> Result<RunSummary> {
    let invocation = classify_invocation(&config.build_arguments, env);
    info!(
        compile_type = %invocation.compile_type,
        targets = ?invocation.module_targets,
        "Classified build invocation"
    );

    let source_root = env.source_root().to_string_lossy().to_string();
    let mut summary = RunSummary {
        compile_type: invocation.compile_type,
        module_targets: invocation.module_targets.clone(),
        strategy: None,
        resolved_targets: 0,
        commands: 0,
        output_path: None,
    };

    let db = match invocation.compile_type {
        CompileType::EnvCheck => {
            info!("Environment check only, skipping compilation database");
            return Ok(summary);
        }
        CompileType::Full => collect_all(executor, &source_root),
        CompileType::Module => {
            let resolution = resolve_module_targets(
                executor,
                &invocation.module_targets,
                env,
                &config.auxiliary_markers,
            );
            summary.module_targets = resolution.module_targets;
            summary.strategy = Some(resolution.strategy);
            summary.resolved_targets = resolution.targets.len();

            if resolution.targets.is_empty() {
                if config.fallback_to_full {
                    info!("No targets resolved, falling back to the whole graph");
                    collect_all(executor, &source_root)
                } else {
                    warn!("No targets resolved, writing an empty compilation database");
                    CommandDatabase::new()
                }
            } else {
                let ninja_dir = resolve_ninja_path(&config.ninja_file, env.source_root())
                    .parent()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_else(|| source_root.clone());
                collect_for_targets(executor, &resolution.targets, &ninja_dir)
            }
        }
    };

    let path = db.write(&config.out_dir, &config.output_file_name)?;
    info!(path = %path.display(), commands = db.len(), "Wrote compilation database");

    summary.commands = db.len();
    summary.output_path = Some(path);
    Ok(summary)
}

/// Records for the whole graph from one `-t compdb` call
pub fn collect_all(executor: &dyn GraphExecutor, default_working_dir: &str) -> CommandDatabase {
    let mut db = CommandDatabase::new();
    match executor.compdb() {
        Ok(output) => {
            let added = add_records(&mut db, &output, default_working_dir);
            info!(commands = added, "Collected compile commands for full build");
        }
        Err(e) => warn!(error = %e, "Failed to get compdb output"),
    }
    db
}

/// Records for each target, merged in target order.
///
/// A failing target is logged and skipped. An empty target list queries
/// the whole graph instead.
pub fn collect_for_targets(
    executor: &dyn GraphExecutor,
    targets: &[String],
    default_working_dir: &str,
) -> CommandDatabase {
    if targets.is_empty() {
        return collect_all(executor, default_working_dir);
    }

    let mut db = CommandDatabase::new();
    for target in targets {
        match executor.compdb_targets(target) {
            Ok(output) => {
                let added = add_records(&mut db, &output, default_working_dir);
                debug!(target = %target, commands = added, "Collected target commands");
            }
            Err(e) => warn!(target = %target, error = %e, "Failed to get compdb for target"),
        }
    }

    info!(
        targets = targets.len(),
        commands = db.len(),
        "Collected compile commands for module build"
    );
    db
}

/// Normalize one executor response into `db`, returning how many records were kept
fn add_records(db: &mut CommandDatabase, output: &[u8], default_working_dir: &str) -> usize {
    let entries = match parse_compdb_output(output) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Failed to parse compdb JSON");
            return 0;
        }
    };

    let mut added = 0;
    for entry in &entries {
        if db.insert(parse_compdb_entry(entry, default_working_dir)) {
            added += 1;
        }
    }
    added
}
