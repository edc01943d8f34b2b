//! The assembled command database and its on-disk form

use super::entry::CompilerCommandInfo;
use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ordered set of normalized commands, unique by (command, output, inputs)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandDatabase {
    commands: Vec<CompilerCommandInfo>,
    #[serde(skip)]
    seen: HashSet<(String, String, String)>,
}

impl CommandDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record.
    ///
    /// Returns false when the record lacks a compiler or inputs, or
    /// duplicates one already present.
    pub fn insert(&mut self, info: CompilerCommandInfo) -> bool {
        if !info.is_retained() {
            return false;
        }
        if !self.seen.insert(info.dedup_key()) {
            debug!(output = %info.output_file, "Skipping duplicate command");
            return false;
        }
        self.commands.push(info);
        true
    }

    /// Merge another database, keeping first occurrences
    pub fn extend(&mut self, other: CommandDatabase) {
        for info in other.commands {
            self.insert(info);
        }
    }

    pub fn commands(&self) -> &[CompilerCommandInfo] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Persist as indented JSON at `out_dir/file_name`.
    ///
    /// The content goes to a uniquely named temporary file in `out_dir`
    /// first and is renamed over the final path, so a reader never sees a
    /// partial file. The temporary file is removed if the rename fails.
    pub fn write(&self, out_dir: &Path, file_name: &str) -> Result<PathBuf> {
        let final_path = out_dir.join(file_name);
        let write_err = |message: String| Error::Write {
            path: final_path.clone(),
            message,
        };

        std::fs::create_dir_all(out_dir)
            .map_err(|e| write_err(format!("failed to create output directory: {}", e)))?;

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| write_err(format!("JSON encoding failed: {}", e)))?;

        let mut temp = tempfile::Builder::new()
            .prefix(".compile_commands")
            .suffix(".tmp")
            .tempfile_in(out_dir)
            .map_err(|e| write_err(format!("failed to create temporary file: {}", e)))?;

        temp.write_all(json.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| write_err(format!("failed to write temporary file: {}", e)))?;

        temp.persist(&final_path).map_err(|e| {
            let message = format!("failed to rename file: {}", e.error);
            let _ = e.file.close();
            write_err(message)
        })?;

        Ok(final_path)
    }

    /// Read a database previously produced by [`CommandDatabase::write`]
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut db: CommandDatabase = serde_json::from_str(&content)?;
        db.seen = db.commands.iter().map(|c| c.dedup_key()).collect();
        Ok(db)
    }
}
