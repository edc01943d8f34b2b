//! Normalization of raw executor compdb records

use super::compiler::compiler_type_from_command;
use super::module_name::extract_module_name_from_path;
use super::tokenize::split_command_line;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// A known key of a raw record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    /// Key not present
    Absent,
    /// Key present with the expected shape
    Present(T),
    /// Key present but holding some other JSON type
    WrongType,
}

impl<T> Field<T> {
    pub fn present(self) -> Option<T> {
        match self {
            Field::Present(v) => Some(v),
            Field::Absent | Field::WrongType => None,
        }
    }

    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Field::Present(v) => Field::Present(v),
            Field::Absent => Field::Absent,
            Field::WrongType => Field::WrongType,
        }
    }

    pub fn is_wrong_type(&self) -> bool {
        matches!(self, Field::WrongType)
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Field<String> {
    match map.get(key) {
        None => Field::Absent,
        Some(Value::String(s)) => Field::Present(s.clone()),
        Some(_) => Field::WrongType,
    }
}

/// List of strings; non-string items are skipped
fn string_list_field(map: &Map<String, Value>, key: &str) -> Field<Vec<String>> {
    match map.get(key) {
        None => Field::Absent,
        Some(Value::Array(items)) => Field::Present(
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        ),
        Some(_) => Field::WrongType,
    }
}

/// One record as emitted by `-t compdb` / `-t compdb-targets`.
///
/// Executor versions disagree on key names, so every known key is kept as a
/// separate [`Field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCompdbEntry {
    pub command: Field<String>,
    pub directory: Field<String>,
    pub file: Field<String>,
    pub input_files: Field<Vec<String>>,
    pub sources: Field<Vec<String>>,
    pub output: Field<String>,
    pub target: Field<String>,
}

impl RawCompdbEntry {
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            command: string_field(map, "command"),
            directory: string_field(map, "directory"),
            file: string_field(map, "file"),
            input_files: string_list_field(map, "input_files"),
            sources: string_list_field(map, "sources"),
            output: string_field(map, "output"),
            target: string_field(map, "target"),
        }
    }

    /// Names of keys that were present with an unexpected type
    pub fn mistyped_keys(&self) -> Vec<&'static str> {
        let checks = [
            ("command", self.command.is_wrong_type()),
            ("directory", self.directory.is_wrong_type()),
            ("file", self.file.is_wrong_type()),
            ("input_files", self.input_files.is_wrong_type()),
            ("sources", self.sources.is_wrong_type()),
            ("output", self.output.is_wrong_type()),
            ("target", self.target.is_wrong_type()),
        ];
        checks
            .into_iter()
            .filter(|(_, wrong)| *wrong)
            .map(|(key, _)| key)
            .collect()
    }
}

/// A normalized compiler invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerCommandInfo {
    /// Original complete command
    pub command: String,
    /// Canonical compiler identity (clang, g++, javac, ...)
    pub compiler_type: String,
    pub input_files: Vec<String>,
    pub output_file: String,
    /// Flags other than includes, defines and `-o`
    pub flags: Vec<String>,
    pub includes: Vec<String>,
    /// `NAME` or `NAME=VALUE`
    pub defines: Vec<String>,
    pub working_dir: String,
    /// Best-effort module name inferred from the output path
    pub module: String,
}

impl CompilerCommandInfo {
    /// Whether this record may enter a database
    pub fn is_retained(&self) -> bool {
        !self.compiler_type.is_empty() && !self.input_files.is_empty()
    }

    /// Identity used for deduplication
    pub fn dedup_key(&self) -> (String, String, String) {
        (
            self.command.clone(),
            self.output_file.clone(),
            self.input_files.join(","),
        )
    }

    /// Split the command into includes, defines and remaining flags
    fn partition_arguments(&mut self) {
        let args = split_command_line(&self.command);
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            if let Some(path) = arg.strip_prefix("-I") {
                if !path.is_empty() {
                    self.includes.push(path.to_string());
                } else if let Some(next) = iter.next() {
                    self.includes.push(next);
                }
            } else if let Some(def) = arg.strip_prefix("-D") {
                if !def.is_empty() {
                    self.defines.push(def.to_string());
                } else if let Some(next) = iter.next() {
                    self.defines.push(next);
                }
            } else if arg.starts_with('-') && arg != "-o" {
                self.flags.push(arg);
            }
        }
    }
}

/// Normalize one raw record.
///
/// `default_working_dir` is used unless the record carries a non-empty
/// `directory`.
pub fn parse_compdb_entry(entry: &RawCompdbEntry, default_working_dir: &str) -> CompilerCommandInfo {
    let mistyped = entry.mistyped_keys();
    if !mistyped.is_empty() {
        debug!(keys = ?mistyped, "Ignoring compdb keys with unexpected types");
    }

    let mut info = CompilerCommandInfo {
        working_dir: default_working_dir.to_string(),
        ..Default::default()
    };

    if let Some(command) = entry.command.clone().present() {
        info.command = command;
    }

    if let Field::Present(dir) = entry.directory.as_ref() {
        if !dir.is_empty() {
            info.working_dir = dir.clone();
        }
    }

    info.input_files = if let Some(file) = entry.file.clone().present() {
        vec![file]
    } else if let Some(files) = entry.input_files.clone().present() {
        files
    } else {
        entry.sources.clone().present().unwrap_or_default()
    };

    info.output_file = entry
        .output
        .clone()
        .present()
        .or_else(|| entry.target.clone().present())
        .unwrap_or_default();

    info.compiler_type = compiler_type_from_command(&info.command);

    if !info.command.is_empty() {
        info.partition_arguments();
    }

    if !info.output_file.is_empty() {
        info.module = extract_module_name_from_path(&info.output_file);
    }

    info
}

/// Parse executor compdb output into raw records.
///
/// The top level must be an array; elements that are not objects are skipped.
pub fn parse_compdb_output(bytes: &[u8]) -> serde_json::Result<Vec<RawCompdbEntry>> {
    let values: Vec<Value> = serde_json::from_slice(bytes)?;
    Ok(values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match value {
            Value::Object(map) => Some(RawCompdbEntry::from_map(map)),
            other => {
                debug!(index, value = %other, "Skipping non-object compdb record");
                None
            }
        })
        .collect())
}
