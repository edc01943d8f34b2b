//! Compilation database model
//!
//! Turns the loosely typed records printed by the executor's compdb tools
//! into [`CompilerCommandInfo`] values and collects them into a
//! [`CommandDatabase`].

pub mod compiler;
pub mod database;
pub mod entry;
pub mod module_name;
pub mod tokenize;

pub use database::CommandDatabase;
pub use entry::{parse_compdb_entry, parse_compdb_output, CompilerCommandInfo, Field, RawCompdbEntry};
