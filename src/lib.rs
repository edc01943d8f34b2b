//! ninjadb - compilation databases for Android builds
//!
//! Given the arguments a build was started with, writes the compiler
//! invocations of the ninja targets that build touches to
//! `compile_commands.json`.

pub mod cli;
pub mod compdb;
pub mod core;
pub mod invocation;
pub mod ninja;
pub mod output;
pub mod pipeline;
pub mod proxy;
pub mod resolve;

pub use crate::compdb::{CommandDatabase, CompilerCommandInfo};
pub use crate::core::config::{Config, WrapperConfig};
pub use crate::core::env::EnvSnapshot;
pub use crate::core::error::{Error, Result};
pub use crate::invocation::{classify_invocation, CompileType, Invocation};
pub use crate::pipeline::RunSummary;
