//! Configuration, environment and error plumbing shared by every stage

pub mod config;
pub mod env;
pub mod error;
