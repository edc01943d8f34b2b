//! Build graph executor access
//!
//! The graph itself is never parsed here. Everything we know about it comes
//! from three executor subcommands, abstracted behind [`GraphExecutor`] so
//! the pipeline can be driven by a fake in tests.

pub mod runner;
pub mod wrapper_file;

pub use runner::{check_tool_exists, NinjaRunner};
pub use wrapper_file::{create_temp_ninja_file, resolve_ninja_path};

use crate::core::error::Result;

/// Queries against a ninja-compatible build graph
pub trait GraphExecutor {
    /// Raw `-t compdb` output for the whole graph
    fn compdb(&self) -> Result<Vec<u8>>;

    /// Raw `-t compdb-targets <target>` output
    fn compdb_targets(&self, target: &str) -> Result<Vec<u8>>;

    /// Every target name known to the graph (`-t targets`)
    fn targets(&self) -> Result<Vec<String>>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::GraphExecutor;
    use crate::core::error::{Error, Result};
    use std::cell::{Cell, RefCell};
    use std::collections::{HashMap, HashSet};

    /// In-memory executor with canned responses
    #[derive(Default)]
    pub struct FakeExecutor {
        compdb: Option<Vec<u8>>,
        per_target: HashMap<String, Vec<u8>>,
        failing: HashSet<String>,
        targets: Option<Vec<String>>,
        compdb_calls: Cell<usize>,
        targets_calls: Cell<usize>,
        queried: RefCell<Vec<String>>,
    }

    fn failure(args: &str) -> Error {
        Error::Subprocess {
            tool: "fake".to_string(),
            args: args.to_string(),
            message: "exit status: 1".to_string(),
        }
    }

    impl FakeExecutor {
        pub fn new() -> Self {
            Self {
                targets: Some(Vec::new()),
                ..Default::default()
            }
        }

        pub fn with_compdb(mut self, json: &str) -> Self {
            self.compdb = Some(json.as_bytes().to_vec());
            self
        }

        pub fn with_target_compdb(mut self, target: &str, json: &str) -> Self {
            self.per_target
                .insert(target.to_string(), json.as_bytes().to_vec());
            self
        }

        pub fn failing_target(mut self, target: &str) -> Self {
            self.failing.insert(target.to_string());
            self
        }

        pub fn with_targets(mut self, targets: &[&str]) -> Self {
            self.targets = Some(targets.iter().map(|t| t.to_string()).collect());
            self
        }

        pub fn failing_targets(mut self) -> Self {
            self.targets = None;
            self
        }

        pub fn compdb_calls(&self) -> usize {
            self.compdb_calls.get()
        }

        pub fn targets_calls(&self) -> usize {
            self.targets_calls.get()
        }

        /// Targets passed to `compdb_targets`, in call order
        pub fn queried_targets(&self) -> Vec<String> {
            self.queried.borrow().clone()
        }
    }

    impl GraphExecutor for FakeExecutor {
        fn compdb(&self) -> Result<Vec<u8>> {
            self.compdb_calls.set(self.compdb_calls.get() + 1);
            self.compdb.clone().ok_or_else(|| failure("-t compdb"))
        }

        fn compdb_targets(&self, target: &str) -> Result<Vec<u8>> {
            self.queried.borrow_mut().push(target.to_string());
            if self.failing.contains(target) {
                return Err(failure("-t compdb-targets"));
            }
            Ok(self
                .per_target
                .get(target)
                .cloned()
                .unwrap_or_else(|| b"[]".to_vec()))
        }

        fn targets(&self) -> Result<Vec<String>> {
            self.targets_calls.set(self.targets_calls.get() + 1);
            self.targets.clone().ok_or_else(|| failure("-t targets"))
        }
    }
}
