//! Module target resolution
//!
//! Maps human module names and directories onto build-graph target names.
//! A precise pass runs first; the case-insensitive fuzzy pass only runs when
//! the precise pass finds nothing at all.

use crate::core::env::{base_name, EnvSnapshot};
use crate::invocation::detect_module_targets;
use crate::ninja::GraphExecutor;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Conventional library module name prefix
const LIB_PREFIX: &str = "lib";

/// Make output categories that prefix module names in target paths
const MODULE_CATEGORIES: &[&str] = &[
    "SHARED_LIBRARIES",
    "STATIC_LIBRARIES",
    "EXECUTABLES",
    "APPS",
];

/// `libfoo` becomes `foo`, `foo` becomes `libfoo`
pub fn toggle_lib_prefix(name: &str) -> String {
    match name.strip_prefix(LIB_PREFIX) {
        Some(stripped) => stripped.to_string(),
        None => format!("{}{}", LIB_PREFIX, name),
    }
}

/// Expand module targets into the naming variants the build graph may use
pub fn expand_module_targets(targets: &[String]) -> Vec<String> {
    let mut expanded = Vec::with_capacity(targets.len() * 4);

    for target in targets {
        expanded.push(target.clone());

        // system/core/init -> system_core_init
        if target.contains('/') {
            expanded.push(target.replace('/', "_"));
        }

        let base = base_name(target);
        if &base != target {
            expanded.push(base.clone());
        }

        expanded.push(toggle_lib_prefix(&base));
    }

    expanded
}

/// Targets related to `module`: containing it verbatim, containing each of
/// its `/` components, or containing its base name
pub fn find_targets_by_module_path(all_targets: &[String], module: &str) -> Vec<String> {
    let parts: Vec<&str> = module.split('/').collect();
    let module_name = base_name(module);

    all_targets
        .iter()
        .filter(|target| {
            target.contains(module)
                || parts.iter().all(|part| target.contains(part))
                || target.contains(module_name.as_str())
        })
        .cloned()
        .collect()
}

/// Drop analysis-only targets (tidy, lint, ...)
pub fn filter_auxiliary_targets(targets: Vec<String>, markers: &[String]) -> Vec<String> {
    targets
        .into_iter()
        .filter(|target| !markers.iter().any(|m| target.contains(m.as_str())))
        .collect()
}

/// Precise resolution of one combined module string
pub fn relevant_targets(all_targets: &[String], module: &str, markers: &[String]) -> Vec<String> {
    let matched = find_targets_by_module_path(all_targets, module);
    debug!(count = matched.len(), "Matched relevant targets");

    let build_targets = filter_auxiliary_targets(matched, markers);
    debug!(count = build_targets.len(), "Build targets after filtering");
    build_targets
}

/// Case-insensitive candidate substrings derived from expanded targets
pub fn fuzzy_patterns(expanded_targets: &[String]) -> Vec<String> {
    let mut patterns = Vec::new();

    for target in expanded_targets {
        let last = target.rsplit('/').next().unwrap_or(target);

        patterns.push(last.to_string());
        patterns.push(toggle_lib_prefix(last));
        for category in MODULE_CATEGORIES {
            patterns.push(format!("{}_{}", category, last));
        }
    }

    patterns
}

/// Fuzzy fallback over the full target list
pub fn find_targets_by_fuzzy_match(all_targets: &[String], expanded_targets: &[String]) -> Vec<String> {
    let patterns: Vec<String> = fuzzy_patterns(expanded_targets)
        .into_iter()
        .map(|p| p.to_lowercase())
        .collect();
    debug!(patterns = ?patterns, "Fuzzy patterns");

    all_targets
        .iter()
        .filter(|target| {
            let lower = target.to_lowercase();
            patterns.iter().any(|p| lower.contains(p.as_str()))
        })
        .cloned()
        .collect()
}

/// Parse `-t targets` output: the target is the text before the first `:`.
/// Blank and `#` comment lines are ignored.
pub fn parse_targets_output(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let target = line.split(':').next().unwrap_or("").trim();
            (!target.is_empty()).then(|| target.to_string())
        })
        .collect()
}

/// Which pass produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Exact,
    Fuzzy,
    /// Neither pass found anything
    Unresolved,
}

/// Outcome of resolving a module build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Module targets after detection, before expansion
    pub module_targets: Vec<String>,
    pub expanded_targets: Vec<String>,
    /// Build-graph targets to query
    pub targets: Vec<String>,
    pub strategy: MatchStrategy,
}

/// Resolve the module targets of a module build to build-graph targets.
///
/// Empty `module_targets` are inferred from the environment first. The
/// target list is fetched from the executor once; if that fails the
/// resolution is empty.
pub fn resolve_module_targets(
    executor: &dyn GraphExecutor,
    module_targets: &[String],
    env: &EnvSnapshot,
    auxiliary_markers: &[String],
) -> Resolution {
    let module_targets = if module_targets.is_empty() {
        detect_module_targets(env)
    } else {
        module_targets.to_vec()
    };

    let expanded_targets = expand_module_targets(&module_targets);
    info!(targets = ?expanded_targets, "Expanded module targets");

    let all_targets = match executor.targets() {
        Ok(targets) => targets,
        Err(e) => {
            warn!(error = %e, "Failed to get ninja targets");
            Vec::new()
        }
    };
    info!(count = all_targets.len(), "Got build graph targets");

    let module = module_targets.join(" ");
    let exact = relevant_targets(&all_targets, &module, auxiliary_markers);
    if !exact.is_empty() {
        return Resolution {
            module_targets,
            expanded_targets,
            targets: exact,
            strategy: MatchStrategy::Exact,
        };
    }

    info!("No ninja targets found for modules, trying fuzzy matching");
    let fuzzy = find_targets_by_fuzzy_match(&all_targets, &expanded_targets);
    info!(count = fuzzy.len(), "Found targets by fuzzy matching");

    let strategy = if fuzzy.is_empty() {
        MatchStrategy::Unresolved
    } else {
        MatchStrategy::Fuzzy
    };

    Resolution {
        module_targets,
        expanded_targets,
        targets: fuzzy,
        strategy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ninja::testing::FakeExecutor;
    use std::collections::HashSet;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn as_set(list: Vec<String>) -> HashSet<String> {
        list.into_iter().collect()
    }

    fn default_markers() -> Vec<String> {
        strings(&[".tidy", ".lint", ".analyze"])
    }

    #[test]
    fn test_expand_directory_target() {
        assert_eq!(
            as_set(expand_module_targets(&strings(&["system/core/init"]))),
            as_set(strings(&["system/core/init", "system_core_init", "init", "libinit"]))
        );
    }

    #[test]
    fn test_expand_library_target() {
        assert_eq!(
            as_set(expand_module_targets(&strings(&["libutils"]))),
            as_set(strings(&["libutils", "utils"]))
        );
        assert_eq!(
            as_set(expand_module_targets(&strings(&["Settings"]))),
            as_set(strings(&["Settings", "libSettings"]))
        );
        assert_eq!(
            as_set(expand_module_targets(&strings(&["framework-res"]))),
            as_set(strings(&["framework-res", "libframework-res"]))
        );
        assert!(expand_module_targets(&[]).is_empty());
    }

    #[test]
    fn test_find_by_module_path_rules() {
        let all = strings(&[
            "out/soong/.intermediates/system/core/init/init/android_arm64/init",
            "system-core-init.stamp",
            "out/target/product/x/obj/EXECUTABLES/init_intermediates/init",
            "out/host/bin/aapt2",
        ]);

        let found = find_targets_by_module_path(&all, "system/core/init");
        assert_eq!(found, all[..3].to_vec());

        assert!(find_targets_by_module_path(&all, "frameworks/base").is_empty());
    }

    #[test]
    fn test_auxiliary_targets_dropped() {
        let all = strings(&[
            "out/libutils/a.o",
            "out/libutils/a.o.tidy",
            "out/libutils/lint-report.lint",
            "out/libutils/x.analyze",
        ]);
        assert_eq!(
            relevant_targets(&all, "libutils", &default_markers()),
            strings(&["out/libutils/a.o"])
        );
    }

    #[test]
    fn test_fuzzy_patterns() {
        let patterns = fuzzy_patterns(&strings(&["system/core/libcutils"]));
        assert_eq!(
            patterns,
            strings(&[
                "libcutils",
                "cutils",
                "SHARED_LIBRARIES_libcutils",
                "STATIC_LIBRARIES_libcutils",
                "EXECUTABLES_libcutils",
                "APPS_libcutils",
            ])
        );
    }

    #[test]
    fn test_fuzzy_match_is_case_insensitive() {
        let all = strings(&["out/LIBFOO.so", "out/bar", "Foo_Tests"]);
        let matched = find_targets_by_fuzzy_match(&all, &strings(&["foo"]));
        assert_eq!(matched, strings(&["out/LIBFOO.so", "Foo_Tests"]));
    }

    #[test]
    fn test_parse_targets_output() {
        let output = "target1: phony\r\ntarget2: CUSTOM || target3\n\n# Comment\n  target3: phony input1 | order-only  \ntarget4: CUSTOM # trailing\n";
        assert_eq!(
            parse_targets_output(output),
            strings(&["target1", "target2", "target3", "target4"])
        );
        assert!(parse_targets_output("").is_empty());
        assert!(parse_targets_output(": phony").is_empty());
    }

    #[test]
    fn test_resolve_exact() {
        let executor = FakeExecutor::new().with_targets(&[
            "out/soong/.intermediates/system/core/libutils/a.o",
            "out/soong/.intermediates/system/core/libutils/a.o.tidy",
            "out/other/b.o",
        ]);
        let env = EnvSnapshot::new("/tmp");
        let res = resolve_module_targets(&executor, &strings(&["libutils"]), &env, &default_markers());
        assert_eq!(res.strategy, MatchStrategy::Exact);
        assert_eq!(
            res.targets,
            strings(&["out/soong/.intermediates/system/core/libutils/a.o"])
        );
        assert_eq!(executor.targets_calls(), 1);
    }

    #[test]
    fn test_resolve_falls_back_to_fuzzy() {
        let executor = FakeExecutor::new().with_targets(&["out/STATIC_LIBRARIES_UTILS.a", "out/zzz"]);
        let env = EnvSnapshot::new("/tmp");
        // "m libutils libbase": combined string matches nothing precisely
        let res = resolve_module_targets(
            &executor,
            &strings(&["libutils", "libbase"]),
            &env,
            &default_markers(),
        );
        assert_eq!(res.strategy, MatchStrategy::Fuzzy);
        assert_eq!(res.targets, strings(&["out/STATIC_LIBRARIES_UTILS.a"]));
        assert_eq!(executor.targets_calls(), 1);
    }

    #[test]
    fn test_resolve_unresolved_and_detected_targets() {
        let executor = FakeExecutor::new().with_targets(&["out/zzz"]);
        let env = EnvSnapshot::new("/work/libnothing");
        let res = resolve_module_targets(&executor, &[], &env, &default_markers());
        assert_eq!(res.module_targets, strings(&["libnothing"]));
        assert_eq!(res.strategy, MatchStrategy::Unresolved);
        assert!(res.targets.is_empty());
    }

    #[test]
    fn test_resolve_with_failing_target_listing() {
        let executor = FakeExecutor::new().failing_targets();
        let env = EnvSnapshot::new("/tmp");
        let res = resolve_module_targets(&executor, &strings(&["libc"]), &env, &default_markers());
        assert_eq!(res.strategy, MatchStrategy::Unresolved);
    }
}
