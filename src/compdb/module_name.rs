//! Module name inference from build output paths
//!
//! Android build outputs encode the producing module in their directory
//! layout, e.g.
//!
//! - `out/target/product/<dev>/obj/SHARED_LIBRARIES/libfoo_intermediates/foo.o`
//! - `out/soong/.intermediates/<module dir>/libfoo/<variant>/libfoo.so`
//!
//! Structural patterns are tried first; a segment scan is the fallback.

use once_cell::sync::Lazy;
use regex::Regex;

/// Suffix carried by make-style intermediates directories
const INTERMEDIATES_SUFFIX: &str = "_intermediates";

/// Generic directory names that never name a module
const EXCLUDED_DIRS: &[&str] = &[
    "out",
    "intermediates",
    "obj",
    "EXECUTABLES",
    "SHARED_LIBRARIES",
    "STATIC_LIBRARIES",
    "APPS",
    "include",
    "lib",
    "bin",
];

struct ModulePattern {
    regex: Regex,
    /// Capture group holding the module name
    group: usize,
}

/// Structural patterns, evaluated first-match-wins
static MODULE_PATTERNS: Lazy<Vec<ModulePattern>> = Lazy::new(|| {
    vec![
        // obj/<CATEGORY>/<name>_intermediates/
        ModulePattern {
            regex: Regex::new(r"/obj/([A-Z_]+)/([^/]+)_intermediates/").unwrap(),
            group: 2,
        },
        // .intermediates/<dirs>/<name>/<variant>/
        ModulePattern {
            regex: Regex::new(r"/\.intermediates/(?:[^/]+/)*([^/]+)/[^/]+/").unwrap(),
            group: 1,
        },
        // <name>/_intermediates/
        ModulePattern {
            regex: Regex::new(r"([^/]+)/_intermediates/").unwrap(),
            group: 1,
        },
    ]
});

/// Infer the module that produced `path`; empty if nothing plausible is found
pub fn extract_module_name_from_path(path: &str) -> String {
    for pattern in MODULE_PATTERNS.iter() {
        if let Some(name) = pattern
            .regex
            .captures(path)
            .and_then(|caps| caps.get(pattern.group))
        {
            return name.as_str().to_string();
        }
    }

    let parts: Vec<&str> = path.split('/').collect();
    for part in parts.iter().rev().skip(1).copied() {
        if part.is_empty() || EXCLUDED_DIRS.contains(&part) || part.starts_with('.') {
            continue;
        }
        return part
            .strip_suffix(INTERMEDIATES_SUFFIX)
            .unwrap_or(part)
            .to_string();
    }

    String::new()
}
