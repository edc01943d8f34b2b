//! Compiler identity detection
//!
//! The leading program token of a command is matched against an ordered
//! rule table; the first matching rule names the compiler. Unmatched tokens
//! are reported verbatim.

/// Canonical identity for the D8/R8 dexers
pub const ANDROID_DEX: &str = "android-dex";

/// One entry of the classification table.
///
/// A token matches when it contains any of `any` and none of `none`.
pub struct CompilerRule {
    pub identity: &'static str,
    pub any: &'static [&'static str],
    pub none: &'static [&'static str],
}

impl CompilerRule {
    pub fn matches(&self, token: &str) -> bool {
        self.any.iter().any(|s| token.contains(s)) && !self.none.iter().any(|s| token.contains(s))
    }
}

/// Classification rules, evaluated first-match-wins
pub const COMPILER_RULES: &[CompilerRule] = &[
    CompilerRule {
        identity: "clang++",
        any: &["clang++"],
        none: &[],
    },
    CompilerRule {
        identity: "clang",
        any: &["clang"],
        none: &["++"],
    },
    CompilerRule {
        identity: "g++",
        any: &["g++"],
        none: &[],
    },
    CompilerRule {
        identity: "gcc",
        any: &["gcc"],
        none: &["++"],
    },
    CompilerRule {
        identity: "javac",
        any: &["javac"],
        none: &[],
    },
    CompilerRule {
        identity: "kotlinc",
        any: &["kotlinc"],
        none: &[],
    },
    CompilerRule {
        identity: ANDROID_DEX,
        any: &["r8", "d8"],
        none: &[],
    },
];

/// Extract the program token of a command, skipping a leading `PWD=...` assignment
pub fn program_token(command: &str) -> Option<&str> {
    let mut parts = command.split_whitespace();
    let first = parts.next()?;
    if first.starts_with("PWD=") {
        parts.next()
    } else {
        Some(first)
    }
}

/// Map a single program token to its canonical compiler identity
pub fn classify_token(token: &str) -> String {
    COMPILER_RULES
        .iter()
        .find(|rule| rule.matches(token))
        .map(|rule| rule.identity.to_string())
        .unwrap_or_else(|| token.to_string())
}

/// Determine the compiler identity of a full command; empty if it has no program token
pub fn compiler_type_from_command(command: &str) -> String {
    match program_token(command) {
        Some(token) => classify_token(token),
        None => String::new(),
    }
}
