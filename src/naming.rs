//! Name synthesis for environment variables and command-line flags.

use crate::types::CaseMode;

/// Convert a mixed-case identifier to upper snake case.
///
/// A `_` is inserted before every uppercase letter that follows a lowercase
/// letter or a digit, then the whole string is uppercased. Existing
/// separators are left alone, so the function is idempotent on snake input.
///
/// `ServerPort` → `SERVER_PORT`, `server_port` → `SERVER_PORT`,
/// `TestToSnake1` → `TEST_TO_SNAKE1`.
pub fn to_upper_snake(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len() + 4);
    let mut prev: Option<char> = None;

    for c in identifier.chars() {
        if c.is_uppercase()
            && let Some(p) = prev
            && (p.is_lowercase() || p.is_ascii_digit())
        {
            out.push('_');
        }
        out.push(c);
        prev = Some(c);
    }

    out.to_uppercase()
}

/// Lowercase, `-`-separated form used for long flag names.
///
/// `MySql` → `my-sql`, `pool_size` → `pool-size`.
pub fn to_kebab(identifier: &str) -> String {
    to_upper_snake(identifier)
        .to_lowercase()
        .replace('_', "-")
}

/// Apply a [`CaseMode`] to one name segment.
pub fn env_segment(segment: &str, case: CaseMode) -> String {
    match case {
        CaseMode::Verbatim => segment.to_uppercase(),
        CaseMode::Snake => to_upper_snake(segment),
    }
}

/// Synthesize an environment variable name.
///
/// Joins the optional prefix, the enclosing record names and the field name
/// with `_`, each transformed by `case`, and uppercases the result.
pub fn env_name(prefix: &str, segments: &[&str], name: &str, case: CaseMode) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(segments.len() + 2);
    if !prefix.is_empty() {
        parts.push(prefix.to_uppercase());
    }
    parts.extend(segments.iter().map(|s| env_segment(s, case)));
    parts.push(env_segment(name, case));
    parts.join("_")
}

/// Synthesize a long flag name from the enclosing record names and the field name.
pub fn flag_name(segments: &[&str], name: &str) -> String {
    let mut parts: Vec<String> = segments.iter().map(|s| to_kebab(s)).collect();
    parts.push(to_kebab(name));
    parts.join("-")
}
