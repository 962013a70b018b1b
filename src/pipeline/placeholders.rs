//! Placeholder canonicalization.
//!
//! Three dialects are rewritten to the canonical `{{name}}` form:
//! `${name}` / `${name:default}`, `[name]` and `{name}`. The rewrite is
//! idempotent: canonical tokens are never wrapped again.

use std::sync::LazyLock;

use regex::Regex;

/// `${name}` or `${name:type-or-default}`.
static INTERPOLATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([a-zA-Z0-9_]+)(?::[^}]+)?\}").unwrap());

/// `[name]`. The "not followed by `(`" condition is checked by the caller.
static BRACKET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([a-zA-Z0-9_\s\x{4e00}-\x{9fa5}]+)\]").unwrap());

/// `{name}`. The "no adjacent brace" condition is checked by the caller.
static BRACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z0-9_\s\x{4e00}-\x{9fa5}]+)\}").unwrap());

/// Rewrite every recognized placeholder dialect to `{{name}}`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let text = INTERPOLATION_REGEX.replace_all(text, "{{$1}}");
    let text = rewrite_unless(&BRACKET_REGEX, &text, |_, after| after.starts_with('('));
    rewrite_unless(&BRACE_REGEX, &text, |before, after| {
        before.ends_with('{') || after.starts_with('}')
    })
}

/// Replace each match with the canonical token of its first group, unless
/// `blocked(text_before_match, text_after_match)` holds.
fn rewrite_unless(regex: &Regex, source: &str, blocked: impl Fn(&str, &str) -> bool) -> String {
    let mut out = String::with_capacity(source.len() + 8);
    let mut last = 0;

    for caps in regex.captures_iter(source) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&source[last..whole.start()]);
        if blocked(&source[..whole.start()], &source[whole.end()..]) {
            out.push_str(whole.as_str());
        } else {
            out.push_str(&canonical(name.as_str()));
        }
        last = whole.end();
    }

    out.push_str(&source[last..]);
    out
}

fn canonical(name: &str) -> String {
    format!("{{{{{name}}}}}")
}
