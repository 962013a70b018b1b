//! Trailing worked-example redaction for role prompts.
//!
//! Many role prompts end with a concrete example ("My first request is
//! \"...\""). The literal example is replaced with `{{input}}` so the record
//! works as a template. Rules are per language and built from a single
//! lead-clause pattern; adding a language means adding a rule, not code.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PackError, Result};

/// Placeholder substituted for the redacted example.
pub const INPUT_PLACEHOLDER: &str = "{{input}}";

/// Unquoted remainders must be shorter than this many characters.
pub const DEFAULT_UNQUOTED_LIMIT: usize = 150;

/// Lead clause for English: "My first request is", "The first sentence is".
pub const ENGLISH_LEAD: &str = r"(?:My|The)\s+first\s+[\w\s]+\s+is";

/// Lead clause for Chinese: "我的第一个请求是", "第一句话是".
pub const CHINESE_LEAD: &str = r"(?:我的?)?第一[个句条项次][\x{4e00}-\x{9fa5}\w\s]+?是";

static DEFAULT_RULES: LazyLock<Vec<RedactionRule>> = LazyLock::new(|| {
    vec![
        RedactionRule::new("en", ENGLISH_LEAD, true).unwrap(),
        RedactionRule::new("zh", CHINESE_LEAD, false).unwrap(),
    ]
});

/// Quoted and unquoted example patterns for one language.
#[derive(Debug, Clone)]
pub struct RedactionRule {
    language: String,
    quoted: Regex,
    unquoted: Regex,
}

impl RedactionRule {
    /// Build a rule from a lead-clause regex such as [`ENGLISH_LEAD`].
    pub fn new(language: &str, lead: &str, case_insensitive: bool) -> Result<Self> {
        let flags = if case_insensitive { "(?i)" } else { "" };
        let quoted = format!(
            r#"{flags}(?P<lead>(?:{lead})\s*[:：]?\s*)(?:"(?P<dq>[\s\S]*?)"|“(?P<cq>[\s\S]*?)[”“]|'(?P<sq>[\s\S]*?)')(?P<punct>[.。]?)\s*$"#
        );
        let unquoted = format!(r"{flags}(?P<lead>(?:{lead})\s*[:：]?\s*)(?P<rest>[^\n]+)$");

        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|err| PackError::InvalidPattern {
                language: language.to_string(),
                reason: err.to_string(),
            })
        };

        Ok(Self {
            language: language.to_string(),
            quoted: compile(&quoted)?,
            unquoted: compile(&unquoted)?,
        })
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    fn apply(&self, text: &str, unquoted_limit: usize) -> Option<String> {
        if let Some(caps) = self.quoted.captures(text) {
            let whole = caps.get(0)?;
            let lead = caps.name("lead")?.as_str();
            let payload = ["dq", "cq", "sq"]
                .iter()
                .find_map(|name| caps.name(name))
                .map_or("", |m| m.as_str());
            let punct = match caps.name("punct").map_or("", |m| m.as_str()) {
                "" => trailing_period(payload),
                explicit => explicit,
            };
            return Some(format!(
                "{}{lead}{INPUT_PLACEHOLDER}{punct}",
                &text[..whole.start()]
            ));
        }

        let caps = self.unquoted.captures(text)?;
        let whole = caps.get(0)?;
        let rest = caps.name("rest")?.as_str();
        if rest.chars().count() >= unquoted_limit {
            return None;
        }
        let lead = caps.name("lead")?.as_str();
        Some(format!("{}{lead}{INPUT_PLACEHOLDER}", &text[..whole.start()]))
    }
}

/// A sentence-ending period carried over from inside the quotes.
fn trailing_period(payload: &str) -> &'static str {
    match payload.trim_end().chars().last() {
        Some('.') => ".",
        Some('。') => "。",
        _ => "",
    }
}

/// Language-aware example redactor.
#[derive(Debug, Clone)]
pub struct ExampleRedactor {
    rules: Vec<RedactionRule>,
    unquoted_limit: usize,
}

impl Default for ExampleRedactor {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.clone(),
            unquoted_limit: DEFAULT_UNQUOTED_LIMIT,
        }
    }
}

impl ExampleRedactor {
    #[must_use]
    pub fn new(unquoted_limit: usize) -> Self {
        Self {
            unquoted_limit,
            ..Self::default()
        }
    }

    /// Add a rule, replacing any existing rule for the same language.
    #[must_use]
    pub fn with_rule(mut self, rule: RedactionRule) -> Self {
        self.rules.retain(|existing| existing.language != rule.language);
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub const fn unquoted_limit(&self) -> usize {
        self.unquoted_limit
    }

    /// Languages that have a rule set.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(RedactionRule::language)
    }

    /// Replace a trailing worked example with [`INPUT_PLACEHOLDER`].
    ///
    /// Only an example at the very end of the text is touched. Text in a
    /// language without a rule set is returned unchanged.
    #[must_use]
    pub fn redact(&self, text: &str, language: &str) -> String {
        self.rule_for(language)
            .and_then(|rule| rule.apply(text, self.unquoted_limit))
            .unwrap_or_else(|| text.to_string())
    }

    fn rule_for(&self, language: &str) -> Option<&RedactionRule> {
        let primary = language.split(['-', '_']).next().unwrap_or(language);
        self.rules
            .iter()
            .find(|rule| rule.language.eq_ignore_ascii_case(language))
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|rule| rule.language.eq_ignore_ascii_case(primary))
            })
    }
}
