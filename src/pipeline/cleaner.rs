//! Raw text cleanup applied to every prompt body before any other stage.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Attribution header lines ("Contributed by: ...", "贡献者：...", "From ...",
/// "Author ..."), including the line break that ends them.
static ATTRIBUTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:contributed by|贡献者|from|author)[ \t\x{3000}:：].*?(?:\n|$)")
        .unwrap()
});

/// Markdown link, with an optional leading `!` so images can be told apart.
static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[([^\]]+)\]\([^)]+\)").unwrap());

/// Citation link such as `[[1]](https://example.com)`, removed whole.
static CITATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[\[[^\]]*\]\]\([^)]*\)").unwrap());

static BLOCKQUOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^>[ \t]*").unwrap());

static IMAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]+\)").unwrap());

/// Strip attribution lines, markdown links/images and blockquote markers.
///
/// Stages run in a fixed order; later ones assume the structural noise removed
/// by earlier ones is gone. The result is trimmed and may be empty.
#[must_use]
pub fn clean(raw: &str) -> String {
    let text = ATTRIBUTION_REGEX.replace_all(raw, "");
    let text = strip_links(&text);
    let text = BLOCKQUOTE_REGEX.replace_all(&text, "");

    text.trim().to_string()
}

/// Unwrap links and drop images and citations until none are left. Nested
/// links such as `[[docs](a)](b)` lose one level per pass.
fn strip_links(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = CITATION_REGEX.replace_all(&current, "");
        let next = LINK_REGEX.replace_all(&next, |caps: &Captures<'_>| {
            if caps[1].is_empty() {
                caps[2].to_string()
            } else {
                caps[0].to_string()
            }
        });
        let next = IMAGE_REGEX.replace_all(&next, "").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// True when `text` still contains markdown link or image syntax.
#[must_use]
pub fn has_markdown_links(text: &str) -> bool {
    LINK_REGEX.is_match(text) || IMAGE_REGEX.is_match(text) || CITATION_REGEX.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_attribution_lines() {
        let raw = "Contributed by: @someone\nI want you to act as a poet.";
        assert_eq!(clean(raw), "I want you to act as a poet.");

        let raw = "贡献者：某人\n我希望你充当诗人。";
        assert_eq!(clean(raw), "我希望你充当诗人。");

        let raw = "author @x\nAct as a linux terminal.";
        assert_eq!(clean(raw), "Act as a linux terminal.");
    }

    #[test]
    fn attribution_requires_separator() {
        let raw = "Authority figures are welcome.";
        assert_eq!(clean(raw), raw);
    }

    #[test]
    fn attribution_in_middle_of_block() {
        let raw = "First line.\nFrom: https://example.com\nLast line.";
        assert_eq!(clean(raw), "First line.\nLast line.");
    }

    #[test]
    fn rewrites_links_to_text() {
        let raw = "See [the docs](https://example.com/docs) for more.";
        assert_eq!(clean(raw), "See the docs for more.");
    }

    #[test]
    fn unwraps_nested_links() {
        assert_eq!(clean("See [[docs](https://a)](https://b) now."), "See docs now.");
        assert_eq!(clean("[![logo](x.png)](https://home)"), "");
    }

    #[test]
    fn removes_citation_links() {
        let cleaned = clean("Cite [[1]](https://example.com) here.");
        assert_eq!(cleaned, "Cite  here.");
        assert!(!has_markdown_links(&cleaned));
        assert!(has_markdown_links("[[2]](https://example.com)"));
    }

    #[test]
    fn removes_images_entirely() {
        let raw = "Intro ![diagram](https://example.com/a.png) outro";
        assert_eq!(clean(raw), "Intro  outro");
        assert_eq!(clean("![](x.png)"), "");
    }

    #[test]
    fn strips_blockquote_markers() {
        let raw = "> quoted line\n>another\nplain";
        assert_eq!(clean(raw), "quoted line\nanother\nplain");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(clean("\n\n  body  \n"), "body");
        assert_eq!(clean("   "), "");
    }

    #[test]
    fn output_has_no_markdown_syntax() {
        let raw = "> [a](u) ![b](v) [c](w)\nContributed by x";
        let cleaned = clean(raw);
        assert!(!has_markdown_links(&cleaned));
        assert_eq!(cleaned, "a  c");
    }

    #[test]
    fn leaves_sentence_structure_alone() {
        let raw = "I want you to act as a translator. Reply only with the translation.";
        assert_eq!(clean(raw), raw);
    }
}
