//! Output formatting utilities

/// Truncate a string to a maximum length
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len < 3 {
        return "...".to_string();
    }
    let trimmed = s.chars().take(max_len - 3).collect::<String>();
    format!("{trimmed}...")
}

/// Size in KiB rounded to two decimals, as published in the manifest.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn size_kb(bytes: u64) -> f64 {
    (bytes as f64 / 1024.0 * 100.0).round() / 100.0
}

/// Capitalize the first letter of every alphabetic run: `"sun-os"` → `"Sun-Os"`.
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_string_cases() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello", 5), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("hello", 2), "...");
        assert_eq!(truncate_string("我希望你充当翻译", 5), "我希...");
    }

    #[test]
    fn size_kb_rounds_to_two_decimals() {
        assert!((size_kb(1024) - 1.0).abs() < f64::EPSILON);
        assert!((size_kb(1536) - 1.5).abs() < f64::EPSILON);
        assert!((size_kb(1000) - 0.98).abs() < f64::EPSILON);
        assert!(size_kb(0).abs() < f64::EPSILON);
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("common"), "Common");
        assert_eq!(title_case("freebsd"), "Freebsd");
        assert_eq!(title_case("sun-os"), "Sun-Os");
        assert_eq!(title_case("OPENBSD"), "Openbsd");
        assert_eq!(title_case("x86_64"), "X86_64");
    }
}
