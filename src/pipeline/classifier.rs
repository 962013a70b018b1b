//! Keyword-driven category classification for role prompts.

use serde::{Deserialize, Serialize};

/// Group assigned when no category keyword matches.
pub const FALLBACK_CATEGORY: &str = "Roleplay";

/// One named category and the keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub keywords: Vec<String>,
}

impl Category {
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(&self, haystack: &str) -> bool {
        self.keywords
            .iter()
            .filter(|keyword| !keyword.is_empty())
            .any(|keyword| haystack.contains(&keyword.to_lowercase()))
    }
}

/// Ordered category table. The first matching category wins, so
/// declaration order is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryClassifier {
    categories: Vec<Category>,
    fallback: String,
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new(default_categories(), FALLBACK_CATEGORY)
    }
}

impl CategoryClassifier {
    #[must_use]
    pub fn new(categories: Vec<Category>, fallback: impl Into<String>) -> Self {
        Self {
            categories,
            fallback: fallback.into(),
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Every group name this classifier can return, fallback last.
    #[must_use]
    pub fn vocabulary(&self) -> Vec<&str> {
        self.categories
            .iter()
            .map(|category| category.name.as_str())
            .chain(std::iter::once(self.fallback.as_str()))
            .collect()
    }

    /// Classify a prompt by substring keyword matching over its lower-cased
    /// title and content. Total and deterministic.
    #[must_use]
    pub fn classify(&self, title: &str, content: &str) -> String {
        let haystack = format!("{title} {content}").to_lowercase();
        self.categories
            .iter()
            .find(|category| category.matches(&haystack))
            .map_or_else(|| self.fallback.clone(), |category| category.name.clone())
    }
}

/// The built-in table: Coding, Writing, Academic, Creative, Productivity.
#[must_use]
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new(
            "Coding",
            [
                "linux", "terminal", "console", "code", "script", "sql", "javascript",
                "python", "java", "css", "html", "programming", "developer", "bug", "php",
                "react", "stack", "git", "regex", "编程", "代码", "终端", "开发", "程序员",
                "算法", "架构",
            ],
        ),
        Category::new(
            "Writing",
            [
                "writer", "story", "poem", "essay", "blog", "article", "title", "editor",
                "proofread", "screenwriter", "写手", "故事", "文章", "周报", "作文", "润色",
                "小说", "编剧", "文案", "ghostwriter",
            ],
        ),
        Category::new(
            "Academic",
            [
                "translator", "translate", "spell", "corrector", "academic", "math", "tutor",
                "teacher", "language", "翻译", "英语", "数学", "老师", "导师", "学术", "雅思",
                "词典",
            ],
        ),
        Category::new(
            "Creative",
            [
                "musician", "artist", "rapper", "composer", "song", "design", "midjourney",
                "image", "svg", "画家", "音乐", "歌词", "设计", "艺术", "作曲", "video",
            ],
        ),
        Category::new(
            "Productivity",
            [
                "excel", "sheet", "planner", "schedule", "summary", "summarizer", "coach",
                "manager", "表格", "计划", "总结", "经理", "顾问", "助手", "startup",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(title: &str, content: &str) -> String {
        CategoryClassifier::default().classify(title, content)
    }

    #[test]
    fn matches_keywords_in_title_or_content() {
        assert_eq!(classify("Linux Terminal", "Reply with output."), "Coding");
        assert_eq!(classify("Storyteller", "Tell a story."), "Writing");
        assert_eq!(classify("Guide", "Please translate my words."), "Academic");
        assert_eq!(classify("Rapper", "Write bars."), "Creative");
    }

    #[test]
    fn first_declared_category_wins() {
        // "code" (Coding) and "poem" (Writing) both match.
        assert_eq!(classify("Poem about code", ""), "Coding");
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("EXCEL SHEET", ""), "Productivity");
    }

    #[test]
    fn substring_matches_count() {
        // "javascript" contains "java" and "script"; "stackoverflow" contains "stack".
        assert_eq!(classify("StackOverflow Post", ""), "Coding");
    }

    #[test]
    fn chinese_keywords() {
        assert_eq!(classify("充当英语翻译", "我希望你充当翻译。"), "Academic");
        assert_eq!(classify("小说家", "写一部小说"), "Writing");
    }

    #[test]
    fn falls_back_to_roleplay() {
        assert_eq!(classify("Pirate", "Talk like a pirate."), FALLBACK_CATEGORY);
        assert_eq!(classify("", ""), FALLBACK_CATEGORY);
    }

    #[test]
    fn custom_table_and_fallback() {
        let classifier = CategoryClassifier::new(
            vec![Category::new("Games", ["chess", ""])],
            "Misc",
        );
        assert_eq!(classifier.classify("Chess Coach", ""), "Games");
        assert_eq!(classifier.classify("Anything", ""), "Misc");
        assert_eq!(classifier.vocabulary(), vec!["Games", "Misc"]);
    }

    #[test]
    fn vocabulary_lists_default_groups() {
        let classifier = CategoryClassifier::default();
        assert_eq!(
            classifier.vocabulary(),
            vec!["Coding", "Writing", "Academic", "Creative", "Productivity", "Roleplay"]
        );
    }
}
