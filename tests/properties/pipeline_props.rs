use proptest::prelude::*;

use packforge::pipeline::classifier::{CategoryClassifier, FALLBACK_CATEGORY};
use packforge::pipeline::cleaner::{clean, has_markdown_links};
use packforge::pipeline::commands::{PageContext, extract};
use packforge::pipeline::placeholders::normalize;
use packforge::pipeline::redactor::ExampleRedactor;

/// Text biased towards the characters the regexes care about.
fn arb_prompt_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("{".to_string()),
            Just("}".to_string()),
            Just("[".to_string()),
            Just("]".to_string()),
            Just("(".to_string()),
            Just(")".to_string()),
            Just("${".to_string()),
            Just(":".to_string()),
            Just("!".to_string()),
            Just("\n".to_string()),
            Just(" ".to_string()),
            "[a-z]{1,6}",
            "[\u{4e00}-\u{4e20}]{1,3}",
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn normalize_is_idempotent(text in arb_prompt_text()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_never_panics_on_any_input(text in ".{0,200}") {
        let _ = normalize(&text);
    }

    #[test]
    fn cleaned_text_has_no_links(
        label in "[a-zA-Z ]{1,12}",
        url in "https://[a-z]{1,10}\\.com/[a-z]{0,8}",
        tail in "[a-z .]{0,30}",
        image in any::<bool>(),
        depth in 0usize..3,
        citation in any::<bool>(),
    ) {
        let bang = if image { "!" } else { "" };
        let mut link = format!("{bang}[{label}]({url})");
        for level in 0..depth {
            link = format!("[{link}]({url}{level})");
        }
        let cite = if citation { format!(" [[{}]]({url})", depth + 1) } else { String::new() };
        let raw = format!("Intro {link}{cite} {tail}");
        let cleaned = clean(&raw);
        prop_assert!(!has_markdown_links(&cleaned), "left a link in {cleaned:?}");
        prop_assert_eq!(cleaned.trim(), cleaned.as_str());
    }

    #[test]
    fn classifier_is_total_and_deterministic(title in ".{0,40}", content in ".{0,200}") {
        let classifier = CategoryClassifier::default();
        let first = classifier.classify(&title, &content);
        prop_assert_eq!(&first, &classifier.classify(&title, &content));

        let known: Vec<&str> = classifier.categories().iter().map(|c| c.name.as_str()).collect();
        prop_assert!(first == FALLBACK_CATEGORY || known.contains(&first.as_str()));
    }

    #[test]
    fn redactor_leaves_text_without_lead_unchanged(text in "[a-z ,.]{0,120}") {
        prop_assume!(!text.contains("first"));
        let redactor = ExampleRedactor::default();
        prop_assert_eq!(redactor.redact(&text, "en"), text);
    }

    #[test]
    fn extracted_ids_are_unique(actions in prop::collection::vec(("[a-z][a-z ]{0,19}", "[a-z][a-z -]{0,19}"), 0..12)) {
        let mut page = String::from("# tool\n\n> A tool.\n");
        for (action, command) in &actions {
            page.push_str(&format!("\n- {action}:\n\n`tool {command}`\n"));
        }
        let context = PageContext {
            command: "tool",
            platform: "common",
            language: "en",
            display_name: "Common Tools",
        };

        let extraction = extract(&page, &context, 0);
        prop_assert_eq!(extraction.records.len(), actions.len());
        let mut ids: Vec<_> = extraction.records.iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), actions.len());
    }
}
