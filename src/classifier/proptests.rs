//! Property-based tests for the classifier

use super::*;
use proptest::prelude::*;

fn arb_surrounding() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.!?]{0,30}"
}

fn arb_casing(word: &'static str) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<bool>(), word.len()).prop_map(move |upper| {
        word.chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

proptest! {
    #[test]
    fn hello_always_greets(
        prefix in arb_surrounding(),
        hello in arb_casing("hello"),
        suffix in arb_surrounding(),
        content in ".{0,40}",
    ) {
        let text = format!("{prefix}{hello}{suffix}");
        let result = classify(&text, &content);
        prop_assert_eq!(result.rule, Rule::Greeting);
        prop_assert_eq!(result.reply.as_str(), templates::GREETING);
        prop_assert!(result.new_file.is_none());
    }

    #[test]
    fn classify_is_deterministic(text in ".{0,60}", content in ".{0,60}") {
        prop_assert_eq!(classify(&text, &content), classify(&text, &content));
    }

    #[test]
    fn reply_is_never_empty(text in ".{0,60}", content in ".{0,60}") {
        prop_assert!(!classify(&text, &content).reply.is_empty());
    }

    #[test]
    fn only_create_rule_opens_files(text in ".{0,60}", content in ".{0,60}") {
        let result = classify(&text, &content);
        prop_assert_eq!(result.new_file.is_some(), result.rule == Rule::CreateFile);
        if let Some(file) = result.new_file {
            prop_assert!(result.reply.contains(&file.name));
        }
    }

    #[test]
    fn content_only_matters_for_explain(text in "[a-z ]{0,40}", content in ".{0,40}") {
        let with_content = classify(&text, &content);
        let without = classify(&text, "");
        prop_assert_eq!(with_content.rule, without.rule);
        if with_content.rule != Rule::Explain {
            prop_assert_eq!(with_content, without);
        }
    }
}
