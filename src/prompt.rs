//! Prompt construction for summaries and translations.
//!
//! Both builders are pure: identical inputs always produce identical prompt text, so the
//! pipeline can be tested against exact strings while the provider remains nondeterministic.

use crate::language::Language;

/// Build the summarization prompt for `text`.
///
/// When `language` is `None` the directive is omitted and the provider infers the output
/// language from the source text.
pub fn build_summary_prompt(text: &str, max_words: usize, language: Option<Language>) -> String {
    let mut prompt = String::new();
    if let Some(language) = language {
        prompt.push_str(&format!("Respond in {language}.\n"));
    }
    prompt.push_str(&format!(
        "Summarize the following text clearly and concisely in approximately {max_words} words.\n"
    ));
    prompt.push_str("Keep the key points and the most important information.\n");
    prompt.push_str("Do not add comments or introductions; provide only the summary.\n\n");
    prompt.push_str("TEXT TO SUMMARIZE:\n");
    prompt.push_str(text);
    prompt.push_str("\n\nSUMMARY:");
    prompt
}

/// Build the translation prompt for `text`; unknown codes translate into English.
pub fn build_translation_prompt(text: &str, target_code: &str) -> String {
    let language = Language::translation_target(target_code);
    format!(
        "Translate the following text into {language}.\n\
         Preserve the tone, style, and formatting of the original text.\n\
         Do not add comments; provide only the translation.\n\n\
         TEXT TO TRANSLATE:\n{text}\n\nTRANSLATION:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prompt_is_deterministic() {
        let first = build_summary_prompt("Some text.", 120, Some(Language::Italian));
        let second = build_summary_prompt("Some text.", 120, Some(Language::Italian));
        assert_eq!(first, second);
    }

    #[test]
    fn summary_prompt_includes_directive_budget_and_text() {
        let prompt = build_summary_prompt("Hello world.", 42, Some(Language::English));
        assert!(prompt.starts_with("Respond in English.\n"));
        assert!(prompt.contains("approximately 42 words"));
        assert!(prompt.contains("provide only the summary"));
        assert!(prompt.contains("TEXT TO SUMMARIZE:\nHello world.\n\nSUMMARY:"));
    }

    #[test]
    fn auto_language_omits_directive() {
        let prompt = build_summary_prompt("Bonjour.", 10, None);
        assert!(!prompt.contains("Respond in"));
        assert!(prompt.starts_with("Summarize the following text"));
    }

    #[test]
    fn translation_prompt_names_target_language() {
        let prompt = build_translation_prompt("Ciao", "de");
        assert!(prompt.starts_with("Translate the following text into German.\n"));
        assert!(prompt.contains("TEXT TO TRANSLATE:\nCiao\n\nTRANSLATION:"));
        assert_eq!(prompt, build_translation_prompt("Ciao", "de"));
    }

    #[test]
    fn unknown_translation_code_falls_back_to_english() {
        assert_eq!(
            build_translation_prompt("Ciao", "xx"),
            build_translation_prompt("Ciao", "en")
        );
    }
}
