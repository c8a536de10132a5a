//! Languages the summarizer can be steered towards and the translator can target.

/// A supported output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// `en`
    English,
    /// `it`
    Italian,
    /// `es`
    Spanish,
    /// `fr`
    French,
    /// `de`
    German,
}

impl Language {
    /// Every supported language, in lookup order.
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Italian,
        Language::Spanish,
        Language::French,
        Language::German,
    ];

    /// Resolve a two-letter code (case-insensitive). Returns `None` for `auto` and unknown codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|language| language.code().eq_ignore_ascii_case(code))
    }

    /// Translation target for `code`, falling back to English for unknown codes.
    pub fn translation_target(code: &str) -> Self {
        Self::from_code(code).unwrap_or(Self::English)
    }

    /// ISO 639-1 code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Italian => "it",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::German => "de",
        }
    }

    /// English name used inside prompts.
    pub const fn name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Italian => "Italian",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_resolve_case_insensitively() {
        assert_eq!(Language::from_code("IT"), Some(Language::Italian));
        assert_eq!(Language::from_code(" de "), Some(Language::German));
    }

    #[test]
    fn auto_and_unknown_codes_have_no_language() {
        assert_eq!(Language::from_code("auto"), None);
        assert_eq!(Language::from_code("xx"), None);
        assert_eq!(Language::from_code(""), None);
    }

    #[test]
    fn translation_target_defaults_to_english() {
        assert_eq!(Language::translation_target("xx"), Language::English);
        assert_eq!(Language::translation_target("fr"), Language::French);
    }
}
