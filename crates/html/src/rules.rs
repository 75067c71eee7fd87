//! Class-name rules that decide which field an element feeds.
//!
//! Title, stat, card, and step detection is a plain substring test against
//! the `class` attribute, so `statistics-box` counts as a stat and
//! `substatistics` would too. The remaining fields need an exact class token.

/// How an element's `class` attribute is tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassMatch {
    /// Attribute text contains any of the needles.
    Substring(&'static [&'static str]),
    /// One of the whitespace-separated class tokens equals the name exactly.
    Token(&'static str),
}

impl ClassMatch {
    /// Test a raw `class` attribute value.
    pub fn matches(&self, class_attr: &str) -> bool {
        match self {
            // Needles hold no whitespace, so testing the raw attribute is the
            // same as testing the space-joined token list.
            ClassMatch::Substring(needles) => needles.iter().any(|n| class_attr.contains(n)),
            ClassMatch::Token(name) => class_attr.split_ascii_whitespace().any(|t| t == *name),
        }
    }
}

/// Fields selected by class name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideField {
    Title,
    Subtitle,
    Content,
    Stats,
    Cards,
    Steps,
    SectionNumber,
    SectionTitle,
}

impl SlideField {
    pub const fn class_match(self) -> ClassMatch {
        match self {
            SlideField::Title => ClassMatch::Substring(&["title", "section-title"]),
            SlideField::Subtitle => ClassMatch::Token("subtitle"),
            SlideField::Content => ClassMatch::Token("content"),
            SlideField::Stats => ClassMatch::Substring(&["stat", "number", "metric"]),
            SlideField::Cards => ClassMatch::Substring(&["card"]),
            SlideField::Steps => ClassMatch::Substring(&["step", "timeline"]),
            SlideField::SectionNumber => ClassMatch::Token("section-number"),
            SlideField::SectionTitle => ClassMatch::Token("section-title"),
        }
    }

    /// Test an element's optional `class` attribute; elements without one
    /// never match.
    pub fn matches(self, class_attr: Option<&str>) -> bool {
        class_attr.is_some_and(|c| self.class_match().matches(c))
    }
}

/// Class token that marks a slide as a section divider.
pub const SECTION_DIVIDER: ClassMatch = ClassMatch::Token("section-divider");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_matches_inside_tokens() {
        assert!(SlideField::Stats.matches(Some("statistics-box")));
        assert!(SlideField::Stats.matches(Some("substatistics")));
        assert!(SlideField::Stats.matches(Some("big-number")));
        assert!(SlideField::Cards.matches(Some("info discard")));
        assert!(SlideField::Steps.matches(Some("timeline-item")));
        assert!(SlideField::Title.matches(Some("slide-title")));
    }

    #[test]
    fn test_token_requires_exact_name() {
        assert!(SlideField::Subtitle.matches(Some("lead subtitle")));
        assert!(!SlideField::Subtitle.matches(Some("subtitle-large")));
        assert!(SlideField::Content.matches(Some("content")));
        assert!(!SlideField::Content.matches(Some("content-grid")));
    }

    #[test]
    fn test_missing_class_never_matches() {
        for field in [
            SlideField::Title,
            SlideField::Subtitle,
            SlideField::Content,
            SlideField::Stats,
            SlideField::Cards,
            SlideField::Steps,
            SlideField::SectionNumber,
            SlideField::SectionTitle,
        ] {
            assert!(!field.matches(None));
        }
    }

    #[test]
    fn test_section_divider_token() {
        assert!(SECTION_DIVIDER.matches("slide section-divider"));
        assert!(!SECTION_DIVIDER.matches("slide section-divider-dark"));
    }

    #[test]
    fn test_token_split_on_any_ascii_whitespace() {
        assert!(ClassMatch::Token("content").matches("main\tcontent\n"));
    }
}
