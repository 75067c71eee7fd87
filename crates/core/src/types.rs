//! Domain types for representing extracted slide deck content.

use serde::{Deserialize, Serialize};

/// An entire slide deck with its extracted content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    /// Original source name (usually the HTML filename, without path).
    pub source: String,

    /// Slides in document order.
    pub slides: Vec<ExtractedSlide>,
}

impl Deck {
    /// Create a new, empty deck for the given source.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            slides: Vec::new(),
        }
    }

    /// Add a slide to the deck.
    pub fn add_slide(&mut self, slide: ExtractedSlide) {
        self.slides.push(slide);
    }
}

/// Fields extracted from a single slide container.
///
/// Every field is optional. List fields are `Some` as soon as at least one
/// matching element exists in the slide, even when every entry was filtered
/// out afterwards; the field label is still rendered in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSlide {
    /// 1-based slide number.
    pub number: usize,

    /// Class tokens of the slide container, in attribute order.
    pub classes: Vec<String>,

    pub title: Option<String>,

    pub subtitle: Option<String>,

    /// List items from the content block.
    pub content_items: Option<Vec<String>>,

    /// Paragraphs from the content block.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paragraphs: Vec<String>,

    /// Stat, number, and metric callouts.
    pub stats: Option<Vec<String>>,

    pub cards: Option<Vec<String>>,

    /// Step and timeline entries.
    pub steps: Option<Vec<String>>,

    /// Section divider label (number + title).
    pub section: Option<SectionLabel>,
}

impl ExtractedSlide {
    /// Create a new slide with the given number and no extracted fields.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    /// Class list joined the way it appears in the slide type label.
    pub fn class_list(&self) -> String {
        self.classes.join(", ")
    }

    /// Whether nothing besides the slide number and classes was found.
    pub fn is_bare(&self) -> bool {
        self.title.is_none()
            && self.subtitle.is_none()
            && self.content_items.is_none()
            && self.paragraphs.is_empty()
            && self.stats.is_none()
            && self.cards.is_none()
            && self.steps.is_none()
            && self.section.is_none()
    }
}

/// Section divider label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLabel {
    pub number: String,
    pub title: String,
}

impl SectionLabel {
    pub fn new(number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
        }
    }
}

impl std::fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.number, self.title)
    }
}
