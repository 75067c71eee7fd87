//! HTML slide deck parser implementation.

use crate::rules::{SlideField, SECTION_DIVIDER};
use deck_core::text::{char_len, join_stripped, truncate_chars};
use deck_core::{Deck, Error, ExtractedSlide, Result, SectionLabel};
use scraper::{ElementRef, Html, Selector};
use std::io::{ErrorKind, Read};
use std::sync::LazyLock;

/// Slide containers: any `div` carrying the `slide` class token.
static SLIDE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.slide").unwrap());

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3"];
const CARD_TITLE_TAGS: &[&str] = &["h3", "h4", "strong"];

/// Callouts at or above this length are assumed to be containers.
const MAX_STAT_CHARS: usize = 100;
/// Cards without a heading are skipped at or above this length.
const MAX_CARD_CHARS: usize = 200;
/// Steps at or above this length are skipped.
const MAX_STEP_CHARS: usize = 150;
/// Card and step text is cut to this many characters.
const EXCERPT_CHARS: usize = 100;

/// Parser for HTML slide decks.
pub struct HtmlSlideParser;

impl HtmlSlideParser {
    /// Create a new HTML slide parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML deck from a reader.
    pub fn parse<R: Read>(&self, mut reader: R, source: &str) -> Result<Deck> {
        let mut html = String::new();
        reader.read_to_string(&mut html).map_err(|e| match e.kind() {
            ErrorKind::InvalidData => {
                Error::HtmlParseError(format!("{} is not valid UTF-8", source))
            }
            _ => Error::IoError(e),
        })?;

        Ok(self.parse_str(&html, source))
    }

    /// Parse an HTML deck from a string. Markup errors are tolerated the
    /// way browsers tolerate them, so this cannot fail.
    pub fn parse_str(&self, html: &str, source: &str) -> Deck {
        let document = Html::parse_document(html);
        let mut deck = Deck::new(source);

        for (idx, element) in document.select(&SLIDE_SELECTOR).enumerate() {
            deck.add_slide(self.extract_slide(element, idx + 1));
        }

        log::debug!("Found {} slides in {}", deck.slides.len(), source);
        deck
    }

    /// Extract every field from one slide container.
    pub fn extract_slide(&self, slide: ElementRef<'_>, number: usize) -> ExtractedSlide {
        let class_attr = slide.value().attr("class").unwrap_or_default();

        let mut extracted = ExtractedSlide::new(number);
        extracted.classes = class_attr
            .split_ascii_whitespace()
            .map(str::to_string)
            .collect();

        extracted.title = find_title(slide).map(text_of);

        extracted.subtitle = descendant_elements(slide)
            .find(|e| matches_field(e, SlideField::Subtitle))
            .map(text_of);

        let content = descendant_elements(slide)
            .find(|e| e.value().name() == "div" && matches_field(e, SlideField::Content));
        if let Some(content) = content {
            let items: Vec<_> = descendant_elements(content)
                .filter(|e| e.value().name() == "li")
                .collect();
            if !items.is_empty() {
                extracted.content_items = Some(non_empty_texts(items));
            }

            extracted.paragraphs =
                non_empty_texts(descendant_elements(content).filter(|e| e.value().name() == "p"));
        }

        extracted.stats = collect_field(slide, SlideField::Stats, |el| {
            let text = text_of(el);
            (!text.is_empty() && char_len(&text) < MAX_STAT_CHARS).then_some(text)
        });

        extracted.cards = collect_field(slide, SlideField::Cards, card_entry);

        extracted.steps = collect_field(slide, SlideField::Steps, |el| {
            let text = text_of(el);
            (!text.is_empty() && char_len(&text) < MAX_STEP_CHARS)
                .then(|| truncate_chars(&text, EXCERPT_CHARS).to_string())
        });

        if SECTION_DIVIDER.matches(class_attr) {
            extracted.section = section_label(slide);
        }

        log::debug!(
            "Slide {}: classes=[{}], title={:?}",
            number,
            extracted.class_list(),
            extracted.title
        );
        if extracted.is_bare() {
            log::debug!("Slide {}: no recognized content", number);
        }

        extracted
    }
}

impl Default for HtmlSlideParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Elements strictly below `element`, in document order.
fn descendant_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// Trimmed text of an element and all its descendants.
fn text_of(element: ElementRef<'_>) -> String {
    join_stripped(element.text())
}

fn matches_field(element: &ElementRef<'_>, field: SlideField) -> bool {
    field.matches(element.value().attr("class"))
}

fn is_one_of(element: &ElementRef<'_>, tags: &[&str]) -> bool {
    tags.contains(&element.value().name())
}

fn non_empty_texts<'a>(elements: impl IntoIterator<Item = ElementRef<'a>>) -> Vec<String> {
    elements
        .into_iter()
        .map(text_of)
        .filter(|t| !t.is_empty())
        .collect()
}

/// First heading whose class names a title, falling back to the first heading.
fn find_title(slide: ElementRef<'_>) -> Option<ElementRef<'_>> {
    descendant_elements(slide)
        .filter(|e| is_one_of(e, HEADING_TAGS))
        .find(|e| matches_field(e, SlideField::Title))
        .or_else(|| descendant_elements(slide).find(|e| is_one_of(e, HEADING_TAGS)))
}

/// Collect entries for every element matching `field`.
///
/// Returns `None` when no element matches at all, and `Some` (possibly empty)
/// once at least one does.
fn collect_field<'a, F>(slide: ElementRef<'a>, field: SlideField, entry: F) -> Option<Vec<String>>
where
    F: Fn(ElementRef<'a>) -> Option<String>,
{
    let matched: Vec<_> = descendant_elements(slide)
        .filter(|e| matches_field(e, field))
        .collect();
    if matched.is_empty() {
        return None;
    }

    Some(matched.into_iter().filter_map(entry).collect())
}

/// A card's heading text, or an excerpt of its body when it has none.
fn card_entry(card: ElementRef<'_>) -> Option<String> {
    if let Some(heading) = descendant_elements(card).find(|e| is_one_of(e, CARD_TITLE_TAGS)) {
        return Some(text_of(heading));
    }

    let text = text_of(card);
    (!text.is_empty() && char_len(&text) < MAX_CARD_CHARS)
        .then(|| format!("{}...", truncate_chars(&text, EXCERPT_CHARS)))
}

fn section_label(slide: ElementRef<'_>) -> Option<SectionLabel> {
    let number = descendant_elements(slide).find(|e| matches_field(e, SlideField::SectionNumber))?;
    let title = descendant_elements(slide).find(|e| matches_field(e, SlideField::SectionTitle))?;

    Some(SectionLabel::new(text_of(number), text_of(title)))
}
