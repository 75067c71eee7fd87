//! HTML slide deck parser backend.
//!
//! Parses decks authored as one `<div class="slide">` per slide and extracts
//! titles, lists, callouts, cards, and steps from each slide.

pub mod parser;
pub mod rules;

pub use parser::HtmlSlideParser;
pub use rules::{ClassMatch, SlideField};
