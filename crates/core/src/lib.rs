//! Core domain types, text helpers, and Markdown formatting
//! for HTML slide deck extraction.

pub mod error;
pub mod markdown;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use markdown::{Labels, MarkdownFormatter, SlideBlock};
pub use types::{Deck, ExtractedSlide, SectionLabel};
