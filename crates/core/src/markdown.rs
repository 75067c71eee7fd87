//! Markdown outline output.
//!
//! Each slide becomes a block of `**Label**: value` lines headed by a
//! `## Slide N` heading. Blocks are separated by a horizontal rule.

use crate::types::ExtractedSlide;

/// Separator placed between rendered slide blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n---\n";

/// Field labels used in the rendered outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub slide: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub content: &'static str,
    pub data: &'static str,
    pub cards: &'static str,
    pub steps: &'static str,
    pub section: &'static str,
    pub slide_type: &'static str,
}

impl Labels {
    pub const fn english() -> Self {
        Self {
            slide: "Slide",
            title: "Title",
            subtitle: "Subtitle",
            content: "Content",
            data: "Data",
            cards: "Cards",
            steps: "Steps",
            section: "Section",
            slide_type: "Slide type",
        }
    }

    pub const fn japanese() -> Self {
        Self {
            slide: "スライド",
            title: "タイトル",
            subtitle: "サブタイトル",
            content: "内容",
            data: "データ",
            cards: "カード",
            steps: "ステップ",
            section: "セクション",
            slide_type: "スライドタイプ",
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::english()
    }
}

/// The rendered lines of one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideBlock {
    /// Lines in output order; the first is always the slide heading and the
    /// last is always the slide type label.
    pub lines: Vec<String>,
}

impl SlideBlock {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// The block as Markdown, preceded by a blank line.
    pub fn to_markdown(&self) -> String {
        format!("\n{}", self.lines.join("\n"))
    }
}

/// Formatter for the Markdown slide outline.
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormatter {
    labels: Labels,
}

impl MarkdownFormatter {
    /// Create a new formatter with English labels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different label set.
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Render one slide into its block of lines.
    pub fn render_slide(&self, slide: &ExtractedSlide) -> SlideBlock {
        let labels = &self.labels;
        let mut lines = vec![format!("## {} {}", labels.slide, slide.number)];

        if let Some(title) = &slide.title {
            lines.push(field(labels.title, title));
        }

        if let Some(subtitle) = &slide.subtitle {
            lines.push(field(labels.subtitle, subtitle));
        }

        if let Some(items) = &slide.content_items {
            push_list(&mut lines, labels.content, items);
        }

        // Paragraphs are indented but carry no bullet and no label of their own
        lines.extend(slide.paragraphs.iter().map(|p| format!("  {}", p)));

        if let Some(stats) = &slide.stats {
            push_list(&mut lines, labels.data, stats);
        }

        if let Some(cards) = &slide.cards {
            push_list(&mut lines, labels.cards, cards);
        }

        if let Some(steps) = &slide.steps {
            push_list(&mut lines, labels.steps, steps);
        }

        if let Some(section) = &slide.section {
            lines.push(field(labels.section, &section.to_string()));
        }

        lines.push(field(labels.slide_type, &slide.class_list()));

        SlideBlock::new(lines)
    }

    /// Render all slides and join the blocks with the separator.
    pub fn format(&self, slides: &[ExtractedSlide]) -> String {
        log::debug!("Rendering {} slides", slides.len());

        slides
            .iter()
            .map(|slide| self.render_slide(slide).to_markdown())
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR)
    }

    /// Render a full document: a title heading followed by all slide blocks.
    pub fn format_document(&self, title: &str, slides: &[ExtractedSlide]) -> String {
        format!("# {}\n\n{}", title, self.format(slides))
    }
}

fn field(label: &str, value: &str) -> String {
    format!("**{}**: {}", label, value)
}

fn push_list(lines: &mut Vec<String>, label: &str, items: &[String]) {
    lines.push(format!("**{}**:", label));
    lines.extend(items.iter().map(|item| format!("  - {}", item)));
}
