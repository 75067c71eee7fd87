//! CLI tool for extracting an HTML slide deck into a Markdown outline.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use deck_core::{Labels, MarkdownFormatter};
use deck_html::HtmlSlideParser;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Extract slide content from an HTML deck as Markdown.
#[derive(Parser, Debug)]
#[command(name = "deck-extract")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input HTML file with one `div.slide` per slide
    #[arg(default_value = "index.html")]
    input: PathBuf,

    /// Output file (default: slides_content.md next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print output to stdout instead of writing to file
    #[arg(short, long)]
    print: bool,

    /// Document title written at the top of the output file
    #[arg(short, long, default_value = "Slide Deck Content")]
    title: String,

    /// Label language
    #[arg(long, value_enum, default_value_t = Lang::En)]
    lang: Lang,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Markdown)]
    format: Format,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Lang {
    En,
    Ja,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Markdown,
    Json,
}

impl Format {
    fn default_file_name(self) -> &'static str {
        match self {
            Format::Markdown => "slides_content.md",
            Format::Json => "slides_content.json",
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if args.verbose {
        eprintln!("Processing: {}", args.input.display());
    }

    let (body, document) = process_file(&args)?;

    print!("{}", body);
    if !body.ends_with('\n') {
        println!();
    }

    if !args.print {
        let output_path = get_output_path(&args.input, args.output.as_ref(), args.format);
        write_output(&output_path, &document)?;
        eprintln!("Saved to {}", output_path.display());
    }

    Ok(())
}

/// Extract the deck, returning the console body and the full file contents.
fn process_file(args: &Args) -> Result<(String, String)> {
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let reader = BufReader::new(file);

    let source = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let deck = HtmlSlideParser::new()
        .parse(reader, source)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    if args.verbose {
        eprintln!("  Found {} slides", deck.slides.len());
    }

    match args.format {
        Format::Markdown => {
            let labels = match args.lang {
                Lang::En => Labels::english(),
                Lang::Ja => Labels::japanese(),
            };
            let formatter = MarkdownFormatter::new().with_labels(labels);
            Ok((
                formatter.format(&deck.slides),
                formatter.format_document(&args.title, &deck.slides),
            ))
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(&deck).context("Failed to serialize deck")?;
            Ok((json.clone(), format!("{}\n", json)))
        }
    }
}

/// Determine the output path: explicit, or next to the input file.
fn get_output_path(input_path: &Path, output: Option<&PathBuf>, format: Format) -> PathBuf {
    match output {
        Some(path) => path.clone(),
        None => match input_path.parent() {
            Some(parent) => parent.join(format.default_file_name()),
            None => PathBuf::from(format.default_file_name()),
        },
    }
}

/// Write output to a file, replacing any previous contents.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
