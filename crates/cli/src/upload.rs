//! CLI tool for uploading rendered slide images into a new Google Slides
//! presentation.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::Error;
use deck_gslides::assets::DEFAULT_PATTERN;
use deck_gslides::{
    build_client, enumerate_images, CachedCredentialProvider, CredentialProvider, DriveClient,
    LoopbackAuthorizer, OAuthClient, PresentationUploader, SlidesClient, TokenCache,
    UploadProgress,
};
use regex::Regex;
use std::path::PathBuf;

/// Upload slide images to a new Google Slides presentation.
#[derive(Parser, Debug)]
#[command(name = "deck-upload")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Folder holding the rendered slide images
    #[arg(short, long, default_value = "slide_images")]
    images: PathBuf,

    /// Regex image file names must match; slides follow file name order
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Title of the new presentation
    #[arg(short, long, default_value = "Slide Deck")]
    title: String,

    /// OAuth client secret downloaded from the Google Cloud console
    #[arg(long, default_value = "credentials.json")]
    client_secret: PathBuf,

    /// Where the OAuth token is cached between runs
    #[arg(long, default_value = "token.json")]
    token_cache: PathBuf,

    /// Fail instead of opening the browser authorization flow
    #[arg(long)]
    no_browser: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    println!("Google Slides uploader");
    println!("{}", "=".repeat(50));

    let pattern = Regex::new(&args.pattern)
        .with_context(|| format!("Invalid image pattern: {}", args.pattern))?;

    let http = build_client()?;

    let mut provider = CachedCredentialProvider::new(
        TokenCache::new(&args.token_cache),
        &args.client_secret,
        Box::new(OAuthClient::new(http.clone())),
    );
    if !args.no_browser {
        provider = provider.with_authorizer(Box::new(LoopbackAuthorizer::new()));
    }

    let credential = match provider.acquire() {
        Ok(credential) => credential,
        Err(Error::MissingClientSecret(path)) => {
            print_client_secret_help(&path);
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to obtain credentials"),
    };

    let assets = match enumerate_images(&args.images, &pattern) {
        Ok(assets) => assets,
        Err(Error::MissingInput(path)) => {
            println!("Image folder not found: {}", path.display());
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to list slide images"),
    };
    println!("Processing {} slide images", assets.len());

    let drive = DriveClient::new(http.clone(), &credential.token);
    let slides = SlidesClient::new(http, &credential.token);
    let uploader = PresentationUploader::new(&drive, &slides, &args.title);

    let report = uploader
        .upload_with_progress(&assets, |progress| match progress {
            UploadProgress::Created { presentation_id } => {
                println!(
                    "Created presentation: https://docs.google.com/presentation/d/{}",
                    presentation_id
                );
            }
            UploadProgress::Uploading { asset, index, total } => {
                println!("  Uploading {} ({}/{})", asset.name, index, total);
            }
            UploadProgress::Submitting { .. } => {
                println!("  Creating slides...");
            }
        })
        .context("Upload failed")?;

    println!();
    println!("Done: {} slides", report.slide_count);
    println!("URL: {}", report.url);

    Ok(())
}

fn print_client_secret_help(path: &std::path::Path) {
    println!("OAuth client secret not found: {}", path.display());
    println!();
    println!("To create one:");
    println!("1. Open https://console.cloud.google.com/");
    println!("2. Create or select a project");
    println!("3. Go to \"APIs & Services\" > \"Credentials\"");
    println!("4. \"Create credentials\" > \"OAuth client ID\"");
    println!("5. Choose \"Desktop app\"");
    println!("6. Download the JSON and save it as {}", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["deck-upload"]);
        assert_eq!(args.images, PathBuf::from("slide_images"));
        assert_eq!(args.pattern, DEFAULT_PATTERN);
        assert_eq!(args.client_secret, PathBuf::from("credentials.json"));
        assert_eq!(args.token_cache, PathBuf::from("token.json"));
        assert!(!args.no_browser);
    }

    #[test]
    fn test_default_pattern_compiles() {
        let pattern = Regex::new(DEFAULT_PATTERN).unwrap();
        assert!(pattern.is_match("slide_01.png"));
        assert!(!pattern.is_match("slide_01.png.bak"));
    }
}
