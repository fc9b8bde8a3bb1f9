//! Harvest reviews from a listing URL (or a saved page) into a CSV file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use review_harvest::diagnostics::{MemorySink, Tee, TracingSink};
use review_harvest::document::{RenderableDocument, SnapshotDocument};
use review_harvest::export::export_csv;
use review_harvest::fields::{HttpImageFetcher, ImageFetcher};
use review_harvest::{harvest, Harvest, Options};

#[derive(Parser)]
#[command(name = "review-harvest")]
#[command(about = "Harvest de-duplicated reviews from a listing page into CSV")]
struct Cli {
    /// Listing URL (also names the export when used with --html)
    url: Option<String>,

    /// Extract from a saved, already-rendered page instead of a browser
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Run the browser without a window
    #[arg(long)]
    headless: bool,

    /// Output directory for the CSV and images
    #[arg(long, default_value = "exports")]
    out: PathBuf,

    /// Do not download review photos
    #[arg(long)]
    no_images: bool,

    /// Maximum scroll rounds while loading the feed
    #[arg(long, value_name = "N")]
    max_scrolls: Option<usize>,

    /// Bundle export artifacts
    #[arg(long)]
    bundle: bool,

    /// Write every diagnostic event as a JSON line to FILE
    #[arg(long, value_name = "FILE")]
    diagnostics: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("review_harvest=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut options = Options {
        url: cli.url.clone(),
        headless: cli.headless,
        bundle: cli.bundle,
        download_images: !cli.no_images,
        ..Options::default()
    };
    if let Some(max) = cli.max_scrolls {
        options.load.max_attempts = max;
    }
    if options.bundle {
        tracing::warn!("--bundle is accepted but bundling is not performed");
    }

    let mut document = open_document(&cli, &options)?;
    let images = HttpImageFetcher::new(cli.out.join("images"))?;

    let harvest = run_harvest(
        document.as_mut(),
        &options,
        &images,
        cli.diagnostics.as_deref(),
    )?;

    if harvest.is_empty() {
        println!("No review data available for export.");
        return Ok(());
    }

    let listing = harvest.listing.clone().unwrap_or_default();
    let path = export_csv(&cli.out, &listing, &harvest.records, Local::now().naive_local())?;
    println!(
        "Exported {} reviews for {} to {}",
        harvest.records.len(),
        listing.name,
        path.display()
    );
    Ok(())
}

/// Run the harvest, writing the diagnostics file (when asked for) whether or
/// not the harvest succeeds.
fn run_harvest(
    document: &mut dyn RenderableDocument,
    options: &Options,
    images: &dyn ImageFetcher,
    diagnostics: Option<&Path>,
) -> Result<Harvest> {
    let mut tracing_sink = TracingSink;
    let Some(path) = diagnostics else {
        return harvest(document, options, &mut tracing_sink, images).context("harvest failed");
    };

    let mut memory = MemorySink::new();
    let result = {
        let mut sink = Tee {
            first: &mut tracing_sink,
            second: &mut memory,
        };
        harvest(document, options, &mut sink, images)
    };
    write_diagnostics(path, &memory)?;
    result.context("harvest failed")
}

fn open_document(cli: &Cli, options: &Options) -> Result<Box<dyn RenderableDocument>> {
    if let Some(path) = &cli.html {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        return Ok(Box::new(SnapshotDocument::from_bytes(&bytes)));
    }
    if options.url.is_none() {
        bail!("a listing URL or --html FILE is required");
    }
    launch_browser(options)
}

#[cfg(feature = "browser")]
fn launch_browser(options: &Options) -> Result<Box<dyn RenderableDocument>> {
    let browser = review_harvest::document::BrowserDocument::launch(options)?;
    Ok(Box::new(browser))
}

#[cfg(not(feature = "browser"))]
fn launch_browser(_options: &Options) -> Result<Box<dyn RenderableDocument>> {
    bail!("built without the `browser` feature; use --html FILE")
}

fn write_diagnostics(path: &Path, sink: &MemorySink) -> Result<()> {
    let mut file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    for (entry, event) in &sink.events {
        let line = serde_json::json!({ "entry": entry, "diagnostic": event });
        writeln!(file, "{line}")?;
    }
    Ok(())
}
