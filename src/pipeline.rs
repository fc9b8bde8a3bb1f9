//! Harvest pipeline.
//!
//! ```text
//! navigate -> ready -> load -> collect -> expand -> snapshot -> extract -> assemble
//! ```
//!
//! The first five phases drive the live document. Extraction then runs over
//! one rendered snapshot taken after expansion, so field reads never race a
//! re-render.

use chrono::{Local, NaiveDate};

use crate::assembler::{assemble, format_uid};
use crate::collector::{collect, EntryMap};
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::document::{RenderableDocument, SnapshotDocument};
use crate::dom;
use crate::error::Result;
use crate::expander::expand;
use crate::extractor::{extract_text, Page};
use crate::fields::{extract_fields, FieldContext, ImageFetcher};
use crate::listing::ListingName;
use crate::loader::load;
use crate::options::Options;
use crate::result::{Harvest, Record};

/// Harvest every review from a listing page.
///
/// Returns `Err` only for document-level failures: navigation, the readiness
/// wait, the scroll container, or the snapshot. A listing with no entries is
/// `Ok` with [`Harvest::is_empty`] set.
pub fn harvest<D>(
    document: &mut D,
    options: &Options,
    sink: &mut dyn DiagnosticSink,
    images: &dyn ImageFetcher,
) -> Result<Harvest>
where
    D: RenderableDocument + ?Sized,
{
    let today = reference_date(options);
    let selectors = &options.selectors;
    let listing = options.url.as_deref().map(ListingName::from_url);

    if let Some(url) = &options.url {
        tracing::info!(url = %url, "opening listing");
        document.navigate_to(url)?;
    }

    let title = document.wait_for_selector(&selectors.ready, options.page_timeout)?;
    match document.text(&title) {
        Ok(title) => tracing::info!(title = %title, "listing ready"),
        Err(_) => tracing::info!("listing ready"),
    }

    let report = load(document, &selectors.scroll_container, &selectors.entry, &options.load)?;
    let entries = collect(document, selectors, sink)?;

    let mut harvest = Harvest {
        attempts_used: report.attempts_used,
        entries_collected: entries.len(),
        listing,
        ..Harvest::default()
    };
    if entries.is_empty() {
        tracing::warn!("no review data available");
        return Ok(harvest);
    }

    expand(document, selectors, options.click_settle, sink);

    let html = document.page_source()?;
    let snapshot = dom::parse(&html);
    let context = FieldContext {
        today,
        accepted_image_host: &options.accepted_image_host,
        images: options.download_images.then_some(images),
    };
    harvest.records = extract_records(&snapshot, &entries, options, &context, sink);

    if harvest.is_empty() {
        tracing::warn!("no review data available");
    }
    tracing::info!(
        entries = harvest.entries_collected,
        records = harvest.records.len(),
        attempts = harvest.attempts_used,
        "harvest complete"
    );
    Ok(harvest)
}

/// Harvest an already-rendered page held as HTML.
pub fn harvest_snapshot(
    html: &str,
    options: &Options,
    sink: &mut dyn DiagnosticSink,
    images: &dyn ImageFetcher,
) -> Result<Harvest> {
    let mut document = SnapshotDocument::new(html);
    harvest(&mut document, options, sink, images)
}

/// Extract and assemble records for collected entries from a snapshot.
///
/// Entries missing from the snapshot or without a parseable rating produce no
/// record and do not consume a uid.
pub fn extract_records(
    snapshot: &dom::Document,
    entries: &EntryMap,
    options: &Options,
    context: &FieldContext,
    sink: &mut dyn DiagnosticSink,
) -> Vec<Record> {
    let page = Page::new(snapshot, &options.selectors);
    let mut records = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(view) = page.entry(entry) else {
            sink.on_diagnostic(
                &entry.id,
                &DiagnosticEvent::EntrySkipped {
                    reason: "not present in the rendered snapshot".to_string(),
                },
            );
            continue;
        };

        let fields = match extract_fields(&view, context, sink) {
            Ok(fields) => fields,
            Err(e) => {
                sink.on_diagnostic(&entry.id, &DiagnosticEvent::EntrySkipped { reason: e.to_string() });
                continue;
            }
        };
        let extraction = extract_text(&view, sink);
        tracing::debug!(entry = %entry.id, strategy = %extraction.strategy, "entry extracted");

        let uid = format_uid(records.len() + 1);
        records.push(assemble(uid, &entry.id, extraction, fields));
    }
    records
}

/// "Today" for a run: the configured reference date or the local date.
#[must_use]
pub fn reference_date(options: &Options) -> NaiveDate {
    options
        .reference_date
        .unwrap_or_else(|| Local::now().date_naive())
}
