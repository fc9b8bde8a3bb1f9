//! Structured fields of one entry.
//!
//! Every field is read independently from the entry's subtree in the
//! snapshot. A missing element degrades its field to a default, except the
//! rating: an entry without a parseable rating produces no record.

use chrono::NaiveDate;

use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::dom;
use crate::error::{Error, Result};
use crate::extractor::EntryView;
use crate::result::TagBuckets;

pub mod date;
pub mod images;
pub mod rating;
pub mod tags;

pub use date::parse_relative_date;
pub use images::{extract_images, HttpImageFetcher, ImageFetcher};
pub use rating::parse_rating;
pub use tags::{bucket_tags, tag_run_start};

/// Run-wide inputs to field extraction.
pub struct FieldContext<'a> {
    /// Fixed "today" for relative dates.
    pub today: NaiveDate,
    pub accepted_image_host: &'a str,
    /// `None` leaves photos alone.
    pub images: Option<&'a dyn ImageFetcher>,
}

/// Structured fields of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields {
    pub reviewer: String,
    pub rating_label: String,
    pub rating_value: u8,
    pub date_raw: String,
    pub date_parsed: Option<NaiveDate>,
    pub like_count: u32,
    pub tags: TagBuckets,
    pub owner_responded: bool,
    /// Stored image file names.
    pub image_refs: Vec<String>,
}

/// Trimmed text of the first `selector` match, reporting a miss as `field`.
fn text_field(
    entry: &EntryView,
    selector: &str,
    field: &'static str,
    sink: &mut dyn DiagnosticSink,
) -> Option<String> {
    let found = entry.find(selector).map(|sel| dom::trimmed_text(&sel));
    if found.is_none() {
        sink.on_diagnostic(entry.id, &DiagnosticEvent::FieldMissing { field });
    }
    found
}

/// Rating label and value. Fails when the control or its digit is missing.
pub fn extract_rating(entry: &EntryView) -> Result<(String, u8)> {
    let selectors = entry.selectors();
    let label = entry
        .find(&selectors.rating)
        .and_then(|sel| dom::get_attribute(&sel, &selectors.rating_label_attr))
        .ok_or_else(|| Error::RatingUnparseable(String::new()))?;
    let value = parse_rating(&label)?;
    Ok((label, value))
}

/// Like count; anything but plain digits counts as zero.
#[must_use]
pub fn extract_likes(entry: &EntryView) -> u32 {
    entry
        .find(&entry.selectors().like_count)
        .map(|sel| dom::trimmed_text(&sel))
        .filter(|text| !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()))
        .and_then(|text| text.parse().ok())
        .unwrap_or(0)
}

#[must_use]
pub fn owner_responded(entry: &EntryView) -> bool {
    entry.find(&entry.selectors().owner_reply).is_some()
}

pub fn extract_tags(entry: &EntryView, sink: &mut dyn DiagnosticSink) -> TagBuckets {
    let texts = entry
        .find_each(&entry.selectors().tagged_text)
        .iter()
        .map(dom::trimmed_text)
        .collect::<Vec<_>>();
    bucket_tags(&texts, |text| {
        sink.on_diagnostic(entry.id, &DiagnosticEvent::UnlabeledTag { text: text.to_string() });
    })
}

/// Extract every structured field of one entry.
///
/// Only a missing or unparseable rating is an error; the rating is read first
/// so that a skipped entry never fetches images.
pub fn extract_fields(
    entry: &EntryView,
    context: &FieldContext,
    sink: &mut dyn DiagnosticSink,
) -> Result<Fields> {
    let (rating_label, rating_value) = extract_rating(entry)?;
    let selectors = entry.selectors();

    let reviewer = text_field(entry, &selectors.reviewer, "reviewer", sink).unwrap_or_default();
    let date_raw = text_field(entry, &selectors.date, "date", sink).unwrap_or_default();
    let date_parsed = parse_relative_date(&date_raw, context.today);
    if date_parsed.is_none() {
        sink.on_diagnostic(entry.id, &DiagnosticEvent::DateUnparsed { raw: date_raw.clone() });
    }

    let image_refs = match context.images {
        Some(fetcher) => extract_images(entry, context.accepted_image_host, fetcher, sink),
        None => Vec::new(),
    };

    Ok(Fields {
        reviewer,
        rating_label,
        rating_value,
        date_raw,
        date_parsed,
        like_count: extract_likes(entry),
        tags: extract_tags(entry, sink),
        owner_responded: owner_responded(entry),
        image_refs,
    })
}
