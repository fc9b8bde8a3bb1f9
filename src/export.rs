//! CSV export of harvested records.
//!
//! One row per record in first-seen order. List columns are joined with
//! `", "`.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::Result;
use crate::listing::ListingName;
use crate::result::Record;

#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "ReviewUID")]
    uid: &'a str,
    #[serde(rename = "Reviewer")]
    reviewer: &'a str,
    #[serde(rename = "Rating")]
    rating: &'a str,
    #[serde(rename = "RatingValue")]
    rating_value: u8,
    #[serde(rename = "DateRaw")]
    date_raw: &'a str,
    #[serde(rename = "DateParsed")]
    date_parsed: String,
    #[serde(rename = "DateParseSuccess")]
    date_parse_success: bool,
    #[serde(rename = "Review")]
    review: &'a str,
    #[serde(rename = "ImageCount")]
    image_count: usize,
    #[serde(rename = "ImageFiles")]
    image_files: String,
    #[serde(rename = "LikeCount")]
    like_count: u32,
    #[serde(rename = "Services")]
    services: String,
    #[serde(rename = "PositiveTags")]
    positive_tags: String,
    #[serde(rename = "NegativeTags")]
    negative_tags: String,
    #[serde(rename = "PriceTags")]
    price_tags: String,
    #[serde(rename = "OwnerResponded")]
    owner_responded: bool,
    #[serde(rename = "ClientName")]
    client_name: &'a str,
}

impl<'a> ExportRow<'a> {
    fn new(record: &'a Record, client_name: &'a str) -> Self {
        Self {
            uid: &record.uid,
            reviewer: &record.reviewer,
            rating: &record.rating_label,
            rating_value: record.rating_value,
            date_raw: &record.date_raw,
            date_parsed: record
                .date_parsed
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            date_parse_success: record.date_parse_success,
            review: &record.review_text,
            image_count: record.image_count,
            image_files: record.image_refs.join(", "),
            like_count: record.like_count,
            services: record.services.join(", "),
            positive_tags: record.positive_tags.join(", "),
            negative_tags: record.negative_tags.join(", "),
            price_tags: record.price_tags.join(", "),
            owner_responded: record.owner_responded,
            client_name,
        }
    }
}

/// Write `records` as CSV with a header row.
pub fn write_csv<W: Write>(writer: W, records: &[Record], client_name: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(ExportRow::new(record, client_name))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `records` to `{dir}/{listing}_reviews_{YYYYMMDD_HHMMSS}.csv`.
pub fn export_csv(
    dir: &Path,
    listing: &ListingName,
    records: &[Record],
    at: NaiveDateTime,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(listing.file_name("reviews", "csv", at));
    write_csv(File::create(&path)?, records, &listing.name)?;
    tracing::info!(path = %path.display(), rows = records.len(), "reviews exported");
    Ok(path)
}
