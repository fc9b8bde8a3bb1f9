//! Record assembly.

use crate::fields::Fields;
use crate::result::{ExtractionResult, Record};

/// Run-local identifier for the `n`-th assembled record (1-based).
#[must_use]
pub fn format_uid(n: usize) -> String {
    format!("R{n:03}")
}

/// Build the immutable record for one entry.
#[must_use]
pub fn assemble(uid: String, entry_id: &str, extraction: ExtractionResult, fields: Fields) -> Record {
    let Fields {
        reviewer,
        rating_label,
        rating_value,
        date_raw,
        date_parsed,
        like_count,
        tags,
        owner_responded,
        image_refs,
    } = fields;

    Record {
        uid,
        entry_id: entry_id.to_string(),
        reviewer,
        rating_label,
        rating_value,
        date_raw,
        date_parse_success: date_parsed.is_some(),
        date_parsed,
        review_text: extraction.text,
        text_strategy: extraction.strategy,
        image_count: image_refs.len(),
        image_refs,
        like_count,
        services: tags.services,
        positive_tags: tags.positive,
        negative_tags: tags.negative,
        price_tags: tags.price,
        owner_responded,
    }
}
