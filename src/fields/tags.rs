//! Structured tag buckets.
//!
//! Tags render as a flat run of tagged text nodes where a label node
//! ("Services", "Positive", ...) switches the bucket for the nodes after it.

use crate::result::TagBuckets;

/// Bucket a label switches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagLabel {
    Services,
    Positive,
    Negative,
    Price,
}

impl TagLabel {
    /// Parse a label node's text, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "services" => Some(Self::Services),
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            "price" => Some(Self::Price),
            _ => None,
        }
    }
}

impl TagBuckets {
    fn bucket_mut(&mut self, label: TagLabel) -> &mut Vec<String> {
        match label {
            TagLabel::Services => &mut self.services,
            TagLabel::Positive => &mut self.positive,
            TagLabel::Negative => &mut self.negative,
            TagLabel::Price => &mut self.price,
        }
    }
}

/// Sort tagged texts into buckets.
///
/// Empty texts are skipped. Texts seen before any label are passed to
/// `unlabeled` and dropped.
pub fn bucket_tags<I, S, F>(texts: I, mut unlabeled: F) -> TagBuckets
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(&str),
{
    let mut buckets = TagBuckets::default();
    let mut current = None;

    for text in texts {
        let text = text.as_ref().trim();
        if text.is_empty() {
            continue;
        }
        if let Some(label) = TagLabel::parse(text) {
            current = Some(label);
            continue;
        }
        match current {
            Some(label) => buckets.bucket_mut(label).push(text.to_string()),
            None => unlabeled(text),
        }
    }
    buckets
}

/// Position of the first bucket label in a run of tagged texts.
///
/// That label and everything after it are tags; only texts before it can be
/// review text.
#[must_use]
pub fn tag_run_start<I, S>(texts: I) -> Option<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .position(|text| TagLabel::parse(text.as_ref()).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_tags() {
        let texts = ["Services", "Dine in", "Positive", "Food", "Service", "Price", "$10–20"];
        let buckets = bucket_tags(texts, |_| panic!("nothing is unlabeled"));

        assert_eq!(buckets.services, vec!["Dine in"]);
        assert_eq!(buckets.positive, vec!["Food", "Service"]);
        assert!(buckets.negative.is_empty());
        assert_eq!(buckets.price, vec!["$10–20"]);
    }

    #[test]
    fn test_text_before_any_label_is_dropped() {
        let mut dropped = Vec::new();
        let buckets = bucket_tags(["Great food", "NEGATIVE", "Noise"], |t| dropped.push(t.to_string()));

        assert_eq!(dropped, vec!["Great food"]);
        assert_eq!(buckets.negative, vec!["Noise"]);
    }

    #[test]
    fn test_tag_run_start() {
        assert_eq!(tag_run_start(["Great pasta", " price ", "$10–20"]), Some(1));
        assert_eq!(tag_run_start(["Services", "Dine in"]), Some(0));
        assert_eq!(tag_run_start(["Lovely", "terrace"]), None);
    }

    #[test]
    fn test_empty_texts_skipped() {
        let buckets = bucket_tags(["Services", "  ", "", "Takeout"], |_| {});
        assert_eq!(buckets.services, vec!["Takeout"]);
    }
}
