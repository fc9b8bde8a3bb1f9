//! Listing identity derived from the listing URL.
//!
//! The listing name labels every export artifact. It comes from the path
//! segment after `/place/`, never from the rendered page.

use chrono::NaiveDateTime;
use serde::Serialize;
use url::Url;

use crate::patterns::UNSAFE_FILE_CHARS;

/// Name used when the URL carries no `/place/` segment.
pub const UNKNOWN_LISTING: &str = "Unknown Business";

/// Human-readable listing name plus its filesystem-safe form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingName {
    /// Decoded name, e.g. `Joe's Pizza`.
    pub name: String,
    /// Name with everything outside `[A-Za-z0-9_-]` replaced by `_`.
    pub sanitized: String,
}

impl ListingName {
    /// Derive the listing name from a listing URL.
    ///
    /// Falls back to [`UNKNOWN_LISTING`] when the URL does not parse or has no
    /// `/place/<name>` segment.
    ///
    /// ```rust
    /// use review_harvest::listing::ListingName;
    ///
    /// let listing = ListingName::from_url(
    ///     "https://www.google.com/maps/place/Joe's+Pizza/@40.7,-73.9,17z",
    /// );
    /// assert_eq!(listing.name, "Joe's Pizza");
    /// assert_eq!(listing.sanitized, "Joe_s_Pizza");
    /// ```
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        let name = place_segment(url).unwrap_or_else(|| UNKNOWN_LISTING.to_string());
        Self::new(name)
    }

    #[must_use]
    pub fn new(name: String) -> Self {
        let sanitized = sanitize_file_stem(&name);
        Self { name, sanitized }
    }

    /// Export file name: `{sanitized}_{kind}_{YYYYMMDD_HHMMSS}.{ext}`.
    #[must_use]
    pub fn file_name(&self, kind: &str, ext: &str, at: NaiveDateTime) -> String {
        format!("{}_{kind}_{}.{ext}", self.sanitized, at.format("%Y%m%d_%H%M%S"))
    }
}

impl Default for ListingName {
    fn default() -> Self {
        Self::new(UNKNOWN_LISTING.to_string())
    }
}

fn place_segment(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let path = parsed.path();
    let (_, rest) = path.split_once("/place/")?;
    let raw = rest.split('/').next().filter(|s| !s.is_empty())?;

    let decoded = urlencoding::decode(raw).ok()?;
    Some(decoded.replace('+', " "))
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
#[must_use]
pub fn sanitize_file_stem(s: &str) -> String {
    UNSAFE_FILE_CHARS.replace_all(s, "_").into_owned()
}
