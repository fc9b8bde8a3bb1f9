//! Compiled regex patterns and markup constants for review extraction.
//!
//! All patterns are compiled once using `LazyLock`. The selector constants are
//! the defaults behind [`crate::options::Selectors`]; the listing markup has no
//! content contract, so these class tokens are the only stable handles.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Listing Markup
// =============================================================================

/// Listing title, present once the page has rendered.
pub const READY_MARKER: &str = ".DU9Pgb";

/// Scrollable container holding the review feed.
pub const SCROLL_CONTAINER: &str = "div.m6QErb.DxyBCb";

/// Attribute carrying the per-entry identifier.
pub const ENTRY_ID_ATTR: &str = "data-review-id";

/// One rendered review entry.
pub const ENTRY: &str = "div[data-review-id]";

/// "More" control that expands truncated review text.
pub const MORE_BUTTON: &str = "button.w8nwRe";

pub const REVIEWER: &str = ".d4r55";

/// Star control; its `aria-label` holds the rating ("5 stars").
pub const RATING: &str = ".kvMYJc";

pub const RATING_LABEL_ATTR: &str = "aria-label";

/// Relative date label ("3 weeks ago").
pub const DATE: &str = ".rsqaWe";

/// Span holding the full review text in the common rendering variant.
pub const PRIMARY_TEXT: &str = ".wiI7pd";

/// Block holding the business owner's reply.
pub const OWNER_REPLY: &str = ".CDe7pd";

/// Generic tagged text node (tag labels, tag values, some review text variants).
pub const TAGGED_TEXT: &str = ".RfDO5c";

/// Subtree that only ever holds review text.
pub const NARROW_TEXT: &str = r#"div[jslog="127691"]"#;

pub const LIKE_COUNT: &str = ".pkWtMe";

/// Photo thumbnails attached to a review.
pub const MEDIA_BUTTON: &str = "div.KtCyie > button";

/// Host token every accepted image URL must carry.
pub const IMAGE_HOST: &str = "googleusercontent";

/// Phrase that opens every owner reply.
pub const OWNER_REPLY_PHRASE: &str = "response from the owner";

/// Raw tokens that only ever appear in UI chrome: the "more" and "star" icon
/// glyphs, badges and counters.
pub const STRUCTURAL_DENYLIST: &[&str] = &["\u{e5d4}", "\u{e838}", "New", "Updated", "stars", "reviews"];

// =============================================================================
// Text Patterns
// =============================================================================

/// Characters outside the conservative set kept by the structural noise filter.
pub static NOISE_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9\s.,!?']").expect("NOISE_CHARS regex")
});

/// Any non-word character (validity predicate).
pub static NON_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\W").expect("NON_WORD regex")
});

pub static ASCII_LETTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z]").expect("ASCII_LETTER regex")
});

/// First run of digits in a relative date label.
pub static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+").expect("LEADING_NUMBER regex")
});

/// CSS `background-image` URL, quoted or unquoted.
pub static BACKGROUND_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(["']?(https[^"')]+)["']?\)"#).expect("BACKGROUND_URL regex")
});

/// Characters not allowed in a file stem.
pub static UNSAFE_FILE_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9_\-]").expect("UNSAFE_FILE_CHARS regex")
});
