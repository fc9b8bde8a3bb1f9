//! Configuration options for a harvest run.
//!
//! The `Options` struct is threaded explicitly through [`crate::harvest`];
//! nothing in the pipeline reads ambient or global state.

use std::time::Duration;

use chrono::NaiveDate;

use crate::patterns;

/// CSS selectors describing the listing markup.
///
/// Defaults come from [`crate::patterns`]. Override individual fields when the
/// host rotates its class names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    /// Element whose presence means the page has rendered.
    pub ready: String,
    /// Scrollable feed container.
    pub scroll_container: String,
    /// One review entry.
    pub entry: String,
    /// Attribute holding the entry identifier.
    pub entry_id_attr: String,
    /// "More" control inside an entry.
    pub more_button: String,
    pub reviewer: String,
    pub rating: String,
    /// Attribute on the rating control holding its accessible label.
    pub rating_label_attr: String,
    pub date: String,
    pub primary_text: String,
    pub owner_reply: String,
    pub tagged_text: String,
    pub narrow_text: String,
    pub like_count: String,
    pub media_button: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            ready: patterns::READY_MARKER.to_string(),
            scroll_container: patterns::SCROLL_CONTAINER.to_string(),
            entry: patterns::ENTRY.to_string(),
            entry_id_attr: patterns::ENTRY_ID_ATTR.to_string(),
            more_button: patterns::MORE_BUTTON.to_string(),
            reviewer: patterns::REVIEWER.to_string(),
            rating: patterns::RATING.to_string(),
            rating_label_attr: patterns::RATING_LABEL_ATTR.to_string(),
            date: patterns::DATE.to_string(),
            primary_text: patterns::PRIMARY_TEXT.to_string(),
            owner_reply: patterns::OWNER_REPLY.to_string(),
            tagged_text: patterns::TAGGED_TEXT.to_string(),
            narrow_text: patterns::NARROW_TEXT.to_string(),
            like_count: patterns::LIKE_COUNT.to_string(),
            media_button: patterns::MEDIA_BUTTON.to_string(),
        }
    }
}

/// Incremental loader budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Hard cap on scroll rounds.
    ///
    /// Listings beyond roughly 300-400 entries hit this cap before the feed
    /// ends; whatever is rendered by then is what gets harvested.
    ///
    /// Default: `60`
    pub max_attempts: usize,

    /// Pause after each scroll for the feed to render.
    ///
    /// Default: `2.5s`
    pub settle_delay: Duration,

    /// Consecutive no-growth rounds that end loading.
    ///
    /// Default: `3`
    pub stability_rounds: usize,

    /// How long to wait for the scroll container before giving up.
    ///
    /// Default: `10s`
    pub container_timeout: Duration,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            settle_delay: Duration::from_millis(2500),
            stability_rounds: 3,
            container_timeout: Duration::from_secs(10),
        }
    }
}

/// Configuration options for a harvest run.
///
/// # Example
///
/// ```rust
/// use review_harvest::Options;
///
/// let options = Options {
///     headless: true,
///     download_images: false,
///     ..Options::default()
/// };
/// assert_eq!(options.load.max_attempts, 60);
/// ```
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Listing URL. When set, the pipeline navigates there first.
    ///
    /// Default: `None`
    pub url: Option<String>,

    /// Launch the browser without a visible window. Has no effect on extraction.
    ///
    /// Default: `false`
    pub headless: bool,

    /// Bundle the export artifacts. Consumed only by the export layer.
    ///
    /// Default: `false`
    pub bundle: bool,

    /// Page-readiness wait. Running out of time aborts the run.
    ///
    /// Default: `15s`
    pub page_timeout: Duration,

    /// Incremental loader budget.
    pub load: LoadOptions,

    /// Pause after each "More" click.
    ///
    /// Default: `100ms`
    pub click_settle: Duration,

    /// Listing markup.
    pub selectors: Selectors,

    /// Host token an image URL must contain to be harvested.
    ///
    /// Default: `"googleusercontent"`
    pub accepted_image_host: String,

    /// Fetch and store accepted images.
    ///
    /// Default: `true`
    pub download_images: bool,

    /// "Today" for relative date parsing. `None` uses the local date at the
    /// start of the run.
    ///
    /// Default: `None`
    pub reference_date: Option<NaiveDate>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            url: None,
            headless: false,
            bundle: false,
            page_timeout: Duration::from_secs(15),
            load: LoadOptions::default(),
            click_settle: Duration::from_millis(100),
            selectors: Selectors::default(),
            accepted_image_host: patterns::IMAGE_HOST.to_string(),
            download_images: true,
            reference_date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = Options::default();

        assert!(opts.url.is_none());
        assert!(!opts.headless);
        assert!(!opts.bundle);
        assert_eq!(opts.page_timeout, Duration::from_secs(15));
        assert_eq!(opts.click_settle, Duration::from_millis(100));
        assert_eq!(opts.accepted_image_host, "googleusercontent");
        assert!(opts.download_images);
        assert!(opts.reference_date.is_none());
    }

    #[test]
    fn test_default_load_budget() {
        let load = LoadOptions::default();

        assert_eq!(load.max_attempts, 60);
        assert_eq!(load.settle_delay, Duration::from_millis(2500));
        assert_eq!(load.stability_rounds, 3);
        assert_eq!(load.container_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_default_selectors_match_patterns() {
        let sel = Selectors::default();

        assert_eq!(sel.entry, "div[data-review-id]");
        assert_eq!(sel.entry_id_attr, "data-review-id");
        assert_eq!(sel.owner_reply, ".CDe7pd");
        assert_eq!(sel.narrow_text, r#"div[jslog="127691"]"#);
    }

    #[test]
    fn test_headless_does_not_touch_extraction_settings() {
        let opts = Options {
            headless: true,
            ..Options::default()
        };

        assert_eq!(opts.selectors, Selectors::default());
        assert_eq!(opts.load, LoadOptions::default());
    }
}
