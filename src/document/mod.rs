//! The rendered listing page.
//!
//! [`RenderableDocument`] is everything the pipeline needs from a live page:
//! lookups, scrolling, clicking, reads, and bounded waits. Element handles are
//! [`ElementRef`]s, which name a selector and a match position and are
//! resolved again on every use, so a handle never outlives a re-render.
//!
//! - [`SnapshotDocument`]: a static, already-rendered page (saved HTML, tests).
//! - `BrowserDocument`: a headless Chromium tab (`browser` feature).

#[cfg(feature = "browser")]
mod browser;
mod snapshot;

use std::time::Duration;

#[cfg(feature = "browser")]
pub use browser::BrowserDocument;
pub use snapshot::{decode_page, SnapshotDocument};

use crate::error::Result;

/// Handle to the `index`-th element matching `selector`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub selector: String,
    pub index: usize,
}

impl ElementRef {
    #[must_use]
    pub fn new(selector: impl Into<String>, index: usize) -> Self {
        Self {
            selector: selector.into(),
            index,
        }
    }
}

impl std::fmt::Display for ElementRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.selector, self.index)
    }
}

/// A live, scrollable rendered view of the listing.
pub trait RenderableDocument {
    /// Load `url` and wait for navigation to finish.
    fn navigate_to(&mut self, url: &str) -> Result<()>;

    /// Wait until `selector` matches, up to `timeout`.
    ///
    /// Returns [`crate::Error::Timeout`] when nothing matched in time.
    fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<ElementRef>;

    /// Every element currently matching `selector`, in document order.
    fn find_all(&mut self, selector: &str) -> Result<Vec<ElementRef>>;

    /// Scroll `container` to the end of its current content.
    fn scroll_to_end(&mut self, container: &ElementRef) -> Result<()>;

    fn click(&mut self, element: &ElementRef) -> Result<()>;

    /// Rendered text of `element`.
    fn text(&mut self, element: &ElementRef) -> Result<String>;

    fn attribute(&mut self, element: &ElementRef, name: &str) -> Result<Option<String>>;

    /// Current rendered HTML of the whole page.
    fn page_source(&mut self) -> Result<String>;

    /// Settle wait between actions.
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    /// Number of elements currently matching `selector`.
    fn count(&mut self, selector: &str) -> Result<usize> {
        Ok(self.find_all(selector)?.len())
    }
}
