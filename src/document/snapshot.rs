//! Static, already-rendered page.
//!
//! A snapshot cannot scroll or expand anything: scrolls and clicks only check
//! that their target exists, and pauses return immediately. Used to
//! re-extract saved pages offline and as the fixture document in tests.

use std::sync::LazyLock;
use std::time::Duration;

use dom_query::{Document, Selection};
use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

use super::{ElementRef, RenderableDocument};
use crate::dom;
use crate::error::{Error, Result};

/// `<meta charset>` or `http-equiv` content-type charset declaration.
#[allow(clippy::expect_used)]
static CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s;>]+)"#).expect("valid regex")
});

/// Decode saved page bytes to UTF-8 using the declared charset.
///
/// Only the first 1024 bytes are searched for the declaration; pages without
/// one are treated as UTF-8. Invalid sequences become U+FFFD.
#[must_use]
pub fn decode_page(bytes: &[u8]) -> String {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]);
    let encoding = CHARSET_RE
        .captures(&head)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
        .unwrap_or(UTF_8);

    if encoding == UTF_8 {
        return String::from_utf8_lossy(bytes).into_owned();
    }
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

/// A rendered page held in memory.
pub struct SnapshotDocument {
    html: String,
    doc: Document,
    url: Option<String>,
}

impl SnapshotDocument {
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        let html = html.into();
        let doc = dom::parse(&html);
        Self { html, doc, url: None }
    }

    /// Snapshot from raw saved bytes in any declared charset.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(decode_page(bytes))
    }

    /// URL of the last `navigate_to`, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn resolve(&self, element: &ElementRef) -> Result<Selection<'_>> {
        self.doc
            .select(&element.selector)
            .nodes()
            .get(element.index)
            .map(|node| Selection::from(*node))
            .ok_or_else(|| Error::Document(format!("{element} is not in the snapshot")))
    }
}

impl RenderableDocument for SnapshotDocument {
    fn navigate_to(&mut self, url: &str) -> Result<()> {
        tracing::debug!(url, "snapshot document ignores navigation");
        self.url = Some(url.to_string());
        Ok(())
    }

    fn wait_for_selector(&mut self, selector: &str, _timeout: Duration) -> Result<ElementRef> {
        if self.doc.select(selector).exists() {
            Ok(ElementRef::new(selector, 0))
        } else {
            Err(Error::Timeout {
                selector: selector.to_string(),
                waited: Duration::ZERO,
            })
        }
    }

    fn find_all(&mut self, selector: &str) -> Result<Vec<ElementRef>> {
        let len = self.doc.select(selector).length();
        Ok((0..len).map(|i| ElementRef::new(selector, i)).collect())
    }

    fn scroll_to_end(&mut self, container: &ElementRef) -> Result<()> {
        self.resolve(container).map(|_| ())
    }

    fn click(&mut self, element: &ElementRef) -> Result<()> {
        self.resolve(element).map(|_| ())
    }

    fn text(&mut self, element: &ElementRef) -> Result<String> {
        self.resolve(element).map(|sel| dom::trimmed_text(&sel))
    }

    fn attribute(&mut self, element: &ElementRef, name: &str) -> Result<Option<String>> {
        self.resolve(element).map(|sel| dom::get_attribute(&sel, name))
    }

    fn page_source(&mut self) -> Result<String> {
        Ok(self.html.clone())
    }

    fn pause(&mut self, _duration: Duration) {}
}
