//! Content expander.
//!
//! Long reviews render truncated behind a "More" control. Every such control
//! inside an entry is clicked before the extraction snapshot is taken, so the
//! extractors only ever see full text. Clicks are best effort.

use std::time::Duration;

use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::document::RenderableDocument;
use crate::options::Selectors;

/// Clicks attempted and clicks that failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandReport {
    pub clicked: usize,
    pub failed: usize,
}

/// Click every "More" control found under any entry.
pub fn expand<D>(
    document: &mut D,
    selectors: &Selectors,
    click_settle: Duration,
    sink: &mut dyn DiagnosticSink,
) -> ExpandReport
where
    D: RenderableDocument + ?Sized,
{
    let scoped = format!("{} {}", selectors.entry, selectors.more_button);
    let buttons = match document.find_all(&scoped) {
        Ok(buttons) => buttons,
        Err(e) => {
            tracing::warn!(error = %e, "could not look up \"More\" controls");
            return ExpandReport::default();
        }
    };

    // A clicked control may leave the page; going last to first keeps the
    // earlier match positions valid.
    let mut report = ExpandReport::default();
    for button in buttons.iter().rev() {
        match document.click(button) {
            Ok(()) => {
                report.clicked += 1;
                document.pause(click_settle);
            }
            Err(e) => {
                report.failed += 1;
                sink.on_diagnostic(
                    "",
                    &DiagnosticEvent::ExpandFailed {
                        reason: format!("{button}: {e}"),
                    },
                );
            }
        }
    }

    tracing::debug!(clicked = report.clicked, failed = report.failed, "expanded entries");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use crate::document::ElementRef;
    use crate::error::{Error, Result};

    /// Page with `buttons` controls where clicks on `broken` indexes fail.
    struct Buttons {
        buttons: usize,
        broken: Vec<usize>,
        clicked: Vec<usize>,
        pauses: usize,
    }

    impl RenderableDocument for Buttons {
        fn navigate_to(&mut self, _url: &str) -> Result<()> {
            Ok(())
        }
        fn wait_for_selector(&mut self, selector: &str, _timeout: Duration) -> Result<ElementRef> {
            Ok(ElementRef::new(selector, 0))
        }
        fn find_all(&mut self, selector: &str) -> Result<Vec<ElementRef>> {
            assert_eq!(selector, "div[data-review-id] button.w8nwRe");
            Ok((0..self.buttons).map(|i| ElementRef::new(selector, i)).collect())
        }
        fn scroll_to_end(&mut self, _container: &ElementRef) -> Result<()> {
            Ok(())
        }
        fn click(&mut self, element: &ElementRef) -> Result<()> {
            if self.broken.contains(&element.index) {
                return Err(Error::Document("detached".into()));
            }
            self.clicked.push(element.index);
            Ok(())
        }
        fn text(&mut self, _element: &ElementRef) -> Result<String> {
            Ok(String::new())
        }
        fn attribute(&mut self, _element: &ElementRef, _name: &str) -> Result<Option<String>> {
            Ok(None)
        }
        fn page_source(&mut self) -> Result<String> {
            Ok(String::new())
        }
        fn pause(&mut self, _duration: Duration) {
            self.pauses += 1;
        }
    }

    #[test]
    fn test_failed_clicks_do_not_stop_expansion() {
        let mut page = Buttons { buttons: 4, broken: vec![1], clicked: vec![], pauses: 0 };
        let mut sink = MemorySink::new();
        let report = expand(&mut page, &Selectors::default(), Duration::from_millis(100), &mut sink);

        assert_eq!(report, ExpandReport { clicked: 3, failed: 1 });
        assert_eq!(page.clicked, vec![3, 2, 0]);
        assert_eq!(page.pauses, 3);
        assert_eq!(sink.events.len(), 1);
    }
}
