//! Incremental loader.
//!
//! The listing only renders entries as its feed is scrolled. The loader
//! scrolls the feed container to its end, waits for rendering, and re-counts
//! entries until the count has stopped growing for `stability_rounds`
//! consecutive rounds or `max_attempts` rounds have run. The report's
//! [`StopReason`] records which limit ended the load.

use crate::document::RenderableDocument;
use crate::error::{Error, Result};
use crate::options::LoadOptions;

/// Why loading ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The entry count stopped growing.
    Stable,
    /// The attempt budget ran out first; the feed may have more entries.
    AttemptCap,
}

/// Outcome of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub attempts_used: usize,
    /// Entries rendered when loading stopped (before de-duplication).
    pub entries_rendered: usize,
    pub stop_reason: StopReason,
}

/// Scroll `container_selector` until `entry_selector`'s count is stable.
///
/// Fails with [`Error::ContainerNotFound`] when the container does not appear
/// within `options.container_timeout`. A scroll or count failure inside a
/// round counts as a no-growth round.
pub fn load<D>(
    document: &mut D,
    container_selector: &str,
    entry_selector: &str,
    options: &LoadOptions,
) -> Result<LoadReport>
where
    D: RenderableDocument + ?Sized,
{
    let container = document
        .wait_for_selector(container_selector, options.container_timeout)
        .map_err(|e| Error::ContainerNotFound(format!("{container_selector}: {e}")))?;

    let mut attempts = 0;
    let mut stable_rounds = 0;
    let mut last_count = 0;

    while attempts < options.max_attempts && stable_rounds < options.stability_rounds {
        tracing::trace!(attempt = attempts + 1, "scrolling");
        if let Err(e) = document.scroll_to_end(&container) {
            tracing::debug!(attempt = attempts + 1, error = %e, "scroll failed");
        }
        document.pause(options.settle_delay);

        let count = match document.count(entry_selector) {
            Ok(count) => count,
            Err(e) => {
                tracing::debug!(attempt = attempts + 1, error = %e, "entry count failed");
                last_count
            }
        };

        let grew = count != last_count;
        if grew {
            stable_rounds = 0;
        } else {
            stable_rounds += 1;
        }
        last_count = count;
        attempts += 1;

        tracing::debug!(attempt = attempts, count, grew, "scroll round");
    }

    let stop_reason = if stable_rounds >= options.stability_rounds {
        StopReason::Stable
    } else {
        StopReason::AttemptCap
    };

    tracing::info!(attempts, entries = last_count, ?stop_reason, "scrolling complete");
    if stop_reason == StopReason::AttemptCap {
        tracing::warn!(
            max_attempts = options.max_attempts,
            "scroll budget exhausted before the feed stopped growing; results may be partial"
        );
    }

    Ok(LoadReport {
        attempts_used: attempts,
        entries_rendered: last_count,
        stop_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ElementRef;
    use std::time::Duration;

    /// Feed whose entry count follows `counts`, one value per scroll.
    struct ScriptedFeed {
        counts: Vec<usize>,
        scrolls: usize,
        has_container: bool,
        /// Scroll rounds whose count fails.
        failing_counts: Vec<usize>,
    }

    impl ScriptedFeed {
        fn new(counts: Vec<usize>) -> Self {
            Self { counts, scrolls: 0, has_container: true, failing_counts: Vec::new() }
        }
    }

    impl RenderableDocument for ScriptedFeed {
        fn navigate_to(&mut self, _url: &str) -> Result<()> {
            Ok(())
        }
        fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<ElementRef> {
            if self.has_container {
                Ok(ElementRef::new(selector, 0))
            } else {
                Err(Error::Timeout { selector: selector.into(), waited: timeout })
            }
        }
        fn find_all(&mut self, selector: &str) -> Result<Vec<ElementRef>> {
            if self.failing_counts.contains(&self.scrolls) {
                return Err(Error::Browser("node is detached".into()));
            }
            let idx = self.scrolls.saturating_sub(1).min(self.counts.len() - 1);
            Ok((0..self.counts[idx]).map(|i| ElementRef::new(selector, i)).collect())
        }
        fn scroll_to_end(&mut self, _container: &ElementRef) -> Result<()> {
            self.scrolls += 1;
            Ok(())
        }
        fn click(&mut self, _element: &ElementRef) -> Result<()> {
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
        fn pause(&mut self, _duration: Duration) {}
    }

    #[test]
    fn test_stops_after_stability_rounds() {
        // Grows for 4 rounds, then flat.
        let mut feed = ScriptedFeed::new(vec![10, 20, 30, 40]);
        let report = load(&mut feed, "div.feed", "div[data-review-id]", &LoadOptions::default()).unwrap();

        assert_eq!(report.attempts_used, 7);
        assert_eq!(report.entries_rendered, 40);
        assert_eq!(report.stop_reason, StopReason::Stable);
    }

    #[test]
    fn test_attempt_cap() {
        let mut feed = ScriptedFeed::new((1..=100).collect());
        let options = LoadOptions { max_attempts: 5, ..LoadOptions::default() };
        let report = load(&mut feed, "div.feed", "div[data-review-id]", &options).unwrap();

        assert_eq!(report.attempts_used, 5);
        assert_eq!(report.entries_rendered, 5);
        assert_eq!(report.stop_reason, StopReason::AttemptCap);
    }

    #[test]
    fn test_empty_feed_is_stable() {
        let mut feed = ScriptedFeed::new(vec![0]);
        let report = load(&mut feed, "div.feed", "div[data-review-id]", &LoadOptions::default()).unwrap();

        assert_eq!(report.attempts_used, 3);
        assert_eq!(report.entries_rendered, 0);
        assert_eq!(report.stop_reason, StopReason::Stable);
    }

    #[test]
    fn test_failed_count_is_a_flat_round() {
        // Rounds 2 and 3 cannot count; the feed then keeps growing.
        let mut feed = ScriptedFeed::new(vec![10, 20, 30, 40, 50, 60]);
        feed.failing_counts = vec![2, 3];
        let report = load(&mut feed, "div.feed", "div[data-review-id]", &LoadOptions::default()).unwrap();

        assert_eq!(report.attempts_used, 9);
        assert_eq!(report.entries_rendered, 60);
        assert_eq!(report.stop_reason, StopReason::Stable);
    }

    #[test]
    fn test_missing_container_is_fatal() {
        let mut feed = ScriptedFeed::new(vec![5]);
        feed.has_container = false;
        let err = load(&mut feed, "div.feed", "div[data-review-id]", &LoadOptions::default()).unwrap_err();

        assert!(matches!(err, Error::ContainerNotFound(_)));
        assert_eq!(feed.scrolls, 0);
    }
}
