//! End-to-end harvests over a scripted listing that renders entries in
//! batches as it is scrolled and reveals full text when "More" is clicked.

use std::collections::HashSet;
use std::time::Duration;

use chrono::NaiveDate;
use review_harvest::diagnostics::{DiagnosticEvent, MemorySink};
use review_harvest::document::{ElementRef, RenderableDocument, SnapshotDocument};
use review_harvest::fields::ImageFetcher;
use review_harvest::loader::{load, StopReason};
use review_harvest::{harvest, Error, LoadOptions, Options, Result, Strategy};

struct FakeReview {
    id: String,
    rating: u8,
    text: String,
    truncated: bool,
}

/// Listing feed that grows by `batch` entries per scroll.
struct ScriptedListing {
    reviews: Vec<FakeReview>,
    batch: usize,
    rendered: usize,
    expanded: HashSet<usize>,
    scrolls: usize,
    pauses: Vec<Duration>,
    navigated: Option<String>,
    /// Repeat the first entry at the end of the feed.
    repeat_first: bool,
}

impl ScriptedListing {
    fn new(count: usize, batch: usize) -> Self {
        let reviews = (0..count)
            .map(|i| FakeReview {
                id: format!("Ch{i:04}"),
                rating: u8::try_from(i % 5 + 1).unwrap(),
                text: format!("Review number {i} praises the espresso and the staff."),
                truncated: i % 3 == 0,
            })
            .collect();
        Self {
            reviews,
            batch,
            rendered: batch.min(count),
            expanded: HashSet::new(),
            scrolls: 0,
            pauses: Vec::new(),
            navigated: None,
            repeat_first: false,
        }
    }

    fn entry_html(&self, i: usize) -> String {
        let review = &self.reviews[i];
        let body = if review.truncated && !self.expanded.contains(&i) {
            let cut: String = review.text.chars().take(14).collect();
            format!(r#"<span class="wiI7pd">{cut}…</span><button class="w8nwRe">More</button>"#)
        } else {
            format!(r#"<span class="wiI7pd">{}</span>"#, review.text)
        };
        format!(
            r#"<div class="jftiEf" data-review-id="{id}">
                <div class="d4r55">Guest {i}</div>
                <span class="kvMYJc" aria-label="{rating} stars"></span>
                <span class="rsqaWe">{weeks} weeks ago</span>
                {body}
            </div>"#,
            id = review.id,
            rating = review.rating,
            weeks = i + 1,
        )
    }

    /// Entry indexes in document order, including the repeat.
    fn order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.rendered).collect();
        if self.repeat_first && self.rendered > 0 {
            order.push(0);
        }
        order
    }

    fn render(&self) -> String {
        let entries: String = self.order().into_iter().map(|i| self.entry_html(i)).collect();
        format!(
            r#"<html><body><h1 class="DU9Pgb">Blue Door Cafe</h1>
            <div class="m6QErb DxyBCb">{entries}</div></body></html>"#
        )
    }

    fn snapshot(&self) -> SnapshotDocument {
        SnapshotDocument::new(self.render())
    }

    /// Entry indexes that currently show a "More" control, in document order.
    fn truncated_rendered(&self) -> Vec<usize> {
        self.order()
            .into_iter()
            .filter(|i| self.reviews[*i].truncated && !self.expanded.contains(i))
            .collect()
    }
}

impl RenderableDocument for ScriptedListing {
    fn navigate_to(&mut self, url: &str) -> Result<()> {
        self.navigated = Some(url.to_string());
        Ok(())
    }

    fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<ElementRef> {
        self.snapshot().wait_for_selector(selector, timeout)
    }

    fn find_all(&mut self, selector: &str) -> Result<Vec<ElementRef>> {
        self.snapshot().find_all(selector)
    }

    fn scroll_to_end(&mut self, _container: &ElementRef) -> Result<()> {
        self.scrolls += 1;
        self.rendered = (self.rendered + self.batch).min(self.reviews.len());
        Ok(())
    }

    fn click(&mut self, element: &ElementRef) -> Result<()> {
        let target = self
            .truncated_rendered()
            .get(element.index)
            .copied()
            .ok_or_else(|| Error::Document(format!("{element} is gone")))?;
        self.expanded.insert(target);
        Ok(())
    }

    fn text(&mut self, element: &ElementRef) -> Result<String> {
        self.snapshot().text(element)
    }

    fn attribute(&mut self, element: &ElementRef, name: &str) -> Result<Option<String>> {
        self.snapshot().attribute(element, name)
    }

    fn page_source(&mut self) -> Result<String> {
        Ok(self.render())
    }

    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}

/// Counts requests; stores nothing.
struct CountingFetcher(std::cell::Cell<usize>);

impl ImageFetcher for CountingFetcher {
    fn fetch(&self, _url: &str, _file_name: &str) -> Result<()> {
        self.0.set(self.0.get() + 1);
        Ok(())
    }
}

fn options() -> Options {
    Options {
        url: Some("https://www.google.com/maps/place/Blue+Door+Cafe/@51.5,-0.1,17z".to_string()),
        reference_date: NaiveDate::from_ymd_opt(2024, 6, 30),
        ..Options::default()
    }
}

#[test]
fn test_loads_until_stable_and_harvests_everything() {
    let mut listing = ScriptedListing::new(25, 10);
    let fetcher = CountingFetcher(std::cell::Cell::new(0));
    let mut sink = MemorySink::new();

    let harvest = harvest(&mut listing, &options(), &mut sink, &fetcher).unwrap();

    // 10 -> 20 -> 25, then three flat rounds.
    assert_eq!(harvest.attempts_used, 5);
    assert_eq!(harvest.entries_collected, 25);
    assert_eq!(harvest.records.len(), 25);
    assert_eq!(harvest.listing.as_ref().map(|l| l.name.as_str()), Some("Blue Door Cafe"));
    assert_eq!(
        listing.navigated.as_deref(),
        Some("https://www.google.com/maps/place/Blue+Door+Cafe/@51.5,-0.1,17z")
    );
    assert_eq!(fetcher.0.get(), 0);

    let uids: Vec<&str> = harvest.records.iter().map(|r| r.uid.as_str()).collect();
    assert_eq!(uids.first(), Some(&"R001"));
    assert_eq!(uids.last(), Some(&"R025"));
}

#[test]
fn test_truncated_text_is_expanded_before_extraction() {
    let mut listing = ScriptedListing::new(6, 10);
    let harvest = harvest(&mut listing, &options(), &mut MemorySink::new(), &CountingFetcher(Default::default())).unwrap();

    for (i, record) in harvest.records.iter().enumerate() {
        assert_eq!(
            record.review_text,
            format!("Review number {i} praises the espresso and the staff.")
        );
        assert_eq!(record.text_strategy, Strategy::Primary);
        assert!(!record.review_text.ends_with('…'));
    }
    // Entries 0 and 3 were truncated; one settle pause per click.
    assert_eq!(listing.expanded, HashSet::from([0, 3]));
    let click_pauses = listing
        .pauses
        .iter()
        .filter(|d| **d == Duration::from_millis(100))
        .count();
    assert_eq!(click_pauses, 2);
}

#[test]
fn test_duplicate_entries_keep_first_seen() {
    let mut listing = ScriptedListing::new(4, 10);
    listing.repeat_first = true;
    let mut sink = MemorySink::new();

    let harvest = harvest(&mut listing, &options(), &mut sink, &CountingFetcher(Default::default())).unwrap();

    let ids: Vec<&str> = harvest.records.iter().map(|r| r.entry_id.as_str()).collect();
    assert_eq!(ids, vec!["Ch0000", "Ch0001", "Ch0002", "Ch0003"]);
    assert!(sink
        .for_entry("Ch0000")
        .any(|e| *e == DiagnosticEvent::DuplicateEntry));
}

#[test]
fn test_fields_use_fixed_reference_date() {
    let mut listing = ScriptedListing::new(2, 10);
    let harvest = harvest(&mut listing, &options(), &mut MemorySink::new(), &CountingFetcher(Default::default())).unwrap();

    let first = &harvest.records[0];
    assert_eq!(first.reviewer, "Guest 0");
    assert_eq!(first.rating_value, 1);
    assert_eq!(first.date_raw, "1 weeks ago");
    assert_eq!(first.date_parsed, NaiveDate::from_ymd_opt(2024, 6, 23));
    assert!(first.date_parse_success);
    assert_eq!(harvest.records[1].rating_value, 2);
}

#[test]
fn test_attempt_cap_returns_partial_harvest() {
    let mut listing = ScriptedListing::new(100, 10);
    let opts = Options {
        load: LoadOptions {
            max_attempts: 2,
            ..LoadOptions::default()
        },
        ..options()
    };

    let harvest = harvest(&mut listing, &opts, &mut MemorySink::new(), &CountingFetcher(Default::default())).unwrap();

    assert_eq!(harvest.attempts_used, 2);
    assert_eq!(harvest.records.len(), 30);
}

#[test]
fn test_loader_report_on_scripted_feed() {
    let mut listing = ScriptedListing::new(35, 10);
    let report = load(
        &mut listing,
        "div.m6QErb.DxyBCb",
        "div[data-review-id]",
        &LoadOptions::default(),
    )
    .unwrap();

    assert_eq!(report.stop_reason, StopReason::Stable);
    assert_eq!(report.entries_rendered, 35);
    // 20, 30, 35, then three flat rounds.
    assert_eq!(report.attempts_used, 6);
    assert_eq!(listing.scrolls, 6);
    assert_eq!(listing.pauses.len(), 6);
}
