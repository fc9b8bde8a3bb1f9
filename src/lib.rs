//! # review-harvest
//!
//! Review extraction for lazily rendered business-listing pages.
//!
//! The listing's review feed only renders entries as it is scrolled, truncates
//! long reviews behind a "More" control, and renders review text in several
//! markup variants. This crate drives a [`document::RenderableDocument`]
//! through loading, collection and expansion, then extracts one structured
//! [`Record`] per unique entry from a single rendered snapshot.
//!
//! ## Quick Start
//!
//! ```rust
//! use review_harvest::diagnostics::NullSink;
//! use review_harvest::fields::HttpImageFetcher;
//! use review_harvest::{harvest_snapshot, Options};
//!
//! let html = r#"
//!     <h1 class="DU9Pgb">Blue Door Cafe</h1>
//!     <div class="m6QErb DxyBCb">
//!         <div data-review-id="abc">
//!             <div class="d4r55">Ann</div>
//!             <span class="kvMYJc" aria-label="5 stars"></span>
//!             <span class="rsqaWe">2 weeks ago</span>
//!             <span class="wiI7pd">Best flat white in the city.</span>
//!         </div>
//!     </div>"#;
//!
//! let options = Options { download_images: false, ..Options::default() };
//! let images = HttpImageFetcher::new("images")?;
//! let harvest = harvest_snapshot(html, &options, &mut NullSink, &images)?;
//!
//! assert_eq!(harvest.records[0].uid, "R001");
//! assert_eq!(harvest.records[0].review_text, "Best flat white in the city.");
//! # Ok::<(), review_harvest::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! - **Loader**: scrolls the feed until the entry count is stable
//! - **Collector**: de-duplicates entries by their page-assigned identifier
//! - **Expander**: reveals truncated text
//! - **Extractor**: ordered text strategies with a shared validity predicate
//! - **Fields**: reviewer, rating, date, likes, tags, owner reply, photos
//! - **Assembler**: numbers records in first-seen order

mod error;
mod options;
mod patterns;
mod result;

/// DOM helpers over `dom_query`.
pub mod dom;

/// The rendered page: live browser tab or static snapshot.
pub mod document;

/// Incremental loading of the review feed.
pub mod loader;

/// Entry collection and de-duplication.
pub mod collector;

/// Expansion of truncated review text.
pub mod expander;

/// Review text strategies.
pub mod extractor;

/// Structured field extraction.
pub mod fields;

/// Record assembly.
pub mod assembler;

/// Diagnostic observer hook and stock sinks.
pub mod diagnostics;

/// Listing name and export file naming.
pub mod listing;

/// CSV export.
pub mod export;

/// The end-to-end harvest.
pub mod pipeline;

// Public API - re-exports
pub use error::{Error, Result};
pub use options::{LoadOptions, Options, Selectors};
pub use pipeline::{harvest, harvest_snapshot};
pub use result::{ExtractionResult, Harvest, Record, Strategy, TagBuckets};
