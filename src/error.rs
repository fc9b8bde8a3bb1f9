//! Error types for review-harvest.
//!
//! Only document-level failures abort a harvest. Everything that goes wrong
//! inside a single entry is reported through the diagnostic sink instead and
//! never reaches the caller as an `Err`.

use std::time::Duration;

/// Error type for harvest operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The scrollable listing container never appeared.
    #[error("Listing scroll container not found: {0}")]
    ContainerNotFound(String),

    /// A readiness wait ran out of time.
    #[error("Timed out after {waited:?} waiting for `{selector}`")]
    Timeout {
        /// CSS selector that was awaited.
        selector: String,
        /// How long the wait lasted.
        waited: Duration,
    },

    /// Navigating to the listing URL failed.
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// The browser session reported an error.
    #[error("Browser error: {0}")]
    Browser(String),

    /// A document operation (lookup, click, read) failed.
    #[error("Document operation failed: {0}")]
    Document(String),

    /// The rating label carried no usable 1-5 digit.
    #[error("Rating label is unparseable: {0:?}")]
    RatingUnparseable(String),

    /// An image could not be downloaded or stored.
    #[error("Image fetch failed for {url}: {reason}")]
    ImageFetch {
        /// Source URL of the image.
        url: String,
        /// Underlying failure.
        reason: String,
    },

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Writing the CSV export failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Whether this error aborts the whole harvest.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ContainerNotFound(_)
                | Self::Timeout { .. }
                | Self::Navigation(_)
                | Self::Browser(_)
        )
    }
}

/// Result type alias for harvest operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(Error::ContainerNotFound("div.m6QErb".into()).is_fatal());
        assert!(Error::Timeout {
            selector: ".DU9Pgb".into(),
            waited: Duration::from_secs(15),
        }
        .is_fatal());
        assert!(!Error::RatingUnparseable("No stars".into()).is_fatal());
        assert!(!Error::Document("click failed".into()).is_fatal());
    }

    #[test]
    fn test_timeout_message_names_selector() {
        let err = Error::Timeout {
            selector: ".DU9Pgb".into(),
            waited: Duration::from_secs(15),
        };
        assert!(err.to_string().contains(".DU9Pgb"));
    }
}
