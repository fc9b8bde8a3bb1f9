//! Review photos.
//!
//! Photos render as buttons whose inline style carries a `background-image`.
//! Only URLs on the accepted host are kept, and only the first of those per
//! entry is fetched.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::dom;
use crate::error::Result;
use crate::extractor::EntryView;
use crate::patterns::BACKGROUND_URL;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("review-harvest/", env!("CARGO_PKG_VERSION"));

/// Stores an image under a given file name.
pub trait ImageFetcher {
    fn fetch(&self, url: &str, file_name: &str) -> Result<()>;
}

/// Downloads images over HTTP into a directory.
pub struct HttpImageFetcher {
    client: reqwest::blocking::Client,
    dir: PathBuf,
}

impl HttpImageFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            dir: dir.into(),
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str, file_name: &str) -> Result<()> {
        let response = self.client.get(url).send()?.error_for_status()?;
        let bytes = response.bytes()?;
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(file_name), &bytes)?;
        tracing::debug!(url, file_name, bytes = bytes.len(), "image stored");
        Ok(())
    }
}

/// `img_{entry:03}_{image}.jpg`, both positions 1-based.
#[must_use]
pub fn image_file_name(entry_position: usize, image_position: usize) -> String {
    format!("img_{entry_position:03}_{image_position}.jpg")
}

/// URL inside a `background-image: url(...)` declaration.
#[must_use]
pub fn background_url(style: &str) -> Option<&str> {
    BACKGROUND_URL
        .captures(style)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Fetch the entry's first accepted photo. Returns the stored file names.
pub fn extract_images(
    entry: &EntryView,
    accepted_host: &str,
    fetcher: &dyn ImageFetcher,
    sink: &mut dyn DiagnosticSink,
) -> Vec<String> {
    let selectors = entry.selectors();
    let styled = entry
        .find_each(&selectors.media_button)
        .into_iter()
        .filter_map(|button| dom::get_attribute(&button, "style"))
        .filter(|style| style.contains("background-image"));

    for (position, style) in styled.enumerate() {
        sink.on_diagnostic(entry.id, &DiagnosticEvent::ImageStyle { style: style.clone() });

        let Some(url) = background_url(&style) else {
            sink.on_diagnostic(
                entry.id,
                &DiagnosticEvent::ImageRejected {
                    url: String::new(),
                    reason: "no https url in style".to_string(),
                },
            );
            continue;
        };
        if !url.contains(accepted_host) {
            sink.on_diagnostic(
                entry.id,
                &DiagnosticEvent::ImageRejected {
                    url: url.to_string(),
                    reason: format!("host is not {accepted_host}"),
                },
            );
            continue;
        }

        let file = image_file_name(entry.index + 1, position + 1);
        return match fetcher.fetch(url, &file) {
            Ok(()) => {
                sink.on_diagnostic(
                    entry.id,
                    &DiagnosticEvent::ImageCaptured {
                        url: url.to_string(),
                        file: file.clone(),
                    },
                );
                vec![file]
            }
            Err(e) => {
                sink.on_diagnostic(
                    entry.id,
                    &DiagnosticEvent::ImageFetchFailed {
                        url: url.to_string(),
                        reason: e.to_string(),
                    },
                );
                Vec::new()
            }
        };
    }
    Vec::new()
}
