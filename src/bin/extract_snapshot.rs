//! Reads a rendered listing page from stdin and prints its records as JSON.
//! Never fetches images.

use std::io::{self, Read};

use review_harvest::diagnostics::NullSink;
use review_harvest::fields::HttpImageFetcher;
use review_harvest::{harvest_snapshot, Options, Record};
use serde::Serialize;

#[derive(Serialize)]
struct Output {
    listing: Option<String>,
    entries_collected: usize,
    records: Vec<Record>,
    error: Option<String>,
}

fn main() {
    let mut html = String::new();
    if io::stdin().read_to_string(&mut html).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }

    let options = Options {
        url: std::env::args().nth(1),
        download_images: false,
        ..Options::default()
    };

    let result = HttpImageFetcher::new("images")
        .and_then(|images| harvest_snapshot(&html, &options, &mut NullSink, &images));

    let output = match result {
        Ok(h) => Output {
            listing: h.listing.map(|l| l.name),
            entries_collected: h.entries_collected,
            records: h.records,
            error: None,
        },
        Err(e) => Output {
            listing: None,
            entries_collected: 0,
            records: Vec::new(),
            error: Some(e.to_string()),
        },
    };

    println!("{}", serde_json::to_string(&output).unwrap_or_default());
}
