//! # Fetch Status Example
//!
//! Fetches a handful of URLs concurrently with a shared blocking `reqwest` client, prints one
//! status line per URL in request order, and times the whole batch.
//!
//! ## Running This Example
//!
//! ```bash
//! cargo run --example fetch_status --features http,tracing
//!
//! # Your own URLs
//! cargo run --example fetch_status --features http,tracing -- https://www.rust-lang.org/
//!
//! # With per-item dispatch and completion events
//! RUST_LOG=gatherx=trace cargo run --example fetch_status --features http,tracing
//! ```

use std::sync::Arc;

use gatherx::{fetch_all_offloaded, FanOut, Timer};

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_URLS: [&str; 4] = [
    "https://www.wyze.com/",
    "https://www.apple.com/",
    "https://phptravels.com/",
    "https://www.amazon.com/",
];

fn main() {
    // Use RUST_LOG environment variable to control log level
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gatherx=info")),
        )
        .init();

    let mut urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        urls = DEFAULT_URLS.iter().map(|url| url.to_string()).collect();
    }

    // The blocking client owns an internal runtime, so it is built and finally dropped
    // outside of Tokio
    let client = Arc::new(reqwest::blocking::Client::new());

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    let reports = rt.block_on(async {
        Timer::new()
            .measure_async(
                "fetch_status",
                fetch_all_offloaded(
                    &FanOut::named("fetch"),
                    Arc::clone(&client),
                    urls,
                    |job| tokio::task::spawn_blocking(job),
                ),
            )
            .await
    });
    drop(rt);

    for report in reports {
        match report {
            Ok(report) => println!("{report}"),
            Err(err) => println!("{err}"),
        }
    }
}
