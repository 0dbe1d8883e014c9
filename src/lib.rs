//! Timing Wrappers and Order-Preserving Fan-Out
//!
//! Two small, independent utilities:
//!
//! - **Timing wrapper**: run a unit of work, measure its elapsed time on the monotonic clock,
//!   and report `function <name> took <secs>s to execute`. Available as a function
//!   ([`measure`]), a configurable [`Timer`], and a `#[timed]` attribute.
//! - **Fan-out runner**: run many independent operations concurrently and get their results
//!   back in input order, with per-item failure isolation. See [`FanOut`].
//!
//! # Features
//!
//! - **Return values forwarded**: timing is observation only; whatever the work returns is
//!   handed back unchanged.
//! - **Fail fast timing**: work that returns `Err` or panics is not reported.
//! - **Positional results**: `results[i]` always belongs to `items[i]`, whatever order the
//!   items finished in.
//! - **Tagged failures**: one item failing, panicking, or being dropped by the spawner yields
//!   an [`ItemError`] in that slot only. The batch always returns one outcome per item.
//! - **Runtime-agnostic**: async dispatch goes through a spawner you supply (Tokio, smol,
//!   async-std, `futures-executor`, ...). Blocking dispatch can use plain scoped threads.
//!
//! # Quick Start
//!
//! ## Timing
//!
//! ```
//! use gatherx::{measure, named};
//!
//! fn weather_in_city(city: &str, weather: &str) -> String {
//!     format!("weather today in {city} is {weather}")
//! }
//!
//! // Prints: function weather_in_city took 0.000s to execute
//! let line = measure(named("weather_in_city", weather_in_city), ("San Francisco", "Windy"));
//! assert_eq!(line, "weather today in San Francisco is Windy");
//! ```
//!
//! The attribute form times every call of a function:
//!
//! ```
//! use gatherx::timed;
//!
//! #[timed]
//! fn checksum(data: &[u8]) -> u32 {
//!     data.iter().map(|&b| b as u32).sum()
//! }
//!
//! assert_eq!(checksum(b"abc"), 294); // Prints: function checksum took 0.000s to execute
//! ```
//!
//! ## Fan-out
//!
//! ```no_run
//! use std::time::Duration;
//! use gatherx::FanOut;
//!
//! # async {
//! let urls = ["https://a.test", "https://b.test"];
//!
//! let results = FanOut::named("status")
//!     .run_blocking(
//!         urls,
//!         |url| {
//!             // any blocking call, e.g. an HTTP request
//!             std::thread::sleep(Duration::from_millis(if url.contains('a') { 200 } else { 10 }));
//!             Ok::<_, std::io::Error>(url.len())
//!         },
//!         |job| tokio::task::spawn_blocking(job),
//!     )
//!     .await;
//!
//! // b finished first, but results follow the input order
//! assert_eq!(results.len(), 2);
//! # };
//! ```
//!
//! # Error Handling
//!
//! Each fan-out slot is an [`Outcome<R, E>`] (an alias for `Result<R, ItemError<E>>`):
//!
//! - [`ItemError::Failed`]: the operation returned `Err(e)`; `e` is kept as-is
//! - [`ItemError::Panicked`]: the operation panicked; the panic message is kept
//! - [`ItemError::Abandoned`]: the spawner dropped the unit without running it
//!
//! There is no timeout or cancellation. An operation that never returns stalls the batch.
//!
//! # Optional Tracing Support
//!
//! Enable the `tracing` feature for structured log events, and for the
//! [`Tracing`](report::Tracing) report sink:
//!
//! ```toml
//! [dependencies]
//! gatherx = { version = "0.1", features = ["tracing"] }
//! tracing-subscriber = "0.3"
//! ```
//!
//! ## Log Levels
//!
//! - **INFO**: fan-out start/completion with item and failure counts
//! - **DEBUG**: per-item dispatch
//! - **TRACE**: per-item completion
//! - **WARN**: an item returned an error
//! - **ERROR**: an item panicked or was abandoned
//!
//! When the feature is disabled (the default) the logging code is compiled out entirely.
//!
//! # HTTP
//!
//! The `http` feature implements [`Fetch`] for `reqwest::blocking::Client`, for use with
//! [`fetch_all`] and [`fetch_all_offloaded`].

extern crate self as gatherx;

// Module declarations
mod error;
pub mod fanout;
mod fetch;
pub mod report;
pub mod timing;
mod work;

// Public re-exports
pub use error::{ItemError, Outcome};
pub use fanout::{run_all, BlockingJob, FanOut, Slot};
#[cfg(feature = "http")]
pub use fetch::FetchError;
pub use fetch::{fetch_all, fetch_all_offloaded, Fetch, StatusReport};
pub use report::{Recorder, Report, Stdout};
pub use timing::{measure, try_measure, Stopwatch, Timer, Timing};
pub use work::{named, Named, Work};

// Re-export the procedural macro
pub use gatherx_macros::timed;
