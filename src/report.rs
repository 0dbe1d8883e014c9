//! Report sinks for timing records.
//!
//! A [`Report`] receives one [`Timing`] per successful invocation. The default sink,
//! [`Stdout`], prints the record as a single line.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

#[cfg(feature = "tracing")]
use tracing::info;

use crate::timing::Timing;

/// Destination for timing records.
///
/// Implemented for the built-in sinks, for closures wrapped with [`from_fn`], and for `&S` and
/// `Arc<S>` of any sink, so one sink can be shared between several timers:
///
/// ```
/// use std::sync::Arc;
/// use gatherx::{named, Recorder, Timer};
///
/// let recorder = Arc::new(Recorder::new());
/// let parse = Timer::with_sink(Arc::clone(&recorder));
/// let render = Timer::with_sink(&*recorder);
///
/// parse.measure(named("parse", |s: &str| s.len()), ("42",));
/// render.time("render", || ());
///
/// assert_eq!(recorder.len(), 2);
/// ```
pub trait Report: Send + Sync {
    fn report(&self, timing: &Timing);
}

/// Prints each record as one line on standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdout;

impl Report for Stdout {
    fn report(&self, timing: &Timing) {
        println!("{}", timing);
    }
}

/// Emits each record as an `INFO` event with structured `name` and `elapsed_ms` fields.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Tracing;

#[cfg(feature = "tracing")]
impl Report for Tracing {
    fn report(&self, timing: &Timing) {
        info!(
            name = %timing.name(),
            elapsed_ms = timing.elapsed().as_secs_f64() * 1000.0,
            "{}",
            timing
        );
    }
}

/// Keeps every record in memory.
///
/// Useful for aggregating timings across many invocations, and for asserting on them in tests.
#[derive(Debug, Default)]
pub struct Recorder {
    timings: Mutex<Vec<Timing>>,
}

impl Recorder {
    /// Usable in a `static`, so a `#[timed(sink = ...)]` function can report into it.
    pub const fn new() -> Self {
        Self {
            timings: parking_lot::const_mutex(Vec::new()),
        }
    }

    /// Snapshot of the records collected so far, in report order.
    pub fn timings(&self) -> Vec<Timing> {
        self.timings.lock().clone()
    }

    /// Drain the collected records.
    pub fn take(&self) -> Vec<Timing> {
        std::mem::take(&mut *self.timings.lock())
    }

    pub fn len(&self) -> usize {
        self.timings.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.lock().is_empty()
    }

    /// Sum of all recorded durations.
    pub fn total(&self) -> Duration {
        self.timings.lock().iter().map(Timing::elapsed).sum()
    }
}

impl Report for Recorder {
    fn report(&self, timing: &Timing) {
        self.timings.lock().push(timing.clone());
    }
}

impl<S: Report + ?Sized> Report for &S {
    fn report(&self, timing: &Timing) {
        (**self).report(timing)
    }
}

impl<S: Report + ?Sized> Report for Arc<S> {
    fn report(&self, timing: &Timing) {
        (**self).report(timing)
    }
}

/// Sink that calls a closure with every record. Created by [`from_fn`].
#[derive(Clone)]
pub struct FnSink<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnSink<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSink").finish_non_exhaustive()
    }
}

impl<F> Report for FnSink<F>
where
    F: Fn(&Timing) + Send + Sync,
{
    fn report(&self, timing: &Timing) {
        (self.f)(timing)
    }
}

/// Turn a closure into a sink.
///
/// ```
/// use gatherx::{named, report, Timer, Timing};
///
/// let timer = Timer::with_sink(report::from_fn(|t: &Timing| eprintln!("[timing] {t}")));
/// let sum = timer.measure(named("sum", |a: u32, b: u32| a + b), (1, 2));
/// assert_eq!(sum, 3);
/// ```
pub fn from_fn<F>(f: F) -> FnSink<F>
where
    F: Fn(&Timing) + Send + Sync,
{
    FnSink { f }
}
