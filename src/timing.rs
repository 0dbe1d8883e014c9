//! Elapsed-time measurement around units of work.
//!
//! [`measure`] is the one-call form: it invokes a [`Work`], reports how long it took to
//! standard output, and hands back whatever the work returned. [`Timer`] is the configurable
//! form, reporting to any [`Report`] sink.
//!
//! Timing is observation only: work that fails (an `Err` from [`try_measure`], or a panic)
//! produces no report, and the failure reaches the caller unchanged.

use std::borrow::Cow;
use std::future::IntoFuture;
use std::time::{Duration, Instant};

use crate::report::{Report, Stdout};
use crate::work::Work;

/// Elapsed time of one completed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timing {
    name: Cow<'static, str>,
    elapsed: Duration,
}

impl Timing {
    pub fn new(name: impl Into<Cow<'static, str>>, elapsed: Duration) -> Self {
        Self {
            name: name.into(),
            elapsed,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time in fractional seconds.
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

impl std::fmt::Display for Timing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "function {} took {:.3}s to execute",
            self.name,
            self.seconds()
        )
    }
}

/// Monotonic start point for a measurement.
///
/// Backed by [`Instant`], so wall-clock adjustments never skew the result.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Close the measurement under `name`.
    pub fn stop(self, name: impl Into<Cow<'static, str>>) -> Timing {
        Timing::new(name, self.elapsed())
    }
}

/// Times units of work and reports each completed invocation to a sink.
///
/// # Examples
///
/// ```
/// use gatherx::{named, Recorder, Timer};
///
/// let timer = Timer::with_sink(Recorder::new());
///
/// let greeting = timer.measure(named("greet", |who: &str| format!("hello {who}")), ("world",));
/// assert_eq!(greeting, "hello world");
///
/// let timings = timer.sink().timings();
/// assert_eq!(timings.len(), 1);
/// assert_eq!(timings[0].name(), "greet");
/// ```
///
/// Fallible work is only reported when it succeeds:
///
/// ```
/// use gatherx::{named, Recorder, Timer};
///
/// let timer = Timer::with_sink(Recorder::new());
/// let parse = named("parse", |s: &str| s.parse::<i32>());
///
/// assert!(timer.try_measure(parse.clone(), ("nope",)).is_err());
/// assert_eq!(timer.try_measure(parse, ("42",)), Ok(42));
/// assert_eq!(timer.sink().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Timer<S = Stdout> {
    sink: S,
}

impl Timer<Stdout> {
    /// Timer reporting to standard output.
    pub const fn new() -> Self {
        Self { sink: Stdout }
    }
}

impl<S> Timer<S> {
    pub const fn with_sink(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: Report> Timer<S> {
    /// Invoke `work` with `args`, report the elapsed time, and return the work's output.
    ///
    /// Pass `&mut work` to keep using the same unit of work afterwards.
    pub fn measure<Args, W>(&self, mut work: W, args: Args) -> W::Output
    where
        W: Work<Args>,
    {
        let watch = Stopwatch::start();
        let output = work.invoke(args);
        self.sink.report(&watch.stop(work.name().to_owned()));
        output
    }

    /// Like [`Timer::measure`] for fallible work: an `Err` is returned as-is and not reported.
    pub fn try_measure<Args, W, T, E>(&self, mut work: W, args: Args) -> Result<T, E>
    where
        W: Work<Args, Output = Result<T, E>>,
    {
        let watch = Stopwatch::start();
        let value = work.invoke(args)?;
        self.sink.report(&watch.stop(work.name().to_owned()));
        Ok(value)
    }

    /// Time a closure under `name`.
    pub fn time<T>(&self, name: impl Into<Cow<'static, str>>, f: impl FnOnce() -> T) -> T {
        let watch = Stopwatch::start();
        let output = f();
        self.sink.report(&watch.stop(name));
        output
    }

    pub fn try_time<T, E>(
        &self,
        name: impl Into<Cow<'static, str>>,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        let watch = Stopwatch::start();
        let value = f()?;
        self.sink.report(&watch.stop(name));
        Ok(value)
    }

    /// Time a future from first poll to completion.
    pub async fn measure_async<F>(&self, name: impl Into<Cow<'static, str>>, work: F) -> F::Output
    where
        F: IntoFuture,
    {
        let name = name.into();
        let watch = Stopwatch::start();
        let output = work.await;
        self.sink.report(&watch.stop(name));
        output
    }

    pub async fn try_measure_async<F, T, E>(
        &self,
        name: impl Into<Cow<'static, str>>,
        work: F,
    ) -> Result<T, E>
    where
        F: IntoFuture<Output = Result<T, E>>,
    {
        let name = name.into();
        let watch = Stopwatch::start();
        let value = work.await?;
        self.sink.report(&watch.stop(name));
        Ok(value)
    }
}

/// Invoke `work`, print `function <name> took <secs>s to execute`, and return its output.
///
/// ```
/// use gatherx::{measure, named};
///
/// let doubled = measure(named("double", |x: u32| x * 2), (21,));
/// assert_eq!(doubled, 42);
/// ```
pub fn measure<Args, W>(work: W, args: Args) -> W::Output
where
    W: Work<Args>,
{
    Timer::new().measure(work, args)
}

/// Invoke fallible `work`; print the timing line only when it returns `Ok`.
pub fn try_measure<Args, W, T, E>(work: W, args: Args) -> Result<T, E>
where
    W: Work<Args, Output = Result<T, E>>,
{
    Timer::new().try_measure(work, args)
}

/// Support items for code generated by `#[timed]`. Not public API.
#[doc(hidden)]
pub mod __private {
    use std::future::Future;

    /// Pins down the output type of an `async` block so `?` inside it resolves.
    #[inline(always)]
    pub fn expect_output<T, F>(future: F) -> F
    where
        F: Future<Output = T>,
    {
        future
    }

    /// Runs a synchronous body as an `FnOnce`, so it may hand out borrows of its captures.
    #[inline(always)]
    pub fn call_once<T>(body: impl FnOnce() -> T) -> T {
        body()
    }
}
