//! Order-preserving concurrent fan-out.
//!
//! Provides [`FanOut`] for running many independent operations at once and collecting their
//! results in submission order.
//!
//! Every dispatched unit carries its index. Units report back as `(index, outcome)` pairs in
//! whatever order they finish, and the runner writes each pair into its slot once the whole
//! batch has passed the completion barrier. A slot that never receives a pair (the spawner
//! dropped the unit) is filled with [`ItemError::Abandoned`].

use std::borrow::Cow;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use futures::channel::mpsc;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};

#[cfg(feature = "tracing")]
use tracing::{debug, error, info, trace, warn};

use crate::error::{panic_message, ItemError, Outcome};

/// Index-tagged outcome of one dispatched unit.
pub type Slot<R, E> = (usize, Outcome<R, E>);

/// A blocking unit of work handed to an offloader by [`FanOut::run_blocking`].
pub type BlockingJob = Box<dyn FnOnce() + Send + 'static>;

/// Runs independent operations concurrently and returns their results in input order.
///
/// Three dispatch strategies share the same guarantees:
///
/// - [`FanOut::run_scoped`]: blocking operations, one scoped OS thread per item. Synchronous.
/// - [`FanOut::run`]: async operations, each spawned through a caller-supplied spawner.
/// - [`FanOut::run_blocking`]: blocking operations, each handed to a caller-supplied
///   offloader (such as `tokio::task::spawn_blocking`), awaited without blocking the caller.
///
/// In all three:
/// - `results.len() == items.len()`, and `results[i]` belongs to `items[i]`
/// - an empty input returns immediately without dispatching anything
/// - a failing or panicking item yields an [`ItemError`] in its own slot only
/// - there is no timeout or cancellation: a hanging operation stalls the batch
///
/// # Examples
///
/// ```
/// use gatherx::FanOut;
///
/// let lengths = FanOut::named("lengths").run_scoped(["a", "bbb", "cc"], |s| {
///     Ok::<_, std::convert::Infallible>(s.len())
/// });
///
/// let lengths: Vec<_> = lengths.into_iter().map(Result::unwrap).collect();
/// assert_eq!(lengths, [1, 3, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct FanOut {
    name: Cow<'static, str>,
}

impl Default for FanOut {
    fn default() -> Self {
        Self::new()
    }
}

impl FanOut {
    /// Create a runner named `fanout`.
    pub fn new() -> Self {
        Self::named("fanout")
    }

    /// Create a runner whose log events and worker threads carry `name`.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// Name used in log events and as the worker thread prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run a blocking `op` for every item, each on its own scoped thread.
    ///
    /// Returns once every thread has finished. Items and `op` may borrow from the caller.
    pub fn run_scoped<I, R, E, Op>(
        &self,
        items: impl IntoIterator<Item = I>,
        op: Op,
    ) -> Vec<Outcome<R, E>>
    where
        I: Send,
        R: Send,
        E: Send,
        Op: Fn(I) -> Result<R, E> + Sync,
    {
        let items: Vec<I> = items.into_iter().collect();
        if items.is_empty() {
            return Vec::new();
        }
        let len = items.len();

        #[cfg(feature = "tracing")]
        info!(runner = %self.name, items = len, "starting scoped fan-out");

        let op = &op;
        let slots = std::thread::scope(|scope| {
            let handles: Vec<_> = items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    #[cfg(feature = "tracing")]
                    debug!(runner = %self.name, index, "spawning worker thread");

                    std::thread::Builder::new()
                        .name(format!("{}-{}", self.name, index))
                        .spawn_scoped(scope, move || op(item))
                        .ok()
                })
                .collect();

            // Joining every handle is the completion barrier
            handles
                .into_iter()
                .enumerate()
                .map(|(index, handle)| {
                    handle.map(|handle| (index, settle(index, handle.join())))
                })
                .collect::<Vec<_>>()
        });

        self.assemble(len, slots.into_iter().flatten())
    }

    /// Run an async `op` for every item, spawning each future with `spawner`.
    ///
    /// `spawner` receives a `'static` future and returns a future that drives it, so any
    /// runtime works:
    /// - Tokio: `|fut| tokio::spawn(fut)`
    /// - Smol: `|fut| smol::spawn(fut)`
    /// - Async-std: `|fut| async_std::task::spawn(fut)`
    ///
    /// The returned future's output is ignored. Panics inside an operation are caught before
    /// they reach the runtime and become [`ItemError::Panicked`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use gatherx::FanOut;
    ///
    /// # async {
    /// let delays = [200_u64, 10, 50];
    /// let results = FanOut::new()
    ///     .run(
    ///         delays,
    ///         |ms| async move {
    ///             tokio::time::sleep(Duration::from_millis(ms)).await;
    ///             Ok::<_, String>(ms)
    ///         },
    ///         |fut| tokio::spawn(fut),
    ///     )
    ///     .await;
    ///
    /// // Positional, not temporal
    /// assert_eq!(results, vec![Ok(200), Ok(10), Ok(50)]);
    /// # };
    /// ```
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, fields(runner = %self.name))
    )]
    pub async fn run<I, R, E, Op, Fut, S, SFut>(
        &self,
        items: impl IntoIterator<Item = I>,
        op: Op,
        spawner: S,
    ) -> Vec<Outcome<R, E>>
    where
        R: Send + 'static,
        E: Send + 'static,
        Op: Fn(I) -> Fut,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        S: Fn(BoxFuture<'static, ()>) -> SFut,
        SFut: Future,
    {
        let mut items = items.into_iter().peekable();
        if items.peek().is_none() {
            return Vec::new();
        }

        let (tx, rx) = mpsc::unbounded::<Slot<R, E>>();
        let mut len = 0;
        let mut early = Vec::new();
        let handles: FuturesUnordered<SFut> = FuturesUnordered::new();

        for (index, item) in items.enumerate() {
            len += 1;

            // Building the future runs caller code too, so it gets the same panic isolation
            let unit = match catch_unwind(AssertUnwindSafe(|| op(item))) {
                Ok(unit) => unit,
                Err(payload) => {
                    early.push((index, settle(index, Err(payload))));
                    continue;
                }
            };

            #[cfg(feature = "tracing")]
            debug!(index, "spawning unit");

            let out_tx = tx.clone();
            let guarded = async move {
                let result = AssertUnwindSafe(unit).catch_unwind().await;
                // Ignore send errors - receiver may be dropped
                let _ = out_tx.unbounded_send((index, settle(index, result)));
            };
            handles.push(spawner(guarded.boxed()));
        }

        let slots = barrier(tx, rx, handles).await;
        self.assemble(len, early.into_iter().chain(slots))
    }

    /// Run a blocking `op` for every item, handing each call to `offload`.
    ///
    /// `offload` receives a [`BlockingJob`] and returns a future that completes once the job
    /// has run, keeping blocking work off the task that awaits the batch:
    /// - Tokio: `|job| tokio::task::spawn_blocking(job)`
    /// - Smol: `|job| smol::unblock(job)`
    ///
    /// A job that is dropped without running leaves its slot [`ItemError::Abandoned`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, fields(runner = %self.name))
    )]
    pub async fn run_blocking<I, R, E, Op, O, OFut>(
        &self,
        items: impl IntoIterator<Item = I>,
        op: Op,
        offload: O,
    ) -> Vec<Outcome<R, E>>
    where
        I: Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
        Op: Fn(I) -> Result<R, E> + Send + Sync + 'static,
        O: Fn(BlockingJob) -> OFut,
        OFut: Future,
    {
        let mut items = items.into_iter().peekable();
        if items.peek().is_none() {
            return Vec::new();
        }

        let op = Arc::new(op);
        let (tx, rx) = mpsc::unbounded::<Slot<R, E>>();
        let mut len = 0;
        let handles: FuturesUnordered<OFut> = FuturesUnordered::new();

        for (index, item) in items.enumerate() {
            len += 1;

            #[cfg(feature = "tracing")]
            debug!(index, "offloading job");

            let op = Arc::clone(&op);
            let out_tx = tx.clone();
            let job: BlockingJob = Box::new(move || {
                let result = catch_unwind(AssertUnwindSafe(|| op(item)));
                // Ignore send errors - receiver may be dropped
                let _ = out_tx.unbounded_send((index, settle(index, result)));
            });
            handles.push(offload(job));
        }

        let slots = barrier(tx, rx, handles).await;
        self.assemble(len, slots)
    }

    /// Place index-tagged outcomes into submission order. Empty slots become `Abandoned`.
    fn assemble<R, E>(
        &self,
        len: usize,
        slots: impl IntoIterator<Item = Slot<R, E>>,
    ) -> Vec<Outcome<R, E>> {
        let mut ordered: Vec<Option<Outcome<R, E>>> = std::iter::repeat_with(|| None)
            .take(len)
            .collect();
        for (index, outcome) in slots {
            #[cfg(feature = "tracing")]
            trace!(runner = %self.name, index, ok = outcome.is_ok(), "unit completed");

            if let Some(slot) = ordered.get_mut(index) {
                *slot = Some(outcome);
            }
        }

        let results: Vec<_> = ordered
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.unwrap_or(Err(ItemError::Abandoned { index })))
            .collect();

        #[cfg(feature = "tracing")]
        {
            let mut failures = 0;
            for err in results.iter().filter_map(|r| r.as_ref().err()) {
                failures += 1;
                match err {
                    ItemError::Failed { index, .. } => {
                        warn!(runner = %self.name, index, "item failed")
                    }
                    ItemError::Panicked {
                        index,
                        panic_message,
                    } => error!(runner = %self.name, index, %panic_message, "item panicked"),
                    ItemError::Abandoned { index } => {
                        error!(runner = %self.name, index, "item abandoned by spawner")
                    }
                }
            }
            info!(
                runner = %self.name,
                items = len,
                failures,
                "fan-out completed"
            );
        }

        results
    }
}

/// Run `op` over `items` on scoped threads and return the outcomes in input order.
///
/// Shorthand for [`FanOut::run_scoped`] on a default runner.
///
/// ```
/// use gatherx::{run_all, ItemError};
///
/// let results = run_all(["1", "x", "3"], |s| s.parse::<u8>());
///
/// assert_eq!(results[0], Ok(1));
/// assert!(matches!(results[1], Err(ItemError::Failed { index: 1, .. })));
/// assert_eq!(results[2], Ok(3));
/// ```
pub fn run_all<I, R, E, Op>(items: impl IntoIterator<Item = I>, op: Op) -> Vec<Outcome<R, E>>
where
    I: Send,
    R: Send,
    E: Send,
    Op: Fn(I) -> Result<R, E> + Sync,
{
    FanOut::new().run_scoped(items, op)
}

/// Completion barrier: drive every spawner handle, then drain the outcome channel.
///
/// The channel closes once every unit has either reported or been dropped, so units a
/// spawner detached from its handle are still waited for.
async fn barrier<R, E, H>(
    tx: mpsc::UnboundedSender<Slot<R, E>>,
    mut rx: mpsc::UnboundedReceiver<Slot<R, E>>,
    mut handles: FuturesUnordered<H>,
) -> Vec<Slot<R, E>>
where
    H: Future,
{
    while handles.next().await.is_some() {}

    // Drop the original sender so the channel closes when all units are done
    drop(tx);

    let mut slots = Vec::new();
    while let Some(slot) = rx.next().await {
        slots.push(slot);
    }
    slots
}

fn settle<R, E>(index: usize, result: std::thread::Result<Result<R, E>>) -> Outcome<R, E> {
    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(ItemError::Failed { index, error }),
        Err(payload) => Err(ItemError::Panicked {
            index,
            panic_message: panic_message(payload),
        }),
    }
}
