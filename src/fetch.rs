//! HTTP status fan-out over an explicitly passed client.
//!
//! The runner never owns or creates a client: callers hand in anything implementing [`Fetch`],
//! which keeps connection reuse in the caller's hands and lets tests substitute a double.

use std::future::Future;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::trace;

use crate::error::Outcome;
use crate::fanout::{BlockingJob, FanOut};

/// A blocking HTTP client capability: fetch a URL, return its status code.
///
/// Retries, TLS and redirects are the implementor's business.
pub trait Fetch: Send + Sync {
    type Error: Send + 'static;

    fn fetch(&self, url: &str) -> Result<u16, Self::Error>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    type Error = T::Error;

    fn fetch(&self, url: &str) -> Result<u16, Self::Error> {
        (**self).fetch(url)
    }
}

impl<T: Fetch + ?Sized> Fetch for Arc<T> {
    type Error = T::Error;

    fn fetch(&self, url: &str) -> Result<u16, Self::Error> {
        (**self).fetch(url)
    }
}

/// Status code observed for one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub url: String,
    pub status: u16,
}

impl std::fmt::Display for StatusReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "The response code for url: {} is : {}",
            self.url, self.status
        )
    }
}

/// Fetch every URL concurrently on scoped threads; results follow the order of `urls`.
///
/// ```
/// use gatherx::{fetch_all, FanOut, Fetch};
///
/// struct AlwaysOk;
///
/// impl Fetch for AlwaysOk {
///     type Error = std::convert::Infallible;
///
///     fn fetch(&self, _url: &str) -> Result<u16, Self::Error> {
///         Ok(200)
///     }
/// }
///
/// let reports = fetch_all(&FanOut::new(), &AlwaysOk, ["https://a.test", "https://b.test"]);
/// assert_eq!(reports[1].as_ref().unwrap().status, 200);
/// ```
pub fn fetch_all<C, U>(
    runner: &FanOut,
    client: &C,
    urls: impl IntoIterator<Item = U>,
) -> Vec<Outcome<StatusReport, C::Error>>
where
    C: Fetch + ?Sized,
    U: AsRef<str> + Send,
{
    runner.run_scoped(urls, |url| fetch_one(client, url.as_ref()))
}

/// Fetch every URL through an async offloader such as `tokio::task::spawn_blocking`.
pub async fn fetch_all_offloaded<C, U, O, OFut>(
    runner: &FanOut,
    client: Arc<C>,
    urls: impl IntoIterator<Item = U>,
    offload: O,
) -> Vec<Outcome<StatusReport, C::Error>>
where
    C: Fetch + ?Sized + 'static,
    U: AsRef<str> + Send + 'static,
    O: Fn(BlockingJob) -> OFut,
    OFut: Future,
{
    runner
        .run_blocking(urls, move |url| fetch_one(&*client, url.as_ref()), offload)
        .await
}

fn fetch_one<C: Fetch + ?Sized>(client: &C, url: &str) -> Result<StatusReport, C::Error> {
    let status = client.fetch(url)?;

    #[cfg(feature = "tracing")]
    trace!(url, status, "fetched");

    Ok(StatusReport {
        url: url.to_owned(),
        status,
    })
}

/// Errors from the `reqwest`-backed [`Fetch`] implementation.
#[cfg(feature = "http")]
#[derive(Debug)]
#[non_exhaustive]
pub enum FetchError {
    /// The request could not be sent or no response arrived
    Request(reqwest::Error),
}

#[cfg(feature = "http")]
impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Request(err) => write!(f, "request failed: {}", err),
        }
    }
}

#[cfg(feature = "http")]
impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Request(err) => Some(err),
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Request(err)
    }
}

#[cfg(feature = "http")]
impl Fetch for reqwest::blocking::Client {
    type Error = FetchError;

    fn fetch(&self, url: &str) -> Result<u16, Self::Error> {
        let response = self.get(url).send()?;
        Ok(response.status().as_u16())
    }
}
