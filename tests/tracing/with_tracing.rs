//! Tests with tracing feature enabled

use gatherx::report::Tracing;
use gatherx::{fetch_all, named, FanOut, ItemError, Timer};

use tracing_subscriber::{fmt, EnvFilter};

use crate::common::StubFetcher;

fn init_subscriber() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tracing_with_subscriber() {
    init_subscriber();

    let results = FanOut::named("traced")
        .run(
            0..4,
            |i| async move {
                match i {
                    1 => Err("declined"),
                    2 => panic!("traced panic"),
                    _ => Ok(i),
                }
            },
            |fut| tokio::spawn(fut),
        )
        .await;

    assert_eq!(results[0], Ok(0));
    assert_eq!(
        results[1],
        Err(ItemError::Failed {
            index: 1,
            error: "declined"
        })
    );
    assert!(results[2].as_ref().is_err_and(ItemError::is_panic));
    assert_eq!(results[3], Ok(3));
}

#[test]
fn test_tracing_report_sink() {
    init_subscriber();

    let timer = Timer::with_sink(Tracing);
    let sum = timer.measure(named("sum", |a: u32, b: u32| a + b), (2, 3));

    assert_eq!(sum, 5);
}

#[test]
fn test_tracing_with_fetch() {
    init_subscriber();

    let client = StubFetcher::new().route("https://a.test", 0, 200);
    let reports = fetch_all(&FanOut::named("status"), &client, ["https://a.test", "https://x.test"]);

    assert_eq!(reports[0].as_ref().map(|r| r.status), Ok(200));
    assert!(reports[1].is_err());
}
