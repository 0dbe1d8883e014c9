//! Boundary conditions: empty and single-item batches, large batches

use gatherx::{run_all, FanOut};

#[test]
fn test_empty_scoped() {
    let results = run_all(std::iter::empty::<u8>(), |x| Ok::<_, ()>(x));
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_empty_blocking_never_calls_offloader() {
    let results = FanOut::new()
        .run_blocking(
            Vec::<u8>::new(),
            |x| Ok::<_, ()>(x),
            |_job| -> futures::future::Ready<()> { panic!("offloader must not be called") },
        )
        .await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_empty_async_never_calls_op() {
    let results = FanOut::new()
        .run(
            Vec::<u8>::new(),
            |_| -> futures::future::Ready<Result<u8, ()>> { panic!("op must not be called") },
            |fut| fut,
        )
        .await;
    assert!(results.is_empty());
}

#[test]
fn test_single_item() {
    assert_eq!(run_all(["only"], |s| Ok::<_, ()>(s)), vec![Ok("only")]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_large_async_batch() {
    let n = 2_000_usize;

    let results = FanOut::new()
        .run(0..n, |i| async move { Ok::<_, ()>(i * 2) }, |fut| tokio::spawn(fut))
        .await;

    assert_eq!(results.len(), n);
    assert!(results
        .into_iter()
        .enumerate()
        .all(|(i, r)| r == Ok(i * 2)));
}
