//! Tests for the `#[timed]` attribute

use gatherx::{timed, Recorder};

static SYNC: Recorder = Recorder::new();
static RENAMED: Recorder = Recorder::new();
static FALLIBLE: Recorder = Recorder::new();
static ASYNC: Recorder = Recorder::new();
static METHODS: Recorder = Recorder::new();
static EARLY: Recorder = Recorder::new();
static BORROWS: Recorder = Recorder::new();
static PANICS: Recorder = Recorder::new();

fn names(recorder: &Recorder) -> Vec<String> {
    recorder
        .timings()
        .iter()
        .map(|t| t.name().to_string())
        .collect()
}

#[timed(sink = SYNC)]
fn add(a: i32, b: i32) -> i32 {
    a + b
}

#[timed(sink = RENAMED, name = "weather report")]
fn weather_in_city(city: &str, weather: &str) -> String {
    format!("weather today in {city} is {weather}")
}

#[timed(sink = FALLIBLE)]
fn parse_port(s: &str) -> Result<u16, std::num::ParseIntError> {
    let port = s.trim().parse::<u16>()?;
    Ok(port)
}

#[timed(sink = ASYNC)]
async fn slow_double(x: u64) -> u64 {
    tokio::time::sleep(std::time::Duration::from_millis(15)).await;
    x * 2
}

#[timed(sink = ASYNC, name = "async_fallible")]
async fn async_parse(s: &str) -> Result<i32, std::num::ParseIntError> {
    let v: i32 = s.parse()?;
    Ok(v)
}

#[timed(sink = EARLY)]
fn first_even(values: &[u32]) -> Option<u32> {
    for &v in values {
        if v % 2 == 0 {
            return Some(v);
        }
    }
    None
}

#[timed(sink = BORROWS)]
fn first_mut(values: &mut [u32]) -> &mut u32 {
    &mut values[0]
}

#[timed(sink = PANICS)]
fn explode(trigger: bool) -> u32 {
    if trigger {
        panic!("timed body failed");
    }
    1
}

struct Slots<T> {
    items: Vec<T>,
}

impl<T> Slots<T> {
    #[timed(sink = BORROWS)]
    fn last_mut(&mut self) -> &mut T {
        let last = self.items.len() - 1;
        &mut self.items[last]
    }
}

struct Counter {
    count: u32,
}

impl Counter {
    #[timed(sink = METHODS)]
    fn bump(&mut self, by: u32) -> u32 {
        self.count += by;
        self.count
    }

    #[timed(sink = METHODS)]
    fn peek(&self) -> u32 {
        self.count
    }

    #[timed(sink = METHODS)]
    async fn peek_async(&self) -> u32 {
        self.count
    }
}

#[timed]
fn reports_to_stdout() -> &'static str {
    "stdout"
}

#[timed]
fn unit_return(flag: &mut bool) {
    *flag = true;
}

#[test]
fn test_timed_sync_forwards_and_reports() {
    assert_eq!(add(2, 3), 5);
    assert_eq!(add(10, -1), 9);

    assert_eq!(names(&SYNC), ["add", "add"]);
}

#[test]
fn test_timed_custom_name() {
    assert_eq!(
        weather_in_city("San Francisco", "Windy"),
        "weather today in San Francisco is Windy"
    );
    assert_eq!(names(&RENAMED), ["weather report"]);
}

#[test]
fn test_timed_result_reports_only_ok() {
    assert_eq!(parse_port(" 8080 "), Ok(8080));
    assert!(parse_port("http").is_err());
    assert!(parse_port("99999").is_err());

    assert_eq!(names(&FALLIBLE), ["parse_port"]);
}

#[test]
fn test_timed_early_return() {
    assert_eq!(first_even(&[1, 3, 4, 6]), Some(4));
    assert_eq!(first_even(&[1, 3]), None);

    // Option is not a Result: both calls are reported
    assert_eq!(EARLY.len(), 2);
}

#[tokio::test]
async fn test_timed_async() {
    assert_eq!(slow_double(21).await, 42);
    assert_eq!(async_parse("12").await, Ok(12));
    assert!(async_parse("twelve").await.is_err());

    let timings = ASYNC.timings();
    let reported: Vec<_> = timings.iter().map(|t| t.name()).collect();
    assert_eq!(reported, ["slow_double", "async_fallible"]);
    assert!(timings[0].elapsed() >= std::time::Duration::from_millis(15));
}

#[tokio::test]
async fn test_timed_methods() {
    let mut counter = Counter { count: 0 };

    assert_eq!(counter.bump(2), 2);
    assert_eq!(counter.bump(3), 5);
    assert_eq!(counter.peek(), 5);
    assert_eq!(counter.peek_async().await, 5);

    assert_eq!(names(&METHODS), ["bump", "bump", "peek", "peek_async"]);
}

#[test]
fn test_timed_default_sink() {
    assert_eq!(reports_to_stdout(), "stdout");

    let mut flag = false;
    unit_return(&mut flag);
    assert!(flag);
}

#[test]
fn test_timed_returns_mutable_borrows() {
    let mut values = [1, 2, 3];
    *first_mut(&mut values) += 10;
    assert_eq!(values, [11, 2, 3]);

    let mut slots = Slots {
        items: vec!["a".to_string(), "b".to_string()],
    };
    slots.last_mut().push('!');
    assert_eq!(slots.items, ["a", "b!"]);

    assert_eq!(names(&BORROWS), ["first_mut", "last_mut"]);
}

#[test]
fn test_timed_panic_emits_nothing() {
    let caught = std::panic::catch_unwind(|| explode(true));
    assert!(caught.is_err());
    assert!(PANICS.is_empty());

    assert_eq!(explode(false), 1);
    assert_eq!(names(&PANICS), ["explode"]);
}
