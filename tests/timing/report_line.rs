//! Tests for the single report line emitted per successful invocation

use std::time::Duration;

use gatherx::report::{from_fn, FnSink};
use gatherx::{named, Timer, Timing};
use parking_lot::Mutex;

/// Sink capturing rendered report lines
fn line_sink(lines: &Mutex<Vec<String>>) -> FnSink<impl Fn(&Timing) + Send + Sync + '_> {
    from_fn(move |t: &Timing| lines.lock().push(t.to_string()))
}

fn assert_report_line(line: &str, name: &str) {
    let prefix = format!("function {name} took ");
    let secs = line
        .strip_prefix(&prefix)
        .and_then(|rest| rest.strip_suffix("s to execute"))
        .unwrap_or_else(|| panic!("unexpected report line: {line}"));

    let (whole, fraction) = secs.split_once('.').expect("seconds have a decimal point");
    assert!(whole.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(fraction.len(), 3, "exactly 3 decimal places in {line}");
    assert!(fraction.chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn test_one_line_per_successful_invocation() {
    let lines = Mutex::new(Vec::new());
    let timer = Timer::with_sink(line_sink(&lines));

    timer.measure(named("weather_in_city", |_: &str, _: &str| ()), ("SF", "Windy"));

    let lines = lines.lock().clone();
    assert_eq!(lines.len(), 1);
    assert_report_line(&lines[0], "weather_in_city");
}

#[test]
fn test_line_reflects_elapsed_time() {
    let lines = Mutex::new(Vec::new());
    let timer = Timer::with_sink(line_sink(&lines));

    timer.measure(
        named("nap", || std::thread::sleep(Duration::from_millis(120))),
        (),
    );

    let lines = lines.lock().clone();
    assert_report_line(&lines[0], "nap");
    let secs: f64 = lines[0]
        .trim_start_matches("function nap took ")
        .trim_end_matches("s to execute")
        .parse()
        .unwrap();
    assert!(secs >= 0.12, "reported {secs}s for a 120ms sleep");
}

#[test]
fn test_failed_invocation_emits_nothing() {
    let lines = Mutex::new(Vec::new());
    let timer = Timer::with_sink(line_sink(&lines));

    let result = timer.try_measure(named("refuse", || "x".parse::<u8>()), ());

    assert!(result.is_err());
    assert!(lines.lock().is_empty());
}

#[test]
fn test_panicking_invocation_emits_nothing() {
    let lines = Mutex::new(Vec::new());
    let timer = Timer::with_sink(line_sink(&lines));

    let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        timer.measure(named("explode", || panic!("work failed")), ())
    }));

    assert!(caught.is_err());
    assert!(lines.lock().is_empty());
}

#[test]
fn test_free_measure_forwards_output() {
    // Prints to stdout; the return value must come back untouched
    let v = gatherx::measure(named("collect", |n: usize| vec![0_u8; n]), (4,));
    assert_eq!(v, vec![0, 0, 0, 0]);

    let ok = gatherx::try_measure(named("parse", |s: &str| s.parse::<i64>()), ("-7",));
    assert_eq!(ok, Ok(-7));
}
