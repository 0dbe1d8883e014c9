//! # Timed Work Example
//!
//! Shows the three ways to time a unit of work: the `#[timed]` attribute, [`measure`] with a
//! named function, and a [`Timer`] collecting into a [`Recorder`].
//!
//! ```bash
//! cargo run --example timed_work
//! ```

use std::thread::sleep;
use std::time::Duration;

use gatherx::{measure, named, run_all, timed, Recorder, Timer};

#[timed]
fn weather_in_city(city: &str, weather: &str) {
    sleep(Duration::from_secs(1));
    println!("weather today in {city} is {weather}");
}

#[timed(name = "parse_reading")]
fn parse(reading: &str) -> Result<f64, std::num::ParseFloatError> {
    reading.trim().parse()
}

fn forecast(city: &str) -> String {
    sleep(Duration::from_millis(250));
    format!("{city}: clear skies")
}

fn main() {
    println!("=== #[timed] ===");
    weather_in_city("San Francisco", "Windy");

    // Only the successful parse is reported
    let _ = parse("21.5");
    let _ = parse("n/a");

    println!("\n=== measure ===");
    let line = measure(named("forecast", forecast), ("Lisbon",));
    println!("{line}");

    println!("\n=== Timer with a recorder ===");
    let timer = Timer::with_sink(Recorder::new());
    let results = timer.time("forecast_batch", || {
        run_all(["Oslo", "Quito", "Nairobi"], |city| {
            Ok::<_, std::convert::Infallible>(forecast(city))
        })
    });
    for line in results.into_iter().flatten() {
        println!("{line}");
    }
    for timing in timer.sink().timings() {
        println!("recorded: {timing}");
    }
}
