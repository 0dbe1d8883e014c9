//! Measurement overhead benchmarks

use criterion::{black_box, Criterion};
use gatherx::{named, Recorder, Timer};

pub fn bench_measure(c: &mut Criterion) {
    // Reporting to a recorder keeps stdout out of the numbers
    let timer = Timer::with_sink(Recorder::new());

    c.bench_function("measure_noop", |b| {
        b.iter(|| {
            let out = timer.measure(named("noop", |x: u64| x), (black_box(7),));
            timer.sink().take();
            out
        });
    });

    c.bench_function("try_measure_err", |b| {
        b.iter(|| timer.try_measure(named("fail", |x: u64| Err::<u64, _>(x)), (black_box(7),)));
    });

    c.bench_function("time_closure", |b| {
        b.iter(|| {
            let out = timer.time("sum", || (0..black_box(100_u64)).sum::<u64>());
            timer.sink().take();
            out
        });
    });
}
