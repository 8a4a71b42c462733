use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pkcurve::prelude::*;
use std::hint::black_box;

fn typical_drug(name: &str) -> DrugParameters {
    DrugParameters::builder(name)
        .dose(10.0)
        .bioavailability(0.87)
        .volume_per_kg(2.6)
        .half_life(4.5)
        .time_to_peak(1.5)
        .onset_time(0.5)
        .end_threshold(2.0)
        .build()
}

fn routes() -> Vec<Route> {
    vec![
        Route::OralSingle,
        Route::oral_multi(8.0),
        Route::PatchInstant {
            patch_duration: 72.0,
        },
        Route::patch_washout(72.0),
    ]
}

fn bench_routes(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");
    let params = typical_drug("bench_drug");

    for route in routes() {
        let options = SimulationOptions::new(route);
        group.bench_with_input(BenchmarkId::from_parameter(route), &options, |b, options| {
            b.iter(|| {
                let simulation = simulate(black_box(&params), black_box(options));
                black_box(simulation)
            });
        });
    }

    group.finish();
}

fn bench_grid_density(c: &mut Criterion) {
    let mut group = c.benchmark_group("patch_washout_samples");
    let params = typical_drug("bench_drug");

    for samples in [2_000, 20_000, 200_000] {
        let options = SimulationOptions::new(Route::patch_washout(72.0))
            .with_resolution(Resolution::Count(samples));
        group.bench_with_input(BenchmarkId::from_parameter(samples), &options, |b, options| {
            b.iter(|| black_box(simulate(black_box(&params), black_box(options))));
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_many");

    for size in [10, 100, 500] {
        let requests: Vec<SimulationRequest> = (0..size)
            .map(|i| {
                let route = routes()[i % 4];
                let mut params = typical_drug(&format!("drug_{}", i));
                params.half_life *= 1.0 + (i % 7) as f64 * 0.1;
                SimulationRequest {
                    params,
                    options: SimulationOptions::new(route),
                }
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &requests, |b, requests| {
            b.iter(|| black_box(simulate_many(black_box(requests))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_routes, bench_grid_density, bench_batch);
criterion_main!(benches);
