//! Performance benchmarks for the check-in hot path.
//!
//! A confirmation costs one payload parse and one haversine evaluation. These
//! benchmarks measure both, across inputs that take different code paths.
//!
//! # Run Benchmarks
//!
//! ```sh
//! # Run all benchmarks in this file
//! cargo bench --bench distance_bench
//!
//! # Run one group
//! cargo bench --bench distance_bench -- payload_parse
//!
//! # Compare against a saved baseline
//! cargo bench --bench distance_bench -- --save-baseline main
//! cargo bench --bench distance_bench -- --baseline main
//! ```
//!
//! # Expected Results
//!
//! - Haversine is a handful of trig calls and should stay well under 100ns.
//! - Payload parsing is dominated by JSON decoding; rejected inputs that fail
//!   early (not JSON at all) should be noticeably cheaper than valid ones.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geocheck_core::{Coordinate, RangePolicy, haversine_meters, parse_reference_with};
use std::hint::black_box;

/// Benchmark great-circle distance over short, medium and antipodal spans.
fn bench_haversine(c: &mut Criterion) {
    let mut group = c.benchmark_group("haversine");
    group.throughput(Throughput::Elements(1));

    let origin = Coordinate::new_unchecked(25.0330, 121.5654);
    let cases = [
        ("same_point", origin),
        ("near_threshold", Coordinate::new_unchecked(25.0530, 121.5654)),
        ("cross_country", Coordinate::new_unchecked(22.6273, 120.3014)),
        ("antipodal", Coordinate::new_unchecked(-25.0330, -58.4346)),
    ];

    for (name, target) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &target, |b, target| {
            b.iter(|| black_box(haversine_meters(black_box(origin), black_box(*target))));
        });
    }

    group.finish();
}

/// Benchmark payload parsing for accepted and rejected scans.
fn bench_payload_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload_parse");
    group.throughput(Throughput::Elements(1));

    let cases = [
        ("valid", r#"{"lat":25.03,"lng":121.56}"#),
        ("valid_extra_fields", r#"{"id":"gate-3","lat":25.03,"lng":121.56,"note":"lobby"}"#),
        ("out_of_range", r#"{"lat":95.0,"lng":121.56}"#),
        ("missing_field", r#"{"lat":25.03}"#),
        ("not_json", "not json"),
    ];

    for (name, raw) in cases {
        for policy in [RangePolicy::Enforce, RangePolicy::FiniteOnly] {
            group.bench_with_input(
                BenchmarkId::new(format!("{policy:?}"), name),
                &raw,
                |b, raw| {
                    b.iter(|| black_box(parse_reference_with(black_box(raw), policy)));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_haversine, bench_payload_parse);
criterion_main!(benches);
