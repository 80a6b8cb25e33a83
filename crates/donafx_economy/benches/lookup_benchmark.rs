//! Benchmark for the donation tier floor lookup.
//!
//! TARGET: a lookup in a few hundred tiers stays in the nanosecond range,
//! so routing cost never depends on how many tiers a streamer configures.
//!
//! Run with: cargo bench --package donafx_economy --bench lookup_benchmark

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use donafx_economy::{ActionKind, EffectConfigTable, EffectConfiguration};

fn table_of(size: usize) -> EffectConfigTable {
    EffectConfigTable::from_configs(
        (0..size)
            .map(|i| {
                let action = ActionKind::ALL[i % ActionKind::ALL.len()];
                EffectConfiguration::new(i as f64 * 100.0, action)
            })
            .collect(),
    )
}

fn benchmark_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_config_for_amount");
    for size in [8_usize, 64, 512] {
        let table = table_of(size);
        let top = size as f64 * 100.0;
        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            let mut amount = 0.0;
            b.iter(|| {
                amount = (amount + 137.0) % top;
                black_box(table.find_config_for_amount(black_box(amount)))
            });
        });
    }
    group.finish();
}

fn benchmark_decode(c: &mut Criterion) {
    let text = table_of(64).to_serialized().unwrap_or_default();
    c.bench_function("decode_64_tiers", |b| {
        b.iter(|| EffectConfigTable::from_serialized(black_box(&text)));
    });
}

criterion_group!(benches, benchmark_lookup, benchmark_decode);
criterion_main!(benches);
