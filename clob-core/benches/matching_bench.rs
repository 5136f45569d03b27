mod common;

use clob_core::prelude::*;
use common::{limit_order, market_order};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};

fn bench_resting_limit_submission(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit 10k resting limits");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("non-crossing limit orders", |b| {
        b.iter(|| {
            let engine = Engine::new(EngineConfig::default());
            for i in 0..10_000u64 {
                let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
                let price = if side == Side::Buy { 900 } else { 1100 };
                engine
                    .submit(limit_order(side, price, 10, i))
                    .unwrap();
            }
        });
    });
    group.finish();
}

fn bench_market_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("market order sweep");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("market buy against 10k resting sells", |b| {
        b.iter_batched(
            || {
                let engine = Engine::new(EngineConfig::default());
                for i in 0..10_000u64 {
                    engine
                        .submit(limit_order(Side::Sell, 1000 + (i % 500), 10, i))
                        .unwrap();
                }
                engine
            },
            |engine| {
                engine.submit(market_order(Side::Buy, 100_000, 20_000)).unwrap();
            },
            criterion::BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_resting_limit_submission, bench_market_sweep);
criterion_main!(benches);
