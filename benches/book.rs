//! Benchmarks for the limit order book.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- market_order
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use limit_order_book::{Book, Side};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Book with `levels` ask levels starting at `base_price`, `per_level`
/// orders of 100 shares each.
fn populated_asks(levels: u64, per_level: u64, base_price: u64) -> Book {
    let mut book = Book::with_capacity((levels * per_level) as usize, levels as usize);
    let mut id = 1;
    for level in 0..levels {
        for _ in 0..per_level {
            book.add_order(id, Side::Sell, 100, base_price + level).unwrap();
            id += 1;
        }
    }
    book
}

/// Deterministic pseudo-random prices in `[base, base + spread)`
fn scattered_prices(count: usize, seed: u64, base: u64, spread: u64) -> Vec<u64> {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| base + rng.gen_range(0..spread)).collect()
}

// ============================================================================
// BENCHMARK: Order Operations
// ============================================================================

fn bench_order_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_operations");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("add_to_existing_level", |b| {
        b.iter_batched(
            || populated_asks(1_000, 1, 10_000),
            |mut book| black_box(book.add_order(999_999, Side::Sell, 100, 10_500)),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("add_new_level", |b| {
        b.iter_batched(
            || populated_asks(1_000, 1, 10_000),
            |mut book| black_box(book.add_order(999_999, Side::Sell, 100, 50_000)),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("cancel_retiring_level", |b| {
        b.iter_batched(
            || populated_asks(1_000, 1, 10_000),
            |mut book| black_box(book.cancel_order(500)),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Market Orders
// ============================================================================

fn bench_market_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("market_order");
    group.measurement_time(Duration::from_secs(5));

    for levels in [1u64, 10, 100] {
        group.bench_with_input(BenchmarkId::new("sweep_levels", levels), &levels, |b, &levels| {
            b.iter_batched(
                || populated_asks(1_000, 4, 10_000),
                |mut book| black_box(book.market_order(0, Side::Buy, levels * 400)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Throughput
// ============================================================================

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");
    group.sample_size(50);

    for count in [1_000usize, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        let prices = scattered_prices(count, 42, 10_000, 2_000);

        group.bench_with_input(BenchmarkId::new("add_then_cancel", count), &prices, |b, prices| {
            b.iter(|| {
                let mut book = Book::with_capacity(prices.len(), 2_000);
                for (id, &price) in prices.iter().enumerate() {
                    let side = if id % 2 == 0 { Side::Buy } else { Side::Sell };
                    book.add_order(id as u64, side, 10, price).unwrap();
                }
                for id in 0..prices.len() as u64 {
                    book.cancel_order(id).unwrap();
                }
                black_box(book.is_empty())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_order_operations, bench_market_order, bench_throughput);
criterion_main!(benches);
