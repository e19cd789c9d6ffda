use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fundtracker_ledger::prelude::*;
use fundtracker_ledger::{ManualClock, MemoryStorage, SequentialIds};
use std::sync::Arc;

fn ledger_with(count: usize) -> Ledger {
    let mut ledger = Ledger::open_with(
        LedgerConfig::default().without_seed(),
        Arc::new(MemoryStorage::new()),
        Arc::new(SequentialIds::new()),
        Arc::new(ManualClock::new(1_700_000_000_000)),
    )
    .unwrap();

    for i in 0..count {
        let (kind, status) = match i % 3 {
            0 => (TransactionType::Allocation, TransactionStatus::Completed),
            1 => (TransactionType::Payment, TransactionStatus::Pending),
            _ => (TransactionType::Transfer, TransactionStatus::Approved),
        };
        ledger
            .add_transaction(NewTransaction::new("Government Treasury", "Regional Council", i as i64, kind, status))
            .unwrap();
    }
    ledger
}

fn bench_derived_totals(c: &mut Criterion) {
    let mut group = c.benchmark_group("derived_totals");

    for size in [100, 1_000] {
        let ledger = ledger_with(size);
        group.bench_with_input(BenchmarkId::new("total_funds", size), &ledger, |b, ledger| {
            b.iter(|| black_box(ledger.total_funds()));
        });
        group.bench_with_input(BenchmarkId::new("pending_count", size), &ledger, |b, ledger| {
            b.iter(|| black_box(ledger.pending_count()));
        });
    }

    group.finish();
}

fn bench_add_transaction(c: &mut Criterion) {
    c.bench_function("add_transaction_persist_500", |b| {
        let mut ledger = ledger_with(500);
        b.iter(|| {
            ledger
                .add_transaction(NewTransaction::new(
                    "Local Authority",
                    "Contractor",
                    black_box(1),
                    TransactionType::Payment,
                    TransactionStatus::Pending,
                ))
                .unwrap()
        });
    });
}

criterion_group!(benches, bench_derived_totals, bench_add_transaction);
criterion_main!(benches);
