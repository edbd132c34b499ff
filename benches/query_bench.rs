//! Benchmarks for index construction and query execution
//!
//! Run with: cargo bench

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use switchboard::dataset::DatasetStore;
use switchboard::index::IndexSet;
use switchboard::ingest::normalize_grid;
use switchboard::query::{QueryDescriptor, QueryEngine};

fn synth_grid(rows: usize) -> Vec<Vec<String>> {
    let header = ["Agent", "Date", "Calls", "Duration", "Status", "Queue", "Rating"];
    let agents = ["ana", "bruno", "carla", "diego", "elisa"];
    let statuses = ["attended", "abandoned", "voicemail"];

    let mut grid = vec![header.iter().map(|h| h.to_string()).collect::<Vec<_>>()];
    for i in 0..rows {
        let day = 1 + (i % 28);
        let month = 1 + (i / 28) % 12;
        grid.push(vec![
            agents[i % agents.len()].to_string(),
            format!("2024-{month:02}-{day:02}"),
            format!("{}", 1 + i % 5),
            format!("{:02}:{:02}", i % 10, i % 60),
            statuses[i % statuses.len()].to_string(),
            format!("queue-{}", i % 4),
            format!("{}", 1 + i % 5),
        ]);
    }
    grid
}

fn loaded_store(rows: usize) -> DatasetStore {
    let normalized = normalize_grid(&synth_grid(rows));
    let mut store = DatasetStore::new();
    store.replace(normalized.columns, normalized.rows);
    store
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for size in [1_000, 10_000] {
        let normalized = normalize_grid(&synth_grid(size));

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("build_{}", size), |b| {
            b.iter(|| IndexSet::build(black_box(&normalized.rows)))
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let grid = synth_grid(10_000);

    group.throughput(Throughput::Elements(10_000));
    group.bench_function("normalize_10000", |b| {
        b.iter(|| normalize_grid(black_box(&grid)))
    });

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let store = loaded_store(10_000);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();

    group.bench_function("by_agent", |b| {
        let descriptor = QueryDescriptor::agent("ana");
        b.iter(|| QueryEngine::new(&store).run(black_box(&descriptor)))
    });

    group.bench_function("by_period", |b| {
        let descriptor = QueryDescriptor::period(start, end);
        b.iter(|| QueryEngine::new(&store).run(black_box(&descriptor)))
    });

    group.bench_function("by_agent_in_period", |b| {
        let descriptor = QueryDescriptor::agent_in_range("ana", start, end);
        b.iter(|| QueryEngine::new(&store).run(black_box(&descriptor)))
    });

    group.finish();
}

criterion_group!(benches, bench_index_build, bench_normalize, bench_query);
criterion_main!(benches);
