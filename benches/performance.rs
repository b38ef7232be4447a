//! Benchmarks for the CPU-side work of a run: planning, row formatting and
//! summary statistics.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use mirror_latency_bench::{
    driver::{IterationPolicy, RunPlan},
    models::{Catalog, CatalogEntry, FileSpec, TrialRecord, TrialResult},
    stats::summarize,
    types::{Method, Source},
};

fn create_catalog(size: usize) -> Catalog {
    Catalog::new(
        (0..size)
            .map(|i| CatalogEntry {
                name: format!("file{}", i),
                spec: if i % 2 == 0 {
                    FileSpec::with_alias(format!("data/pdb{}.ent.gz", i), format!("{}.pdb.gz", i))
                } else {
                    FileSpec::http_only(format!("data/pdb{}.ent.gz", i))
                },
            })
            .collect(),
    )
}

fn create_records(count: usize) -> Vec<TrialRecord> {
    let sources = [Source::FilesHttp, Source::CloudHttp, Source::FilesDownload];
    (0..count)
        .map(|i| {
            let source = sources[i % 3];
            let start = i as f64 * 3.5;
            TrialRecord {
                file_name: format!("file{}", i % 5),
                source,
                method: if source == Source::FilesDownload { Method::Download } else { Method::Http },
                trial: (i / 15) as u32,
                result: TrialResult::new(
                    format!("https://files.rcsb.org/pub/pdb/data/file{}.gz", i % 5),
                    start,
                    start + 0.2 + (i % 40) as f64 * 0.05,
                    100_000 + i as u64,
                ),
            }
        })
        .collect()
}

fn bench_build_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_plan");
    for size in [5usize, 100, 1_000] {
        let catalog = create_catalog(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &catalog, |b, catalog| {
            b.iter(|| RunPlan::build(black_box(catalog), IterationPolicy::default()))
        });
    }
    group.finish();
}

fn bench_csv_fields(c: &mut Criterion) {
    let records = create_records(147);
    c.bench_function("csv_fields_default_run", |b| {
        b.iter(|| {
            for record in &records {
                black_box(record.csv_fields());
            }
        })
    });
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");
    for count in [147usize, 1_500, 15_000] {
        let records = create_records(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter(|| summarize(black_box(records)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_plan, bench_csv_fields, bench_summarize);
criterion_main!(benches);
