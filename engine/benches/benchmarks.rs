//! Performance benchmarks for campus-engine

use campus_engine::listing::{self, Direction, SortState};
use campus_engine::{EntityKind, Record, Screen};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

fn create_students(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            Record::new(json!({
                "id": i,
                "matricula": format!("2023{:05}", i),
                "curp": format!("CURP{:014}", i),
                "user": {
                    "first_name": format!("Alumno{}", i),
                    "last_name": format!("Apellido{}", count - i),
                    "email": format!("alumno{}@uni.mx", i),
                },
            }))
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let schema = EntityKind::Students.schema();

    for size in [100, 1000, 10000].iter() {
        let records = create_students(*size);

        group.bench_with_input(BenchmarkId::new("empty_term", size), size, |b, _| {
            b.iter(|| listing::filter(black_box(&records), "", &schema.searchable))
        });

        group.bench_with_input(BenchmarkId::new("substring", size), size, |b, _| {
            b.iter(|| {
                listing::filter(
                    black_box(&records),
                    black_box("alumno12"),
                    &schema.searchable,
                )
            })
        });
    }

    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");
    let schema = EntityKind::Students.schema();

    for size in [100, 1000, 10000].iter() {
        let records = create_students(*size);

        for field in ["id", "nombre"] {
            let state = SortState::new(field, Direction::Descending);
            group.bench_with_input(BenchmarkId::new(field, size), size, |b, _| {
                b.iter(|| {
                    let mut copy = records.clone();
                    listing::sort(black_box(&mut copy), &schema, &state);
                    copy
                })
            });
        }
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    group.bench_function("screen_view_1000", |b| {
        let mut screen = Screen::new(EntityKind::Students, 10).unwrap();
        screen.replace_collection(create_students(1000));
        screen.set_search("alumno1");
        screen.toggle_sort("nombre");

        b.iter(|| black_box(&screen).view())
    });

    group.bench_function("page_numbers", |b| {
        b.iter(|| listing::visible_page_numbers(black_box(500), black_box(1000), 5))
    });

    group.finish();
}

criterion_group!(benches, bench_filter, bench_sort, bench_pipeline);
criterion_main!(benches);
