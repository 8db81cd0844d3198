//! Query Operations Benchmarks
//!
//! Benchmarks for tree traversal, criterion matching, and event dispatch.
//!
//! Run with: `cargo bench --bench query_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use instance_probe::prelude::{press, render, Element, Handler, Props, Queryable, RenderApi};

/// A list screen with `rows` rows, each a labelled switch
fn list_screen(rows: usize) -> RenderApi {
    let items = (0..rows).map(|i| {
        Element::host("View")
            .test_id(format!("row-{i}"))
            .child(Element::host("Text").text(format!("Row {i}")))
            .child(Element::host("Switch").prop("value", i % 2 == 0))
    });
    render(
        Element::host("ScrollView")
            .child(Element::host("Button").test_id("submit").on("press", Handler::from_fn(|_| {})))
            .with_children(items),
    )
}

fn bench_query_kinds(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_kinds");
    let api = list_screen(200);

    group.bench_function("test_id", |bench| {
        bench.iter(|| black_box(api.get_by_test_id(black_box("row-150")).unwrap()));
    });
    group.bench_function("type", |bench| {
        bench.iter(|| black_box(api.get_by_type(black_box("Button")).unwrap()));
    });
    group.bench_function("text", |bench| {
        bench.iter(|| black_box(api.get_by_text(black_box("Row 150")).unwrap()));
    });
    group.bench_function("props", |bench| {
        let props = Props::new().with("value", false);
        bench.iter(|| black_box(api.query_all_by_props(props.clone()).unwrap()));
    });

    group.finish();
}

fn bench_tree_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_size");

    for rows in [10, 100, 1000] {
        let api = list_screen(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |bench, _| {
            bench.iter(|| black_box(api.query_all_by_type(black_box("Text")).unwrap()));
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for rows in [10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |bench, &rows| {
            bench.iter(|| black_box(list_screen(rows)));
        });
    }

    group.finish();
}

fn bench_press(c: &mut Criterion) {
    let api = list_screen(50);
    let submit = api.get_by_test_id("submit").unwrap();

    c.bench_function("press", |bench| {
        bench.iter(|| black_box(press(&submit).unwrap()));
    });
}

criterion_group!(benches, bench_query_kinds, bench_tree_size, bench_render, bench_press);
criterion_main!(benches);
