use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tui_labeltable::{LabelRecord, LabelStore, LabelView, SortMode};

const CLASSES: [&str; 8] = [
    "person", "car", "Dog", "bicycle", "traffic light", "cat", "Bus", "truck",
];

fn build_store(count: usize) -> LabelStore<usize> {
    let mut store = LabelStore::with_capacity(count);
    store.load(
        (0..count)
            .map(|idx| LabelRecord::new(idx, format!("{}-{idx}", CLASSES[idx % CLASSES.len()])))
            .collect(),
    );
    store
}

fn bench_mapping(c: &mut Criterion) {
    let store = build_store(10_000);

    c.bench_function("rebuild_unfiltered_unsorted", |b| {
        let mut view = LabelView::new();
        b.iter(|| {
            view.invalidate();
            black_box(view.visible_len(&store))
        });
    });

    c.bench_function("rebuild_filtered", |b| {
        let mut view = LabelView::new();
        view.set_filter("CAR");
        b.iter(|| {
            view.invalidate();
            black_box(view.visible_len(&store))
        });
    });

    c.bench_function("rebuild_sorted", |b| {
        let mut view = LabelView::new();
        view.set_sort(SortMode::Ascending);
        b.iter(|| {
            view.invalidate();
            black_box(view.visible_len(&store))
        });
    });

    c.bench_function("map_from_source_fresh", |b| {
        let mut view = LabelView::new();
        view.set_filter("a");
        view.set_sort(SortMode::Descending);
        b.iter(|| black_box(view.map_from_source(&store, black_box(4_321))));
    });
}

criterion_group!(benches, bench_mapping);
criterion_main!(benches);
