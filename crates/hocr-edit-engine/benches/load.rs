use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use hocr_edit_engine::Document;
mod common;

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    group.sample_size(20);

    let strict = common::generate_hocr_page(100, 15);
    group.bench_function("strict_xml_1500_words", |b| {
        let bytes = strict.as_bytes();
        b.iter(|| {
            let doc = Document::load(black_box(bytes)).unwrap();
            black_box(doc);
        });
    });

    let soup = common::generate_tag_soup_page(100, 15);
    group.bench_function("tag_soup_1500_words", |b| {
        let bytes = soup.as_bytes();
        b.iter(|| {
            let doc = Document::load(black_box(bytes)).unwrap();
            black_box(doc);
        });
    });

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    let content = common::generate_hocr_page(100, 15);
    let doc = Document::load(content.as_bytes()).unwrap();
    let middle = content.len() / 2;

    group.bench_function("word_by_id", |b| {
        b.iter(|| black_box(doc.word_by_id(black_box("word_99_14"))));
    });
    group.bench_function("word_at_offset", |b| {
        b.iter(|| black_box(doc.word_at_offset(black_box(middle))));
    });

    group.finish();
}

criterion_group!(benches, bench_load, bench_lookup);
criterion_main!(benches);
