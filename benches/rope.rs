use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use textdoc::{Document, Rope};

fn bench_rope_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("rope_insert_sequential");
    for &len in &[100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| {
                let mut rope = Rope::new();
                for i in 0..len {
                    rope.insert(i, black_box(b"x")).unwrap();
                }
                black_box(rope.char_count());
            });
        });
    }
    group.finish();
}

fn bench_rope_random_delete(c: &mut Criterion) {
    c.bench_function("rope_delete_from_middle", |b| {
        b.iter_batched(
            || {
                let mut rope = Rope::new();
                rope.insert(0, "x".repeat(10_000).as_bytes()).unwrap();
                rope
            },
            |mut rope| {
                rope.delete(5_000, 1_000);
                black_box(rope.char_count());
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_document_line_lookup(c: &mut Criterion) {
    let text = "the quick brown fox\n".repeat(2_000);
    let doc: Document<()> = Document::from_str(&text);
    c.bench_function("document_line_of_offset", |b| {
        b.iter(|| black_box(doc.line_of_offset(black_box(doc.char_count() / 2))));
    });
}

criterion_group!(benches, bench_rope_insert, bench_rope_random_delete, bench_document_line_lookup);
criterion_main!(benches);
