use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ff_core::{murmur3_32, positions, verdict, FilterParameters, HashMode, PatternSet};

fn bench_prefilter(c: &mut Criterion) {
    let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL1234567890&index=3";
    let murmur = FilterParameters::default();
    let sha = FilterParameters { hash_mode: HashMode::Sha256Split, ..murmur };
    let patterns = PatternSet::default();

    c.bench_function("murmur3_32 url", |b| {
        b.iter(|| black_box(murmur3_32(black_box(url.as_bytes()), 0x5F37_59DF)))
    });
    c.bench_function("positions murmur3", |b| {
        b.iter(|| black_box(positions(black_box(url), &murmur).sum::<u32>()))
    });
    c.bench_function("positions sha256", |b| {
        b.iter(|| black_box(positions(black_box(url), &sha).sum::<u32>()))
    });
    c.bench_function("verdict allow", |b| {
        b.iter(|| black_box(verdict(black_box(url), &patterns)))
    });
}

criterion_group!(benches, bench_prefilter);
criterion_main!(benches);
