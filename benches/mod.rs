use criterion::{criterion_group, criterion_main};

mod lightdb;

criterion_group!(
    benches,
    lightdb::bench_set_dispatch,
    lightdb::bench_set_structured,
    lightdb::bench_path_encoding
);
criterion_main!(benches);
