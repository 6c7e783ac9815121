use halfconv::{decode, encode, Half};

fn test_decode_all() {
    for bits in 0..=u16::MAX {
        black_box(decode(black_box(bits)));
    }
}

fn test_encode_sweep() {
    for bits in (0..=u32::MAX).step_by(65537) {
        black_box(encode(black_box(f32::from_bits(bits))));
    }
}

fn test_encode_half_range() {
    for i in 0..10000 {
        let v = i as f32 * 6.5536 - 32768.;
        black_box(encode(black_box(v)));
    }
}

fn test_from_f64() {
    for i in 0..10000 {
        let v = i as f64 * 0.000123;
        black_box(Half::from_f64(black_box(v)));
    }
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("test_decode_all", |b| b.iter(test_decode_all));
    c.bench_function("test_encode_sweep", |b| b.iter(test_encode_sweep));
    c.bench_function("test_encode_half_range", |b| {
        b.iter(test_encode_half_range)
    });
    c.bench_function("test_from_f64", |b| b.iter(test_from_f64));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
