//! Benchmarks for the recursive filters used in every engine loop.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use physmod_dsp::dsp::filter::{BiQuad, DcBlocker, OnePole, OneZero};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        let mut one_pole = OnePole::new();
        one_pole.set_pole(0.6);
        group.bench_with_input(BenchmarkId::new("one_pole", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += one_pole.next_sample(black_box(sample));
                }
                sum
            })
        });

        let mut one_zero = OneZero::new();
        group.bench_with_input(BenchmarkId::new("one_zero", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += one_zero.next_sample(black_box(sample));
                }
                sum
            })
        });

        let mut biquad = BiQuad::new();
        biquad.set_freq_and_reson(1000.0, 0.99, 44_100.0);
        biquad.set_equal_gain_zeroes();
        group.bench_with_input(BenchmarkId::new("biquad", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += biquad.next_sample(black_box(sample));
                }
                sum
            })
        });

        let mut dc_blocker = DcBlocker::new();
        group.bench_with_input(BenchmarkId::new("dc_blocker", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += dc_blocker.next_sample(black_box(sample));
                }
                sum
            })
        });
    }

    group.finish();
}
