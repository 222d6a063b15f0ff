//! Benchmarks for the three delay line variants.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use physmod_dsp::dsp::delay::{AllpassDelay, Delay, LinearDelay};

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        let mut integer = Delay::new(4096);
        integer.set_delay(100);
        group.bench_with_input(BenchmarkId::new("integer", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += integer.next_sample(black_box(sample));
                }
                sum
            })
        });

        let mut linear = LinearDelay::new(4096);
        linear.set_delay(100.37);
        group.bench_with_input(BenchmarkId::new("linear", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += linear.next_sample(black_box(sample));
                }
                sum
            })
        });

        let mut allpass = AllpassDelay::new(4096);
        allpass.set_delay(100.37);
        group.bench_with_input(BenchmarkId::new("allpass", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += allpass.next_sample(black_box(sample));
                }
                sum
            })
        });
    }

    group.finish();
}
