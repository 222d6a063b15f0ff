//! Benchmarks for complete instrument engines.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use physmod_dsp::instruments::{
    BowedBar, Control, Flute, Instrument, Mandolin, Marimba, MetaShaker, Plucked,
};

use crate::BLOCK_SIZES;

pub fn bench_instruments(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/instruments");
    let sample_rate = 44_100.0;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut flute = Flute::new(sample_rate, 1);
        flute.set_control(Control::BreathPressure, 0.6);
        group.bench_with_input(BenchmarkId::new("flute", size), &size, |b, _| {
            b.iter(|| flute.render(black_box(&mut buffer)))
        });

        let mut plucked = Plucked::new(sample_rate, 2);
        plucked.trigger();
        group.bench_with_input(BenchmarkId::new("plucked", size), &size, |b, _| {
            b.iter(|| plucked.render(black_box(&mut buffer)))
        });

        let mut mandolin = Mandolin::new(sample_rate, 3);
        mandolin.trigger();
        group.bench_with_input(BenchmarkId::new("mandolin", size), &size, |b, _| {
            b.iter(|| mandolin.render(black_box(&mut buffer)))
        });

        let mut marimba = Marimba::new(sample_rate, 4);
        marimba.trigger();
        group.bench_with_input(BenchmarkId::new("marimba", size), &size, |b, _| {
            b.iter(|| marimba.render(black_box(&mut buffer)))
        });

        let mut bar = BowedBar::new(sample_rate, 5);
        group.bench_with_input(BenchmarkId::new("bowed_bar", size), &size, |b, _| {
            b.iter(|| bar.render(black_box(&mut buffer)))
        });

        let mut shaker = MetaShaker::new(sample_rate, 6);
        shaker.trigger();
        group.bench_with_input(BenchmarkId::new("meta_shaker", size), &size, |b, _| {
            b.iter(|| shaker.render(black_box(&mut buffer)))
        });
    }

    group.finish();
}
