//! Real-world scenario benchmarks.
//!
//! One block of each instrument family, measuring the full per-sample loop
//! including the stochastic shaker collisions.

mod instruments;

pub use instruments::bench_instruments;
