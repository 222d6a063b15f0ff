//! Low-level DSP primitives used by the instrument engines.
//!
//! These components are allocation-free after construction and realtime-safe,
//! making them safe to embed directly inside instrument structs. They
//! intentionally stay focused on the signal-processing math so the engines
//! can layer on excitation logic and control handling.

/// Delay lines with integer, linear, and allpass interpolated taps.
pub mod delay;
/// One-pole, one-zero, two-pole, and DC-blocking filters.
pub mod filter;
/// Seedable uniform white noise.
pub mod noise;
/// Excitation sample playback.
pub mod sample;
/// Nonlinear lookup tables for jets, reeds, and bows.
pub mod table;
/// Wavetable sine LFO for vibrato.
pub mod vibrato;
