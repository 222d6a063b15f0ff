//! Stochastic particle-collision percussion.
//!
//! Each model keeps a pool of shake energy that decays exponentially and, at
//! random per-sample intervals whose likelihood scales with the object count,
//! dumps a slice of that energy into a sound level. The sound level excites
//! white noise into a small bank of two-pole resonators tuned to the shell
//! or bead material, and a short difference tap at the output removes the
//! DC that the resonators accumulate.

mod bamboo;
mod cabasa;
mod guiro;
mod meta;
mod sekere;
mod tambourine;

pub use bamboo::Bamboo;
pub use cabasa::Cabasa;
pub use guiro::Guiro;
pub use meta::{MetaShaker, ShakerKind};
pub use sekere::Sekere;
pub use tambourine::Tambourine;

pub(crate) const MAX_SHAKE: f32 = 1.0;

/// One collision test: a draw over `0..=range` lands under the object count.
pub(crate) fn collision(rng: &mut oorandom::Rand32, range: u32, objects: f32) -> bool {
    (rng.rand_range(0..range + 1) as f32) < objects
}

/// Two-pole resonance with exposed output history, so the models can take
/// first-difference taps straight off the recursion.
pub(crate) struct Resonator {
    radius: f32,
    coeff_one: f32,
    coeff_two: f32,
    out_one: f32,
    out_two: f32,
}

impl Resonator {
    pub(crate) fn new(radius: f32) -> Self {
        Self {
            radius,
            coeff_one: 0.0,
            coeff_two: radius * radius,
            out_one: 0.0,
            out_two: 0.0,
        }
    }

    pub(crate) fn set_frequency(&mut self, frequency: f32, sample_rate: f32) {
        self.coeff_one =
            -self.radius * 2.0 * (frequency * std::f32::consts::TAU / sample_rate).cos();
    }

    pub(crate) fn next_sample(&mut self, input: f32) -> f32 {
        let out = input - self.out_one * self.coeff_one - self.out_two * self.coeff_two;
        self.out_two = self.out_one;
        self.out_one = out;
        out
    }

    /// Difference of the two most recent outputs.
    pub(crate) fn difference(&self) -> f32 {
        self.out_one - self.out_two
    }

    pub(crate) fn delayed(&self) -> f32 {
        self.out_two
    }

    pub(crate) fn reset(&mut self) {
        self.out_one = 0.0;
        self.out_two = 0.0;
    }
}

/// Three-sample output history for the wider difference taps.
#[derive(Default)]
pub(crate) struct HistoryTap {
    z: [f32; 3],
}

impl HistoryTap {
    pub(crate) fn push(&mut self, sample: f32) {
        self.z[2] = self.z[1];
        self.z[1] = self.z[0];
        self.z[0] = sample;
    }

    pub(crate) fn get(&self, index: usize) -> f32 {
        self.z[index]
    }

    pub(crate) fn reset(&mut self) {
        self.z = [0.0; 3];
    }
}
