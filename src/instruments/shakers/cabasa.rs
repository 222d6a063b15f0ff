use oorandom::Rand32;

use crate::dsp::noise::Noise;
use crate::instruments::{Control, Instrument};

use super::{collision, Resonator, MAX_SHAKE};

const SOUND_DECAY: f32 = 0.95;
const SYSTEM_DECAY: f32 = 0.997;
const NUM_BEADS: f32 = 512.0;
const BASE_FREQUENCY: f32 = 3000.0;
const RADIUS: f32 = 0.7;

/// Cabasa: hundreds of steel beads scraped over a ribbed cylinder. Dense
/// collisions against a single broad gourd resonance, differentiated at the
/// output for the characteristic hiss.
pub struct Cabasa {
    sample_rate: f32,
    rng: Rand32,
    noise: Noise,
    resonator: Resonator,

    num_objects: f32,
    gain: f32,
    system_decay: f32,
    shake_energy: f32,
    sound_level: f32,
}

impl Cabasa {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let mut resonator = Resonator::new(RADIUS);
        resonator.set_frequency(BASE_FREQUENCY, sample_rate);
        Self {
            sample_rate,
            rng: Rand32::new(seed),
            noise: Noise::new(seed.wrapping_add(1)),
            resonator,
            num_objects: NUM_BEADS,
            gain: NUM_BEADS.ln() / 4.0f32.ln() * 120.0 / NUM_BEADS,
            system_decay: SYSTEM_DECAY,
            shake_energy: 0.0,
            sound_level: 0.0,
        }
    }

    fn set_num_objects(&mut self, objects: f32) {
        self.num_objects = objects.max(1.0);
        self.gain = self.num_objects.ln() / 4.0f32.ln() * 120.0 / self.num_objects;
    }

    fn add_energy(&mut self, amount: f32) {
        self.shake_energy = (self.shake_energy + amount * MAX_SHAKE * 0.1).min(MAX_SHAKE);
    }
}

impl Instrument for Cabasa {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::ShakeObjects => self.set_num_objects(value),
            Control::ShakeDamping => self.system_decay = 0.998 + value * 0.002,
            Control::ShakeEnergy => self.add_energy(value),
            Control::ResonanceFrequency => {
                self.resonator.set_frequency(value, self.sample_rate);
            }
            _ => {}
        }
    }

    fn trigger(&mut self) {
        self.add_energy(0.9);
    }

    fn next_sample(&mut self) -> f32 {
        self.shake_energy *= self.system_decay;
        if collision(&mut self.rng, 1024, self.num_objects) {
            self.sound_level += self.gain * self.shake_energy;
        }
        let input = self.sound_level * self.noise.next_sample();
        self.sound_level *= SOUND_DECAY;

        self.resonator.next_sample(input);
        self.resonator.difference()
    }

    fn reset(&mut self) {
        self.shake_energy = 0.0;
        self.sound_level = 0.0;
        self.resonator.reset();
    }
}
