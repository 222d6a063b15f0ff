use oorandom::Rand32;

use crate::dsp::noise::Noise;
use crate::instruments::{Control, Instrument};

use super::{collision, Resonator, MAX_SHAKE};

const SOUND_DECAY: f32 = 0.95;
const SYSTEM_DECAY: f32 = 0.99995;
const NUM_TUBES: f32 = 5.0;
const BASE_FREQUENCY: f32 = 2800.0;
const RADIUS: f32 = 0.995;

/// Bamboo wind chimes: a few hollow tubes knocking together.
///
/// Three resonators cover the fundamental and its detuned neighbors, and
/// every collision retunes them with the spread and randomness settings, so
/// no two knocks ring quite alike.
pub struct Bamboo {
    sample_rate: f32,
    rng: Rand32,
    noise: Noise,
    resonators: [Resonator; 3],

    num_objects: f32,
    gain: f32,
    system_decay: f32,
    shake_energy: f32,
    sound_level: f32,
    res_frequency: f32,
    res_spread: f32,
    res_random: f32,
}

impl Bamboo {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let mut bamboo = Self {
            sample_rate,
            rng: Rand32::new(seed),
            noise: Noise::new(seed.wrapping_add(1)),
            resonators: [
                Resonator::new(RADIUS),
                Resonator::new(RADIUS),
                Resonator::new(RADIUS),
            ],
            num_objects: NUM_TUBES,
            gain: 4.0 / NUM_TUBES,
            system_decay: SYSTEM_DECAY,
            shake_energy: 0.0,
            sound_level: 0.0,
            res_frequency: BASE_FREQUENCY,
            res_spread: 0.0,
            res_random: 0.0,
        };
        bamboo.resonators[0].set_frequency(BASE_FREQUENCY, sample_rate);
        bamboo.resonators[1].set_frequency(BASE_FREQUENCY * 0.8, sample_rate);
        bamboo.resonators[2].set_frequency(BASE_FREQUENCY * 1.2, sample_rate);
        bamboo
    }

    fn set_num_objects(&mut self, objects: f32) {
        self.num_objects = objects.max(1.0);
        self.gain = self.num_objects.ln() * 30.0 / self.num_objects;
    }

    fn add_energy(&mut self, amount: f32) {
        self.shake_energy = (self.shake_energy + amount * MAX_SHAKE * 0.1).min(MAX_SHAKE);
    }

    fn retune(&mut self) {
        let f = self.res_frequency;
        let jitter = self.res_random * self.noise.next_sample();
        self.resonators[0].set_frequency(f * (1.0 + jitter), self.sample_rate);
        let jitter = self.res_random * self.noise.next_sample();
        self.resonators[1].set_frequency(
            f * (1.0 - self.res_spread + jitter),
            self.sample_rate,
        );
        let jitter = 2.0 * self.res_random * self.noise.next_sample();
        self.resonators[2].set_frequency(
            f * (1.0 + 2.0 * self.res_spread + jitter),
            self.sample_rate,
        );
    }
}

impl Instrument for Bamboo {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::ShakeObjects => self.set_num_objects(value),
            Control::ShakeDamping => self.system_decay = 0.998 + value * 0.002,
            Control::ShakeEnergy => self.add_energy(value),
            Control::ResonanceFrequency => self.res_frequency = value,
            Control::ResonanceSpread => self.res_spread = value,
            Control::ResonanceRandomness => self.res_random = value,
            _ => {}
        }
    }

    fn trigger(&mut self) {
        self.add_energy(0.9);
    }

    fn next_sample(&mut self) -> f32 {
        self.shake_energy *= self.system_decay;
        if collision(&mut self.rng, 4096, self.num_objects) {
            self.sound_level += self.gain * self.shake_energy;
            self.retune();
        }
        let input = self.sound_level * self.noise.next_sample();
        self.sound_level *= SOUND_DECAY;

        self.resonators
            .iter_mut()
            .map(|r| r.next_sample(input))
            .sum()
    }

    fn reset(&mut self) {
        self.shake_energy = 0.0;
        self.sound_level = 0.0;
        for resonator in &mut self.resonators {
            resonator.reset();
        }
    }
}
