use oorandom::Rand32;

use crate::dsp::noise::Noise;
use crate::instruments::{Control, Instrument};

use super::{collision, HistoryTap, Resonator, MAX_SHAKE};

const SOUND_DECAY: f32 = 0.95;
const SYSTEM_DECAY: f32 = 0.9985;
const NUM_TIMBRELS: f32 = 32.0;
const SHELL_FREQUENCY: f32 = 2300.0;
const SHELL_GAIN: f32 = 0.1;
const SHELL_RADIUS: f32 = 0.96;
const CYMBAL_FREQUENCY_1: f32 = 5600.0;
const CYMBAL_FREQUENCY_2: f32 = 8100.0;
const CYMBAL_RADIUS: f32 = 0.99;

/// Tambourine: a wooden shell with pairs of jingling cymbals.
///
/// The shell resonance is fixed, while the two cymbal resonances jump
/// around their centers by five percent at every collision, which is what
/// smears the jingle into a shimmer rather than a pitched ring.
pub struct Tambourine {
    sample_rate: f32,
    rng: Rand32,
    noise: Noise,
    shell: Resonator,
    cymbals: [Resonator; 2],
    final_z: HistoryTap,

    num_objects: f32,
    gain: f32,
    system_decay: f32,
    shake_energy: f32,
    sound_level: f32,
    cymbal_frequencies: [f32; 2],
}

impl Tambourine {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let mut shell = Resonator::new(SHELL_RADIUS);
        shell.set_frequency(SHELL_FREQUENCY, sample_rate);
        let mut cymbals = [
            Resonator::new(CYMBAL_RADIUS),
            Resonator::new(CYMBAL_RADIUS),
        ];
        cymbals[0].set_frequency(CYMBAL_FREQUENCY_1, sample_rate);
        cymbals[1].set_frequency(CYMBAL_FREQUENCY_2, sample_rate);

        Self {
            sample_rate,
            rng: Rand32::new(seed),
            noise: Noise::new(seed.wrapping_add(1)),
            shell,
            cymbals,
            final_z: HistoryTap::default(),
            num_objects: NUM_TIMBRELS,
            gain: 24.0 / NUM_TIMBRELS,
            system_decay: SYSTEM_DECAY,
            shake_energy: 0.0,
            sound_level: 0.0,
            cymbal_frequencies: [CYMBAL_FREQUENCY_1, CYMBAL_FREQUENCY_2],
        }
    }

    fn set_num_objects(&mut self, objects: f32) {
        self.num_objects = objects.max(1.0);
        self.gain = 24.0 / self.num_objects;
    }

    fn add_energy(&mut self, amount: f32) {
        self.shake_energy = (self.shake_energy + amount * MAX_SHAKE * 0.1).min(MAX_SHAKE);
    }
}

impl Instrument for Tambourine {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::ShakeObjects => self.set_num_objects(value),
            Control::ShakeDamping => self.system_decay = 0.998 + value * 0.002,
            Control::ShakeEnergy => self.add_energy(value),
            Control::ResonanceFrequency => {
                self.shell.set_frequency(value, self.sample_rate);
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
            for (cymbal, center) in self.cymbals.iter_mut().zip(self.cymbal_frequencies) {
                let jitter = self.noise.next_sample() * center * 0.05;
                cymbal.set_frequency(center + jitter, self.sample_rate);
            }
        }
        let input = self.sound_level * self.noise.next_sample();
        self.sound_level *= SOUND_DECAY;

        let mut data = self.shell.next_sample(input * SHELL_GAIN);
        data += self.cymbals[0].next_sample(input * 0.8);
        data += self.cymbals[1].next_sample(input);

        self.final_z.push(data);
        self.final_z.get(2) - self.final_z.get(0)
    }

    fn reset(&mut self) {
        self.shake_energy = 0.0;
        self.sound_level = 0.0;
        self.shell.reset();
        for cymbal in &mut self.cymbals {
            cymbal.reset();
        }
        self.final_z.reset();
    }
}
