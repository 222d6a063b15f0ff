use oorandom::Rand32;

use crate::dsp::noise::Noise;
use crate::instruments::{Control, Instrument};

use super::{collision, HistoryTap, Resonator, MAX_SHAKE};

const SOUND_DECAY: f32 = 0.96;
const SYSTEM_DECAY: f32 = 0.999;
const NUM_BEANS: f32 = 64.0;
const BASE_FREQUENCY: f32 = 5500.0;
const RADIUS: f32 = 0.6;

/// Sekere: a bead net over a large gourd. Fewer, heavier collisions than
/// the cabasa, a looser resonance, and a two-sample difference tap.
pub struct Sekere {
    sample_rate: f32,
    rng: Rand32,
    noise: Noise,
    resonator: Resonator,
    final_z: HistoryTap,

    num_objects: f32,
    gain: f32,
    system_decay: f32,
    shake_energy: f32,
    sound_level: f32,
}

impl Sekere {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let mut resonator = Resonator::new(RADIUS);
        resonator.set_frequency(BASE_FREQUENCY, sample_rate);
        Self {
            sample_rate,
            rng: Rand32::new(seed),
            noise: Noise::new(seed.wrapping_add(1)),
            resonator,
            final_z: HistoryTap::default(),
            num_objects: NUM_BEANS,
            gain: NUM_BEANS.ln() / 4.0f32.ln() * 40.0 / NUM_BEANS,
            system_decay: SYSTEM_DECAY,
            shake_energy: 0.0,
            sound_level: 0.0,
        }
    }

    fn set_num_objects(&mut self, objects: f32) {
        self.num_objects = objects.max(1.0);
        self.gain = self.num_objects.ln() / 4.0f32.ln() * 40.0 / self.num_objects;
    }

    fn add_energy(&mut self, amount: f32) {
        self.shake_energy = (self.shake_energy + amount * MAX_SHAKE * 0.1).min(MAX_SHAKE);
    }
}

impl Instrument for Sekere {
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
        self.final_z.push(self.resonator.delayed());
        self.final_z.get(0) - self.final_z.get(2)
    }

    fn reset(&mut self) {
        self.shake_energy = 0.0;
        self.sound_level = 0.0;
        self.resonator.reset();
        self.final_z.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shake_sounds_and_decays() {
        let mut sekere = Sekere::new(44_100.0, 51);
        sekere.trigger();

        let mut early = vec![0.0f32; 8192];
        sekere.render(&mut early);
        assert!(early.iter().all(|s| s.is_finite()));
        let rms = |b: &[f32]| (b.iter().map(|s| s * s).sum::<f32>() / b.len() as f32).sqrt();
        assert!(rms(&early) > 1e-7);

        let mut late = vec![0.0f32; 8192];
        for _ in 0..100 {
            sekere.render(&mut late);
        }
        assert!(rms(&late) < rms(&early));
    }
}
