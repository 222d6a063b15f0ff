use oorandom::Rand32;

use crate::dsp::noise::Noise;
use crate::instruments::{Control, Instrument};

use super::{collision, HistoryTap, Resonator};

const SOUND_DECAY: f32 = 0.95;
const NUM_RATCHETS: f32 = 128.0;
const GOURD_FREQUENCY: f32 = 2500.0;
const GOURD_FREQUENCY_2: f32 = 4000.0;
const GOURD_RADIUS: f32 = 0.97;

/// Guiro: a stick scraped along the ribs of a notched gourd.
///
/// Instead of a decaying energy pool, a scrape progresses from zero to one
/// at the scrape velocity. A sawtooth ratchet rides the scrape and resets
/// each time it crosses a rib, gating both the collision energy and the
/// noise excitation, which is what turns the hiss into distinct clicks.
/// When the scrape completes the output goes silent until the next trigger.
pub struct Guiro {
    sample_rate: f32,
    rng: Rand32,
    noise: Noise,
    gourds: [Resonator; 2],
    final_z: HistoryTap,

    num_objects: f32,
    sound_level: f32,
    scrape: f32,
    scrape_velocity: f32,
    total_energy: f32,
    ratchet: f32,
    ratchet_delta: f32,
}

impl Guiro {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let mut gourds = [
            Resonator::new(GOURD_RADIUS),
            Resonator::new(GOURD_RADIUS),
        ];
        gourds[0].set_frequency(GOURD_FREQUENCY, sample_rate);
        gourds[1].set_frequency(GOURD_FREQUENCY_2, sample_rate);

        Self {
            sample_rate,
            rng: Rand32::new(seed),
            noise: Noise::new(seed.wrapping_add(1)),
            gourds,
            final_z: HistoryTap::default(),
            num_objects: NUM_RATCHETS,
            sound_level: 0.0,
            scrape: 0.0,
            scrape_velocity: 0.00015,
            total_energy: 0.0,
            ratchet: 0.0,
            ratchet_delta: 0.0005,
        }
    }

    fn tick(&mut self) -> f32 {
        if collision(&mut self.rng, 1024, self.num_objects) {
            self.sound_level += 512.0 * self.ratchet * self.total_energy;
        }
        let input = self.sound_level * self.noise.next_sample() * self.ratchet;
        self.sound_level *= SOUND_DECAY;

        self.gourds[0].next_sample(input);
        self.gourds[1].next_sample(input);

        self.final_z
            .push(self.gourds[0].delayed() + self.gourds[1].delayed());
        self.final_z.get(0) - self.final_z.get(2)
    }
}

impl Instrument for Guiro {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::ShakeObjects => self.num_objects = value.max(1.0),
            Control::ScrapeVelocity => self.scrape_velocity = value,
            Control::ShakeEnergy => self.scrape = value,
            Control::ResonanceFrequency => {
                self.gourds[0].set_frequency(value, self.sample_rate);
            }
            _ => {}
        }
    }

    fn trigger(&mut self) {
        self.scrape = 0.0;
    }

    fn next_sample(&mut self) -> f32 {
        if self.scrape >= 1.0 {
            return 0.0;
        }
        self.scrape += self.scrape_velocity;
        self.total_energy = self.scrape;
        self.ratchet -= self.ratchet_delta + 0.002 * self.total_energy;
        if self.ratchet < 0.0 {
            self.ratchet = 1.0;
        }
        self.tick()
    }

    fn reset(&mut self) {
        self.sound_level = 0.0;
        self.scrape = 1.0;
        self.total_energy = 0.0;
        self.ratchet = 0.0;
        for gourd in &mut self.gourds {
            gourd.reset();
        }
        self.final_z.reset();
    }
}
