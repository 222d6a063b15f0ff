use crate::dsp::delay::AllpassDelay;
use crate::dsp::filter::{OnePole, OneZero};
use crate::dsp::noise::Noise;
use crate::MIN_FREQUENCY;

use super::{Control, Instrument};

/// Karplus-Strong plucked string.
///
/// A noise burst shaped by a one-pole pick filter loads the string, then
/// recirculates through an averaging one-zero that rolls off highs a little
/// more each pass. The loop gain rises slightly with frequency so short
/// strings do not die faster than long ones.
pub struct Plucked {
    sample_rate: f32,
    string: AllpassDelay,
    loop_filter: OneZero,
    pick_filter: OnePole,
    noise: Noise,

    capacity: usize,
    loop_gain: f32,
    pluck_amplitude: f32,
}

impl Plucked {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let capacity = (sample_rate / MIN_FREQUENCY) as usize + 1;
        let mut plucked = Self {
            sample_rate,
            string: AllpassDelay::new(capacity),
            loop_filter: OneZero::new(),
            pick_filter: OnePole::new(),
            noise: Noise::new(seed),
            capacity,
            loop_gain: 0.999,
            pluck_amplitude: 0.3,
        };
        plucked.set_frequency(440.0);
        plucked
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        let frequency = frequency.max(MIN_FREQUENCY);
        self.string.set_delay((self.sample_rate / frequency) - 0.5);
        self.loop_gain = 0.995 + frequency * 0.000005;
        if self.loop_gain > 1.0 {
            self.loop_gain = 0.99999;
        }
    }

    /// Loads the string additively with filtered noise, on top of whatever
    /// is still ringing from the previous pluck.
    pub fn pluck(&mut self, amplitude: f32) {
        self.pick_filter.set_pole(0.999 - amplitude * 0.15);
        self.pick_filter.set_gain(amplitude * 0.5);
        for _ in 0..self.capacity {
            let noise = self.pick_filter.next_sample(self.noise.next_sample());
            self.string.next_sample(self.string.last_output() + noise);
        }
    }
}

impl Instrument for Plucked {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::Frequency => self.set_frequency(value),
            Control::Amplitude => self.pluck_amplitude = value,
            _ => {}
        }
    }

    fn trigger(&mut self) {
        self.pluck(self.pluck_amplitude);
    }

    fn next_sample(&mut self) -> f32 {
        let feedback = self
            .loop_filter
            .next_sample(self.string.last_output() * self.loop_gain);
        3.0 * self.string.next_sample(feedback)
    }

    fn reset(&mut self) {
        self.string.reset();
        self.loop_filter.reset();
        self.pick_filter.reset();
    }
}
