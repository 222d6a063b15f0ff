use crate::dsp::delay::{AllpassDelay, LinearDelay};
use crate::dsp::filter::OneZero;
use crate::dsp::sample::{noise_burst, SamplePlayer};
use crate::MIN_FREQUENCY;

use super::{Control, Instrument};

const STRING_CAPACITY: usize = 2048;
const BURST_LENGTH: usize = 721;
const NUM_BURSTS: usize = 12;

/// Commuted-synthesis mandolin: two detuned Karplus-Strong strings excited
/// by one of twelve stored pluck bursts.
///
/// Commuting the body response into the excitation keeps the per-sample cost
/// at two string loops. The comb delay notches the excitation at the pluck
/// point, and for one period after each pluck the loop gain drops to 0.7 so
/// the old note damps out under the new attack.
pub struct Mandolin {
    sample_rate: f32,
    strings: [AllpassDelay; 2],
    loop_filters: [OneZero; 2],
    comb: LinearDelay,
    bursts: Vec<SamplePlayer>,

    last_length: f32,
    loop_gain: f32,
    base_loop_gain: f32,
    detuning: f32,
    pluck_amplitude: f32,
    pluck_position: f32,
    microphone: usize,
    damp_time: i32,
}

impl Mandolin {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let bursts = (0..NUM_BURSTS)
            .map(|i| SamplePlayer::one_shot(noise_burst(BURST_LENGTH, seed + i as u64)))
            .collect();

        let mut mandolin = Self {
            sample_rate,
            strings: [
                AllpassDelay::new(STRING_CAPACITY),
                AllpassDelay::new(STRING_CAPACITY),
            ],
            loop_filters: [OneZero::new(), OneZero::new()],
            comb: LinearDelay::new(STRING_CAPACITY),
            bursts,
            last_length: 0.0,
            loop_gain: 0.999,
            base_loop_gain: 0.995,
            detuning: 0.995,
            pluck_amplitude: 0.3,
            pluck_position: 0.4,
            microphone: 0,
            damp_time: 0,
        };
        mandolin.set_frequency(440.0);
        mandolin
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        let frequency = frequency.max(MIN_FREQUENCY);
        self.last_length = self.sample_rate / frequency;
        if self.detuning != 0.0 {
            self.strings[0].set_delay(self.last_length / self.detuning - 0.5);
            self.strings[1].set_delay(self.last_length * self.detuning - 0.5);
        }
        self.loop_gain = self.base_loop_gain + frequency * 0.000005;
        if self.loop_gain > 1.0 {
            self.loop_gain = 0.99999;
        }
    }

    pub fn set_detune(&mut self, detuning: f32) {
        self.detuning = detuning;
        if self.detuning != 0.0 {
            self.strings[0].set_delay(self.last_length / self.detuning - 0.5);
            self.strings[1].set_delay(self.last_length * self.detuning - 0.5);
        }
    }

    /// Body size scales the excitation playback rate, shifting the commuted
    /// body resonances without touching the string tuning.
    pub fn set_body_size(&mut self, size: f32) {
        for burst in &mut self.bursts {
            burst.set_rate(size);
        }
    }

    pub fn pluck(&mut self) {
        self.bursts[self.microphone].restart();
        self.comb
            .set_delay(0.5 * self.pluck_position * self.last_length);
        self.damp_time = self.last_length as i32;
    }
}

impl Instrument for Mandolin {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::Frequency => self.set_frequency(value),
            Control::Amplitude => self.pluck_amplitude = value,
            Control::PluckPosition => self.pluck_position = value,
            Control::Detune => self.set_detune(value),
            Control::BaseLoopGain => self.base_loop_gain = value,
            Control::BodySize => self.set_body_size(value),
            Control::Microphone => {
                self.microphone = (value.max(0.0) as usize) % NUM_BURSTS;
            }
            _ => {}
        }
    }

    fn trigger(&mut self) {
        self.pluck();
    }

    fn next_sample(&mut self) -> f32 {
        self.bursts[self.microphone].next_sample();

        let mut temp = self.bursts[self.microphone].last_output() * self.pluck_amplitude;
        temp -= self.comb.next_sample(temp);

        let coefficient = if self.damp_time >= 0 {
            self.damp_time -= 1;
            0.7
        } else {
            self.loop_gain
        };

        let mut output = 0.0;
        for (string, filter) in self.strings.iter_mut().zip(self.loop_filters.iter_mut()) {
            let input = filter.next_sample(temp + string.last_output() * coefficient);
            output += string.next_sample(input);
        }
        output
    }

    fn reset(&mut self) {
        for string in &mut self.strings {
            string.reset();
        }
        for filter in &mut self.loop_filters {
            filter.reset();
        }
        self.comb.reset();
        self.damp_time = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rms(buffer: &[f32]) -> f32 {
        (buffer.iter().map(|s| s * s).sum::<f32>() / buffer.len() as f32).sqrt()
    }

    #[test]
    fn test_pluck_rings_and_decays() {
        let mut mandolin = Mandolin::new(44_100.0, 99);
        mandolin.set_control(Control::Frequency, 330.0);
        mandolin.trigger();

        let mut early = vec![0.0f32; 8192];
        mandolin.render(&mut early);
        assert!(early.iter().all(|s| s.is_finite()));
        assert!(rms(&early) > 1e-5, "pluck should be audible");

        let mut late = vec![0.0f32; 8192];
        for _ in 0..30 {
            mandolin.render(&mut late);
        }
        assert!(rms(&late) < rms(&early), "strings should decay");
    }

    #[test]
    fn test_microphone_selects_different_bursts() {
        let render_with_mic = |mic: f32| {
            let mut mandolin = Mandolin::new(44_100.0, 5);
            mandolin.set_control(Control::Microphone, mic);
            mandolin.trigger();
            let mut buffer = vec![0.0f32; 1024];
            mandolin.render(&mut buffer);
            buffer
        };
        assert_ne!(render_with_mic(0.0), render_with_mic(3.0));
    }

    #[test]
    fn test_zero_detune_keeps_old_tuning() {
        let mut mandolin = Mandolin::new(44_100.0, 5);
        mandolin.set_control(Control::Detune, 0.0);
        mandolin.set_control(Control::Frequency, 880.0);
        mandolin.trigger();
        let mut buffer = vec![0.0f32; 2048];
        mandolin.render(&mut buffer);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }
}
