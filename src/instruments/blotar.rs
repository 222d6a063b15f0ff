use crate::dsp::delay::LinearDelay;
use crate::dsp::filter::{DcBlocker, OnePole, OneZero};
use crate::dsp::noise::Noise;
use crate::dsp::sample::{noise_burst, SamplePlayer};
use crate::dsp::table::jet_table;
use crate::dsp::vibrato::Vibrato;
use crate::MIN_FREQUENCY;

use super::{Control, Instrument};

const WATCHIT: f32 = 0.00001;
const BORE_CAPACITY: usize = 2048;
// Longer than the bore, for long feedback loops.
const JET_CAPACITY: usize = 4096;
const BURST_LENGTH: usize = 721;
const NUM_BURSTS: usize = 12;

/// Hybrid of a flute bore and a plucked string, after Dan Trueman's
/// electric-guitar-meets-flute experiment.
///
/// A pluck burst feeds the flute bore through the comb filter, while the
/// jet nonlinearity distorts whatever circulates. `FilterRatio` crossfades
/// the loop loss between the flute one-pole and a string style one-zero,
/// and the jet delay is tuned directly rather than as a bore fraction, so
/// feedback pitches can sit anywhere.
pub struct Blotar {
    sample_rate: f32,
    bore: LinearDelay,
    jet: LinearDelay,
    comb: LinearDelay,
    reflection: OnePole,
    lowpass: OneZero,
    dc_blocker: DcBlocker,
    noise: Noise,
    vibrato: Vibrato,
    bursts: Vec<SamplePlayer>,

    last_length: f32,
    breath_pressure: f32,
    noise_gain: f32,
    vibrato_gain: f32,
    jet_reflection: f32,
    end_reflection: f32,
    filter_ratio: f32,
    pluck_amplitude: f32,
    pluck_position: f32,
    microphone: usize,
}

impl Blotar {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let bursts = (0..NUM_BURSTS)
            .map(|i| SamplePlayer::one_shot(noise_burst(BURST_LENGTH, seed + i as u64)))
            .collect();

        let mut reflection = OnePole::new();
        reflection.set_pole(0.7 - 0.1 * 22050.0 / sample_rate);
        reflection.set_gain(-1.0);

        let mut vibrato = Vibrato::new(sample_rate);
        vibrato.set_frequency(5.0);

        let mut blotar = Self {
            sample_rate,
            bore: LinearDelay::new(BORE_CAPACITY),
            jet: LinearDelay::new(JET_CAPACITY),
            comb: LinearDelay::new(BORE_CAPACITY),
            reflection,
            lowpass: OneZero::new(),
            dc_blocker: DcBlocker::new(),
            noise: Noise::new(seed),
            vibrato,
            bursts,
            last_length: 0.0,
            breath_pressure: 0.0,
            noise_gain: 0.0,
            vibrato_gain: 0.0,
            jet_reflection: 0.5,
            end_reflection: 0.5,
            filter_ratio: 1.0,
            pluck_amplitude: 0.3,
            pluck_position: 0.4,
            microphone: 0,
        };
        blotar.set_frequency(440.0);
        blotar.jet.set_delay(49.0);
        blotar
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        let frequency = frequency.max(MIN_FREQUENCY);
        self.last_length = self.sample_rate / frequency;
        let sounding = (frequency * 0.66666).max(WATCHIT);
        self.bore.set_delay(self.sample_rate / sounding - 2.0);
    }

    // Jet length is tuned directly, not as a function of the bore.
    pub fn set_jet_frequency(&mut self, frequency: f32) {
        let frequency = frequency.max(WATCHIT);
        self.jet.set_delay(self.sample_rate / frequency - 2.0);
    }

    pub fn set_body_size(&mut self, size: f32) {
        for burst in &mut self.bursts {
            burst.set_rate(size);
        }
    }

    pub fn pluck(&mut self) {
        self.bursts[self.microphone].restart();
        self.comb
            .set_delay(0.5 * self.pluck_position * self.last_length);
    }
}

impl Instrument for Blotar {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::Frequency => self.set_frequency(value),
            Control::JetDelay => self.set_jet_frequency(value),
            Control::BreathPressure => self.breath_pressure = value,
            Control::NoiseGain => self.noise_gain = value,
            Control::VibratoRate => self.vibrato.set_frequency(value),
            Control::VibratoAmount => self.vibrato_gain = value,
            Control::JetReflection => self.jet_reflection = value,
            Control::EndReflection => self.end_reflection = value,
            Control::FilterRatio => self.filter_ratio = value,
            Control::Amplitude => self.pluck_amplitude = value,
            Control::PluckPosition => self.pluck_position = value,
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
        let rand_pressure = (self.noise_gain * self.noise.next_sample()
            + self.vibrato_gain * self.vibrato.next_sample())
            * self.breath_pressure;

        self.bursts[self.microphone].next_sample();
        let mut temp = self.bursts[self.microphone].last_output() * self.pluck_amplitude;
        temp -= self.comb.next_sample(temp);

        let saved = temp;
        let flute_path = self.reflection.next_sample(self.bore.last_output() + temp);
        let string_path = self.lowpass.next_sample(self.bore.last_output() + saved);
        temp = self.filter_ratio * flute_path + (1.0 - self.filter_ratio) * string_path;
        temp = self.dc_blocker.next_sample(temp);

        let mut pressure_diff =
            self.breath_pressure + rand_pressure - self.jet_reflection * temp;
        pressure_diff = self.jet.next_sample(pressure_diff);
        pressure_diff = jet_table(pressure_diff + self.end_reflection * temp);

        self.bore.next_sample(pressure_diff)
    }

    fn reset(&mut self) {
        self.bore.reset();
        self.jet.reset();
        self.comb.reset();
        self.reflection.reset();
        self.lowpass.reset();
        self.dc_blocker.reset();
        self.vibrato.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluck_excites_the_bore() {
        let mut blotar = Blotar::new(44_100.0, 21);
        blotar.trigger();

        let mut buffer = vec![0.0f32; 22_050];
        blotar.render(&mut buffer);
        assert!(buffer.iter().all(|s| s.is_finite()));
        assert!(
            buffer.iter().any(|s| s.abs() > 1e-5),
            "pluck should produce output"
        );
    }

    #[test]
    fn test_breath_feedback_stays_bounded() {
        let mut blotar = Blotar::new(44_100.0, 22);
        blotar.set_control(Control::BreathPressure, 0.5);
        blotar.set_control(Control::NoiseGain, 0.15);
        blotar.set_control(Control::JetReflection, 0.5);
        blotar.set_control(Control::EndReflection, 0.5);
        blotar.set_control(Control::JetDelay, 180.0);

        let mut buffer = vec![0.0f32; 44_100];
        blotar.render(&mut buffer);
        assert!(buffer.iter().all(|s| s.is_finite() && s.abs() < 100.0));
    }

    #[test]
    fn test_filter_ratio_changes_voicing() {
        let render_with_ratio = |ratio: f32| {
            let mut blotar = Blotar::new(44_100.0, 8);
            blotar.set_control(Control::FilterRatio, ratio);
            blotar.trigger();
            let mut buffer = vec![0.0f32; 4096];
            blotar.render(&mut buffer);
            buffer
        };
        assert_ne!(render_with_ratio(1.0), render_with_ratio(0.0));
    }
}
