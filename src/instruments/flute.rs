use crate::dsp::delay::LinearDelay;
use crate::dsp::filter::{DcBlocker, OnePole};
use crate::dsp::noise::Noise;
use crate::dsp::table::jet_table;
use crate::dsp::vibrato::Vibrato;

use super::{Control, Instrument};

// Guard against zero-length delays when the frequency control goes silly.
const WATCHIT: f32 = 0.00001;

/// Waveguide flute: an air jet blowing across a resonant bore.
///
/// The bore is a linearly interpolated delay loop closed by a one-pole
/// reflection filter and a DC blocker. Breath pressure (plus noise and
/// vibrato turbulence) minus the reflected bore wave feeds a shorter jet
/// delay, whose output passes through the cubic jet nonlinearity back into
/// the bore. Sounds while `BreathPressure` is above zero.
pub struct Flute {
    sample_rate: f32,
    bore: LinearDelay,
    jet: LinearDelay,
    reflection: OnePole,
    dc_blocker: DcBlocker,
    noise: Noise,
    vibrato: Vibrato,

    breath_pressure: f32,
    jet_ratio: f32,
    noise_gain: f32,
    vibrato_amount: f32,
    end_reflection: f32,
    jet_reflection: f32,
    bore_delay: f32,
}

impl Flute {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let bore_capacity = (sample_rate / 50.0) as usize + 2;
        let mut reflection = OnePole::new();
        reflection.set_pole(0.7 - 0.1 * 22_050.0 / sample_rate);
        reflection.set_gain(-1.0);

        let mut vibrato = Vibrato::new(sample_rate);
        vibrato.set_frequency(5.925);

        let mut flute = Self {
            sample_rate,
            bore: LinearDelay::new(bore_capacity),
            jet: LinearDelay::new(bore_capacity),
            reflection,
            dc_blocker: DcBlocker::new(),
            noise: Noise::new(seed),
            vibrato,
            breath_pressure: 0.5,
            jet_ratio: 0.32,
            noise_gain: 0.15,
            vibrato_amount: 0.05,
            end_reflection: 0.5,
            jet_reflection: 0.5,
            bore_delay: 0.0,
        };
        flute.set_frequency(440.0);
        flute
    }

    /// The bore is tuned to two thirds of the requested wavelength; the
    /// other third of the loop lives in the jet and filter delays.
    pub fn set_frequency(&mut self, frequency: f32) {
        let last_freq = (frequency * 0.66666).max(WATCHIT);
        self.bore_delay = self.sample_rate / last_freq - 2.0;
        self.bore.set_delay(self.bore_delay);
        self.jet.set_delay(self.bore_delay * self.jet_ratio);
    }

    pub fn set_jet_ratio(&mut self, ratio: f32) {
        self.jet_ratio = ratio.clamp(0.0, 1.0);
        self.jet.set_delay(self.bore_delay * self.jet_ratio);
    }
}

impl Instrument for Flute {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::Frequency => self.set_frequency(value),
            Control::BreathPressure => self.breath_pressure = value,
            Control::JetRatio => self.set_jet_ratio(value),
            Control::NoiseGain => self.noise_gain = value,
            Control::VibratoRate => self.vibrato.set_frequency(value),
            Control::VibratoAmount => self.vibrato_amount = value,
            Control::EndReflection => self.end_reflection = value,
            Control::JetReflection => self.jet_reflection = value,
            _ => {}
        }
    }

    fn trigger(&mut self) {}

    fn next_sample(&mut self) -> f32 {
        let mut rand_pressure = self.noise_gain * self.noise.next_sample();
        rand_pressure += self.vibrato_amount * self.vibrato.next_sample();
        rand_pressure *= self.breath_pressure;

        let temp = self.reflection.next_sample(self.bore.last_output());
        let temp = self.dc_blocker.next_sample(temp);

        let mut pressure_diff =
            self.breath_pressure + rand_pressure - self.jet_reflection * temp;
        pressure_diff = self.jet.next_sample(pressure_diff);
        pressure_diff = jet_table(pressure_diff) + self.end_reflection * temp;

        self.bore.next_sample(pressure_diff)
    }

    fn reset(&mut self) {
        self.bore.reset();
        self.jet.reset();
        self.reflection.reset();
        self.dc_blocker.reset();
        self.vibrato.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flute_speaks_and_stays_finite() {
        let mut flute = Flute::new(44_100.0, 3);
        let mut buffer = [0.0f32; 44_100];
        flute.render(&mut buffer);
        assert!(buffer.iter().all(|s| s.is_finite()));
        let tail_peak = buffer[22_050..]
            .iter()
            .fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(tail_peak > 0.01, "flute should self-oscillate, peak {}", tail_peak);
    }

    #[test]
    fn test_flute_silent_with_no_breath() {
        let mut flute = Flute::new(44_100.0, 4);
        flute.set_control(Control::BreathPressure, 0.0);
        flute.reset();
        let mut buffer = [0.0f32; 1024];
        flute.render(&mut buffer);
        assert!(buffer.iter().all(|s| *s == 0.0), "no breath should mean silence");
    }

    #[test]
    fn test_frequency_change_is_immediate_and_safe() {
        let mut flute = Flute::new(48_000.0, 5);
        let mut buffer = [0.0f32; 512];
        for freq in [110.0, 440.0, 1760.0, 55.0] {
            flute.set_control(Control::Frequency, freq);
            flute.render(&mut buffer);
            assert!(buffer.iter().all(|s| s.is_finite()));
        }
    }
}
