use crate::dsp::delay::LinearDelay;
use crate::dsp::filter::OneZero;
use crate::dsp::noise::Noise;
use crate::dsp::table::ReedTable;
use crate::dsp::vibrato::Vibrato;
use crate::MIN_FREQUENCY;

use super::{Control, Instrument};

// A max pressure of 0.05 lands the mouth at 0.55, past the oscillation
// threshold of the default reed.
const BREATH_SCALE: f32 = 11.0;

/// Waveguide clarinet: a pressure-controlled reed on a half-wavelength bore.
///
/// A cylindrical closed-open bore resonates at odd harmonics, so the loop
/// delay is half the wavelength. The reed table converts the difference
/// between mouth pressure and the reflected bore pressure into a reflection
/// coefficient, and the one-zero filter supplies the loop loss. The reed
/// only speaks once `MaxPressure` pushes the loop past its stability
/// threshold; below that the bore settles to a quiet offset.
pub struct Clarinet {
    sample_rate: f32,
    bore: LinearDelay,
    reed: ReedTable,
    filter: OneZero,
    noise: Noise,
    vibrato: Vibrato,

    max_pressure: f32,
    noise_gain: f32,
    vibrato_gain: f32,
}

impl Clarinet {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let capacity = (sample_rate / MIN_FREQUENCY) as usize + 2;
        let mut vibrato = Vibrato::new(sample_rate);
        vibrato.set_frequency(5.925);

        let mut clarinet = Self {
            sample_rate,
            bore: LinearDelay::new(capacity),
            reed: ReedTable::new(),
            filter: OneZero::new(),
            noise: Noise::new(seed),
            vibrato,
            max_pressure: 0.05,
            noise_gain: 0.2,
            vibrato_gain: 0.1,
        };
        clarinet.set_frequency(440.0);
        clarinet.set_reed_stiffness(0.5);
        clarinet
    }

    /// Stiffness in [0, 1] maps linearly onto the reed table slope. Softer
    /// reeds close harder against the same pressure difference.
    pub fn set_reed_stiffness(&mut self, stiffness: f32) {
        self.reed.slope = -0.44 + 0.26 * stiffness;
    }

    /// Half-wavelength loop: at 440 Hz and 44.1 kHz the delay is about
    /// 48.6 samples, closing a ~100 sample pressure round trip.
    pub fn set_frequency(&mut self, frequency: f32) {
        let frequency = frequency.max(MIN_FREQUENCY);
        self.bore
            .set_delay((self.sample_rate / frequency) * 0.5 - 1.5);
    }
}

impl Instrument for Clarinet {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::Frequency => self.set_frequency(value),
            Control::ReedStiffness => self.set_reed_stiffness(value),
            Control::NoiseGain => self.noise_gain = value,
            Control::VibratoRate => self.vibrato.set_frequency(value),
            Control::VibratoAmount => self.vibrato_gain = value,
            Control::MaxPressure => self.max_pressure = value,
            _ => {}
        }
    }

    fn trigger(&mut self) {}

    fn next_sample(&mut self) -> f32 {
        let mouth = self.max_pressure * BREATH_SCALE;
        let mut breath = mouth + mouth * self.noise_gain * self.noise.next_sample();
        breath += breath * self.vibrato_gain * self.vibrato.next_sample();

        let mut pressure_diff = self.filter.next_sample(self.bore.last_output());
        pressure_diff = pressure_diff * -0.95 - breath;

        self.bore
            .next_sample(breath + pressure_diff * self.reed.lookup(pressure_diff))
    }

    fn reset(&mut self) {
        self.bore.reset();
        self.filter.reset();
        self.vibrato.reset();
    }
}
