use crate::dsp::delay::AllpassDelay;
use crate::dsp::filter::{BiQuad, DcBlocker};
use crate::dsp::vibrato::Vibrato;
use crate::MIN_FREQUENCY;

use super::{Control, Instrument};

// A max pressure of 0.05 puts the mouth at 0.55, enough to latch the lip
// into its buzzing regime.
const BREATH_SCALE: f32 = 11.0;

/// The lip is a second order resonance driven by the pressure difference
/// across it. Squaring the filter output and clamping to one gives a
/// transmission coefficient that mixes mouth pressure into the bore.
struct LipFilter {
    filter: BiQuad,
}

impl LipFilter {
    fn new() -> Self {
        let mut filter = BiQuad::new();
        filter.set_equal_gain_zeroes();
        filter.set_gain(0.3);
        Self { filter }
    }

    fn set_frequency(&mut self, frequency: f32, sample_rate: f32) {
        self.filter.set_freq_and_reson(frequency, 0.997, sample_rate);
    }

    fn next_sample(&mut self, mouth_pressure: f32, bore_pressure: f32) -> f32 {
        let mut temp = self.filter.next_sample(mouth_pressure - bore_pressure);
        temp *= temp;
        if temp > 1.0 {
            temp = 1.0;
        }
        temp * mouth_pressure + (1.0 - temp) * bore_pressure
    }

    fn reset(&mut self) {
        self.filter.reset();
    }
}

/// Waveguide brass instrument: a lip resonance coupled to a slide bore.
///
/// Pitch comes from the interplay of two tunings. The slide sets the bore
/// round trip while `LipTension` scales the lip resonance away from the
/// played frequency, so a tension near 0.5 locks onto the fundamental and
/// other values favor different bore modes, much like overblowing.
pub struct Brass {
    sample_rate: f32,
    bore: AllpassDelay,
    lip: LipFilter,
    dc_blocker: DcBlocker,
    vibrato: Vibrato,

    lip_target: f32,
    slide_target: f32,
    lip_tension: f32,
    slide_target_mult: f32,
    vibrato_gain: f32,
    max_pressure: f32,
}

impl Brass {
    pub fn new(sample_rate: f32, _seed: u64) -> Self {
        let capacity = (sample_rate / 2.0) as usize;
        let mut vibrato = Vibrato::new(sample_rate);
        vibrato.set_frequency(5.925);

        let mut brass = Self {
            sample_rate,
            bore: AllpassDelay::new(capacity),
            lip: LipFilter::new(),
            dc_blocker: DcBlocker::new(),
            vibrato,
            lip_target: 440.0,
            slide_target: 100.0,
            lip_tension: 0.5,
            slide_target_mult: 0.5,
            vibrato_gain: 0.5,
            max_pressure: 0.05,
        };
        brass.set_frequency(440.0);
        brass
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        let frequency = frequency.max(MIN_FREQUENCY);
        self.slide_target = (self.sample_rate / frequency) * 2.0 + 3.0;
        self.lip_target = frequency;
        self.retune();
    }

    fn retune(&mut self) {
        self.lip
            .set_frequency(self.lip_target * self.lip_tension, self.sample_rate);
        self.bore
            .set_delay(self.slide_target * self.slide_target_mult);
    }
}

impl Instrument for Brass {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::Frequency => self.set_frequency(value),
            Control::LipTension => {
                self.lip_tension = value;
                self.retune();
            }
            Control::SlidePosition => {
                self.slide_target_mult = value;
                self.retune();
            }
            Control::VibratoRate => self.vibrato.set_frequency(value),
            Control::VibratoAmount => self.vibrato_gain = value,
            Control::MaxPressure => self.max_pressure = value,
            _ => {}
        }
    }

    fn trigger(&mut self) {}

    fn next_sample(&mut self) -> f32 {
        let breath =
            self.max_pressure * BREATH_SCALE + self.vibrato_gain * self.vibrato.next_sample();
        let temp = self
            .lip
            .next_sample(0.3 * breath, 0.85 * self.bore.last_output());
        self.bore.next_sample(self.dc_blocker.next_sample(temp))
    }

    fn reset(&mut self) {
        self.bore.reset();
        self.lip.reset();
        self.dc_blocker.reset();
        self.vibrato.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brass_speaks_and_stays_finite() {
        let mut brass = Brass::new(44_100.0, 0);
        brass.set_control(Control::Frequency, 220.0);
        brass.set_control(Control::MaxPressure, 0.05);

        let mut buffer = [0.0f32; 44_100];
        brass.render(&mut buffer);

        assert!(buffer.iter().all(|s| s.is_finite()));
        let tail_peak = buffer[22_050..]
            .iter()
            .fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(tail_peak > 0.01, "lip should buzz, tail peak {}", tail_peak);
    }

    #[test]
    fn test_brass_lip_tension_sweep_is_safe() {
        let mut brass = Brass::new(44_100.0, 0);
        brass.set_control(Control::MaxPressure, 0.05);
        let mut buffer = [0.0f32; 1024];
        for step in 0..10 {
            brass.set_control(Control::LipTension, 0.1 + 0.08 * step as f32);
            brass.render(&mut buffer);
            assert!(buffer.iter().all(|s| s.is_finite()));
        }
    }
}
