use crate::dsp::delay::Delay;
use crate::dsp::filter::BiQuad;
use crate::dsp::noise::Noise;
use crate::dsp::table::BowTable;
use crate::MIN_FREQUENCY;

use super::{Control, Instrument};

const NUM_MODES: usize = 4;
const DELAY_CAPACITY: usize = 2408;
const LOOP_GAIN: f32 = 0.999;
const MODE_RATIOS: [f32; NUM_MODES] = [1.0, 2.756, 5.404, 8.933];
const MAX_FREQUENCY: f32 = 1568.0;

/// Banded waveguide bar, bowed or struck.
///
/// Each transverse mode of the bar gets its own band: an integer delay tuned
/// to the modal period plus a bandpass that keeps only that mode circulating.
/// The bow nonlinearity couples the bands, exciting them all from the
/// difference between bow velocity and the summed band velocities. High
/// modes vanish at high pitch, where their delays would collapse below a
/// few samples.
pub struct BowedBar {
    sample_rate: f32,
    delays: [Delay; NUM_MODES],
    bandpasses: [BiQuad; NUM_MODES],
    bow: BowTable,
    noise: Noise,

    frequency: f32,
    length: usize,
    active_modes: usize,
    mode_gains: [f32; NUM_MODES],
    bow_velocity: f32,
    strike_amplitude: f32,
    integration_constant: f32,
    velocity_input: f32,
}

impl BowedBar {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let mut bow = BowTable::new();
        bow.slope = 0.5;

        let mut bar = Self {
            sample_rate,
            delays: [
                Delay::new(DELAY_CAPACITY),
                Delay::new(DELAY_CAPACITY),
                Delay::new(DELAY_CAPACITY),
                Delay::new(DELAY_CAPACITY),
            ],
            bandpasses: [BiQuad::new(), BiQuad::new(), BiQuad::new(), BiQuad::new()],
            bow,
            noise: Noise::new(seed),
            frequency: 440.0,
            length: 0,
            active_modes: NUM_MODES,
            mode_gains: [0.0; NUM_MODES],
            bow_velocity: 0.5,
            strike_amplitude: 0.5,
            integration_constant: 0.0,
            velocity_input: 0.0,
        };
        bar.set_strike_position(0.15);
        bar.set_frequency(440.0);
        bar
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency.clamp(MIN_FREQUENCY, MAX_FREQUENCY);
        self.length = (self.sample_rate / self.frequency) as usize;

        self.active_modes = NUM_MODES;
        for (i, ratio) in MODE_RATIOS.iter().enumerate() {
            let delay = (self.length as f32 / ratio) as usize;
            if delay <= 4 {
                self.active_modes = i;
                break;
            }
            self.delays[i].set_delay(delay);
        }

        for delay in &mut self.delays {
            delay.reset();
        }
        self.tune_bandpasses();
        self.velocity_input = 0.0;
    }

    fn tune_bandpasses(&mut self) {
        for i in 0..NUM_MODES {
            let radius =
                1.0 - std::f32::consts::PI * self.frequency * MODE_RATIOS[i] / self.sample_rate;
            let filter = &mut self.bandpasses[i];
            filter.reset();
            filter.set_freq_and_reson(self.frequency * MODE_RATIOS[i], radius, self.sample_rate);
            filter.set_equal_gain_zeroes();
            filter.set_gain((1.0 - radius * radius) / 2.0);
        }
    }

    pub fn set_strike_position(&mut self, position: f32) {
        let t = position * std::f32::consts::PI;
        self.mode_gains = [
            (t / 2.0).sin().abs(),
            t.sin().abs() * 0.9,
            (1.5 * t).sin().abs() * 0.81,
            (2.0 * t).sin().abs() * 0.729,
        ];
    }

    /// Strike: loads every band with a triangular noise ramp one modal
    /// period long.
    pub fn pluck(&mut self, amplitude: f32) {
        if self.active_modes == 0 {
            return;
        }
        let pluck_length =
            (self.length as f32 / MODE_RATIOS[self.active_modes - 1]).max(2.0) as usize;
        let half = (pluck_length / 2).max(1);
        for j in (1..=half).chain((1..=half).rev()) {
            let ramp = amplitude * 2.0 * self.noise.next_sample() * j as f32 / pluck_length as f32;
            for i in 0..self.active_modes {
                self.delays[i].next_sample(ramp * self.mode_gains[i]);
            }
        }
    }
}

impl Instrument for BowedBar {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::Frequency => self.set_frequency(value),
            Control::BowPressure => self.bow.slope = value,
            Control::BowVelocity => self.bow_velocity = value,
            Control::StrikePosition | Control::BowPosition => self.set_strike_position(value),
            Control::IntegrationConstant => self.integration_constant = value,
            Control::Amplitude => self.strike_amplitude = value,
            _ => {}
        }
    }

    fn trigger(&mut self) {
        self.pluck(self.strike_amplitude);
    }

    fn next_sample(&mut self) -> f32 {
        if self.active_modes == 0 {
            return 0.0;
        }

        self.velocity_input = if self.integration_constant == 0.0 {
            0.0
        } else {
            self.integration_constant * self.velocity_input
        };
        for i in 0..self.active_modes {
            self.velocity_input += LOOP_GAIN * self.delays[i].last_output();
        }

        let mut input = self.bow_velocity - self.velocity_input;
        input = input * self.bow.lookup(input) / self.active_modes as f32;

        let mut data = 0.0;
        for i in 0..self.active_modes {
            self.bandpasses[i]
                .next_sample(input * self.mode_gains[i] + LOOP_GAIN * self.delays[i].last_output());
            self.delays[i].next_sample(self.bandpasses[i].last_output());
            data += self.bandpasses[i].last_output();
        }
        data * 4.0
    }

    fn reset(&mut self) {
        for delay in &mut self.delays {
            delay.reset();
        }
        for filter in &mut self.bandpasses {
            filter.reset();
        }
        self.velocity_input = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bowing_sustains() {
        let mut bar = BowedBar::new(44_100.0, 3);
        bar.set_control(Control::Frequency, 220.0);
        bar.set_control(Control::BowVelocity, 0.5);

        let mut buffer = vec![0.0f32; 44_100];
        bar.render(&mut buffer);
        assert!(buffer.iter().all(|s| s.is_finite()));

        let rms = |b: &[f32]| (b.iter().map(|s| s * s).sum::<f32>() / b.len() as f32).sqrt();
        assert!(
            rms(&buffer[22_050..]) > 1e-5,
            "bow should keep the bar ringing"
        );
    }

    #[test]
    fn test_strike_rings_then_decays() {
        let mut bar = BowedBar::new(44_100.0, 4);
        bar.set_control(Control::BowVelocity, 0.0);
        bar.trigger();

        let mut early = vec![0.0f32; 8192];
        bar.render(&mut early);
        let rms = |b: &[f32]| (b.iter().map(|s| s * s).sum::<f32>() / b.len() as f32).sqrt();
        assert!(rms(&early) > 1e-6, "strike should be audible");

        let mut late = vec![0.0f32; 8192];
        for _ in 0..40 {
            bar.render(&mut late);
        }
        assert!(rms(&late) < rms(&early), "struck bar should decay");
    }

    #[test]
    fn test_high_pitch_drops_modes() {
        let mut bar = BowedBar::new(44_100.0, 5);
        bar.set_control(Control::Frequency, 1500.0);
        assert!(bar.active_modes < NUM_MODES);
        let mut buffer = vec![0.0f32; 4096];
        bar.render(&mut buffer);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }
}
