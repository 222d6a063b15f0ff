use oorandom::Rand32;

use crate::dsp::sample::noise_burst;

use super::modal::Modal4;
use super::{Control, Instrument};

/// Struck rosewood bar over a resonator tube.
///
/// Mode ratios 3.99 and 10.65 are the classic deep-arch marimba tuning; the
/// fourth mode is a broadband strike component that folds down from 2443 Hz.
/// Hard strikes occasionally double, like a mallet bouncing off the bar.
pub struct Marimba {
    modal: Modal4,
    rng: Rand32,
    multi_strike: u32,
    amplitude: f32,
}

impl Marimba {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let mut modal = Modal4::new(sample_rate, noise_burst(256, seed));
        modal.set_ratio_and_reson(0, 1.0, 0.9996);
        modal.set_ratio_and_reson(1, 3.99, 0.9994);
        modal.set_ratio_and_reson(2, 10.65, 0.9994);
        modal.set_ratio_and_reson(3, 2443.0, 0.999);
        modal.set_filter_gain(0, 0.04);
        modal.set_filter_gain(1, 0.01);
        modal.set_filter_gain(2, 0.01);
        modal.set_filter_gain(3, 0.008);
        modal.set_direct_gain(0.1);
        modal.set_frequency(440.0);

        let mut marimba = Self {
            modal,
            rng: Rand32::new(seed),
            multi_strike: 0,
            amplitude: 0.8,
        };
        marimba.set_stick_hardness(0.5);
        marimba.set_strike_position(0.5);
        marimba
    }

    pub fn set_stick_hardness(&mut self, hardness: f32) {
        self.modal.set_rate(0.25 * 4.0f32.powf(hardness));
        self.modal.set_master_gain(0.1 + 1.8 * hardness);
    }

    pub fn set_strike_position(&mut self, position: f32) {
        use std::f32::consts::PI;
        self.modal.set_filter_gain(0, 0.12 * (position * PI).sin());
        self.modal
            .set_filter_gain(1, -0.03 * (0.05 + 3.9 * position * PI).sin());
        self.modal
            .set_filter_gain(2, 0.11 * (-0.05 + 11.0 * position * PI).sin());
    }
}

impl Instrument for Marimba {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::Frequency => self.modal.set_frequency(value),
            Control::Amplitude => self.amplitude = value,
            Control::StickHardness => self.set_stick_hardness(value),
            Control::StrikePosition => self.set_strike_position(value),
            Control::VibratoRate => self.modal.set_vibrato_frequency(value),
            Control::VibratoAmount => self.modal.set_vibrato_gain(value),
            _ => {}
        }
    }

    fn trigger(&mut self) {
        // Roughly one strike in sixteen bounces once.
        self.multi_strike = if self.rng.rand_range(0..32) < 2 { 1 } else { 0 };
        self.modal.strike(self.amplitude);
    }

    fn next_sample(&mut self) -> f32 {
        if self.multi_strike > 0 && self.modal.wave_finished() {
            self.modal.restart_wave();
            self.multi_strike -= 1;
        }
        self.modal.next_sample()
    }

    fn reset(&mut self) {
        self.multi_strike = 0;
        self.modal.reset();
    }
}

/// Struck aluminum bar. Long resonances, no direct strike sound, and an
/// amplitude vibrato standing in for the rotating fans.
pub struct Vibraphone {
    modal: Modal4,
    amplitude: f32,
}

impl Vibraphone {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let mut modal = Modal4::new(sample_rate, noise_burst(256, seed));
        modal.set_ratio_and_reson(0, 1.0, 0.99995);
        modal.set_ratio_and_reson(1, 2.01, 0.99991);
        modal.set_ratio_and_reson(2, 3.9, 0.99992);
        modal.set_ratio_and_reson(3, 14.37, 0.9999);
        modal.set_filter_gain(0, 0.025);
        modal.set_filter_gain(1, 0.015);
        modal.set_filter_gain(2, 0.015);
        modal.set_filter_gain(3, 0.015);
        modal.set_direct_gain(0.0);
        modal.set_vibrato_frequency(4.0);
        modal.set_frequency(440.0);

        let mut vibraphone = Self {
            modal,
            amplitude: 0.8,
        };
        vibraphone.set_stick_hardness(0.5);
        vibraphone.set_strike_position(0.5);
        vibraphone
    }

    pub fn set_stick_hardness(&mut self, hardness: f32) {
        self.modal.set_rate(2.0 + 22.66 * hardness);
        self.modal.set_master_gain(0.2 + 1.6 * hardness);
    }

    pub fn set_strike_position(&mut self, position: f32) {
        use std::f32::consts::PI;
        self.modal.set_filter_gain(0, 0.025 * (position * PI).sin());
        self.modal
            .set_filter_gain(1, 0.015 * (0.1 + 2.01 * position * PI).sin());
        self.modal
            .set_filter_gain(2, 0.015 * (3.95 * position * PI).sin());
    }
}

impl Instrument for Vibraphone {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::Frequency => self.modal.set_frequency(value),
            Control::Amplitude => self.amplitude = value,
            Control::StickHardness => self.set_stick_hardness(value),
            Control::StrikePosition => self.set_strike_position(value),
            Control::VibratoRate => self.modal.set_vibrato_frequency(value),
            Control::VibratoAmount => self.modal.set_vibrato_gain(value),
            _ => {}
        }
    }

    fn trigger(&mut self) {
        self.modal.strike(self.amplitude);
    }

    fn next_sample(&mut self) -> f32 {
        self.modal.next_sample()
    }

    fn reset(&mut self) {
        self.modal.reset();
    }
}

/// Struck agogo bell. The fourth mode is clamped to 3725 Hz regardless of
/// the played pitch, which keeps the metallic clang in place as the bell
/// is retuned.
pub struct Agogo {
    modal: Modal4,
    amplitude: f32,
}

impl Agogo {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let mut modal = Modal4::new(sample_rate, noise_burst(2048, seed));
        modal.set_ratio_and_reson(0, 1.0, 0.999);
        modal.set_ratio_and_reson(1, 4.08, 0.999);
        modal.set_ratio_and_reson(2, 6.669, 0.999);
        modal.set_ratio_and_reson(3, -3725.0, 0.999);
        modal.set_filter_gain(0, 0.06);
        modal.set_filter_gain(1, 0.05);
        modal.set_filter_gain(2, 0.03);
        modal.set_filter_gain(3, 0.02);
        modal.set_direct_gain(0.25);
        modal.set_master_gain(1.0);
        modal.set_frequency(440.0);

        let mut agogo = Self {
            modal,
            amplitude: 0.8,
        };
        agogo.set_stick_hardness(0.5);
        agogo.set_strike_position(0.5);
        agogo
    }

    pub fn set_stick_hardness(&mut self, hardness: f32) {
        self.modal.set_rate(3.0 + 8.0 * hardness);
    }

    pub fn set_strike_position(&mut self, position: f32) {
        use std::f32::consts::PI;
        self.modal
            .set_filter_gain(0, 0.08 * (0.7 * position * PI).sin());
        self.modal
            .set_filter_gain(1, 0.07 * (0.1 + 5.0 * position * PI).sin());
        self.modal
            .set_filter_gain(2, 0.04 * (0.2 + 7.0 * position * PI).sin());
    }
}

impl Instrument for Agogo {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::Frequency => self.modal.set_frequency(value),
            Control::Amplitude => self.amplitude = value,
            Control::StickHardness => self.set_stick_hardness(value),
            Control::StrikePosition => self.set_strike_position(value),
            Control::VibratoRate => self.modal.set_vibrato_frequency(value),
            Control::VibratoAmount => self.modal.set_vibrato_gain(value),
            _ => {}
        }
    }

    fn trigger(&mut self) {
        self.modal.strike(self.amplitude);
    }

    fn next_sample(&mut self) -> f32 {
        self.modal.next_sample()
    }

    fn reset(&mut self) {
        self.modal.reset();
    }
}
