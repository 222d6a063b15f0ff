use crate::dsp::filter::{BiQuad, OnePole};
use crate::dsp::sample::SamplePlayer;
use crate::dsp::vibrato::Vibrato;

const NUM_MODES: usize = 4;

/// Linear ramp toward a target, one step per sample.
struct Envelope {
    value: f32,
    target: f32,
    rate: f32,
}

impl Envelope {
    fn new() -> Self {
        Self {
            value: 0.0,
            target: 0.0,
            rate: 0.001,
        }
    }

    fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    fn next_sample(&mut self) -> f32 {
        if self.value < self.target {
            self.value += self.rate;
            if self.value > self.target {
                self.value = self.target;
            }
        } else if self.value > self.target {
            self.value -= self.rate;
            if self.value < self.target {
                self.value = self.target;
            }
        }
        self.value
    }
}

/// Four-resonance modal synthesis core.
///
/// A short excitation sample is enveloped, lowpassed by a strike-dependent
/// one-pole, and fed to four two-pole resonators in parallel. Each mode is
/// tuned as a ratio of the base frequency; a negative ratio pins the mode
/// to an absolute frequency instead, and ratios that would alias are folded
/// down by octaves. The mallet presets wrap this core with their own mode
/// tables and stick laws.
pub struct Modal4 {
    sample_rate: f32,
    wave: SamplePlayer,
    envelope: Envelope,
    onepole: OnePole,
    filters: [BiQuad; NUM_MODES],
    vibrato: Vibrato,

    base_frequency: f32,
    ratios: [f32; NUM_MODES],
    resons: [f32; NUM_MODES],
    master_gain: f32,
    direct_gain: f32,
    vibrato_gain: f32,
}

impl Modal4 {
    pub fn new(sample_rate: f32, excitation: Vec<f32>) -> Self {
        let mut vibrato = Vibrato::new(sample_rate);
        vibrato.set_frequency(6.0);

        Self {
            sample_rate,
            wave: SamplePlayer::one_shot(excitation),
            envelope: Envelope::new(),
            onepole: OnePole::new(),
            filters: [BiQuad::new(), BiQuad::new(), BiQuad::new(), BiQuad::new()],
            vibrato,
            base_frequency: 440.0,
            ratios: [1.0; NUM_MODES],
            resons: [0.999; NUM_MODES],
            master_gain: 1.0,
            direct_gain: 0.0,
            vibrato_gain: 0.0,
        }
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.base_frequency = frequency;
        for i in 0..NUM_MODES {
            self.set_ratio_and_reson(i, self.ratios[i], self.resons[i]);
        }
    }

    /// Negative ratios are absolute frequencies in Hz; positive ratios scale
    /// the base frequency and fold down by octaves when they would alias.
    pub fn set_ratio_and_reson(&mut self, index: usize, ratio: f32, reson: f32) {
        let mut ratio = ratio;
        if ratio > 0.0 {
            while ratio * self.base_frequency >= self.sample_rate * 0.5 {
                ratio *= 0.5;
            }
        }
        self.ratios[index] = ratio;
        self.resons[index] = reson;

        let frequency = if ratio < 0.0 {
            -ratio
        } else {
            ratio * self.base_frequency
        };
        self.filters[index].set_freq_and_reson(frequency, reson, self.sample_rate);
        self.filters[index].set_equal_gain_zeroes();
    }

    pub fn set_filter_gain(&mut self, index: usize, gain: f32) {
        self.filters[index].set_gain(gain);
    }

    pub fn set_master_gain(&mut self, gain: f32) {
        self.master_gain = gain;
    }

    pub fn set_direct_gain(&mut self, gain: f32) {
        self.direct_gain = gain;
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.wave.set_rate(rate);
    }

    pub fn set_vibrato_frequency(&mut self, frequency: f32) {
        self.vibrato.set_frequency(frequency);
    }

    pub fn set_vibrato_gain(&mut self, gain: f32) {
        self.vibrato_gain = gain;
    }

    pub fn wave_finished(&self) -> bool {
        self.wave.is_finished()
    }

    pub fn restart_wave(&mut self) {
        self.wave.restart();
    }

    pub fn strike(&mut self, amplitude: f32) {
        self.envelope.set_rate(1.0);
        self.envelope.set_target(amplitude);
        self.onepole.set_pole(1.0 - amplitude);
        self.wave.restart();
        for i in 0..NUM_MODES {
            self.set_ratio_and_reson(i, self.ratios[i], self.resons[i]);
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        let excitation = self.master_gain
            * self
                .onepole
                .next_sample(self.wave.next_sample() * self.envelope.next_sample());

        let mut output = 0.0;
        for filter in &mut self.filters {
            output += filter.next_sample(excitation);
        }
        output -= output * self.direct_gain;
        output += self.direct_gain * excitation;

        if self.vibrato_gain != 0.0 {
            output *= 1.0 + self.vibrato.next_sample() * self.vibrato_gain;
        }
        output * 2.0
    }

    pub fn reset(&mut self) {
        self.envelope.value = 0.0;
        self.envelope.target = 0.0;
        self.onepole.reset();
        for filter in &mut self.filters {
            filter.reset();
        }
        self.vibrato.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::sample::noise_burst;

    #[test]
    fn test_strike_rings_at_mode_frequencies() {
        let mut modal = Modal4::new(44_100.0, noise_burst(256, 1));
        modal.set_frequency(440.0);
        for i in 0..4 {
            modal.set_ratio_and_reson(i, 1.0 + i as f32, 0.9995);
            modal.set_filter_gain(i, 0.02);
        }
        modal.strike(0.8);

        let mut buffer = vec![0.0f32; 22_050];
        for s in buffer.iter_mut() {
            *s = modal.next_sample();
        }
        assert!(buffer.iter().all(|s| s.is_finite()));
        assert!(buffer.iter().any(|s| s.abs() > 1e-5));
    }

    #[test]
    fn test_aliasing_ratio_folds_down() {
        let mut modal = Modal4::new(44_100.0, noise_burst(256, 2));
        modal.set_frequency(1000.0);
        modal.set_ratio_and_reson(0, 100.0, 0.999);
        assert!(
            modal.ratios[0] * 1000.0 < 22_050.0,
            "ratio should fold below Nyquist, got {}",
            modal.ratios[0]
        );
    }

    #[test]
    fn test_negative_ratio_is_absolute() {
        let mut modal = Modal4::new(44_100.0, noise_burst(256, 3));
        modal.set_frequency(200.0);
        modal.set_ratio_and_reson(0, -3725.0, 0.999);
        assert_eq!(modal.ratios[0], -3725.0);
    }

    #[test]
    fn test_struck_output_decays() {
        let mut modal = Modal4::new(44_100.0, noise_burst(256, 4));
        modal.set_frequency(440.0);
        for i in 0..4 {
            modal.set_ratio_and_reson(i, 1.0 + i as f32 * 2.0, 0.999);
            modal.set_filter_gain(i, 0.02);
        }
        modal.strike(0.9);

        let mut early = vec![0.0f32; 4096];
        for s in early.iter_mut() {
            *s = modal.next_sample();
        }
        let mut late = vec![0.0f32; 4096];
        for _ in 0..20 {
            for s in late.iter_mut() {
                *s = modal.next_sample();
            }
        }
        let rms = |b: &[f32]| (b.iter().map(|s| s * s).sum::<f32>() / b.len() as f32).sqrt();
        assert!(rms(&late) < rms(&early));
    }
}
