use std::f32::consts::TAU;

/// One-pole lowpass, `y[n] = b0*x[n] + pole*y[n-1]`.
///
/// `set_pole` rescales the feedthrough gain so the filter keeps unity peak
/// gain at DC (positive pole) or Nyquist (negative pole).
pub struct OnePole {
    gain: f32,
    pole: f32,
    b0: f32,
    y1: f32,
}

impl OnePole {
    pub fn new() -> Self {
        Self {
            gain: 1.0,
            pole: 0.9,
            b0: 0.1,
            y1: 0.0,
        }
    }

    pub fn set_pole(&mut self, pole: f32) {
        self.pole = pole;
        self.update_gain();
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
        self.update_gain();
    }

    fn update_gain(&mut self) {
        self.b0 = if self.pole > 0.0 {
            self.gain * (1.0 - self.pole)
        } else {
            self.gain * (1.0 + self.pole)
        };
    }

    pub fn next_sample(&mut self, sample: f32) -> f32 {
        self.y1 = self.b0 * sample + self.pole * self.y1;
        self.y1
    }

    pub fn reset(&mut self) {
        self.y1 = 0.0;
    }
}

impl Default for OnePole {
    fn default() -> Self {
        Self::new()
    }
}

/// One-zero filter, the two-point average `y[n] = 0.5(x[n] + x[n-1])`.
///
/// Serves as the loop loss filter in the string models: gentle high rolloff,
/// exactly half a sample of delay.
pub struct OneZero {
    x1: f32,
}

impl OneZero {
    pub fn new() -> Self {
        Self { x1: 0.0 }
    }

    pub fn next_sample(&mut self, sample: f32) -> f32 {
        let scaled = 0.5 * sample;
        let output = self.x1 + scaled;
        self.x1 = scaled;
        output
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
    }
}

impl Default for OneZero {
    fn default() -> Self {
        Self::new()
    }
}

/// Two-pole, two-zero resonant filter in direct form I.
///
/// `set_freq_and_reson` places a conjugate pole pair at the given center
/// frequency with radius `r`; `set_equal_gain_zeroes` adds zeros at DC and
/// Nyquist so every resonance peaks at the same gain regardless of center
/// frequency. Zero coefficients default to zero, giving a pure two-pole.
pub struct BiQuad {
    gain: f32,
    a1: f32,
    a2: f32,
    b1: f32,
    b2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
    last_output: f32,
}

impl BiQuad {
    pub fn new() -> Self {
        Self {
            gain: 1.0,
            a1: 0.0,
            a2: 0.0,
            b1: 0.0,
            b2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
            last_output: 0.0,
        }
    }

    pub fn set_freq_and_reson(&mut self, frequency: f32, radius: f32, sample_rate: f32) {
        self.a1 = 2.0 * radius * (TAU * frequency / sample_rate).cos();
        self.a2 = -radius * radius;
    }

    pub fn set_equal_gain_zeroes(&mut self) {
        self.b1 = 0.0;
        self.b2 = -1.0;
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    pub fn next_sample(&mut self, sample: f32) -> f32 {
        let scaled = sample * self.gain;
        let output =
            scaled + self.b1 * self.x1 + self.b2 * self.x2 + self.a1 * self.y1 + self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = scaled;
        self.y2 = self.y1;
        self.y1 = output;
        self.last_output = output;
        output
    }

    pub fn last_output(&self) -> f32 {
        self.last_output
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
        self.last_output = 0.0;
    }
}

impl Default for BiQuad {
    fn default() -> Self {
        Self::new()
    }
}

/// DC blocker, `y[n] = x[n] - x[n-1] + 0.99*y[n-1]`.
///
/// The waveguide loops accumulate small offsets from their nonlinearities;
/// this keeps them centered without touching the audible band.
pub struct DcBlocker {
    x1: f32,
    y1: f32,
}

impl DcBlocker {
    pub fn new() -> Self {
        Self { x1: 0.0, y1: 0.0 }
    }

    pub fn next_sample(&mut self, sample: f32) -> f32 {
        self.y1 = sample - self.x1 + 0.99 * self.y1;
        self.x1 = sample;
        self.y1
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}

impl Default for DcBlocker {
    fn default() -> Self {
        Self::new()
    }
}
