/// Integer-sample delay line.
///
/// A plain circular buffer with a movable read tap. The capacity is fixed at
/// construction; `set_delay` clamps to it. `last_output` exposes the most
/// recently read sample without advancing, which the feedback loops in the
/// instrument engines read before writing the next input.
pub struct Delay {
    buffer: Vec<f32>,
    write_pos: usize,
    read_pos: usize,
    last_output: f32,
}

impl Delay {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(2)],
            write_pos: 0,
            read_pos: 0,
            last_output: 0.0,
        }
    }

    pub fn set_delay(&mut self, samples: usize) {
        let len = self.buffer.len();
        let samples = samples.min(len - 1);
        self.read_pos = (self.write_pos + len - samples) % len;
    }

    pub fn next_sample(&mut self, sample: f32) -> f32 {
        let len = self.buffer.len();
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % len;
        self.last_output = self.buffer[self.read_pos];
        self.read_pos = (self.read_pos + 1) % len;
        self.last_output
    }

    pub fn last_output(&self) -> f32 {
        self.last_output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.last_output = 0.0;
    }
}

/// Fractional delay line with two-tap linear interpolation.
///
/// The tap sits `delay` samples behind the write head; the fractional part
/// crossfades between the two neighboring samples.
pub struct LinearDelay {
    buffer: Vec<f32>,
    write_pos: usize,
    read_pos: usize,
    alpha: f32,
    om_alpha: f32,
    last_output: f32,
}

impl LinearDelay {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(2)],
            write_pos: 0,
            read_pos: 0,
            alpha: 0.0,
            om_alpha: 1.0,
            last_output: 0.0,
        }
    }

    pub fn set_delay(&mut self, delay: f32) {
        let len = self.buffer.len();
        let delay = delay.clamp(0.0, (len - 1) as f32);
        let mut tap = self.write_pos as f32 - delay;
        while tap < 0.0 {
            tap += len as f32;
        }
        self.read_pos = tap as usize % len;
        self.alpha = tap - tap.floor();
        self.om_alpha = 1.0 - self.alpha;
    }

    pub fn next_sample(&mut self, sample: f32) -> f32 {
        let len = self.buffer.len();
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % len;

        let first = self.buffer[self.read_pos];
        let second = self.buffer[(self.read_pos + 1) % len];
        self.last_output = self.om_alpha * first + self.alpha * second;
        self.read_pos = (self.read_pos + 1) % len;
        self.last_output
    }

    pub fn last_output(&self) -> f32 {
        self.last_output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.last_output = 0.0;
    }
}

/// Fractional delay line with first-order allpass interpolation.
///
/// Flat magnitude response at the cost of a frequency-dependent phase delay,
/// which suits string loops where the loss filter already colors the sound.
/// The fractional part below 0.1 borrows a sample of integer delay to keep
/// the allpass coefficient well-conditioned.
pub struct AllpassDelay {
    buffer: Vec<f32>,
    write_pos: usize,
    read_pos: usize,
    coeff: f32,
    last_in: f32,
    last_output: f32,
}

impl AllpassDelay {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(2)],
            write_pos: 0,
            read_pos: 0,
            coeff: 0.0,
            last_in: 0.0,
            last_output: 0.0,
        }
    }

    pub fn set_delay(&mut self, delay: f32) {
        let len = self.buffer.len();
        let delay = delay.clamp(0.1, (len - 2) as f32);
        let mut tap = self.write_pos as f32 - delay + 1.0;
        while tap < 0.0 {
            tap += len as f32;
        }
        let mut read = tap.floor();
        let mut alpha = 1.0 + read - tap;
        if alpha < 0.1 {
            read += 1.0;
            alpha += 1.0;
        }
        self.read_pos = read as usize % len;
        self.coeff = (1.0 - alpha) / (1.0 + alpha);
    }

    pub fn next_sample(&mut self, sample: f32) -> f32 {
        let len = self.buffer.len();
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % len;

        let temp = self.buffer[self.read_pos];
        self.read_pos = (self.read_pos + 1) % len;

        self.last_output = self.coeff * (temp - self.last_output) + self.last_in;
        self.last_in = temp;
        self.last_output
    }

    pub fn last_output(&self) -> f32 {
        self.last_output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.last_in = 0.0;
        self.last_output = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_delay_impulse_timing() {
        let mut delay = Delay::new(64);
        delay.set_delay(10);

        let mut samples = Vec::new();
        samples.push(delay.next_sample(1.0));
        for _ in 0..20 {
            samples.push(delay.next_sample(0.0));
        }

        for (i, s) in samples.iter().enumerate() {
            if i == 10 {
                assert!((s - 1.0).abs() < 1e-6, "impulse should emerge at sample 10");
            } else {
                assert!(s.abs() < 1e-6, "sample {} should be silent, got {}", i, s);
            }
        }
    }

    #[test]
    fn test_zero_delay_passes_through() {
        let mut delay = Delay::new(16);
        delay.set_delay(0);
        assert!((delay.next_sample(0.5) - 0.5).abs() < 1e-6);
        assert!((delay.next_sample(-0.25) - -0.25).abs() < 1e-6);
    }

    #[test]
    fn test_linear_delay_fractional_centroid() {
        // An impulse through a 10.3 sample delay should split its energy
        // between samples 10 and 11, weighted toward 10.
        let mut delay = LinearDelay::new(64);
        delay.set_delay(10.3);

        let mut samples = Vec::new();
        samples.push(delay.next_sample(1.0));
        for _ in 0..20 {
            samples.push(delay.next_sample(0.0));
        }

        assert!(
            (samples[10] - 0.7).abs() < 1e-5,
            "first tap should carry 0.7, got {}",
            samples[10]
        );
        assert!(
            (samples[11] - 0.3).abs() < 1e-5,
            "second tap should carry 0.3, got {}",
            samples[11]
        );
        let total: f32 = samples.iter().sum();
        assert!((total - 1.0).abs() < 1e-5, "energy should be conserved");

        // Rounded position: the heavier tap is at round(10.3) = 10.
        assert!(samples[10] > samples[11]);
    }

    #[test]
    fn test_linear_delay_integer_setting_is_exact() {
        let mut delay = LinearDelay::new(64);
        delay.set_delay(7.0);
        let mut samples = Vec::new();
        samples.push(delay.next_sample(1.0));
        for _ in 0..10 {
            samples.push(delay.next_sample(0.0));
        }
        assert!((samples[7] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_allpass_delay_passes_energy() {
        let mut delay = AllpassDelay::new(64);
        delay.set_delay(9.4);

        // An allpass is not FIR, so just check the impulse response is
        // bounded and that total energy stays near unity.
        let mut energy = 0.0;
        let mut out = delay.next_sample(1.0);
        energy += out * out;
        for _ in 0..500 {
            out = delay.next_sample(0.0);
            assert!(out.abs() <= 1.5, "allpass response should stay bounded");
            energy += out * out;
        }
        assert!(
            (energy - 1.0).abs() < 1e-3,
            "allpass should conserve energy, got {}",
            energy
        );
    }

    #[test]
    fn test_reset_clears_history() {
        let mut delay = LinearDelay::new(32);
        delay.set_delay(4.0);
        delay.next_sample(1.0);
        delay.reset();
        for _ in 0..10 {
            assert_eq!(delay.next_sample(0.0), 0.0);
        }
    }
}
