use oorandom::Rand32;

/// One-shot playback of a caller-supplied excitation sample.
///
/// The strike and pluck engines are commuted-synthesis designs: the body
/// impulse response lives in a short sample that gets pushed through the
/// string or modal filters. Playback rate is fractional with linear
/// interpolation; a finished one-shot outputs zero until `restart`.
pub struct SamplePlayer {
    data: Vec<f32>,
    rate: f32,
    time: f32,
    finished: bool,
    last_output: f32,
}

impl SamplePlayer {
    pub fn one_shot(data: Vec<f32>) -> Self {
        Self {
            data,
            rate: 1.0,
            time: 0.0,
            finished: false,
            last_output: 0.0,
        }
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn restart(&mut self) {
        self.time = 0.0;
        self.finished = false;
        self.last_output = 0.0;
    }

    pub fn next_sample(&mut self) -> f32 {
        if self.finished || self.data.is_empty() {
            self.last_output = 0.0;
            return 0.0;
        }

        let len = self.data.len();
        let index = self.time as usize;
        if index + 1 >= len {
            self.finished = true;
            self.last_output = 0.0;
            return 0.0;
        }

        let alpha = self.time - index as f32;
        let a = self.data[index];
        let b = self.data[index + 1];
        self.last_output = a + alpha * (b - a);
        self.time += self.rate;
        self.last_output
    }

    pub fn last_output(&self) -> f32 {
        self.last_output
    }
}

/// Synthetic excitation: an exponentially decaying burst of seeded noise.
///
/// Stands in for recorded plectrum and stick impulses so the engines are
/// playable without external assets.
pub fn noise_burst(length: usize, seed: u64) -> Vec<f32> {
    let mut rng = Rand32::new(seed);
    (0..length)
        .map(|i| {
            let decay = (-6.0 * i as f32 / length as f32).exp();
            (rng.rand_float() * 2.0 - 1.0) * decay
        })
        .collect()
}
