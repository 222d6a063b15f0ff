const TABLE_SIZE: usize = 1024;

/// Sine wavetable LFO with linear interpolation, for vibrato.
///
/// Runs at control-ish rates but is ticked per sample so the engines can mix
/// it straight into their pressure signals.
pub struct Vibrato {
    table: Vec<f32>,
    sample_rate: f32,
    rate: f32,
    time: f32,
}

impl Vibrato {
    pub fn new(sample_rate: f32) -> Self {
        let table = (0..TABLE_SIZE)
            .map(|i| (i as f32 * std::f32::consts::TAU / TABLE_SIZE as f32).sin())
            .collect();
        Self {
            table,
            sample_rate,
            rate: TABLE_SIZE as f32 / sample_rate,
            time: 0.0,
        }
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.rate = TABLE_SIZE as f32 * frequency / self.sample_rate;
    }

    pub fn next_sample(&mut self) -> f32 {
        self.time += self.rate;
        while self.time >= TABLE_SIZE as f32 {
            self.time -= TABLE_SIZE as f32;
        }
        while self.time < 0.0 {
            self.time += TABLE_SIZE as f32;
        }

        let index = self.time as usize;
        let alpha = self.time - index as f32;
        let a = self.table[index];
        let b = self.table[(index + 1) % TABLE_SIZE];
        a + alpha * (b - a)
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vibrato_stays_bipolar() {
        let mut vib = Vibrato::new(44_100.0);
        vib.set_frequency(6.0);
        for _ in 0..44_100 {
            let s = vib.next_sample();
            assert!((-1.0..=1.0).contains(&s), "out of range: {}", s);
        }
    }

    #[test]
    fn test_vibrato_completes_expected_cycles() {
        // Count zero crossings over one second at 5 Hz: expect 10.
        let mut vib = Vibrato::new(48_000.0);
        vib.set_frequency(5.0);
        let mut crossings = 0;
        let mut last = vib.next_sample();
        for _ in 0..48_000 {
            let s = vib.next_sample();
            if (last >= 0.0) != (s >= 0.0) {
                crossings += 1;
            }
            last = s;
        }
        assert!(
            (9..=11).contains(&crossings),
            "expected ~10 crossings, got {}",
            crossings
        );
    }
}
