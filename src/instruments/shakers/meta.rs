use oorandom::Rand32;

use crate::dsp::noise::Noise;
use crate::instruments::{Control, Instrument};

use super::{collision, Bamboo, Cabasa, Guiro, HistoryTap, Resonator, Sekere, Tambourine, MAX_SHAKE};

/// Maraca: dried beans in a gourd. Only reachable through [`MetaShaker`].
struct Maraca {
    sample_rate: f32,
    rng: Rand32,
    noise: Noise,
    resonator: Resonator,

    num_objects: f32,
    gain: f32,
    system_decay: f32,
    shake_energy: f32,
    sound_level: f32,
}

impl Maraca {
    const SOUND_DECAY: f32 = 0.95;
    const SYSTEM_DECAY: f32 = 0.999;
    const NUM_BEANS: f32 = 25.0;

    fn new(sample_rate: f32, seed: u64) -> Self {
        let mut resonator = Resonator::new(0.96);
        resonator.set_frequency(3200.0, sample_rate);
        Self {
            sample_rate,
            rng: Rand32::new(seed),
            noise: Noise::new(seed.wrapping_add(1)),
            resonator,
            num_objects: Self::NUM_BEANS,
            gain: Self::NUM_BEANS.ln() / 4.0f32.ln() * 40.0 / Self::NUM_BEANS,
            system_decay: Self::SYSTEM_DECAY,
            shake_energy: 0.0,
            sound_level: 0.0,
        }
    }
}

impl Instrument for Maraca {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::ShakeObjects => {
                self.num_objects = value.max(1.0);
                self.gain = self.num_objects.ln() / 4.0f32.ln() * 40.0 / self.num_objects;
            }
            Control::ShakeDamping => self.system_decay = 0.998 + value * 0.002,
            Control::ShakeEnergy => {
                self.shake_energy = (self.shake_energy + value * MAX_SHAKE * 0.1).min(MAX_SHAKE);
            }
            Control::ResonanceFrequency => {
                self.resonator.set_frequency(value, self.sample_rate);
            }
            _ => {}
        }
    }

    fn trigger(&mut self) {
        self.set_control(Control::ShakeEnergy, 0.9);
    }

    fn next_sample(&mut self) -> f32 {
        self.shake_energy *= self.system_decay;
        if collision(&mut self.rng, 1024, self.num_objects) {
            self.sound_level += self.gain * self.shake_energy;
        }
        let input = self.sound_level * self.noise.next_sample();
        self.sound_level *= Self::SOUND_DECAY;

        self.resonator.next_sample(input);
        self.resonator.difference()
    }

    fn reset(&mut self) {
        self.shake_energy = 0.0;
        self.sound_level = 0.0;
        self.resonator.reset();
    }
}

/// Sleigh bells: five loose bells retuned a little at every collision.
/// Only reachable through [`MetaShaker`].
struct SleighBells {
    sample_rate: f32,
    rng: Rand32,
    noise: Noise,
    bells: [Resonator; 5],
    final_z: HistoryTap,

    num_objects: f32,
    gain: f32,
    system_decay: f32,
    shake_energy: f32,
    sound_level: f32,
    frequencies: [f32; 5],
}

impl SleighBells {
    const SOUND_DECAY: f32 = 0.97;
    const SYSTEM_DECAY: f32 = 0.9994;
    const NUM_BELLS: f32 = 32.0;
    const FREQUENCIES: [f32; 5] = [2500.0, 5300.0, 6500.0, 8300.0, 9800.0];
    const INPUT_GAINS: [f32; 5] = [1.0, 1.0, 1.0, 0.5, 0.3];

    fn new(sample_rate: f32, seed: u64) -> Self {
        let mut bells = [
            Resonator::new(0.99),
            Resonator::new(0.99),
            Resonator::new(0.99),
            Resonator::new(0.99),
            Resonator::new(0.99),
        ];
        for (bell, frequency) in bells.iter_mut().zip(Self::FREQUENCIES) {
            bell.set_frequency(frequency, sample_rate);
        }
        Self {
            sample_rate,
            rng: Rand32::new(seed),
            noise: Noise::new(seed.wrapping_add(1)),
            bells,
            final_z: HistoryTap::default(),
            num_objects: Self::NUM_BELLS,
            gain: Self::NUM_BELLS.ln() * 30.0 / Self::NUM_BELLS,
            system_decay: Self::SYSTEM_DECAY,
            shake_energy: 0.0,
            sound_level: 0.0,
            frequencies: Self::FREQUENCIES,
        }
    }
}

impl Instrument for SleighBells {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::ShakeObjects => {
                self.num_objects = value.max(1.0);
                self.gain = self.num_objects.ln() * 30.0 / self.num_objects;
            }
            Control::ShakeDamping => self.system_decay = 0.998 + value * 0.002,
            Control::ShakeEnergy => {
                self.shake_energy = (self.shake_energy + value * MAX_SHAKE * 0.1).min(MAX_SHAKE);
            }
            Control::ResonanceFrequency => self.frequencies[0] = value,
            _ => {}
        }
    }

    fn trigger(&mut self) {
        self.set_control(Control::ShakeEnergy, 0.9);
    }

    fn next_sample(&mut self) -> f32 {
        self.shake_energy *= self.system_decay;
        if collision(&mut self.rng, 1024, self.num_objects) {
            self.sound_level += self.gain * self.shake_energy;
            for (i, (bell, center)) in self.bells.iter_mut().zip(self.frequencies).enumerate() {
                let spread = if i == 0 { 0.05 } else { 0.03 };
                let jitter = self.noise.next_sample() * center * spread;
                bell.set_frequency(center + jitter, self.sample_rate);
            }
        }
        let input = self.sound_level * self.noise.next_sample();
        self.sound_level *= Self::SOUND_DECAY;

        let mut data = 0.0;
        for (bell, input_gain) in self.bells.iter_mut().zip(Self::INPUT_GAINS) {
            data += bell.next_sample(input * input_gain);
        }
        self.final_z.push(data);
        self.final_z.get(2) - self.final_z.get(0)
    }

    fn reset(&mut self) {
        self.shake_energy = 0.0;
        self.sound_level = 0.0;
        for bell in &mut self.bells {
            bell.reset();
        }
        self.final_z.reset();
    }
}

/// The selectable shaker personalities.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShakerKind {
    Maraca,
    Cabasa,
    Sekere,
    Guiro,
    Tambourine,
    Bamboo,
    #[default]
    SleighBells,
}

impl ShakerKind {
    /// Numeric personality selection, wrapping out-of-range indices.
    pub fn from_index(index: u32) -> Self {
        match index % 7 {
            0 => Self::Maraca,
            1 => Self::Cabasa,
            2 => Self::Sekere,
            3 => Self::Guiro,
            4 => Self::Tambourine,
            5 => Self::Bamboo,
            _ => Self::SleighBells,
        }
    }

    /// Loudness equalization applied after the personality's own output.
    fn output_scale(self) -> f32 {
        match self {
            Self::Maraca => 40.0,
            Self::Cabasa => 100.0,
            Self::Sekere => 100.0,
            // The guiro is loud and the tambourine quiet.
            Self::Guiro => 0.05,
            Self::Tambourine => 100.0,
            Self::Bamboo => 5.0,
            Self::SleighBells => 5.0,
        }
    }
}

enum Engine {
    Maraca(Maraca),
    Cabasa(Cabasa),
    Sekere(Sekere),
    Guiro(Guiro),
    Tambourine(Tambourine),
    Bamboo(Bamboo),
    SleighBells(SleighBells),
}

impl Engine {
    fn build(kind: ShakerKind, sample_rate: f32, seed: u64) -> Self {
        match kind {
            ShakerKind::Maraca => Self::Maraca(Maraca::new(sample_rate, seed)),
            ShakerKind::Cabasa => Self::Cabasa(Cabasa::new(sample_rate, seed)),
            ShakerKind::Sekere => Self::Sekere(Sekere::new(sample_rate, seed)),
            ShakerKind::Guiro => Self::Guiro(Guiro::new(sample_rate, seed)),
            ShakerKind::Tambourine => Self::Tambourine(Tambourine::new(sample_rate, seed)),
            ShakerKind::Bamboo => Self::Bamboo(Bamboo::new(sample_rate, seed)),
            ShakerKind::SleighBells => Self::SleighBells(SleighBells::new(sample_rate, seed)),
        }
    }

    fn as_instrument(&mut self) -> &mut dyn Instrument {
        match self {
            Self::Maraca(e) => e,
            Self::Cabasa(e) => e,
            Self::Sekere(e) => e,
            Self::Guiro(e) => e,
            Self::Tambourine(e) => e,
            Self::Bamboo(e) => e,
            Self::SleighBells(e) => e,
        }
    }
}

/// The controls that persist across a personality switch, one save slot
/// each.
const SAVED_CONTROLS: [Control; 6] = [
    Control::ShakeObjects,
    Control::ShakeDamping,
    Control::ResonanceFrequency,
    Control::ResonanceSpread,
    Control::ResonanceRandomness,
    Control::ScrapeVelocity,
];

/// A shaker that can swap its personality at runtime.
///
/// Switching personalities rebuilds the underlying model with cleared state,
/// then replays the control values the player has set so far, so a damping
/// or resonance setting survives the change. A fresh guiro personality
/// starts scraping immediately; the others wait for a shake. The save slots
/// are a fixed array, so switching never allocates.
pub struct MetaShaker {
    sample_rate: f32,
    seed: u64,
    kind: ShakerKind,
    engine: Engine,
    power: bool,
    saved: [Option<f32>; SAVED_CONTROLS.len()],
}

impl MetaShaker {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let kind = ShakerKind::default();
        Self {
            sample_rate,
            seed,
            kind,
            engine: Engine::build(kind, sample_rate, seed),
            power: true,
            saved: [None; SAVED_CONTROLS.len()],
        }
    }

    pub fn kind(&self) -> ShakerKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: ShakerKind) {
        self.kind = kind;
        self.engine = Engine::build(kind, self.sample_rate, self.seed);
        for (control, value) in SAVED_CONTROLS.iter().zip(self.saved) {
            if let Some(value) = value {
                self.engine.as_instrument().set_control(*control, value);
            }
        }
    }

    fn save(&mut self, control: Control, value: f32) {
        if let Some(slot) = SAVED_CONTROLS.iter().position(|c| *c == control) {
            self.saved[slot] = Some(value);
        }
    }
}

impl Instrument for MetaShaker {
    fn set_control(&mut self, control: Control, value: f32) {
        match control {
            Control::Personality => self.set_kind(ShakerKind::from_index(value.max(0.0) as u32)),
            Control::Power => self.power = value != 0.0,
            Control::ShakeEnergy => self.engine.as_instrument().set_control(control, value),
            Control::ShakeObjects
            | Control::ShakeDamping
            | Control::ResonanceFrequency
            | Control::ResonanceSpread
            | Control::ResonanceRandomness
            | Control::ScrapeVelocity => {
                self.save(control, value);
                self.engine.as_instrument().set_control(control, value);
            }
            _ => {}
        }
    }

    fn trigger(&mut self) {
        self.engine.as_instrument().trigger();
    }

    fn next_sample(&mut self) -> f32 {
        if !self.power {
            return 0.0;
        }
        self.engine.as_instrument().next_sample() * self.kind.output_scale()
    }

    fn reset(&mut self) {
        self.engine.as_instrument().reset();
    }
}
