//! Playable physical-model engines.
//!
//! Each engine is a self-contained mono voice: construct it with a sample
//! rate and a noise seed, drive it through the [`Instrument`] trait, and pull
//! samples with `render`. Waveguide winds sound for as long as their breath
//! pressure is above zero; plucked and struck models speak on `trigger`.
//!
//! # Example
//!
//! ```
//! use physmod_dsp::instruments::{Control, Instrument, Plucked};
//!
//! let mut string = Plucked::new(44_100.0, 1);
//! string.set_control(Control::Frequency, 220.0);
//! string.trigger();
//!
//! let mut block = [0.0f32; 256];
//! string.render(&mut block);
//! ```

mod blotar;
mod bowed_bar;
mod brass;
mod clarinet;
mod flute;
mod mandolin;
mod modal;
mod plucked;
mod presets;
pub mod shakers;

pub use blotar::Blotar;
pub use bowed_bar::BowedBar;
pub use brass::Brass;
pub use clarinet::Clarinet;
pub use flute::Flute;
pub use mandolin::Mandolin;
pub use modal::Modal4;
pub use plucked::Plucked;
pub use presets::{Agogo, Marimba, Vibraphone};
pub use shakers::{
    Bamboo, Cabasa, Guiro, MetaShaker, Sekere, ShakerKind, Tambourine,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Continuous parameters shared across the engine family.
///
/// Each engine responds to the subset it owns and silently ignores the rest,
/// so one control surface can address any instrument. Values outside an
/// engine's documented range are clamped by the engine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Fundamental pitch in Hz.
    Frequency,
    /// Steady blowing pressure feeding a waveguide, nominally 0..1.
    BreathPressure,
    /// Turbulence noise mixed into the breath.
    NoiseGain,
    /// Vibrato LFO rate in Hz.
    VibratoRate,
    /// Vibrato depth.
    VibratoAmount,
    /// Flute jet delay as a fraction of the bore delay.
    JetRatio,
    /// Blotar jet delay, expressed as the frequency it would resonate at.
    JetDelay,
    /// Reflection gain at the open end of a jet instrument's bore.
    EndReflection,
    /// Reflection gain from bore back into the jet.
    JetReflection,
    /// Reed stiffness in [0, 1], mapped onto the reed table slope.
    ReedStiffness,
    /// Lip filter tuning as a multiple of the played frequency.
    LipTension,
    /// Trombone-style slide length multiplier.
    SlidePosition,
    /// Peak breath pressure for the reed and lip models.
    MaxPressure,
    /// Excitation strength used by the next `trigger`, 0..1.
    Amplitude,
    /// Pluck/strike point along the string or bar, 0..1.
    PluckPosition,
    /// Mandolin string-pair detuning factor.
    Detune,
    /// String loop gain before the frequency-dependent correction.
    BaseLoopGain,
    /// Body impulse playback rate.
    BodySize,
    /// Which body-impulse variant the next pluck uses.
    Microphone,
    /// Blotar blend between the flute one-pole and string one-zero paths.
    FilterRatio,
    /// Mallet hardness for the modal presets, 0..1.
    StickHardness,
    /// Strike point for the modal presets, 0..1.
    StrikePosition,
    /// Bow friction slope.
    BowPressure,
    /// Bow speed driving the banded waveguide.
    BowVelocity,
    /// Bow contact point, 0..1.
    BowPosition,
    /// Leaky integration constant for the bowed bar's velocity sum.
    IntegrationConstant,
    /// Particle count in a shaker, clamped to at least 1.
    ShakeObjects,
    /// Shaker system damping, 0..1.
    ShakeDamping,
    /// Injects shake energy, 0..1; guiro repurposes this as scrape position.
    ShakeEnergy,
    /// Primary resonance center frequency in Hz.
    ResonanceFrequency,
    /// Bamboo tube frequency spread.
    ResonanceSpread,
    /// Per-collision resonance randomization depth.
    ResonanceRandomness,
    /// Guiro and meta-shaker scrape velocity.
    ScrapeVelocity,
    /// Meta-shaker personality index (see [`ShakerKind::from_index`]).
    Personality,
    /// Meta-shaker power gate; nonzero is on.
    Power,
}

/// A mono physical-model voice.
pub trait Instrument: Send {
    /// Update one continuous parameter. Engines ignore controls they do not
    /// own; coefficient recomputation happens here, never in the render path.
    fn set_control(&mut self, control: Control, value: f32);

    /// Begin a new excitation: pluck the string, strike the bar, restart the
    /// scrape. Breath-driven waveguides sound whenever their pressure is
    /// above zero and treat this as a no-op.
    fn trigger(&mut self);

    /// Produce the next output sample.
    fn next_sample(&mut self) -> f32;

    /// Fill `buffer` with consecutive output samples.
    fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Clear all internal state back to silence. Control values survive.
    fn reset(&mut self);
}

impl Instrument for Box<dyn Instrument> {
    fn set_control(&mut self, control: Control, value: f32) {
        self.as_mut().set_control(control, value);
    }

    fn trigger(&mut self) {
        self.as_mut().trigger();
    }

    fn next_sample(&mut self) -> f32 {
        self.as_mut().next_sample()
    }

    fn render(&mut self, buffer: &mut [f32]) {
        self.as_mut().render(buffer);
    }

    fn reset(&mut self) {
        self.as_mut().reset();
    }
}
