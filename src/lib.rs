pub mod dsp;
pub mod instruments; // Playable physical-model engines
pub mod synth; // Lock-free control surface

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_FREQUENCY: f32 = 20.0;
