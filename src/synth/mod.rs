// Purpose: Lock-free control delivery onto the audio thread
// This layer sits above the instrument engines

pub mod message;
pub mod performer;
