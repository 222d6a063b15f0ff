use crate::{
    instruments::Instrument,
    synth::message::{ControlMessage, MessageReceiver},
};

/// Owns one instrument on the audio thread and applies queued control
/// changes at block boundaries.
///
/// Controls arriving mid-block take effect at the start of the next block,
/// which at typical block sizes is a few milliseconds of quantization, well
/// under what a player notices.
pub struct Performer<I, R> {
    instrument: I,
    rx: R,
    gain: f32,
}

impl<I: Instrument, R: MessageReceiver> Performer<I, R> {
    pub fn new(instrument: I, rx: R) -> Self {
        Self {
            instrument,
            rx,
            gain: 1.0,
        }
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    pub fn instrument(&self) -> &I {
        &self.instrument
    }

    pub fn instrument_mut(&mut self) -> &mut I {
        &mut self.instrument
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        while let Some(msg) = self.rx.pop() {
            match msg {
                ControlMessage::Set { control, value } => {
                    self.instrument.set_control(control, value);
                }
                ControlMessage::Trigger => self.instrument.trigger(),
                ControlMessage::Reset => self.instrument.reset(),
            }
        }

        self.instrument.render(out);
        if self.gain != 1.0 {
            for sample in out.iter_mut() {
                *sample *= self.gain;
            }
        }
    }
}
