//! physmod - scripted physical-model performance
//!
//! Plays a short mandolin figure over a meta-shaker groove on the default
//! audio output. Run with: cargo run --bin physmod

use color_eyre::eyre::{eyre, Result, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Producer, RingBuffer};

use physmod_dsp::{
    instruments::{Control, Mandolin, MetaShaker},
    synth::{message::ControlMessage, performer::Performer},
    MAX_BLOCK_SIZE,
};

fn send(tx: &mut Producer<ControlMessage>, msg: ControlMessage) {
    if tx.push(msg).is_err() {
        eprintln!("control queue full, dropping message");
    }
}

fn set(tx: &mut Producer<ControlMessage>, control: Control, value: f32) {
    send(tx, ControlMessage::Set { control, value });
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    println!("=== physmod ===");
    println!("Sample rate: {} Hz", sample_rate);
    println!("Channels: {}", channels);

    let (mut mandolin_tx, mandolin_rx) = RingBuffer::<ControlMessage>::new(256);
    let (mut shaker_tx, shaker_rx) = RingBuffer::<ControlMessage>::new(256);

    let mut mandolin = Performer::new(Mandolin::new(sample_rate, 1), mandolin_rx);
    mandolin.set_gain(0.8);
    let mut shaker = Performer::new(MetaShaker::new(sample_rate, 2), shaker_rx);
    shaker.set_gain(0.1);

    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut voice_buf = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut frames_written = 0;

            while frames_written < total_frames {
                let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                let block = &mut render_buf[..frames];
                mandolin.render_block(block);

                let voice = &mut voice_buf[..frames];
                shaker.render_block(voice);
                for (out, &sample) in block.iter_mut().zip(voice.iter()) {
                    *out += sample;
                }

                let out_off = frames_written * channels;
                for (i, &s) in block.iter().enumerate() {
                    for ch in 0..channels {
                        data[out_off + i * channels + ch] = s;
                    }
                }
                frames_written += frames;
            }
        },
        |err| eprintln!("Audio error: {}", err),
        None,
    )?;

    stream.play()?;

    // A-minor arpeggio against a sleigh-bell backbeat, then a personality
    // tour through the rest of the shaker family.
    let beat = std::time::Duration::from_millis(250);
    let melody = [220.0, 261.63, 329.63, 440.0, 329.63, 261.63];

    set(&mut shaker_tx, Control::ShakeDamping, 0.9);
    for bar in 0..8u32 {
        set(&mut shaker_tx, Control::Personality, (bar % 7) as f32);
        for (step, &freq) in melody.iter().enumerate() {
            set(&mut mandolin_tx, Control::Frequency, freq);
            set(
                &mut mandolin_tx,
                Control::Microphone,
                ((bar as usize + step) % 12) as f32,
            );
            send(&mut mandolin_tx, ControlMessage::Trigger);
            if step % 2 == 0 {
                send(&mut shaker_tx, ControlMessage::Trigger);
            }
            std::thread::sleep(beat);
        }
    }

    // Let the last notes ring out.
    std::thread::sleep(std::time::Duration::from_secs(2));
    Ok(())
}
