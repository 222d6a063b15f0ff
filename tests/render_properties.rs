//! Cross-engine rendering properties.
//!
//! Every engine, whatever its excitation model, has to stay finite under
//! sustained rendering, speak when excited, and go quiet when its excitation
//! is removed and its state cleared.

use physmod_dsp::instruments::{
    Agogo, Bamboo, Blotar, BowedBar, Brass, Cabasa, Clarinet, Control, Flute, Guiro, Instrument,
    Mandolin, Marimba, MetaShaker, Plucked, Sekere, Tambourine, Vibraphone,
};

const SAMPLE_RATE: f32 = 44_100.0;

fn rms(buffer: &[f32]) -> f32 {
    (buffer.iter().map(|s| s * s).sum::<f32>() / buffer.len() as f32).sqrt()
}

fn all_engines() -> Vec<(&'static str, Box<dyn Instrument>)> {
    vec![
        ("flute", Box::new(Flute::new(SAMPLE_RATE, 1)) as Box<dyn Instrument>),
        ("clarinet", Box::new(Clarinet::new(SAMPLE_RATE, 2))),
        ("brass", Box::new(Brass::new(SAMPLE_RATE, 3))),
        ("blotar", Box::new(Blotar::new(SAMPLE_RATE, 4))),
        ("plucked", Box::new(Plucked::new(SAMPLE_RATE, 5))),
        ("mandolin", Box::new(Mandolin::new(SAMPLE_RATE, 6))),
        ("bowed_bar", Box::new(BowedBar::new(SAMPLE_RATE, 7))),
        ("marimba", Box::new(Marimba::new(SAMPLE_RATE, 8))),
        ("vibraphone", Box::new(Vibraphone::new(SAMPLE_RATE, 9))),
        ("agogo", Box::new(Agogo::new(SAMPLE_RATE, 10))),
        ("bamboo", Box::new(Bamboo::new(SAMPLE_RATE, 11))),
        ("cabasa", Box::new(Cabasa::new(SAMPLE_RATE, 12))),
        ("sekere", Box::new(Sekere::new(SAMPLE_RATE, 13))),
        ("tambourine", Box::new(Tambourine::new(SAMPLE_RATE, 14))),
        ("guiro", Box::new(Guiro::new(SAMPLE_RATE, 15))),
        ("meta_shaker", Box::new(MetaShaker::new(SAMPLE_RATE, 16))),
    ]
}

/// Excite an engine the way a player would, whatever its family.
fn excite(instrument: &mut dyn Instrument) {
    instrument.set_control(Control::BreathPressure, 0.6);
    instrument.set_control(Control::MaxPressure, 0.05);
    instrument.trigger();
}

fn silence(instrument: &mut dyn Instrument) {
    instrument.set_control(Control::BreathPressure, 0.0);
    instrument.set_control(Control::MaxPressure, 0.0);
    instrument.set_control(Control::VibratoAmount, 0.0);
    instrument.set_control(Control::BowVelocity, 0.0);
    instrument.reset();
}

#[test]
fn every_engine_speaks_and_stays_finite() {
    for (name, mut engine) in all_engines() {
        excite(engine.as_mut());
        let mut buffer = vec![0.0f32; 2 * SAMPLE_RATE as usize];
        engine.render(&mut buffer);
        assert!(
            buffer.iter().all(|s| s.is_finite()),
            "{} produced non-finite samples",
            name
        );
        assert!(rms(&buffer) > 1e-8, "{} stayed silent when excited", name);
    }
}

#[test]
fn every_engine_is_silent_after_reset() {
    for (name, mut engine) in all_engines() {
        excite(engine.as_mut());
        let mut buffer = vec![0.0f32; 4096];
        engine.render(&mut buffer);

        silence(engine.as_mut());
        engine.render(&mut buffer);
        let tail = rms(&buffer);
        assert!(
            tail < 1e-6,
            "{} still sounding after reset, rms {}",
            name,
            tail
        );
    }
}

#[test]
fn frequency_sweeps_are_safe() {
    for (name, mut engine) in all_engines() {
        excite(engine.as_mut());
        let mut buffer = vec![0.0f32; 512];
        for step in 0..40 {
            engine.set_control(Control::Frequency, 25.0 + 60.0 * step as f32);
            engine.render(&mut buffer);
            assert!(
                buffer.iter().all(|s| s.is_finite()),
                "{} blew up at sweep step {}",
                name,
                step
            );
        }
    }
}

#[test]
fn seeded_engines_render_deterministically() {
    let render = || {
        let mut mandolin = Mandolin::new(SAMPLE_RATE, 77);
        mandolin.trigger();
        let mut buffer = vec![0.0f32; 4096];
        mandolin.render(&mut buffer);
        buffer
    };
    assert_eq!(render(), render());
}

#[test]
fn struck_engines_decay_toward_silence() {
    let strikers: Vec<(&str, Box<dyn Instrument>)> = vec![
        ("marimba", Box::new(Marimba::new(SAMPLE_RATE, 20)) as Box<dyn Instrument>),
        ("agogo", Box::new(Agogo::new(SAMPLE_RATE, 21))),
        ("cabasa", Box::new(Cabasa::new(SAMPLE_RATE, 22))),
        ("sekere", Box::new(Sekere::new(SAMPLE_RATE, 23))),
    ];
    for (name, mut engine) in strikers {
        engine.trigger();
        let mut early = vec![0.0f32; 8192];
        engine.render(&mut early);

        let mut late = vec![0.0f32; 8192];
        for _ in 0..100 {
            engine.render(&mut late);
        }
        assert!(
            rms(&late) < rms(&early),
            "{} did not decay ({} vs {})",
            name,
            rms(&late),
            rms(&early)
        );
    }
}
