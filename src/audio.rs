//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Each effect is a single oscillator described by a `Tone`; the browser
//! side only turns tones into nodes.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ground or double jump
    Jump,
    /// Run-ending crash
    Collision,
    /// Power-up collected
    PowerUp,
    /// Obstacle cleared
    Score,
    /// Slide started
    Slide,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jump | GameEvent::DoubleJump => Some(SoundEffect::Jump),
            GameEvent::SlideStart => Some(SoundEffect::Slide),
            GameEvent::ObstaclePassed { .. } => Some(SoundEffect::Score),
            GameEvent::PowerUpCollected(_) => Some(SoundEffect::PowerUp),
            GameEvent::Collision => Some(SoundEffect::Collision),
            GameEvent::PowerUpExpired(_) | GameEvent::ThemeChanged { .. } => None,
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            SoundEffect::Jump => Tone {
                waveform: Waveform::Sine,
                start_hz: 300.0,
                end_hz: 200.0,
                sweep: Sweep::Exponential,
                gain: 0.3,
                duration: 0.1,
            },
            SoundEffect::Collision => Tone {
                waveform: Waveform::Sawtooth,
                start_hz: 150.0,
                end_hz: 50.0,
                sweep: Sweep::Exponential,
                gain: 0.4,
                duration: 0.3,
            },
            SoundEffect::PowerUp => Tone {
                waveform: Waveform::Sine,
                start_hz: 400.0,
                end_hz: 600.0,
                sweep: Sweep::Exponential,
                gain: 0.3,
                duration: 0.2,
            },
            // Two-note blip: jumps up halfway through
            SoundEffect::Score => Tone {
                waveform: Waveform::Square,
                start_hz: 600.0,
                end_hz: 800.0,
                sweep: Sweep::Step,
                gain: 0.2,
                duration: 0.1,
            },
            SoundEffect::Slide => Tone {
                waveform: Waveform::Triangle,
                start_hz: 200.0,
                end_hz: 100.0,
                sweep: Sweep::Exponential,
                gain: 0.2,
                duration: 0.15,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// How the pitch moves from `start_hz` to `end_hz`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    Exponential,
    /// Jump to the end pitch at the midpoint
    Step,
}

/// One oscillator with a decaying gain envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    pub sweep: Sweep,
    /// Peak gain before master volume
    pub gain: f32,
    /// Seconds
    pub duration: f64,
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, Sweep, Tone, Waveform};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        /// Output volume; 0 while audio is switched off
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Pick up the enable toggle and master volume
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
            if self.volume > 0.0 {
                self.resume();
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            self.play_tone(ctx, effect.tone(), self.volume);
        }

        /// Create an oscillator routed through its own gain node
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn play_tone(&self, ctx: &AudioContext, tone: Tone, vol: f32) {
            let osc_type = match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            };
            let Some((osc, gain)) = self.create_osc(ctx, tone.start_hz, osc_type) else {
                return;
            };
            let t = ctx.current_time();
            let end = t + tone.duration;

            gain.gain().set_value_at_time(tone.gain * vol, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();

            osc.frequency().set_value_at_time(tone.start_hz, t).ok();
            match tone.sweep {
                Sweep::Exponential => {
                    osc.frequency()
                        .exponential_ramp_to_value_at_time(tone.end_hz, end)
                        .ok();
                }
                Sweep::Step => {
                    osc.frequency()
                        .set_value_at_time(tone.end_hz, t + tone.duration / 2.0)
                        .ok();
                }
            }

            osc.start().ok();
            osc.stop_with_when(end).ok();
        }
    }
}
