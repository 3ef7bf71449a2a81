//! Audio cues using the Web Audio API
//!
//! Procedurally generated tones - no external files needed. Cue
//! definitions are plain data so they stay testable off-browser; only
//! playback touches `web_sys`. Every Web Audio failure is swallowed:
//! sound degrades, gameplay never notices.

use crate::sim::GameEvent;

/// Oscillator shape for a tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// One scheduled tone within a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Hz
    pub frequency: f32,
    /// Seconds after the cue starts
    pub delay: f32,
    /// Seconds the tone sustains before its envelope closes
    pub duration: f32,
    pub waveform: Waveform,
}

impl Tone {
    const fn new(frequency: f32, delay: f32, duration: f32, waveform: Waveform) -> Self {
        Self {
            frequency,
            delay,
            duration,
            waveform,
        }
    }
}

/// Named sound cues, mapped from gameplay events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Prime tapped
    CorrectTap,
    /// Composite tapped
    IncorrectTap,
    /// Combo chime; pitch rises with the streak
    Combo { level: u32 },
    LevelUp,
    PowerUp,
    GameOver,
}

/// Combo chime frequency: C5 scaled 1.2x per combo step, capped after 8
pub fn combo_frequency(combo_level: u32) -> f32 {
    523.25 * 1.2f32.powi(combo_level.min(8) as i32)
}

/// Fixed tone sequence for a cue
pub fn cue_tones(cue: Cue) -> Vec<Tone> {
    use Waveform::*;
    match cue {
        Cue::CorrectTap => vec![
            Tone::new(659.25, 0.0, 0.1, Sine),
            Tone::new(880.0, 0.08, 0.12, Sine),
        ],
        Cue::IncorrectTap => vec![Tone::new(196.0, 0.0, 0.25, Sawtooth)],
        Cue::Combo { level } => vec![Tone::new(combo_frequency(level), 0.0, 0.1, Sine)],
        Cue::LevelUp => vec![
            Tone::new(523.25, 0.0, 0.15, Triangle),
            Tone::new(659.25, 0.1, 0.15, Triangle),
            Tone::new(783.99, 0.2, 0.15, Triangle),
            Tone::new(1046.5, 0.3, 0.25, Triangle),
        ],
        Cue::PowerUp => vec![
            Tone::new(440.0, 0.0, 0.08, Square),
            Tone::new(554.37, 0.06, 0.08, Square),
            Tone::new(659.25, 0.12, 0.08, Square),
            Tone::new(880.0, 0.18, 0.2, Triangle),
        ],
        Cue::GameOver => vec![
            Tone::new(400.0, 0.0, 0.3, Sine),
            Tone::new(350.0, 0.2, 0.3, Sine),
            Tone::new(300.0, 0.4, 0.3, Sine),
            Tone::new(200.0, 0.6, 0.4, Sine),
        ],
    }
}

/// Cues triggered by a gameplay event, in play order
pub fn cues_for_event(event: &GameEvent) -> Vec<Cue> {
    match event {
        GameEvent::CorrectTap { combo, .. } => {
            if *combo >= 2 {
                vec![Cue::CorrectTap, Cue::Combo { level: *combo }]
            } else {
                vec![Cue::CorrectTap]
            }
        }
        GameEvent::IncorrectTap { .. } => vec![Cue::IncorrectTap],
        GameEvent::LevelUp { .. } => vec![Cue::LevelUp],
        GameEvent::PowerUpActivated(_) => vec![Cue::PowerUp],
        GameEvent::GameOver { .. } => vec![Cue::GameOver],
    }
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<web_sys::AudioContext>,
    enabled: bool,
}

impl AudioManager {
    pub fn new(enabled: bool) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            // May fail outside a secure context; sound is then disabled
            // for the whole run, independent of the user preference
            let ctx = web_sys::AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, enabled }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self { enabled }
        }
    }

    /// Apply the persisted sound preference
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Play every cue an event maps to
    pub fn play_event(&self, event: &GameEvent) {
        for cue in cues_for_event(event) {
            self.play(cue);
        }
    }

    /// Schedule a cue's tones. No-op when sound is off or the backend
    /// is unavailable.
    #[cfg(target_arch = "wasm32")]
    pub fn play(&self, cue: Cue) {
        if !self.enabled {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Browsers suspend the context until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        for tone in cue_tones(cue) {
            self.schedule_tone(ctx, &tone);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn play(&self, _cue: Cue) {}

    #[cfg(target_arch = "wasm32")]
    fn schedule_tone(&self, ctx: &web_sys::AudioContext, tone: &Tone) {
        use web_sys::OscillatorType;

        let Ok(osc) = ctx.create_oscillator() else {
            return;
        };
        let Ok(gain) = ctx.create_gain() else { return };

        osc.set_type(match tone.waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
            Waveform::Triangle => OscillatorType::Triangle,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
        });
        osc.frequency().set_value(tone.frequency);
        if osc.connect_with_audio_node(&gain).is_err() {
            return;
        }
        if gain.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }

        let t = ctx.current_time() + tone.delay as f64;
        gain.gain().set_value_at_time(0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + tone.duration as f64)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + tone.duration as f64 + 0.05).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_frequency_scaling() {
        assert!((combo_frequency(0) - 523.25).abs() < f32::EPSILON);
        assert!((combo_frequency(1) - 523.25 * 1.2).abs() < 0.01);
        // Capped after 8 steps
        assert_eq!(combo_frequency(8), combo_frequency(9));
        assert_eq!(combo_frequency(8), combo_frequency(100));
    }

    #[test]
    fn test_cue_tones_are_ordered() {
        for cue in [
            Cue::CorrectTap,
            Cue::IncorrectTap,
            Cue::Combo { level: 3 },
            Cue::LevelUp,
            Cue::PowerUp,
            Cue::GameOver,
        ] {
            let tones = cue_tones(cue);
            assert!(!tones.is_empty());
            assert!(tones.windows(2).all(|w| w[0].delay <= w[1].delay));
            assert!(tones.iter().all(|t| t.frequency > 0.0 && t.duration > 0.0));
        }
    }

    #[test]
    fn test_combo_cue_follows_streak() {
        let first = GameEvent::CorrectTap {
            value: 7,
            points: 10,
            multiplier: 1,
            combo: 1,
        };
        assert_eq!(cues_for_event(&first), vec![Cue::CorrectTap]);

        let streak = GameEvent::CorrectTap {
            value: 7,
            points: 10,
            multiplier: 1,
            combo: 3,
        };
        assert_eq!(
            cues_for_event(&streak),
            vec![Cue::CorrectTap, Cue::Combo { level: 3 }]
        );
    }

    #[test]
    fn test_disabled_play_is_noop() {
        let mut audio = AudioManager::new(false);
        audio.play(Cue::CorrectTap);
        audio.set_enabled(true);
        assert!(audio.enabled());
    }
}
