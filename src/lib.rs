//! Prime Number Popper - a bubble-tapping arcade game
//!
//! Core modules:
//! - `sim`: Deterministic game engine (bubbles, scoring, session state machine)
//! - `audio`: Procedural sound cues via Web Audio
//! - `haptics`: Best-effort vibration feedback
//! - `settings`: Persisted sound preference
//! - `highscores`: Persisted best score

pub mod audio;
pub mod haptics;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Countdown timer cadence (seconds)
    pub const COUNTDOWN_INTERVAL_SECS: u32 = 1;
    /// Replenish-spawn cadence (seconds)
    pub const SPAWN_INTERVAL_SECS: u32 = 3;
    /// Delay between a bubble popping and its removal/replacement (seconds)
    pub const SETTLE_DELAY_SECS: f32 = 0.5;

    /// Bubbles seeded at session start, regardless of difficulty
    pub const INITIAL_BUBBLES: usize = 5;

    /// Bubble radius range, as a fraction of the arena edge
    pub const BUBBLE_RADIUS_MIN: f32 = 0.03;
    pub const BUBBLE_RADIUS_MAX: f32 = 0.045;
    /// Spawn positions are drawn from the inset square [INSET, 1-INSET]²
    /// so fresh bubbles never clip the arena edge
    pub const SPAWN_INSET: f32 = 0.1;
    /// Velocity components are uniform in [-RANGE, RANGE] * speed multiplier
    /// (arena fractions per second)
    pub const VELOCITY_RANGE: f32 = 0.75;

    /// Points awarded per prime tap, before the combo multiplier
    pub const PRIME_POINTS: u32 = 10;
    /// Points lost on a composite tap (score floors at 0)
    pub const WRONG_TAP_PENALTY: u32 = 5;
    /// Level-up threshold step: level up when score >= level * STEP
    pub const LEVEL_UP_STEP: u32 = 50;
    /// Combo taps per extra multiplier step: multiplier = combo/STRIDE + 1
    pub const COMBO_MULT_STRIDE: u32 = 3;

    /// Combo value that arms the slow-time power-up
    pub const SLOW_TIME_COMBO: u32 = 5;
    /// Combo value that arms the prime-highlight power-up
    pub const HIGHLIGHT_COMBO: u32 = 10;
    /// Slow-time window (seconds)
    pub const SLOW_TIME_SECS: f32 = 10.0;
    /// Prime-highlight window (seconds)
    pub const HIGHLIGHT_SECS: f32 = 15.0;
    /// Spawn speed multiplier while slow-time is active
    pub const SLOW_TIME_MULTIPLIER: f32 = 0.3;

    /// Hue used for prime bubbles while the highlight power-up is active
    pub const PRIME_HUE: f32 = 120.0;
}
