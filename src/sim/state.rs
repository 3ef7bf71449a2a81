//! Session state and core simulation types

use super::bubbles::BubbleField;

/// Current phase of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Showing the how-to-play screen; initial state, re-entered on quit
    Instructions,
    /// Active gameplay
    Running,
    /// Gameplay frozen; no clock or physics advances
    Paused,
    /// Session ended; state is immutable until restart
    Over,
}

/// Session difficulty, fixed once a session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Session length in seconds
    pub fn time_limit_secs(&self) -> u32 {
        match self {
            Difficulty::Easy => 90,
            Difficulty::Medium => 60,
            Difficulty::Hard => 45,
        }
    }

    /// Base bubble speed multiplier
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 2.0,
        }
    }

    /// Active bubble population cap
    pub fn bubble_cap(&self) -> usize {
        match self {
            Difficulty::Easy => 6,
            Difficulty::Medium => 8,
            Difficulty::Hard => 10,
        }
    }
}

/// Result of classifying a tapped bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopOutcome {
    Correct,
    Incorrect,
}

/// Timed global modifiers unlocked by combo thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    SlowTime,
    HighlightPrimes,
}

/// Active power-up windows, each an independent fire-once countdown.
///
/// A combo reset does not cancel an armed window; re-arming while active
/// just refreshes the remaining time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PowerUps {
    /// Seconds of slow-time remaining (0 = inactive)
    pub slow_time_left: f32,
    /// Seconds of prime highlighting remaining (0 = inactive)
    pub highlight_left: f32,
}

impl PowerUps {
    pub fn slow_time_active(&self) -> bool {
        self.slow_time_left > 0.0
    }

    pub fn highlight_active(&self) -> bool {
        self.highlight_left > 0.0
    }

    /// Count both windows down; frame-driven, so pausing freezes them
    pub fn advance(&mut self, dt: f32) {
        self.slow_time_left = (self.slow_time_left - dt).max(0.0);
        self.highlight_left = (self.highlight_left - dt).max(0.0);
    }
}

/// Progression events emitted by taps and ticks, consumed by the
/// presentation adapter for messages, audio cues, and haptics.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Prime tapped
    CorrectTap {
        value: u32,
        points: u32,
        multiplier: u32,
        combo: u32,
    },
    /// Composite (or 1) tapped; factors feed the explanation message
    IncorrectTap { value: u32, factors: Vec<u32> },
    /// Score crossed the level threshold
    LevelUp { level: u32 },
    /// A combo threshold armed a power-up window
    PowerUpActivated(PowerUpKind),
    /// Countdown reached zero
    GameOver {
        score: u32,
        level: u32,
        max_combo: u32,
    },
}

/// Complete per-play state, mutated only through the session's
/// sequential tick and tap methods.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    /// Floored at 0, never negative
    pub score: u32,
    /// Monotonically non-decreasing within a session, starts at 1
    pub level: u32,
    /// Whole seconds; strictly decreasing to 0 while running
    pub time_remaining: u32,
    /// Consecutive correct taps since the last incorrect tap
    pub combo: u32,
    /// High-water mark of `combo`
    pub max_combo: u32,
    pub power_ups: PowerUps,
    /// Bubble population, id allocation, and session RNG
    pub bubbles: BubbleField,
}

impl GameSession {
    /// Create an idle session showing the instructions screen
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Instructions,
            difficulty: Difficulty::default(),
            score: 0,
            level: 1,
            time_remaining: 0,
            combo: 0,
            max_combo: 0,
            power_ups: PowerUps::default(),
            bubbles: BubbleField::new(seed),
        }
    }

    /// Parameters consumed by every spawn in the current state
    pub fn spawn_params(&self) -> super::bubbles::SpawnParams {
        super::bubbles::SpawnParams {
            level: self.level,
            difficulty: self.difficulty,
            slow_time: self.power_ups.slow_time_active(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_table() {
        assert_eq!(Difficulty::Easy.time_limit_secs(), 90);
        assert_eq!(Difficulty::Medium.time_limit_secs(), 60);
        assert_eq!(Difficulty::Hard.time_limit_secs(), 45);
        assert_eq!(Difficulty::Easy.bubble_cap(), 6);
        assert_eq!(Difficulty::Medium.bubble_cap(), 8);
        assert_eq!(Difficulty::Hard.bubble_cap(), 10);
        assert!(Difficulty::Easy.speed_multiplier() < Difficulty::Medium.speed_multiplier());
        assert!(Difficulty::Medium.speed_multiplier() < Difficulty::Hard.speed_multiplier());
    }

    #[test]
    fn test_difficulty_round_trip() {
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_power_up_windows_independent() {
        let mut p = PowerUps {
            slow_time_left: 1.0,
            highlight_left: 3.0,
        };
        p.advance(2.0);
        assert!(!p.slow_time_active());
        assert!(p.highlight_active());
        p.advance(2.0);
        assert!(!p.highlight_active());
        // Never goes negative
        assert_eq!(p.slow_time_left, 0.0);
    }
}
