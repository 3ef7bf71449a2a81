//! Scoring, combo progression, and power-up triggers
//!
//! A tap mutates only the progression fields of the session (score,
//! level, combo, power-up windows) and emits events for the presentation
//! adapter. Bubble state is handled by the caller.

use crate::consts::*;

use super::prime::{is_prime, prime_factors};
use super::state::{GameEvent, GameSession, PopOutcome, PowerUpKind};

/// Apply a tapped bubble value to the session.
///
/// Prime: score rises by `10 * (combo/3 + 1)` (multiplier from the
/// pre-increment combo), the combo advances, and the post-tap score is
/// checked against the level threshold. Composite or 1: the score drops
/// by 5 (floored at 0) and the combo breaks.
pub fn on_tap(value: u32, s: &mut GameSession) -> (PopOutcome, Vec<GameEvent>) {
    let mut events = Vec::new();

    if is_prime(value) {
        let multiplier = s.combo / COMBO_MULT_STRIDE + 1;
        let points = PRIME_POINTS * multiplier;
        s.score += points;
        s.combo += 1;
        s.max_combo = s.max_combo.max(s.combo);
        events.push(GameEvent::CorrectTap {
            value,
            points,
            multiplier,
            combo: s.combo,
        });

        // Level-up evaluates the post-tap score; levels never reverse
        if s.score >= s.level * LEVEL_UP_STEP {
            s.level += 1;
            events.push(GameEvent::LevelUp { level: s.level });
        }

        // Edge-triggered on the exact combo value, not >= comparisons,
        // so a window arms once per crossing
        if s.combo == SLOW_TIME_COMBO {
            s.power_ups.slow_time_left = SLOW_TIME_SECS;
            events.push(GameEvent::PowerUpActivated(PowerUpKind::SlowTime));
        }
        if s.combo == HIGHLIGHT_COMBO {
            s.power_ups.highlight_left = HIGHLIGHT_SECS;
            events.push(GameEvent::PowerUpActivated(PowerUpKind::HighlightPrimes));
        }

        (PopOutcome::Correct, events)
    } else {
        s.score = s.score.saturating_sub(WRONG_TAP_PENALTY);
        s.combo = 0;
        events.push(GameEvent::IncorrectTap {
            value,
            factors: prime_factors(value),
        });
        (PopOutcome::Incorrect, events)
    }
}
