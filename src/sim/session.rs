//! Session state machine
//!
//! Three periodic drivers feed a running session: a 1-second countdown,
//! a 3-second replenish spawn, and the continuous frame step. All three
//! are no-ops outside `Running`, so pausing freezes the clock, the
//! physics, and every pending settle/power-up countdown with no catch-up
//! on resume. The presentation adapter owns the timer handles; the sim
//! stays pure.

use crate::consts::*;

use super::scoring;
use super::state::{Difficulty, GameEvent, GamePhase, GameSession};

impl GameSession {
    /// `Instructions|Over -> Running`: reset progression, arm the clock
    /// from the difficulty table, seed the opening population.
    pub fn start(&mut self, difficulty: Difficulty) {
        if !matches!(self.phase, GamePhase::Instructions | GamePhase::Over) {
            return;
        }
        self.difficulty = difficulty;
        self.score = 0;
        self.level = 1;
        self.combo = 0;
        self.max_combo = 0;
        self.power_ups = Default::default();
        self.time_remaining = difficulty.time_limit_secs();
        self.bubbles.clear();
        let params = self.spawn_params();
        for _ in 0..INITIAL_BUBBLES {
            self.bubbles.spawn(params);
        }
        self.phase = GamePhase::Running;
        log::info!("session started: {} ({}s)", difficulty.as_str(), self.time_remaining);
    }

    /// 1-second cadence: count the clock down; at zero the session ends
    /// and every later tick is inert.
    pub fn countdown_tick(&mut self) -> Vec<GameEvent> {
        if self.phase != GamePhase::Running {
            return Vec::new();
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.phase = GamePhase::Over;
            log::info!("time up: score {} level {}", self.score, self.level);
            return vec![GameEvent::GameOver {
                score: self.score,
                level: self.level,
                max_combo: self.max_combo,
            }];
        }
        Vec::new()
    }

    /// 3-second cadence: top the population back up to the difficulty cap.
    pub fn spawn_tick(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        let params = self.spawn_params();
        self.bubbles
            .maintain_population(self.difficulty.bubble_cap(), params);
    }

    /// Continuous cadence: power-up expiry, motion, settle countdowns.
    pub fn frame_tick(&mut self, dt: f32) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.power_ups.advance(dt);
        self.bubbles.step(dt);
        let params = self.spawn_params();
        self.bubbles.settle(dt, params);
    }

    /// Route a tap on `id` through classification and pop the bubble.
    /// Ignored while paused; a no-op for ids that are not Active.
    pub fn tap(&mut self, id: u32) -> Vec<GameEvent> {
        if self.phase != GamePhase::Running {
            return Vec::new();
        }
        let Some(value) = self.bubbles.active_value(id) else {
            return Vec::new();
        };
        let (outcome, events) = scoring::on_tap(value, self);
        self.bubbles.mark_popping(id, outcome);
        events
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
        }
    }

    /// `Running|Over -> Instructions`, discarding session state.
    pub fn quit(&mut self) {
        if matches!(self.phase, GamePhase::Running | GamePhase::Over | GamePhase::Paused) {
            self.bubbles.clear();
            self.phase = GamePhase::Instructions;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bubbles::{Bubble, BubbleState};
    use crate::sim::state::PopOutcome;
    use glam::Vec2;

    const FRAME_DT: f32 = 1.0 / 60.0;

    fn running_session() -> GameSession {
        let mut s = GameSession::new(42);
        s.start(Difficulty::Medium);
        s
    }

    /// Push a bubble with a known value so taps are deterministic
    fn inject(s: &mut GameSession, id: u32, value: u32) {
        s.bubbles.bubbles.push(Bubble {
            id,
            value,
            radius: 0.04,
            pos: Vec2::new(0.5, 0.5),
            vel: Vec2::new(0.1, 0.1),
            hue: 40.0,
            state: BubbleState::Active,
        });
    }

    #[test]
    fn test_start_seeds_five_bubbles() {
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let mut s = GameSession::new(1);
            s.start(d);
            assert_eq!(s.phase, GamePhase::Running);
            assert_eq!(s.bubbles.active_count(), 5);
            assert_eq!(s.time_remaining, d.time_limit_secs());
        }
    }

    #[test]
    fn test_start_ignored_while_running() {
        let mut s = running_session();
        s.score = 30;
        s.start(Difficulty::Hard);
        assert_eq!(s.score, 30);
        assert_eq!(s.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_restart_from_over_resets_everything() {
        let mut s = running_session();
        s.score = 120;
        s.combo = 4;
        s.max_combo = 9;
        s.level = 3;
        s.time_remaining = 1;
        s.countdown_tick();
        assert_eq!(s.phase, GamePhase::Over);

        s.start(Difficulty::Hard);
        assert_eq!(s.phase, GamePhase::Running);
        assert_eq!(s.score, 0);
        assert_eq!(s.level, 1);
        assert_eq!(s.combo, 0);
        assert_eq!(s.max_combo, 0);
        assert_eq!(s.time_remaining, 45);
        assert!(!s.power_ups.slow_time_active());
    }

    #[test]
    fn test_countdown_reaches_over_and_halts() {
        let mut s = running_session();
        s.time_remaining = 2;

        assert!(s.countdown_tick().is_empty());
        let events = s.countdown_tick();
        assert_eq!(s.phase, GamePhase::Over);
        assert!(matches!(events[0], GameEvent::GameOver { .. }));

        // Late-firing drivers mutate nothing after Over
        let snapshot = s.clone();
        s.countdown_tick();
        s.spawn_tick();
        s.frame_tick(FRAME_DT);
        assert!(s.tap(1).is_empty());
        assert_eq!(s.time_remaining, snapshot.time_remaining);
        assert_eq!(s.bubbles.bubbles, snapshot.bubbles.bubbles);
        assert_eq!(s.score, snapshot.score);
    }

    #[test]
    fn test_spawn_tick_tops_up_to_cap() {
        let mut s = running_session();
        assert_eq!(s.bubbles.active_count(), 5);
        s.spawn_tick();
        assert_eq!(s.bubbles.active_count(), Difficulty::Medium.bubble_cap());
        // Stable once at cap
        s.spawn_tick();
        assert_eq!(s.bubbles.active_count(), 8);
    }

    #[test]
    fn test_tap_pops_and_scores() {
        let mut s = running_session();
        inject(&mut s, 100, 7);

        let events = s.tap(100);
        assert!(!events.is_empty());
        assert_eq!(s.score, 10);
        assert!(s.bubbles.active_value(100).is_none());

        // Double tap on the now-popping bubble is a no-op
        assert!(s.tap(100).is_empty());
        assert_eq!(s.score, 10);
    }

    #[test]
    fn test_tap_unknown_id_is_noop() {
        let mut s = running_session();
        let before = s.clone();
        assert!(s.tap(9999).is_empty());
        assert_eq!(s.score, before.score);
        assert_eq!(s.combo, before.combo);
    }

    #[test]
    fn test_tap_ignored_while_paused() {
        let mut s = running_session();
        inject(&mut s, 100, 7);
        s.pause();
        assert!(s.tap(100).is_empty());
        assert_eq!(s.score, 0);
        s.resume();
        assert!(!s.tap(100).is_empty());
    }

    #[test]
    fn test_pause_invariance_is_bit_exact() {
        let mut s = running_session();
        for _ in 0..30 {
            s.frame_tick(FRAME_DT);
        }
        let positions: Vec<Vec2> = s.bubbles.iter().map(|b| b.pos).collect();
        let time = s.time_remaining;

        s.pause();
        // Drivers firing while paused must not advance anything
        s.frame_tick(FRAME_DT);
        s.countdown_tick();
        s.spawn_tick();
        s.resume();

        let after: Vec<Vec2> = s.bubbles.iter().map(|b| b.pos).collect();
        assert_eq!(positions, after);
        assert_eq!(time, s.time_remaining);
    }

    #[test]
    fn test_settle_cycle_replaces_popped_bubble() {
        let mut s = running_session();
        inject(&mut s, 100, 7);
        let total = s.bubbles.bubbles.len();
        s.tap(100);

        // Walk frame ticks past the settle delay
        let frames = (SETTLE_DELAY_SECS / FRAME_DT).ceil() as usize + 1;
        for _ in 0..frames {
            s.frame_tick(FRAME_DT);
        }
        assert_eq!(s.bubbles.bubbles.len(), total);
        assert!(s.bubbles.bubbles.iter().all(|b| b.id != 100));
        assert_eq!(s.bubbles.active_count(), total);
    }

    #[test]
    fn test_pause_freezes_settle_delay() {
        let mut s = running_session();
        inject(&mut s, 100, 7);
        s.tap(100);
        s.pause();
        for _ in 0..120 {
            s.frame_tick(FRAME_DT);
        }
        // Two seconds of wall time passed, the popping bubble is still here
        assert!(s.bubbles.bubbles.iter().any(|b| b.id == 100));
        s.resume();
        for _ in 0..40 {
            s.frame_tick(FRAME_DT);
        }
        assert!(s.bubbles.bubbles.iter().all(|b| b.id != 100));
    }

    #[test]
    fn test_power_up_expires_via_frame_ticks() {
        let mut s = running_session();
        s.power_ups.slow_time_left = 0.1;
        for _ in 0..12 {
            s.frame_tick(FRAME_DT);
        }
        assert!(!s.power_ups.slow_time_active());
    }

    #[test]
    fn test_quit_discards_session() {
        let mut s = running_session();
        s.score = 70;
        s.quit();
        assert_eq!(s.phase, GamePhase::Instructions);
        assert_eq!(s.bubbles.bubbles.len(), 0);

        // And from Over
        let mut s = running_session();
        s.time_remaining = 1;
        s.countdown_tick();
        s.quit();
        assert_eq!(s.phase, GamePhase::Instructions);
    }

    #[test]
    fn test_highlight_hue_is_cosmetic() {
        let mut s = running_session();
        inject(&mut s, 100, 7);
        inject(&mut s, 101, 8);
        let prime = s.bubbles.iter().find(|b| b.id == 100).unwrap().clone();
        let composite = s.bubbles.iter().find(|b| b.id == 101).unwrap().clone();

        assert_eq!(prime.display_hue(false), prime.hue);
        assert_eq!(prime.display_hue(true), crate::consts::PRIME_HUE);
        assert_eq!(composite.display_hue(true), composite.hue);

        // Highlight never changes scoring
        s.power_ups.highlight_left = 15.0;
        s.tap(101);
        assert_eq!(s.combo, 0);
    }

    #[test]
    fn test_popping_marks_outcome_for_feedback() {
        let mut s = running_session();
        inject(&mut s, 100, 9);
        s.tap(100);
        let b = s.bubbles.bubbles.iter().find(|b| b.id == 100).unwrap();
        assert!(matches!(
            b.state,
            BubbleState::Popping {
                outcome: PopOutcome::Incorrect,
                ..
            }
        ));
    }
}
