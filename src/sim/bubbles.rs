//! Bubble lifecycle and motion
//!
//! `BubbleField` owns the bubble population, the monotonic id counter,
//! and the session RNG. The arena is the unit square; positions and radii
//! are arena fractions, velocities are arena fractions per second.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;

use super::prime::is_prime;
use super::state::{Difficulty, PopOutcome};

/// Bubble lifecycle state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BubbleState {
    /// Drifting and tappable
    Active,
    /// Tapped; frozen in place until the settle countdown elapses
    Popping {
        outcome: PopOutcome,
        settle_left: f32,
    },
}

/// A transient on-screen entity carrying one integer value
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    /// Unique within a session, stable for the bubble's lifetime
    pub id: u32,
    /// Integer in [1, level*10], classified on tap
    pub value: u32,
    /// Arena-fraction radius
    pub radius: f32,
    /// Center, in [0,1]²
    pub pos: Vec2,
    /// Arena fractions per second
    pub vel: Vec2,
    /// Randomized hue in [0, 360)
    pub hue: f32,
    pub state: BubbleState,
}

impl Bubble {
    pub fn is_active(&self) -> bool {
        self.state == BubbleState::Active
    }

    /// Hue to render with. Overridden to the fixed prime hue while the
    /// highlight power-up is active; cosmetic only, never affects scoring.
    pub fn display_hue(&self, highlight_primes: bool) -> f32 {
        if highlight_primes && is_prime(self.value) {
            PRIME_HUE
        } else {
            self.hue
        }
    }
}

/// Inputs every spawn draws from
#[derive(Debug, Clone, Copy)]
pub struct SpawnParams {
    pub level: u32,
    pub difficulty: Difficulty,
    /// Slow-time power-up active (overrides the difficulty base speed)
    pub slow_time: bool,
}

impl SpawnParams {
    fn speed_multiplier(&self) -> f32 {
        if self.slow_time {
            SLOW_TIME_MULTIPLIER
        } else {
            self.difficulty.speed_multiplier()
        }
    }
}

/// The bubble population and its spawn machinery
#[derive(Debug, Clone)]
pub struct BubbleField {
    pub bubbles: Vec<Bubble>,
    rng: Pcg32,
    next_id: u32,
}

impl BubbleField {
    pub fn new(seed: u64) -> Self {
        Self {
            bubbles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity id
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Bubbles currently tappable
    pub fn active_count(&self) -> usize {
        self.bubbles.iter().filter(|b| b.is_active()).count()
    }

    /// Value of the bubble with `id`, if it is still Active
    pub fn active_value(&self, id: u32) -> Option<u32> {
        self.bubbles
            .iter()
            .find(|b| b.id == id && b.is_active())
            .map(|b| b.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bubble> {
        self.bubbles.iter()
    }

    pub fn clear(&mut self) {
        self.bubbles.clear();
    }

    /// Draw and append one fresh bubble
    pub fn spawn(&mut self, params: SpawnParams) {
        let id = self.next_entity_id();
        let max_value = params.level * 10;
        let value = self.rng.random_range(1..=max_value);
        let radius = self.rng.random_range(BUBBLE_RADIUS_MIN..=BUBBLE_RADIUS_MAX);
        let pos = Vec2::new(
            self.rng.random_range(SPAWN_INSET..=1.0 - SPAWN_INSET),
            self.rng.random_range(SPAWN_INSET..=1.0 - SPAWN_INSET),
        );
        let speed = params.speed_multiplier();
        let vel = Vec2::new(
            self.rng.random_range(-VELOCITY_RANGE..=VELOCITY_RANGE) * speed,
            self.rng.random_range(-VELOCITY_RANGE..=VELOCITY_RANGE) * speed,
        );
        let hue = self.rng.random_range(0.0..360.0);

        self.bubbles.push(Bubble {
            id,
            value,
            radius,
            pos,
            vel,
            hue,
            state: BubbleState::Active,
        });
    }

    /// Integrate Active bubbles and bounce them off the arena edges.
    ///
    /// The bounce is elastic and lossless: the violating velocity
    /// component flips sign and the position is clamped back in bounds.
    /// Popping bubbles do not move.
    pub fn step(&mut self, dt: f32) {
        for b in self.bubbles.iter_mut().filter(|b| b.is_active()) {
            b.pos += b.vel * dt;

            if b.pos.x - b.radius < 0.0 {
                b.pos.x = b.radius;
                b.vel.x = -b.vel.x;
            } else if b.pos.x + b.radius > 1.0 {
                b.pos.x = 1.0 - b.radius;
                b.vel.x = -b.vel.x;
            }
            if b.pos.y - b.radius < 0.0 {
                b.pos.y = b.radius;
                b.vel.y = -b.vel.y;
            } else if b.pos.y + b.radius > 1.0 {
                b.pos.y = 1.0 - b.radius;
                b.vel.y = -b.vel.y;
            }
        }
    }

    /// Transition one Active bubble to Popping. Returns false (and does
    /// nothing) if the id is missing or already popping, which absorbs
    /// double-taps and taps racing with removal.
    pub fn mark_popping(&mut self, id: u32, outcome: PopOutcome) -> bool {
        match self.bubbles.iter_mut().find(|b| b.id == id && b.is_active()) {
            Some(b) => {
                b.state = BubbleState::Popping {
                    outcome,
                    settle_left: SETTLE_DELAY_SECS,
                };
                true
            }
            None => false,
        }
    }

    /// Remove the popping bubble with `id` and append one fresh spawn.
    /// Idempotent: a no-op if the bubble is gone or not popping.
    pub fn retire_and_replenish(&mut self, id: u32, params: SpawnParams) {
        let popping = self
            .bubbles
            .iter()
            .position(|b| b.id == id && matches!(b.state, BubbleState::Popping { .. }));
        if let Some(idx) = popping {
            self.bubbles.remove(idx);
            self.spawn(params);
        }
    }

    /// Count down settle delays and retire bubbles whose delay elapsed.
    /// Each retirement replenishes exactly one bubble, conserving the
    /// population across a pop.
    pub fn settle(&mut self, dt: f32, params: SpawnParams) {
        let mut elapsed = Vec::new();
        for b in &mut self.bubbles {
            if let BubbleState::Popping {
                ref mut settle_left,
                ..
            } = b.state
            {
                *settle_left -= dt;
                if *settle_left <= 0.0 {
                    elapsed.push(b.id);
                }
            }
        }
        for id in elapsed {
            self.retire_and_replenish(id, params);
        }
    }

    /// Append spawns until the Active count reaches `target`. Never
    /// removes bubbles to shrink the population.
    pub fn maintain_population(&mut self, target: usize, params: SpawnParams) {
        while self.active_count() < target {
            self.spawn(params);
        }
    }
}
