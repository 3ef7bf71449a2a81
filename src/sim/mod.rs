//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick-driven only (countdown, spawn, and frame cadences)
//! - Seeded RNG only
//! - Stable entity ids (monotonic counter)
//! - No rendering or platform dependencies

pub mod bubbles;
pub mod prime;
pub mod scoring;
pub mod session;
pub mod state;

pub use bubbles::{Bubble, BubbleField, BubbleState, SpawnParams};
pub use prime::{is_prime, prime_factors};
pub use state::{Difficulty, GameEvent, GamePhase, GameSession, PopOutcome, PowerUpKind, PowerUps};
