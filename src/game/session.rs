//! Per-player game session state.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::game::catalog::{self, Strategem};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    NotStarted,
    /// Waiting for the answer to this round (0-based).
    Round(usize),
    Completed,
    Elapsed,
}

/// One solved round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub round: usize,
    /// Time from the prompt being up to the correct answer arriving.
    pub elapsed: Duration,
}

/// A single player's run through a set of strategems.
///
/// Only the runner driving the game mutates it. Resolutions are append-only
/// and never outnumber the strategems.
#[derive(Debug)]
pub struct StrategemGame {
    pub owner: i64,
    pub strategems: Vec<&'static Strategem>,
    resolutions: Vec<Resolution>,
    state: GameState,
    pub start_time: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Seconds taken off the total. Always zero for now.
    total_reductions: f64,
}

impl StrategemGame {
    /// Pick `rounds` random strategems for `owner`. The caller clamps `rounds`.
    pub fn new<R: Rng + ?Sized>(owner: i64, rounds: usize, rng: &mut R) -> Self {
        Self::with_strategems(owner, catalog::choose_random(rounds, rng))
    }

    pub fn with_strategems(owner: i64, strategems: Vec<&'static Strategem>) -> Self {
        Self {
            owner,
            strategems,
            resolutions: Vec::new(),
            state: GameState::NotStarted,
            start_time: None,
            last_success: None,
            end_time: None,
            total_reductions: 0.0,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    pub fn rounds(&self) -> usize {
        self.strategems.len()
    }

    /// Enter round 0.
    pub fn begin(&mut self, now: DateTime<Utc>) {
        debug_assert_eq!(self.state, GameState::NotStarted);
        self.start_time = Some(now);
        self.last_success = Some(now);
        self.state = if self.strategems.is_empty() {
            self.end_time = Some(now);
            GameState::Completed
        } else {
            GameState::Round(0)
        };
    }

    /// Record the current round as solved and advance.
    ///
    /// Returns the state the game moved to. Outside a round this is a no-op.
    pub fn record_success(&mut self, elapsed: Duration, now: DateTime<Utc>) -> GameState {
        let GameState::Round(round) = self.state else {
            return self.state;
        };
        self.resolutions.push(Resolution { round, elapsed });
        self.last_success = Some(now);
        self.state = if round + 1 < self.strategems.len() {
            GameState::Round(round + 1)
        } else {
            self.end_time = Some(now);
            GameState::Completed
        };
        self.state
    }

    /// The global deadline ran out.
    pub fn elapse(&mut self, now: DateTime<Utc>) {
        if matches!(self.state, GameState::Completed | GameState::Elapsed) {
            return;
        }
        self.end_time = Some(now);
        self.state = GameState::Elapsed;
    }

    /// Strategem the player is currently expected to enter.
    pub fn current(&self) -> Option<&'static Strategem> {
        match self.state {
            GameState::Round(i) => self.strategems.get(i).copied(),
            _ => None,
        }
    }

    /// Sum of round times minus reductions, in seconds to 2 places.
    pub fn total_time(&self) -> f64 {
        let sum: f64 = self.resolutions.iter().map(|r| r.elapsed.as_secs_f64()).sum();
        round2(sum - self.total_reductions)
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
