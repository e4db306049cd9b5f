//! Host lifecycle state.
//!
//! # State Transitions
//! ```text
//! Initializing → Ready → ShuttingDown → Stopped
//! Initializing ─────────→ ShuttingDown
//! ```
//! Transitions only move forward.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::Serialize;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Initializing = 0,
    Ready = 1,
    ShuttingDown = 2,
    Stopped = 3,
}

impl From<u8> for LifecycleState {
    fn from(val: u8) -> Self {
        match val {
            1 => LifecycleState::Ready,
            2 => LifecycleState::ShuttingDown,
            3 => LifecycleState::Stopped,
            _ => LifecycleState::Initializing,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LifecycleState::Initializing => "initializing",
            LifecycleState::Ready => "ready",
            LifecycleState::ShuttingDown => "shutting down",
            LifecycleState::Stopped => "stopped",
        };
        f.write_str(label)
    }
}

/// Atomic, forward-only lifecycle state.
#[derive(Debug)]
pub struct LifecycleCell {
    state: AtomicU8,
}

impl LifecycleCell {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Initializing as u8),
        }
    }

    pub fn get(&self) -> LifecycleState {
        LifecycleState::from(self.state.load(Ordering::SeqCst))
    }

    /// Move from exactly `from` to the later state `next`.
    pub fn advance(&self, from: LifecycleState, next: LifecycleState) -> bool {
        next > from
            && self
                .state
                .compare_exchange(from as u8, next as u8, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
    }

    /// Move to `next` from any earlier state.
    ///
    /// Returns the previous state, or the current state if it is not earlier than `next`.
    pub fn advance_to(&self, next: LifecycleState) -> Result<LifecycleState, LifecycleState> {
        let mut current = self.state.load(Ordering::SeqCst);
        loop {
            if LifecycleState::from(current) >= next {
                return Err(LifecycleState::from(current));
            }
            match self
                .state
                .compare_exchange_weak(current, next as u8, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(previous) => return Ok(LifecycleState::from(previous)),
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for LifecycleCell {
    fn default() -> Self {
        Self::new()
    }
}
