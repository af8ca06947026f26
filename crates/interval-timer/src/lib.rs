//! Interval Timer
//!
//! Alternates focus and break phases of operator-chosen length and fires a
//! phase-end alert exactly once per boundary crossing.

mod timer;

pub use timer::{format_clock, IntervalTimer, TimerPhase, TimerReading, TimerTick};

/// Accepted range for phase lengths (minutes)
pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 60;

/// Default phase lengths (minutes)
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;
