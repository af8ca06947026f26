//! Interval Timer Implementation

use alerting::{AlertGate, AlertKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use crate::{MAX_MINUTES, MIN_MINUTES};

/// Placeholder shown for the inactive phase
const INACTIVE_DISPLAY: &str = "--:--";

/// Timer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimerPhase {
    #[default]
    Focus,
    Break,
}

impl TimerPhase {
    pub fn opposite(&self) -> TimerPhase {
        match self {
            TimerPhase::Focus => TimerPhase::Break,
            TimerPhase::Break => TimerPhase::Focus,
        }
    }

    /// Alert raised when this phase runs out
    pub fn end_alert(&self) -> AlertKind {
        match self {
            TimerPhase::Focus => AlertKind::FocusPhaseEnd,
            TimerPhase::Break => AlertKind::BreakPhaseEnd,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Focus => "Focus",
            TimerPhase::Break => "Break",
        }
    }
}

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the shell displays after a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerReading {
    /// Active phase
    pub phase: TimerPhase,
    /// Remaining focus time, `--:--` during a break
    pub focus_display: String,
    /// Remaining break time, `--:--` during focus
    pub break_display: String,
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerTick {
    pub reading: TimerReading,
    /// Phase-end alert fired on this tick
    pub alert: Option<AlertKind>,
}

/// Format a remaining duration as `MM:SS` (whole seconds, truncated)
pub fn format_clock(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn phase_length(minutes: u32) -> Duration {
    Duration::from_secs(u64::from(minutes.clamp(MIN_MINUTES, MAX_MINUTES)) * 60)
}

/// Focus/break interval timer
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    /// Active phase
    phase: TimerPhase,
    /// Start of the focus phase (set while focus is active)
    focus_start: Option<Instant>,
    /// Start of the break phase (set while break is active)
    break_start: Option<Instant>,
    /// Edge detection for phase ends
    focus_end: AlertGate,
    break_end: AlertGate,
    /// When the timer was paused, if it is
    paused_at: Option<Instant>,
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalTimer {
    /// Create a timer in the focus phase; the phase starts on the first tick
    pub fn new() -> Self {
        Self {
            phase: TimerPhase::Focus,
            focus_start: None,
            break_start: None,
            focus_end: AlertGate::immediate(),
            break_end: AlertGate::immediate(),
            paused_at: None,
        }
    }

    /// Advance the timer to `now`.
    ///
    /// Durations are read on every tick, so a changed setting applies to the
    /// running phase measured from its original start.
    ///
    /// The display truncates to whole seconds while the flip waits for the
    /// exact phase length, so the last sub-second of a phase reads `00:00`
    /// in the old phase. The tick that reaches zero reports the next phase
    /// at its full length.
    pub fn tick(&mut self, focus_minutes: u32, break_minutes: u32, now: Instant) -> TimerTick {
        // Time stands still while paused
        let now = self.paused_at.unwrap_or(now);

        let phase = self.phase;
        let length = |phase: TimerPhase| match phase {
            TimerPhase::Focus => phase_length(focus_minutes),
            TimerPhase::Break => phase_length(break_minutes),
        };

        let start = *self.start_mut(phase).get_or_insert(now);
        let mut remaining = length(phase).saturating_sub(now.saturating_duration_since(start));
        let expired = remaining.is_zero();

        let mut alert = None;
        if self.gate_mut(phase).evaluate(expired, now) {
            alert = Some(phase.end_alert());
        }

        if expired {
            let next = phase.opposite();
            info!("{} phase over, switching to {}", phase, next);

            *self.start_mut(phase) = None;
            self.gate_mut(phase).reset();
            *self.start_mut(next) = Some(now);
            self.phase = next;
            remaining = length(next);
        }

        let clock = format_clock(remaining);
        debug!(phase = %self.phase, remaining = %clock, "Timer tick");

        let reading = match self.phase {
            TimerPhase::Focus => TimerReading {
                phase: TimerPhase::Focus,
                focus_display: clock,
                break_display: INACTIVE_DISPLAY.to_string(),
            },
            TimerPhase::Break => TimerReading {
                phase: TimerPhase::Break,
                focus_display: INACTIVE_DISPLAY.to_string(),
                break_display: clock,
            },
        };

        TimerTick { reading, alert }
    }

    /// Freeze the active phase
    pub fn pause(&mut self, now: Instant) {
        if self.paused_at.is_none() {
            debug!(phase = %self.phase, "Timer paused");
            self.paused_at = Some(now);
        }
    }

    /// Continue the active phase, excluding the paused time
    pub fn resume(&mut self, now: Instant) {
        let Some(paused_at) = self.paused_at.take() else {
            return;
        };

        let gap = now.saturating_duration_since(paused_at);
        let phase = self.phase;
        if let Some(start) = self.start_mut(phase) {
            *start += gap;
        }
        debug!(phase = %phase, paused_secs = gap.as_secs(), "Timer resumed");
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Start of the active phase, if it has begun
    pub fn phase_start(&self) -> Option<Instant> {
        match self.phase {
            TimerPhase::Focus => self.focus_start,
            TimerPhase::Break => self.break_start,
        }
    }

    /// Back to a fresh focus phase
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn start_mut(&mut self, phase: TimerPhase) -> &mut Option<Instant> {
        match phase {
            TimerPhase::Focus => &mut self.focus_start,
            TimerPhase::Break => &mut self.break_start,
        }
    }

    fn gate_mut(&mut self, phase: TimerPhase) -> &mut AlertGate {
        match phase {
            TimerPhase::Focus => &mut self.focus_end,
            TimerPhase::Break => &mut self.break_end,
        }
    }
}
