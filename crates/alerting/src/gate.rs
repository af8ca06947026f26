//! Debounced Alert Gate
//!
//! A condition must hold continuously for the gate's threshold before the
//! gate fires. It fires once per continuous occurrence and re-arms only
//! after the condition clears.

use std::time::{Duration, Instant};
use tracing::debug;

/// Observable gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Condition false
    Idle,
    /// Condition true, threshold not yet reached
    Pending,
    /// Alert emitted for the current occurrence
    Fired,
}

/// Debounce state machine for one alert kind
#[derive(Debug, Clone)]
pub struct AlertGate {
    /// How long the condition must hold before firing
    threshold: Duration,
    /// When the current occurrence started
    condition_start: Option<Instant>,
    /// Whether the current occurrence already fired
    fired: bool,
}

impl AlertGate {
    /// Create a gate that fires after `threshold` of sustained condition
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            condition_start: None,
            fired: false,
        }
    }

    /// Create a gate that fires on the first true evaluation
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Feed the current condition. Returns `true` when the alert must be
    /// emitted on this evaluation.
    pub fn evaluate(&mut self, condition: bool, now: Instant) -> bool {
        if !condition {
            if self.condition_start.is_some() {
                debug!(fired = self.fired, "Alert gate re-armed");
            }
            self.condition_start = None;
            self.fired = false;
            return false;
        }

        let start = *self.condition_start.get_or_insert(now);
        if self.fired {
            return false;
        }

        if now.saturating_duration_since(start) >= self.threshold {
            self.fired = true;
            return true;
        }

        false
    }

    /// Current state
    pub fn state(&self) -> GateState {
        match (self.condition_start, self.fired) {
            (_, true) => GateState::Fired,
            (Some(_), false) => GateState::Pending,
            (None, false) => GateState::Idle,
        }
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Forget any occurrence in progress
    pub fn reset(&mut self) {
        self.condition_start = None;
        self.fired = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_fires_once_after_threshold() {
        let t0 = Instant::now();
        let mut gate = AlertGate::new(secs(300));

        assert!(!gate.evaluate(true, t0));
        assert_eq!(gate.state(), GateState::Pending);
        assert!(!gate.evaluate(true, t0 + secs(299)));
        assert!(gate.evaluate(true, t0 + secs(300)));
        assert_eq!(gate.state(), GateState::Fired);

        // Sustained condition never re-emits
        assert!(!gate.evaluate(true, t0 + secs(301)));
        assert!(!gate.evaluate(true, t0 + secs(1000)));
    }

    #[test]
    fn test_clearing_before_threshold_discards_start() {
        let t0 = Instant::now();
        let mut gate = AlertGate::new(secs(300));

        gate.evaluate(true, t0);
        gate.evaluate(true, t0 + secs(299));
        assert!(!gate.evaluate(false, t0 + secs(299)));
        assert_eq!(gate.state(), GateState::Idle);

        // A new occurrence measures from its own start
        assert!(!gate.evaluate(true, t0 + secs(300)));
        assert!(!gate.evaluate(true, t0 + secs(599)));
        assert!(gate.evaluate(true, t0 + secs(600)));
    }

    #[test]
    fn test_rearms_after_condition_clears() {
        let t0 = Instant::now();
        let mut gate = AlertGate::new(secs(300));

        gate.evaluate(true, t0);
        assert!(gate.evaluate(true, t0 + secs(300)));
        gate.evaluate(false, t0 + secs(301));
        assert_eq!(gate.state(), GateState::Idle);

        gate.evaluate(true, t0 + secs(302));
        assert!(gate.evaluate(true, t0 + secs(602)));
    }

    #[test]
    fn test_immediate_gate_fires_on_first_true() {
        let t0 = Instant::now();
        let mut gate = AlertGate::immediate();

        assert!(gate.evaluate(true, t0));
        assert!(!gate.evaluate(true, t0));
        gate.evaluate(false, t0);
        assert!(gate.evaluate(true, t0));
    }

    #[test]
    fn test_reset() {
        let t0 = Instant::now();
        let mut gate = AlertGate::immediate();
        gate.evaluate(true, t0);
        gate.reset();
        assert_eq!(gate.state(), GateState::Idle);
        assert!(!gate.has_fired());
    }

    proptest! {
        #[test]
        fn at_most_one_emission_per_true_run(
            run in prop::collection::vec(any::<bool>(), 1..200),
        ) {
            let t0 = Instant::now();
            let mut gate = AlertGate::new(secs(3));
            let mut emitted_in_run = 0;

            for (i, condition) in run.iter().enumerate() {
                let fired = gate.evaluate(*condition, t0 + secs(i as u64));
                if !condition {
                    emitted_in_run = 0;
                }
                if fired {
                    emitted_in_run += 1;
                }
                prop_assert!(emitted_in_run <= 1);
            }
        }
    }
}
