//! Alerting System
//!
//! Provides the debounced alert gate used by the focus scorer and the
//! interval timer, plus the catalogue of alerts the tracker can raise.

mod alert;
mod gate;

pub use alert::{Alert, AlertKind};
pub use gate::{AlertGate, GateState};
