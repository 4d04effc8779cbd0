//! Availability alerting
//!
//! ## Hysteresis State Machine
//!
//! Each target keeps a single alert state. Only threshold-crossing edges
//! produce an event, so a target that stays down (or up) is reported once:
//!
//! ```text
//! Recovered + availability <  threshold → Down      (DOWN event)
//! Down      + availability >= threshold → Recovered (RECOVER event)
//! otherwise                             → unchanged (no event)
//! ```
//!
//! The threshold is inclusive: availability equal to the threshold is healthy.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, trace, warn};

/// Default availability threshold in percent
pub const AVAILABILITY_THRESHOLD: f64 = 80.0;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertState {
    #[default]
    Recovered,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Down,
    Recover,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::Down => f.write_str("DOWN"),
            AlertKind::Recover => f.write_str("RECOVER"),
        }
    }
}

/// Entry of a target's alert log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    pub target: String,
    pub kind: AlertKind,
    pub availability: f64,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl AlertEvent {
    fn new(target: &str, kind: AlertKind, availability: f64) -> Self {
        let timestamp = Utc::now();
        let time = timestamp.format(TIME_FORMAT);
        let message = match kind {
            AlertKind::Down => {
                format!("Website {target} is down. availability={availability}, time={time}")
            }
            AlertKind::Recover => format!(
                "Alert recovered. Website {target} is up. availability={availability}, time={time}"
            ),
        };

        Self {
            target: target.to_string(),
            kind,
            availability,
            message,
            timestamp,
        }
    }
}

/// Per-target alert state and append-only event log
#[derive(Debug, Clone)]
pub struct AlertEngine {
    target: String,
    threshold: f64,
    state: AlertState,
    log: Vec<AlertEvent>,
}

impl AlertEngine {
    pub fn new(target: impl Into<String>, threshold: f64) -> Self {
        Self {
            target: target.into(),
            threshold,
            state: AlertState::default(),
            log: Vec::new(),
        }
    }

    /// Feed one availability reading, returning the event if an edge was crossed
    pub fn evaluate(&mut self, availability: f64) -> Option<&AlertEvent> {
        let healthy = availability >= self.threshold;

        let kind = match (self.state, healthy) {
            (AlertState::Recovered, false) => {
                self.state = AlertState::Down;
                AlertKind::Down
            }
            (AlertState::Down, true) => {
                self.state = AlertState::Recovered;
                AlertKind::Recover
            }
            _ => {
                trace!(
                    "{}: availability {availability} -> {:?} (unchanged)",
                    self.target, self.state
                );
                return None;
            }
        };

        let event = AlertEvent::new(&self.target, kind, availability);
        match kind {
            AlertKind::Down => warn!("{}", event.message),
            AlertKind::Recover => info!("{}", event.message),
        }

        self.log.push(event);
        self.log.last()
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    /// Events in the order they were raised
    pub fn events(&self) -> &[AlertEvent] {
        &self.log
    }
}
