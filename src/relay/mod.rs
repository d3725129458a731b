pub mod driver;

use std::fmt;
use std::str::Utf8Error;

use thiserror::Error;

/// Logical relay state, mirrored onto the output pin (active-high).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Off,
    On,
}

/// What the message handler did with one incoming payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Recognized "ON": the pump is now powered.
    PumpOn,
    /// Recognized "OFF": the pump is now off.
    PumpOff,
    /// Anything else: dropped without touching the relay. Carries the
    /// normalized command text for the log.
    Ignored(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::PumpOn => write!(f, "Relay ON - Water Pump Activated"),
            Outcome::PumpOff => write!(f, "Relay OFF - Water Pump Deactivated"),
            Outcome::Ignored(command) => write!(f, "Unknown command: {command}"),
        }
    }
}

/// A pin write that did not go through.
#[derive(Debug, Error)]
#[error("gpio write failed: {0}")]
pub struct RelayError(pub String);

/// Why a message could not be applied to the relay. Returned as a value so
/// the event loop logs it and keeps running.
#[derive(Debug, Error)]
pub enum HandleError {
    #[error("payload is not valid UTF-8: {0}")]
    Decode(#[from] Utf8Error),
    #[error(transparent)]
    Relay(#[from] RelayError),
}
