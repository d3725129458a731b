use embedded_hal::digital::OutputPin;
use tracing::info;

use super::{HandleError, Outcome, RelayError, RelayState};

/// Driver for the pump relay: one active-high output pin plus the logical
/// state last written to it.
pub struct Relay<P> {
    pin: P,
    state: RelayState,
}

impl<P: OutputPin> Relay<P> {
    /// Take ownership of the output pin and force it low, so the pump is
    /// off before the first command can arrive.
    pub fn new(pin: P) -> Result<Self, RelayError> {
        let mut relay = Self {
            pin,
            state: RelayState::Off,
        };
        relay.set(RelayState::Off)?;
        Ok(relay)
    }

    /// Drive the pin to match `target`. The recorded state is only updated
    /// once the write has gone through, so a failed write leaves the last
    /// known state intact.
    pub fn set(&mut self, target: RelayState) -> Result<(), RelayError> {
        match target {
            RelayState::On => self.pin.set_high(),
            RelayState::Off => self.pin.set_low(),
        }
        .map_err(|e| RelayError(format!("{e:?}")))?;
        self.state = target;
        Ok(())
    }

    /// Force the pump off. This is the fail-safe path run at shutdown.
    pub fn off(&mut self) -> Result<(), RelayError> {
        self.set(RelayState::Off)
    }

    pub fn state(&self) -> RelayState {
        self.state
    }
}

/// Apply one raw payload from the control topic to the relay.
///
/// The payload is decoded as UTF-8, trimmed and upper-cased before matching,
/// so "on", " On " and "ON" all switch the pump on. Decode and pin-write
/// failures come back as values for the caller to log; one bad message never
/// takes the receive loop down.
pub fn apply_command<P: OutputPin>(
    relay: &mut Relay<P>,
    payload: &[u8],
) -> Result<Outcome, HandleError> {
    let command = std::str::from_utf8(payload)?.trim().to_ascii_uppercase();
    info!("Control received: {}", command);

    match command.as_str() {
        "ON" => {
            relay.set(RelayState::On)?;
            Ok(Outcome::PumpOn)
        }
        "OFF" => {
            relay.set(RelayState::Off)?;
            Ok(Outcome::PumpOff)
        }
        _ => Ok(Outcome::Ignored(command)),
    }
}
