use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

use crate::relay::driver::Relay;

/// Backing state for [`MockPin`], behind an `Rc` so the test still sees the
/// pin after it has moved into the driver.
#[derive(Debug, Default)]
pub struct MockPinState {
    pub high: bool,
    pub fail_writes: bool,
}

/// In-memory output pin for host-side tests.
#[derive(Clone, Default)]
pub struct MockPin(pub Rc<RefCell<MockPinState>>);

impl MockPin {
    pub fn is_high(&self) -> bool {
        self.0.borrow().high
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.0.borrow_mut().fail_writes = fail;
    }
}

#[derive(Debug)]
pub struct MockPinError;

impl embedded_hal::digital::Error for MockPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for MockPin {
    type Error = MockPinError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), MockPinError> {
        let mut state = self.0.borrow_mut();
        if state.fail_writes {
            return Err(MockPinError);
        }
        state.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), MockPinError> {
        let mut state = self.0.borrow_mut();
        if state.fail_writes {
            return Err(MockPinError);
        }
        state.high = true;
        Ok(())
    }
}

/// A fresh relay over a mock pin, plus the probe handle to inspect it.
pub fn test_relay() -> (Relay<MockPin>, MockPin) {
    let pin = MockPin::default();
    let relay = Relay::new(pin.clone()).expect("mock pin writes succeed by default");
    (relay, pin)
}
