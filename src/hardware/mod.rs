//! Hardware capabilities used by the transport and the button poller.
//!
//! The display and buttons only see these traits. The concrete Linux
//! backends live in the submodules and are chosen once at startup by
//! [`platform`] from the `gpio.backend` setting.

use std::time::Duration;

use crate::errors::{LineError, TransferError};

#[cfg(target_os = "linux")]
pub mod platform;
#[cfg(target_os = "linux")]
mod rppal_gpio;
#[cfg(target_os = "linux")]
mod spidev_bus;
#[cfg(target_os = "linux")]
mod sysfs_gpio;

/// A push-pull output such as the DC or RST line.
pub trait OutputLine {
    fn set_high(&mut self) -> Result<(), LineError>;
    fn set_low(&mut self) -> Result<(), LineError>;
}

/// A digital input such as a button.
pub trait InputLine {
    /// `true` when the line reads logic 0.
    fn is_low(&mut self) -> Result<bool, LineError>;
}

/// Synchronous byte-oriented bus. One call is one bus transaction.
pub trait SpiBus {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransferError>;
}

/// Blocking delay source for power-on timing.
pub trait Delay {
    fn delay_ms(&mut self, ms: u32);
}

/// `std::thread::sleep` based delay.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

impl<T: OutputLine + ?Sized> OutputLine for Box<T> {
    fn set_high(&mut self) -> Result<(), LineError> {
        (**self).set_high()
    }

    fn set_low(&mut self) -> Result<(), LineError> {
        (**self).set_low()
    }
}

impl<T: InputLine + ?Sized> InputLine for Box<T> {
    fn is_low(&mut self) -> Result<bool, LineError> {
        (**self).is_low()
    }
}
