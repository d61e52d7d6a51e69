use std::fmt;
use thiserror::Error;

use crate::st7789::driver::DriverState;

pub trait Description {
    fn short_description(&self) -> String;
    fn long_description(&self) -> String;
}

/// Stage of display bring-up that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPhase {
    /// Requesting the DC/RST (or button) lines from the GPIO backend.
    Gpio,
    /// Opening or configuring the SPI device.
    SpiBus,
    /// Sending the ST7789 power-up command sequence.
    Controller,
}

impl fmt::Display for InitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitPhase::Gpio => write!(f, "GPIO acquisition"),
            InitPhase::SpiBus => write!(f, "SPI open"),
            InitPhase::Controller => write!(f, "controller command sequence"),
        }
    }
}

#[derive(Debug, Error)]
#[error("Display initialisation failed during {phase}: {message}")]
pub struct HardwareInitError {
    pub phase: InitPhase,
    pub message: String,
}

impl HardwareInitError {
    pub fn new(phase: InitPhase, message: impl fmt::Display) -> Self {
        Self {
            phase,
            message: message.to_string(),
        }
    }
}

impl Description for HardwareInitError {
    fn short_description(&self) -> String {
        format!("{} failed", self.phase)
    }

    fn long_description(&self) -> String {
        let hint = match self.phase {
            InitPhase::Gpio => {
                "Check that the configured BCM pins are free and that the user can access /dev/gpiomem (or /sys/class/gpio for the sysfs backend)."
            }
            InitPhase::SpiBus => {
                "Check that SPI is enabled (raspi-config → Interface Options → SPI) and that the configured spidev node exists."
            }
            InitPhase::Controller => {
                "The controller did not accept the power-up sequence. Check the DC/RST wiring and the SPI clock speed."
            }
        };
        format!("{self}. {hint}")
    }
}

/// Failure while reading or driving a single digital line.
#[derive(Debug, Error)]
#[error("GPIO line {pin}: {message}")]
pub struct LineError {
    pub pin: u8,
    pub message: String,
}

impl LineError {
    pub fn new(pin: u8, message: impl fmt::Display) -> Self {
        Self {
            pin,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("SPI write failed: {0}")]
    Bus(String),

    #[error(transparent)]
    Line(#[from] LineError),
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Cannot {operation} while the display is {state}")]
    InvalidState {
        operation: &'static str,
        state: DriverState,
    },

    #[error(transparent)]
    Init(#[from] HardwareInitError),

    #[error("Frame transfer failed: {0}")]
    Transfer(#[from] TransferError),
}

impl Description for DriverError {
    fn short_description(&self) -> String {
        match self {
            DriverError::InvalidState { .. } => "Display state violation".to_string(),
            DriverError::Init(e) => e.short_description(),
            DriverError::Transfer(_) => "Frame dropped".to_string(),
        }
    }

    fn long_description(&self) -> String {
        match self {
            DriverError::Init(e) => e.long_description(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_error_reports_phase() {
        let err = HardwareInitError::new(InitPhase::SpiBus, "No such file or directory");
        assert_eq!(
            err.to_string(),
            "Display initialisation failed during SPI open: No such file or directory"
        );
        assert!(err.long_description().contains("raspi-config"));
    }

    #[test]
    fn invalid_state_names_operation() {
        let err = DriverError::InvalidState {
            operation: "initialize",
            state: DriverState::Ready,
        };
        assert_eq!(
            err.to_string(),
            "Cannot initialize while the display is Ready"
        );
    }
}
