//! Memory-mapped GPIO through `rppal` (`/dev/gpiomem`).

use rppal::gpio::{Gpio, InputPin, OutputPin};

use super::{InputLine, OutputLine};
use crate::errors::LineError;

pub struct RppalGpio {
    gpio: Gpio,
}

impl RppalGpio {
    pub fn open() -> Result<Self, rppal::gpio::Error> {
        Ok(Self { gpio: Gpio::new()? })
    }

    pub fn output(&self, pin: u8) -> Result<RppalOutput, LineError> {
        let line = self
            .gpio
            .get(pin)
            .map_err(|e| LineError::new(pin, e))?
            .into_output_high();
        Ok(RppalOutput { line })
    }

    pub fn input_pullup(&self, pin: u8) -> Result<RppalInput, LineError> {
        let line = self
            .gpio
            .get(pin)
            .map_err(|e| LineError::new(pin, e))?
            .into_input_pullup();
        Ok(RppalInput { line })
    }
}

/// Released back to its original mode when dropped.
pub struct RppalOutput {
    line: OutputPin,
}

impl OutputLine for RppalOutput {
    fn set_high(&mut self) -> Result<(), LineError> {
        self.line.set_high();
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), LineError> {
        self.line.set_low();
        Ok(())
    }
}

pub struct RppalInput {
    line: InputPin,
}

impl InputLine for RppalInput {
    fn is_low(&mut self) -> Result<bool, LineError> {
        Ok(self.line.is_low())
    }
}
