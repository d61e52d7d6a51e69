//! Kernel sysfs GPIO (`/sys/class/gpio`) through `linux-embedded-hal`.
//!
//! Used on boards where the memory-mapped interface is unavailable. On the
//! Raspberry Pi 5 the header pins sit behind `gpiochip4`, so the configured
//! chip base is added to every BCM number.

use linux_embedded_hal::sysfs_gpio::{Direction, Pin};

use super::{InputLine, OutputLine};
use crate::errors::LineError;

/// An exported sysfs line. Unexported again when dropped.
pub struct SysfsLine {
    bcm: u8,
    pin: Pin,
}

impl SysfsLine {
    fn export(bcm: u8, chip_base: u32, direction: Direction) -> Result<Self, LineError> {
        let pin = Pin::new(u64::from(chip_base) + u64::from(bcm));
        pin.export().map_err(|e| LineError::new(bcm, e))?;
        pin.set_direction(direction)
            .map_err(|e| LineError::new(bcm, e))?;
        Ok(Self { bcm, pin })
    }

    pub fn output(bcm: u8, chip_base: u32) -> Result<Self, LineError> {
        Self::export(bcm, chip_base, Direction::High)
    }

    /// The sysfs interface has no bias control; the Mini PiTFT buttons rely on
    /// the board's pull-ups.
    pub fn input(bcm: u8, chip_base: u32) -> Result<Self, LineError> {
        Self::export(bcm, chip_base, Direction::In)
    }
}

impl OutputLine for SysfsLine {
    fn set_high(&mut self) -> Result<(), LineError> {
        self.pin.set_value(1).map_err(|e| LineError::new(self.bcm, e))
    }

    fn set_low(&mut self) -> Result<(), LineError> {
        self.pin.set_value(0).map_err(|e| LineError::new(self.bcm, e))
    }
}

impl InputLine for SysfsLine {
    fn is_low(&mut self) -> Result<bool, LineError> {
        self.pin
            .get_value()
            .map(|value| value == 0)
            .map_err(|e| LineError::new(self.bcm, e))
    }
}

impl Drop for SysfsLine {
    fn drop(&mut self) {
        let _ = self.pin.unexport();
    }
}
