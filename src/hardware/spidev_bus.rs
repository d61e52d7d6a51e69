//! SPI through the kernel spidev driver.

use std::io::Write;
use std::path::Path;

use linux_embedded_hal::spidev::{SpiModeFlags, Spidev, SpidevOptions};

use super::SpiBus;
use crate::errors::TransferError;

pub struct SpidevBus {
    spi: Spidev,
}

impl SpidevBus {
    /// Open `path` in mode 0 (CPOL=0, CPHA=0), 8 bits per word.
    pub fn open(path: &Path, speed_hz: u32) -> std::io::Result<Self> {
        let mut spi = Spidev::open(path)?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(speed_hz)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options)?;
        Ok(Self { spi })
    }
}

impl SpiBus for SpidevBus {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransferError> {
        self.spi
            .write_all(bytes)
            .map_err(|e| TransferError::Bus(e.to_string()))
    }
}
