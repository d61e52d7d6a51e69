use thiserror::Error;

/// Highest BCM number broken out on the 40-pin header.
pub const MAX_HEADER_BCM: u8 = 27;

/// Longest accepted interval: one day.
pub const MAX_INTERVAL_SECS: f64 = 86_400.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ValidationError {
    #[error("GPIO {0} is not a header pin (expected BCM 0-{MAX_HEADER_BCM})")]
    InvalidPin(u8),
    #[error("SPI device '{0}' must be a /dev/spidevB.C node")]
    InvalidSpiDevice(String),
    #[error("Interval must be above 0 and at most {MAX_INTERVAL_SECS} seconds, got {0}")]
    InvalidInterval(f64),
}

pub fn is_valid_bcm_pin(pin: &u8) -> Result<(), ValidationError> {
    if *pin <= MAX_HEADER_BCM {
        Ok(())
    } else {
        Err(ValidationError::InvalidPin(*pin))
    }
}

pub fn is_valid_spi_device<S: AsRef<str> + ?Sized>(path: &S) -> Result<(), ValidationError> {
    let path = path.as_ref();
    let Some(rest) = path.strip_prefix("/dev/spidev") else {
        return Err(ValidationError::InvalidSpiDevice(path.to_string()));
    };
    let mut parts = rest.split('.');
    let bus_ok = parts
        .next()
        .is_some_and(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    let cs_ok = parts
        .next()
        .is_some_and(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    if bus_ok && cs_ok && parts.next().is_none() {
        Ok(())
    } else {
        Err(ValidationError::InvalidSpiDevice(path.to_string()))
    }
}

pub fn is_positive_seconds(seconds: &f64) -> Result<(), ValidationError> {
    if *seconds > 0.0 && *seconds <= MAX_INTERVAL_SECS {
        Ok(())
    } else {
        Err(ValidationError::InvalidInterval(*seconds))
    }
}
