//! Builds the concrete display transport and button lines from settings.

use std::path::PathBuf;

use super::rppal_gpio::RppalGpio;
use super::spidev_bus::SpidevBus;
use super::sysfs_gpio::SysfsLine;
use super::{InputLine, OutputLine};
use crate::configs::settings::{GpioBackend, MonitorSettings};
use crate::errors::{HardwareInitError, InitPhase, LineError};
use crate::input::ButtonPair;
use crate::logger;
use crate::shutdown::StopFlag;
use crate::st7789::{SpiTransport, TransportFactory};

pub type PlatformTransport = SpiTransport<SpidevBus, Box<dyn OutputLine>>;
pub type PlatformButtons = ButtonPair<Box<dyn InputLine>>;

#[derive(Debug, Clone, Copy)]
struct GpioSelection {
    backend: GpioBackend,
    sysfs_chip_base: u32,
}

impl GpioSelection {
    /// `rppal` is the open handle when the backend is rppal, `None` for sysfs.
    fn output(&self, rppal: Option<&RppalGpio>, pin: u8) -> Result<Box<dyn OutputLine>, LineError> {
        let line: Box<dyn OutputLine> = match rppal {
            Some(gpio) => Box::new(gpio.output(pin)?),
            None => Box::new(SysfsLine::output(pin, self.sysfs_chip_base)?),
        };
        Ok(line)
    }

    fn input(&self, rppal: Option<&RppalGpio>, pin: u8) -> Result<Box<dyn InputLine>, LineError> {
        let line: Box<dyn InputLine> = match rppal {
            Some(gpio) => Box::new(gpio.input_pullup(pin)?),
            None => Box::new(SysfsLine::input(pin, self.sysfs_chip_base)?),
        };
        Ok(line)
    }

    fn open_rppal(&self) -> Result<Option<RppalGpio>, HardwareInitError> {
        match self.backend {
            GpioBackend::Rppal => RppalGpio::open()
                .map(Some)
                .map_err(|e| HardwareInitError::new(InitPhase::Gpio, e)),
            GpioBackend::Sysfs => Ok(None),
        }
    }
}

/// Opens DC and RST on the configured GPIO backend, then the spidev node.
pub struct PlatformTransportFactory {
    gpio: GpioSelection,
    spi_device: PathBuf,
    spi_speed_hz: u32,
    dc_pin: u8,
    rst_pin: u8,
    stop: StopFlag,
}

impl PlatformTransportFactory {
    pub fn from_settings(settings: &MonitorSettings, stop: StopFlag) -> Self {
        Self {
            gpio: GpioSelection {
                backend: settings.gpio.backend,
                sysfs_chip_base: settings.gpio.sysfs_chip_base,
            },
            spi_device: PathBuf::from(settings.display.spi_device.to_string()),
            spi_speed_hz: settings.display.spi_speed_hz.into_inner(),
            dc_pin: settings.display.dc_pin.into_inner(),
            rst_pin: settings.display.rst_pin.into_inner(),
            stop,
        }
    }
}

impl TransportFactory for PlatformTransportFactory {
    type Transport = PlatformTransport;

    fn open(&mut self) -> Result<PlatformTransport, HardwareInitError> {
        logger::subsection(format!("Claiming DC/RST lines via {}", self.gpio.backend));
        let rppal = self.gpio.open_rppal()?;
        let gpio_error = |e: LineError| HardwareInitError::new(InitPhase::Gpio, e);
        let dc = self.gpio.output(rppal.as_ref(), self.dc_pin).map_err(gpio_error)?;
        let rst = self.gpio.output(rppal.as_ref(), self.rst_pin).map_err(gpio_error)?;

        logger::subsection(format!("Opening {}", self.spi_device.display()));
        let bus = SpidevBus::open(&self.spi_device, self.spi_speed_hz).map_err(|e| {
            HardwareInitError::new(
                InitPhase::SpiBus,
                format!("{}: {e}", self.spi_device.display()),
            )
        })?;

        Ok(SpiTransport::new(bus, dc, rst, self.stop.clone()))
    }
}

/// Claim both button lines as pulled-up inputs.
pub fn open_buttons(settings: &MonitorSettings) -> Result<PlatformButtons, HardwareInitError> {
    let gpio = GpioSelection {
        backend: settings.gpio.backend,
        sysfs_chip_base: settings.gpio.sysfs_chip_base,
    };
    let rppal = gpio.open_rppal()?;
    let gpio_error = |e: LineError| HardwareInitError::new(InitPhase::Gpio, e);

    let previous = gpio
        .input(rppal.as_ref(), settings.buttons.previous_pin.into_inner())
        .map_err(gpio_error)?;
    let next = gpio
        .input(rppal.as_ref(), settings.buttons.next_pin.into_inner())
        .map_err(gpio_error)?;
    Ok(ButtonPair::new(previous, next))
}
