//! ST7789 bring-up, frame presentation and teardown.

use strum_macros::Display;

use super::command::*;
use super::protocol::{encode_clear, encode_frame, AddressWindow, Packet};
use super::transport::{Transport, TransportFactory};
use crate::errors::{DriverError, HardwareInitError, InitPhase, TransferError};
use crate::framebuffer::PixelBuffer;
use crate::hardware::Delay;
use crate::logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DriverState {
    Uninitialized,
    Initializing,
    Ready,
    ShuttingDown,
    Closed,
}

/// Owns the transport for the lifetime of the display.
///
/// Hardware is only claimed inside [`initialize`](Self::initialize), and
/// released by [`shutdown`](Self::shutdown) or on drop.
pub struct DisplayDriver<F: TransportFactory, D> {
    factory: F,
    delay: D,
    transport: Option<F::Transport>,
    state: DriverState,
}

impl<F, D> DisplayDriver<F, D>
where
    F: TransportFactory,
    D: Delay,
{
    pub fn new(factory: F, delay: D) -> Self {
        Self {
            factory,
            delay,
            transport: None,
            state: DriverState::Uninitialized,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Claim the hardware and run the power-up sequence.
    ///
    /// Only valid from `Uninitialized`; any other state fails without touching
    /// the hardware. On failure the driver ends up `Closed`.
    pub fn initialize(&mut self) -> Result<(), DriverError> {
        if self.state != DriverState::Uninitialized {
            return Err(DriverError::InvalidState {
                operation: "initialize",
                state: self.state,
            });
        }
        self.state = DriverState::Initializing;

        let mut transport = match self.factory.open() {
            Ok(transport) => transport,
            Err(e) => {
                self.state = DriverState::Closed;
                return Err(e.into());
            }
        };

        if let Err(e) = power_up(&mut transport, &mut self.delay) {
            self.state = DriverState::Closed;
            return Err(HardwareInitError::new(InitPhase::Controller, e).into());
        }

        self.transport = Some(transport);
        self.state = DriverState::Ready;
        logger::success("Display initialized");
        Ok(())
    }

    /// Blit `buffer` to the whole panel. Ignored unless the driver is ready.
    pub fn present(&mut self, buffer: PixelBuffer) -> Result<(), DriverError> {
        let Some(transport) = self.transport.as_mut() else {
            return Ok(());
        };
        if self.state != DriverState::Ready {
            return Ok(());
        }
        send_all(transport, &encode_frame(&buffer))?;
        Ok(())
    }

    /// Release the transport and its lines. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if self.state == DriverState::Closed {
            return;
        }
        self.state = DriverState::ShuttingDown;
        if self.transport.take().is_some() {
            logger::info("Display released");
        }
        self.state = DriverState::Closed;
    }
}

fn send_all<T: Transport>(transport: &mut T, packets: &[Packet]) -> Result<(), TransferError> {
    packets.iter().try_for_each(|packet| transport.send_packet(packet))
}

fn power_up<T: Transport, D: Delay>(transport: &mut T, delay: &mut D) -> Result<(), TransferError> {
    transport.reset(delay)?;

    transport.send_command(SWRESET)?;
    delay.delay_ms(SWRESET_DELAY_MS);
    transport.send_command(SLPOUT)?;
    delay.delay_ms(SLPOUT_DELAY_MS);

    transport.write_command_data(MADCTL, &[MADCTL_ROTATE_180])?;
    transport.write_command_data(COLMOD, &[COLMOD_RGB565])?;
    send_all(transport, &AddressWindow::FULL_PANEL.packets())?;

    for (command, params) in PANEL_TUNING {
        transport.write_command_data(*command, params)?;
    }

    transport.send_command(INVON)?;
    transport.send_command(NORON)?;
    send_all(transport, &encode_clear())?;

    transport.send_command(DISPON)?;
    delay.delay_ms(DISPON_DELAY_MS);
    Ok(())
}
