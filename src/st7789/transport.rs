//! Byte transport to the ST7789: DC select line, reset line and SPI bus.

use super::command::{RESET_LOW_MS, RESET_RECOVERY_MS};
use super::protocol::Packet;
use crate::errors::{HardwareInitError, TransferError};
use crate::hardware::{Delay, OutputLine, SpiBus};
use crate::shutdown::StopFlag;

/// Controller-facing byte channel.
///
/// Commands travel with DC low, parameters and pixel data with DC high.
pub trait Transport {
    /// DC low, then exactly one byte on the bus.
    fn send_command(&mut self, command: u8) -> Result<(), TransferError>;

    /// DC high, then `data` as a single bus transaction.
    fn send_data(&mut self, data: &[u8]) -> Result<(), TransferError>;

    /// Pulse RST low for at least 100 ms, then wait 120 ms for the
    /// controller to come out of reset.
    fn reset<D: Delay>(&mut self, delay: &mut D) -> Result<(), TransferError>;

    /// A command followed by its parameters. Holding `&mut self` across both
    /// writes keeps the pair contiguous on the bus.
    fn write_command_data(&mut self, command: u8, data: &[u8]) -> Result<(), TransferError> {
        self.send_command(command)?;
        if !data.is_empty() {
            self.send_data(data)?;
        }
        Ok(())
    }

    fn send_packet(&mut self, packet: &Packet) -> Result<(), TransferError> {
        match packet {
            Packet::Command(command) => self.send_command(*command),
            Packet::Data(data) => self.send_data(data),
        }
    }
}

/// Acquires the transport's hardware. Called once by
/// [`DisplayDriver::initialize`](super::DisplayDriver::initialize) so that
/// nothing is claimed before bring-up starts.
pub trait TransportFactory {
    type Transport: Transport;

    /// Claim GPIO lines first, then the SPI device. Failures are tagged with
    /// the phase that failed.
    fn open(&mut self) -> Result<Self::Transport, HardwareInitError>;
}

/// [`Transport`] over an [`SpiBus`] and two [`OutputLine`]s.
pub struct SpiTransport<B, O> {
    bus: B,
    dc: O,
    rst: O,
    stop: StopFlag,
}

impl<B, O> SpiTransport<B, O>
where
    B: SpiBus,
    O: OutputLine,
{
    pub fn new(bus: B, dc: O, rst: O, stop: StopFlag) -> Self {
        Self { bus, dc, rst, stop }
    }
}

impl<B, O> Transport for SpiTransport<B, O>
where
    B: SpiBus,
    O: OutputLine,
{
    fn send_command(&mut self, command: u8) -> Result<(), TransferError> {
        if self.stop.is_stopped() {
            return Ok(());
        }
        self.dc.set_low()?;
        self.bus.write(&[command])
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), TransferError> {
        if self.stop.is_stopped() {
            return Ok(());
        }
        self.dc.set_high()?;
        self.bus.write(data)
    }

    fn reset<D: Delay>(&mut self, delay: &mut D) -> Result<(), TransferError> {
        if self.stop.is_stopped() {
            return Ok(());
        }
        self.rst.set_low()?;
        delay.delay_ms(RESET_LOW_MS);
        self.rst.set_high()?;
        delay.delay_ms(RESET_RECOVERY_MS);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LineError;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Dc(bool),
        Rst(bool),
        Bus(Vec<u8>),
        Sleep(u32),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct Bus(Log);
    impl SpiBus for Bus {
        fn write(&mut self, bytes: &[u8]) -> Result<(), TransferError> {
            self.0.borrow_mut().push(Event::Bus(bytes.to_vec()));
            Ok(())
        }
    }

    struct Line {
        log: Log,
        is_dc: bool,
    }
    impl OutputLine for Line {
        fn set_high(&mut self) -> Result<(), LineError> {
            let event = if self.is_dc { Event::Dc(true) } else { Event::Rst(true) };
            self.log.borrow_mut().push(event);
            Ok(())
        }
        fn set_low(&mut self) -> Result<(), LineError> {
            let event = if self.is_dc { Event::Dc(false) } else { Event::Rst(false) };
            self.log.borrow_mut().push(event);
            Ok(())
        }
    }

    struct Sleeper(Log);
    impl Delay for Sleeper {
        fn delay_ms(&mut self, ms: u32) {
            self.0.borrow_mut().push(Event::Sleep(ms));
        }
    }

    fn transport(log: &Log, stop: StopFlag) -> SpiTransport<Bus, Line> {
        SpiTransport::new(
            Bus(log.clone()),
            Line { log: log.clone(), is_dc: true },
            Line { log: log.clone(), is_dc: false },
            stop,
        )
    }

    #[test]
    fn command_then_data_switches_dc() {
        let log = Log::default();
        let mut t = transport(&log, StopFlag::new());
        t.write_command_data(0x36, &[0xC0]).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                Event::Dc(false),
                Event::Bus(vec![0x36]),
                Event::Dc(true),
                Event::Bus(vec![0xC0]),
            ]
        );
    }

    #[test]
    fn command_without_parameters_sends_no_data() {
        let log = Log::default();
        let mut t = transport(&log, StopFlag::new());
        t.write_command_data(0x29, &[]).unwrap();
        assert_eq!(*log.borrow(), vec![Event::Dc(false), Event::Bus(vec![0x29])]);
    }

    #[test]
    fn reset_holds_line_low_then_waits() {
        let log = Log::default();
        let mut t = transport(&log, StopFlag::new());
        let mut delay = Sleeper(log.clone());
        t.reset(&mut delay).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                Event::Rst(false),
                Event::Sleep(100),
                Event::Rst(true),
                Event::Sleep(120),
            ]
        );
    }

    #[test]
    fn stopped_transport_is_silent() {
        let log = Log::default();
        let stop = StopFlag::new();
        let mut t = transport(&log, stop.clone());
        stop.request_stop();

        t.send_command(0x2C).unwrap();
        t.send_data(&[1, 2, 3]).unwrap();
        t.reset(&mut Sleeper(log.clone())).unwrap();
        assert!(log.borrow().is_empty());
    }
}
