//! Sitronix ST7789 controller as wired on the Adafruit Mini PiTFT 1.3".

pub mod command;
pub mod driver;
pub mod protocol;
pub mod transport;

pub use driver::{DisplayDriver, DriverState};
pub use protocol::{encode_clear, encode_frame, AddressWindow, Packet, Rgb565};
pub use transport::{SpiTransport, Transport, TransportFactory};
