//! Pure encoding of pixel buffers into ST7789 command/data packets.
//!
//! Nothing here touches hardware: the output is a list of [`Packet`]s that the
//! transport replays in order. Every clear and every frame begins with the
//! column window, the row window and the memory-write command.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

use super::command::{CASET, RAMWR, RASET};
use crate::framebuffer::{PixelBuffer, HEIGHT, WIDTH};

/// Upper bound for a single data packet. Only bounds per-call latency.
pub const CHUNK_SIZE: usize = 1024;

/// Row offset of the 240×240 Mini PiTFT inside the controller's 240×320 RAM.
pub const ROW_OFFSET: u16 = 80;

/// 16-bit packed colour: 5 bits red, 6 bits green, 5 bits blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Rgb565 = Rgb565(0x0000);

    /// Truncating conversion: keeps the top bits of each channel.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Rgb565((((r & 0xF8) as u16) << 8) | (((g & 0xFC) as u16) << 3) | ((b >> 3) as u16))
    }

    /// High byte first, as the controller expects on the wire.
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl From<Rgb888> for Rgb565 {
    fn from(color: Rgb888) -> Self {
        Rgb565::from_rgb(color.r(), color.g(), color.b())
    }
}

/// Rectangle of controller memory targeted by the next memory write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressWindow {
    pub col_start: u16,
    pub col_end: u16,
    pub row_start: u16,
    pub row_end: u16,
}

impl AddressWindow {
    /// The only window this panel uses: columns 0–239, rows 80–319.
    pub const FULL_PANEL: AddressWindow = AddressWindow {
        col_start: 0,
        col_end: WIDTH as u16 - 1,
        row_start: ROW_OFFSET,
        row_end: ROW_OFFSET + HEIGHT as u16 - 1,
    };

    pub fn column_bytes(&self) -> [u8; 4] {
        let [s_hi, s_lo] = self.col_start.to_be_bytes();
        let [e_hi, e_lo] = self.col_end.to_be_bytes();
        [s_hi, s_lo, e_hi, e_lo]
    }

    pub fn row_bytes(&self) -> [u8; 4] {
        let [s_hi, s_lo] = self.row_start.to_be_bytes();
        let [e_hi, e_lo] = self.row_end.to_be_bytes();
        [s_hi, s_lo, e_hi, e_lo]
    }

    /// CASET + params, RASET + params.
    pub fn packets(&self) -> [Packet; 4] {
        [
            Packet::Command(CASET),
            Packet::Data(self.column_bytes().to_vec()),
            Packet::Command(RASET),
            Packet::Data(self.row_bytes().to_vec()),
        ]
    }
}

/// One unit of bus traffic: a command byte with DC low, or a data payload
/// with DC high.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Command(u8),
    Data(Vec<u8>),
}

impl Packet {
    pub fn is_command(&self) -> bool {
        matches!(self, Packet::Command(_))
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Packet::Command(cmd) => std::slice::from_ref(cmd),
            Packet::Data(data) => data,
        }
    }
}

fn write_preamble() -> Vec<Packet> {
    let mut packets = Vec::with_capacity(5 + (WIDTH * HEIGHT * 2).div_ceil(CHUNK_SIZE));
    packets.extend(AddressWindow::FULL_PANEL.packets());
    packets.push(Packet::Command(RAMWR));
    packets
}

fn push_payload(packets: &mut Vec<Packet>, payload: &[u8]) {
    packets.extend(
        payload
            .chunks(CHUNK_SIZE)
            .map(|chunk| Packet::Data(chunk.to_vec())),
    );
}

/// Packets that fill the whole panel with black.
pub fn encode_clear() -> Vec<Packet> {
    let mut packets = write_preamble();
    push_payload(&mut packets, &vec![0u8; WIDTH * HEIGHT * 2]);
    packets
}

/// Packets that blit `buffer` to the whole panel, row-major from (0, 0).
pub fn encode_frame(buffer: &PixelBuffer) -> Vec<Packet> {
    let mut payload = Vec::with_capacity(WIDTH * HEIGHT * 2);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let color = buffer
                .pixel(x, y)
                .map(Rgb565::from)
                .unwrap_or(Rgb565::BLACK);
            payload.extend_from_slice(&color.to_be_bytes());
        }
    }

    let mut packets = write_preamble();
    push_payload(&mut packets, &payload);
    packets
}
