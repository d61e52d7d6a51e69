// ST7789 command definitions

// System
pub const SWRESET: u8 = 0x01; // Software reset
pub const SLPOUT: u8 = 0x11; // Sleep out
pub const NORON: u8 = 0x13; // Normal display mode on
pub const INVON: u8 = 0x21; // Display inversion on
pub const DISPON: u8 = 0x29; // Display on

// Addressing and memory
pub const CASET: u8 = 0x2A; // Column address set
pub const RASET: u8 = 0x2B; // Row address set
pub const RAMWR: u8 = 0x2C; // Memory write
pub const MADCTL: u8 = 0x36; // Memory data access control
pub const COLMOD: u8 = 0x3A; // Interface pixel format

// Panel tuning
pub const PORCTRL: u8 = 0xB2; // Porch setting
pub const GCTRL: u8 = 0xB7; // Gate control
pub const VCOMS: u8 = 0xBB; // VCOM setting
pub const LCMCTRL: u8 = 0xC0; // LCM control
pub const VDVVRHEN: u8 = 0xC2; // VDV and VRH command enable
pub const VRHS: u8 = 0xC3; // VRH set
pub const VDVS: u8 = 0xC4; // VDV set
pub const FRCTRL2: u8 = 0xC6; // Frame rate control in normal mode
pub const PWCTRL1: u8 = 0xD0; // Power control 1
pub const PVGAMCTRL: u8 = 0xE0; // Positive voltage gamma control
pub const NVGAMCTRL: u8 = 0xE1; // Negative voltage gamma control

// Parameters
pub const MADCTL_ROTATE_180: u8 = 0xC0; // MY | MX
pub const COLMOD_RGB565: u8 = 0x55; // 16 bits per pixel

// Power-on timing minimums (ms)
pub const RESET_LOW_MS: u32 = 100;
pub const RESET_RECOVERY_MS: u32 = 120;
pub const SWRESET_DELAY_MS: u32 = 150;
pub const SLPOUT_DELAY_MS: u32 = 250;
pub const DISPON_DELAY_MS: u32 = 100;

/// Vendor panel tuning for the 1.3" Mini PiTFT, sent verbatim after the
/// pixel format is configured.
pub const PANEL_TUNING: &[(u8, &[u8])] = &[
    (PORCTRL, &[0x0C, 0x0C, 0x00, 0x33, 0x33]),
    (GCTRL, &[0x35]),
    (VCOMS, &[0x19]),
    (LCMCTRL, &[0x2C]),
    (VDVVRHEN, &[0x01]),
    (VRHS, &[0x12]),
    (VDVS, &[0x20]),
    (FRCTRL2, &[0x0F]),
    (PWCTRL1, &[0xA4, 0xA1]),
    (
        PVGAMCTRL,
        &[
            0xD0, 0x04, 0x0D, 0x11, 0x13, 0x2B, 0x3F, 0x54, 0x4C, 0x18, 0x0D, 0x0B, 0x1F, 0x23,
        ],
    ),
    (
        NVGAMCTRL,
        &[
            0xD0, 0x04, 0x0C, 0x11, 0x13, 0x2C, 0x3F, 0x44, 0x51, 0x2F, 0x1F, 0x1F, 0x20, 0x23,
        ],
    ),
];
