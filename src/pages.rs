//! Page layouts drawn with `embedded-graphics` mono fonts into a
//! [`PixelBuffer`].
//!
//! Rendering is pure: the same snapshot and status always produce the same
//! pixels. Every page shares the same frame: coloured title top left, red
//! `P<n>` indicator top right, a purple auto-cycle line and the green button
//! hints along the bottom.

use std::time::Duration;

use embedded_graphics::{
    mono_font::{iso_8859_1, MonoFont, MonoTextStyle},
    pixelcolor::{Rgb888, RgbColor},
    prelude::*,
    text::{Baseline, Text},
};
use serde::Deserialize;
use strum_macros::{Display, EnumIter};

use crate::configs::settings::TemperatureUnit;
use crate::framebuffer::{PixelBuffer, WIDTH};
use crate::metrics::{NetworkSnapshot, ProcessEntry, SystemSnapshot};
use crate::navigation::CycleStatus;

const FONT: &MonoFont<'static> = &iso_8859_1::FONT_10X20;
const FONT_SMALL: &MonoFont<'static> = &iso_8859_1::FONT_8X13;

const WHITE: Rgb888 = Rgb888::WHITE;
const BLUE: Rgb888 = Rgb888::new(0, 100, 255);
const GREEN: Rgb888 = Rgb888::new(0, 255, 0);
const RED: Rgb888 = Rgb888::new(255, 0, 0);
const PURPLE: Rgb888 = Rgb888::new(128, 0, 128);
const BRIGHT_YELLOW: Rgb888 = Rgb888::new(255, 255, 0);
const BRIGHT_BLUE: Rgb888 = Rgb888::new(0, 150, 255);
const BRIGHT_ORANGE: Rgb888 = Rgb888::new(255, 165, 0);

const MARGIN: i32 = 10;
const TITLE_Y: i32 = 8;
const FIRST_LINE_Y: i32 = 35;
const LINE_HEIGHT: i32 = 20;
const HINT_NEXT_Y: i32 = 180;
const HINT_PREV_Y: i32 = 205;
const UNAVAILABLE: &str = "N/A";
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[strum(serialize = "system")]
    System,
    #[strum(serialize = "network")]
    Network,
    #[strum(serialize = "processes")]
    Processes,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Page::System => "-- SYSTEM INFO --",
            Page::Network => "-- NETWORK INFO --",
            Page::Processes => "-- TOP PROCESSES --",
        }
    }

    pub fn title_color(self) -> Rgb888 {
        match self {
            Page::System => BRIGHT_YELLOW,
            Page::Network => BRIGHT_BLUE,
            Page::Processes => BRIGHT_ORANGE,
        }
    }

    /// Vertical position of the auto-cycle line, just below the page body.
    fn status_y(self) -> i32 {
        match self {
            Page::System => 140,
            Page::Network => 100,
            Page::Processes => 155,
        }
    }
}

/// Metrics gathered for one page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageSnapshot {
    System(SystemSnapshot),
    Network(NetworkSnapshot),
    Processes(Vec<ProcessEntry>),
}

impl PageSnapshot {
    pub fn page(&self) -> Page {
        match self {
            PageSnapshot::System(_) => Page::System,
            PageSnapshot::Network(_) => Page::Network,
            PageSnapshot::Processes(_) => Page::Processes,
        }
    }
}

pub trait PageRenderer {
    /// `slot` is the page's position in the navigation order, shown as `P<slot>`.
    fn render(&self, slot: usize, snapshot: &PageSnapshot, status: CycleStatus) -> PixelBuffer;

    /// Startup screen. `auto_cycle` is the configured interval, if enabled.
    fn render_splash(&self, auto_cycle: Option<Duration>) -> PixelBuffer;
}

#[derive(Debug, Clone, Copy)]
pub struct TextPageRenderer {
    temp_unit: TemperatureUnit,
}

impl TextPageRenderer {
    pub fn new(temp_unit: TemperatureUnit) -> Self {
        Self { temp_unit }
    }
}

impl PageRenderer for TextPageRenderer {
    fn render(&self, slot: usize, snapshot: &PageSnapshot, status: CycleStatus) -> PixelBuffer {
        let mut buffer = PixelBuffer::new();
        if let Err(never) = self.draw_page(&mut buffer, slot, snapshot, status) {
            match never {}
        }
        buffer
    }

    fn render_splash(&self, auto_cycle: Option<Duration>) -> PixelBuffer {
        let mut buffer = PixelBuffer::new();
        if let Err(never) = draw_splash(&mut buffer, auto_cycle) {
            match never {}
        }
        buffer
    }
}

impl TextPageRenderer {
    fn draw_page<D>(
        &self,
        target: &mut D,
        slot: usize,
        snapshot: &PageSnapshot,
        status: CycleStatus,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let page = snapshot.page();
        text(target, page.title(), MARGIN, TITLE_Y, FONT, page.title_color())?;

        let lines = match snapshot {
            PageSnapshot::System(system) => self.system_lines(system),
            PageSnapshot::Network(network) => network_lines(network),
            PageSnapshot::Processes(processes) => process_lines(processes),
        };
        let mut y = FIRST_LINE_Y;
        for line in &lines {
            text(target, line, MARGIN, y, FONT, WHITE)?;
            y += LINE_HEIGHT;
        }

        text(target, &status_line(status), MARGIN, page.status_y(), FONT_SMALL, PURPLE)?;
        text(target, "Top: Next ->", MARGIN, HINT_NEXT_Y, FONT, GREEN)?;
        text(target, "Bottom: <- Prev", MARGIN, HINT_PREV_Y, FONT, GREEN)?;
        text(target, &format!("P{slot}"), WIDTH as i32 - 25, MARGIN, FONT, RED)?;
        Ok(())
    }

    fn system_lines(&self, system: &SystemSnapshot) -> Vec<String> {
        let ip = system
            .ip
            .map_or_else(|| UNAVAILABLE.to_string(), |ip| ip.to_string());
        vec![
            format!("IP: {ip}"),
            format!("CPU: {}", format_percent(system.cpu_percent)),
            format!("RAM: {}", format_percent(system.ram_percent)),
            format!("Disk: {}", format_percent(system.disk_percent)),
            format!(
                "Temp: {}",
                format_temperature(system.temperature_celsius, self.temp_unit)
            ),
        ]
    }
}

fn draw_splash<D>(target: &mut D, auto_cycle: Option<Duration>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let auto = match auto_cycle {
        Some(interval) => format!("Auto-Cycling: {}", format_interval(interval)),
        None => "Auto-Cycling: off".to_string(),
    };
    text(target, "System Monitor", 40, 80, FONT, WHITE)?;
    text(target, "Ready!", 90, 100, FONT, GREEN)?;
    text(target, &auto, 30, 125, FONT_SMALL, PURPLE)?;
    text(target, "Top: Next ->", MARGIN, 160, FONT, BLUE)?;
    text(target, "Bottom: <- Prev", MARGIN, 180, FONT, BLUE)?;
    text(target, "Buttons pause auto", MARGIN, 205, FONT_SMALL, PURPLE)?;
    Ok(())
}

fn text<D>(
    target: &mut D,
    content: &str,
    x: i32,
    y: i32,
    font: &MonoFont<'_>,
    color: Rgb888,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let style = MonoTextStyle::new(font, color);
    Text::with_baseline(content, Point::new(x, y), style, Baseline::Top).draw(target)?;
    Ok(())
}

fn network_lines(network: &NetworkSnapshot) -> Vec<String> {
    match &network.interface {
        Some(counters) => vec![
            format!("Interface: {}", counters.name),
            format!("Sent: {}", format_megabytes(counters.bytes_sent)),
            format!("Received: {}", format_megabytes(counters.bytes_received)),
        ],
        None => vec![
            "Interface: No Ethernet".to_string(),
            "Sent: 0 MB".to_string(),
            "Received: 0 MB".to_string(),
        ],
    }
}

fn process_lines(processes: &[ProcessEntry]) -> Vec<String> {
    let columns = (WIDTH - MARGIN as usize) / FONT.character_size.width as usize;
    processes
        .iter()
        .enumerate()
        .map(|(i, process)| {
            let prefix = format!("{}. ", i + 1);
            let suffix = format!(" {:.1}%", process.memory_percent);
            let room = columns.saturating_sub(prefix.len() + suffix.len());
            let label: String = process.label.chars().take(room).collect();
            format!("{prefix}{label}{suffix}")
        })
        .collect()
}

pub fn status_line(status: CycleStatus) -> String {
    match status {
        CycleStatus::Auto { remaining } => {
            let secs = remaining.as_secs();
            format!("Auto: {}:{:02}", secs / 60, secs % 60)
        }
        CycleStatus::Manual { remaining } => format!("Manual: {}s", remaining.as_secs()),
        CycleStatus::Disabled => "Auto: off".to_string(),
    }
}

fn format_percent(value: Option<f32>) -> String {
    value.map_or_else(|| UNAVAILABLE.to_string(), |v| format!("{v:.1}%"))
}

pub fn format_temperature(celsius: Option<f32>, unit: TemperatureUnit) -> String {
    match (celsius, unit) {
        (None, _) => UNAVAILABLE.to_string(),
        (Some(c), TemperatureUnit::C) => format!("{c:.1}°C"),
        (Some(c), TemperatureUnit::F) => format!("{:.1}°F", c * 9.0 / 5.0 + 32.0),
    }
}

fn format_megabytes(bytes: u64) -> String {
    format!("{:.1}MB", bytes as f64 / BYTES_PER_MB)
}

fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        format!("{}min", secs / 60)
    } else {
        format!("{secs}s")
    }
}
