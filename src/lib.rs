pub mod clock;
pub mod configs;
pub mod errors;
pub mod framebuffer;
pub mod hardware;
pub mod input;
mod logger;
pub mod metrics;
pub mod monitor;
pub mod navigation;
pub mod pages;
pub mod shutdown;
pub mod st7789;

use crate::configs::settings::MonitorSettings;
use crate::framebuffer::PixelBuffer;
use crate::metrics::{MetricsProvider, SystemMetricsProvider};
use crate::navigation::CycleStatus;
use crate::pages::{Page, PageRenderer, PageSnapshot, TextPageRenderer};
use anyhow::Result;
use once_cell::sync::Lazy;

pub use clock::{Clock, ManualClock, SystemClock};
pub use monitor::{Monitor, MonitorOptions};

const APP_NAME: &str = "PiTFT System Monitor";

pub static CONFIG: Lazy<MonitorSettings> = Lazy::new(|| match MonitorSettings::new() {
    Ok(config) => {
        config.print_config();
        config
    }
    Err(e) => {
        logger::error(format!("Failed to load config: {e}"));
        std::process::exit(1);
    }
});

/// Run the monitor on the attached display until SIGINT or SIGTERM.
#[cfg(target_os = "linux")]
pub fn run_monitor() -> Result<()> {
    use crate::errors::{Description, DriverError};
    use crate::hardware::{platform, StdDelay};
    use crate::shutdown::StopFlag;
    use crate::st7789::DisplayDriver;

    logger::app_start(APP_NAME, env!("CARGO_PKG_VERSION"));
    logger::set_debug_enabled(CONFIG.debugging.enable_debug_logs);

    let stop = StopFlag::new();
    stop.register_signals()?;

    logger::section("Claiming buttons");
    let buttons = platform::open_buttons(&CONFIG).inspect_err(|e| {
        logger::error(e.short_description());
        logger::detail(e.long_description());
    })?;

    let factory = platform::PlatformTransportFactory::from_settings(&CONFIG, stop.clone());
    let display = DisplayDriver::new(factory, StdDelay);
    let mut metrics = SystemMetricsProvider::new(CONFIG.pages.network_interface_prefix.clone());
    let renderer = TextPageRenderer::new(CONFIG.pages.temp_unit);
    let clock = SystemClock;

    Monitor::new(
        display,
        buttons,
        &mut metrics,
        &renderer,
        &clock,
        stop,
        MonitorOptions::from_settings(&CONFIG),
    )
    .run()
    .inspect_err(|e: &DriverError| {
        logger::error(e.short_description());
        logger::detail(e.long_description());
    })?;

    logger::success("Display released, exiting");
    logger::app_end();
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn run_monitor() -> Result<()> {
    logger::app_start(APP_NAME, env!("CARGO_PKG_VERSION"));
    anyhow::bail!("{APP_NAME} drives Raspberry Pi GPIO and SPI and only runs on Linux")
}

/// Render `page` with live metrics, as it would appear with auto-cycling
/// disabled. Used to preview layouts without hardware.
pub fn render_page_snapshot(page: Page) -> PixelBuffer {
    let mut metrics = SystemMetricsProvider::new(CONFIG.pages.network_interface_prefix.clone());
    let snapshot = match page {
        Page::System => PageSnapshot::System(metrics.system()),
        Page::Network => PageSnapshot::Network(metrics.network()),
        Page::Processes => {
            PageSnapshot::Processes(metrics.top_processes(CONFIG.pages.top_process_count.into_inner()))
        }
    };
    let slot = CONFIG
        .navigation
        .pages
        .iter()
        .position(|p| *p == page)
        .unwrap_or(0);
    TextPageRenderer::new(CONFIG.pages.temp_unit).render(slot, &snapshot, CycleStatus::Disabled)
}

pub fn render_splash_screen() -> PixelBuffer {
    let auto_cycle = CONFIG.navigation.controller_config().auto_cycle_interval;
    TextPageRenderer::new(CONFIG.pages.temp_unit).render_splash(auto_cycle)
}
