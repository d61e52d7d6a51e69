//! The fixed-period monitor loop.
//!
//! Each iteration polls the buttons, lets the navigation controller decide
//! the page, and renders and presents a frame when the page changed or its
//! refresh interval elapsed. Frame transfer errors are logged and the frame
//! is dropped; only display bring-up failures end the loop early.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::clock::Clock;
use crate::configs::settings::MonitorSettings;
use crate::errors::{Description, DriverError};
use crate::framebuffer::PixelBuffer;
use crate::hardware::{Delay, InputLine};
use crate::input::ButtonPair;
use crate::logger;
use crate::metrics::MetricsProvider;
use crate::navigation::{NavigationConfig, NavigationController};
use crate::pages::{Page, PageRenderer, PageSnapshot};
use crate::shutdown::StopFlag;
use crate::st7789::{DisplayDriver, TransportFactory};

/// Loop parameters, normally taken from [`MonitorSettings`].
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    /// Navigation order. Never empty.
    pub pages: Vec<Page>,
    pub auto_cycle_interval: Option<Duration>,
    pub manual_override: Duration,
    pub poll_interval: Duration,
    /// Refresh cadence, indexed like `pages`.
    pub refresh_intervals: Vec<Duration>,
    pub top_process_count: usize,
    pub splash_duration: Duration,
    /// Directory receiving `<page>.png` for every presented frame.
    pub frame_dump_dir: Option<PathBuf>,
}

impl MonitorOptions {
    pub fn from_settings(settings: &MonitorSettings) -> Self {
        let navigation = settings.navigation.controller_config();
        let pages = settings.navigation.pages.clone();
        let refresh_intervals = pages
            .iter()
            .map(|page| settings.pages.refresh_secs.for_page(*page))
            .collect();
        Self {
            pages,
            auto_cycle_interval: navigation.auto_cycle_interval,
            manual_override: navigation.manual_override,
            poll_interval: settings.navigation.poll_interval(),
            refresh_intervals,
            top_process_count: settings.pages.top_process_count.into_inner(),
            splash_duration: Duration::from_secs(settings.misc.splash_duration_secs),
            frame_dump_dir: settings
                .debugging
                .dump_frames
                .then(|| PathBuf::from("frames")),
        }
    }

    fn navigation_config(&self) -> NavigationConfig {
        NavigationConfig {
            page_count: self.pages.len(),
            auto_cycle_interval: self.auto_cycle_interval,
            manual_override: self.manual_override,
        }
    }
}

/// Everything the loop drives. The display driver is owned; the ambient
/// services are borrowed so callers can inspect them afterwards.
pub struct Monitor<'a, F: TransportFactory, D, L> {
    display: DisplayDriver<F, D>,
    buttons: ButtonPair<L>,
    metrics: &'a mut dyn MetricsProvider,
    renderer: &'a dyn PageRenderer,
    clock: &'a dyn Clock,
    stop: StopFlag,
    options: MonitorOptions,
}

impl<'a, F, D, L> Monitor<'a, F, D, L>
where
    F: TransportFactory,
    D: Delay,
    L: InputLine,
{
    pub fn new(
        display: DisplayDriver<F, D>,
        buttons: ButtonPair<L>,
        metrics: &'a mut dyn MetricsProvider,
        renderer: &'a dyn PageRenderer,
        clock: &'a dyn Clock,
        stop: StopFlag,
        options: MonitorOptions,
    ) -> Self {
        Self {
            display,
            buttons,
            metrics,
            renderer,
            clock,
            stop,
            options,
        }
    }

    /// Bring up the display and run until the stop flag is raised.
    ///
    /// # Errors
    ///
    /// Returns the initialisation error if the display cannot be brought up.
    /// Steady-state transfer failures are logged, never returned.
    pub fn run(mut self) -> Result<(), DriverError> {
        logger::section("Initializing display");
        self.display.initialize()?;

        self.show_splash();

        let mut navigation =
            NavigationController::new(self.options.navigation_config(), self.clock.now());
        let mut last_update = self.show_page(&navigation);

        logger::section("Monitoring");
        while !self.stop.is_stopped() {
            let now = self.clock.now();
            let edges = self.buttons.poll();

            let changed = if edges.is_empty() {
                let changed = navigation.on_tick(now).changed_page().is_some();
                if changed {
                    self.log_page_change("Auto-cycle", navigation.current_page());
                }
                changed
            } else {
                for direction in edges {
                    navigation.on_button_edge(direction, now);
                    logger::debug(format!("{direction} button pressed"));
                }
                self.log_page_change("Manual", navigation.current_page());
                true
            };

            let refresh = self
                .options
                .refresh_intervals
                .get(navigation.current_page())
                .copied()
                .unwrap_or(self.options.poll_interval);
            if changed || now.saturating_duration_since(last_update) >= refresh {
                last_update = self.show_page(&navigation);
            }

            self.clock.sleep(self.options.poll_interval);
        }

        logger::section("Shutting down");
        self.display.shutdown();
        Ok(())
    }

    fn show_splash(&mut self) {
        let frame = self.renderer.render_splash(self.options.auto_cycle_interval);
        self.present(frame, "splash");

        let start = self.clock.now();
        while !self.stop.is_stopped()
            && self.clock.now().saturating_duration_since(start) < self.options.splash_duration
        {
            self.clock.sleep(self.options.poll_interval);
        }
    }

    /// Render and present the current page. Returns the time the metrics
    /// were sampled.
    fn show_page(&mut self, navigation: &NavigationController) -> Instant {
        let slot = navigation.current_page();
        let page = self.options.pages[slot];
        let snapshot = self.collect(page);
        let now = self.clock.now();
        let frame = self
            .renderer
            .render(slot, &snapshot, navigation.remaining_and_mode(now));
        self.present(frame, &page.to_string());
        now
    }

    fn collect(&mut self, page: Page) -> PageSnapshot {
        match page {
            Page::System => PageSnapshot::System(self.metrics.system()),
            Page::Network => PageSnapshot::Network(self.metrics.network()),
            Page::Processes => {
                PageSnapshot::Processes(self.metrics.top_processes(self.options.top_process_count))
            }
        }
    }

    fn present(&mut self, frame: PixelBuffer, name: &str) {
        if let Some(dir) = &self.options.frame_dump_dir {
            let path = dir.join(format!("{name}.png"));
            let saved = std::fs::create_dir_all(dir)
                .map_err(image::ImageError::IoError)
                .and_then(|()| frame.save_png(&path));
            if let Err(e) = saved {
                logger::warning(format!("Could not dump frame to {}: {e}", path.display()));
            }
        }

        if let Err(e) = self.display.present(frame) {
            logger::error(format!("{}: {e}", e.short_description()));
        }
    }

    fn log_page_change(&self, source: &str, slot: usize) {
        logger::info(format!(
            "{source}: page {slot} ({})",
            self.options.pages[slot]
        ));
    }
}
