use super::validation::*;
use crate::navigation::NavigationConfig;
use crate::pages::Page;
use nutype::nutype;
use serde::Deserialize;
use std::{
    env, fmt,
    path::{Path, PathBuf},
    time::Duration,
};
use strum_macros::Display;

use config::{Config, ConfigError, Environment, File};
const CONFIG_DIR: &str = "./config";
const DEFAULT_CONFIG_NAME: &str = "default";

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy, Display)]
#[serde(rename_all = "snake_case")]
pub enum GpioBackend {
    /// Memory-mapped `/dev/gpiomem` (Pi Zero to Pi 5).
    #[strum(serialize = "rppal")]
    Rppal,
    /// Kernel `/sys/class/gpio` interface.
    #[strum(serialize = "sysfs")]
    Sysfs,
}

#[derive(Debug, Deserialize, PartialOrd, PartialEq, Clone, Copy, Display)]
#[serde(rename_all = "UPPERCASE")]
pub enum TemperatureUnit {
    #[strum(serialize = "C")]
    C,
    #[strum(serialize = "F")]
    F,
}

#[nutype(
    sanitize(),
    validate(with = is_valid_bcm_pin, error = ValidationError),
    derive(Debug, Deserialize, PartialEq, Clone, Copy, AsRef)
)]
pub struct BcmPin(u8);

impl fmt::Display for BcmPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.into_inner())
    }
}

#[nutype(
    sanitize(trim),
    validate(with = is_valid_spi_device, error = ValidationError),
    derive(Debug, Deserialize, PartialEq, Clone, AsRef)
)]
pub struct SpiDevice(String);

impl fmt::Display for SpiDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clone().into_inner())
    }
}

#[nutype(
    sanitize(),
    validate(greater_or_equal = 100_000, less_or_equal = 62_500_000),
    derive(Debug, Deserialize, PartialEq, Clone, Copy, AsRef)
)]
pub struct SpiSpeedHz(u32);

impl fmt::Display for SpiSpeedHz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.into_inner())
    }
}

#[nutype(
    sanitize(),
    validate(with = is_positive_seconds, error = ValidationError),
    derive(Debug, Deserialize, PartialEq, Clone, Copy, AsRef)
)]
pub struct Seconds(f64);

impl Seconds {
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs_f64(self.into_inner())
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.into_inner())
    }
}

#[nutype(
    sanitize(),
    validate(greater_or_equal = 10, less_or_equal = 1000),
    derive(Debug, Deserialize, PartialEq, Clone, Copy, AsRef)
)]
pub struct PollIntervalMs(u64);

impl fmt::Display for PollIntervalMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ms", self.into_inner())
    }
}

#[nutype(
    sanitize(),
    validate(greater_or_equal = 1, less_or_equal = 5),
    derive(Debug, Deserialize, PartialEq, Clone, Copy, AsRef)
)]
pub struct TopProcessCount(usize);

impl fmt::Display for TopProcessCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}

#[derive(Debug, Deserialize)]
pub struct DisplayPins {
    pub spi_device: SpiDevice,
    pub spi_speed_hz: SpiSpeedHz,
    pub dc_pin: BcmPin,
    pub rst_pin: BcmPin,
}

#[derive(Debug, Deserialize)]
pub struct Buttons {
    pub previous_pin: BcmPin,
    pub next_pin: BcmPin,
}

#[derive(Debug, Deserialize)]
pub struct Gpio {
    pub backend: GpioBackend,
    /// Added to BCM numbers by the sysfs backend (571 on a Pi 5).
    #[serde(default)]
    pub sysfs_chip_base: u32,
}

#[derive(Debug, Deserialize)]
pub struct Navigation {
    pub pages: Vec<Page>,
    pub auto_cycle_enabled: bool,
    pub auto_cycle_interval_secs: Seconds,
    pub manual_override_secs: Seconds,
    pub poll_interval_ms: PollIntervalMs,
}

impl Navigation {
    pub fn controller_config(&self) -> NavigationConfig {
        NavigationConfig {
            page_count: self.pages.len(),
            auto_cycle_interval: self
                .auto_cycle_enabled
                .then(|| self.auto_cycle_interval_secs.as_duration()),
            manual_override: self.manual_override_secs.as_duration(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.into_inner())
    }
}

#[derive(Debug, Deserialize)]
pub struct RefreshIntervals {
    pub system: Seconds,
    pub network: Seconds,
    pub processes: Seconds,
}

impl RefreshIntervals {
    pub fn for_page(&self, page: Page) -> Duration {
        match page {
            Page::System => self.system.as_duration(),
            Page::Network => self.network.as_duration(),
            Page::Processes => self.processes.as_duration(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PageOptions {
    pub refresh_secs: RefreshIntervals,
    pub network_interface_prefix: String,
    pub top_process_count: TopProcessCount,
    pub temp_unit: TemperatureUnit,
}

#[derive(Debug, Deserialize)]
pub struct Misc {
    #[serde(default = "default_splash_duration_secs")]
    pub splash_duration_secs: u64,
}

fn default_splash_duration_secs() -> u64 {
    4
}

#[derive(Debug, Deserialize)]
pub struct Debugging {
    pub enable_debug_logs: bool,
    /// Save every presented frame as `frames/<page>.png`.
    #[serde(default)]
    pub dump_frames: bool,
}

#[derive(Debug, Deserialize)]
pub struct MonitorSettings {
    pub display: DisplayPins,
    pub buttons: Buttons,
    pub gpio: Gpio,
    pub navigation: Navigation,
    pub pages: PageOptions,
    pub misc: Misc,
    pub debugging: Debugging,
}

/// Monitor settings.
///
/// Sources are merged in order, later ones overriding earlier ones:
///
/// * `config/default.toml` - required.
/// * `~/.config/pitft-system-monitor.toml` - optional user overrides.
/// * `config/development.toml`, `config/local.toml` - optional, or
///   `config/test.toml` alone when `RUN_MODE=test`.
/// * `APP_<SECTION>__<KEY>` environment variables.
///
/// # Errors
///
/// Returns an error if a source cannot be parsed or a value fails validation.
impl MonitorSettings {
    pub(crate) fn new() -> Result<Self, ConfigError> {
        let root = std::env::current_dir().map_err(|e| ConfigError::Message(e.to_string()))?;
        let home = env::var_os("HOME").map(PathBuf::from);
        Self::load_from(&root, home.as_deref())
    }

    pub fn load_from(root: &Path, home: Option<&Path>) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let is_test_mode = run_mode == "test";

        let config_dir = root.join(CONFIG_DIR);
        let default_config_path = config_dir.join(DEFAULT_CONFIG_NAME);

        let mut config_builder = Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(File::from(default_config_path.with_extension("toml")));

        // user config path is located at ~/.config/pitft-system-monitor.toml
        if let Some(home) = home {
            let user_config_path = home
                .join(".config")
                .join(format!("{}.toml", env!("CARGO_PKG_NAME")));
            config_builder = config_builder.add_source(File::from(user_config_path).required(false));
        }

        let overlays: &[&str] = if is_test_mode {
            &["test"]
        } else {
            &["development", "local"]
        };
        for name in overlays {
            let path = config_dir.join(format!("{name}.toml"));
            config_builder = config_builder.add_source(File::from(path).required(false));
        }

        let settings = config_builder
            // Eg.. `APP_NAVIGATION__AUTO_CYCLE_ENABLED=false` would set `navigation.auto_cycle_enabled`
            // Note: Single underscore _ separates prefix from key, double __ for nesting
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("navigation.pages")
                    .try_parsing(true),
            )
            .build()?;

        let final_settings: MonitorSettings = settings.try_deserialize().map_err(|error| {
            ConfigError::Message(format!("Configuration validation failed: {error:?}"))
        })?;
        final_settings.validate()?;
        Ok(final_settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let pages = &self.navigation.pages;
        if pages.is_empty() {
            return Err(ConfigError::Message(
                "navigation.pages must list at least one page".into(),
            ));
        }
        for (i, page) in pages.iter().enumerate() {
            if pages[..i].contains(page) {
                return Err(ConfigError::Message(format!(
                    "navigation.pages lists '{page}' more than once"
                )));
            }
        }

        let pins = [
            ("display.dc_pin", self.display.dc_pin),
            ("display.rst_pin", self.display.rst_pin),
            ("buttons.previous_pin", self.buttons.previous_pin),
            ("buttons.next_pin", self.buttons.next_pin),
        ];
        for (i, (name, pin)) in pins.iter().enumerate() {
            if let Some((other, _)) = pins[..i].iter().find(|(_, p)| p == pin) {
                return Err(ConfigError::Message(format!(
                    "{name} and {other} are both assigned to {pin}"
                )));
            }
        }
        Ok(())
    }

    /// Print configuration settings in a structured, hierarchical format
    pub fn print_config(&self) {
        use crate::logger;

        logger::section("Configuration loaded");

        logger::config_group("Display");
        logger::kvp("SPI Device", &self.display.spi_device);
        logger::kvp("SPI Speed", self.display.spi_speed_hz);
        logger::kvp("DC Pin", self.display.dc_pin);
        logger::kvp("RST Pin", self.display.rst_pin);

        logger::config_group("Buttons");
        logger::kvp("Previous", self.buttons.previous_pin);
        logger::kvp("Next", self.buttons.next_pin);

        logger::config_group("GPIO");
        logger::kvp("Backend", self.gpio.backend);
        if self.gpio.backend == GpioBackend::Sysfs {
            logger::kvp("Chip Base", self.gpio.sysfs_chip_base);
        }

        logger::config_group("Navigation");
        let pages: Vec<String> = self.navigation.pages.iter().map(|p| p.to_string()).collect();
        logger::kvp("Pages", pages.join(", "));
        logger::kvp("Auto-Cycle", self.navigation.auto_cycle_enabled);
        if self.navigation.auto_cycle_enabled {
            logger::kvp("Auto-Cycle Interval", self.navigation.auto_cycle_interval_secs);
        }
        logger::kvp("Manual Override", self.navigation.manual_override_secs);
        logger::kvp("Poll Interval", self.navigation.poll_interval_ms);

        logger::config_group("Pages");
        logger::kvp("System Refresh", self.pages.refresh_secs.system);
        logger::kvp("Network Refresh", self.pages.refresh_secs.network);
        logger::kvp("Processes Refresh", self.pages.refresh_secs.processes);
        logger::kvp("Interface Prefix", &self.pages.network_interface_prefix);
        logger::kvp("Top Processes", self.pages.top_process_count);
        logger::kvp("Temperature Unit", self.pages.temp_unit);

        logger::config_group("Debug Flags");
        logger::kvp("Enable Debug Logs", self.debugging.enable_debug_logs);
        logger::kvp("Dump Frames", self.debugging.dump_frames);
    }
}
