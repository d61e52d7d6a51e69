use anyhow::Result;

#[cfg(not(feature = "cli"))]
use pitft_system_monitor::run_monitor;

// CLI features only available when 'cli' feature is enabled (for previewing layouts)
#[cfg(feature = "cli")]
mod cli {
    use anyhow::{bail, Context, Result};
    use clap::{Parser, ValueEnum};
    use pitft_system_monitor::{pages::Page, render_page_snapshot, render_splash_screen, run_monitor};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Copy, ValueEnum)]
    pub enum PageArg {
        System,
        Network,
        Processes,
    }

    impl From<PageArg> for Page {
        fn from(arg: PageArg) -> Self {
            match arg {
                PageArg::System => Page::System,
                PageArg::Network => Page::Network,
                PageArg::Processes => Page::Processes,
            }
        }
    }

    /// PiTFT System Monitor - live host metrics on a 240x240 ST7789 display
    #[derive(Parser, Debug)]
    #[command(name = "pitft-system-monitor")]
    #[command(version, about, long_about = None)]
    pub struct Args {
        /// Render one page with live metrics to a PNG instead of driving the display
        #[arg(long, value_enum, value_name = "PAGE", conflicts_with = "splash")]
        pub snapshot: Option<PageArg>,

        /// Render the startup splash screen to a PNG
        #[arg(long)]
        pub splash: bool,

        /// Destination PNG for --snapshot or --splash
        #[arg(long, value_name = "PNG")]
        pub output: Option<PathBuf>,
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();

        let frame = match (args.snapshot, args.splash) {
            (Some(page), _) => render_page_snapshot(page.into()),
            (None, true) => render_splash_screen(),
            (None, false) => return run_monitor(),
        };

        let Some(output) = args.output else {
            bail!("--output <PNG> is required with --snapshot or --splash");
        };
        frame
            .save_png(&output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("Wrote {}", output.display());
        Ok(())
    }
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    cli::run()
}

#[cfg(not(feature = "cli"))]
fn main() -> Result<()> {
    run_monitor()?;
    Ok(())
}
