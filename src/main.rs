// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use opticheck::Config;
use opticheck::backends::camera::{CameraBackendManager, CameraBackendType};
use opticheck::constants::app_info;
use opticheck::scan::ScanKind;
use opticheck::wizard::WizardStep;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

mod cli;

#[derive(Parser)]
#[command(name = "opticheck")]
#[command(about = "Contactless check-in kiosk for clinics")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Camera backend to use (v4l2 or virtual); overrides the config file
    #[arg(long, global = true)]
    backend: Option<CameraBackendType>,

    /// Camera device path (e.g. /dev/video0); overrides the config file
    #[arg(long, global = true)]
    device: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full-screen check-in kiosk (default)
    Kiosk {
        /// Screen to open on, by route (e.g. /cvcheckin)
        #[arg(long, value_parser = parse_route, default_value = "/")]
        step: WizardStep,
    },

    /// List available cameras
    List,

    /// Run a single scan without the kiosk UI
    Scan {
        /// Which scan to run: face, id or vitals
        kind: ScanKind,
    },

    /// Show the configuration file path and effective settings
    Config {
        /// Write the effective settings to the configuration file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let kiosk = matches!(cli.command, None | Some(Commands::Kiosk { .. }));
    init_logging(kiosk);

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        Config::default()
    });
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(device) = cli.device {
        config.camera_path = Some(device);
    }

    let manager = CameraBackendManager::new(config.backend);

    match cli.command {
        None => opticheck::terminal::run(config, manager, WizardStep::Home)?,
        Some(Commands::Kiosk { step }) => opticheck::terminal::run(config, manager, step)?,
        Some(Commands::List) => cli::list_cameras(&manager)?,
        Some(Commands::Scan { kind }) => cli::run_scan(&manager, &config, kind)?,
        Some(Commands::Config { save }) => cli::show_config(&config, save)?,
    }
    Ok(())
}

fn parse_route(route: &str) -> Result<WizardStep, String> {
    WizardStep::from_route(route).ok_or_else(|| {
        let known: Vec<&str> = WizardStep::ALL.iter().map(|step| step.route()).collect();
        format!("unknown route '{}' (expected one of {})", route, known.join(", "))
    })
}

/// Initialize logging
///
/// Set RUST_LOG environment variable to control log level
/// Examples: RUST_LOG=debug, RUST_LOG=opticheck=debug, RUST_LOG=info
///
/// The kiosk owns the terminal, so it logs to `<cache_dir>/opticheck/kiosk.log`
/// instead of stderr.
fn init_logging(kiosk: bool) {
    let writer = if kiosk {
        match open_log_file() {
            Some(file) => BoxMakeWriter::new(Mutex::new(file)),
            None => BoxMakeWriter::new(std::io::sink),
        }
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_ansi(!kiosk)
        .with_writer(writer)
        .init();
}

fn log_file_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(app_info::DIR_NAME).join("kiosk.log"))
}

fn open_log_file() -> Option<std::fs::File> {
    let path = log_file_path()?;
    std::fs::create_dir_all(path.parent()?).ok()?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
}
