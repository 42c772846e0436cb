//! BlUSB keyboard controller CLI
//!
//! Without a subcommand the layout editor starts, on the given file or
//! on the layout read from the controller.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use blusb::config::Config;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;
use commands::DeviceOptions;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)?;

    // The editor owns the terminal, so its log goes to a file
    let editing = matches!(cli.command, None | Some(Commands::Edit { .. }));
    init_logging(&cli.log_level, editing.then(|| config.log_file()))?;
    debug!("Config from {}", config_path.display());

    let opts = DeviceOptions {
        monitor: cli.monitor,
        hex: cli.hex,
        mock: cli.mock,
        device: config.device.clone(),
    };

    match cli.command {
        None => {
            commands::editor::run(&opts, &config, cli.file.as_deref())?;
        }
        Some(Commands::Edit { file }) => {
            commands::editor::run(&opts, &config, file.as_deref())?;
        }

        // === Layout ===
        Some(Commands::ReadLayout) => {
            commands::layout::read(&opts)?;
        }
        Some(Commands::PrintLayout) => {
            commands::layout::print(&opts)?;
        }
        Some(Commands::WriteLayout { file }) => {
            commands::layout::write(&opts, &file)?;
        }
        Some(Commands::CheckLayout { file }) => {
            commands::layout::check(&file)?;
        }

        // === Settings ===
        Some(Commands::ReadPwm) => {
            commands::settings::read_pwm(&opts)?;
        }
        Some(Commands::WritePwm { usb, bluetooth }) => {
            commands::settings::write_pwm(&opts, usb, bluetooth)?;
        }
        Some(Commands::ReadDebounce) => {
            commands::settings::read_debounce(&opts)?;
        }
        Some(Commands::WriteDebounce { ms }) => {
            commands::settings::write_debounce(&opts, ms)?;
        }

        // === Macros ===
        Some(Commands::ReadMacros) => {
            commands::macros::read(&opts)?;
        }
        Some(Commands::PrintMacros) => {
            commands::macros::print(&opts)?;
        }
        Some(Commands::WriteMacros { file }) => {
            commands::macros::write(&opts, &file)?;
        }

        // === Utility ===
        Some(Commands::Version) => {
            commands::utility::version(&opts)?;
        }
        Some(Commands::List) => {
            commands::utility::list(&opts)?;
        }
    }

    Ok(())
}

/// RUST_LOG wins over `--log-level`; `log_file` redirects output away from stderr
fn init_logging(level: &str, log_file: Option<PathBuf>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level '{level}'"))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Creating {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Opening log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
