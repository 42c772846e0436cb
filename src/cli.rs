// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blusb")]
#[command(author, version, about = "Layout editor and tool for BlUSB keyboard controllers")]
#[command(propagate_version = true, args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Log every request sent to the controller and its reply
    #[arg(long, global = true)]
    pub monitor: bool,

    /// With --monitor, include a hex dump of each payload
    #[arg(long, global = true)]
    pub hex: bool,

    /// Talk to an in-memory controller instead of USB
    #[arg(long, global = true)]
    pub mock: bool,

    /// Configuration file (default: <config dir>/blusb/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Layout file to open in the editor
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // === Layout ===
    /// Print the controller's layout in the layout file format
    ReadLayout,

    /// Print the controller's layout as a table per layer
    PrintLayout,

    /// Write a layout file to the controller
    WriteLayout {
        /// Layout file
        file: PathBuf,
    },

    /// Parse a layout file without touching the controller
    CheckLayout {
        /// Layout file
        file: PathBuf,
    },

    // === Settings ===
    /// Read the backlight PWM values
    ReadPwm,

    /// Set the backlight PWM values
    WritePwm {
        /// Duty while powered over USB (0-255)
        usb: u8,
        /// Duty while on Bluetooth power (0-255)
        bluetooth: u8,
    },

    /// Read the debounce time
    ReadDebounce,

    /// Set the debounce time
    WriteDebounce {
        /// Milliseconds (1-255)
        #[arg(value_parser = clap::value_parser!(u8).range(1..))]
        ms: u8,
    },

    // === Macros ===
    /// Print the controller's macros in the macro file format
    ReadMacros,

    /// Print the controller's macros as a table
    PrintMacros,

    /// Write a macro file to the controller
    WriteMacros {
        /// Macro file
        file: PathBuf,
    },

    // === Utility ===
    /// Show software and firmware versions
    #[command(visible_alias = "ver")]
    Version,

    /// List connected controllers
    List,

    /// Start the layout editor
    Edit {
        /// Layout file to open instead of reading the controller
        file: Option<PathBuf>,
    },
}
