//! Command handlers for the CLI application.
//!
//! Handlers are grouped by what they touch:
//! - `layout`: layout commands (read-layout, print-layout, write-layout, check-layout)
//! - `macros`: macro commands (read-macros, print-macros, write-macros)
//! - `settings`: controller settings (read-pwm, write-pwm, read-debounce, write-debounce)
//! - `utility`: utility commands (version, list)
//! - `editor`: the interactive layout editor

pub mod editor;
pub mod layout;
pub mod macros;
pub mod settings;
pub mod utility;

use anyhow::Context;
use blusb::config::DeviceConfig;
use blusb_keyboard::Keyboard;
use blusb_transport::{MockTransport, PrinterTransport, Transport, UsbDiscovery};
use tracing::info;

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// How commands reach the controller
#[derive(Debug, Clone)]
pub struct DeviceOptions {
    /// Log every request and reply
    pub monitor: bool,
    /// Hex dump payloads while monitoring
    pub hex: bool,
    /// Use the in-memory controller
    pub mock: bool,
    pub device: DeviceConfig,
}

impl DeviceOptions {
    pub fn discovery(&self) -> UsbDiscovery {
        UsbDiscovery::with_ids(self.device.vendor_id, self.device.product_id)
            .with_timeout(self.device.timeout_ms)
    }
}

/// Open the controller, wrapped for monitoring when requested
pub fn open_keyboard(opts: &DeviceOptions) -> anyhow::Result<Keyboard> {
    let transport: Box<dyn Transport> = if opts.mock {
        info!("Using the in-memory controller");
        Box::new(MockTransport::new())
    } else {
        Box::new(
            opts.discovery()
                .open_first()
                .context("Could not find keyboard")?,
        )
    };

    let transport = if opts.monitor {
        PrinterTransport::wrap(transport, opts.hex)
    } else {
        transport
    };
    Ok(Keyboard::with_transport(transport))
}

/// Open the controller and run a closure with it
pub fn with_keyboard<F>(opts: &DeviceOptions, f: F) -> CommandResult
where
    F: FnOnce(&Keyboard) -> CommandResult,
{
    let keyboard = open_keyboard(opts)?;
    info!("Using {}", keyboard.device_info().display_name());
    f(&keyboard)
}
