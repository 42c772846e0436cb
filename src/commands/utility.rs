//! Utility command handlers.

use anyhow::Context;
use tracing::warn;

use blusb_transport::TransportDeviceInfo;

use super::{open_keyboard, CommandResult, DeviceOptions};

/// Software version, then the firmware version when a controller answers
pub fn version(opts: &DeviceOptions) -> CommandResult {
    println!("blusb {}", env!("CARGO_PKG_VERSION"));
    let keyboard = match open_keyboard(opts) {
        Ok(keyboard) => keyboard,
        Err(e) => {
            warn!("{e:#}");
            println!("Firmware: no controller found");
            return Ok(());
        }
    };
    let firmware = keyboard
        .read_version()
        .context("Reading the firmware version")?;
    println!("Firmware: {firmware}");
    Ok(())
}

/// List connected controllers
pub fn list(opts: &DeviceOptions) -> CommandResult {
    if opts.mock {
        println!("mock: in-memory controller");
        return Ok(());
    }
    let devices = opts.discovery().list_devices()?;
    if devices.is_empty() {
        println!(
            "No controllers found ({:04x}:{:04x})",
            opts.device.vendor_id, opts.device.product_id
        );
        return Ok(());
    }
    for device in devices {
        println!("{}", device_line(&device.info));
    }
    Ok(())
}

/// One `list` line: name, VID:PID, bus location and serial when known
fn device_line(info: &TransportDeviceInfo) -> String {
    let mut line = format!(
        "{}  {:04x}:{:04x}  {}",
        info.display_name(),
        info.vid,
        info.pid,
        info.device_path
    );
    if let Some(serial) = &info.serial {
        line.push_str("  serial ");
        line.push_str(serial);
    }
    line
}
