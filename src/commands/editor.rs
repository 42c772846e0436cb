//! Interactive layout editor.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use blusb::codec;
use blusb::config::Config;
use blusb::tui::{Editor, TerminalSurface};
use blusb_keyboard::Layout;
use tracing::warn;

use super::{open_keyboard, CommandResult, DeviceOptions};

/// Edit `file`, or the controller's layout when no file is given
///
/// Without a controller the editor still opens a file, offline; without
/// either there is nothing to edit.
pub fn run(opts: &DeviceOptions, config: &Config, file: Option<&Path>) -> CommandResult {
    let keyboard = match open_keyboard(opts) {
        Ok(keyboard) => Some(keyboard),
        Err(e) if file.is_some() => {
            warn!("{e:#}, editing offline");
            None
        }
        Err(e) => return Err(e),
    };

    let _service = match &keyboard {
        Some(kb) => {
            std::thread::sleep(Duration::from_millis(config.device.service_mode_settle_ms));
            Some(kb.service_mode().context("Enabling service mode")?)
        }
        None => None,
    };

    let layout = if let Some(path) = file {
        codec::load_layout(path)?
    } else if let Some(kb) = &keyboard {
        kb.read_layout().context("Reading the layout")?
    } else {
        Layout::default()
    };

    let surface = TerminalSurface::new(Duration::from_millis(config.editor.poll_interval_ms))?;
    let mut editor =
        Editor::new(surface, keyboard.as_ref(), layout).with_layout_dir(&config.editor.layout_dir);
    if let Some(path) = file {
        editor = editor.with_file(path);
    }
    editor.run()?;
    Ok(())
}
