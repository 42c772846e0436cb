//! High-level interface for BlUSB keyboard controllers
//!
//! Typed operations for every vendor request on top of any
//! [`Transport`], plus the layout and macro models exchanged with the
//! controller.

pub mod error;
pub mod layout;
pub mod macros;
pub mod scan;
pub mod settings;

pub use error::KeyboardError;
pub use layout::{Cell, KeyCode, Layout, COLS, KEYS_PER_LAYER, MAX_LAYERS, ROWS};
pub use macros::{MacroSequence, MacroTable, LEN_MACRO, MACRO_FIELDS, NUM_MACRO_KEYS};
pub use scan::{MatrixPos, MatrixScanner, ScanReport};
pub use settings::{Debounce, FirmwareVersion, Pwm};

use blusb_transport::protocol::{cmd, sizes};
use blusb_transport::{UsbDiscovery, Transport, TransportDeviceInfo};
use tracing::{debug, info, warn};

/// Reads spent draining stale positions when entering service mode
const SERVICE_MODE_DRAIN_READS: usize = 16;

/// Keyboard controller interface over any transport
pub struct Keyboard {
    transport: Box<dyn Transport>,
}

impl Keyboard {
    /// Wrap an already opened transport
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Open the first controller the discovery finds
    pub fn open(discovery: &UsbDiscovery) -> Result<Self, KeyboardError> {
        let transport = discovery.open_first()?;
        Ok(Self::with_transport(Box::new(transport)))
    }

    pub fn device_info(&self) -> &TransportDeviceInfo {
        self.transport.device_info()
    }

    // === Layout ===

    /// Read the layout; the reply is always the maximum buffer size
    pub fn read_layout(&self) -> Result<Layout, KeyboardError> {
        let buf = self.transport.query(cmd::READ_LAYOUT, sizes::LAYOUT_BUFFER)?;
        let layout = Layout::unpack(&buf)?;
        debug!("Read layout with {} layers", layout.layer_count());
        Ok(layout)
    }

    pub fn write_layout(&self, layout: &Layout) -> Result<(), KeyboardError> {
        self.transport.send(cmd::WRITE_LAYOUT, &layout.pack_write())?;
        info!("Wrote layout with {} layers", layout.layer_count());
        Ok(())
    }

    // === Macros ===

    pub fn read_macros(&self) -> Result<MacroTable, KeyboardError> {
        let buf = self.transport.query(cmd::READ_MACROS, sizes::MACRO_BUFFER)?;
        MacroTable::unpack(&buf)
    }

    pub fn write_macros(&self, macros: &MacroTable) -> Result<(), KeyboardError> {
        self.transport.send(cmd::WRITE_MACROS, &macros.pack()?)?;
        info!("Wrote {} macros", macros.count());
        Ok(())
    }

    // === Settings ===

    pub fn read_version(&self) -> Result<FirmwareVersion, KeyboardError> {
        let buf = self.transport.query(cmd::READ_VERSION, sizes::SHORT_REPLY)?;
        Ok(FirmwareVersion::from_bytes(&buf))
    }

    pub fn read_pwm(&self) -> Result<Pwm, KeyboardError> {
        let buf = self.transport.query(cmd::READ_PWM, sizes::SHORT_REPLY)?;
        Ok(Pwm::from_bytes(&buf))
    }

    pub fn write_pwm(&self, pwm: Pwm) -> Result<(), KeyboardError> {
        self.transport.send(cmd::WRITE_PWM, &pwm.to_bytes())?;
        Ok(())
    }

    pub fn read_debounce(&self) -> Result<Debounce, KeyboardError> {
        let buf = self.transport.query(cmd::READ_DEBOUNCE, sizes::SHORT_REPLY)?;
        let ms = buf.first().copied().unwrap_or(0);
        Debounce::new(ms).map_err(|_| {
            KeyboardError::InvalidParameter(format!("controller reported debounce {ms}"))
        })
    }

    pub fn write_debounce(&self, debounce: Debounce) -> Result<(), KeyboardError> {
        self.transport.send(cmd::WRITE_DEBOUNCE, &debounce.to_bytes())?;
        Ok(())
    }

    // === Service mode / matrix scan ===

    pub fn enable_service_mode(&self) -> Result<(), KeyboardError> {
        self.transport.send(cmd::ENABLE_SERVICE_MODE, &[])?;
        Ok(())
    }

    pub fn disable_service_mode(&self) -> Result<(), KeyboardError> {
        self.transport.send(cmd::DISABLE_SERVICE_MODE, &[])?;
        Ok(())
    }

    /// Enable service mode and discard any position left over from an
    /// earlier session, then toggle the mode to reset the report.
    pub fn enter_service_mode(&self) -> Result<(), KeyboardError> {
        self.enable_service_mode()?;
        for _ in 0..SERVICE_MODE_DRAIN_READS {
            let report = self.read_matrix_pos_raw()?;
            if report.row == 0 || report.col == 0 {
                break;
            }
        }
        self.disable_service_mode()?;
        self.enable_service_mode()
    }

    /// Service mode held for the lifetime of the returned guard
    pub fn service_mode(&self) -> Result<ServiceMode<'_>, KeyboardError> {
        self.enter_service_mode()?;
        Ok(ServiceMode { keyboard: self })
    }

    pub fn read_matrix_pos_raw(&self) -> Result<ScanReport, KeyboardError> {
        let buf = self.transport.query(cmd::READ_MATRIX, sizes::SHORT_REPLY)?;
        Ok(ScanReport::from_bytes(&buf))
    }
}

/// Disables service mode when dropped
pub struct ServiceMode<'a> {
    keyboard: &'a Keyboard,
}

impl Drop for ServiceMode<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.keyboard.disable_service_mode() {
            warn!("Failed to leave service mode: {}", e);
        }
    }
}
