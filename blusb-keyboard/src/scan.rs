//! Hardware key scan
//!
//! In service mode the controller reports the matrix position of the last
//! key pressed. The scanner turns those level reports into press events by
//! remembering the last position it handed out.

use tracing::debug;

use crate::error::KeyboardError;
use crate::layout::{COLS, ROWS};
use crate::Keyboard;

/// Raw READ_MATRIX reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanReport {
    pub row: u8,
    pub col: u8,
    /// Byte 7: a key has been seen since service mode was enabled
    pub valid: bool,
}

impl ScanReport {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            row: bytes.first().copied().unwrap_or(0),
            col: bytes.get(1).copied().unwrap_or(0),
            valid: bytes.get(7).is_some_and(|&b| b != 0),
        }
    }
}

/// Matrix position of a physical key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixPos {
    pub row: usize,
    pub col: usize,
}

/// Turns scan reports into new-position events
#[derive(Debug, Default)]
pub struct MatrixScanner {
    last: Option<(u8, u8)>,
}

impl MatrixScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one report; returns a position when it differs from the last one
    pub fn update(&mut self, report: ScanReport) -> Option<MatrixPos> {
        if !report.valid || self.last == Some((report.row, report.col)) {
            return None;
        }
        self.last = Some((report.row, report.col));

        let pos = MatrixPos {
            row: report.row as usize,
            col: report.col as usize,
        };
        if pos.row >= ROWS || pos.col >= COLS {
            debug!("Ignoring scan outside the matrix: {:?}", pos);
            return None;
        }
        Some(pos)
    }

    /// Query the controller and report a newly pressed position
    pub fn poll(&mut self, keyboard: &Keyboard) -> Result<Option<MatrixPos>, KeyboardError> {
        let report = keyboard.read_matrix_pos_raw()?;
        Ok(self.update(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(row: u8, col: u8) -> ScanReport {
        ScanReport {
            row,
            col,
            valid: true,
        }
    }

    #[test]
    fn test_repeated_position_is_reported_once() {
        let mut scanner = MatrixScanner::new();
        assert_eq!(scanner.update(report(2, 3)), Some(MatrixPos { row: 2, col: 3 }));
        assert_eq!(scanner.update(report(2, 3)), None);
        assert_eq!(scanner.update(report(4, 3)), Some(MatrixPos { row: 4, col: 3 }));
    }

    #[test]
    fn test_invalid_report_ignored() {
        let mut scanner = MatrixScanner::new();
        assert_eq!(scanner.update(ScanReport::default()), None);
        // first valid report at the origin still counts
        assert_eq!(scanner.update(report(0, 0)), Some(MatrixPos { row: 0, col: 0 }));
    }

    #[test]
    fn test_out_of_matrix_ignored() {
        let mut scanner = MatrixScanner::new();
        assert_eq!(scanner.update(report(ROWS as u8, 0)), None);
    }

    #[test]
    fn test_report_from_bytes() {
        let r = ScanReport::from_bytes(&[5, 6, 0, 0, 0, 0, 0, 1]);
        assert_eq!(r, report(5, 6));
        assert!(!ScanReport::from_bytes(&[5, 6]).valid);
    }
}
