//! Macro key table
//!
//! Each macro slot holds one HID keyboard report: modifier byte, reserved
//! byte and up to six key usages. The controller stores the table as
//! [`NUM_MACRO_KEYS`] x [`LEN_MACRO`] bytes.

use crate::error::KeyboardError;
use crate::layout::KeyCode;

pub use blusb_transport::protocol::geometry::{LEN_MACRO, NUM_MACRO_KEYS};

/// One macro slot
pub type MacroSequence = [KeyCode; LEN_MACRO];

/// Column labels of a macro slot
pub const MACRO_FIELDS: [&str; LEN_MACRO] =
    ["Mods", "Rsvd", "Key1", "Key2", "Key3", "Key4", "Key5", "Key6"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroTable {
    count: usize,
    sequences: [MacroSequence; NUM_MACRO_KEYS],
}

impl Default for MacroTable {
    fn default() -> Self {
        Self {
            count: 0,
            sequences: [[KeyCode::NONE; LEN_MACRO]; NUM_MACRO_KEYS],
        }
    }
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of defined slots; slots past it are all zero
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn get(&self, index: usize) -> Option<&MacroSequence> {
        (index < self.count).then(|| &self.sequences[index])
    }

    /// Store a sequence, growing `count` to cover the slot
    pub fn set(&mut self, index: usize, sequence: MacroSequence) -> Result<(), KeyboardError> {
        if index >= NUM_MACRO_KEYS {
            return Err(KeyboardError::InvalidParameter(format!(
                "macro slot {} out of range (max {})",
                index + 1,
                NUM_MACRO_KEYS
            )));
        }
        self.sequences[index] = sequence;
        self.count = self.count.max(index + 1);
        Ok(())
    }

    /// Defined slots in order
    pub fn iter(&self) -> impl Iterator<Item = &MacroSequence> {
        self.sequences[..self.count].iter()
    }

    /// Encode for WRITE_MACROS, one byte per value for every slot
    pub fn pack(&self) -> Result<Vec<u8>, KeyboardError> {
        let mut buf = Vec::with_capacity(NUM_MACRO_KEYS * LEN_MACRO);
        for (slot, sequence) in self.sequences.iter().enumerate() {
            for code in sequence {
                let byte = u8::try_from(code.0).map_err(|_| {
                    KeyboardError::InvalidParameter(format!(
                        "macro {} value {} does not fit in a byte",
                        slot + 1,
                        code
                    ))
                })?;
                buf.push(byte);
            }
        }
        Ok(buf)
    }

    /// Decode a READ_MACROS reply. Blank (all 0x00) or erased (all 0xFF)
    /// storage is rejected.
    pub fn unpack(buf: &[u8]) -> Result<Self, KeyboardError> {
        let expected = NUM_MACRO_KEYS * LEN_MACRO;
        if buf.len() < expected {
            return Err(KeyboardError::ShortBuffer {
                expected,
                actual: buf.len(),
            });
        }
        let data = &buf[..expected];
        if data.iter().all(|&b| b == 0) || data.iter().all(|&b| b == 0xFF) {
            return Err(KeyboardError::BadEeprom);
        }

        let mut table = Self::new();
        for (sequence, chunk) in table.sequences.iter_mut().zip(data.chunks_exact(LEN_MACRO)) {
            for (code, &byte) in sequence.iter_mut().zip(chunk) {
                *code = KeyCode(byte as u16);
            }
        }
        table.count = NUM_MACRO_KEYS;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(values: [u16; LEN_MACRO]) -> MacroSequence {
        values.map(KeyCode)
    }

    #[test]
    fn test_set_grows_count() {
        let mut table = MacroTable::new();
        table.set(2, seq([2, 0, 4, 0, 0, 0, 0, 0])).unwrap();
        assert_eq!(table.count(), 3);
        assert_eq!(table.get(0), Some(&[KeyCode::NONE; LEN_MACRO]));
        assert_eq!(table.get(2).unwrap()[2], KeyCode(4));
        assert!(table.set(NUM_MACRO_KEYS, seq([0; LEN_MACRO])).is_err());
    }

    #[test]
    fn test_pack_is_full_table() {
        let mut table = MacroTable::new();
        table.set(0, seq([1, 0, 4, 5, 0, 0, 0, 0])).unwrap();
        let buf = table.pack().unwrap();
        assert_eq!(buf.len(), 192);
        assert_eq!(&buf[..4], &[1, 0, 4, 5]);
        assert!(buf[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pack_rejects_wide_values() {
        let mut table = MacroTable::new();
        table.set(5, seq([0, 0, 300, 0, 0, 0, 0, 0])).unwrap();
        assert!(matches!(
            table.pack(),
            Err(KeyboardError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_unpack_round_trip() {
        let mut table = MacroTable::new();
        table.set(0, seq([2, 0, 11, 8, 15, 15, 18, 0])).unwrap();
        let unpacked = MacroTable::unpack(&table.pack().unwrap()).unwrap();
        assert_eq!(unpacked.count(), NUM_MACRO_KEYS);
        assert_eq!(unpacked.get(0), table.get(0));
    }

    #[test]
    fn test_unpack_rejects_blank_storage() {
        assert!(matches!(
            MacroTable::unpack(&[0u8; 192]),
            Err(KeyboardError::BadEeprom)
        ));
        assert!(matches!(
            MacroTable::unpack(&[0xFFu8; 192]),
            Err(KeyboardError::BadEeprom)
        ));
        assert!(matches!(
            MacroTable::unpack(&[1u8; 10]),
            Err(KeyboardError::ShortBuffer { .. })
        ));
    }
}
