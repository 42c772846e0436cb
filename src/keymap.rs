//! Key mapping catalog
//!
//! Every action an operator can assign to a matrix cell, with the label
//! shown in the editor. Keyboard keys use their HID usage ID; macros and
//! layer actions carry a type in the high byte and a 1-based argument in
//! the low byte.

use blusb_keyboard::KeyCode;

/// High byte of a macro slot code
pub const TYPE_MACRO: u16 = 0x0100;
/// High byte of a layer toggle code
pub const TYPE_TOGGLE_LAYER: u16 = 0x0200;
/// High byte of a momentary layer code
pub const TYPE_MOMENTARY_LAYER: u16 = 0x0300;

/// One entry of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMapping {
    pub name: &'static str,
    pub code: KeyCode,
}

const fn key(name: &'static str, usage: u16) -> KeyMapping {
    KeyMapping {
        name,
        code: KeyCode(usage),
    }
}

/// Code of macro slot `n` (1-based)
pub const fn macro_code(n: u16) -> KeyCode {
    KeyCode(TYPE_MACRO | n)
}

/// Code toggling layer `n` (1-based)
pub const fn toggle_layer_code(n: u16) -> KeyCode {
    KeyCode(TYPE_TOGGLE_LAYER | n)
}

/// Code selecting layer `n` (1-based) while held
pub const fn momentary_layer_code(n: u16) -> KeyCode {
    KeyCode(TYPE_MOMENTARY_LAYER | n)
}

static KEY_MAPPINGS: &[KeyMapping] = &[
    key("--", 0x00),
    key("Win Menu", 0x65),
    key("Backspace", 0x2A),
    key("Caps Lock", 0x39),
    key("Delete", 0x4C),
    key("Down Arrow", 0x51),
    key("End", 0x4D),
    key("ESC", 0x29),
    key("F1", 0x3A),
    key("F2", 0x3B),
    key("F3", 0x3C),
    key("F4", 0x3D),
    key("F5", 0x3E),
    key("F6", 0x3F),
    key("F7", 0x40),
    key("F8", 0x41),
    key("F9", 0x42),
    key("F10", 0x43),
    key("F11", 0x44),
    key("F12", 0x45),
    key("Home", 0x4A),
    key("Insert", 0x49),
    key("KB 0", 0x27),
    key("KB 1", 0x1E),
    key("KB 2", 0x1F),
    key("KB 3", 0x20),
    key("KB 4", 0x21),
    key("KB 5", 0x22),
    key("KB 6", 0x23),
    key("KB 7", 0x24),
    key("KB 8", 0x25),
    key("KB 9", 0x26),
    key("A", 0x04),
    key("B", 0x05),
    key("C", 0x06),
    key("D", 0x07),
    key("E", 0x08),
    key("F", 0x09),
    key("G", 0x0A),
    key("H", 0x0B),
    key("I", 0x0C),
    key("J", 0x0D),
    key("K", 0x0E),
    key("L", 0x0F),
    key("M", 0x10),
    key("N", 0x11),
    key("O", 0x12),
    key("P", 0x13),
    key("Q", 0x14),
    key("R", 0x15),
    key("S", 0x16),
    key("T", 0x17),
    key("U", 0x18),
    key("V", 0x19),
    key("W", 0x1A),
    key("X", 0x1B),
    key("Y", 0x1C),
    key("Z", 0x1D),
    key("Left Ctrl", 0xE0),
    key("Left Arrow", 0x50),
    key("Left Alt", 0xE2),
    key("Left Shift", 0xE1),
    key("Left Win", 0xE3),
    key("Page down", 0x4E),
    key("Num Lock", 0x53),
    key("NP Divide", 0x54),
    key("NP Multiply", 0x55),
    key("NP Subtract", 0x56),
    key("NP Add", 0x57),
    key("NP Enter", 0x58),
    key("NP Dot", 0x63),
    key("NP 0", 0x62),
    key("NP 1", 0x59),
    key("NP 2", 0x5A),
    key("NP 3", 0x5B),
    key("NP 4", 0x5C),
    key("NP 5", 0x5D),
    key("NP 6", 0x5E),
    key("NP 7", 0x5F),
    key("NP 8", 0x60),
    key("NP 9", 0x61),
    key("Left Bracket", 0x2F),
    key("ISO Backslash", 0x64),
    key("Backslash", 0x31),
    key("Semicolon", 0x33),
    key("Minus", 0x2D),
    key("Tilde", 0x35),
    key("Equals", 0x2E),
    key("Quote", 0x34),
    key("Comma", 0x36),
    key("Slash", 0x38),
    key("Period", 0x37),
    key("Right Bracket", 0x30),
    key("Page up", 0x4B),
    key("Right Ctrl", 0xE4),
    key("Enter", 0x28),
    key("Return", 0x9E),
    key("Right Arrow", 0x4F),
    key("Right Alt", 0xE6),
    key("Right Shift", 0xE5),
    key("Right Win", 0xE7),
    key("Scroll Lock", 0x47),
    key("Print Screen", 0x46),
    key("Space", 0x2C),
    key("Tab", 0x2B),
    key("Up Arrow", 0x52),
    key("Pause", 0x48),
    KeyMapping { name: "Macro 1", code: macro_code(1) },
    KeyMapping { name: "Macro 2", code: macro_code(2) },
    KeyMapping { name: "Macro 3", code: macro_code(3) },
    KeyMapping { name: "Macro 4", code: macro_code(4) },
    KeyMapping { name: "Macro 5", code: macro_code(5) },
    KeyMapping { name: "Macro 6", code: macro_code(6) },
    KeyMapping { name: "Macro 7", code: macro_code(7) },
    KeyMapping { name: "Macro 8", code: macro_code(8) },
    KeyMapping { name: "Macro 9", code: macro_code(9) },
    KeyMapping { name: "Macro 10", code: macro_code(10) },
    KeyMapping { name: "Macro 11", code: macro_code(11) },
    KeyMapping { name: "Macro 12", code: macro_code(12) },
    KeyMapping { name: "Macro 13", code: macro_code(13) },
    KeyMapping { name: "Macro 14", code: macro_code(14) },
    KeyMapping { name: "Macro 15", code: macro_code(15) },
    KeyMapping { name: "Macro 16", code: macro_code(16) },
    KeyMapping { name: "Macro 17", code: macro_code(17) },
    KeyMapping { name: "Macro 18", code: macro_code(18) },
    KeyMapping { name: "Macro 19", code: macro_code(19) },
    KeyMapping { name: "Macro 20", code: macro_code(20) },
    KeyMapping { name: "Macro 21", code: macro_code(21) },
    KeyMapping { name: "Macro 22", code: macro_code(22) },
    KeyMapping { name: "Macro 23", code: macro_code(23) },
    KeyMapping { name: "Macro 24", code: macro_code(24) },
    KeyMapping { name: "Layer 1", code: toggle_layer_code(1) },
    KeyMapping { name: "Layer 2", code: toggle_layer_code(2) },
    KeyMapping { name: "Layer 3", code: toggle_layer_code(3) },
    KeyMapping { name: "Layer 4", code: toggle_layer_code(4) },
    KeyMapping { name: "Layer 5", code: toggle_layer_code(5) },
    KeyMapping { name: "Layer 6", code: toggle_layer_code(6) },
    KeyMapping { name: "M Layer 1", code: momentary_layer_code(1) },
    KeyMapping { name: "M Layer 2", code: momentary_layer_code(2) },
    KeyMapping { name: "M Layer 3", code: momentary_layer_code(3) },
    KeyMapping { name: "M Layer 4", code: momentary_layer_code(4) },
    KeyMapping { name: "M Layer 5", code: momentary_layer_code(5) },
    KeyMapping { name: "M Layer 6", code: momentary_layer_code(6) },
];

/// The whole catalog; entry 0 is the unassigned code
pub fn catalog() -> &'static [KeyMapping] {
    KEY_MAPPINGS
}

/// Catalog index for `code`, or 0 ("--") when it is not listed
pub fn index_of(code: KeyCode) -> usize {
    KEY_MAPPINGS
        .iter()
        .position(|m| m.code == code)
        .unwrap_or(0)
}

/// Label for `code` if the catalog lists it
pub fn name_of(code: KeyCode) -> Option<&'static str> {
    KEY_MAPPINGS.iter().find(|m| m.code == code).map(|m| m.name)
}

/// Case-insensitive lookup by label
pub fn find_by_name(name: &str) -> Option<KeyCode> {
    KEY_MAPPINGS
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
        .map(|m| m.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blusb_keyboard::{MAX_LAYERS, NUM_MACRO_KEYS};
    use std::collections::HashSet;

    #[test]
    fn test_first_entry_is_unassigned() {
        assert_eq!(catalog()[0].code, KeyCode::NONE);
        assert_eq!(catalog()[0].name, "--");
    }

    #[test]
    fn test_codes_are_unique() {
        let mut seen = HashSet::new();
        for m in catalog() {
            assert!(seen.insert(m.code), "duplicate code for {}", m.name);
        }
    }

    #[test]
    fn test_every_macro_and_layer_listed() {
        for n in 1..=NUM_MACRO_KEYS as u16 {
            assert!(name_of(macro_code(n)).is_some());
        }
        for n in 1..=MAX_LAYERS as u16 {
            assert!(name_of(toggle_layer_code(n)).is_some());
            assert!(name_of(momentary_layer_code(n)).is_some());
        }
    }

    #[test]
    fn test_index_of_falls_back_to_unassigned() {
        assert_eq!(catalog()[index_of(KeyCode(0x04))].name, "A");
        assert_eq!(index_of(KeyCode(0xBEEF)), 0);
    }

    #[test]
    fn test_special_codes() {
        assert_eq!(macro_code(3), KeyCode(0x0103));
        assert_eq!(name_of(toggle_layer_code(2)), Some("Layer 2"));
        assert_eq!(name_of(momentary_layer_code(6)), Some("M Layer 6"));
        assert_eq!(find_by_name("space"), Some(KeyCode(0x2C)));
        assert_eq!(find_by_name("nope"), None);
    }
}
