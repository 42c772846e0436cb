//! Text macro table format
//!
//! One line per macro slot, up to eight byte values: modifiers, a reserved
//! byte and six key usages. Short lines are padded with zeros.

use blusb_keyboard::{KeyCode, MacroSequence, MacroTable, LEN_MACRO, NUM_MACRO_KEYS};

use super::scanner::{ParseError, ParseErrorKind, Pos, RowSink, Scanner};

struct MacroSink {
    table: MacroTable,
    slot: usize,
    current: MacroSequence,
    index: usize,
}

impl RowSink for MacroSink {
    fn value(&mut self, value: u64, pos: Pos) -> Result<(), ParseError> {
        if self.slot >= NUM_MACRO_KEYS {
            return Err(ParseError::new(
                pos,
                ParseErrorKind::TooManyRows {
                    max: NUM_MACRO_KEYS,
                },
            ));
        }
        if self.index >= LEN_MACRO {
            return Err(ParseError::new(
                pos,
                ParseErrorKind::TooManyValues { max: LEN_MACRO },
            ));
        }
        self.current[self.index] = KeyCode(value as u16);
        self.index += 1;
        Ok(())
    }

    fn end_row(&mut self, pos: Pos) -> Result<(), ParseError> {
        self.table.set(self.slot, self.current).map_err(|_| {
            ParseError::new(
                pos,
                ParseErrorKind::TooManyRows {
                    max: NUM_MACRO_KEYS,
                },
            )
        })?;
        self.slot += 1;
        self.current = [KeyCode::NONE; LEN_MACRO];
        self.index = 0;
        Ok(())
    }
}

/// Parse a macro table; `count` is the number of lines read
pub fn parse_macros(input: &str) -> Result<MacroTable, ParseError> {
    let mut sink = MacroSink {
        table: MacroTable::new(),
        slot: 0,
        current: [KeyCode::NONE; LEN_MACRO],
        index: 0,
    };
    Scanner::new(3, u8::MAX as u64).run(input, &mut sink)?;
    if sink.slot == 0 {
        return Err(ParseError::new(
            Pos { line: 1, column: 1 },
            ParseErrorKind::Empty,
        ));
    }
    Ok(sink.table)
}

/// Serialize the defined slots, one line each
pub fn serialize_macros(table: &MacroTable) -> String {
    let mut out = String::new();
    for sequence in table.iter() {
        let line = sequence
            .iter()
            .map(|code| code.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}
