//! Text layout format
//!
//! One line per layer, each holding `ROWS * COLS` comma separated key
//! codes in row, column order:
//!
//! ```text
//! 41, 0, 58, 59, ...
//! 0, 0, 0, 0, ...
//! ```

use blusb_keyboard::{KeyCode, Layout, COLS, KEYS_PER_LAYER, MAX_LAYERS, ROWS};

use super::scanner::{ParseError, ParseErrorKind, Pos, RowSink, Scanner};

/// "65535"
const MAX_DIGITS: usize = 5;

/// Collects complete layers; the layout is only built once all input is valid
struct LayoutSink {
    layers: Vec<[KeyCode; KEYS_PER_LAYER]>,
    current: [KeyCode; KEYS_PER_LAYER],
    index: usize,
}

impl RowSink for LayoutSink {
    fn value(&mut self, value: u64, pos: Pos) -> Result<(), ParseError> {
        if self.layers.len() >= MAX_LAYERS {
            return Err(ParseError::new(
                pos,
                ParseErrorKind::TooManyRows { max: MAX_LAYERS },
            ));
        }
        if self.index >= KEYS_PER_LAYER {
            return Err(ParseError::new(
                pos,
                ParseErrorKind::TooManyValues {
                    max: KEYS_PER_LAYER,
                },
            ));
        }
        // the scanner bounds values to u16::MAX
        self.current[self.index] = KeyCode(value as u16);
        self.index += 1;
        Ok(())
    }

    fn end_row(&mut self, pos: Pos) -> Result<(), ParseError> {
        let found = self.index;
        if found < KEYS_PER_LAYER {
            let kind = if found % COLS != 0 {
                ParseErrorKind::IncompleteRow {
                    row: found / COLS + 1,
                    found: found % COLS,
                    expected: COLS,
                }
            } else {
                ParseErrorKind::MissingRows {
                    found: found / COLS,
                    expected: ROWS,
                }
            };
            return Err(ParseError::new(pos, kind));
        }
        self.layers.push(self.current);
        self.current = [KeyCode::NONE; KEYS_PER_LAYER];
        self.index = 0;
        Ok(())
    }
}

/// Parse the text layout format.
///
/// The result is a new [`Layout`]; nothing is modified on failure.
pub fn parse_layout(input: &str) -> Result<Layout, ParseError> {
    let mut sink = LayoutSink {
        layers: Vec::with_capacity(MAX_LAYERS),
        current: [KeyCode::NONE; KEYS_PER_LAYER],
        index: 0,
    };
    Scanner::new(MAX_DIGITS, u16::MAX as u64).run(input, &mut sink)?;

    let start = Pos { line: 1, column: 1 };
    if sink.layers.is_empty() {
        return Err(ParseError::new(start, ParseErrorKind::Empty));
    }
    Layout::from_layers(&sink.layers)
        .map_err(|_| ParseError::new(start, ParseErrorKind::TooManyRows { max: MAX_LAYERS }))
}

/// Serialize to the text layout format, one newline-terminated line per layer
pub fn serialize_layout(layout: &Layout) -> String {
    let mut out = String::with_capacity(layout.layer_count() * KEYS_PER_LAYER * 4);
    for layer in layout.layers() {
        let line = layer
            .iter()
            .map(|code| code.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}
