//! Row scanner shared by the layout and macro text formats
//!
//! Both formats are rows of unsigned integers: values separated by commas,
//! rows terminated by a newline. Blank lines and blanks around values are
//! skipped, and a newline right after a comma continues the current row.
//! The scanner is a three-state machine that hands each completed value and
//! each row end to a [`RowSink`], which owns the meaning of the rows.

use std::fmt;

use thiserror::Error;

/// 1-based position in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Pos {
    fn start() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// More digits than the format allows, usually a missing comma
    NumberTooLong { max_digits: usize },
    ValueOutOfRange { value: u64, max: u64 },
    UnexpectedChar(char),
    /// Two values separated only by blanks
    MissingSeparator,
    /// Comma at the end of the input
    MissingValue,
    /// Row holds more values than allowed
    TooManyValues { max: usize },
    /// Layout line ended inside a matrix row
    IncompleteRow { row: usize, found: usize, expected: usize },
    /// Layout line ended before the last matrix row
    MissingRows { found: usize, expected: usize },
    TooManyRows { max: usize },
    Empty,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumberTooLong { max_digits } => {
                write!(f, "number longer than {max_digits} digits, comma missing?")
            }
            Self::ValueOutOfRange { value, max } => {
                write!(f, "value {value} out of range (max {max})")
            }
            Self::UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
            Self::MissingSeparator => write!(f, "missing comma between values"),
            Self::MissingValue => write!(f, "expected a value after ','"),
            Self::TooManyValues { max } => write!(f, "more than {max} values"),
            Self::IncompleteRow {
                row,
                found,
                expected,
            } => write!(f, "row {row} has {found} keys, expected {expected}"),
            Self::MissingRows { found, expected } => {
                write!(f, "{found} rows found, expected {expected}")
            }
            Self::TooManyRows { max } => write!(f, "more than {max} lines"),
            Self::Empty => write!(f, "no values found"),
        }
    }
}

/// A parse failure and where it happened
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {pos}")]
pub struct ParseError {
    pub pos: Pos,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(pos: Pos, kind: ParseErrorKind) -> Self {
        Self { pos, kind }
    }
}

/// Receives the scanner's output
pub(crate) trait RowSink {
    /// A completed value that started at `pos`
    fn value(&mut self, value: u64, pos: Pos) -> Result<(), ParseError>;
    /// The current row ended at `pos`
    fn end_row(&mut self, pos: Pos) -> Result<(), ParseError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Expecting a value; blanks and newlines are skipped
    Whitespace,
    /// Inside a number
    Digit,
    /// After a value, expecting ',' or a newline
    Separator,
}

pub(crate) struct Scanner {
    state: State,
    digits: String,
    max_digits: usize,
    max_value: u64,
    /// A comma was consumed and the next value belongs to the same row
    row_open: bool,
    number_start: Pos,
    pos: Pos,
}

impl Scanner {
    pub(crate) fn new(max_digits: usize, max_value: u64) -> Self {
        Self {
            state: State::Whitespace,
            digits: String::with_capacity(max_digits),
            max_digits,
            max_value,
            row_open: false,
            number_start: Pos::start(),
            pos: Pos::start(),
        }
    }

    /// Run the whole input through `sink`, stopping at the first error
    pub(crate) fn run(mut self, input: &str, sink: &mut impl RowSink) -> Result<(), ParseError> {
        for ch in input.chars() {
            self.step(ch, sink)?;
            if ch == '\n' {
                self.pos.line += 1;
                self.pos.column = 1;
            } else {
                self.pos.column += 1;
            }
        }
        self.finish(sink)
    }

    fn step(&mut self, ch: char, sink: &mut impl RowSink) -> Result<(), ParseError> {
        self.state = match (self.state, ch) {
            (State::Whitespace, ' ' | '\t' | '\r' | '\n') => State::Whitespace,
            (State::Whitespace, c) if c.is_ascii_digit() => {
                self.number_start = self.pos;
                self.push_digit(c)?;
                State::Digit
            }

            (State::Digit, c) if c.is_ascii_digit() => {
                self.push_digit(c)?;
                State::Digit
            }
            (State::Digit, ',') => {
                self.flush(sink)?;
                self.row_open = true;
                State::Whitespace
            }
            (State::Digit, '\n') => {
                self.flush(sink)?;
                self.end_row(sink)?;
                State::Whitespace
            }
            (State::Digit, ' ' | '\t' | '\r') => {
                self.flush(sink)?;
                State::Separator
            }

            (State::Separator, ' ' | '\t' | '\r') => State::Separator,
            (State::Separator, ',') => {
                self.row_open = true;
                State::Whitespace
            }
            (State::Separator, '\n') => {
                self.end_row(sink)?;
                State::Whitespace
            }
            (State::Separator, c) if c.is_ascii_digit() => {
                return Err(self.error(ParseErrorKind::MissingSeparator));
            }

            (_, c) => return Err(self.error(ParseErrorKind::UnexpectedChar(c))),
        };
        Ok(())
    }

    fn finish(mut self, sink: &mut impl RowSink) -> Result<(), ParseError> {
        match self.state {
            State::Digit => {
                self.flush(sink)?;
                self.end_row(sink)
            }
            State::Separator => self.end_row(sink),
            State::Whitespace if self.row_open => Err(self.error(ParseErrorKind::MissingValue)),
            State::Whitespace => Ok(()),
        }
    }

    fn push_digit(&mut self, c: char) -> Result<(), ParseError> {
        if self.digits.len() >= self.max_digits {
            return Err(self.error(ParseErrorKind::NumberTooLong {
                max_digits: self.max_digits,
            }));
        }
        self.digits.push(c);
        Ok(())
    }

    fn flush(&mut self, sink: &mut impl RowSink) -> Result<(), ParseError> {
        // at most max_digits ASCII digits, fits in u64 for any sane bound
        let value = self.digits.parse::<u64>().unwrap_or(u64::MAX);
        self.digits.clear();
        if value > self.max_value {
            return Err(ParseError::new(
                self.number_start,
                ParseErrorKind::ValueOutOfRange {
                    value,
                    max: self.max_value,
                },
            ));
        }
        self.row_open = false;
        sink.value(value, self.number_start)
    }

    fn end_row(&mut self, sink: &mut impl RowSink) -> Result<(), ParseError> {
        self.row_open = false;
        sink.end_row(self.pos)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.pos, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collects rows verbatim
    #[derive(Default)]
    struct Rows {
        rows: Vec<Vec<u64>>,
        current: Vec<u64>,
    }

    impl RowSink for Rows {
        fn value(&mut self, value: u64, _pos: Pos) -> Result<(), ParseError> {
            self.current.push(value);
            Ok(())
        }

        fn end_row(&mut self, _pos: Pos) -> Result<(), ParseError> {
            self.rows.push(std::mem::take(&mut self.current));
            Ok(())
        }
    }

    fn scan(input: &str) -> Result<Vec<Vec<u64>>, ParseError> {
        let mut rows = Rows::default();
        Scanner::new(5, 65535).run(input, &mut rows)?;
        Ok(rows.rows)
    }

    #[test]
    fn test_rows_and_blanks() {
        let rows = scan("1, 2,3\n\n  4 ,5\t\r\n").unwrap();
        assert_eq!(rows, vec![vec![1, 2, 3], vec![4, 5]]);
    }

    #[test]
    fn test_newline_after_comma_continues_row() {
        assert_eq!(scan("1,\n2\n").unwrap(), vec![vec![1, 2]]);
    }

    #[test]
    fn test_last_row_without_newline() {
        assert_eq!(scan("7, 8").unwrap(), vec![vec![7, 8]]);
        assert_eq!(scan("7, 8  ").unwrap(), vec![vec![7, 8]]);
        assert_eq!(scan("").unwrap(), Vec::<Vec<u64>>::new());
    }

    #[test]
    fn test_number_too_long() {
        let err = scan("1, 123456").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NumberTooLong { max_digits: 5 });
        assert_eq!(err.pos, Pos { line: 1, column: 9 });
    }

    #[test]
    fn test_value_out_of_range_reports_number_start() {
        let err = scan("0\n 70000").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::ValueOutOfRange {
                value: 70000,
                max: 65535
            }
        );
        assert_eq!(err.pos, Pos { line: 2, column: 2 });
    }

    #[test]
    fn test_unexpected_characters() {
        let err = scan("1, x").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedChar('x'));
        assert_eq!(err.pos, Pos { line: 1, column: 4 });

        assert_eq!(
            scan("1,,2").unwrap_err().kind,
            ParseErrorKind::UnexpectedChar(',')
        );
        assert_eq!(scan("-1").unwrap_err().kind, ParseErrorKind::UnexpectedChar('-'));
    }

    #[test]
    fn test_missing_separator_and_value() {
        assert_eq!(scan("1 2").unwrap_err().kind, ParseErrorKind::MissingSeparator);
        assert_eq!(scan("1, 2,").unwrap_err().kind, ParseErrorKind::MissingValue);
    }

    #[test]
    fn test_error_display() {
        let err = scan("1;").unwrap_err();
        assert_eq!(err.to_string(), "unexpected character ';' at line 1, column 2");
    }
}
