//! Text formats for layouts and macro tables, and file helpers

mod layout;
mod macros;
mod scanner;

use std::path::{Path, PathBuf};

use blusb_keyboard::{Layout, MacroTable};
use thiserror::Error;

pub use layout::{parse_layout, serialize_layout};
pub use macros::{parse_macros, serialize_macros};
pub use scanner::{ParseError, ParseErrorKind, Pos};

/// Failure to load or store a text file
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Parse { path: PathBuf, source: ParseError },
}

fn read(path: &Path) -> Result<String, CodecError> {
    std::fs::read_to_string(path).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, text: &str) -> Result<(), CodecError> {
    std::fs::write(path, text).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_layout(path: &Path) -> Result<Layout, CodecError> {
    parse_layout(&read(path)?).map_err(|source| CodecError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_layout(path: &Path, layout: &Layout) -> Result<(), CodecError> {
    write(path, &serialize_layout(layout))
}

pub fn load_macros(path: &Path) -> Result<MacroTable, CodecError> {
    parse_macros(&read(path)?).map_err(|source| CodecError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_macros(path: &Path, table: &MacroTable) -> Result<(), CodecError> {
    write(path, &serialize_macros(table))
}
