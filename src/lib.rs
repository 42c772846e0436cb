//! BlUSB layout tool
//!
//! Text formats for layouts and macro tables, the key catalog, persistent
//! settings and the terminal layout editor. Device access lives in the
//! `blusb-keyboard` and `blusb-transport` crates.

pub mod codec;
pub mod config;
pub mod keymap;
pub mod tui;

pub use codec::{CodecError, ParseError};
pub use config::{Config, ConfigError};
