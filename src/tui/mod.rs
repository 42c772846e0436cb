//! Terminal user interface: surface, widgets and the layout editor

pub mod editor;
pub mod surface;
pub mod view;
pub mod widgets;

pub use editor::{Editor, EditorState};
pub use surface::{ScriptedSurface, Surface, TerminalSurface, MIN_HEIGHT, MIN_WIDTH};
