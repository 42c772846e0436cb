//! Button rows and their focus handling

use std::io;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use super::{frame, put, reversed};
use crate::tui::surface::Surface;

/// Outcome of feeding one key to a [`ButtonRow`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Ignored,
    Moved,
    Commit(usize),
}

/// Horizontal row of boxed buttons
#[derive(Debug, Clone)]
pub struct ButtonRow {
    labels: Vec<&'static str>,
    x: u16,
    y: u16,
    selected: usize,
    cancel: usize,
}

impl ButtonRow {
    /// Buttons left to right starting at (x, y); the last one is the cancel
    /// button unless [`ButtonRow::with_cancel`] says otherwise
    pub fn new(labels: &[&'static str], x: u16, y: u16) -> Self {
        assert!(!labels.is_empty(), "button row needs at least one button");
        Self {
            labels: labels.to_vec(),
            x,
            y,
            selected: 0,
            cancel: labels.len() - 1,
        }
    }

    pub fn with_cancel(mut self, index: usize) -> Self {
        self.cancel = index.min(self.labels.len() - 1);
        self
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Cells covered from the first button's left edge to the last one's right
    pub fn width(&self) -> u16 {
        let total: usize = self.labels.iter().map(|l| l.len() + 3).sum();
        (total - 1) as u16
    }

    pub const HEIGHT: u16 = 3;

    pub fn handle(&mut self, key: KeyEvent) -> ButtonEvent {
        let n = self.labels.len();
        match key.code {
            KeyCode::Enter => ButtonEvent::Commit(self.selected),
            KeyCode::Esc => {
                self.selected = self.cancel;
                ButtonEvent::Commit(self.cancel)
            }
            KeyCode::Tab | KeyCode::Right => {
                self.selected = (self.selected + 1) % n;
                ButtonEvent::Moved
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.selected = (self.selected + n - 1) % n;
                ButtonEvent::Moved
            }
            _ => ButtonEvent::Ignored,
        }
    }

    /// Draw the row; the selected button is highlighted only while `focused`
    pub fn draw(&self, buf: &mut Buffer, focused: bool) {
        let mut x = self.x;
        for (i, label) in self.labels.iter().enumerate() {
            let width = label.len() as u16 + 2;
            frame(buf, Rect::new(x, self.y, width, Self::HEIGHT), None);
            let style = if focused && i == self.selected {
                reversed()
            } else {
                Style::default()
            };
            put(buf, x + 1, self.y + 1, label, label.len(), style);
            x += width + 1;
        }
    }

    /// Block until a button is committed and return its index
    pub fn run(&mut self, surface: &mut dyn Surface) -> io::Result<usize> {
        loop {
            self.draw(surface.buffer_mut(), true);
            surface.present()?;
            if let ButtonEvent::Commit(index) = self.handle(surface.wait_key()?) {
                return Ok(index);
            }
        }
    }
}
