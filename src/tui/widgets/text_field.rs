//! Line editing and the one-field prompt built on it

use std::io;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use super::{centered, frame, put, reversed, ButtonEvent, ButtonRow, SavedCells};
use crate::tui::surface::Surface;

/// Single-line editable text with a bounded length
///
/// `cursor <= len <= max_len` and `scroll <= cursor < scroll + width` hold
/// after every edit.
#[derive(Debug, Clone)]
pub struct TextField {
    label: String,
    text: Vec<char>,
    max_len: usize,
    cursor: usize,
    scroll: usize,
    width: usize,
}

impl TextField {
    /// `width` is the number of text cells shown after the label
    pub fn new(label: impl Into<String>, max_len: usize, width: usize) -> Self {
        Self {
            label: label.into(),
            text: Vec::new(),
            max_len,
            cursor: 0,
            scroll: 0,
            width: width.max(1),
        }
    }

    /// Start with `text` (cut to `max_len`) and the cursor at its end
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.chars().take(self.max_len).collect();
        self.cursor = self.text.len();
        self.follow_cursor();
        self
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Apply an editing key; returns false for keys the field does not use
    pub fn handle(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.text.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.text.len(),
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.text.len(),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.text.remove(self.cursor);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.text.len() {
                    self.text.remove(self.cursor);
                }
            }
            KeyCode::Char(c) if !ctrl && !c.is_control() => self.insert(c),
            _ => return false,
        }
        self.follow_cursor();
        true
    }

    /// Insert at the cursor; ignored once the field is full
    pub fn insert(&mut self, c: char) {
        if self.text.len() < self.max_len {
            self.text.insert(self.cursor, c);
            self.cursor += 1;
            self.follow_cursor();
        }
    }

    fn follow_cursor(&mut self) {
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + self.width {
            self.scroll = self.cursor + 1 - self.width;
        }
    }

    /// Draw `label: text` at (x, y); the cursor cell is reversed while `focused`
    pub fn draw(&self, buf: &mut Buffer, x: u16, y: u16, focused: bool) {
        let prefix = format!("{}: ", self.label);
        let text_x = x + prefix.len() as u16;
        put(buf, x, y, &prefix, prefix.len(), Style::default());

        let shown: String = self
            .text
            .iter()
            .skip(self.scroll)
            .take(self.width)
            .collect();
        put(buf, text_x, y, &format!("{shown:<width$}", width = self.width), self.width, Style::default());

        if focused {
            let under = self.text.get(self.cursor).copied().unwrap_or(' ');
            let cx = text_x + (self.cursor - self.scroll) as u16;
            put(buf, cx, y, &under.to_string(), 1, reversed());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Text,
    Buttons,
}

/// Boxed text field with Ok and Cancel buttons
#[derive(Debug, Clone)]
pub struct Prompt {
    title: String,
    field: TextField,
}

impl Prompt {
    pub const OK: usize = 0;
    pub const CANCEL: usize = 1;

    pub fn new(title: impl Into<String>, label: impl Into<String>, max_len: usize) -> Self {
        let width = max_len.clamp(4, 40);
        Self {
            title: title.into(),
            field: TextField::new(label, max_len, width),
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.field = self.field.with_text(text);
        self
    }

    /// Run until Ok (returns the text) or Cancel/Esc (returns `None`)
    ///
    /// Focus starts in the text; Up and Down move it between the text and
    /// the buttons. Enter commits through whichever button is selected.
    pub fn run(mut self, surface: &mut dyn Surface) -> io::Result<Option<String>> {
        let saved = SavedCells::take(surface);
        let result = self.run_inner(surface);
        saved.restore(surface);
        surface.present()?;
        result
    }

    fn run_inner(&mut self, surface: &mut dyn Surface) -> io::Result<Option<String>> {
        let width = (1 + self.field.label.len() + 3 + self.field.width + 1) as u16;
        let area = centered(surface.area(), width, 7);
        let mut buttons = ButtonRow::new(&["Ok", "Cancel"], area.x + 1, area.y + 3);
        let mut focus = Focus::Text;

        loop {
            self.draw(surface.buffer_mut(), area, &buttons, focus);
            surface.present()?;

            let key = surface.wait_key()?;
            match key.code {
                KeyCode::Esc => return Ok(None),
                KeyCode::Enter => {
                    return Ok((buttons.selected() == Self::OK).then(|| self.field.text()));
                }
                KeyCode::Up | KeyCode::Down => {
                    focus = match focus {
                        Focus::Text => Focus::Buttons,
                        Focus::Buttons => Focus::Text,
                    };
                }
                _ => match focus {
                    Focus::Text => {
                        self.field.handle(key);
                    }
                    Focus::Buttons => {
                        if let ButtonEvent::Commit(index) = buttons.handle(key) {
                            return Ok((index == Self::OK).then(|| self.field.text()));
                        }
                    }
                },
            }
        }
    }

    fn draw(&self, buf: &mut Buffer, area: Rect, buttons: &ButtonRow, focus: Focus) {
        frame(buf, area, Some(&self.title));
        self.field
            .draw(buf, area.x + 1, area.y + 1, focus == Focus::Text);
        buttons.draw(buf, focus == Focus::Buttons);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::surface::ScriptedSurface;
    use proptest::prelude::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn typed(field: &mut TextField, text: &str) {
        for c in text.chars() {
            field.handle(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_insert_in_middle() {
        let mut field = TextField::new("Name", 10, 10);
        typed(&mut field, "acd");
        field.handle(key(KeyCode::Left));
        field.handle(key(KeyCode::Left));
        typed(&mut field, "b");
        assert_eq!(field.text(), "abcd");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut field = TextField::new("Name", 10, 10).with_text("abcd");
        field.handle(key(KeyCode::Backspace));
        assert_eq!(field.text(), "abc");
        field.handle(key(KeyCode::Home));
        field.handle(key(KeyCode::Delete));
        assert_eq!(field.text(), "bc");
        assert_eq!(field.cursor(), 0);
        field.handle(key(KeyCode::Backspace));
        assert_eq!(field.text(), "bc");
    }

    #[test]
    fn test_ctrl_home_end() {
        let mut field = TextField::new("Name", 10, 10).with_text("abc");
        field.handle(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(field.cursor(), 0);
        assert_eq!(field.text(), "abc");
        field.handle(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL));
        assert_eq!(field.cursor(), 3);
    }

    #[test]
    fn test_rejects_past_max_len() {
        let mut field = TextField::new("N", 3, 10);
        typed(&mut field, "12345");
        assert_eq!(field.text(), "123");
        assert_eq!(field.cursor(), 3);
    }

    #[test]
    fn test_scrolls_with_cursor() {
        let mut field = TextField::new("N", 20, 4);
        typed(&mut field, "abcdef");
        assert_eq!(field.scroll(), 3);
        field.handle(key(KeyCode::Home));
        assert_eq!(field.scroll(), 0);

        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 1));
        field.draw(&mut buf, 0, 0, false);
        let row: String = (0..10).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert_eq!(row, "N: abcd   ");
    }

    #[test]
    fn test_prompt_returns_text() {
        let mut surface = ScriptedSurface::new(80, 24).text("42").key(KeyCode::Enter);
        let answer = Prompt::new("Layers", "Count", 2).run(&mut surface).unwrap();
        assert_eq!(answer.as_deref(), Some("42"));
    }

    #[test]
    fn test_prompt_cancel_button() {
        let mut surface = ScriptedSurface::new(80, 24)
            .text("42")
            .keys(&[KeyCode::Down, KeyCode::Tab, KeyCode::Enter]);
        assert_eq!(Prompt::new("T", "L", 10).run(&mut surface).unwrap(), None);
    }

    #[test]
    fn test_prompt_escape_restores_screen() {
        let mut surface = ScriptedSurface::new(80, 24).text("x").key(KeyCode::Esc);
        surface
            .buffer_mut()
            .set_string(0, 12, "background", Style::default());
        assert_eq!(Prompt::new("Title", "Label", 10).run(&mut surface).unwrap(), None);
        assert_eq!(surface.row_text(12), "background");
        assert!(!surface.contains("Title"));
    }

    #[test]
    fn test_prompt_prefilled() {
        let mut surface = ScriptedSurface::new(80, 24)
            .key(KeyCode::Backspace)
            .text("3")
            .key(KeyCode::Enter);
        let answer = Prompt::new("T", "L", 2).with_text("5").run(&mut surface).unwrap();
        assert_eq!(answer.as_deref(), Some("3"));
    }

    proptest! {
        #[test]
        fn field_stays_bounded(
            max_len in 1usize..12,
            width in 1usize..8,
            keys in prop::collection::vec(
                prop_oneof![
                    Just(KeyCode::Left),
                    Just(KeyCode::Right),
                    Just(KeyCode::Home),
                    Just(KeyCode::End),
                    Just(KeyCode::Backspace),
                    Just(KeyCode::Delete),
                    proptest::char::range('a', 'z').prop_map(KeyCode::Char),
                ],
                0..60,
            ),
        ) {
            let mut field = TextField::new("F", max_len, width);
            for code in keys {
                field.handle(key(code));
                prop_assert!(field.len() <= max_len);
                prop_assert!(field.cursor() <= field.len());
                prop_assert!(field.scroll() <= field.cursor());
                prop_assert!(field.cursor() < field.scroll() + width);
            }
        }
    }
}
