//! Selection popup over a list of labeled items

use std::io;

use crossterm::event::KeyCode;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use super::{frame, put, reversed, SavedCells, ScrollWindow};
use crate::keymap::KeyMapping;
use crate::tui::surface::Surface;

/// Anything a selection list can show
pub trait Labeled {
    fn label(&self) -> &str;
}

impl Labeled for KeyMapping {
    fn label(&self) -> &str {
        self.name
    }
}

impl Labeled for String {
    fn label(&self) -> &str {
        self
    }
}

impl Labeled for &str {
    fn label(&self) -> &str {
        self
    }
}

/// A value picked from a fixed list through a scrolling popup
pub struct SelectionList<'a, T> {
    title: String,
    items: &'a [T],
    selected: usize,
    width: u16,
    popup_width: Option<u16>,
}

impl<'a, T: Labeled> SelectionList<'a, T> {
    /// `width` is the cell width used by [`SelectionList::draw_compact`]
    pub fn new(title: impl Into<String>, items: &'a [T], width: u16) -> Self {
        assert!(!items.is_empty(), "selection list needs at least one item");
        Self {
            title: title.into(),
            items,
            selected: 0,
            width,
            popup_width: None,
        }
    }

    /// Fixed popup width instead of sizing to the longest label
    pub fn with_popup_width(mut self, width: u16) -> Self {
        self.popup_width = Some(width);
        self
    }

    pub fn with_selected(mut self, index: usize) -> Self {
        self.set_selected(index);
        self
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> &'a T {
        &self.items[self.selected]
    }

    pub fn set_selected(&mut self, index: usize) {
        assert!(
            index < self.items.len(),
            "selected index out of range: {index} (list has {})",
            self.items.len()
        );
        self.selected = index;
    }

    /// Draw the selected label cut to the list's cell width
    pub fn draw_compact(&self, buf: &mut Buffer, x: u16, y: u16, inverted: bool) {
        let style = if inverted { reversed() } else { Style::default() };
        let label = self.selected_item().label();
        let width = usize::from(self.width);
        put(buf, x, y, &format!("{label:<width$.width$}"), width, style);
    }

    fn popup_area(&self, screen: Rect, x: u16, y: u16) -> Rect {
        let height = (screen.height / 2).saturating_sub(3).max(3);
        let width = self
            .popup_width
            .unwrap_or_else(|| {
                let longest = self.items.iter().map(|i| i.label().len()).max().unwrap_or(0);
                longest.max(self.title.len() + 2) as u16 + 2
            })
            .min(screen.width);
        let top = if y > screen.height / 2 {
            y.saturating_sub(height)
        } else {
            y + 1
        };
        let top = top.min(screen.height.saturating_sub(height));
        let left = x.min(screen.width - width);
        Rect::new(left, top, width, height)
    }

    /// Open the popup anchored at the cell (x, y)
    ///
    /// The popup opens below the anchor, or above it when the anchor is in
    /// the lower half of the screen. Returns true when a new selection was
    /// committed with Enter; Esc leaves the selection as it was.
    pub fn open(&mut self, surface: &mut dyn Surface, x: u16, y: u16) -> io::Result<bool> {
        let saved = SavedCells::take(surface);
        let result = self.run_popup(surface, x, y);
        saved.restore(surface);
        surface.present()?;
        result
    }

    fn run_popup(&mut self, surface: &mut dyn Surface, x: u16, y: u16) -> io::Result<bool> {
        let area = self.popup_area(surface.area(), x, y);
        let visible = usize::from(area.height.saturating_sub(2));
        let mut window = ScrollWindow::new(self.items.len(), visible, self.selected);

        loop {
            self.draw_popup(surface.buffer_mut(), area, &window);
            surface.present()?;

            match surface.wait_key()?.code {
                KeyCode::Esc => return Ok(false),
                KeyCode::Enter => {
                    self.selected = window.cursor();
                    return Ok(true);
                }
                KeyCode::Up => window.up(),
                KeyCode::Down => window.down(),
                KeyCode::PageUp => window.page_up(),
                KeyCode::PageDown => window.page_down(),
                _ => {}
            }
        }
    }

    fn draw_popup(&self, buf: &mut Buffer, area: Rect, window: &ScrollWindow) {
        let title = (!self.title.is_empty()).then_some(self.title.as_str());
        frame(buf, area, title);
        let inner = usize::from(area.width.saturating_sub(2));
        for (line, index) in (window.first()..=window.last()).enumerate() {
            let style = if index == window.cursor() {
                reversed()
            } else {
                Style::default()
            };
            let label = self.items[index].label();
            put(buf, area.x + 1, area.y + 1 + line as u16, label, inner, style);
        }
    }
}
