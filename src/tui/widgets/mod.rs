//! Modal controls: buttons, text prompt, selection popup and dialogs
//!
//! Every control runs its own input loop against a [`Surface`] and returns
//! once the user commits or cancels. Controls that open over existing
//! content save the cells beneath them and put them back when they close.

mod button;
mod dialog;
mod file_picker;
mod scroll;
mod select;
mod text_field;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Clear, Widget};

use super::surface::Surface;

pub use button::{ButtonEvent, ButtonRow};
pub use dialog::{confirm, message};
pub use file_picker::pick_file;
pub use scroll::ScrollWindow;
pub use select::{Labeled, SelectionList};
pub use text_field::{Prompt, TextField};

pub(crate) fn reversed() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

/// Write `text` at (x, y), clipped to the buffer and to `max_width` cells
///
/// The written cells take exactly `style`; modifiers already on them are cleared.
pub(crate) fn put(buf: &mut Buffer, x: u16, y: u16, text: &str, max_width: usize, style: Style) {
    let area = buf.area;
    if y < area.top() || y >= area.bottom() || x < area.left() || x >= area.right() {
        return;
    }
    let room = usize::from(area.right() - x).min(max_width);
    buf.set_stringn(x, y, text, room, Style::reset().patch(style));
}

/// Blank `area` and draw a border with a centred title
pub(crate) fn frame(buf: &mut Buffer, area: Rect, title: Option<&str>) {
    let area = area.intersection(buf.area);
    if area.is_empty() {
        return;
    }
    Clear.render(area, buf);
    let mut block = Block::bordered().title_alignment(Alignment::Center);
    if let Some(title) = title {
        block = block.title(format!(" {title} "));
    }
    block.render(area, buf);
}

/// Rectangle of the given size centred on the surface
pub(crate) fn centered(outer: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect::new(
        outer.x + (outer.width - width) / 2,
        outer.y + (outer.height - height) / 2,
        width,
        height,
    )
}

/// Cells under a popup, put back when the popup closes
pub(crate) struct SavedCells(Buffer);

impl SavedCells {
    pub(crate) fn take(surface: &dyn Surface) -> Self {
        Self(surface.buffer().clone())
    }

    pub(crate) fn restore(self, surface: &mut dyn Surface) {
        let saved = self.0;
        let buf = surface.buffer_mut();
        if buf.area == saved.area {
            *buf = saved;
        }
    }
}
