//! Screen layout of the editor
//!
//! The matrix is drawn transposed: matrix rows run left to right and matrix
//! columns top to bottom, so the 8 columns fit in the height of the screen
//! while the 20 rows scroll horizontally.

use blusb_keyboard::{Cell, KeyCode, Layout, COLS, ROWS};
use ratatui::buffer::Buffer;
use ratatui::style::{Modifier, Style};

use super::widgets::{put, reversed, SelectionList};
use crate::keymap;

/// Screen cells per matrix cell label
pub const CELL_WIDTH: u16 = 8;
/// Cell label plus its separating blank
pub const CELL_PITCH: u16 = CELL_WIDTH + 1;
/// Left margin holding the `C1..C8` labels
pub const GRID_LEFT: u16 = 4;

pub const MENU_Y: u16 = 0;
pub const TABS_Y: u16 = 1;
pub const HEADER_Y: u16 = 2;
pub const GRID_TOP: u16 = 3;

/// Top-level menus with their shortcut letter and bar position
pub const MENU_BAR: [(&str, char, u16); 4] = [
    ("File", 'f', 1),
    ("Layer", 'l', 7),
    ("Macro", 'm', 14),
    ("Quit", 'q', 21),
];

/// Matrix rows that fit across a screen `width` cells wide
pub fn visible_rows(width: u16) -> usize {
    let rows = usize::from(width.saturating_sub(GRID_LEFT) + 1) / usize::from(CELL_PITCH);
    rows.clamp(1, ROWS)
}

/// Screen position of a matrix cell, `None` when scrolled out of view
pub fn cell_origin(row: usize, col: usize, first_row: usize, width: u16) -> Option<(u16, u16)> {
    if row < first_row || row >= first_row + visible_rows(width) || col >= COLS {
        return None;
    }
    let x = GRID_LEFT + (row - first_row) as u16 * CELL_PITCH;
    Some((x, GRID_TOP + col as u16))
}

/// Selection list over the key catalog positioned at `code`
pub fn key_list(code: KeyCode) -> SelectionList<'static, keymap::KeyMapping> {
    SelectionList::new("Select key", keymap::catalog(), CELL_WIDTH)
        .with_selected(keymap::index_of(code))
}

pub fn draw_menu_bar(buf: &mut Buffer, device: &str) {
    let width = buf.area.width;
    let bar = reversed();
    put(buf, 0, MENU_Y, &" ".repeat(usize::from(width)), usize::MAX, bar);
    for (label, _, x) in MENU_BAR {
        put(buf, x, MENU_Y, label, label.len(), bar);
        put(
            buf,
            x,
            MENU_Y,
            &label[..1],
            1,
            bar.add_modifier(Modifier::UNDERLINED),
        );
    }
    let x = width.saturating_sub(device.len() as u16 + 1);
    put(buf, x, MENU_Y, device, device.len(), bar);
}

pub fn draw_layer_tabs(buf: &mut Buffer, layer_count: usize, active: usize) {
    put(buf, 0, TABS_Y, "Layer", 5, Style::default());
    for i in 0..layer_count {
        let mut style = reversed();
        if i == active {
            style = style.add_modifier(Modifier::BOLD);
        }
        put(buf, 6 + i as u16 * 5, TABS_Y, &format!("  {}  ", i + 1), 5, style);
    }
}

pub fn draw_headers(buf: &mut Buffer, first_row: usize) {
    let width = buf.area.width;
    for row in first_row..(first_row + visible_rows(width)).min(ROWS) {
        if let Some((x, _)) = cell_origin(row, 0, first_row, width) {
            put(buf, x, HEADER_Y, &format!("R{}", row + 1), 3, Style::default());
        }
    }
    for col in 0..COLS {
        put(buf, 0, GRID_TOP + col as u16, &format!("C{}", col + 1), 3, Style::default());
    }
}

pub fn draw_cell(buf: &mut Buffer, layout: &Layout, cell: Cell, first_row: usize, focused: bool) {
    let Some((x, y)) = cell_origin(cell.row, cell.col, first_row, buf.area.width) else {
        return;
    };
    let code = layout.get(cell).unwrap_or(KeyCode::NONE);
    key_list(code).draw_compact(buf, x, y, focused);
}

pub fn draw_grid(buf: &mut Buffer, layout: &Layout, layer: usize, first_row: usize) {
    for row in 0..ROWS {
        for col in 0..COLS {
            draw_cell(buf, layout, Cell::new(layer, row, col), first_row, false);
        }
    }
}

/// Transient result of the last action, above the footer
pub fn draw_status(buf: &mut Buffer, status: &str) {
    let y = buf.area.height.saturating_sub(3);
    let width = usize::from(buf.area.width);
    put(buf, 0, y, &format!("{status:<width$}"), width, Style::default());
}

/// Key help on the left and the cursor position on the right
pub fn draw_footer(buf: &mut Buffer, help: &str, cell: Cell, code: KeyCode) {
    let y = buf.area.height.saturating_sub(1);
    let width = buf.area.width;
    let style = reversed();
    put(buf, 0, y, &" ".repeat(usize::from(width)), usize::MAX, style);
    put(buf, 0, y, help, usize::from(width), style);

    let position = format!(
        "col: {}, row: {}, val: {}",
        cell.col + 1,
        cell.row + 1,
        code.value()
    );
    let x = width.saturating_sub(position.len() as u16 + 1);
    put(buf, x, y, &position, position.len(), style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    fn text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn test_visible_rows_on_80_columns() {
        assert_eq!(visible_rows(80), 8);
        assert_eq!(visible_rows(200), ROWS);
        assert_eq!(visible_rows(4), 1);
    }

    #[test]
    fn test_cell_origin() {
        assert_eq!(cell_origin(0, 0, 0, 80), Some((4, 3)));
        assert_eq!(cell_origin(2, 7, 0, 80), Some((22, 10)));
        assert_eq!(cell_origin(8, 0, 0, 80), None);
        assert_eq!(cell_origin(8, 0, 1, 80), Some((67, 3)));
        assert_eq!(cell_origin(0, 0, 1, 80), None);
    }

    #[test]
    fn test_headers_follow_scroll() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        draw_headers(&mut buf, 12);
        assert!(text(&buf, HEADER_Y).starts_with("    R13      R14"));
        assert!(text(&buf, HEADER_Y).ends_with("R20"));
        assert_eq!(text(&buf, GRID_TOP + 7), "C8");
    }

    #[test]
    fn test_grid_shows_key_names() {
        let mut layout = Layout::new(1).unwrap();
        layout.set(Cell::new(0, 1, 0), KeyCode(0x04)).unwrap();
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        draw_grid(&mut buf, &layout, 0, 0);
        assert!(text(&buf, GRID_TOP).starts_with("    --       A        --"));
    }

    #[test]
    fn test_footer() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        draw_footer(&mut buf, "Enter: select key", Cell::new(0, 19, 7), KeyCode(65535));
        let line = text(&buf, 23);
        assert!(line.starts_with("Enter: select key"));
        assert!(line.ends_with("col: 8, row: 20, val: 65535"));
    }

    #[test]
    fn test_menu_bar_underlines_shortcuts() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        draw_menu_bar(&mut buf, "offline");
        assert!(text(&buf, 0).starts_with(" File  Layer  Macro  Quit"));
        assert!(text(&buf, 0).ends_with("offline"));
        assert!(buf[(1, 0)].modifier.contains(Modifier::UNDERLINED));
        assert!(!buf[(2, 0)].modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_layer_tabs() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        draw_layer_tabs(&mut buf, 3, 1);
        assert_eq!(text(&buf, TABS_Y), "Layer   1    2    3");
        assert!(buf[(13, TABS_Y)].modifier.contains(Modifier::BOLD));
        assert!(!buf[(8, TABS_Y)].modifier.contains(Modifier::BOLD));
    }
}
