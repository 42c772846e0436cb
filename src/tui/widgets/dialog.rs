//! Message and yes/no dialogs

use std::io;

use ratatui::layout::Rect;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Paragraph, Widget};

use super::{centered, frame, ButtonRow, SavedCells};
use crate::tui::surface::Surface;

const MAX_TEXT_WIDTH: usize = 60;

/// Greedy word wrap to `width` columns; words longer than a line are split
fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for source in text.lines() {
        let mut line = String::new();
        let mut used = 0;
        for word in source.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            if used > 0 && used + 1 + word.len() <= width {
                line.push(' ');
                line.extend(&word);
                used += 1 + word.len();
                continue;
            }
            if used > 0 {
                lines.push(std::mem::take(&mut line));
                used = 0;
            }
            while word.len() > width {
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            line.extend(&word);
            used = word.len();
        }
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Centred box with a message and the given buttons; returns the committed index
fn show(
    surface: &mut dyn Surface,
    title: &str,
    text: &str,
    buttons: &[&'static str],
) -> io::Result<usize> {
    let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let text_width = longest
        .max(title.chars().count() + 2)
        .clamp(20, MAX_TEXT_WIDTH);
    let lines = wrap_lines(text, text_width);
    let text_height = lines.len();

    // borders, a blank line above the text, and the button row below it
    let area = centered(
        surface.area(),
        text_width as u16 + 2,
        text_height as u16 + 7,
    );

    let saved = SavedCells::take(surface);
    let buf = surface.buffer_mut();
    frame(buf, area, Some(title));
    let text_area = Rect::new(area.x + 1, area.y + 2, text_width as u16, text_height as u16)
        .intersection(buf.area);
    let text: Vec<Line> = lines.into_iter().map(Line::from).collect();
    Paragraph::new(Text::from(text)).render(text_area, buf);

    let mut row = ButtonRow::new(buttons, area.x + 1, area.y + 3 + text_height as u16)
        .with_cancel(buttons.len() - 1);
    let answer = row.run(surface);

    saved.restore(surface);
    surface.present()?;
    answer
}

/// Ask an Ok/Cancel question; Esc counts as Cancel
pub fn confirm(surface: &mut dyn Surface, title: &str, text: &str) -> io::Result<bool> {
    Ok(show(surface, title, text, &["Ok", "Cancel"])? == 0)
}

/// Show a message with a single Ok button
pub fn message(surface: &mut dyn Surface, title: &str, text: &str) -> io::Result<()> {
    show(surface, title, text, &["Ok"]).map(|_| ())
}
