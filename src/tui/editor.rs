//! Interactive layout editor
//!
//! A single-threaded loop: sample the controller's key scan, poll the
//! terminal, handle at most one key, repaint what changed, sleep. Every
//! dialog runs to completion inside the key handler, so the layout is only
//! ever touched from one place at a time.

use std::io;
use std::path::{Path, PathBuf};

use blusb_keyboard::{Cell, KeyCode, Keyboard, Layout, MacroTable, MatrixScanner, COLS, MAX_LAYERS, ROWS};
use crossterm::event::{KeyCode as Key, KeyEvent};
use tracing::{debug, info, warn};

use super::surface::Surface;
use super::view::{self, MENU_BAR};
use super::widgets::{confirm, message, pick_file, Labeled, Prompt, SelectionList};
use crate::codec;
use crate::keymap;

const NO_KEYBOARD: &str = "Could not find keyboard";
const LAYER_COUNT_RANGE: &str = "Value must be an integer between 1 and 6";

const BROWSE_HELP: &str = "Enter: select key, Select layer: 1 - 6, q: quit";
const EDIT_HELP: &str = "Up/Down: choose, Enter: accept, Esc: cancel";
const MENU_HELP: &str = "Up/Down: choose, Enter: run, Esc: close";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// Cursor over the matrix grid
    Browsing,
    /// Key popup open over the cursor cell
    EditingCell,
    /// A menu action is running
    Menu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Open,
    Save,
    Write,
    LayerCount,
    SelectLayer,
    ShowMacros,
    WriteMacros,
}

#[derive(Debug, Clone, Copy)]
struct MenuItem {
    label: &'static str,
    action: Action,
}

impl Labeled for MenuItem {
    fn label(&self) -> &str {
        self.label
    }
}

const FILE_MENU: [MenuItem; 3] = [
    MenuItem { label: "Open layout file (O)", action: Action::Open },
    MenuItem { label: "Save layout file (S)", action: Action::Save },
    MenuItem { label: "Write layout to controller (W)", action: Action::Write },
];

const LAYER_MENU: [MenuItem; 2] = [
    MenuItem { label: "Number of layers", action: Action::LayerCount },
    MenuItem { label: "Select layer", action: Action::SelectLayer },
];

const MACRO_MENU: [MenuItem; 2] = [
    MenuItem { label: "Show macros", action: Action::ShowMacros },
    MenuItem { label: "Write macros from file", action: Action::WriteMacros },
];

/// Answer to the layer count prompt
#[derive(Debug, Clone, PartialEq, Eq)]
enum LayerCount {
    Accepted(usize),
    Cancelled,
    Invalid(&'static str),
}

impl LayerCount {
    fn parse(answer: Option<String>) -> Self {
        let Some(answer) = answer else {
            return Self::Cancelled;
        };
        match answer.trim().parse::<usize>() {
            Ok(n) if (1..=MAX_LAYERS).contains(&n) => Self::Accepted(n),
            _ => Self::Invalid(LAYER_COUNT_RANGE),
        }
    }
}

pub struct Editor<'k, S> {
    surface: S,
    keyboard: Option<&'k Keyboard>,
    scanner: MatrixScanner,
    layout: Layout,
    cursor: Cell,
    state: EditorState,
    first_row: usize,
    full_redraw: bool,
    dirty: Vec<Cell>,
    status: String,
    layout_dir: PathBuf,
    file: Option<PathBuf>,
}

impl<'k, S: Surface> Editor<'k, S> {
    pub fn new(surface: S, keyboard: Option<&'k Keyboard>, layout: Layout) -> Self {
        Self {
            surface,
            keyboard,
            scanner: MatrixScanner::new(),
            layout,
            cursor: Cell::new(0, 0, 0),
            state: EditorState::Browsing,
            first_row: 0,
            full_redraw: true,
            dirty: Vec::new(),
            status: String::new(),
            layout_dir: PathBuf::from("."),
            file: None,
        }
    }

    /// Directory the file picker opens in
    pub fn with_layout_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.layout_dir = dir.into();
        self
    }

    /// File the layout was loaded from, offered again when saving
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn cursor(&self) -> Cell {
        self.cursor
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Run until the quit key
    pub fn run(&mut self) -> io::Result<()> {
        info!(
            "Editing {} layer(s){}",
            self.layout.layer_count(),
            if self.keyboard.is_some() { "" } else { " offline" }
        );
        self.full_redraw = true;
        loop {
            if self.surface.take_resize() {
                self.scroll_to_cursor();
                self.full_redraw = true;
            }
            self.poll_hardware();
            self.repaint()?;

            match self.surface.poll_key()? {
                Some(key) => {
                    if self.handle_key(key)? == Flow::Quit {
                        return Ok(());
                    }
                }
                None => self.surface.idle(),
            }
        }
    }

    fn poll_hardware(&mut self) {
        let Some(keyboard) = self.keyboard else {
            return;
        };
        match self.scanner.poll(keyboard) {
            Ok(Some(pos)) => {
                debug!("Hardware key at row {} col {}", pos.row, pos.col);
                self.move_to(Cell::new(self.cursor.layer, pos.row, pos.col));
            }
            Ok(None) => {}
            Err(e) => debug!("Key scan failed: {}", e),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> io::Result<Flow> {
        let Cell { layer, row, col } = self.cursor;
        match key.code {
            Key::Left if row > 0 => self.move_to(Cell::new(layer, row - 1, col)),
            Key::Right if row + 1 < ROWS => self.move_to(Cell::new(layer, row + 1, col)),
            Key::Up if col > 0 => self.move_to(Cell::new(layer, row, col - 1)),
            Key::Down if col + 1 < COLS => self.move_to(Cell::new(layer, row, col + 1)),
            Key::Enter => self.edit_cell()?,
            Key::Char('q' | 'Q') => return Ok(Flow::Quit),
            Key::Char(c) => {
                if let Some(digit) = c.to_digit(10) {
                    let digit = digit as usize;
                    if (1..=self.layout.layer_count()).contains(&digit) {
                        self.select_layer(digit - 1);
                    }
                } else {
                    self.shortcut(c.to_ascii_lowercase())?;
                }
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn shortcut(&mut self, c: char) -> io::Result<()> {
        let menu: &[MenuItem] = match c {
            'o' => return self.run_action(Action::Open),
            's' => return self.run_action(Action::Save),
            'w' => return self.run_action(Action::Write),
            'f' => &FILE_MENU,
            'l' => &LAYER_MENU,
            'm' => &MACRO_MENU,
            _ => return Ok(()),
        };
        let x = MENU_BAR
            .iter()
            .find(|(_, key, _)| *key == c)
            .map_or(0, |&(_, _, x)| x);
        self.open_menu(menu, x)
    }

    fn move_to(&mut self, cell: Cell) {
        if cell == self.cursor {
            return;
        }
        let old = self.cursor;
        self.cursor = cell;
        if cell.layer != old.layer || self.scroll_to_cursor() {
            self.full_redraw = true;
        } else {
            self.dirty.push(old);
            self.dirty.push(cell);
        }
    }

    /// Keep the cursor row on screen; true when the view scrolled
    fn scroll_to_cursor(&mut self) -> bool {
        let visible = view::visible_rows(self.surface.area().width);
        let row = self.cursor.row;
        let first = if row < self.first_row {
            row
        } else if row >= self.first_row + visible {
            row + 1 - visible
        } else {
            self.first_row.min(ROWS.saturating_sub(visible))
        };
        let scrolled = first != self.first_row;
        self.first_row = first;
        scrolled
    }

    fn select_layer(&mut self, layer: usize) {
        debug!("Layer {}", layer + 1);
        self.move_to(Cell::new(layer, self.cursor.row, self.cursor.col));
        self.full_redraw = true;
    }

    fn help(&self) -> &'static str {
        match self.state {
            EditorState::Browsing => BROWSE_HELP,
            EditorState::EditingCell => EDIT_HELP,
            EditorState::Menu => MENU_HELP,
        }
    }

    fn current_code(&self) -> KeyCode {
        self.layout.get(self.cursor).unwrap_or(KeyCode::NONE)
    }

    fn draw_footer(&mut self) {
        let help = self.help();
        let cursor = self.cursor;
        let code = self.current_code();
        view::draw_footer(self.surface.buffer_mut(), help, cursor, code);
    }

    fn repaint(&mut self) -> io::Result<()> {
        if self.full_redraw {
            self.draw_all();
        } else if !self.dirty.is_empty() {
            let dirty = std::mem::take(&mut self.dirty);
            for cell in dirty {
                let focused = cell == self.cursor;
                view::draw_cell(self.surface.buffer_mut(), &self.layout, cell, self.first_row, focused);
            }
            self.draw_footer();
        } else {
            return Ok(());
        }
        self.surface.present()
    }

    fn draw_all(&mut self) {
        self.full_redraw = false;
        self.dirty.clear();

        let device = match self.keyboard {
            Some(keyboard) => keyboard.device_info().display_name(),
            None => "offline".to_string(),
        };
        let layer = self.cursor.layer;
        let buf = self.surface.buffer_mut();
        buf.reset();
        view::draw_menu_bar(buf, &device);
        view::draw_layer_tabs(buf, self.layout.layer_count(), layer);
        view::draw_headers(buf, self.first_row);
        view::draw_grid(buf, &self.layout, layer, self.first_row);
        view::draw_cell(buf, &self.layout, self.cursor, self.first_row, true);
        view::draw_status(buf, &self.status);
        self.draw_footer();
    }

    /// Show the state's help line before a blocking widget takes over
    fn enter(&mut self, state: EditorState) -> io::Result<()> {
        self.state = state;
        self.draw_footer();
        self.surface.present()
    }

    fn leave(&mut self) {
        self.state = EditorState::Browsing;
        self.full_redraw = true;
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        info!("{}", self.status);
        self.full_redraw = true;
    }

    fn edit_cell(&mut self) -> io::Result<()> {
        self.enter(EditorState::EditingCell)?;
        let (x, y) = view::cell_origin(
            self.cursor.row,
            self.cursor.col,
            self.first_row,
            self.surface.area().width,
        )
        .unwrap_or((view::GRID_LEFT, view::GRID_TOP));

        let mut list = view::key_list(self.current_code());
        let committed = list.open(&mut self.surface, x, y);
        self.leave();
        if committed? {
            let mapping = list.selected_item();
            match self.layout.set(self.cursor, mapping.code) {
                Ok(()) => self.set_status(format!(
                    "R{} C{} set to {}",
                    self.cursor.row + 1,
                    self.cursor.col + 1,
                    mapping.name
                )),
                Err(e) => warn!("{}", e),
            }
        }
        Ok(())
    }

    fn open_menu(&mut self, items: &[MenuItem], x: u16) -> io::Result<()> {
        self.enter(EditorState::Menu)?;
        let mut list = SelectionList::new("", items, 0);
        let picked = list.open(&mut self.surface, x, view::MENU_Y);
        self.leave();
        if picked? {
            let action = list.selected_item().action;
            self.run_action(action)?;
        }
        Ok(())
    }

    fn run_action(&mut self, action: Action) -> io::Result<()> {
        debug!("Menu action {:?}", action);
        self.enter(EditorState::Menu)?;
        let result = match action {
            Action::Open => self.open_file(),
            Action::Save => self.save_file(),
            Action::Write => self.write_layout(),
            Action::LayerCount => self.manage_layers(),
            Action::SelectLayer => self.choose_layer(),
            Action::ShowMacros => self.show_macros(),
            Action::WriteMacros => self.write_macros(),
        };
        self.leave();
        result
    }

    fn open_file(&mut self) -> io::Result<()> {
        let Some(path) = pick_file(&mut self.surface, &self.layout_dir)? else {
            return Ok(());
        };
        match codec::load_layout(&path) {
            Ok(layout) => {
                self.layout = layout;
                let layer = self.cursor.layer.min(self.layout.layer_count() - 1);
                self.cursor = Cell::new(layer, self.cursor.row, self.cursor.col);
                self.set_status(format!("Loaded {}", path.display()));
                self.file = Some(path);
            }
            Err(e) => {
                warn!("{}", e);
                message(&mut self.surface, "Open File", &e.to_string())?;
            }
        }
        Ok(())
    }

    fn save_file(&mut self) -> io::Result<()> {
        let suggested = self
            .file
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let answer = Prompt::new("Save File", "Enter a name for the file", 100)
            .with_text(&suggested)
            .run(&mut self.surface)?;
        let Some(name) = answer.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()) else {
            return Ok(());
        };

        let path = self.layout_dir.join(name);
        match codec::save_layout(&path, &self.layout) {
            Ok(()) => {
                message(&mut self.surface, "Save File", "File saved")?;
                self.set_status(format!("Saved {}", path.display()));
                self.file = Some(path);
            }
            Err(e) => {
                warn!("{}", e);
                message(&mut self.surface, "Save File", &format!("Error while saving: {e}"))?;
            }
        }
        Ok(())
    }

    fn write_layout(&mut self) -> io::Result<()> {
        let Some(keyboard) = self.keyboard else {
            return message(&mut self.surface, "Write to Controller", NO_KEYBOARD);
        };
        if !confirm(
            &mut self.surface,
            "Write to Controller",
            "Do you wish to write the new configuration to the controller?",
        )? {
            return Ok(());
        }
        match keyboard.write_layout(&self.layout) {
            Ok(()) => self.set_status("Layout written to controller"),
            Err(e) => {
                warn!("{}", e);
                message(&mut self.surface, "Write to Controller", &e.to_string())?;
            }
        }
        Ok(())
    }

    fn ask_layer_count(&mut self) -> io::Result<LayerCount> {
        let answer = Prompt::new("Number of layers (1-6)", "Layers", 2)
            .with_text(&self.layout.layer_count().to_string())
            .run(&mut self.surface)?;
        Ok(LayerCount::parse(answer))
    }

    fn manage_layers(&mut self) -> io::Result<()> {
        let count = loop {
            match self.ask_layer_count()? {
                LayerCount::Accepted(n) => break n,
                LayerCount::Cancelled => return Ok(()),
                LayerCount::Invalid(reason) => {
                    message(&mut self.surface, "Number of layers", reason)?;
                }
            }
        };

        let current = self.layout.layer_count();
        if count < current {
            let text = format!(
                "You are deleting {} layer(s). Are you sure?",
                current - count
            );
            if !confirm(&mut self.surface, "Deleting layers", &text)? {
                return Ok(());
            }
        }
        if let Err(e) = self.layout.set_layer_count(count) {
            warn!("{}", e);
            return Ok(());
        }
        if self.cursor.layer >= count {
            self.cursor = Cell::new(count - 1, self.cursor.row, self.cursor.col);
        }
        self.set_status(format!("Layout has {count} layer(s)"));
        Ok(())
    }

    fn choose_layer(&mut self) -> io::Result<()> {
        let labels: Vec<String> = (1..=self.layout.layer_count())
            .map(|n| format!("Layer {n}"))
            .collect();
        let mut list = SelectionList::new("Layer", &labels, 0).with_selected(self.cursor.layer);
        if list.open(&mut self.surface, MENU_BAR[1].2, view::MENU_Y)? {
            let layer = list.selected();
            self.select_layer(layer);
        }
        Ok(())
    }

    fn show_macros(&mut self) -> io::Result<()> {
        let Some(keyboard) = self.keyboard else {
            return message(&mut self.surface, "Macros", NO_KEYBOARD);
        };
        let table = match keyboard.read_macros() {
            Ok(table) => table,
            Err(e) => {
                warn!("{}", e);
                return message(&mut self.surface, "Macros", &e.to_string());
            }
        };

        let lines = macro_lines(&table);
        let width = self.surface.area().width.saturating_sub(4);
        let mut list = SelectionList::new("Macros", &lines, 0).with_popup_width(width);
        list.open(&mut self.surface, 2, view::MENU_Y)?;
        Ok(())
    }

    fn write_macros(&mut self) -> io::Result<()> {
        let Some(keyboard) = self.keyboard else {
            return message(&mut self.surface, "Write Macros", NO_KEYBOARD);
        };
        let Some(path) = pick_file(&mut self.surface, &self.layout_dir)? else {
            return Ok(());
        };
        let table = match codec::load_macros(&path) {
            Ok(table) => table,
            Err(e) => {
                warn!("{}", e);
                return message(&mut self.surface, "Write Macros", &e.to_string());
            }
        };
        let text = format!("Write {} macro(s) to the controller?", table.count());
        if !confirm(&mut self.surface, "Write Macros", &text)? {
            return Ok(());
        }
        match keyboard.write_macros(&table) {
            Ok(()) => self.set_status(format!("Macros from {} written", path.display())),
            Err(e) => {
                warn!("{}", e);
                message(&mut self.surface, "Write Macros", &e.to_string())?;
            }
        }
        Ok(())
    }
}

/// One line per macro: number, modifier and reserved bytes, key names
fn macro_lines(table: &MacroTable) -> Vec<String> {
    table
        .iter()
        .enumerate()
        .map(|(i, seq)| {
            let keys: Vec<&str> = seq[2..]
                .iter()
                .map(|&code| keymap::name_of(code).unwrap_or("?"))
                .collect();
            format!(
                "M{:<2} {:02X} {:02X}  {}",
                i + 1,
                seq[0].value(),
                seq[1].value(),
                keys.join(" ")
            )
        })
        .collect()
}
