//! Character-cell surface the widgets draw on
//!
//! Widgets paint into a retained [`Buffer`] and call [`Surface::present`] when
//! a frame is complete. Input is polled without blocking; a `None` from
//! [`Surface::poll_key`] means no key is pending and the caller should
//! [`Surface::idle`] before polling again.

use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::sync::OnceLock;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing::debug;

/// Smallest terminal the editor runs in
pub const MIN_WIDTH: u16 = 80;
pub const MIN_HEIGHT: u16 = 24;

pub trait Surface {
    fn area(&self) -> Rect;

    fn buffer(&self) -> &Buffer;

    fn buffer_mut(&mut self) -> &mut Buffer;

    /// Flush the retained buffer to the screen
    fn present(&mut self) -> io::Result<()>;

    /// Next pending key press, if any
    fn poll_key(&mut self) -> io::Result<Option<KeyEvent>>;

    /// Short pause between polls
    fn idle(&mut self);

    /// True once after the surface changed size
    fn take_resize(&mut self) -> bool {
        false
    }

    /// Block until a key arrives
    fn wait_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            if let Some(key) = self.poll_key()? {
                return Ok(key);
            }
            self.idle();
        }
    }
}

/// Crossterm terminal in raw mode on the alternate screen
pub struct TerminalSurface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    buffer: Buffer,
    poll_interval: Duration,
    resized: bool,
}

impl TerminalSurface {
    pub fn new(poll_interval: Duration) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return Err(io::Error::other(format!(
                "The terminal must be at least {MIN_WIDTH} columns by {MIN_HEIGHT} rows \
                 (this one is {width}x{height})"
            )));
        }

        install_panic_hook();
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide) {
            restore_terminal();
            return Err(e);
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(e) => {
                restore_terminal();
                return Err(e);
            }
        };

        debug!("terminal surface {width}x{height}");
        Ok(Self {
            terminal,
            buffer: Buffer::empty(Rect::new(0, 0, width, height)),
            poll_interval,
            resized: false,
        })
    }
}

impl Surface for TerminalSurface {
    fn area(&self) -> Rect {
        self.buffer.area
    }

    fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    fn present(&mut self) -> io::Result<()> {
        let buffer = &self.buffer;
        self.terminal
            .draw(|frame| frame.buffer_mut().merge(buffer))?;
        Ok(())
    }

    fn poll_key(&mut self) -> io::Result<Option<KeyEvent>> {
        if !event::poll(Duration::ZERO)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
            Event::Resize(width, height) => {
                debug!("terminal resized to {width}x{height}");
                self.buffer = Buffer::empty(Rect::new(0, 0, width, height));
                self.terminal.clear()?;
                self.resized = true;
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn idle(&mut self) {
        std::thread::sleep(self.poll_interval);
    }

    fn take_resize(&mut self) -> bool {
        std::mem::take(&mut self.resized)
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        restore_terminal();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous(info);
        }));
    });
}

fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = stdout.flush();
}

/// In-memory surface that replays a fixed sequence of input
///
/// Each step is either a key press or an idle poll. Polling past the end of
/// the script fails with [`io::ErrorKind::UnexpectedEof`], which unwinds any
/// widget loop still waiting for input.
pub struct ScriptedSurface {
    buffer: Buffer,
    script: VecDeque<Option<KeyEvent>>,
    frames: Vec<Vec<String>>,
}

impl ScriptedSurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, width, height)),
            script: VecDeque::new(),
            frames: Vec::new(),
        }
    }

    pub fn key(mut self, code: KeyCode) -> Self {
        self.script
            .push_back(Some(KeyEvent::new(code, KeyModifiers::NONE)));
        self
    }

    pub fn keys(mut self, codes: &[KeyCode]) -> Self {
        for &code in codes {
            self = self.key(code);
        }
        self
    }

    pub fn ctrl(mut self, c: char) -> Self {
        self.script
            .push_back(Some(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)));
        self
    }

    /// Type each character of `text`
    pub fn text(mut self, text: &str) -> Self {
        for c in text.chars() {
            self = self.key(KeyCode::Char(c));
        }
        self
    }

    /// A poll that finds no key pending
    pub fn idle_poll(mut self) -> Self {
        self.script.push_back(None);
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    pub fn presents(&self) -> usize {
        self.frames.len()
    }

    /// Screen text of every presented frame, oldest first
    pub fn frames(&self) -> &[Vec<String>] {
        &self.frames
    }

    /// True if any presented frame showed `text`
    pub fn was_shown(&self, text: &str) -> bool {
        self.frames
            .iter()
            .any(|frame| frame.iter().any(|line| line.contains(text)))
    }

    /// Text of one screen row, trailing blanks removed
    pub fn row_text(&self, y: u16) -> String {
        let area = self.buffer.area;
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(self.buffer[(x, y)].symbol());
        }
        line.trim_end().to_string()
    }

    pub fn screen_text(&self) -> Vec<String> {
        let area = self.buffer.area;
        (area.top()..area.bottom()).map(|y| self.row_text(y)).collect()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.screen_text().iter().any(|line| line.contains(text))
    }
}

impl Surface for ScriptedSurface {
    fn area(&self) -> Rect {
        self.buffer.area
    }

    fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    fn present(&mut self) -> io::Result<()> {
        let frame = self.screen_text();
        self.frames.push(frame);
        Ok(())
    }

    fn poll_key(&mut self) -> io::Result<Option<KeyEvent>> {
        match self.script.pop_front() {
            Some(step) => Ok(step),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input script exhausted",
            )),
        }
    }

    fn idle(&mut self) {}
}
