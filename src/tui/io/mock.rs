//! # Mock I/O Implementations for Testing
//!
//! Scripted input and recorded output, used by the pane and controller tests.

use super::{EventStream, RenderStream, TerminalSize};
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Write;
use std::time::Duration;

/// Pre-programmed event source
pub struct MockEventStream {
    events: VecDeque<Event>,
    reads: usize,
}

impl MockEventStream {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
            reads: 0,
        }
    }

    /// Key presses for the given codes, in order
    pub fn keys(codes: impl IntoIterator<Item = KeyCode>) -> Self {
        Self::new(
            codes
                .into_iter()
                .map(|code| Event::Key(KeyEvent::new(code, KeyModifiers::empty())))
                .collect(),
        )
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of events consumed so far
    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl EventStream for MockEventStream {
    /// Always ready; once the script is exhausted `read` fails, which ends
    /// any loop driven by this stream.
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(true)
    }

    fn read(&mut self) -> Result<Event> {
        let event = self
            .events
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No events available"))?;
        self.reads += 1;
        Ok(event)
    }
}

/// Recorded render command for verification
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    ClearScreen,
    MoveCursor(u16, u16),
    HideCursor,
    ShowCursor,
    GetSize,
    EnterAlternateScreen,
    LeaveAlternateScreen,
    EnableRawMode,
    DisableRawMode,
    Write(Vec<u8>),
    Flush,
}

/// Records every rendering call
pub struct MockRenderStream {
    commands: RefCell<Vec<RenderCommand>>,
    terminal_size: TerminalSize,
    /// Rows whose draw calls fail, to simulate rejected placement
    failing_rows: Vec<u16>,
    current_row: Option<u16>,
    cursor_visible: bool,
    raw_mode: bool,
    alternate_screen: bool,
}

impl MockRenderStream {
    pub fn new() -> Self {
        Self::with_size((80, 24))
    }

    pub fn with_size(size: TerminalSize) -> Self {
        Self {
            commands: RefCell::new(Vec::new()),
            terminal_size: size,
            failing_rows: Vec::new(),
            current_row: None,
            cursor_visible: true,
            raw_mode: false,
            alternate_screen: false,
        }
    }

    /// Make writes on `row` fail with an I/O error
    pub fn fail_writes_on_row(mut self, row: u16) -> Self {
        self.failing_rows.push(row);
        self
    }

    pub fn get_commands(&self) -> Vec<RenderCommand> {
        self.commands.borrow().clone()
    }

    pub fn has_command(&self, command: &RenderCommand) -> bool {
        self.commands.borrow().contains(command)
    }

    pub fn count(&self, command: &RenderCommand) -> usize {
        self.commands
            .borrow()
            .iter()
            .filter(|c| *c == command)
            .count()
    }

    /// Text written after each cursor move, as `(row, text)` pairs
    pub fn drawn_rows(&self) -> Vec<(u16, String)> {
        let mut rows: Vec<(u16, String)> = Vec::new();
        let mut row = None;
        for command in self.commands.borrow().iter() {
            match command {
                RenderCommand::MoveCursor(_, y) => {
                    row = Some(*y);
                    rows.push((*y, String::new()));
                }
                RenderCommand::Write(bytes) if row.is_some() => {
                    if let Some((_, text)) = rows.last_mut() {
                        text.push_str(&String::from_utf8_lossy(bytes));
                    }
                }
                _ => {}
            }
        }
        rows
    }

    /// All written text concatenated, escape sequences included
    pub fn written_text(&self) -> String {
        self.commands
            .borrow()
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Write(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
                _ => None,
            })
            .collect()
    }

    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode
    }

    pub fn is_alternate_screen(&self) -> bool {
        self.alternate_screen
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    fn record(&self, command: RenderCommand) {
        self.commands.borrow_mut().push(command);
    }
}

impl Write for MockRenderStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Some(row) = self.current_row {
            if self.failing_rows.contains(&row) {
                return Err(std::io::Error::other(format!("row {row} rejected")));
            }
        }
        self.record(RenderCommand::Write(buf.to_vec()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.record(RenderCommand::Flush);
        Ok(())
    }
}

impl RenderStream for MockRenderStream {
    fn clear_screen(&mut self) -> Result<()> {
        self.record(RenderCommand::ClearScreen);
        Ok(())
    }

    fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        self.record(RenderCommand::MoveCursor(x, y));
        self.current_row = Some(y);
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<()> {
        self.record(RenderCommand::HideCursor);
        self.cursor_visible = false;
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<()> {
        self.record(RenderCommand::ShowCursor);
        self.cursor_visible = true;
        Ok(())
    }

    fn get_size(&self) -> Result<TerminalSize> {
        self.record(RenderCommand::GetSize);
        Ok(self.terminal_size)
    }

    fn enter_alternate_screen(&mut self) -> Result<()> {
        self.record(RenderCommand::EnterAlternateScreen);
        self.alternate_screen = true;
        Ok(())
    }

    fn leave_alternate_screen(&mut self) -> Result<()> {
        self.record(RenderCommand::LeaveAlternateScreen);
        self.alternate_screen = false;
        Ok(())
    }

    fn enable_raw_mode(&mut self) -> Result<()> {
        self.record(RenderCommand::EnableRawMode);
        self.raw_mode = true;
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        self.record(RenderCommand::DisableRawMode);
        self.raw_mode = false;
        Ok(())
    }
}

impl Default for MockEventStream {
    fn default() -> Self {
        Self::empty()
    }
}

impl Default for MockRenderStream {
    fn default() -> Self {
        Self::new()
    }
}
