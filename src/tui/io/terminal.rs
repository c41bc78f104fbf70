//! crossterm backends for the menu and the output pane.
//!
//! Every drawing call is executed immediately so a pane page is visible
//! before the pane blocks on its "more" prompt.

use super::{EventStream, RenderStream, TerminalSize};
use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{event, execute, Command};
use std::io::{self, Write};
use std::time::Duration;

/// Key and resize events from the controlling terminal
#[derive(Default)]
pub struct TerminalEventStream;

impl TerminalEventStream {
    pub fn new() -> Self {
        Self
    }
}

impl EventStream for TerminalEventStream {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        Ok(event::poll(timeout)?)
    }

    fn read(&mut self) -> Result<event::Event> {
        Ok(event::read()?)
    }
}

/// Viewport backed by any writer; stdout in the binary
pub struct TerminalRenderStream<W: Write> {
    writer: W,
}

impl TerminalRenderStream<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderStream<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderStream<W> {
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    fn run(&mut self, command: impl Command) -> Result<()> {
        execute!(self.writer, command)?;
        Ok(())
    }
}

impl<W: Write> Write for TerminalRenderStream<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<W: Write> RenderStream for TerminalRenderStream<W> {
    fn clear_screen(&mut self) -> Result<()> {
        self.run(Clear(ClearType::All))
    }

    fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        self.run(MoveTo(x, y))
    }

    fn hide_cursor(&mut self) -> Result<()> {
        self.run(Hide)
    }

    fn show_cursor(&mut self) -> Result<()> {
        self.run(Show)
    }

    fn get_size(&self) -> Result<TerminalSize> {
        Ok(terminal::size()?)
    }

    fn enter_alternate_screen(&mut self) -> Result<()> {
        self.run(EnterAlternateScreen)
    }

    fn leave_alternate_screen(&mut self) -> Result<()> {
        self.run(LeaveAlternateScreen)
    }

    fn enable_raw_mode(&mut self) -> Result<()> {
        Ok(terminal::enable_raw_mode()?)
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        Ok(terminal::disable_raw_mode()?)
    }
}
