//! # Output Pane
//!
//! Renders a stream of text into the terminal viewport the way a console
//! would, except that the viewport has a fixed height: long lines are wrapped
//! at `width - 1` columns, and when the last row is reached the pane shows a
//! "more" prompt, waits for a key, clears the screen and starts again at the
//! top.
//!
//! The pane borrows the render and event streams for as long as a routine is
//! writing to it and implements [`Write`], so routines take an explicit
//! writer instead of printing to a process-wide stdout. Buffered text is
//! flushed when the pane is dropped.

use crate::tui::io::{EventStream, RenderStream};
use anyhow::Result;
use crossterm::event::{Event, KeyEventKind};
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

/// Prompt drawn on the last row when the viewport is full
pub const MORE_PROMPT: &str = " -- More (press any key) --";

pub struct OutputPane<'a, ES: EventStream, RS: RenderStream> {
    render: &'a mut RS,
    events: &'a mut ES,
    buffer: Vec<u8>,
    cursor: u16,
}

impl<'a, ES: EventStream, RS: RenderStream> OutputPane<'a, ES, RS> {
    /// Start drawing at the top row of the viewport
    pub fn new(render: &'a mut RS, events: &'a mut ES) -> Self {
        Self {
            render,
            events,
            buffer: Vec::new(),
            cursor: 0,
        }
    }

    /// Row the next chunk will be drawn on
    pub fn cursor(&self) -> u16 {
        self.cursor
    }

    /// Clear the viewport and start again at the top row
    pub fn clear(&mut self) -> Result<()> {
        self.render.clear_screen()?;
        self.cursor = 0;
        Ok(())
    }

    /// Draw every complete line in the buffer; a trailing partial line stays buffered.
    fn render_complete_lines(&mut self) -> Result<()> {
        let Some(last_newline) = self.buffer.iter().rposition(|b| *b == b'\n') else {
            return Ok(());
        };
        let rest = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);
        self.render_text(&String::from_utf8_lossy(&complete))
    }

    /// Draw everything in the buffer, including a trailing partial line.
    fn render_all(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.buffer);
        if pending.is_empty() {
            self.render.flush()?;
            return Ok(());
        }
        self.render_text(&String::from_utf8_lossy(&pending))
    }

    fn render_text(&mut self, text: &str) -> Result<()> {
        let (width, height) = self.render.get_size()?;
        let chunk_width = usize::from(width.saturating_sub(1)).max(1);
        let last_row = height.saturating_sub(1);

        let text = text.strip_suffix('\n').unwrap_or(text);
        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            for chunk in wrap_line(line, chunk_width) {
                if self.cursor >= last_row {
                    self.page_break(last_row)?;
                }
                self.draw_chunk(&chunk);
                self.cursor += 1;
            }
        }

        self.render.flush()?;
        Ok(())
    }

    /// Show the prompt, wait for a key, then clear.
    fn page_break(&mut self, prompt_row: u16) -> Result<()> {
        if let Err(e) = self.draw_at(prompt_row, MORE_PROMPT) {
            tracing::trace!("More prompt not drawn: {}", e);
        }
        self.render.flush()?;
        wait_for_key(&mut *self.events)?;
        self.clear()
    }

    /// Placement failures leave a gap in the output and nothing else.
    fn draw_chunk(&mut self, chunk: &str) {
        if let Err(e) = self.draw_at(self.cursor, chunk) {
            tracing::trace!("Dropped chunk on row {}: {}", self.cursor, e);
        }
    }

    fn draw_at(&mut self, row: u16, text: &str) -> Result<()> {
        self.render.move_cursor(0, row)?;
        self.render.write_all(text.as_bytes())?;
        Ok(())
    }
}

impl<ES: EventStream, RS: RenderStream> Write for OutputPane<'_, ES, RS> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        if buf.contains(&b'\n') {
            self.render_complete_lines().map_err(io::Error::other)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.render_all().map_err(io::Error::other)
    }
}

impl<ES: EventStream, RS: RenderStream> Drop for OutputPane<'_, ES, RS> {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        if let Err(e) = self.render_all() {
            tracing::debug!("Output pane not flushed on drop: {}", e);
        }
    }
}

/// Block until a key is pressed. Other events are ignored.
pub fn wait_for_key<ES: EventStream>(events: &mut ES) -> Result<()> {
    loop {
        if let Event::Key(key) = events.read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}

/// Split `line` into chunks at most `width` display columns wide.
///
/// An empty line yields one empty chunk so it still takes up a row. A
/// character wider than `width` gets a chunk of its own.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for ch in line.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > width && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(ch);
        current_width += ch_width;
    }

    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}
