//! # Application Controller
//!
//! Owns the terminal for the lifetime of the menu, maps key presses to menu
//! actions and hands the viewport to an [`OutputPane`] while a routine runs.

use crate::config::NotionProfile;
use crate::demo;
use crate::notion::NotionClient;
use crate::tui::io::{
    EventStream, RenderStream, TerminalEventStream, TerminalRenderStream,
};
use crate::tui::views::{render_menu, wait_for_key, Menu, MenuAction, OutputPane};
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use std::io::{self, Write};
use std::time::Duration;

const RETURN_PROMPT: &str = "Press any key to return to the menu.";

pub struct AppController<ES: EventStream, RS: RenderStream> {
    profile: NotionProfile,
    client: NotionClient,
    menu: Menu,
    event_stream: ES,
    render_stream: RS,
    should_quit: bool,
}

impl AppController<TerminalEventStream, TerminalRenderStream<io::Stdout>> {
    /// Controller bound to the process terminal
    pub fn new(profile: NotionProfile, client: NotionClient) -> Self {
        Self::with_io_streams(
            profile,
            client,
            TerminalEventStream::new(),
            TerminalRenderStream::new(),
        )
    }
}

impl<ES: EventStream, RS: RenderStream> AppController<ES, RS> {
    /// Create a controller with injected I/O streams
    pub fn with_io_streams(
        profile: NotionProfile,
        client: NotionClient,
        event_stream: ES,
        render_stream: RS,
    ) -> Self {
        Self {
            profile,
            client,
            menu: Menu::new(),
            event_stream,
            render_stream,
            should_quit: false,
        }
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn render_stream(&self) -> &RS {
        &self.render_stream
    }

    pub fn event_stream(&self) -> &ES {
        &self.event_stream
    }

    /// Run the menu until Exit is chosen.
    ///
    /// The terminal is restored even when the loop fails.
    pub async fn run(&mut self) -> Result<()> {
        self.initialize()?;
        let result = self.event_loop().await;
        let cleanup = self.cleanup();
        result.and(cleanup)
    }

    fn initialize(&mut self) -> Result<()> {
        self.render_stream.enable_raw_mode()?;
        self.render_stream.enter_alternate_screen()?;
        self.render_stream.hide_cursor()?;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        self.render_stream.show_cursor()?;
        self.render_stream.leave_alternate_screen()?;
        self.render_stream.disable_raw_mode()?;
        Ok(())
    }

    async fn event_loop(&mut self) -> Result<()> {
        render_menu(&mut self.render_stream, &self.menu)?;

        while !self.should_quit {
            if !self.event_stream.poll(Duration::from_millis(100))? {
                continue;
            }
            match self.event_stream.read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    tracing::debug!("Received key event: {:?}", key);
                    self.handle_key(key).await?;
                    if !self.should_quit {
                        render_menu(&mut self.render_stream, &self.menu)?;
                    }
                }
                Event::Resize(width, height) => {
                    tracing::debug!("Terminal resized to {}x{}", width, height);
                    render_menu(&mut self.render_stream, &self.menu)?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.menu.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.menu.move_down(),
            KeyCode::Enter => self.activate(self.menu.selected()).await?,
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
        Ok(())
    }

    async fn activate(&mut self, action: MenuAction) -> Result<()> {
        tracing::info!("Menu action selected: {}", action.label());
        match action {
            MenuAction::RunTest => self.run_test().await,
            MenuAction::CheckEmail | MenuAction::GetNewJobs | MenuAction::FillJobInfo => {
                self.show_not_implemented()
            }
            MenuAction::Exit => {
                self.should_quit = true;
                Ok(())
            }
        }
    }

    /// Run the demonstration routine with its output in the pane
    async fn run_test(&mut self) -> Result<()> {
        self.render_stream.clear_screen()?;
        {
            let mut pane = OutputPane::new(&mut self.render_stream, &mut self.event_stream);
            writeln!(pane, "Running test function...\n")?;
            demo::run_demo(
                &self.client,
                &self.profile.database_id,
                &self.profile.schema_path,
                &mut pane,
            )
            .await?;
            writeln!(pane, "\n{RETURN_PROMPT}")?;
        }
        wait_for_key(&mut self.event_stream)
    }

    fn show_not_implemented(&mut self) -> Result<()> {
        self.render_stream.clear_screen()?;
        {
            let mut pane = OutputPane::new(&mut self.render_stream, &mut self.event_stream);
            writeln!(pane, "This option is not implemented yet.\n\n{RETURN_PROMPT}")?;
        }
        wait_for_key(&mut self.event_stream)
    }
}
