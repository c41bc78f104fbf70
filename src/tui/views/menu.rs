//! # Main Menu
//!
//! Menu model and its centered rendering, with the selected entry drawn in
//! reverse colors.

use crate::tui::io::RenderStream;
use anyhow::Result;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};

/// Entries of the main menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    RunTest,
    CheckEmail,
    GetNewJobs,
    FillJobInfo,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 5] = [
        MenuAction::RunTest,
        MenuAction::CheckEmail,
        MenuAction::GetNewJobs,
        MenuAction::FillJobInfo,
        MenuAction::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::RunTest => "Run Test Function",
            MenuAction::CheckEmail => "Check Email",
            MenuAction::GetNewJobs => "Get New Jobs",
            MenuAction::FillJobInfo => "Fill Job Info",
            MenuAction::Exit => "Exit",
        }
    }
}

/// Selection state of the main menu
#[derive(Debug, Clone, Default)]
pub struct Menu {
    selected: usize,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> MenuAction {
        MenuAction::ALL[self.selected]
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < MenuAction::ALL.len() {
            self.selected += 1;
        }
    }
}

/// Draw the menu centered in the viewport
pub fn render_menu<RS: RenderStream>(render: &mut RS, menu: &Menu) -> Result<()> {
    render.clear_screen()?;
    let (width, height) = render.get_size()?;
    let count = MenuAction::ALL.len() as u16;
    let top = (height / 2).saturating_sub(count / 2);

    for (idx, action) in MenuAction::ALL.iter().enumerate() {
        let label = action.label();
        let x = (width / 2).saturating_sub(label.len() as u16 / 2);
        render.move_cursor(x, top + idx as u16)?;
        if idx == menu.selected_index() {
            queue!(
                render,
                SetForegroundColor(Color::Black),
                SetBackgroundColor(Color::White),
                Print(label),
                ResetColor
            )?;
        } else {
            render.write_all(label.as_bytes())?;
        }
    }

    render.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::io::{MockRenderStream, RenderCommand};

    #[test]
    fn menu_should_stay_within_bounds() {
        let mut menu = Menu::new();
        menu.move_up();
        assert_eq!(menu.selected(), MenuAction::RunTest);

        for _ in 0..10 {
            menu.move_down();
        }
        assert_eq!(menu.selected(), MenuAction::Exit);
        assert_eq!(menu.selected_index(), 4);

        menu.move_up();
        assert_eq!(menu.selected(), MenuAction::FillJobInfo);
    }

    #[test]
    fn render_menu_should_center_entries() {
        let mut render = MockRenderStream::with_size((80, 24));
        render_menu(&mut render, &Menu::new()).unwrap();

        // 24 / 2 - 5 / 2 = 10
        let label = MenuAction::CheckEmail.label();
        let x = 40 - label.len() as u16 / 2;
        assert!(render.has_command(&RenderCommand::MoveCursor(x, 11)));
        assert_eq!(render.get_commands()[0], RenderCommand::ClearScreen);
    }

    #[test]
    fn render_menu_should_highlight_selection() {
        let mut render = MockRenderStream::new();
        let mut menu = Menu::new();
        menu.move_down();
        render_menu(&mut render, &menu).unwrap();

        let rows = render.drawn_rows();
        let selected = &rows[1].1;
        assert!(selected.contains("Check Email"));
        assert!(selected.contains('\x1b'));
        assert_eq!(rows[0].1, "Run Test Function");
    }
}
