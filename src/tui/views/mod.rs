//! # Views
//!
//! Everything that draws: the main menu and the output pane.

pub mod menu;
pub mod output_pane;

pub use menu::{render_menu, Menu, MenuAction};
pub use output_pane::{wait_for_key, wrap_line, OutputPane, MORE_PROMPT};
