//! # Jobline - Job Application Tracker
//!
//! Tracks job applications in a Notion database from the terminal.
//!
//! ```text
//! ┌─────────────┐   key events   ┌──────────────┐   HTTP    ┌──────────────┐
//! │  Terminal   │───────────────▶│ AppController│──────────▶│ NotionClient │
//! │             │◀───────────────│   + demo     │◀──────────│              │
//! └─────────────┘   OutputPane   └──────────────┘   rows,   └──────────────┘
//!                                                   schema
//! ```
//!
//! The [`notion`] module has no dependency on the terminal side and can be
//! used on its own.

pub mod cmd_args;
pub mod config;
pub mod demo;
pub mod notion;
pub mod tui;

pub use notion::{NotionClient, NotionError};
pub use tui::AppController;
