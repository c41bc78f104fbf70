//! # Terminal Interface
//!
//! A keyboard-driven menu whose routines write into a paged output pane.
//!
//! ```text
//! ┌──────────────┐  Enter   ┌──────────────┐  Write   ┌──────────────┐
//! │ AppController│─────────▶│   routine    │─────────▶│  OutputPane  │
//! │  (menu loop) │          │ (demo, ...)  │          │ (wrap, page) │
//! └──────────────┘          └──────────────┘          └──────────────┘
//!        │                                                   │
//!        └──────────── EventStream / RenderStream ◀──────────┘
//! ```

pub mod controllers;
pub mod io;
pub mod views;

pub use controllers::AppController;
pub use io::{EventStream, RenderStream};
pub use views::{Menu, MenuAction, OutputPane};
