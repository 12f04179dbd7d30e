//! Glide: a terminal Python playground.
//!
//! Code typed into the [`editor`] is executed by an embedded interpreter
//! (see [`execution`]) on a worker task driven by the [`controller`]. Output,
//! status and the variable snapshot flow back to the UI through the
//! [`page::Page`] trait, and the [`tui`] renders everything with ratatui.
//!
//! ```text
//! keys → handlers::Command → controller (worker) → Interpreter → Page → App → UI
//! ```

pub mod cli;
pub mod config;
pub mod controller;
pub mod editor;
pub mod execution;
pub mod handlers;
pub mod page;
pub mod process;
pub mod storage;
pub mod toolbox;
pub mod tui;
pub mod utils;
