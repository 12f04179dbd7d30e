//! Terminal front end: editor, output, toolbox and variable panes.

pub mod app;
pub mod events;
pub mod handler;
pub mod ui;

pub use handler::run;
