//! TUI Frontend (ratatui-based)
//!
//! Resolves the layout tree into terminal rectangles and paints the boxes.
//! Terminal management and input go through crossterm.

pub mod app;
pub mod color_box;
pub mod grid;

pub use app::TuiFrontend;
