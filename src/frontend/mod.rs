//! Frontend abstraction layer
//!
//! The `Frontend` trait covers event polling, rendering and cleanup so the
//! event loop in `main` does not depend on a particular terminal backend.

pub mod events;
pub mod tui;

use crate::core::AppCore;
use anyhow::Result;
pub use events::FrontendEvent;
pub use tui::TuiFrontend;

pub trait Frontend {
    /// Drain pending input as `FrontendEvent`s (empty if nothing arrived)
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>>;

    /// Draw the current layout.
    ///
    /// Takes the core mutably because the layout tree is recomposed lazily.
    fn render(&mut self, core: &mut AppCore) -> Result<()>;

    /// Box drawn at a cell in the last frame
    fn box_at(&self, x: u16, y: u16) -> Option<u8>;

    /// Restore the terminal
    fn cleanup(&mut self) -> Result<()>;

    /// Current size in columns and rows
    fn size(&self) -> (u16, u16);
}
