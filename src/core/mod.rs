//! Core layout logic
//!
//! Breakpoint tracking, palette state and layout composition. Nothing in here
//! draws to the terminal; the frontend reads the composed tree and renders it.

pub mod app_core;
pub mod breakpoint;
pub mod error;
pub mod layout;
pub mod palette;
pub mod styles;
pub mod viewport;
pub mod wrapper;

pub use app_core::AppCore;
pub use viewport::Viewport;
