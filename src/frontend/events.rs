//! Frontend-agnostic input events.
//!
//! The terminal frontend translates crossterm events into this enum so the
//! event loop only has one event shape to dispatch.

use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};

#[derive(Debug, Clone, PartialEq)]
pub enum FrontendEvent {
    /// Keyboard input
    Key {
        code: KeyCode,
        modifiers: KeyModifiers,
    },
    /// Mouse input at a terminal cell
    Mouse {
        kind: MouseEventKind,
        x: u16,
        y: u16,
    },
    /// Terminal resize, in columns and rows
    Resize { width: u16, height: u16 },
}

impl FrontendEvent {
    pub fn key(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self::Key { code, modifiers }
    }

    pub fn mouse(kind: MouseEventKind, x: u16, y: u16) -> Self {
        Self::Mouse { kind, x, y }
    }

    pub fn resize(width: u16, height: u16) -> Self {
        Self::Resize { width, height }
    }

    /// Cell position of a left-button press, if this is one
    pub fn left_click(&self) -> Option<(u16, u16)> {
        match self {
            Self::Mouse {
                kind: MouseEventKind::Down(MouseButton::Left),
                x,
                y,
            } => Some((*x, *y)),
            _ => None,
        }
    }
}
