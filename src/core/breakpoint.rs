//! Breakpoint monitor
//!
//! Tracks whether the viewport currently satisfies the mobile media query. The
//! listener registered on the viewport is removed when the monitor is detached or
//! dropped, whichever comes first.

use crate::core::viewport::{ListenerId, MediaQuery, ViewportQuery};
use std::cell::Cell;
use std::rc::Rc;

/// Default mobile breakpoint: mobile <= 600px < desktop
pub const DEFAULT_BREAKPOINT: &str = "(max-width: 600px)";

pub struct BreakpointMonitor {
    viewport: Rc<dyn ViewportQuery>,
    query: MediaQuery,
    is_mobile: Rc<Cell<bool>>,
    listener: Option<ListenerId>,
}

impl BreakpointMonitor {
    /// Evaluate the query synchronously and start following change events
    pub fn attach(viewport: Rc<dyn ViewportQuery>, query: MediaQuery) -> Self {
        let is_mobile = Rc::new(Cell::new(viewport.matches(&query)));

        let state = is_mobile.clone();
        let listener = viewport.subscribe(query, Box::new(move |event| state.set(event.matches)));

        tracing::debug!(%query, is_mobile = is_mobile.get(), "Breakpoint monitor attached");

        Self {
            viewport,
            query,
            is_mobile,
            listener: Some(listener),
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.is_mobile.get()
    }

    pub fn query(&self) -> MediaQuery {
        self.query
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    /// Deregister the viewport listener. Later calls are no-ops.
    pub fn detach(&mut self) {
        if let Some(id) = self.listener.take() {
            let removed = self.viewport.unsubscribe(id);
            tracing::debug!(query = %self.query, removed, "Breakpoint monitor detached");
        }
    }
}

impl Drop for BreakpointMonitor {
    fn drop(&mut self) {
        self.detach();
    }
}
