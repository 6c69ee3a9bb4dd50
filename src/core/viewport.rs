//! Viewport query facility
//!
//! Models the browser's `matchMedia`: a synchronous "does the query match right
//! now" check plus change subscriptions. The terminal-backed [`Viewport`] derives its
//! pixel width from the column count, so CSS-style breakpoints keep their meaning.

use crate::core::error::{LayoutError, LayoutResult};
use regex::Regex;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::io;
use std::sync::OnceLock;

/// Width feature a media query tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthFeature {
    MaxWidth(u32),
    MinWidth(u32),
}

/// A parsed `(max-width: Npx)` / `(min-width: Npx)` media query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaQuery {
    feature: WidthFeature,
}

fn query_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\(\s*(max|min)-width\s*:\s*(\d+)\s*px\s*\)$").expect("static regex")
    })
}

impl MediaQuery {
    pub fn max_width(px: u32) -> Self {
        Self {
            feature: WidthFeature::MaxWidth(px),
        }
    }

    pub fn min_width(px: u32) -> Self {
        Self {
            feature: WidthFeature::MinWidth(px),
        }
    }

    /// Parse a query string such as `"(max-width: 600px)"`
    pub fn parse(input: &str) -> LayoutResult<Self> {
        let trimmed = input.trim();
        let caps = query_regex()
            .captures(trimmed)
            .ok_or_else(|| LayoutError::InvalidQuery(input.to_string()))?;

        let px: u32 = caps[2]
            .parse()
            .map_err(|_| LayoutError::InvalidQuery(input.to_string()))?;

        Ok(match &caps[1] {
            "max" => Self::max_width(px),
            _ => Self::min_width(px),
        })
    }

    #[cfg(test)]
    pub fn feature(&self) -> WidthFeature {
        self.feature
    }

    /// Evaluate the query against a viewport width in pixels (bounds inclusive)
    pub fn evaluate(&self, width_px: u32) -> bool {
        match self.feature {
            WidthFeature::MaxWidth(max) => width_px <= max,
            WidthFeature::MinWidth(min) => width_px >= min,
        }
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.feature {
            WidthFeature::MaxWidth(px) => write!(f, "(max-width: {}px)", px),
            WidthFeature::MinWidth(px) => write!(f, "(min-width: {}px)", px),
        }
    }
}

/// Change notification delivered to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaQueryEvent {
    pub matches: bool,
    pub width_px: u32,
}

/// Handle returned by [`ViewportQuery::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type ChangeListener = Box<dyn FnMut(MediaQueryEvent)>;

/// Viewport-query facility consumed by the breakpoint monitor
pub trait ViewportQuery {
    /// Does `query` match the viewport right now?
    fn matches(&self, query: &MediaQuery) -> bool;

    /// Register a listener fired whenever `query` flips its match state
    fn subscribe(&self, query: MediaQuery, listener: ChangeListener) -> ListenerId;

    /// Remove a listener; returns false if it was not registered
    fn unsubscribe(&self, id: ListenerId) -> bool;
}

struct Subscription {
    id: ListenerId,
    query: MediaQuery,
    last_match: bool,
    listener: ChangeListener,
}

/// Viewport whose width is tracked in pixels
///
/// Listeners run synchronously inside [`Viewport::resize`] and must not call back
/// into the viewport.
pub struct Viewport {
    width_px: Cell<u32>,
    cell_width_px: u32,
    next_id: Cell<u64>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl Viewport {
    /// Viewport with an explicit pixel width
    pub fn with_width(width_px: u32, cell_width_px: u32) -> Self {
        Self {
            width_px: Cell::new(width_px),
            cell_width_px: cell_width_px.max(1),
            next_id: Cell::new(1),
            subscriptions: RefCell::new(Vec::new()),
        }
    }

    /// Viewport from a `(columns, rows)` size query; a failed query is fatal
    pub fn from_size(size: io::Result<(u16, u16)>, cell_width_px: u32) -> LayoutResult<Self> {
        let (cols, _rows) = size.map_err(|e| LayoutError::ViewportUnavailable(e.to_string()))?;
        let viewport = Self::with_width(0, cell_width_px);
        viewport.width_px.set(viewport.columns_to_px(cols));
        tracing::debug!(cols, width_px = viewport.width_px(), "Viewport sized from terminal");
        Ok(viewport)
    }

    pub fn width_px(&self) -> u32 {
        self.width_px.get()
    }

    pub fn columns_to_px(&self, cols: u16) -> u32 {
        u32::from(cols).saturating_mul(self.cell_width_px)
    }

    pub fn listener_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// Terminal resize in columns
    pub fn resize_columns(&self, cols: u16) {
        self.resize(self.columns_to_px(cols));
    }

    /// Update the width and notify listeners whose query changed match state
    pub fn resize(&self, width_px: u32) {
        self.width_px.set(width_px);

        let mut subscriptions = self.subscriptions.borrow_mut();
        for sub in subscriptions.iter_mut() {
            let matches = sub.query.evaluate(width_px);
            if matches != sub.last_match {
                sub.last_match = matches;
                tracing::debug!(query = %sub.query, matches, width_px, "Media query changed");
                (sub.listener)(MediaQueryEvent { matches, width_px });
            }
        }
    }
}

impl ViewportQuery for Viewport {
    fn matches(&self, query: &MediaQuery) -> bool {
        query.evaluate(self.width_px())
    }

    fn subscribe(&self, query: MediaQuery, listener: ChangeListener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.subscriptions.borrow_mut().push(Subscription {
            id,
            query,
            last_match: self.matches(&query),
            listener,
        });
        id
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|sub| sub.id != id);
        subscriptions.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_parse_max_width() {
        let query = MediaQuery::parse("(max-width: 600px)").unwrap();
        assert_eq!(query.feature(), WidthFeature::MaxWidth(600));
        assert_eq!(query.to_string(), "(max-width: 600px)");
    }

    #[test]
    fn test_parse_tolerates_spacing() {
        let query = MediaQuery::parse("  ( min-width:1024px )").unwrap();
        assert_eq!(query, MediaQuery::min_width(1024));
    }

    #[test]
    fn test_parse_rejects_other_features() {
        assert!(matches!(
            MediaQuery::parse("(orientation: portrait)"),
            Err(LayoutError::InvalidQuery(_))
        ));
        assert!(MediaQuery::parse("(max-width: 600em)").is_err());
        assert!(MediaQuery::parse("").is_err());
    }

    #[test]
    fn test_breakpoint_is_inclusive() {
        let query = MediaQuery::max_width(600);
        assert!(query.evaluate(600));
        assert!(query.evaluate(400));
        assert!(!query.evaluate(601));
    }

    #[test]
    fn test_listener_fires_only_on_flip() {
        let viewport = Viewport::with_width(1024, 8);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        viewport.subscribe(
            MediaQuery::max_width(600),
            Box::new(move |ev| sink.borrow_mut().push(ev.matches)),
        );

        viewport.resize(900); // still desktop
        viewport.resize(400);
        viewport.resize(500); // still mobile
        viewport.resize(800);

        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn test_unsubscribe_removes_listener_once() {
        let viewport = Viewport::with_width(1024, 8);
        let id = viewport.subscribe(MediaQuery::max_width(600), Box::new(|_| {}));
        assert_eq!(viewport.listener_count(), 1);
        assert!(viewport.unsubscribe(id));
        assert!(!viewport.unsubscribe(id));
        assert_eq!(viewport.listener_count(), 0);
    }

    #[test]
    fn test_columns_to_px() {
        let viewport = Viewport::with_width(0, 8);
        viewport.resize_columns(75);
        assert_eq!(viewport.width_px(), 600);
        assert!(viewport.matches(&MediaQuery::max_width(600)));
    }

    #[test]
    fn test_huge_cell_width_saturates() {
        let viewport = Viewport::with_width(1024, 100_000_000);
        viewport.resize_columns(80);
        assert_eq!(viewport.width_px(), u32::MAX);
        assert!(!viewport.matches(&MediaQuery::max_width(600)));
    }

    #[test]
    fn test_from_size() {
        let viewport = Viewport::from_size(Ok((120, 40)), 8).unwrap();
        assert_eq!(viewport.width_px(), 960);

        let mobile = Viewport::from_size(Ok((50, 40)), 8).unwrap();
        assert!(mobile.matches(&MediaQuery::max_width(600)));
    }

    #[test]
    fn test_failed_size_query_is_unavailable() {
        let err = Viewport::from_size(Err(io::Error::other("not a tty")), 8)
            .err()
            .unwrap();
        assert_eq!(err, LayoutError::ViewportUnavailable("not a tty".to_string()));
    }
}
