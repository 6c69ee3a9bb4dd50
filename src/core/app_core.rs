use crate::config::Config;
use crate::core::breakpoint::BreakpointMonitor;
use crate::core::layout::{compose, Node};
use crate::core::palette::{Palette, PaletteStore};
use crate::core::styles::LayoutStyles;
use crate::core::viewport::{MediaQuery, Viewport};
use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyModifiers};
use std::io;
use std::rc::Rc;

/// Last composed tree plus the inputs it was built from
struct ComposedLayout {
    is_mobile: bool,
    palette: Palette,
    tree: Node,
}

/// Core application state (frontend-agnostic)
///
/// Owns the viewport, the breakpoint monitor and the palette store, and hands the
/// frontend a composed layout tree. The tree is rebuilt only when the is-mobile
/// flag changes or the palette is replaced.
pub struct AppCore {
    /// Application configuration
    pub config: Config,

    /// Application running flag
    pub running: bool,

    /// Set whenever state changed since the last frame
    pub needs_render: bool,

    viewport: Rc<Viewport>,
    monitor: BreakpointMonitor,
    palette: PaletteStore,
    styles: LayoutStyles,
    composed: Option<ComposedLayout>,
}

impl AppCore {
    /// Mount against an existing viewport
    pub fn new(config: Config, viewport: Rc<Viewport>) -> Result<Self> {
        let query = MediaQuery::parse(&config.breakpoint.query)
            .context("Invalid breakpoint query in config")?;
        let seed = Palette::from_list(config.palette.colors.as_slice())
            .context("Invalid palette in config")?;

        let palette = match config.palette.seed {
            Some(rng_seed) => PaletteStore::seeded(seed, rng_seed),
            None => PaletteStore::from_entropy(seed),
        };

        let monitor = BreakpointMonitor::attach(viewport.clone(), query);
        tracing::info!(
            query = %query,
            width_px = viewport.width_px(),
            is_mobile = monitor.is_mobile(),
            "Layout mounted"
        );

        Ok(Self {
            config,
            running: true,
            needs_render: true,
            viewport,
            monitor,
            palette,
            styles: LayoutStyles::new(),
            composed: None,
        })
    }

    /// Mount against the current terminal size
    pub fn from_terminal(config: Config) -> Result<Self> {
        Self::from_size(config, crossterm::terminal::size())
    }

    /// Mount against a `(columns, rows)` size query result
    pub fn from_size(config: Config, size: io::Result<(u16, u16)>) -> Result<Self> {
        let viewport = Viewport::from_size(size, config.viewport.cell_width_px)
            .context("Cannot determine layout without a viewport")?;
        Self::new(config, Rc::new(viewport))
    }

    pub fn is_mobile(&self) -> bool {
        self.monitor.is_mobile()
    }

    pub fn palette(&self) -> Palette {
        self.palette.current()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Current layout tree, recomposed if its inputs changed
    pub fn layout(&mut self) -> &Node {
        let is_mobile = self.monitor.is_mobile();
        let palette = self.palette.current();

        let composed = match self.composed.take() {
            Some(c) if c.is_mobile == is_mobile && c.palette.same_identity(&palette) => c,
            _ => {
                tracing::debug!(is_mobile, "Recomposing layout");
                ComposedLayout {
                    tree: compose(is_mobile, &palette, &self.styles),
                    is_mobile,
                    palette,
                }
            }
        };

        &self.composed.insert(composed).tree
    }

    /// Terminal resized (columns/rows)
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let was_mobile = self.is_mobile();
        self.viewport.resize_columns(cols);
        if was_mobile != self.is_mobile() {
            tracing::info!(
                cols,
                rows,
                query = %self.monitor.query(),
                width_px = self.viewport.width_px(),
                is_mobile = self.is_mobile(),
                "Breakpoint crossed"
            );
        }
        self.needs_render = true;
    }

    /// Any box click reshuffles the whole palette
    pub fn click_box(&mut self, number: u8) -> Option<Palette> {
        if !(1..=9).contains(&number) {
            tracing::warn!(number, "Click on unknown box ignored");
            return None;
        }
        let palette = self.palette.shuffle();
        tracing::debug!(
            number,
            shuffles = self.palette.shuffle_count(),
            "Box clicked, palette shuffled"
        );
        self.needs_render = true;
        Some(palette)
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char('s') | KeyCode::Char(' ') => {
                self.palette.shuffle();
                self.needs_render = true;
            }
            KeyCode::Char('r') => {
                self.palette.reset();
                self.needs_render = true;
            }
            _ => {}
        }
    }

    pub fn quit(&mut self) {
        tracing::info!("Quit requested");
        self.running = false;
    }

    /// Unmount: stop following viewport changes
    pub fn shutdown(&mut self) {
        if self.monitor.is_attached() {
            self.monitor.detach();
            tracing::debug!(
                listeners = self.viewport.listener_count(),
                "Layout unmounted"
            );
        }
    }
}
