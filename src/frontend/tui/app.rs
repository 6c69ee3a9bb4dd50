use crate::config::RenderConfig;
use crate::core::AppCore;
use crate::frontend::tui::color_box::ColorBox;
use crate::frontend::tui::grid::{self, BoxRegion, CellScale};
use crate::frontend::{Frontend, FrontendEvent};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// Most terminal events read between two frames
const MAX_EVENTS_PER_FRAME: usize = 64;

/// TUI Frontend using ratatui
///
/// Remembers where every box was drawn in the last frame so mouse clicks can be
/// mapped back to box numbers.
pub struct TuiFrontend {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    poll_timeout: Duration,
    scale: CellScale,
    show_labels: bool,
    regions: Vec<BoxRegion>,
    restored: bool,
}

impl TuiFrontend {
    /// Create a new TUI frontend
    ///
    /// Initializes terminal in raw mode, enables mouse capture, and enters alternate screen.
    pub fn new(render: &RenderConfig) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor()?;

        Ok(Self {
            terminal,
            poll_timeout: Duration::from_millis(render.poll_interval_ms.max(1)),
            scale: CellScale::from_config(render),
            show_labels: render.show_labels,
            regions: Vec::new(),
            restored: false,
        })
    }

    /// Convert crossterm event to FrontendEvent
    fn convert_event(event: Event) -> Option<FrontendEvent> {
        match event {
            Event::Key(key_event) => {
                // Only key presses; repeats and releases are ignored
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                Some(FrontendEvent::key(key_event.code, key_event.modifiers))
            }
            Event::Mouse(mouse_event) => Some(FrontendEvent::mouse(
                mouse_event.kind,
                mouse_event.column,
                mouse_event.row,
            )),
            Event::Resize(w, h) => Some(FrontendEvent::resize(w, h)),
            _ => None,
        }
    }
}

/// Read from `next` until it has nothing ready or `limit` events were read
///
/// `next` gets `true` on the first call of a frame (the only call allowed to wait).
fn drain_events<F>(mut next: F, limit: usize) -> Result<Vec<FrontendEvent>>
where
    F: FnMut(bool) -> Result<Option<Event>>,
{
    let mut events = Vec::new();
    for read in 0..limit {
        let Some(ev) = next(read == 0)? else {
            break;
        };
        if let Some(frontend_event) = TuiFrontend::convert_event(ev) {
            events.push(frontend_event);
        }
    }
    Ok(events)
}

impl Frontend for TuiFrontend {
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>> {
        let frame_timeout = self.poll_timeout;

        // First poll waits up to the frame interval, the rest drain what is queued
        drain_events(
            |first| {
                let timeout = if first { frame_timeout } else { Duration::ZERO };
                if !event::poll(timeout)? {
                    return Ok(None);
                }
                let ev = event::read().context("Failed to read terminal event")?;
                Ok(Some(ev))
            },
            MAX_EVENTS_PER_FRAME,
        )
    }

    fn render(&mut self, core: &mut AppCore) -> Result<()> {
        let tree = core.layout();
        let scale = self.scale;
        let show_labels = self.show_labels;
        let mut regions = Vec::new();

        self.terminal.draw(|f| {
            regions = grid::resolve(tree, f.area(), scale);
            let buf = f.buffer_mut();
            for region in &regions {
                ColorBox::new(region.number, &region.color)
                    .show_label(show_labels)
                    .render(region.area, buf);
            }
        })?;

        tracing::trace!(boxes = regions.len(), "Frame drawn");
        self.regions = regions;
        Ok(())
    }

    fn box_at(&self, x: u16, y: u16) -> Option<u8> {
        grid::hit_test(&self.regions, x, y)
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        self.restored = true;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        let size = self.terminal.size().unwrap_or_default();
        (size.width, size.height)
    }
}

impl Drop for TuiFrontend {
    fn drop(&mut self) {
        // Ensure terminal is restored even if cleanup() wasn't called
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

    fn mouse_move(column: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row: 0,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_drain_stops_at_frame_limit() {
        let mut reads = 0u16;
        let events = drain_events(
            |_| {
                reads += 1;
                Ok(Some(mouse_move(reads)))
            },
            MAX_EVENTS_PER_FRAME,
        )
        .unwrap();

        assert_eq!(events.len(), MAX_EVENTS_PER_FRAME);
        assert_eq!(usize::from(reads), MAX_EVENTS_PER_FRAME);
    }

    #[test]
    fn test_drain_stops_when_queue_is_empty() {
        let mut queue = vec![
            Event::Resize(80, 24),
            Event::Key(KeyEvent::new_with_kind(
                KeyCode::Char('s'),
                KeyModifiers::NONE,
                KeyEventKind::Release,
            )),
            Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
        ]
        .into_iter();
        let mut waits = Vec::new();

        let events = drain_events(
            |first| {
                waits.push(first);
                Ok(queue.next())
            },
            MAX_EVENTS_PER_FRAME,
        )
        .unwrap();

        assert_eq!(
            events,
            vec![
                FrontendEvent::resize(80, 24),
                FrontendEvent::key(KeyCode::Char('q'), KeyModifiers::NONE),
            ]
        );
        assert_eq!(waits, vec![true, false, false, false]);
    }
}
