//! Breakpoint-aware style values for the nine-box layout.
//!
//! [`Responsive<T>`] pairs a desktop value with a mobile override. Every variant
//! the composer needs lives in [`LayoutStyles`], built once when the layout is
//! mounted and resolved against the is-mobile flag on each render.

use serde::{Deserialize, Serialize};

/// Flex direction of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlexDirection {
    Row,
    Column,
    ColumnReverse,
}

impl FlexDirection {
    pub fn is_vertical(self) -> bool {
        !matches!(self, Self::Row)
    }

    pub fn is_reversed(self) -> bool {
        matches!(self, Self::ColumnReverse)
    }
}

/// A value with an optional mobile override
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Responsive<T> {
    desktop: T,
    mobile: Option<T>,
}

impl<T: Copy> Responsive<T> {
    /// Same value on both sides of the breakpoint
    pub fn fixed(value: T) -> Self {
        Self {
            desktop: value,
            mobile: None,
        }
    }

    /// Override the value below the breakpoint
    #[must_use]
    pub fn on_mobile(mut self, value: T) -> Self {
        self.mobile = Some(value);
        self
    }

    pub fn resolve(&self, is_mobile: bool) -> T {
        if is_mobile {
            self.mobile.unwrap_or(self.desktop)
        } else {
            self.desktop
        }
    }
}

/// Flex container defaults
pub const DEFAULT_GAP_REM: f32 = 1.5;
pub const DEFAULT_GROW: f32 = 1.0;
pub const AMPLIFIED_GROW: f32 = 1.5;
pub const PANE_MARGIN_REM: f32 = 0.5;

/// Style variants for every part of the layout
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutStyles {
    pub root_gap: f32,
    pub gap: f32,
    pub pane_margin: f32,

    pub top_pane_direction: Responsive<FlexDirection>,
    pub top_pane_grow: Responsive<f32>,

    /// Vertical group holding box 2 and the {3, 4} pair
    pub top_group_direction: Responsive<FlexDirection>,
    pub top_group_grow: Responsive<f32>,

    pub bottom_pane_direction: Responsive<FlexDirection>,

    /// Extra container around {5, 6}, 7, {8, 9} on desktop
    pub amplified_grow: f32,

    /// Grow of box 6 and box 8
    pub emphasized_box_grow: Responsive<f32>,
    pub box_grow: f32,
}

impl LayoutStyles {
    pub fn new() -> Self {
        Self {
            root_gap: 0.0,
            gap: DEFAULT_GAP_REM,
            pane_margin: PANE_MARGIN_REM,

            top_pane_direction: Responsive::fixed(FlexDirection::Row)
                .on_mobile(FlexDirection::Column),
            top_pane_grow: Responsive::fixed(AMPLIFIED_GROW).on_mobile(DEFAULT_GROW),

            top_group_direction: Responsive::fixed(FlexDirection::Column)
                .on_mobile(FlexDirection::ColumnReverse),
            top_group_grow: Responsive::fixed(AMPLIFIED_GROW).on_mobile(DEFAULT_GROW),

            bottom_pane_direction: Responsive::fixed(FlexDirection::Row)
                .on_mobile(FlexDirection::Column),

            amplified_grow: AMPLIFIED_GROW,

            emphasized_box_grow: Responsive::fixed(AMPLIFIED_GROW).on_mobile(DEFAULT_GROW),
            box_grow: DEFAULT_GROW,
        }
    }
}

impl Default for LayoutStyles {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_responsive_resolution() {
        let value = Responsive::fixed(1.5).on_mobile(1.0);
        assert_eq!(value.resolve(false), 1.5);
        assert_eq!(value.resolve(true), 1.0);

        let fixed = Responsive::fixed(FlexDirection::Row);
        assert_eq!(fixed.resolve(true), FlexDirection::Row);
    }

    #[test]
    fn test_mobile_overrides() {
        let styles = LayoutStyles::new();
        assert_eq!(styles.top_pane_direction.resolve(true), FlexDirection::Column);
        assert_eq!(
            styles.top_group_direction.resolve(true),
            FlexDirection::ColumnReverse
        );
        assert_eq!(styles.top_group_grow.resolve(false), 1.5);
        assert_eq!(styles.top_group_grow.resolve(true), 1.0);
        assert_eq!(styles.bottom_pane_direction.resolve(false), FlexDirection::Row);
    }
}
