//! Layout tree → terminal rectangles.
//!
//! Each container becomes a ratatui `Layout` split. Grow factors turn into
//! `Constraint::Fill` weights, and gaps and margins are converted from rem to
//! cells with a per-axis scale.

use crate::config::RenderConfig;
use crate::core::layout::Node;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Position, Rect};

/// rem → cell conversion, per axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellScale {
    pub x: f32,
    pub y: f32,
}

impl CellScale {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_config(render: &RenderConfig) -> Self {
        Self::new(render.cells_per_rem_x, render.cells_per_rem_y)
    }

    fn cells(rem: f32, per_rem: f32) -> u16 {
        (rem * per_rem).round().clamp(0.0, f32::from(u16::MAX)) as u16
    }

    pub fn x_cells(&self, rem: f32) -> u16 {
        Self::cells(rem, self.x)
    }

    pub fn y_cells(&self, rem: f32) -> u16 {
        Self::cells(rem, self.y)
    }
}

impl Default for CellScale {
    fn default() -> Self {
        Self::new(2.0, 0.5)
    }
}

/// Where a box landed on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxRegion {
    pub number: u8,
    pub color: String,
    pub area: Rect,
}

/// Fill weight for a grow factor (1 → 2, 1.5 → 3)
fn fill_weight(grow: f32) -> u16 {
    ((grow * 2.0).round() as u16).max(1)
}

/// Resolve every box in `node` to a rectangle inside `area`.
///
/// Boxes that end up with zero width or height are left out.
pub fn resolve(node: &Node, area: Rect, scale: CellScale) -> Vec<BoxRegion> {
    let mut regions = Vec::with_capacity(9);
    resolve_into(node, area, scale, &mut regions);
    regions
}

fn resolve_into(node: &Node, area: Rect, scale: CellScale, out: &mut Vec<BoxRegion>) {
    match node {
        Node::Leaf(leaf) => {
            if !area.is_empty() {
                out.push(BoxRegion {
                    number: leaf.number,
                    color: leaf.color.clone(),
                    area,
                });
            }
        }
        Node::Container(container) => {
            let inner = area.inner(Margin::new(
                scale.x_cells(container.margin),
                scale.y_cells(container.margin),
            ));

            let (direction, spacing) = if container.direction.is_vertical() {
                (Direction::Vertical, scale.y_cells(container.gap))
            } else {
                (Direction::Horizontal, scale.x_cells(container.gap))
            };

            // column-reverse: last child on top
            let ordered: Vec<&Node> = if container.direction.is_reversed() {
                container.children.iter().rev().collect()
            } else {
                container.children.iter().collect()
            };

            let chunks = Layout::default()
                .direction(direction)
                .spacing(spacing)
                .constraints(ordered.iter().map(|child| Constraint::Fill(fill_weight(child.grow()))))
                .split(inner);

            for (child, slot) in ordered.into_iter().zip(chunks.iter()) {
                resolve_into(child, *slot, scale, out);
            }
        }
    }
}

/// Box under a terminal cell
pub fn hit_test(regions: &[BoxRegion], x: u16, y: u16) -> Option<u8> {
    let position = Position::new(x, y);
    regions
        .iter()
        .find(|region| region.area.contains(position))
        .map(|region| region.number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::compose;
    use crate::core::palette::Palette;
    use crate::core::styles::LayoutStyles;

    fn regions(is_mobile: bool, width: u16, height: u16) -> Vec<BoxRegion> {
        let tree = compose(is_mobile, &Palette::default(), &LayoutStyles::new());
        resolve(&tree, Rect::new(0, 0, width, height), CellScale::default())
    }

    fn area_of(regions: &[BoxRegion], number: u8) -> Rect {
        regions
            .iter()
            .find(|r| r.number == number)
            .map(|r| r.area)
            .unwrap_or_else(|| panic!("box {} not resolved", number))
    }

    fn overlaps(a: Rect, b: Rect) -> bool {
        !a.intersection(b).is_empty()
    }

    #[test]
    fn test_cell_scale() {
        let scale = CellScale::default();
        assert_eq!(scale.x_cells(0.5), 1);
        assert_eq!(scale.y_cells(0.5), 0);
        assert_eq!(scale.x_cells(1.5), 3);
        assert_eq!(scale.y_cells(1.5), 1);
        assert_eq!(scale.x_cells(0.0), 0);
    }

    #[test]
    fn test_fill_weight() {
        assert_eq!(fill_weight(1.0), 2);
        assert_eq!(fill_weight(1.5), 3);
        assert_eq!(fill_weight(0.0), 1);
    }

    #[test]
    fn test_all_boxes_resolved_without_overlap() {
        for (is_mobile, width, height) in [(false, 160, 50), (true, 60, 80)] {
            let regions = regions(is_mobile, width, height);
            assert_eq!(regions.len(), 9, "is_mobile={}", is_mobile);

            for (i, a) in regions.iter().enumerate() {
                for b in &regions[i + 1..] {
                    assert!(
                        !overlaps(a.area, b.area),
                        "boxes {} and {} overlap",
                        a.number,
                        b.number
                    );
                }
            }
        }
    }

    #[test]
    fn test_desktop_box_seven_between_pairs() {
        let regions = regions(false, 160, 50);
        let five = area_of(&regions, 5);
        let seven = area_of(&regions, 7);
        let eight = area_of(&regions, 8);
        assert!(five.right() <= seven.left());
        assert!(seven.right() <= eight.left());
        // 7 spans the full height of the bottom row
        assert!(seven.height > five.height);
    }

    #[test]
    fn test_mobile_box_seven_leads_bottom_pane() {
        let regions = regions(true, 60, 80);
        let seven = area_of(&regions, 7);
        for number in [5, 6, 8, 9] {
            assert!(seven.bottom() <= area_of(&regions, number).top());
        }
        // top pane stacks 1 above the group
        assert!(area_of(&regions, 1).bottom() <= area_of(&regions, 2).top());
    }

    #[test]
    fn test_mobile_top_group_is_reversed() {
        let regions = regions(true, 60, 80);
        let two = area_of(&regions, 2);
        let three = area_of(&regions, 3);
        assert!(three.bottom() <= two.top(), "box 2 should sit below the 3/4 pair");
    }

    #[test]
    fn test_desktop_top_group_order() {
        let regions = regions(false, 160, 50);
        let two = area_of(&regions, 2);
        let three = area_of(&regions, 3);
        let four = area_of(&regions, 4);
        assert!(two.bottom() <= three.top());
        assert!(three.right() <= four.left());
        assert!(area_of(&regions, 1).right() <= two.left());
    }

    #[test]
    fn test_hit_test() {
        let regions = regions(false, 160, 50);
        let six = area_of(&regions, 6);
        assert_eq!(hit_test(&regions, six.x, six.y), Some(6));
        assert_eq!(
            hit_test(&regions, six.right() - 1, six.bottom() - 1),
            Some(6)
        );
        // pane margin cell at the origin belongs to no box
        assert_eq!(hit_test(&regions, 0, 0), None);
    }

    #[test]
    fn test_tiny_area_drops_empty_boxes() {
        let regions = regions(false, 4, 2);
        assert!(regions.iter().all(|r| !r.area.is_empty()));
        assert!(regions.len() < 9);
    }
}
