//! Layout composer
//!
//! Turns the is-mobile flag and the current palette into a declarative node tree.
//! The tree says which containers exist, how they flow and grow, and which color
//! each numbered box shows; the frontend decides how that maps to screen cells.
//!
//! Box 7 is the only box that moves between arrangements. On mobile it leads the
//! bottom pane on its own; on desktop it sits between the {5, 6} and {8, 9} pairs
//! inside the amplified wrapper. Either way it appears exactly once.

use crate::core::palette::Palette;
use crate::core::styles::{FlexDirection, LayoutStyles};
use crate::core::wrapper::{conditional_wrap, Group};
use serde::Serialize;
use std::fmt::Write as _;

/// What a container is for (used by the renderer and for inspection)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerRole {
    Root,
    TopPane,
    TopGroup,
    BottomPane,
    Amplified,
    Pair,
}

/// Flex container
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub role: ContainerRole,
    pub direction: FlexDirection,
    pub grow: f32,
    /// Gap between children, in rem
    pub gap: f32,
    /// Outer margin, in rem
    pub margin: f32,
    pub children: Vec<Node>,
}

impl Container {
    pub fn new(role: ContainerRole, direction: FlexDirection, children: Vec<Node>) -> Self {
        Self {
            role,
            direction,
            grow: crate::core::styles::DEFAULT_GROW,
            gap: crate::core::styles::DEFAULT_GAP_REM,
            margin: 0.0,
            children,
        }
    }

    #[must_use]
    pub fn grow(mut self, grow: f32) -> Self {
        self.grow = grow;
        self
    }

    #[must_use]
    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    #[must_use]
    pub fn margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }
}

/// A numbered, colored box. Clicking any box reshuffles the palette.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxLeaf {
    pub number: u8,
    pub color: String,
    pub grow: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Container(Container),
    Leaf(BoxLeaf),
}

impl Node {
    pub fn grow(&self) -> f32 {
        match self {
            Node::Container(c) => c.grow,
            Node::Leaf(b) => b.grow,
        }
    }

    /// All boxes in document order
    #[cfg(test)]
    pub fn boxes(&self) -> Vec<&BoxLeaf> {
        let mut out = Vec::new();
        self.collect_boxes(&mut out);
        out
    }

    #[cfg(test)]
    fn collect_boxes<'a>(&'a self, out: &mut Vec<&'a BoxLeaf>) {
        match self {
            Node::Leaf(b) => out.push(b),
            Node::Container(c) => c.children.iter().for_each(|child| child.collect_boxes(out)),
        }
    }

    #[cfg(test)]
    pub fn find_box(&self, number: u8) -> Option<&BoxLeaf> {
        self.boxes().into_iter().find(|b| b.number == number)
    }

    /// Depth-first search for the first container with `role`
    #[cfg(test)]
    pub fn find_container(&self, role: ContainerRole) -> Option<&Container> {
        match self {
            Node::Leaf(_) => None,
            Node::Container(c) if c.role == role => Some(c),
            Node::Container(c) => c.children.iter().find_map(|child| child.find_container(role)),
        }
    }

    pub fn count_containers(&self, role: ContainerRole) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Container(c) => {
                let own = usize::from(c.role == role);
                own + c
                    .children
                    .iter()
                    .map(|child| child.count_containers(role))
                    .sum::<usize>()
            }
        }
    }

    /// Box numbers under this node, in document order
    #[cfg(test)]
    pub fn box_numbers(&self) -> Vec<u8> {
        self.boxes().iter().map(|b| b.number).collect()
    }

    /// Indented text outline, one node per line
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0);
        out
    }

    fn write_outline(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        match self {
            Node::Leaf(b) => {
                let _ = writeln!(out, "{}box {} {} grow={}", indent, b.number, b.color, b.grow);
            }
            Node::Container(c) => {
                let _ = writeln!(
                    out,
                    "{}{:?} {:?} grow={} gap={}rem margin={}rem",
                    indent, c.role, c.direction, c.grow, c.gap, c.margin
                );
                for child in &c.children {
                    child.write_outline(out, depth + 1);
                }
            }
        }
    }
}

/// `number` is 1..=9 and indexes the palette directly
fn value_box(number: u8, palette: &Palette, grow: f32) -> Node {
    Node::Leaf(BoxLeaf {
        number,
        color: palette.colors()[usize::from(number) - 1].clone(),
        grow,
    })
}

fn pair(direction: FlexDirection, children: Vec<Node>, gap: f32) -> Node {
    Node::Container(Container::new(ContainerRole::Pair, direction, children).gap(gap))
}

/// Build the full layout tree
pub fn compose(is_mobile: bool, palette: &Palette, styles: &LayoutStyles) -> Node {
    let emphasized = styles.emphasized_box_grow.resolve(is_mobile);
    let plain = styles.box_grow;

    let top_group = Container::new(
        ContainerRole::TopGroup,
        styles.top_group_direction.resolve(is_mobile),
        vec![
            value_box(2, palette, plain),
            pair(
                FlexDirection::Row,
                vec![value_box(3, palette, plain), value_box(4, palette, plain)],
                styles.gap,
            ),
        ],
    )
    .grow(styles.top_group_grow.resolve(is_mobile))
    .gap(styles.gap);

    let top_pane = Container::new(
        ContainerRole::TopPane,
        styles.top_pane_direction.resolve(is_mobile),
        vec![value_box(1, palette, plain), Node::Container(top_group)],
    )
    .grow(styles.top_pane_grow.resolve(is_mobile))
    .gap(styles.gap)
    .margin(styles.pane_margin);

    let mut bottom_children: Group = Vec::new();
    if is_mobile {
        bottom_children.push(value_box(7, palette, plain));
    }

    let mut grouped: Group = vec![pair(
        FlexDirection::Column,
        vec![value_box(5, palette, plain), value_box(6, palette, emphasized)],
        styles.gap,
    )];
    if !is_mobile {
        grouped.push(value_box(7, palette, plain));
    }
    grouped.push(pair(
        FlexDirection::Column,
        vec![value_box(8, palette, emphasized), value_box(9, palette, plain)],
        styles.gap,
    ));

    let amplified_grow = styles.amplified_grow;
    let gap = styles.gap;
    bottom_children.extend(conditional_wrap(
        !is_mobile,
        |children| {
            vec![Node::Container(
                Container::new(ContainerRole::Amplified, FlexDirection::Row, children)
                    .grow(amplified_grow)
                    .gap(gap),
            )]
        },
        grouped,
    ));

    let bottom_pane = Container::new(
        ContainerRole::BottomPane,
        styles.bottom_pane_direction.resolve(is_mobile),
        bottom_children,
    )
    .gap(styles.gap)
    .margin(styles.pane_margin);

    Node::Container(
        Container::new(
            ContainerRole::Root,
            FlexDirection::Column,
            vec![Node::Container(top_pane), Node::Container(bottom_pane)],
        )
        .gap(styles.root_gap),
    )
}
