//! Conditional wrapping of node groups.

use crate::core::layout::Node;

/// An ordered group of sibling nodes
pub type Group = Vec<Node>;

/// Apply `wrap` to `children` when `condition` holds, otherwise hand them back untouched.
pub fn conditional_wrap<F>(condition: bool, wrap: F, children: Group) -> Group
where
    F: FnOnce(Group) -> Group,
{
    if condition {
        wrap(children)
    } else {
        children
    }
}
