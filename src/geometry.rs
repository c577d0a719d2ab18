//! Connector geometry.
//!
//! Connectors are never stored. Every call derives the route from the two
//! current block positions, so a moved endpoint can never leave stale geometry
//! behind.

use crate::model::{Connector, Layout, Point};

/// Anchor point of a block whose top-left corner is at `pos`.
pub fn anchor(pos: Point, layout: &Layout) -> Point {
    pos + layout.anchor_offset()
}

/// Y coordinate of the horizontal connector segment: below the lower block
/// (larger top-left y) by the configured clearance.
pub fn elbow_y(parent: Point, child: Point, layout: &Layout) -> f32 {
    parent.y.max(child.y) + layout.connector_clearance
}

/// Orthogonal route from the parent's anchor to the child's anchor.
///
/// Vertical from the parent down to the elbow, horizontal to the child's
/// anchor column, then vertical to the child's anchor.
pub fn route_connector(parent: Point, child: Point, layout: &Layout) -> Connector {
    let from = anchor(parent, layout);
    let to = anchor(child, layout);
    let y = elbow_y(parent, child, layout);
    Connector {
        from,
        to,
        path: [from, Point::new(from.x, y), Point::new(to.x, y), to],
    }
}
