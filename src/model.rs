use serde::{Deserialize, Serialize};
use std::fmt;

// ────────────────────────────────────────────────────────────────────────────
// Identity and coordinates
// ────────────────────────────────────────────────────────────────────────────

/// Identity of a block. Assigned sequentially from 1 and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u64);

impl BlockId {
    /// The first block ever created. It has no parent and cannot be removed.
    pub const ROOT: BlockId = BlockId(1);

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BlockId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Pixel coordinates relative to the viewport origin (top-left, y grows down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Size of the host's visible area. Queried on every `add_block`, never stored
/// by the tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout constants
// ────────────────────────────────────────────────────────────────────────────

/// Fixed geometry shared by every block and connector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Block footprint width in pixels.
    pub block_width: f32,
    /// Block footprint height in pixels.
    pub block_height: f32,
    /// Space kept free at the right and bottom edges when placing a new block.
    pub placement_margin: f32,
    /// Distance the connector elbow sits below the lower of its two blocks.
    pub connector_clearance: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            block_width: 100.0,
            block_height: 100.0,
            placement_margin: 200.0,
            connector_clearance: 130.0,
        }
    }
}

impl Layout {
    /// Offset from a block's top-left corner to its connector anchor (footprint centre).
    pub fn anchor_offset(&self) -> Point {
        Point::new(self.block_width / 2.0, self.block_height / 2.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Outbound data
// ────────────────────────────────────────────────────────────────────────────

/// Line drawn from a block's parent down to the block.
///
/// `path` is the orthogonal route: parent anchor, elbow under the parent,
/// elbow above/below the child, child anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub from: Point,
    pub to: Point,
    pub path: [Point; 4],
}

impl Connector {
    /// SVG path data (`M`, `V`, `H`, `V`) for hosts that draw with SVG.
    pub fn svg_path(&self) -> String {
        let [start, down, across, end] = self.path;
        format!(
            "M{},{} V{} H{} V{}",
            start.x, start.y, down.y, across.x, end.y
        )
    }
}

/// One live block as seen by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockView {
    pub id: BlockId,
    pub x: f32,
    pub y: f32,
    /// Whether the renderer should offer a remove action.
    pub removable: bool,
}

/// Connector of one block, flattened for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectorView {
    pub block: BlockId,
    pub parent: BlockId,
    pub from_x: f32,
    pub from_y: f32,
    pub to_x: f32,
    pub to_y: f32,
    #[serde(skip)]
    pub path: [Point; 4],
}

/// Everything the renderer needs after a mutation, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub blocks: Vec<BlockView>,
    pub connectors: Vec<ConnectorView>,
}

impl Scene {
    pub fn block(&self, id: BlockId) -> Option<&BlockView> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn connector(&self, id: BlockId) -> Option<&ConnectorView> {
        self.connectors.iter().find(|c| c.block == id)
    }
}
