//! The tree store.
//!
//! [`TreeStore`] owns every block's position and parent link. All mutation
//! goes through [`TreeStore::add_block`], [`TreeStore::remove_block`] and
//! [`TreeStore::update_position`]; renderers only read.
//!
//! Operations are total: unknown ids and invalid parents degrade to no-ops
//! and are reported through the return value, never as an error.
//!
//! # Example
//!
//! ```rust
//! use blocktree::model::{BlockId, Layout, Point, Viewport};
//! use blocktree::store::TreeStore;
//!
//! let mut store = TreeStore::with_seed(Layout::default(), 7);
//! let vp = Viewport::new(800.0, 600.0);
//! let root = store.add_block(None, vp);
//! let child = store.add_block(Some(root), vp);
//! assert_eq!(root, BlockId::ROOT);
//! assert!(store.connector(child).is_some());
//!
//! store.update_position(child, Point::new(10.0, 10.0));
//! assert_eq!(store.position(child), Some(Point::new(10.0, 10.0)));
//! ```

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::geometry::route_connector;
use crate::model::{BlockId, BlockView, Connector, ConnectorView, Layout, Point, Scene, Viewport};

/// Authoritative block positions and parent links.
///
/// `positions` keeps creation order, which is also the render order.
/// `parents` may hold dangling entries after the parent is removed.
#[derive(Debug, Clone)]
pub struct TreeStore {
    positions: IndexMap<BlockId, Point>,
    parents: IndexMap<BlockId, BlockId>,
    next_id: u64,
    layout: Layout,
    rng: StdRng,
}

impl TreeStore {
    /// Create an empty store with entropy-seeded placement.
    pub fn new(layout: Layout) -> Self {
        Self::with_rng(layout, StdRng::from_entropy())
    }

    /// Create an empty store whose initial placements are reproducible.
    pub fn with_seed(layout: Layout, seed: u64) -> Self {
        Self::with_rng(layout, StdRng::seed_from_u64(seed))
    }

    fn with_rng(layout: Layout, rng: StdRng) -> Self {
        Self {
            positions: IndexMap::new(),
            parents: IndexMap::new(),
            next_id: 1,
            layout,
            rng,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    // ── Mutation ────────────────────────────────────────────────────────────

    /// Create the permanent root if no block was ever allocated.
    ///
    /// Returns the root id either way.
    pub fn ensure_root(&mut self, viewport: Viewport) -> BlockId {
        if self.next_id == 1 {
            self.add_block(None, viewport)
        } else {
            BlockId::ROOT
        }
    }

    /// Allocate the next id, place it randomly inside `viewport` and link it
    /// to `parent` if that block is currently live.
    ///
    /// An unknown parent is ignored and the block is rendered without a
    /// connector.
    pub fn add_block(&mut self, parent: Option<BlockId>, viewport: Viewport) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;

        let position = self.random_position(viewport);
        self.positions.insert(id, position);

        match parent {
            Some(p) if p != id && self.positions.contains_key(&p) => {
                self.parents.insert(id, p);
                debug!(block = %id, parent = %p, x = position.x, y = position.y, "added block");
            }
            Some(p) => {
                debug!(block = %id, parent = %p, "ignoring unknown parent; block is rootless");
            }
            None => {
                debug!(block = %id, x = position.x, y = position.y, "added rootless block");
            }
        }
        id
    }

    /// Delete a block's position and parent link.
    ///
    /// The root and unknown ids are left alone. Children of the removed block
    /// keep their (now dangling) parent entry. Returns true if a block was removed.
    pub fn remove_block(&mut self, id: BlockId) -> bool {
        if id == BlockId::ROOT {
            debug!(block = %id, "refusing to remove root");
            return false;
        }
        if self.positions.shift_remove(&id).is_none() {
            return false;
        }
        self.parents.shift_remove(&id);
        debug!(block = %id, remaining = self.positions.len(), "removed block");
        true
    }

    /// Overwrite a live block's position. No clamping is applied.
    ///
    /// Returns false (and changes nothing) for an unknown id.
    pub fn update_position(&mut self, id: BlockId, position: Point) -> bool {
        match self.positions.get_mut(&id) {
            Some(p) => {
                *p = position;
                true
            }
            None => false,
        }
    }

    fn random_position(&mut self, viewport: Viewport) -> Point {
        let max_x = placement_extent(viewport.width, self.layout.placement_margin);
        let max_y = placement_extent(viewport.height, self.layout.placement_margin);
        Point::new(
            self.rng.gen_range(0.0..=max_x),
            self.rng.gen_range(0.0..=max_y),
        )
    }

    // ── Reads ───────────────────────────────────────────────────────────────

    pub fn position(&self, id: BlockId) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    /// Recorded parent of `id`, which may no longer be live.
    pub fn parent(&self, id: BlockId) -> Option<BlockId> {
        self.parents.get(&id).copied()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn is_root(&self, id: BlockId) -> bool {
        id == BlockId::ROOT
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Live blocks in creation order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, Point)> + '_ {
        self.positions.iter().map(|(id, p)| (*id, *p))
    }

    /// Live blocks whose recorded parent is `id`.
    pub fn children(&self, id: BlockId) -> Vec<BlockId> {
        self.parents
            .iter()
            .filter(|(child, parent)| **parent == id && self.positions.contains_key(*child))
            .map(|(child, _)| *child)
            .collect()
    }

    /// Connector from `id`'s parent to `id`, if both are live.
    pub fn connector(&self, id: BlockId) -> Option<Connector> {
        let child = self.positions.get(&id)?;
        let parent_id = self.parents.get(&id)?;
        let parent = self.positions.get(parent_id)?;
        Some(route_connector(*parent, *child, &self.layout))
    }

    /// Every drawable connector, in child creation order.
    pub fn connectors(&self) -> impl Iterator<Item = (BlockId, BlockId, Connector)> + '_ {
        self.positions.keys().filter_map(|id| {
            let parent = self.parents.get(id)?;
            self.connector(*id).map(|c| (*id, *parent, c))
        })
    }

    /// Snapshot of blocks and connectors for the renderer.
    pub fn scene(&self) -> Scene {
        let blocks = self
            .blocks()
            .map(|(id, p)| BlockView {
                id,
                x: p.x,
                y: p.y,
                removable: !self.is_root(id),
            })
            .collect();
        let connectors = self
            .connectors()
            .map(|(block, parent, c)| ConnectorView {
                block,
                parent,
                from_x: c.from.x,
                from_y: c.from.y,
                to_x: c.to.x,
                to_y: c.to.y,
                path: c.path,
            })
            .collect();
        Scene { blocks, connectors }
    }
}

/// Upper bound of the placement range along one axis. Collapses to 0 for
/// viewports smaller than the margin and for non-finite sizes.
fn placement_extent(size: f32, margin: f32) -> f32 {
    let extent = size - margin;
    if extent.is_finite() && extent > 0.0 {
        extent
    } else {
        0.0
    }
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new(Layout::default())
    }
}
