//! Per-block drag sessions.
//!
//! A [`DragController`] belongs to exactly one block and owns the delta
//! captured at press time. Nothing in it is shared with any other block, so
//! concurrent drags from separate pointers cannot overwrite each other.
//!
//! [`DragSessions`] stands in for the host's document-level move/release
//! listeners: a controller is attached on press and dropped on release, so no
//! listener outlives its drag.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::model::{BlockId, Point};
use crate::store::TreeStore;

/// Identity of an input pointer (mouse, touch contact, pen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointerId(pub u32);

impl PointerId {
    /// Pointer used by single-pointer hosts.
    pub const PRIMARY: PointerId = PointerId(0);
}

/// Interaction state of one block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Pointer offset from the block's top-left corner, fixed for the session.
    Dragging { delta: Point },
}

/// Drag state machine for a single block.
#[derive(Debug, Clone)]
pub struct DragController {
    block: BlockId,
    state: DragState,
}

impl DragController {
    pub fn new(block: BlockId) -> Self {
        Self {
            block,
            state: DragState::Idle,
        }
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// `Idle -> Dragging`: capture `pointer - position` for the session.
    ///
    /// Returns false if the block is not live, leaving the state unchanged.
    pub fn press(&mut self, pointer: Point, store: &TreeStore) -> bool {
        let Some(position) = store.position(self.block) else {
            return false;
        };
        self.state = DragState::Dragging {
            delta: pointer - position,
        };
        true
    }

    /// While dragging, move the block so the captured delta is preserved.
    ///
    /// Returns the position written, or `None` when idle or when the block
    /// no longer exists.
    pub fn pointer_moved(&self, pointer: Point, store: &mut TreeStore) -> Option<Point> {
        let DragState::Dragging { delta } = self.state else {
            return None;
        };
        let position = pointer - delta;
        store.update_position(self.block, position).then_some(position)
    }

    /// `Dragging -> Idle`.
    pub fn release(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Active drag sessions, one per pointer.
#[derive(Debug, Clone, Default)]
pub struct DragSessions {
    active: IndexMap<PointerId, DragController>,
}

impl DragSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging `block` with `pointer`.
    ///
    /// A pointer that is already dragging is moved to the new block.
    /// Nothing is attached if the block is not live.
    pub fn press(
        &mut self,
        pointer_id: PointerId,
        block: BlockId,
        pointer: Point,
        store: &TreeStore,
    ) -> bool {
        let mut controller = DragController::new(block);
        if !controller.press(pointer, store) {
            debug!(block = %block, pointer = pointer_id.0, "press on unknown block ignored");
            return false;
        }
        debug!(block = %block, pointer = pointer_id.0, state = ?controller.state(), "drag started");
        self.active.insert(pointer_id, controller);
        true
    }

    /// Deliver a move to the session owned by `pointer_id`, if any.
    pub fn pointer_moved(
        &self,
        pointer_id: PointerId,
        pointer: Point,
        store: &mut TreeStore,
    ) -> Option<Point> {
        let controller = self.active.get(&pointer_id)?;
        let moved = controller.pointer_moved(pointer, store);
        trace!(block = %controller.block(), pointer = pointer_id.0, ?moved, "drag move");
        moved
    }

    /// End the session owned by `pointer_id` and detach it.
    ///
    /// Returns the block that was being dragged, if any.
    pub fn release(&mut self, pointer_id: PointerId) -> Option<BlockId> {
        let mut controller = self.active.shift_remove(&pointer_id)?;
        controller.release();
        debug!(block = %controller.block(), pointer = pointer_id.0, "drag ended");
        Some(controller.block())
    }

    /// Detach every session dragging `block`.
    pub fn cancel_block(&mut self, block: BlockId) -> usize {
        let before = self.active.len();
        self.active.retain(|_, c| c.block() != block);
        before - self.active.len()
    }

    pub fn is_dragging(&self, block: BlockId) -> bool {
        self.active.values().any(|c| c.block() == block)
    }

    pub fn session(&self, pointer_id: PointerId) -> Option<&DragController> {
        self.active.get(&pointer_id)
    }

    /// Number of attached sessions.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
