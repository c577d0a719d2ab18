//! Event dispatch between the host and the tree.
//!
//! [`Canvas`] bundles the [`TreeStore`], the active [`DragSessions`] and the
//! current viewport. Hosts feed it [`CanvasEvent`]s and read back a
//! [`Scene`] after each one.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::drag::{DragSessions, PointerId};
use crate::model::{BlockId, Layout, Point, Scene, Viewport};
use crate::store::TreeStore;

// ────────────────────────────────────────────────────────────────────────────
// Events
// ────────────────────────────────────────────────────────────────────────────

/// Input from the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanvasEvent {
    /// Pointer pressed on a block's surface.
    Press {
        block: BlockId,
        x: f32,
        y: f32,
        #[serde(default)]
        pointer: PointerId,
    },
    /// Pointer moved anywhere in the document.
    Move {
        x: f32,
        y: f32,
        #[serde(default)]
        pointer: PointerId,
    },
    /// Pointer released anywhere in the document.
    Release {
        #[serde(default)]
        pointer: PointerId,
    },
    /// "+" clicked: add a child of `parent` (or a rootless block).
    Add {
        #[serde(default)]
        parent: Option<BlockId>,
    },
    /// "-" clicked on a block.
    Remove { block: BlockId },
    /// Host viewport changed size.
    Resize { width: f32, height: f32 },
}

/// What an event did to the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Added(BlockId),
    Removed(BlockId),
    Moved(BlockId, Point),
    DragStarted(BlockId),
    DragEnded(BlockId),
    Resized(Viewport),
    /// The event referred to an unknown block, an idle pointer or the root.
    Ignored,
}

// ────────────────────────────────────────────────────────────────────────────
// Canvas
// ────────────────────────────────────────────────────────────────────────────

/// Tree store plus per-pointer drag sessions.
#[derive(Debug, Clone)]
pub struct Canvas {
    store: TreeStore,
    drags: DragSessions,
    viewport: Viewport,
}

impl Canvas {
    /// Create a canvas holding just the permanent root block.
    pub fn new(store: TreeStore, viewport: Viewport) -> Self {
        let mut canvas = Self {
            store,
            drags: DragSessions::new(),
            viewport,
        };
        canvas.store.ensure_root(viewport);
        canvas
    }

    /// Build a canvas from configuration; a configured seed makes placement
    /// reproducible.
    pub fn from_config(config: &Config) -> Self {
        let store = match config.seed {
            Some(seed) => TreeStore::with_seed(config.layout, seed),
            None => TreeStore::new(config.layout),
        };
        Self::new(store, config.viewport)
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn drags(&self) -> &DragSessions {
        &self.drags
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn layout(&self) -> &Layout {
        self.store.layout()
    }

    pub fn scene(&self) -> Scene {
        self.store.scene()
    }

    /// Apply one event to completion.
    pub fn handle(&mut self, event: CanvasEvent) -> Effect {
        match event {
            CanvasEvent::Press {
                block,
                x,
                y,
                pointer,
            } => {
                if self
                    .drags
                    .press(pointer, block, Point::new(x, y), &self.store)
                {
                    Effect::DragStarted(block)
                } else {
                    Effect::Ignored
                }
            }
            CanvasEvent::Move { x, y, pointer } => {
                let block = self.drags.session(pointer).map(|c| c.block());
                match (
                    block,
                    self.drags
                        .pointer_moved(pointer, Point::new(x, y), &mut self.store),
                ) {
                    (Some(block), Some(p)) => Effect::Moved(block, p),
                    _ => Effect::Ignored,
                }
            }
            CanvasEvent::Release { pointer } => match self.drags.release(pointer) {
                Some(block) => Effect::DragEnded(block),
                None => Effect::Ignored,
            },
            CanvasEvent::Add { parent } => Effect::Added(self.store.add_block(parent, self.viewport)),
            CanvasEvent::Remove { block } => {
                if self.store.remove_block(block) {
                    let cancelled = self.drags.cancel_block(block);
                    if cancelled > 0 {
                        debug!(block = %block, cancelled, "detached drags of removed block");
                    }
                    Effect::Removed(block)
                } else {
                    Effect::Ignored
                }
            }
            CanvasEvent::Resize { width, height } => {
                self.viewport = Viewport::new(width, height);
                Effect::Resized(self.viewport)
            }
        }
    }

    /// Apply a batch of events in order.
    ///
    /// Removal wins over dragging within a batch: a move aimed at a block
    /// that the same batch removes is dropped, wherever it appears.
    pub fn apply_batch<I>(&mut self, events: I) -> Vec<Effect>
    where
        I: IntoIterator<Item = CanvasEvent>,
    {
        let events: Vec<CanvasEvent> = events.into_iter().collect();
        let removed: HashSet<BlockId> = events
            .iter()
            .filter_map(|e| match e {
                CanvasEvent::Remove { block } if *block != BlockId::ROOT => Some(*block),
                _ => None,
            })
            .collect();

        events
            .into_iter()
            .map(|event| {
                if let CanvasEvent::Move { pointer, .. } = event {
                    let target = self.drags.session(pointer).map(|c| c.block());
                    if target.is_some_and(|b| removed.contains(&b)) {
                        return Effect::Ignored;
                    }
                }
                self.handle(event)
            })
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared canvas
// ────────────────────────────────────────────────────────────────────────────

/// A [`Canvas`] behind one mutex, for hosts that deliver input from several
/// threads. Each operation holds the lock for its whole duration.
#[derive(Debug, Clone)]
pub struct SharedCanvas {
    inner: Arc<Mutex<Canvas>>,
}

impl SharedCanvas {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            inner: Arc::new(Mutex::new(canvas)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Canvas> {
        // operations leave no partial state behind, so poisoning is recoverable
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn handle(&self, event: CanvasEvent) -> Effect {
        self.lock().handle(event)
    }

    pub fn apply_batch<I>(&self, events: I) -> Vec<Effect>
    where
        I: IntoIterator<Item = CanvasEvent>,
    {
        self.lock().apply_batch(events)
    }

    pub fn scene(&self) -> Scene {
        self.lock().scene()
    }

    /// Run `f` with exclusive access to the canvas.
    pub fn with<R>(&self, f: impl FnOnce(&mut Canvas) -> R) -> R {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(
            TreeStore::with_seed(Layout::default(), 3),
            Viewport::new(800.0, 600.0),
        )
    }

    #[test]
    fn test_new_canvas_has_root() {
        let c = canvas();
        assert_eq!(c.store().len(), 1);
        assert!(c.store().contains(BlockId::ROOT));
    }

    #[test]
    fn test_press_move_release() {
        let mut c = canvas();
        let start = c.store().position(BlockId::ROOT).unwrap();
        let press = CanvasEvent::Press {
            block: BlockId::ROOT,
            x: start.x + 5.0,
            y: start.y + 5.0,
            pointer: PointerId::PRIMARY,
        };
        assert_eq!(c.handle(press), Effect::DragStarted(BlockId::ROOT));
        let eff = c.handle(CanvasEvent::Move {
            x: 405.0,
            y: 305.0,
            pointer: PointerId::PRIMARY,
        });
        assert_eq!(eff, Effect::Moved(BlockId::ROOT, Point::new(400.0, 300.0)));
        assert_eq!(
            c.handle(CanvasEvent::Release {
                pointer: PointerId::PRIMARY
            }),
            Effect::DragEnded(BlockId::ROOT)
        );
        // listener detached: later moves do nothing
        let eff = c.handle(CanvasEvent::Move {
            x: 0.0,
            y: 0.0,
            pointer: PointerId::PRIMARY,
        });
        assert_eq!(eff, Effect::Ignored);
        assert_eq!(c.store().position(BlockId::ROOT), Some(Point::new(400.0, 300.0)));
    }

    #[test]
    fn test_remove_cancels_drag() {
        let mut c = canvas();
        let Effect::Added(id) = c.handle(CanvasEvent::Add {
            parent: Some(BlockId::ROOT),
        }) else {
            panic!("expected Added");
        };
        c.handle(CanvasEvent::Press {
            block: id,
            x: 0.0,
            y: 0.0,
            pointer: PointerId::PRIMARY,
        });
        assert_eq!(c.handle(CanvasEvent::Remove { block: id }), Effect::Removed(id));
        assert!(c.drags().is_empty());
    }

    #[test]
    fn test_add_after_overflowing_resize() {
        let mut c = canvas();
        // 1e39 does not fit in an f32 and parses as infinity
        let resize: CanvasEvent =
            serde_json::from_str(r#"{"type":"resize","width":1e39,"height":600}"#).unwrap();
        c.handle(resize);
        assert!(c.viewport().width.is_infinite());
        let Effect::Added(id) = c.handle(CanvasEvent::Add {
            parent: Some(BlockId::ROOT),
        }) else {
            panic!("expected Added");
        };
        let p = c.store().position(id).unwrap();
        assert_eq!(p.x, 0.0);
        assert!(c.store().connector(id).is_some());
    }

    #[test]
    fn test_event_json_shape() {
        let e: CanvasEvent =
            serde_json::from_str(r#"{"type":"press","block":2,"x":1.5,"y":3}"#).unwrap();
        assert_eq!(
            e,
            CanvasEvent::Press {
                block: BlockId(2),
                x: 1.5,
                y: 3.0,
                pointer: PointerId(0),
            }
        );
        let e: CanvasEvent = serde_json::from_str(r#"{"type":"add"}"#).unwrap();
        assert_eq!(e, CanvasEvent::Add { parent: None });
    }
}
