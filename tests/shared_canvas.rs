use std::thread;

use blocktree::canvas::{Canvas, CanvasEvent, Effect, SharedCanvas};
use blocktree::drag::PointerId;
use blocktree::model::{BlockId, Layout, Point, Viewport};
use blocktree::store::TreeStore;

#[test]
fn concurrent_drags_do_not_interfere() {
    let mut canvas = Canvas::new(
        TreeStore::with_seed(Layout::default(), 8),
        Viewport::new(1200.0, 900.0),
    );
    let ids: Vec<BlockId> = (0..4)
        .map(|_| match canvas.handle(CanvasEvent::Add {
            parent: Some(BlockId::ROOT),
        }) {
            Effect::Added(id) => id,
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    let shared = SharedCanvas::new(canvas);

    let handles: Vec<_> = ids
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let shared = shared.clone();
            let pointer = PointerId(i as u32 + 1);
            thread::spawn(move || {
                let start = shared.with(|c| c.store().position(id)).unwrap();
                shared.handle(CanvasEvent::Press {
                    block: id,
                    x: start.x,
                    y: start.y,
                    pointer,
                });
                for step in 0..100 {
                    shared.handle(CanvasEvent::Move {
                        x: (i * 1000 + step) as f32,
                        y: i as f32,
                        pointer,
                    });
                }
                shared.handle(CanvasEvent::Release { pointer });
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let scene = shared.scene();
    for (i, id) in ids.iter().enumerate() {
        let b = scene.block(*id).unwrap();
        assert_eq!(Point::new(b.x, b.y), Point::new((i * 1000 + 99) as f32, i as f32));
        assert!(scene.connector(*id).is_some());
    }
    assert!(shared.with(|c| c.drags().is_empty()));
}

#[test]
fn shared_batch_accepts_any_iterator() {
    let shared = SharedCanvas::new(Canvas::new(
        TreeStore::with_seed(Layout::default(), 12),
        Viewport::new(800.0, 600.0),
    ));
    let effects = shared.apply_batch([
        CanvasEvent::Add {
            parent: Some(BlockId::ROOT),
        },
        CanvasEvent::Remove { block: BlockId(2) },
    ]);
    assert_eq!(effects, vec![Effect::Added(BlockId(2)), Effect::Removed(BlockId(2))]);

    let more = (0..3).map(|_| CanvasEvent::Add { parent: None });
    assert_eq!(shared.apply_batch(more).len(), 3);
    assert_eq!(shared.scene().blocks.len(), 4);
}
