use blocktree::canvas::{Canvas, CanvasEvent, Effect};
use blocktree::drag::PointerId;
use blocktree::model::{BlockId, Layout, Point, Viewport};
use blocktree::store::TreeStore;

fn canvas_with_two_blocks() -> (Canvas, BlockId, BlockId) {
    let mut canvas = Canvas::new(
        TreeStore::with_seed(Layout::default(), 21),
        Viewport::new(900.0, 700.0),
    );
    let Effect::Added(child) = canvas.handle(CanvasEvent::Add {
        parent: Some(BlockId::ROOT),
    }) else {
        panic!("expected Added");
    };
    (canvas, BlockId::ROOT, child)
}

fn press(block: BlockId, at: Point, pointer: u32) -> CanvasEvent {
    CanvasEvent::Press {
        block,
        x: at.x,
        y: at.y,
        pointer: PointerId(pointer),
    }
}

fn mv(x: f32, y: f32, pointer: u32) -> CanvasEvent {
    CanvasEvent::Move {
        x,
        y,
        pointer: PointerId(pointer),
    }
}

#[test]
fn interleaved_drags_stay_independent() {
    let (mut canvas, a, b) = canvas_with_two_blocks();
    let pa = canvas.store().position(a).unwrap();
    let pb = canvas.store().position(b).unwrap();

    canvas.handle(press(a, Point::new(pa.x + 10.0, pa.y + 20.0), 1));
    canvas.handle(press(b, Point::new(pb.x + 60.0, pb.y + 5.0), 2));

    canvas.handle(mv(110.0, 120.0, 1));
    canvas.handle(mv(460.0, 305.0, 2));
    canvas.handle(mv(210.0, 220.0, 1));

    assert_eq!(canvas.store().position(a), Some(Point::new(200.0, 200.0)));
    assert_eq!(canvas.store().position(b), Some(Point::new(400.0, 300.0)));

    canvas.handle(CanvasEvent::Release {
        pointer: PointerId(1),
    });
    assert!(!canvas.drags().is_dragging(a));
    assert!(canvas.drags().is_dragging(b));

    // pointer 1 is detached; pointer 2 still moves b only
    assert_eq!(canvas.handle(mv(0.0, 0.0, 1)), Effect::Ignored);
    canvas.handle(mv(160.0, 5.0, 2));
    assert_eq!(canvas.store().position(a), Some(Point::new(200.0, 200.0)));
    assert_eq!(canvas.store().position(b), Some(Point::new(100.0, 0.0)));
}

#[test]
fn release_anywhere_ends_drag() {
    let (mut canvas, a, _) = canvas_with_two_blocks();
    let pa = canvas.store().position(a).unwrap();
    canvas.handle(press(a, pa, 0));
    // far outside the block and the viewport
    canvas.handle(mv(-3000.0, 9000.0, 0));
    assert_eq!(
        canvas.handle(CanvasEvent::Release {
            pointer: PointerId::PRIMARY
        }),
        Effect::DragEnded(a)
    );
    assert!(canvas.drags().is_empty());
    assert_eq!(canvas.store().position(a), Some(Point::new(-3000.0, 9000.0)));
}

#[test]
fn click_without_move_keeps_position() {
    let (mut canvas, _, b) = canvas_with_two_blocks();
    let pb = canvas.store().position(b).unwrap();
    canvas.handle(press(b, Point::new(pb.x + 3.0, pb.y + 3.0), 0));
    canvas.handle(CanvasEvent::Release {
        pointer: PointerId::PRIMARY,
    });
    assert_eq!(canvas.store().position(b), Some(pb));
}

#[test]
fn press_on_removed_block_is_ignored() {
    let (mut canvas, _, b) = canvas_with_two_blocks();
    canvas.handle(CanvasEvent::Remove { block: b });
    assert_eq!(canvas.handle(press(b, Point::default(), 0)), Effect::Ignored);
    assert!(canvas.drags().is_empty());
}

#[test]
fn removal_wins_within_a_batch() {
    let (mut canvas, _, b) = canvas_with_two_blocks();
    let pb = canvas.store().position(b).unwrap();
    canvas.handle(press(b, pb, 0));

    let effects = canvas.apply_batch([
        mv(10.0, 10.0, 0),
        CanvasEvent::Remove { block: b },
        mv(20.0, 20.0, 0),
    ]);
    assert_eq!(effects[0], Effect::Ignored);
    assert_eq!(effects[1], Effect::Removed(b));
    assert_eq!(effects[2], Effect::Ignored);
    assert!(!canvas.store().contains(b));
    assert!(canvas.drags().is_empty());
}

#[test]
fn batch_without_removal_applies_moves() {
    let (mut canvas, a, _) = canvas_with_two_blocks();
    let pa = canvas.store().position(a).unwrap();
    canvas.handle(press(a, pa, 0));
    let effects = canvas.apply_batch([mv(1.0, 2.0, 0), CanvasEvent::Remove { block: a }]);
    // the root cannot be removed, so the move stands
    assert_eq!(effects[0], Effect::Moved(a, Point::new(1.0, 2.0)));
    assert_eq!(effects[1], Effect::Ignored);
}
