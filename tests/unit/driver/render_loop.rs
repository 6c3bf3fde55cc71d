use super::*;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::driver::schedule::Immediate;
use crate::render::present::MemoryPresenter;

fn stage_with_fps(fps: f64) -> Node {
    Node::stage(4, 4).fps(fps)
}

#[test]
fn frame_counter_starts_at_zero_and_advances() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let mut lp = RenderLoop::new(move |info| {
        s.borrow_mut().push(info.frame.0);
        Node::stage(2, 2)
    });
    for _ in 0..3 {
        lp.tick().unwrap();
    }
    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    assert_eq!(lp.frame(), FrameIndex(3));
}

#[test]
fn next_delay_follows_stage_fps() {
    let mut lp = RenderLoop::new(|_| stage_with_fps(50.0));
    let TickOutcome::Rendered { next_delay, .. } = lp.tick().unwrap() else {
        panic!("cancelled");
    };
    assert_eq!(next_delay, Duration::from_millis(20));
}

#[test]
fn fps_override_wins_over_stage() {
    let opts = RenderLoopOpts {
        fps_override: Some(10.0),
        ..RenderLoopOpts::default()
    };
    let mut lp = RenderLoop::new(|_| stage_with_fps(50.0)).with_opts(opts);
    assert_eq!(
        lp.tick().unwrap(),
        TickOutcome::Rendered {
            frame: FrameIndex(0),
            next_delay: Duration::from_millis(100)
        }
    );
}

#[test]
fn non_stage_root_fails_the_tick() {
    let mut lp = RenderLoop::new(|_| Node::rect(0.0, 0.0, 1.0, 1.0));
    let err = lp.tick().unwrap_err();
    assert!(err.to_string().contains("root element must be <stage>"));
    assert_eq!(lp.frame(), FrameIndex(0));
}

#[test]
fn invalid_stage_config_is_rejected() {
    for node in [
        Node::stage(0, 4),
        Node::stage(4, 4).fps(0.0),
        Node::stage(4, 4).fps(f64::NAN),
        Node::stage(4, 4).scale(0),
    ] {
        let n = node.clone();
        let mut lp = RenderLoop::new(move |_| n.clone());
        assert!(lp.tick().is_err(), "{node:?}");
    }
}

#[test]
fn cancelled_loop_does_no_work() {
    let calls = Rc::new(Cell::new(0));
    let c = Rc::clone(&calls);
    let mut reg = SurfaceRegistry::new();
    let mut first = RenderLoop::on_surface(&mut reg, SurfaceId(1), move |_| {
        c.set(c.get() + 1);
        Node::stage(2, 2)
    });
    first.tick().unwrap();
    let mut second = RenderLoop::on_surface(&mut reg, SurfaceId(1), |_| Node::stage(2, 2));
    assert_eq!(first.tick().unwrap(), TickOutcome::Cancelled);
    assert_eq!(calls.get(), 1);
    assert!(matches!(second.tick().unwrap(), TickOutcome::Rendered { .. }));
}

#[test]
fn run_stops_at_max_frames_and_presents_scaled() {
    let opts = RenderLoopOpts {
        max_frames: Some(3),
        ..RenderLoopOpts::default()
    };
    let mut lp = RenderLoop::new(|_| Node::stage(2, 1).scale(2).background("#fff")).with_opts(opts);
    let mut presenter = MemoryPresenter::new();
    let mut sched = Immediate::default();
    assert_eq!(lp.run(&mut presenter, &mut sched).unwrap(), 3);
    assert_eq!(presenter.frames().len(), 3);
    assert_eq!(sched.waited.len(), 2);
    assert!(presenter.ended());
    let f = &presenter.frames()[2];
    assert_eq!((f.frame, f.width, f.height), (FrameIndex(2), 4, 2));
}

#[test]
fn run_returns_error_and_still_ends_presenter() {
    let mut lp = RenderLoop::new(|info| {
        if info.frame.0 == 1 {
            Node::nothing()
        } else {
            Node::stage(1, 1)
        }
    });
    let mut presenter = MemoryPresenter::new();
    assert!(lp.run(&mut presenter, &mut Immediate::default()).is_err());
    assert_eq!(presenter.frames().len(), 1);
    assert!(presenter.ended());
}

#[test]
fn stage_resize_reallocates_buffers() {
    let mut lp = RenderLoop::new(|info| {
        let n = 2 + info.frame.0 as u32;
        Node::stage(n, n)
    });
    lp.tick().unwrap();
    assert_eq!(lp.screen().len(), 4);
    lp.tick().unwrap();
    assert_eq!(lp.screen().len(), 9);
    assert_eq!(lp.hitmap().len(), 9);
}

#[test]
fn click_invokes_on_click_of_drawn_element() {
    let clicks = Rc::new(RefCell::new(Vec::new()));
    let c = Rc::clone(&clicks);
    let mut lp = RenderLoop::new(move |_| {
        let c = Rc::clone(&c);
        Node::stage(4, 4).scale(2).child(
            Node::rect(1.0, 1.0, 2.0, 2.0)
                .fill("#fff")
                .on_click(move |e| c.borrow_mut().push((e.x, e.y))),
        )
    });
    lp.tick().unwrap();
    assert!(lp.click(0, 0).is_none());
    assert!(lp.click(2, 2).is_some());
    let rect = ClientRect {
        left: 0.0,
        top: 0.0,
        width: 8.0,
        height: 8.0,
    };
    assert!(lp.click_client(3.0, 5.0, rect).is_some());
    assert_eq!(*clicks.borrow(), vec![(2, 2), (1, 2)]);
}

#[test]
fn color_cache_limit_bounds_the_codec() {
    let opts = RenderLoopOpts {
        color_cache_limit: Some(1),
        ..RenderLoopOpts::default()
    };
    let mut lp = RenderLoop::new(|_| {
        Node::stage(2, 1).background("#000").children([
            Node::pixel(0.0, 0.0, "#f00"),
            Node::pixel(1.0, 0.0, "#0f0"),
        ])
    })
    .with_opts(opts);
    lp.tick().unwrap();
    assert_eq!(lp.color_codec().cached_len(), 1);
}
