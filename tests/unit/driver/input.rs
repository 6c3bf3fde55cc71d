use super::*;

fn at_origin(width: f64, height: f64) -> ClientRect {
    ClientRect {
        left: 0.0,
        top: 0.0,
        width,
        height,
    }
}

fn unscaled(x: f64, y: f64, w: f64, h: f64, scale: u32) -> Option<(u32, u32)> {
    client_to_stage(x, y, at_origin(w, h), scale, w, h)
}

#[test]
fn top_left() {
    assert_eq!(unscaled(0.0, 0.0, 100.0, 100.0, 1), Some((0, 0)));
}

#[test]
fn bottom_right() {
    assert_eq!(unscaled(199.0, 199.0, 200.0, 200.0, 10), Some((19, 19)));
}

#[test]
fn adjacent_cells() {
    assert_eq!(unscaled(9.0, 0.0, 100.0, 100.0, 10), Some((0, 0)));
    assert_eq!(unscaled(10.0, 0.0, 100.0, 100.0, 10), Some((1, 0)));
}

#[test]
fn stretched_surface() {
    let at = |x, y, w, h| client_to_stage(x, y, at_origin(w, h), 10, 100.0, 300.0);
    assert_eq!(at(349.0, 2.0, 350.0, 1050.0), Some((9, 0)));
    assert_eq!(at(182.0, 211.0, 200.0, 300.0), Some((9, 21)));
    assert_eq!(at(44.0, 211.0, 50.0, 300.0), Some((8, 21)));
}

#[test]
fn offset_rect_and_outside_clicks() {
    let rect = ClientRect {
        left: 50.0,
        top: 20.0,
        width: 40.0,
        height: 40.0,
    };
    assert_eq!(client_to_stage(54.0, 28.0, rect, 4, 40.0, 40.0), Some((1, 2)));
    assert_eq!(client_to_stage(49.0, 28.0, rect, 4, 40.0, 40.0), None);
    assert_eq!(client_to_stage(1.0, 1.0, at_origin(0.0, 0.0), 1, 0.0, 0.0), None);
}
