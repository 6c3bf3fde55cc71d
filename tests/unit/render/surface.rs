use super::*;

use crate::color::codec::pack_rgba;

#[test]
fn clear_fills_screen_and_resets_hits() {
    let mut fb = FrameBuffer::new(3, 2);
    fb.planes_mut().1[4] = 9;
    fb.clear(7);
    assert!(fb.screen().iter().all(|&p| p == 7));
    assert!(fb.hitmap().iter().all(|&h| h == 0));
}

#[test]
fn resize_reallocates_only_on_change() {
    let mut fb = FrameBuffer::new(2, 2);
    fb.clear(1);
    assert!(!fb.resize_if_needed(2, 2));
    assert_eq!(fb.pixel(1, 1), Some(1));
    assert!(fb.resize_if_needed(4, 3));
    assert_eq!(fb.screen().len(), 12);
    assert_eq!(fb.hitmap().len(), 12);
    assert_eq!(fb.pixel(3, 2), Some(0));
    assert_eq!(fb.pixel(4, 0), None);
}

#[test]
fn rgba8_bytes_follow_channel_order() {
    let mut fb = FrameBuffer::new(1, 1);
    fb.clear(pack_rgba(1, 2, 3, 4));
    assert_eq!(fb.to_rgba8(), vec![1, 2, 3, 4]);
}
