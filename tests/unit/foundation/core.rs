use super::*;

#[test]
fn fps_interval_is_inverse_rate() {
    let fps = Fps::new(50.0).unwrap();
    assert_eq!(fps.frame_interval(), Duration::from_millis(20));
    assert_eq!(Fps::DEFAULT.as_f64(), 60.0);
}

#[test]
fn fps_rejects_zero_negative_and_nan() {
    assert!(Fps::new(0.0).is_err());
    assert!(Fps::new(-1.0).is_err());
    assert!(Fps::new(f64::NAN).is_err());
    assert!(Fps::new(f64::INFINITY).is_err());
}

#[test]
fn canvas_requires_positive_size() {
    assert!(Canvas::new(0, 4).is_err());
    assert!(Canvas::new(4, 0).is_err());
    assert_eq!(Canvas::new(16, 8).unwrap().area(), 128);
}

#[test]
fn frame_index_next_saturates() {
    assert_eq!(FrameIndex(3).next(), FrameIndex(4));
    assert_eq!(FrameIndex(u64::MAX).next(), FrameIndex(u64::MAX));
}
