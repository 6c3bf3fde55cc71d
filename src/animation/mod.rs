/// Easing curves, addressable by name from scene JSON.
pub mod ease;
/// Restartable integer progress counter.
pub mod timer;
