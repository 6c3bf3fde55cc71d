//! Frame driver: the per-surface tick loop and its collaborators.

/// Per-surface cancellation.
pub mod cancel;
/// Client-to-stage coordinate mapping for pointer input.
pub mod input;
/// Produce, reconcile, draw and present one frame per tick.
pub mod render_loop;
/// Waiting between ticks.
pub mod schedule;
