//! Persistent elements mirroring the latest node tree.

/// Coordinate-space resolution.
pub mod bounds;
pub(crate) mod state;
pub(crate) mod transition;
/// Generational element arena and lifecycle hooks.
pub mod tree;
