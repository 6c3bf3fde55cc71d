//! Packed pixel colors.
//!
//! Pixels are `u32` values laid out so that `to_le_bytes()` yields `[r, g, b, a]`, which lets
//! a screen buffer be handed to RGBA8 consumers without swizzling.

/// Color string parsing and the per-instance parse cache.
pub mod codec;
/// Straight-alpha source-over compositing.
pub mod composite;
