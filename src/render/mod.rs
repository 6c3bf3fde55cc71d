//! Software rasterization and frame presentation.

/// Tree walk that turns elements into pixels.
pub mod draw;
/// Presentation surfaces.
pub mod present;
/// Rect and buffer rasterizer.
pub mod raster;
/// Screen and hitmap buffers.
pub mod surface;
