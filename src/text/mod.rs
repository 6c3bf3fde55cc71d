//! Glyph layout for `textbox` elements.
//!
//! Layout is a service behind [`layout::GlyphLayout`]; the crate bundles a tiny fixed-cell
//! font so textboxes render without any external font data.

pub mod layout;
