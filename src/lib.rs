//! pixel8 is a retained-mode scene graph with a software pixel rasterizer.
//!
//! Each frame a producer returns a [`Node`] tree rooted at a `stage`. The tree is reconciled
//! into persistent elements, drawn into packed RGBA pixels plus a hitmap, and handed to a
//! presentation surface:
//!
//! - Build nodes with the [`Node`] builders or load them from JSON
//! - Drive frames with a [`RenderLoop`]
//! - Present frames through a [`Presenter`] such as [`PngSequence`]
#![forbid(unsafe_code)]

pub mod animation;
pub mod color;
pub mod driver;
pub mod element;
pub mod foundation;
pub mod reconcile;
pub mod render;
pub mod scene;
pub mod text;

pub use crate::animation::ease::Ease;
pub use crate::animation::timer::{Direction, Timer, TimerOpts};
pub use crate::color::codec::{Color, ColorCodec, pack_rgba, parse_color, unpack_rgba};
pub use crate::color::composite::composite_over;
pub use crate::driver::cancel::{CancelToken, SurfaceRegistry};
pub use crate::driver::input::{ClientRect, client_to_stage};
pub use crate::driver::render_loop::{RenderLoop, RenderLoopOpts, StageConfig, TickOutcome};
pub use crate::driver::schedule::{Immediate, Scheduler, ThreadSleep};
pub use crate::element::bounds::{BoundingRect, ClipRect, LocalBox};
pub use crate::element::tree::{Element, ElementId, ElementTree, TreeStats};
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameInfo, SurfaceId};
pub use crate::foundation::error::{Pixel8Error, Pixel8Result};
pub use crate::render::draw::draw_tree;
pub use crate::render::present::{
    MemoryPresenter, PngSequence, PresentedFrame, Presenter, scale_nearest, write_png,
};
pub use crate::render::raster::{Paint, Raster, RectSpec, RowSpan, border_radius_skips, chord};
pub use crate::render::surface::FrameBuffer;
pub use crate::scene::node::{Key, Node, NodeKind};
pub use crate::scene::props::{
    ClickEvent, Handlers, Overflow, Position, PropValue, Props, SpriteSource, TextProps,
    TransitionValue,
};
pub use crate::text::layout::{
    Align, AtlasRect, Font, FontAtlas, FontRegistry, GlyphLayout, GlyphPlacement, LayoutRequest,
    MonospaceFont, TextLayout, WhiteSpace,
};
