use std::time::Duration;

use crate::color::codec::ColorCodec;
use crate::driver::cancel::{CancelToken, SurfaceRegistry};
use crate::driver::input::{ClientRect, client_to_stage};
use crate::driver::schedule::Scheduler;
use crate::element::tree::{ElementId, ElementTree};
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameInfo, SurfaceId};
use crate::foundation::error::{Pixel8Error, Pixel8Result};
use crate::render::draw::draw_tree;
use crate::render::present::{PresentedFrame, Presenter};
use crate::render::raster::Raster;
use crate::render::surface::FrameBuffer;
use crate::scene::node::{Node, NodeKind};
use crate::scene::props::ClickEvent;
use crate::text::layout::FontRegistry;

/// Knobs for a [`RenderLoop`] that do not belong in the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderLoopOpts {
    /// Stop [`RenderLoop::run`] after this many rendered frames.
    pub max_frames: Option<u64>,
    /// Tick rate used instead of the stage's `fps`.
    pub fps_override: Option<f64>,
    /// Bound on memoized color strings; unbounded when `None`.
    pub color_cache_limit: Option<usize>,
}

impl RenderLoopOpts {
    /// Read `PIXEL8_MAX_FRAMES`, `PIXEL8_FPS` and `PIXEL8_COLOR_CACHE_LIMIT`. Unparseable or
    /// non-positive values are ignored.
    pub fn from_env() -> Self {
        Self {
            max_frames: std::env::var("PIXEL8_MAX_FRAMES")
                .ok()
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|&v| v > 0),
            fps_override: std::env::var("PIXEL8_FPS")
                .ok()
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0),
            color_cache_limit: std::env::var("PIXEL8_COLOR_CACHE_LIMIT")
                .ok()
                .and_then(|s| s.trim().parse::<usize>().ok())
                .filter(|&v| v > 0),
        }
    }
}

/// Stage props, validated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageConfig {
    pub canvas: Canvas,
    pub fps: Fps,
    pub scale: u32,
}

impl StageConfig {
    pub fn from_node(node: &Node, opts: &RenderLoopOpts) -> Pixel8Result<Self> {
        if node.kind != NodeKind::Stage {
            return Err(Pixel8Error::validation(format!(
                "root element must be <stage>, got <{}>",
                node.kind.name()
            )));
        }
        let p = &node.props;
        let dim = |v: Option<f64>| v.filter(|v| v.is_finite() && *v >= 1.0).map_or(0, |v| v as u32);
        let canvas = Canvas::new(dim(p.width), dim(p.height))?;
        let fps = match opts.fps_override.or(p.fps) {
            Some(v) => Fps::new(v)?,
            None => Fps::DEFAULT,
        };
        let scale = p.scale.unwrap_or(1);
        if scale == 0 {
            return Err(Pixel8Error::validation("stage scale must be >= 1"));
        }
        Ok(Self { canvas, fps, scale })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Rendered {
        frame: FrameIndex,
        next_delay: Duration,
    },
    /// The surface was claimed by another loop; nothing was done.
    Cancelled,
}

type Producer = Box<dyn FnMut(&FrameInfo) -> Node>;

/// Frame driver: produce, reconcile, draw, present, schedule.
pub struct RenderLoop {
    producer: Producer,
    tree: ElementTree,
    codec: ColorCodec,
    raster: Raster,
    buffer: FrameBuffer,
    last: Option<Node>,
    stage: Option<StageConfig>,
    frame: FrameIndex,
    surface: SurfaceId,
    token: CancelToken,
    opts: RenderLoopOpts,
}

impl std::fmt::Debug for RenderLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderLoop")
            .field("surface", &self.surface)
            .field("frame", &self.frame)
            .field("stage", &self.stage)
            .field("elements", &self.tree.len())
            .finish_non_exhaustive()
    }
}

impl RenderLoop {
    /// A loop that owns no shared surface and is only cancelled through its own token.
    pub fn new(producer: impl FnMut(&FrameInfo) -> Node + 'static) -> Self {
        Self::with_token(SurfaceId(0), CancelToken::new(), Box::new(producer))
    }

    /// A loop drawing onto `surface`, cancelling whichever loop drew there before.
    pub fn on_surface(
        registry: &mut SurfaceRegistry,
        surface: SurfaceId,
        producer: impl FnMut(&FrameInfo) -> Node + 'static,
    ) -> Self {
        let token = registry.claim(surface);
        Self::with_token(surface, token, Box::new(producer))
    }

    fn with_token(surface: SurfaceId, token: CancelToken, producer: Producer) -> Self {
        Self {
            producer,
            tree: ElementTree::new(),
            codec: ColorCodec::new(),
            raster: Raster::new(),
            buffer: FrameBuffer::default(),
            last: None,
            stage: None,
            frame: FrameIndex::default(),
            surface,
            token,
            opts: RenderLoopOpts::default(),
        }
    }

    pub fn with_opts(mut self, opts: RenderLoopOpts) -> Self {
        self.codec = ColorCodec::with_limit(opts.color_cache_limit);
        self.opts = opts;
        self
    }

    pub fn with_fonts(mut self, fonts: FontRegistry) -> Self {
        *self.tree.fonts_mut() = fonts;
        self
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Index of the next frame to render.
    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn screen(&self) -> &[u32] {
        self.buffer.screen()
    }

    pub fn hitmap(&self) -> &[u32] {
        self.buffer.hitmap()
    }

    /// Validated stage config of the last rendered frame.
    pub fn stage(&self) -> Option<StageConfig> {
        self.stage
    }

    pub fn color_codec(&self) -> &ColorCodec {
        &self.codec
    }

    /// Run one frame without presenting it.
    pub fn tick(&mut self) -> Pixel8Result<TickOutcome> {
        self.step(None)
    }

    /// Run one frame and hand it to `presenter` at the stage's scale.
    pub fn tick_into(&mut self, presenter: &mut dyn Presenter) -> Pixel8Result<TickOutcome> {
        self.step(Some(presenter))
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(surface = self.surface.0, frame = self.frame.0)
    )]
    fn step(&mut self, presenter: Option<&mut dyn Presenter>) -> Pixel8Result<TickOutcome> {
        if self.token.is_cancelled() {
            tracing::debug!("render loop cancelled");
            return Ok(TickOutcome::Cancelled);
        }
        let frame = self.frame;
        let node = (self.producer)(&FrameInfo { frame });
        let stage = StageConfig::from_node(&node, &self.opts)?;
        self.tree.patch_root(self.last.as_ref(), &node)?;
        self.last = Some(node);
        draw_tree(&self.tree, &mut self.raster, &mut self.codec, &mut self.buffer)?;
        if let Some(presenter) = presenter {
            presenter.present(&PresentedFrame::from_buffer(frame, &self.buffer, stage.scale))?;
        }
        self.stage = Some(stage);
        self.frame = frame.next();
        Ok(TickOutcome::Rendered {
            frame,
            next_delay: stage.fps.frame_interval(),
        })
    }

    /// Tick until cancelled, an error, or `max_frames`. Returns how many frames were rendered.
    ///
    /// The presenter's `end` runs even when a tick fails.
    pub fn run(
        &mut self,
        presenter: &mut dyn Presenter,
        scheduler: &mut dyn Scheduler,
    ) -> Pixel8Result<u64> {
        presenter.begin(self.surface)?;
        let mut rendered = 0u64;
        let result = loop {
            if self.opts.max_frames.is_some_and(|max| rendered >= max) {
                break Ok(());
            }
            match self.tick_into(presenter) {
                Ok(TickOutcome::Rendered { next_delay, .. }) => {
                    rendered += 1;
                    if self.opts.max_frames.is_some_and(|max| rendered >= max) {
                        break Ok(());
                    }
                    scheduler.wait(next_delay);
                }
                Ok(TickOutcome::Cancelled) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        let ended = presenter.end();
        result?;
        ended?;
        Ok(rendered)
    }

    /// Dispatch a click at stage coordinates to the element drawn there.
    pub fn click(&mut self, x: u32, y: u32) -> Option<ElementId> {
        let hit = self.buffer.hit(x, y)?;
        let id = self.tree.element_for_hit(hit)?;
        let hook = self.tree.get(id)?.props().handlers.on_click.clone();
        if let Some(hook) = hook {
            hook(&ClickEvent { x, y });
        }
        tracing::trace!(?id, x, y, "click");
        Some(id)
    }

    /// Dispatch a click given in presentation-surface client coordinates.
    pub fn click_client(
        &mut self,
        client_x: f64,
        client_y: f64,
        rect: ClientRect,
    ) -> Option<ElementId> {
        let stage = self.stage?;
        let (x, y) = client_to_stage(
            client_x,
            client_y,
            rect,
            stage.scale,
            f64::from(stage.canvas.width * stage.scale),
            f64::from(stage.canvas.height * stage.scale),
        )?;
        self.click(x, y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/render_loop.rs"]
mod tests;
