use crate::color::codec::ColorCodec;
use crate::element::bounds::{BoundingRect, local_box, sprite_size};
use crate::element::state::ElementState;
use crate::element::tree::{Element, ElementId, ElementTree};
use crate::foundation::error::{Pixel8Error, Pixel8Result};
use crate::render::raster::{Raster, RectSpec};
use crate::render::surface::FrameBuffer;
use crate::scene::node::NodeKind;
use crate::scene::props::{Position, Props};

/// Rasterize the whole tree into `fb`, resizing it to the stage first.
///
/// Boxes are resolved top-down during the walk; nothing about them is kept between passes.
#[tracing::instrument(level = "debug", skip_all, fields(elements = tree.len()))]
pub fn draw_tree(
    tree: &ElementTree,
    raster: &mut Raster,
    codec: &mut ColorCodec,
    fb: &mut FrameBuffer,
) -> Pixel8Result<()> {
    let root = tree
        .root()
        .ok_or_else(|| Pixel8Error::render("element tree is empty"))?;
    let stage = tree
        .stage_box()
        .ok_or_else(|| Pixel8Error::validation("root element must be <stage>"))?;
    fb.resize_if_needed(stage.w.max(0) as u32, stage.h.max(0) as u32);
    let mut pass = DrawPass {
        tree,
        raster,
        codec,
        fb,
        stage,
    };
    pass.element(root, &stage)
}

struct DrawPass<'a> {
    tree: &'a ElementTree,
    raster: &'a mut Raster,
    codec: &'a mut ColorCodec,
    fb: &'a mut FrameBuffer,
    stage: BoundingRect,
}

impl DrawPass<'_> {
    fn element(&mut self, id: ElementId, parent: &BoundingRect) -> Pixel8Result<()> {
        let tree = self.tree;
        let (Some(el), Some(props)) = (tree.get(id), tree.effective_props(id)) else {
            return Ok(());
        };
        let base = RectSpec {
            hit: id.hit_value(),
            x: props.x as i32,
            y: props.y as i32,
            fixed: props.position == Position::Fixed,
            blend: props.handlers.blend.as_ref(),
            ..RectSpec::default()
        };

        match el.kind() {
            NodeKind::Stage => {
                let bg = self.codec.resolve_or_transparent(props.background.as_ref())?;
                self.fb.clear(bg);
            }
            NodeKind::Rect => {
                let fill = self.codec.resolve_or_transparent(props.fill.as_ref())?;
                let spec = RectSpec {
                    w: props.width.unwrap_or(0.0) as i32,
                    h: props.height.unwrap_or(0.0) as i32,
                    radius: props.br as i32,
                    ..base
                };
                self.raster
                    .draw_rect(self.fb, &spec, fill, parent, &self.stage);
            }
            NodeKind::Circ => {
                let fill = self.codec.resolve_or_transparent(props.fill.as_ref())?;
                let r = props.radius as i32;
                let spec = RectSpec {
                    x: base.x.saturating_sub(r),
                    y: base.y.saturating_sub(r),
                    w: r.saturating_mul(2),
                    h: r.saturating_mul(2),
                    radius: r,
                    ..base
                };
                self.raster
                    .draw_rect(self.fb, &spec, fill, parent, &self.stage);
            }
            NodeKind::Pixel => {
                let color = props.color.as_ref().or(props.fill.as_ref());
                let fill = self.codec.resolve_or_transparent(color)?;
                let spec = RectSpec { w: 1, h: 1, ..base };
                self.raster
                    .draw_rect(self.fb, &spec, fill, parent, &self.stage);
            }
            NodeKind::Sprite => {
                if let ElementState::Sprite(sprite) = &el.state {
                    let (w, h) = sprite_size(&props, &el.state);
                    let spec = RectSpec { w, h, ..base };
                    self.raster
                        .draw_buffer(self.fb, &spec, &sprite.pixels, parent, &self.stage);
                }
            }
            NodeKind::Textbox => self.textbox(el, &props, &base, parent),
            NodeKind::Text
            | NodeKind::Transition
            | NodeKind::Callback
            | NodeKind::List
            | NodeKind::Nothing => {}
        }

        let own = parent.resolve(local_box(el, &props));
        for &child in el.children() {
            self.element(child, &own)?;
        }
        Ok(())
    }

    /// Glyphs are copied in the parent's space, offset by padding and scrolled by `scrollTop`.
    fn textbox(
        &mut self,
        el: &Element,
        props: &Props,
        base: &RectSpec<'_>,
        parent: &BoundingRect,
    ) {
        let ElementState::Textbox(tb) = &el.state else {
            return;
        };
        let own = parent.resolve(local_box(el, props));
        let space = if own.mask {
            BoundingRect {
                clip: own.clip,
                ..*parent
            }
        } else {
            *parent
        };
        let pad = props.text.padding as i32;
        let scroll = props.text.scroll_top as i32;
        let end = props.text.end.unwrap_or(usize::MAX);
        let glyphs = tb.layout.glyphs.iter().zip(&tb.glyph_pixels).enumerate();
        for (i, (g, pixels)) in glyphs {
            if i < props.text.start || i > end {
                continue;
            }
            let spec = RectSpec {
                x: base.x.saturating_add(pad).saturating_add(g.dest_x),
                y: base
                    .y
                    .saturating_add(pad)
                    .saturating_add(g.dest_y)
                    .saturating_sub(scroll),
                w: g.source.width as i32,
                h: g.source.height as i32,
                ..*base
            };
            self.raster
                .draw_buffer(self.fb, &spec, pixels, &space, &self.stage);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/draw.rs"]
mod tests;
