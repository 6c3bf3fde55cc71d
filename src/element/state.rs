use std::rc::Rc;

use crate::color::codec::{Color, pack_rgba, parse_color};
use crate::element::transition::TransitionState;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{Pixel8Error, Pixel8Result};
use crate::scene::node::{Node, NodeKind};
use crate::scene::props::{Props, SpriteSource};
use crate::text::layout::{Align, FontRegistry, LayoutRequest, TextLayout, WhiteSpace};

/// Per-kind computed state kept alongside an element's props.
#[derive(Debug, Default)]
pub(crate) enum ElementState {
    #[default]
    Plain,
    Sprite(SpriteState),
    Textbox(TextboxState),
    Callback(CallbackState),
    Transition(TransitionState),
}

impl ElementState {
    pub(crate) fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Sprite => Self::Sprite(SpriteState::default()),
            NodeKind::Textbox => Self::Textbox(TextboxState::default()),
            NodeKind::Callback => Self::Callback(CallbackState::default()),
            NodeKind::Transition => Self::Transition(TransitionState::default()),
            _ => Self::Plain,
        }
    }
}

#[derive(Debug)]
pub(crate) struct SpriteState {
    pub(crate) source: Option<SpriteSource>,
    pub(crate) pixels: Rc<[u32]>,
    /// Decoded image size, when the source carried one.
    pub(crate) natural: Option<(u32, u32)>,
}

impl Default for SpriteState {
    fn default() -> Self {
        Self {
            source: None,
            pixels: Rc::from(Vec::new()),
            natural: None,
        }
    }
}

impl SpriteState {
    /// Decode `src` unless it is the source already held.
    pub(crate) fn refresh(&mut self, src: Option<&SpriteSource>) -> Pixel8Result<()> {
        match (src, &self.source) {
            (None, None) => return Ok(()),
            (Some(a), Some(b)) if a.same_as(b) => return Ok(()),
            _ => {}
        }
        let Some(src) = src else {
            *self = Self::default();
            return Ok(());
        };
        let (pixels, natural) = decode_sprite(src)?;
        tracing::trace!(len = pixels.len(), "decoded sprite pixels");
        self.pixels = pixels;
        self.natural = natural;
        self.source = Some(src.clone());
        Ok(())
    }
}

fn decode_sprite(src: &SpriteSource) -> Pixel8Result<(Rc<[u32]>, Option<(u32, u32)>)> {
    let img = match src {
        SpriteSource::Pixels(px) => return Ok((Rc::clone(px), None)),
        SpriteSource::Encoded(bytes) => image::load_from_memory(bytes)
            .map_err(|e| Pixel8Error::asset(format!("decode sprite image from memory: {e}")))?,
        SpriteSource::Path(path) => image::open(path).map_err(|e| {
            Pixel8Error::asset(format!("decode sprite image '{}': {e}", path.display()))
        })?,
    };
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels: Vec<u32> = rgba
        .pixels()
        .map(|p| pack_rgba(p[0], p[1], p[2], p[3]))
        .collect();
    Ok((Rc::from(pixels), Some((width, height))))
}

/// Everything a textbox layout depends on; layout reruns only when this changes.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LayoutKey {
    text: String,
    font: Option<String>,
    width: u32,
    align: Align,
    white_space: WhiteSpace,
    letter_spacing: f64,
    line_height: f64,
    tab_size: u32,
    tint: u32,
}

#[derive(Debug, Default)]
pub(crate) struct TextboxState {
    key: Option<LayoutKey>,
    pub(crate) layout: TextLayout,
    /// Tinted atlas pixels, one buffer per placed glyph.
    pub(crate) glyph_pixels: Vec<Vec<u32>>,
}

impl TextboxState {
    pub(crate) fn refresh(
        &mut self,
        props: &Props,
        text_child: Option<&str>,
        fonts: &FontRegistry,
    ) -> Pixel8Result<()> {
        let padding = (props.text.padding * 2.0) as i64;
        let width = props.width.unwrap_or(0.0) as i64;
        let tint = match &props.color {
            Some(Color::Packed(v)) => *v,
            Some(Color::Css(s)) => parse_color(s)?,
            None => 0xffff_ffff,
        };
        let key = LayoutKey {
            text: text_child.unwrap_or_default().to_owned(),
            font: props.text.font.clone(),
            width: (width - padding).max(0) as u32,
            align: props.text.align,
            white_space: props.text.white_space,
            letter_spacing: props.text.letter_spacing,
            line_height: props.text.line_height,
            tab_size: props.text.tab_size,
            tint,
        };
        if self.key.as_ref() == Some(&key) {
            return Ok(());
        }
        let font = fonts.get(key.font.as_deref())?;
        let layout = font.layout.layout(&LayoutRequest {
            text: &key.text,
            width: key.width,
            align: key.align,
            white_space: key.white_space,
            letter_spacing: key.letter_spacing,
            line_height: key.line_height,
            tab_size: key.tab_size,
        });
        self.glyph_pixels = layout
            .glyphs
            .iter()
            .map(|g| font.atlas.tinted_region(g.source, key.tint))
            .collect();
        self.layout = layout;
        self.key = Some(key);
        Ok(())
    }
}

/// Callback elements remember the synthetic node they rendered last and the one before it.
#[derive(Debug, Default)]
pub(crate) struct CallbackState {
    pub(crate) frame: FrameIndex,
    pub(crate) node: Option<Node>,
    pub(crate) last: Option<Node>,
}
