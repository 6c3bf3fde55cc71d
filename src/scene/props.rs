use std::fmt;
use std::ops::Deref;
use std::path::PathBuf;
use std::rc::Rc;

use crate::animation::ease::Ease;
use crate::color::codec::Color;
use crate::foundation::core::FrameInfo;
use crate::scene::node::{Key, Node};
use crate::text::layout::{Align, WhiteSpace};

/// Shared function-valued prop. Cloning shares the closure.
pub struct Func<F: ?Sized>(pub Rc<F>);

impl<F: ?Sized> Clone for Func<F> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<F: ?Sized> fmt::Debug for Func<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<fn>")
    }
}

impl<F: ?Sized> Deref for Func<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.0
    }
}

impl<F: ?Sized> Func<F> {
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

pub type Hook = Func<dyn Fn()>;
pub type ClickHook = Func<dyn Fn(&ClickEvent)>;
pub type TransitionHook = Func<dyn Fn(&str)>;
pub type RenderFn = Func<dyn Fn(&FrameInfo) -> Node>;
pub type BlendFn = Func<dyn Fn(u32, u32) -> u32>;
pub type ApplyFn = Func<dyn Fn(f64, &PropValue, &PropValue) -> PropValue>;

/// Stage-space pointer click delivered to `on_click`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClickEvent {
    pub x: u32,
    pub y: u32,
}

/// Lifecycle and behavior callbacks. Absent hooks are no-ops.
#[derive(Clone, Debug, Default)]
pub struct Handlers {
    pub on_init: Option<Hook>,
    pub on_update: Option<Hook>,
    pub on_destroy: Option<Hook>,
    pub on_click: Option<ClickHook>,
    pub on_transition_start: Option<TransitionHook>,
    pub on_transition_end: Option<TransitionHook>,
    /// Callback nodes: produces the single synthetic child each update.
    pub render: Option<RenderFn>,
    /// Custom pixel write `(src, dst) -> out`; bypasses the transparent-fill skip.
    pub blend: Option<BlendFn>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Static,
    Fixed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Repeat,
}

/// Pixels for a `sprite`: packed, encoded image bytes, or a file to decode.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpriteSource {
    Pixels(Rc<[u32]>),
    Encoded(Rc<[u8]>),
    Path(PathBuf),
}

impl SpriteSource {
    /// Identity check used to decide whether a sprite needs re-decoding.
    pub fn same_as(&self, other: &SpriteSource) -> bool {
        match (self, other) {
            (Self::Pixels(a), Self::Pixels(b)) => Rc::ptr_eq(a, b) || a == b,
            (Self::Encoded(a), Self::Encoded(b)) => Rc::ptr_eq(a, b) || a == b,
            (Self::Path(a), Self::Path(b)) => a == b,
            _ => false,
        }
    }
}

/// Textbox layout props.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextProps {
    pub align: Align,
    pub font: Option<String>,
    pub letter_spacing: f64,
    pub line_height: f64,
    pub padding: f64,
    pub scroll_top: f64,
    pub tab_size: u32,
    pub white_space: WhiteSpace,
    /// First glyph index drawn.
    pub start: usize,
    /// Last glyph index drawn, inclusive.
    pub end: Option<usize>,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            align: Align::Left,
            font: None,
            letter_spacing: 0.0,
            line_height: 1.0,
            padding: 0.0,
            scroll_top: 0.0,
            tab_size: 2,
            white_space: WhiteSpace::Normal,
            start: 0,
            end: None,
        }
    }
}

/// A prop value a transition can interpolate.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Number(f64),
    Color(Color),
}

impl PropValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Color(_) => None,
        }
    }
}

/// One animated prop of every child of a `transition` node.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionValue {
    pub prop: String,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub ease: Ease,
    #[serde(default)]
    pub delay: u32,
    /// Custom interpolation `(t, from, to)`; numbers round-lerp without one.
    #[serde(skip)]
    pub apply: Option<ApplyFn>,
}

fn default_duration() -> u32 {
    1
}

impl TransitionValue {
    pub fn new(prop: impl Into<String>, duration: u32) -> Self {
        Self {
            prop: prop.into(),
            duration: duration.max(1),
            ease: Ease::Linear,
            delay: 0,
            apply: None,
        }
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn delay(mut self, delay: u32) -> Self {
        self.delay = delay;
        self
    }

    pub fn apply(mut self, f: impl Fn(f64, &PropValue, &PropValue) -> PropValue + 'static) -> Self {
        self.apply = Some(Func(Rc::new(f)));
        self
    }
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Props {
    pub key: Option<Key>,
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub radius: f64,
    /// Border radius of a rect.
    pub br: f64,
    pub fill: Option<Color>,
    /// Pixel color, or the tint of textbox glyphs.
    pub color: Option<Color>,
    /// Stage clear color.
    pub background: Option<Color>,
    pub position: Position,
    pub overflow: Overflow,
    pub fps: Option<f64>,
    pub scale: Option<u32>,
    pub src: Option<SpriteSource>,
    /// Content of a `text` node.
    pub value: Option<String>,
    #[serde(flatten)]
    pub text: TextProps,
    /// Animated props of a `transition` node.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<TransitionValue>,
    #[serde(skip)]
    pub handlers: Handlers,
}

impl Props {
    /// Read an animatable prop by its scene name.
    pub fn get(&self, name: &str) -> Option<PropValue> {
        let num = PropValue::Number;
        Some(match name {
            "x" => num(self.x),
            "y" => num(self.y),
            "width" => num(self.width?),
            "height" => num(self.height?),
            "radius" => num(self.radius),
            "br" => num(self.br),
            "padding" => num(self.text.padding),
            "scrollTop" => num(self.text.scroll_top),
            "letterSpacing" => num(self.text.letter_spacing),
            "lineHeight" => num(self.text.line_height),
            "fill" => PropValue::Color(self.fill.clone()?),
            "color" => PropValue::Color(self.color.clone()?),
            "background" => PropValue::Color(self.background.clone()?),
            _ => return None,
        })
    }

    /// Overwrite an animatable prop. Returns false for unknown names or mismatched values.
    pub fn set(&mut self, name: &str, value: PropValue) -> bool {
        match (name, value) {
            ("x", PropValue::Number(v)) => self.x = v,
            ("y", PropValue::Number(v)) => self.y = v,
            ("width", PropValue::Number(v)) => self.width = Some(v),
            ("height", PropValue::Number(v)) => self.height = Some(v),
            ("radius", PropValue::Number(v)) => self.radius = v,
            ("br", PropValue::Number(v)) => self.br = v,
            ("padding", PropValue::Number(v)) => self.text.padding = v,
            ("scrollTop", PropValue::Number(v)) => self.text.scroll_top = v,
            ("letterSpacing", PropValue::Number(v)) => self.text.letter_spacing = v,
            ("lineHeight", PropValue::Number(v)) => self.text.line_height = v,
            ("fill", PropValue::Color(c)) => self.fill = Some(c),
            ("color", PropValue::Color(c)) => self.color = Some(c),
            ("background", PropValue::Color(c)) => self.background = Some(c),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/props.rs"]
mod tests;
