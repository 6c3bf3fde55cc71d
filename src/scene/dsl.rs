use std::rc::Rc;

use crate::color::codec::Color;
use crate::foundation::core::FrameInfo;
use crate::scene::node::{Key, Node, NodeKind};
use crate::scene::props::{
    ClickEvent, Func, Overflow, Position, PropValue, SpriteSource, TransitionValue,
};
use crate::text::layout::{Align, WhiteSpace};

impl Node {
    pub fn stage(width: u32, height: u32) -> Self {
        let mut n = Self::new(NodeKind::Stage);
        n.props.width = Some(f64::from(width));
        n.props.height = Some(f64::from(height));
        n
    }

    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(NodeKind::Rect).at(x, y).size(width, height)
    }

    /// Circle centered on `(x, y)`.
    pub fn circ(x: f64, y: f64, radius: f64) -> Self {
        let mut n = Self::new(NodeKind::Circ).at(x, y);
        n.props.radius = radius;
        n
    }

    pub fn pixel(x: f64, y: f64, color: impl Into<Color>) -> Self {
        Self::new(NodeKind::Pixel).at(x, y).color(color)
    }

    pub fn sprite(x: f64, y: f64, src: SpriteSource) -> Self {
        let mut n = Self::new(NodeKind::Sprite).at(x, y);
        n.props.src = Some(src);
        n
    }

    /// Sprite from packed pixels of a `width` x `height` image.
    pub fn sprite_pixels(x: f64, y: f64, width: u32, height: u32, pixels: Vec<u32>) -> Self {
        Self::sprite(x, y, SpriteSource::Pixels(Rc::from(pixels)))
            .size(f64::from(width), f64::from(height))
    }

    pub fn text(value: impl Into<String>) -> Self {
        let mut n = Self::new(NodeKind::Text);
        n.props.value = Some(value.into());
        n
    }

    /// Textbox whose single child is a `text` node holding `value`.
    pub fn textbox(x: f64, y: f64, width: f64, value: impl Into<String>) -> Self {
        let mut n = Self::new(NodeKind::Textbox).at(x, y);
        n.props.width = Some(width);
        n.child(Self::text(value))
    }

    pub fn transition(values: Vec<TransitionValue>) -> Self {
        let mut n = Self::new(NodeKind::Transition);
        n.props.values = values;
        n
    }

    pub fn callback(render: impl Fn(&FrameInfo) -> Node + 'static) -> Self {
        let mut n = Self::new(NodeKind::Callback);
        n.props.handlers.render = Some(Func(Rc::new(render)));
        n
    }

    /// List whose unkeyed children get their index as key.
    pub fn list(children: impl IntoIterator<Item = Node>) -> Self {
        let mut n = Self::new(NodeKind::List);
        n.children = children
            .into_iter()
            .enumerate()
            .map(|(i, mut c)| {
                if c.props.key.is_none() {
                    c.props.key = Some(Key::from(i));
                }
                c
            })
            .collect();
        n
    }

    pub fn nothing() -> Self {
        Self::new(NodeKind::Nothing)
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.props.x = x;
        self.props.y = y;
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.props.width = Some(width);
        self.props.height = Some(height);
        self
    }

    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.props.key = Some(key.into());
        self
    }

    pub fn fill(mut self, fill: impl Into<Color>) -> Self {
        self.props.fill = Some(fill.into());
        self
    }

    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.props.color = Some(color.into());
        self
    }

    pub fn background(mut self, background: impl Into<Color>) -> Self {
        self.props.background = Some(background.into());
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.props.radius = radius;
        self
    }

    pub fn border_radius(mut self, br: f64) -> Self {
        self.props.br = br;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.props.position = Position::Fixed;
        self
    }

    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.props.overflow = overflow;
        self
    }

    pub fn fps(mut self, fps: f64) -> Self {
        self.props.fps = Some(fps);
        self
    }

    pub fn scale(mut self, scale: u32) -> Self {
        self.props.scale = Some(scale);
        self
    }

    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.props.text.font = Some(font.into());
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.props.text.align = align;
        self
    }

    pub fn white_space(mut self, mode: WhiteSpace) -> Self {
        self.props.text.white_space = mode;
        self
    }

    pub fn padding(mut self, padding: f64) -> Self {
        self.props.text.padding = padding;
        self
    }

    pub fn scroll_top(mut self, scroll_top: f64) -> Self {
        self.props.text.scroll_top = scroll_top;
        self
    }

    /// Draw only glyphs `start..=end`.
    pub fn glyph_window(mut self, start: usize, end: Option<usize>) -> Self {
        self.props.text.start = start;
        self.props.text.end = end;
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn on_init(mut self, f: impl Fn() + 'static) -> Self {
        self.props.handlers.on_init = Some(Func(Rc::new(f)));
        self
    }

    pub fn on_update(mut self, f: impl Fn() + 'static) -> Self {
        self.props.handlers.on_update = Some(Func(Rc::new(f)));
        self
    }

    pub fn on_destroy(mut self, f: impl Fn() + 'static) -> Self {
        self.props.handlers.on_destroy = Some(Func(Rc::new(f)));
        self
    }

    pub fn on_click(mut self, f: impl Fn(&ClickEvent) + 'static) -> Self {
        self.props.handlers.on_click = Some(Func(Rc::new(f)));
        self
    }

    pub fn on_transition_start(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.props.handlers.on_transition_start = Some(Func(Rc::new(f)));
        self
    }

    pub fn on_transition_end(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.props.handlers.on_transition_end = Some(Func(Rc::new(f)));
        self
    }

    pub fn blend(mut self, f: impl Fn(u32, u32) -> u32 + 'static) -> Self {
        self.props.handlers.blend = Some(Func(Rc::new(f)));
        self
    }

    /// Set an animatable prop by name, ignoring unknown names.
    pub fn prop(mut self, name: &str, value: PropValue) -> Self {
        self.props.set(name, value);
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/dsl.rs"]
mod tests;
