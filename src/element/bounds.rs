use crate::element::state::ElementState;
use crate::element::tree::{Element, ElementId, ElementTree};
use crate::scene::node::NodeKind;
use crate::scene::props::{Overflow, Position, Props};

/// An element's own box in its parent's coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocalBox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub repeat: bool,
    pub mask: bool,
    pub fixed: bool,
}

/// Half-open clip region in stage pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl ClipRect {
    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    pub fn intersect(self, other: ClipRect) -> ClipRect {
        ClipRect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }
}

/// Resolved box in stage coordinates. Recomputed every draw pass.
///
/// `clip` accumulates every `overflow: hidden` ancestor including this box itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub repeat: bool,
    pub mask: bool,
    pub fixed: bool,
    pub clip: Option<ClipRect>,
}

/// Fold `v` into `origin..origin + size`. Sizes <= 0 leave `v` alone.
pub fn wrap(v: i32, origin: i32, size: i32) -> i32 {
    if size <= 0 {
        return v;
    }
    let (v, origin, size) = (i64::from(v), i64::from(origin), i64::from(size));
    let folded = origin + (v - origin).rem_euclid(size);
    folded.clamp(i32::MIN.into(), i32::MAX.into()) as i32
}

impl BoundingRect {
    /// The coordinate-space terminus: always at the origin with the stage's size.
    pub fn stage(width: u32, height: u32, overflow: Overflow) -> Self {
        let (w, h) = (width as i32, height as i32);
        let mask = overflow == Overflow::Hidden;
        Self {
            x: 0,
            y: 0,
            w,
            h,
            repeat: overflow == Overflow::Repeat,
            mask,
            fixed: false,
            clip: mask.then_some(ClipRect {
                x0: 0,
                y0: 0,
                x1: w,
                y1: h,
            }),
        }
    }

    /// Stage position of a point given in this box's space. Fixed points are already absolute.
    pub fn place(&self, x: i32, y: i32, fixed: bool) -> (i32, i32) {
        if fixed {
            (x, y)
        } else if self.repeat {
            (
                wrap(self.x.saturating_add(x), self.x, self.w),
                wrap(self.y.saturating_add(y), self.y, self.h),
            )
        } else {
            (self.x.saturating_add(x), self.y.saturating_add(y))
        }
    }

    /// Box of a child whose own box is `local`, with `self` as the parent box.
    /// Structural children (`None`) inherit the parent box unchanged.
    pub fn resolve(&self, local: Option<LocalBox>) -> BoundingRect {
        let Some(l) = local else {
            return *self;
        };
        let (x, y) = self.place(l.x, l.y, l.fixed);
        let own = ClipRect {
            x0: x,
            y0: y,
            x1: x.saturating_add(l.w),
            y1: y.saturating_add(l.h),
        };
        let clip = match (self.clip, l.mask) {
            (Some(c), true) => Some(c.intersect(own)),
            (None, true) => Some(own),
            (c, false) => c,
        };
        BoundingRect {
            x,
            y,
            w: l.w,
            h: l.h,
            repeat: l.repeat,
            mask: l.mask,
            fixed: l.fixed,
            clip,
        }
    }
}

fn flags(props: &Props) -> (bool, bool, bool) {
    (
        props.overflow == Overflow::Repeat,
        props.overflow == Overflow::Hidden,
        props.position == Position::Fixed,
    )
}

/// Width and height a sprite draws at: explicit props, else the decoded image size, else a
/// height derived from the pixel count.
pub(crate) fn sprite_size(props: &Props, state: &ElementState) -> (i32, i32) {
    let (natural, len) = match state {
        ElementState::Sprite(s) => (s.natural, s.pixels.len()),
        _ => (None, 0),
    };
    match (props.width, props.height, natural) {
        (Some(w), Some(h), _) => (w as i32, h as i32),
        (w, h, Some((nw, nh))) => (
            w.map_or(nw as i32, |v| v as i32),
            h.map_or(nh as i32, |v| v as i32),
        ),
        (Some(w), None, None) if w >= 1.0 => (w as i32, (len / w as usize) as i32),
        _ => (0, 0),
    }
}

/// The element's own box, or `None` for kinds that pass their parent's box through.
pub(crate) fn local_box(el: &Element, props: &Props) -> Option<LocalBox> {
    let (repeat, mask, fixed) = flags(props);
    let (x, y) = (props.x as i32, props.y as i32);
    let (x, y, w, h) = match el.kind() {
        NodeKind::Stage
        | NodeKind::Text
        | NodeKind::Transition
        | NodeKind::Callback
        | NodeKind::List
        | NodeKind::Nothing => return None,
        NodeKind::Rect => (
            x,
            y,
            props.width.unwrap_or(0.0) as i32,
            props.height.unwrap_or(0.0) as i32,
        ),
        NodeKind::Circ => {
            let r = props.radius as i32;
            let d = r.saturating_mul(2);
            (x.saturating_sub(r), y.saturating_sub(r), d, d)
        }
        NodeKind::Pixel => (x, y, 1, 1),
        NodeKind::Sprite => {
            let (w, h) = sprite_size(props, &el.state);
            (x, y, w, h)
        }
        NodeKind::Textbox => {
            let pad = (props.text.padding * 2.0) as i32;
            let layout_h = match &el.state {
                ElementState::Textbox(tb) => tb.layout.height() as i32,
                _ => 0,
            };
            (
                x,
                y,
                props.width.unwrap_or(0.0) as i32,
                props.height.map_or(layout_h.saturating_add(pad), |v| v as i32),
            )
        }
    };
    Some(LocalBox {
        x,
        y,
        w,
        h,
        repeat,
        mask,
        fixed,
    })
}

impl ElementTree {
    /// Stage box of the current root, if the root is a stage.
    pub fn stage_box(&self) -> Option<BoundingRect> {
        let root = self.get(self.root()?)?;
        if root.kind() != NodeKind::Stage {
            return None;
        }
        let p = root.props();
        Some(BoundingRect::stage(
            p.width.unwrap_or(0.0).max(0.0) as u32,
            p.height.unwrap_or(0.0).max(0.0) as u32,
            p.overflow,
        ))
    }

    /// Box an element hands to its children, resolved through every ancestor on demand.
    pub fn resolved_box(&self, id: ElementId) -> Option<BoundingRect> {
        let mut chain = vec![id];
        let mut cur = id;
        while let Some(parent) = self.get(cur)?.parent() {
            chain.push(parent);
            cur = parent;
        }
        if Some(cur) != self.root() {
            return None;
        }
        let mut bounds = self.stage_box()?;
        for &el_id in chain.iter().rev() {
            let el = self.get(el_id)?;
            let props = self.effective_props(el_id)?;
            bounds = bounds.resolve(local_box(el, &props));
        }
        Some(bounds)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/element/bounds.rs"]
mod tests;
