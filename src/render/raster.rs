use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::color::codec::alpha;
use crate::color::composite::composite_over;
use crate::element::bounds::BoundingRect;
use crate::render::surface::FrameBuffer;
use crate::scene::props::BlendFn;

/// Visible columns of one row, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowSpan {
    pub start: i32,
    pub end: i32,
}

impl RowSpan {
    pub fn contains(self, col: i32) -> bool {
        col >= self.start && col <= self.end
    }
}

/// Length of the chord at distance `i` from the center of a circle of radius `r`.
pub fn chord(r: f64, i: f64) -> f64 {
    (r * r - i * i).max(0.0).sqrt() * 2.0
}

/// Per-row visible spans of a `w` x `h` box with rounded corners. `None` rows are fully
/// visible.
///
/// Rows are sampled at pixel centers, so the table is symmetric top/bottom and left/right.
/// A radius of `w / 2` on a square box yields a circle.
pub fn border_radius_skips(w: i32, h: i32, radius: i32) -> Vec<Option<RowSpan>> {
    let (w, h) = (w.max(0), h.max(0));
    let r = radius.clamp(0, w.min(h) / 2);
    let mut rows = vec![None; h as usize];
    let rf = f64::from(r);
    for row in 0..r {
        let dy = rf - f64::from(row) - 0.5;
        let inset = (rf - chord(rf, dy) / 2.0 - 0.5).ceil().max(0.0) as i32;
        if inset == 0 {
            continue;
        }
        let span = Some(RowSpan {
            start: inset,
            end: w - 1 - inset,
        });
        rows[row as usize] = span;
        rows[(h - 1 - row) as usize] = span;
    }
    rows
}

/// Placement of one shape in its parent's space.
#[derive(Clone, Copy, Debug, Default)]
pub struct RectSpec<'a> {
    /// Hitmap value to record; 0 records nothing.
    pub hit: u32,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub radius: i32,
    pub fixed: bool,
    pub blend: Option<&'a BlendFn>,
}

/// Source of the pixels written for each covered cell.
#[derive(Clone, Copy, Debug)]
pub enum Paint<'a> {
    Solid(u32),
    /// Row-major pixels with the shape's width as stride.
    Buffer(&'a [u32]),
}

/// Rounded-corner tables kept before the least recently used one is dropped.
const SKIP_CACHE_CAPACITY: usize = 64;

type SkipKey = (i32, i32, i32);

/// Software rasterizer. Holds the most recently used border-radius skip tables.
#[derive(Debug, Default)]
pub struct Raster {
    skips: HashMap<SkipKey, Rc<[Option<RowSpan>]>>,
    lru: VecDeque<SkipKey>,
}

impl Raster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip table for `(w, h, radius)`, or `None` when no corner is rounded.
    pub fn skips(&mut self, w: i32, h: i32, radius: i32) -> Option<Rc<[Option<RowSpan>]>> {
        let r = radius.clamp(0, w.max(0).min(h.max(0)) / 2);
        if r == 0 {
            return None;
        }
        let key = (w, h, r);
        if let Some(table) = self.skips.get(&key) {
            let table = Rc::clone(table);
            if let Some(pos) = self.lru.iter().position(|k| *k == key) {
                self.lru.remove(pos);
            }
            self.lru.push_back(key);
            return Some(table);
        }
        let table: Rc<[Option<RowSpan>]> = Rc::from(border_radius_skips(w, h, r));
        self.skips.insert(key, Rc::clone(&table));
        self.lru.push_back(key);
        while self.lru.len() > SKIP_CACHE_CAPACITY {
            if let Some(old) = self.lru.pop_front() {
                self.skips.remove(&old);
            }
        }
        Some(table)
    }

    pub fn cached_tables(&self) -> usize {
        self.skips.len()
    }

    /// Fill a (possibly rounded) rect with one color. Fully transparent fills are skipped
    /// unless a blend function decides.
    pub fn draw_rect(
        &mut self,
        fb: &mut FrameBuffer,
        spec: &RectSpec<'_>,
        fill: u32,
        parent: &BoundingRect,
        stage: &BoundingRect,
    ) {
        if spec.blend.is_none() && alpha(fill) == 0 {
            return;
        }
        self.draw(fb, spec, Paint::Solid(fill), parent, stage);
    }

    /// Copy `pixels` (row-major, `spec.w` wide) through the same pipeline as [`Self::draw_rect`].
    pub fn draw_buffer(
        &mut self,
        fb: &mut FrameBuffer,
        spec: &RectSpec<'_>,
        pixels: &[u32],
        parent: &BoundingRect,
        stage: &BoundingRect,
    ) {
        self.draw(fb, spec, Paint::Buffer(pixels), parent, stage);
    }

    fn draw(
        &mut self,
        fb: &mut FrameBuffer,
        spec: &RectSpec<'_>,
        paint: Paint<'_>,
        parent: &BoundingRect,
        stage: &BoundingRect,
    ) {
        if spec.w <= 0 || spec.h <= 0 {
            return;
        }
        let skips = self.skips(spec.w, spec.h, spec.radius);
        let skips = skips.as_deref().unwrap_or_default();
        let (sw, sh) = (fb.width() as i32, fb.height() as i32);
        let (screen, hitmap) = fb.planes_mut();

        for row in 0..spec.h {
            let span = skips.get(row as usize).copied().flatten();
            for col in 0..spec.w {
                if span.is_some_and(|s| !s.contains(col)) {
                    continue;
                }
                let src = match paint {
                    Paint::Solid(c) => c,
                    Paint::Buffer(px) => {
                        let i = row as usize * spec.w as usize + col as usize;
                        match px.get(i) {
                            Some(&c) => c,
                            None => continue,
                        }
                    }
                };
                if spec.blend.is_none() && alpha(src) == 0 {
                    continue;
                }
                // Columns are independent: repeat folding is not monotonic.
                let Some(idx) = target_index(spec, parent, stage, sw, sh, col, row) else {
                    continue;
                };
                let dst = screen[idx];
                screen[idx] = match spec.blend {
                    Some(blend) => blend(src, dst),
                    None if alpha(src) == 0xff => src,
                    None => composite_over(src, dst),
                };
                if spec.hit != 0 && !spec.fixed {
                    hitmap[idx] = spec.hit;
                }
            }
        }
    }
}

fn target_index(
    spec: &RectSpec<'_>,
    parent: &BoundingRect,
    stage: &BoundingRect,
    sw: i32,
    sh: i32,
    col: i32,
    row: i32,
) -> Option<usize> {
    let (mut x, mut y) =
        parent.place(spec.x.saturating_add(col), spec.y.saturating_add(row), spec.fixed);
    if let Some(clip) = parent.clip
        && !clip.contains(x, y)
    {
        return None;
    }
    if stage.repeat && sw > 0 && sh > 0 {
        x = x.rem_euclid(sw);
        y = y.rem_euclid(sh);
    }
    if x < 0 || y < 0 || x >= sw || y >= sh {
        return None;
    }
    Some(y as usize * sw as usize + x as usize)
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
