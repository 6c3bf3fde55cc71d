use std::collections::HashMap;
use std::rc::Rc;

use crate::color::codec::{pack_rgba, unpack_rgba};
use crate::foundation::error::{Pixel8Error, Pixel8Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhiteSpace {
    /// Collapse space runs and wrap greedily at the box width.
    #[default]
    Normal,
    /// Keep spacing, break only at newlines.
    Pre,
    /// Collapse space runs, break only at newlines.
    Nowrap,
}

/// Region of a font atlas in atlas pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One glyph: where to copy from in the atlas and where to put it relative to the text origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphPlacement {
    pub source: AtlasRect,
    pub dest_x: i32,
    pub dest_y: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextLayout {
    pub glyphs: Vec<GlyphPlacement>,
    pub line_height: u32,
    pub lines: u32,
}

impl TextLayout {
    pub fn height(&self) -> u32 {
        self.lines * self.line_height
    }
}

/// Inputs of a layout pass. `width == 0` disables width wrapping.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutRequest<'a> {
    pub text: &'a str,
    pub width: u32,
    pub align: Align,
    pub white_space: WhiteSpace,
    pub letter_spacing: f64,
    pub line_height: f64,
    pub tab_size: u32,
}

/// Glyph layout service used by `textbox` elements.
pub trait GlyphLayout {
    fn layout(&self, req: &LayoutRequest<'_>) -> TextLayout;
}

/// Packed pixels glyphs are copied from.
#[derive(Clone, Debug)]
pub struct FontAtlas {
    pub width: u32,
    pub height: u32,
    pub pixels: Rc<[u32]>,
}

impl FontAtlas {
    pub fn new(width: u32, height: u32, pixels: Rc<[u32]>) -> Pixel8Result<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(Pixel8Error::asset(format!(
                "font atlas is {width}x{height} but has {} pixels",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Copy `rect` out of the atlas, replacing each covered pixel's color with `tint`.
    ///
    /// Coverage is the atlas alpha scaled by the tint alpha. Out-of-atlas cells are empty.
    pub fn tinted_region(&self, rect: AtlasRect, tint: u32) -> Vec<u32> {
        let [tr, tg, tb, ta] = unpack_rgba(tint);
        let mut out = Vec::with_capacity((rect.width as usize) * (rect.height as usize));
        for row in 0..rect.height {
            for col in 0..rect.width {
                let (x, y) = (rect.x + col, rect.y + row);
                let src = if x < self.width && y < self.height {
                    self.pixels[(y as usize) * (self.width as usize) + x as usize]
                } else {
                    0
                };
                let a = (u32::from(unpack_rgba(src)[3]) * u32::from(ta) + 127) / 255;
                out.push(if a == 0 {
                    0
                } else {
                    pack_rgba(tr, tg, tb, a as u8)
                });
            }
        }
        out
    }
}

/// A named font: atlas pixels plus the layout service that indexes them.
#[derive(Clone)]
pub struct Font {
    pub atlas: FontAtlas,
    pub layout: Rc<dyn GlyphLayout>,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("atlas_width", &self.atlas.width)
            .field("atlas_height", &self.atlas.height)
            .finish_non_exhaustive()
    }
}

pub const DEFAULT_FONT: &str = "pixel8 mono";

/// Fonts addressable from the `font` prop. Always contains [`DEFAULT_FONT`].
#[derive(Clone, Debug)]
pub struct FontRegistry {
    fonts: HashMap<String, Font>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        let mut fonts = HashMap::new();
        fonts.insert(DEFAULT_FONT.to_owned(), MonospaceFont::builtin());
        Self { fonts }
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, font: Font) {
        self.fonts.insert(name.into(), font);
    }

    pub fn get(&self, name: Option<&str>) -> Pixel8Result<&Font> {
        let name = name.unwrap_or(DEFAULT_FONT);
        self.fonts
            .get(name)
            .ok_or_else(|| Pixel8Error::validation(format!("unknown font '{name}'")))
    }
}

/// Fixed-cell font laid out as a single row of glyph cells in its atlas.
#[derive(Clone, Debug)]
pub struct MonospaceFont {
    charset: Vec<char>,
    cell_width: u32,
    cell_height: u32,
    gap: u32,
    line_height: u32,
    fallback: Option<usize>,
}

impl MonospaceFont {
    pub fn new(
        charset: &str,
        cell_width: u32,
        cell_height: u32,
        gap: u32,
        line_height: u32,
    ) -> Self {
        let charset: Vec<char> = charset.chars().collect();
        let fallback = charset.iter().position(|&c| c == '?');
        Self {
            charset,
            cell_width,
            cell_height,
            gap,
            line_height,
            fallback,
        }
    }

    /// The 3x5 uppercase font bundled with the crate. Lowercase input renders as uppercase.
    pub fn builtin() -> Font {
        let charset: String = BUILTIN_GLYPHS.iter().map(|(c, _)| *c).collect();
        let cells = BUILTIN_GLYPHS.len() as u32;
        let (w, h) = (3u32, 5u32);
        let mut pixels = vec![0u32; (cells * w * h) as usize];
        for (i, (_, rows)) in BUILTIN_GLYPHS.iter().enumerate() {
            for (y, row) in rows.iter().enumerate() {
                for (x, b) in row.bytes().enumerate() {
                    if b == b'#' {
                        let idx = y * (cells * w) as usize + i * w as usize + x;
                        pixels[idx] = 0xffff_ffff;
                    }
                }
            }
        }
        Font {
            atlas: FontAtlas {
                width: cells * w,
                height: h,
                pixels: Rc::from(pixels),
            },
            layout: Rc::new(Self::new(&charset, w, h, 1, h + 1)),
        }
    }

    fn cell(&self, c: char) -> Option<usize> {
        let upper = c.to_ascii_uppercase();
        self.charset
            .iter()
            .position(|&k| k == c)
            .or_else(|| self.charset.iter().position(|&k| k == upper))
            .or(self.fallback)
    }

    fn lines(&self, req: &LayoutRequest<'_>) -> Vec<String> {
        let tab = " ".repeat(req.tab_size as usize);
        let advance = f64::from(self.cell_width + self.gap) + req.letter_spacing;
        let max_chars = if req.width == 0 || advance <= 0.0 {
            usize::MAX
        } else {
            ((f64::from(req.width) + f64::from(self.gap)) / advance)
                .floor()
                .max(1.0) as usize
        };
        let mut out = Vec::new();
        for raw in req.text.replace('\t', &tab).split('\n') {
            match req.white_space {
                WhiteSpace::Pre => out.push(raw.to_owned()),
                WhiteSpace::Nowrap => out.push(collapse(raw)),
                WhiteSpace::Normal => wrap_greedy(&collapse(raw), max_chars, &mut out),
            }
        }
        out
    }
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn wrap_greedy(line: &str, max_chars: usize, out: &mut Vec<String>) {
    let mut cur = String::new();
    for word in line.split(' ') {
        let mut word: Vec<char> = word.chars().collect();
        let cur_len = cur.chars().count();
        let sep = usize::from(cur_len > 0);
        if cur_len + sep + word.len() <= max_chars {
            if sep == 1 {
                cur.push(' ');
            }
            cur.extend(word);
            continue;
        }
        if cur_len > 0 {
            out.push(std::mem::take(&mut cur));
        }
        while word.len() > max_chars {
            let rest = word.split_off(max_chars);
            out.push(word.into_iter().collect());
            word = rest;
        }
        cur.extend(word);
    }
    out.push(cur);
}

impl GlyphLayout for MonospaceFont {
    fn layout(&self, req: &LayoutRequest<'_>) -> TextLayout {
        let lines = self.lines(req);
        let advance = f64::from(self.cell_width + self.gap) + req.letter_spacing;
        let line_height = (f64::from(self.line_height) * req.line_height).max(0.0) as u32;
        let line_px = |n: usize| -> i32 {
            if n == 0 {
                0
            } else {
                ((n - 1) as f64 * advance) as i32 + self.cell_width as i32
            }
        };
        let box_width = if req.width > 0 {
            req.width as i32
        } else {
            lines
                .iter()
                .map(|l| line_px(l.chars().count()))
                .max()
                .unwrap_or(0)
        };

        let mut glyphs = Vec::new();
        for (row, line) in lines.iter().enumerate() {
            let offset = match req.align {
                Align::Left => 0,
                Align::Center => (box_width - line_px(line.chars().count())) / 2,
                Align::Right => box_width - line_px(line.chars().count()),
            };
            for (col, c) in line.chars().enumerate() {
                if c == ' ' {
                    continue;
                }
                let Some(cell) = self.cell(c) else {
                    continue;
                };
                glyphs.push(GlyphPlacement {
                    source: AtlasRect {
                        x: cell as u32 * self.cell_width,
                        y: 0,
                        width: self.cell_width,
                        height: self.cell_height,
                    },
                    dest_x: offset + (col as f64 * advance) as i32,
                    dest_y: row as i32 * line_height as i32,
                });
            }
        }
        TextLayout {
            glyphs,
            line_height,
            lines: lines.len() as u32,
        }
    }
}

const BUILTIN_GLYPHS: &[(char, [&str; 5])] = &[
    (' ', ["...", "...", "...", "...", "..."]),
    ('0', ["###", "#.#", "#.#", "#.#", "###"]),
    ('1', [".#.", "##.", ".#.", ".#.", "###"]),
    ('2', ["###", "..#", "###", "#..", "###"]),
    ('3', ["###", "..#", ".##", "..#", "###"]),
    ('4', ["#.#", "#.#", "###", "..#", "..#"]),
    ('5', ["###", "#..", "###", "..#", "###"]),
    ('6', ["###", "#..", "###", "#.#", "###"]),
    ('7', ["###", "..#", "..#", ".#.", ".#."]),
    ('8', ["###", "#.#", "###", "#.#", "###"]),
    ('9', ["###", "#.#", "###", "..#", "###"]),
    ('A', [".#.", "#.#", "###", "#.#", "#.#"]),
    ('B', ["##.", "#.#", "##.", "#.#", "##."]),
    ('C', [".##", "#..", "#..", "#..", ".##"]),
    ('D', ["##.", "#.#", "#.#", "#.#", "##."]),
    ('E', ["###", "#..", "##.", "#..", "###"]),
    ('F', ["###", "#..", "##.", "#..", "#.."]),
    ('G', [".##", "#..", "#.#", "#.#", ".##"]),
    ('H', ["#.#", "#.#", "###", "#.#", "#.#"]),
    ('I', ["###", ".#.", ".#.", ".#.", "###"]),
    ('J', ["..#", "..#", "..#", "#.#", ".#."]),
    ('K', ["#.#", "#.#", "##.", "#.#", "#.#"]),
    ('L', ["#..", "#..", "#..", "#..", "###"]),
    ('M', ["#.#", "###", "###", "#.#", "#.#"]),
    ('N', ["##.", "#.#", "#.#", "#.#", "#.#"]),
    ('O', [".#.", "#.#", "#.#", "#.#", ".#."]),
    ('P', ["##.", "#.#", "##.", "#..", "#.."]),
    ('Q', [".#.", "#.#", "#.#", "##.", ".##"]),
    ('R', ["##.", "#.#", "##.", "#.#", "#.#"]),
    ('S', [".##", "#..", ".#.", "..#", "##."]),
    ('T', ["###", ".#.", ".#.", ".#.", ".#."]),
    ('U', ["#.#", "#.#", "#.#", "#.#", "###"]),
    ('V', ["#.#", "#.#", "#.#", "#.#", ".#."]),
    ('W', ["#.#", "#.#", "###", "###", "#.#"]),
    ('X', ["#.#", "#.#", ".#.", "#.#", "#.#"]),
    ('Y', ["#.#", "#.#", ".#.", ".#.", ".#."]),
    ('Z', ["###", "..#", ".#.", "#..", "###"]),
    ('.', ["...", "...", "...", "...", ".#."]),
    (',', ["...", "...", "...", ".#.", "#.."]),
    ('!', [".#.", ".#.", ".#.", "...", ".#."]),
    ('?', ["##.", "..#", ".#.", "...", ".#."]),
    ('-', ["...", "...", "###", "...", "..."]),
    (':', ["...", ".#.", "...", ".#.", "..."]),
    ('\'', [".#.", ".#.", "...", "...", "..."]),
    ('/', ["..#", "..#", ".#.", "#..", "#.."]),
    ('+', ["...", ".#.", "###", ".#.", "..."]),
    ('=', ["...", "###", "...", "###", "..."]),
    ('(', [".#.", "#..", "#..", "#..", ".#."]),
    (')', [".#.", "..#", "..#", "..#", ".#."]),
];

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
