use std::collections::{HashMap, VecDeque};

use crate::foundation::error::{Pixel8Error, Pixel8Result};

/// Pack straight-alpha channels into a pixel.
pub fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_le_bytes([r, g, b, a])
}

/// Inverse of [`pack_rgba`].
pub fn unpack_rgba(px: u32) -> [u8; 4] {
    px.to_le_bytes()
}

pub fn alpha(px: u32) -> u8 {
    (px >> 24) as u8
}

/// A color as it appears in props: already packed, or a CSS-ish string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Color {
    Packed(u32),
    Css(String),
}

impl Color {
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::Packed(pack_rgba(r, g, b, a))
    }

    pub const TRANSPARENT: Color = Color::Packed(0);
}

impl From<u32> for Color {
    fn from(v: u32) -> Self {
        Self::Packed(v)
    }
}

impl From<&str> for Color {
    fn from(v: &str) -> Self {
        Self::Css(v.to_owned())
    }
}

impl From<String> for Color {
    fn from(v: String) -> Self {
        Self::Css(v)
    }
}

/// Parse a color string without caching.
///
/// Accepted: `#rgb`, `#rrggbb` (alpha forced opaque), `#rrggbbaa`, `rgb(r,g,b)`,
/// `rgba(r,g,b,a)` with `a` in `0..=1`, and `transparent`.
pub fn parse_color(input: &str) -> Pixel8Result<u32> {
    let s = input.trim();
    if s.eq_ignore_ascii_case("transparent") {
        return Ok(0);
    }
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| Pixel8Error::unsupported_color(input));
    }
    if s.starts_with("rgb") {
        return parse_rgb_fn(s).ok_or_else(|| Pixel8Error::unsupported_color(input));
    }
    Err(Pixel8Error::unsupported_color(input))
}

fn parse_hex(hex: &str) -> Option<u32> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let (r, g, b) = (nibble(0)?, nibble(1)?, nibble(2)?);
            Some(pack_rgba(r * 17, g * 17, b * 17, 0xff))
        }
        6 => Some(pack_rgba(byte(0)?, byte(2)?, byte(4)?, 0xff)),
        8 => Some(pack_rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_rgb_fn(s: &str) -> Option<u32> {
    let open = s.find('(')?;
    let close = s.rfind(')')?;
    if close < open {
        return None;
    }
    let name = s[..open].trim();
    if name != "rgb" && name != "rgba" {
        return None;
    }
    let parts = s[open + 1..close]
        .split(',')
        .map(|p| p.trim().parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;
    // Channels wrap into a byte; alpha is scaled then truncated.
    let channel = |v: f64| (v as i64 & 0xff) as u8;
    match parts.as_slice() {
        [r, g, b] => Some(pack_rgba(channel(*r), channel(*g), channel(*b), 0xff)),
        [r, g, b, a] => Some(pack_rgba(
            channel(*r),
            channel(*g),
            channel(*b),
            channel(a * 255.0),
        )),
        _ => None,
    }
}

/// Memoizing color resolver.
///
/// The cache is unbounded unless a limit is set, in which case the least recently used
/// string is evicted first.
#[derive(Debug, Default)]
pub struct ColorCodec {
    cache: HashMap<String, u32>,
    lru: VecDeque<String>,
    limit: Option<usize>,
}

impl ColorCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit: limit.filter(|&n| n > 0),
            ..Self::default()
        }
    }

    pub fn resolve(&mut self, color: &Color) -> Pixel8Result<u32> {
        match color {
            Color::Packed(v) => Ok(*v),
            Color::Css(s) => self.resolve_str(s),
        }
    }

    /// Resolve an optional color, treating absence as transparent.
    pub fn resolve_or_transparent(&mut self, color: Option<&Color>) -> Pixel8Result<u32> {
        color.map_or(Ok(0), |c| self.resolve(c))
    }

    pub fn resolve_str(&mut self, s: &str) -> Pixel8Result<u32> {
        if let Some(&v) = self.cache.get(s) {
            if self.limit.is_some() {
                self.touch(s);
            }
            return Ok(v);
        }
        let v = parse_color(s)?;
        if let Some(limit) = self.limit {
            while self.cache.len() >= limit {
                let Some(old) = self.lru.pop_front() else {
                    break;
                };
                self.cache.remove(&old);
            }
            self.lru.push_back(s.to_owned());
        }
        self.cache.insert(s.to_owned(), v);
        Ok(v)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    fn touch(&mut self, s: &str) {
        if let Some(pos) = self.lru.iter().position(|k| k == s)
            && let Some(k) = self.lru.remove(pos)
        {
            self.lru.push_back(k);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/codec.rs"]
mod tests;
