use crate::color::codec::{alpha, pack_rgba, unpack_rgba};

/// Composite straight-alpha `src` over `dst`.
///
/// Opaque sources replace the destination and fully transparent sources leave it untouched.
/// Everything else goes through a single floating point round trip per channel.
pub fn composite_over(src: u32, dst: u32) -> u32 {
    match alpha(src) {
        0xff => return src,
        0 => return dst,
        _ => {}
    }
    let s = unpack_rgba(src);
    let d = unpack_rgba(dst);
    let sa = f64::from(s[3]) / 255.0;
    let da = f64::from(d[3]) / 255.0;
    let da_rest = da * (1.0 - sa);
    let oa = sa + da_rest;
    if oa <= 0.0 {
        return 0;
    }
    let ch = |i: usize| -> u8 {
        let v = (f64::from(s[i]) * sa + f64::from(d[i]) * da_rest) / oa;
        v.round().clamp(0.0, 255.0) as u8
    };
    let a = (oa * 255.0).round().clamp(0.0, 255.0) as u8;
    pack_rgba(ch(0), ch(1), ch(2), a)
}

#[cfg(test)]
#[path = "../../tests/unit/color/composite.rs"]
mod tests;
