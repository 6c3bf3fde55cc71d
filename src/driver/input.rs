/// On-screen rectangle of a presentation surface, in client units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Map a client-space click to stage pixels.
///
/// `max_width`/`max_height` are the surface's layout size (stage size times `scale`); the
/// displayed rect may be stretched away from it. Returns `None` for clicks left of or above
/// the surface and for degenerate sizes.
pub fn client_to_stage(
    client_x: f64,
    client_y: f64,
    rect: ClientRect,
    scale: u32,
    max_width: f64,
    max_height: f64,
) -> Option<(u32, u32)> {
    let scale = f64::from(scale.max(1));
    let sx = scale * (rect.width / max_width);
    let sy = scale * (rect.height / max_height);
    let x = ((client_x - rect.left) / sx).floor();
    let y = ((client_y - rect.top) / sy).floor();
    if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
        return None;
    }
    Some((x as u32, y as u32))
}

#[cfg(test)]
#[path = "../../tests/unit/driver/input.rs"]
mod tests;
