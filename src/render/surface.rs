use crate::color::codec::unpack_rgba;

/// Screen pixels plus the parallel hitmap, both `width * height` packed words.
///
/// Hitmap entries hold [`crate::element::tree::ElementId::hit_value`] of the element that last
/// wrote the pixel, or 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    screen: Vec<u32>,
    hitmap: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            screen: vec![0; len],
            hitmap: vec![0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reallocate both buffers when the size changed. Returns whether it did.
    pub fn resize_if_needed(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        tracing::debug!(
            from_w = self.width,
            from_h = self.height,
            width,
            height,
            "resize frame buffer"
        );
        *self = Self::new(width, height);
        true
    }

    /// Fill the screen with `background` and forget every hit.
    pub fn clear(&mut self, background: u32) {
        self.screen.fill(background);
        self.hitmap.fill(0);
    }

    pub fn screen(&self) -> &[u32] {
        &self.screen
    }

    pub fn hitmap(&self) -> &[u32] {
        &self.hitmap
    }

    pub(crate) fn planes_mut(&mut self) -> (&mut [u32], &mut [u32]) {
        (&mut self.screen, &mut self.hitmap)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.index(x, y).map(|i| self.screen[i])
    }

    pub fn hit(&self, x: u32, y: u32) -> Option<u32> {
        self.index(x, y).map(|i| self.hitmap[i])
    }

    /// Straight-alpha RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.screen.iter().flat_map(|&px| unpack_rgba(px)).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
