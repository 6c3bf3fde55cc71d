use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::color::codec::unpack_rgba;
use crate::foundation::core::{FrameIndex, SurfaceId};
use crate::foundation::error::{Pixel8Error, Pixel8Result};
use crate::render::surface::FrameBuffer;

/// Nearest-neighbor upscale of a packed `width` x `height` buffer by an integer factor.
pub fn scale_nearest(src: &[u32], width: u32, height: u32, scale: u32) -> Vec<u32> {
    let scale = scale.max(1) as usize;
    let (w, h) = (width as usize, height as usize);
    if scale == 1 {
        return src.to_vec();
    }
    let out_w = w * scale;
    let mut out = Vec::with_capacity(out_w * h * scale);
    for row in src.chunks(w.max(1)).take(h) {
        let start = out.len();
        for &px in row {
            out.extend(std::iter::repeat_n(px, scale));
        }
        for _ in 1..scale {
            out.extend_from_within(start..start + out_w);
        }
    }
    out
}

/// A frame as handed to a presentation surface, already scaled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresentedFrame {
    pub frame: FrameIndex,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl PresentedFrame {
    pub fn from_buffer(frame: FrameIndex, buffer: &FrameBuffer, scale: u32) -> Self {
        let scale = scale.max(1);
        Self {
            frame,
            width: buffer.width() * scale,
            height: buffer.height() * scale,
            pixels: scale_nearest(buffer.screen(), buffer.width(), buffer.height(), scale),
        }
    }

    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&px| unpack_rgba(px)).collect()
    }
}

/// Destination for rendered frames.
///
/// Ordering contract: `present` is called with strictly increasing frame indices between
/// `begin` and `end`.
pub trait Presenter {
    /// Called once before the first frame.
    fn begin(&mut self, surface: SurfaceId) -> Pixel8Result<()> {
        let _ = surface;
        Ok(())
    }
    fn present(&mut self, frame: &PresentedFrame) -> Pixel8Result<()>;
    /// Called once when the loop stops, cancelled or not.
    fn end(&mut self) -> Pixel8Result<()> {
        Ok(())
    }
}

/// Keeps every presented frame. Useful in tests.
#[derive(Debug, Default)]
pub struct MemoryPresenter {
    surface: Option<SurfaceId>,
    frames: Vec<PresentedFrame>,
    ended: bool,
}

impl MemoryPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[PresentedFrame] {
        &self.frames
    }

    pub fn surface(&self) -> Option<SurfaceId> {
        self.surface
    }

    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl Presenter for MemoryPresenter {
    fn begin(&mut self, surface: SurfaceId) -> Pixel8Result<()> {
        self.surface = Some(surface);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn present(&mut self, frame: &PresentedFrame) -> Pixel8Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> Pixel8Result<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes `frame_00000.png`, `frame_00001.png`, ... into a directory.
#[derive(Debug)]
pub struct PngSequence {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl PngSequence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn frame_path(&self, frame: FrameIndex) -> PathBuf {
        self.dir.join(format!("frame_{:05}.png", frame.0))
    }
}

/// Encode one presented frame as a PNG file.
pub fn write_png(path: &Path, frame: &PresentedFrame) -> Pixel8Result<()> {
    if frame.width == 0 || frame.height == 0 {
        return Err(Pixel8Error::render(format!(
            "cannot write empty {}x{} frame",
            frame.width, frame.height
        )));
    }
    image::save_buffer_with_format(
        path,
        &frame.to_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

impl Presenter for PngSequence {
    fn begin(&mut self, _surface: SurfaceId) -> Pixel8Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        self.written.clear();
        Ok(())
    }

    fn present(&mut self, frame: &PresentedFrame) -> Pixel8Result<()> {
        let path = self.frame_path(frame.frame);
        write_png(&path, frame)?;
        tracing::debug!(path = %path.display(), "wrote frame");
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/present.rs"]
mod tests;
