//! Unclamped RGB output buffer

use crate::Result;
use crate::rays::Viewport;
use glam::Vec3;
use image::{Rgba, RgbaImage};
use std::path::Path;

/// One linear RGB triple per pixel, row 0 at the top. Values are whatever
/// the shader produced; nothing is clamped until [`Framebuffer::to_rgba_image`].
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    viewport: Viewport,
    pixels: Vec<Vec3>,
}

impl Framebuffer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            pixels: vec![Vec3::ZERO; viewport.pixel_count()],
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn width(&self) -> u32 {
        self.viewport.width()
    }

    pub fn height(&self) -> u32 {
        self.viewport.height()
    }

    /// Reallocate for a new viewport, clearing to black
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            *self = Self::new(viewport);
        }
    }

    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Vec3] {
        &mut self.pixels
    }

    pub fn get(&self, column: u32, row: u32) -> Option<Vec3> {
        if column >= self.width() || row >= self.height() {
            return None;
        }
        self.pixels
            .get(row as usize * self.width() as usize + column as usize)
            .copied()
    }

    /// Clamp to `[0, 1]` and quantize to 8 bits per channel
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            let color = self.get(x, y).unwrap_or(Vec3::ZERO);
            let [r, g, b] = color
                .clamp(Vec3::ZERO, Vec3::ONE)
                .to_array()
                .map(|c| (c * 255.0).round() as u8);
            Rgba([r, g, b, 255])
        })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.to_rgba_image().save(path)?;
        tracing::info!(path = %path.display(), width = self.width(), height = self.height(), "wrote frame");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_only_on_export() {
        let mut fb = Framebuffer::new(Viewport::new(2, 1).unwrap());
        fb.pixels_mut()[0] = Vec3::new(2.0, 1.0, -0.5);
        fb.pixels_mut()[1] = Vec3::new(0.5, 0.0, 1.0);

        assert_eq!(fb.get(0, 0), Some(Vec3::new(2.0, 1.0, -0.5)));

        let image = fb.to_rgba_image();
        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 255, 0, 255]));
        assert_eq!(image.get_pixel(1, 0), &Rgba([128, 0, 255, 255]));
    }

    #[test]
    fn out_of_range_lookup_is_none() {
        let fb = Framebuffer::new(Viewport::new(3, 2).unwrap());
        assert_eq!(fb.get(2, 1), Some(Vec3::ZERO));
        assert_eq!(fb.get(3, 0), None);
        assert_eq!(fb.get(0, 2), None);
    }

    #[test]
    fn resize_clears() {
        let mut fb = Framebuffer::new(Viewport::new(2, 2).unwrap());
        fb.pixels_mut().fill(Vec3::ONE);
        fb.resize(Viewport::new(4, 1).unwrap());
        assert_eq!(fb.pixels().len(), 4);
        assert!(fb.pixels().iter().all(|p| *p == Vec3::ZERO));
    }

    #[test]
    fn save_png_writes_file() {
        let path = std::env::temp_dir().join(format!("metaball_fb_{}.png", std::process::id()));
        let fb = Framebuffer::new(Viewport::new(4, 4).unwrap());
        fb.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.width(), 4);
        std::fs::remove_file(&path).unwrap();
    }
}
