//! Building silhouette mask.
//!
//! Only the alpha channel of the skyline image matters: alpha > 0 is
//! building, alpha == 0 is open sky.  The mask's dimensions define the
//! canvas size for the whole scene.

use std::path::Path;

use image::RgbaImage;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::error::SceneError;

/// Fill colour of building pixels.
pub const SILHOUETTE_COLOR: Color = Color::rgb(10.0, 10.0, 30.0);

#[derive(Clone, Debug)]
pub struct SkylineMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl SkylineMask {
    /// Load and decode a mask image.  A missing or unreadable file is fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let img = image::open(path)?.to_rgba8();
        Self::from_image(&img)
    }

    pub fn from_image(img: &RgbaImage) -> Result<Self, SceneError> {
        let alpha = img.pixels().map(|p| p.0[3]).collect();
        Self::from_alpha(img.width(), img.height(), alpha)
    }

    /// Build a mask straight from an alpha plane, row-major.
    pub fn from_alpha(width: u32, height: u32, alpha: Vec<u8>) -> Result<Self, SceneError> {
        if width == 0 || height == 0 || alpha.len() != (width * height) as usize {
            return Err(SceneError::EmptyMask);
        }
        Ok(SkylineMask { width, height, alpha })
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    /// Alpha at `(x, y)`; out-of-bounds reads as sky.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.alpha[(y * self.width + x) as usize]
    }

    pub fn is_building(&self, x: u32, y: u32) -> bool {
        self.alpha_at(x, y) > 0
    }

    pub fn is_sky(&self, x: u32, y: u32) -> bool {
        !self.is_building(x, y)
    }

    /// Paint every building pixel, one horizontal run at a time.
    pub fn draw_silhouette<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for y in 0..self.height {
            let row = &self.alpha[(y * self.width) as usize..((y + 1) * self.width) as usize];
            let mut x = 0usize;
            while x < row.len() {
                if row[x] == 0 {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < row.len() && row[x] > 0 {
                    x += 1;
                }
                canvas.fill_rect(start as f32, y as f32, (x - start) as f32, 1.0, SILHOUETTE_COLOR);
            }
        }
    }
}
