use crate::error::{Result, ScanError};
use crate::request::CropRect;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

/// An in-memory RGBA raster: one image or one rendered page.
#[derive(Debug, Clone)]
pub struct Surface {
    image: RgbaImage,
}

/// Absolute pixel bounds derived from a percentage crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Luminance plane ready for a binarizer.
#[derive(Debug, Clone)]
pub struct Luminance {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Surface {
    /// Decodes a PNG or JPEG buffer. The format is sniffed from the bytes,
    /// not taken from the declared content type.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).map_err(|e| ScanError::InvalidImage(e.to_string()))?;
        Ok(Self {
            image: img.to_rgba8(),
        })
    }

    pub fn from_rgba(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw RGBA samples, row-major, 4 bytes per pixel.
    pub fn rgba(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Converts a percentage rectangle into pixels against this surface's
    /// own dimensions: `floor(dimension * pct / 100)` for each component.
    pub fn pixel_rect(&self, rect: &CropRect) -> Result<PixelRect> {
        let (w, h) = (self.width(), self.height());
        // Percentages outside 0..=100 saturate the cast; clamp them to one
        // past the surface so they stay comparable and still fail below.
        let px = |dim: u32, pct: f64| {
            if !pct.is_finite() {
                return if pct < 0.0 { -1 } else { dim as i64 + 1 };
            }
            (dim as f64 * pct.clamp(-1.0, 101.0) / 100.0).floor() as i64
        };

        let x = px(w, rect.x);
        let y = px(h, rect.y);
        let width = px(w, rect.width);
        let height = px(h, rect.height);

        let fits = |start: i64, len: i64, dim: u32| {
            start >= 0 && start.checked_add(len).is_some_and(|end| end <= dim as i64)
        };
        if width <= 0 || height <= 0 || !fits(x, width, w) || !fits(y, height, h) {
            return Err(ScanError::InvalidRegion {
                x,
                y,
                width,
                height,
                surface_width: w,
                surface_height: h,
            });
        }

        Ok(PixelRect {
            x: x as u32,
            y: y as u32,
            width: width as u32,
            height: height as u32,
        })
    }

    pub fn crop(&self, rect: &CropRect) -> Result<Surface> {
        let px = self.pixel_rect(rect)?;
        Ok(self.crop_pixels(px))
    }

    pub fn crop_pixels(&self, px: PixelRect) -> Surface {
        let cropped = image::imageops::crop_imm(&self.image, px.x, px.y, px.width, px.height).to_image();
        Surface { image: cropped }
    }

    /// `((R + 2G + B) / 4) & 0xFF` per pixel. This weighting is what the
    /// hybrid binarizer is tuned against; do not swap in BT.601.
    pub fn luminance(&self) -> Luminance {
        let bytes = self
            .image
            .pixels()
            .map(|p| {
                let [r, g, b, _] = p.0;
                let sum = r as u32 + 2 * g as u32 + b as u32;
                ((sum / 4) & 0xFF) as u8
            })
            .collect();
        Luminance {
            bytes,
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.image)
    }
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| ScanError::InvalidImage(format!("PNG encoding failed: {e}")))?;
    Ok(cursor.into_inner())
}
