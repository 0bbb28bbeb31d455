//! Packed pixel layouts for buffer exchange.
//!
//! Drawing always happens on a premultiplied RGBA pixmap; the surface's
//! [`PixelMode`] only decides how bytes are packed when the buffer is read
//! or written.

use std::fmt;
use std::str::FromStr;

use tiny_skia::{ColorU8, Pixmap};

use crate::core::error::{DrawError, DrawResult};

/// Pixel layout of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelMode {
    /// 8-bit grayscale
    L,
    Rgb,
    Bgr,
    Rgba,
    Bgra,
}

impl PixelMode {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelMode::L => 1,
            PixelMode::Rgb | PixelMode::Bgr => 3,
            PixelMode::Rgba | PixelMode::Bgra => 4,
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, PixelMode::Rgba | PixelMode::Bgra)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PixelMode::L => "L",
            PixelMode::Rgb => "RGB",
            PixelMode::Bgr => "BGR",
            PixelMode::Rgba => "RGBA",
            PixelMode::Bgra => "BGRA",
        }
    }

    /// Pack the whole pixmap in this layout, un-premultiplying alpha.
    pub fn encode(&self, pixmap: &Pixmap) -> Vec<u8> {
        let mut out = Vec::with_capacity(pixmap.pixels().len() * self.bytes_per_pixel());
        for px in pixmap.pixels() {
            let c = px.demultiply();
            let (r, g, b, a) = (c.red(), c.green(), c.blue(), c.alpha());
            match self {
                PixelMode::L => out.push(luminance(r, g, b)),
                PixelMode::Rgb => out.extend_from_slice(&[r, g, b]),
                PixelMode::Bgr => out.extend_from_slice(&[b, g, r]),
                PixelMode::Rgba => out.extend_from_slice(&[r, g, b, a]),
                PixelMode::Bgra => out.extend_from_slice(&[b, g, r, a]),
            }
        }
        out
    }

    /// Replace the pixmap contents with `data` packed in this layout.
    ///
    /// Fails without touching the pixmap if `data` is too short. Extra
    /// trailing bytes are ignored.
    pub fn decode(&self, data: &[u8], pixmap: &mut Pixmap) -> DrawResult<()> {
        let bpp = self.bytes_per_pixel();
        let needed = pixmap.pixels().len() * bpp;
        if data.len() < needed {
            return Err(DrawError::invalid(format!(
                "not enough data: expected {} bytes, got {}",
                needed,
                data.len()
            )));
        }

        for (px, chunk) in pixmap.pixels_mut().iter_mut().zip(data.chunks_exact(bpp)) {
            let color = match (self, chunk) {
                (PixelMode::L, &[l]) => ColorU8::from_rgba(l, l, l, 255),
                (PixelMode::Rgb, &[r, g, b]) => ColorU8::from_rgba(r, g, b, 255),
                (PixelMode::Bgr, &[b, g, r]) => ColorU8::from_rgba(r, g, b, 255),
                (PixelMode::Rgba, &[r, g, b, a]) => ColorU8::from_rgba(r, g, b, a),
                (PixelMode::Bgra, &[b, g, r, a]) => ColorU8::from_rgba(r, g, b, a),
                _ => return Err(DrawError::invalid("pixel size mismatch")),
            };
            *px = color.premultiply();
        }
        Ok(())
    }
}

/// Same weights as [`crate::core::Color::luminance`].
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}

impl FromStr for PixelMode {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(PixelMode::L),
            "RGB" => Ok(PixelMode::Rgb),
            "BGR" => Ok(PixelMode::Bgr),
            "RGBA" => Ok(PixelMode::Rgba),
            "BGRA" => Ok(PixelMode::Bgra),
            _ => Err(DrawError::invalid(format!("bad mode '{}'", s))),
        }
    }
}

impl fmt::Display for PixelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
