//! Font loading, text shaping and glyph outlines.
//!
//! A [`Font`] is an ordinary value owned by the caller and passed to each
//! text call. Glyph outlines are converted to [`Path`]s once and kept in a
//! small per-font LRU cache.
//!
//! Without the `text` feature every entry point fails with
//! [`DrawError::UnsupportedOperation`].

use crate::core::color::Color;
use crate::core::error::{DrawError, DrawResult};

use super::path::Path;

#[cfg(feature = "text")]
pub use self::enabled::Font;

#[cfg(not(feature = "text"))]
pub use self::disabled::Font;

#[cfg(feature = "text")]
mod enabled {
    use std::cell::RefCell;
    use std::fmt;
    use std::num::NonZeroUsize;

    use lru::LruCache;
    use rustybuzz::UnicodeBuffer;
    use ttf_parser::{GlyphId, OutlineBuilder};

    use super::*;
    use crate::rendering::graphics_state::Affine;
    use crate::rendering::path::PathCommand;

    const GLYPH_CACHE_SIZE: usize = 256;

    pub struct Font {
        data: Vec<u8>,
        size: f64,
        color: Color,
        glyphs: RefCell<LruCache<u16, Path>>,
    }

    /// Collects a glyph outline in font units.
    struct PathConverter(Vec<PathCommand>);

    impl OutlineBuilder for PathConverter {
        fn move_to(&mut self, x: f32, y: f32) {
            self.0.push(PathCommand::MoveTo(x as f64, y as f64));
        }

        fn line_to(&mut self, x: f32, y: f32) {
            self.0.push(PathCommand::LineTo(x as f64, y as f64));
        }

        fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
            self.0
                .push(PathCommand::Curve3(x1 as f64, y1 as f64, x as f64, y as f64));
        }

        fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
            self.0.push(PathCommand::Curve4(
                x1 as f64, y1 as f64, x2 as f64, y2 as f64, x as f64, y as f64,
            ));
        }

        fn close(&mut self) {
            self.0.push(PathCommand::ClosePolygon);
        }
    }

    impl Font {
        /// Load a TrueType/OpenType font. `size` is the em size in pixels.
        pub fn from_bytes(data: Vec<u8>, size: f64, color: Color) -> DrawResult<Self> {
            ttf_parser::Face::parse(&data, 0)
                .map_err(|e| DrawError::invalid(format!("Failed to load font: {}", e)))?;
            if !(size.is_finite() && size > 0.0) {
                return Err(DrawError::invalid(format!("bad font size {}", size)));
            }

            let capacity = NonZeroUsize::new(GLYPH_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
            Ok(Font {
                data,
                size,
                color,
                glyphs: RefCell::new(LruCache::new(capacity)),
            })
        }

        pub fn size(&self) -> f64 {
            self.size
        }

        pub fn color(&self) -> Color {
            self.color
        }

        fn face(&self) -> DrawResult<rustybuzz::Face<'_>> {
            rustybuzz::Face::from_slice(&self.data, 0)
                .ok_or_else(|| DrawError::RenderingError("Failed to parse font face".into()))
        }

        /// Outline of `text` with its top-left corner at (x, y).
        ///
        /// The first baseline sits one ascender below `y`.
        pub fn layout(&self, x: f64, y: f64, text: &str) -> DrawResult<Path> {
            let face = self.face()?;
            let scale = self.size / face.units_per_em() as f64;

            let mut buffer = UnicodeBuffer::new();
            buffer.push_str(text);
            buffer.guess_segment_properties();
            let shaped = rustybuzz::shape(&face, &[], buffer);

            let mut pen_x = x;
            let mut pen_y = y + face.ascender() as f64 * scale;
            let mut out = Path::new();

            for (info, pos) in shaped.glyph_infos().iter().zip(shaped.glyph_positions()) {
                let glyph_id = info.glyph_id as u16;
                let outline = self.glyph_outline(&face, glyph_id);

                // Font units are y-up; flip into device space.
                let placement = Affine::new(
                    scale,
                    0.0,
                    0.0,
                    -scale,
                    pen_x + pos.x_offset as f64 * scale,
                    pen_y - pos.y_offset as f64 * scale,
                );
                out.append(&outline.transformed(&placement), false);

                pen_x += pos.x_advance as f64 * scale;
                pen_y -= pos.y_advance as f64 * scale;
            }

            Ok(out)
        }

        /// Advance width of `text` and the font's line height, in pixels.
        pub fn text_size(&self, text: &str) -> DrawResult<(f64, f64)> {
            let face = self.face()?;
            let scale = self.size / face.units_per_em() as f64;

            let mut buffer = UnicodeBuffer::new();
            buffer.push_str(text);
            buffer.guess_segment_properties();
            let shaped = rustybuzz::shape(&face, &[], buffer);

            let width: i64 = shaped
                .glyph_positions()
                .iter()
                .map(|p| p.x_advance as i64)
                .sum();
            let line_height =
                face.ascender() as f64 - face.descender() as f64 + face.line_gap() as f64;

            Ok((width as f64 * scale, line_height * scale))
        }

        fn glyph_outline(&self, face: &rustybuzz::Face<'_>, glyph_id: u16) -> Path {
            let mut cache = self.glyphs.borrow_mut();
            if let Some(path) = cache.get(&glyph_id) {
                return path.clone();
            }

            let mut converter = PathConverter(Vec::new());
            // Glyphs without an outline (spaces) come back as an empty path.
            let _ = face.outline_glyph(GlyphId(glyph_id), &mut converter);
            let path = Path::from_commands(converter.0);
            cache.put(glyph_id, path.clone());
            path
        }

        #[cfg(test)]
        pub(crate) fn cached_glyphs(&self) -> usize {
            self.glyphs.borrow().len()
        }
    }

    impl fmt::Debug for Font {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Font")
                .field("bytes", &self.data.len())
                .field("size", &self.size)
                .field("color", &self.color)
                .finish()
        }
    }
}

#[cfg(not(feature = "text"))]
mod disabled {
    use super::*;

    fn unsupported() -> DrawError {
        DrawError::UnsupportedOperation("text rendering requires the `text` feature".into())
    }

    /// Placeholder for builds without the `text` feature. Cannot be created.
    #[derive(Debug)]
    pub struct Font {
        _private: (),
    }

    impl Font {
        pub fn from_bytes(_data: Vec<u8>, _size: f64, _color: Color) -> DrawResult<Self> {
            Err(unsupported())
        }

        pub fn size(&self) -> f64 {
            0.0
        }

        pub fn color(&self) -> Color {
            Color::default()
        }

        pub fn layout(&self, _x: f64, _y: f64, _text: &str) -> DrawResult<Path> {
            Err(unsupported())
        }

        pub fn text_size(&self, _text: &str) -> DrawResult<(f64, f64)> {
            Err(unsupported())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "text"))]
    #[test]
    fn test_text_requires_feature() {
        let err = Font::from_bytes(vec![0; 16], 12.0, Color::black()).unwrap_err();
        assert!(matches!(err, DrawError::UnsupportedOperation(_)));
    }

    #[cfg(feature = "text")]
    mod text {
        use super::*;

        const DEJAVU: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

        fn load() -> Option<Font> {
            let data = std::fs::read(DEJAVU).ok()?;
            Font::from_bytes(data, 20.0, Color::black()).ok()
        }

        #[test]
        fn test_garbage_is_rejected() {
            let err = Font::from_bytes(vec![0; 16], 12.0, Color::black()).unwrap_err();
            assert!(matches!(err, DrawError::InvalidArgument(_)));
        }

        #[test]
        fn test_layout_and_cache() {
            let Some(font) = load() else {
                return;
            };
            let path = font.layout(10.0, 10.0, "Hello").unwrap();
            assert!(!path.is_empty());
            let (x0, y0, _, _) = path.bounding_box().unwrap();
            assert!(x0 >= 10.0);
            assert!(y0 >= 10.0);
            // "l" appears twice but is cached once
            assert_eq!(font.cached_glyphs(), 4);
        }

        #[test]
        fn test_text_size_grows_with_text() {
            let Some(font) = load() else {
                return;
            };
            let (w1, h1) = font.text_size("a").unwrap();
            let (w2, h2) = font.text_size("aaaa").unwrap();
            assert!(w2 > w1 * 3.5);
            assert_eq!(h1, h2);
            assert!(h1 > 20.0);
        }
    }
}
