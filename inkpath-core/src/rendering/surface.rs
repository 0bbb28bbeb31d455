//! The drawing surface.
//!
//! [`Draw`] owns a pixel buffer of fixed size and layout and exposes the
//! drawing primitives. Every primitive builds a [`Path`] and hands it to the
//! [`Dispatcher`], which paints the brush first and the pen on top.

use tiny_skia::Pixmap;

use super::dispatch::Dispatcher;
use super::font::Font;
use super::graphics_state::{Affine, Brush, Pen};
use super::path::Path;
use super::pixel_format::PixelMode;
use super::shapes;
use super::skia_device::SkiaDevice;
use crate::core::color::{Color, ColorResolver, ColorSpec};
use crate::core::coords::{Coordinate, extract_points};
use crate::core::error::{DrawError, DrawResult};

/// A drawing surface.
///
/// Not thread-safe; draws mutate the buffer in place and must be serialized
/// by the caller.
#[derive(Debug)]
pub struct Draw {
    mode: PixelMode,
    pixmap: Pixmap,
    dispatcher: Dispatcher,
    background: Option<Color>,
    resolver: ColorResolver,
}

impl Draw {
    /// Create a surface cleared to `background` (opaque white if `None`).
    pub fn new(
        mode: PixelMode,
        width: u32,
        height: u32,
        background: Option<Color>,
    ) -> DrawResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            DrawError::invalid(format!("bad image size {}x{}", width, height))
        })?;

        let mut draw = Draw {
            mode,
            pixmap,
            dispatcher: Dispatcher::new(),
            background,
            resolver: ColorResolver::new(),
        };
        draw.clear(None);
        log::debug!("created {} surface {}x{}", mode, width, height);
        Ok(draw)
    }

    /// Create a surface with the contents and size of a PNG file.
    pub fn from_png(mode: PixelMode, path: impl AsRef<std::path::Path>) -> DrawResult<Self> {
        let loaded = Pixmap::load_png(path.as_ref())
            .map_err(|e| DrawError::invalid(format!("Failed to load PNG: {}", e)))?;

        let mut draw = Draw::new(mode, loaded.width(), loaded.height(), None)?;
        // Repack in the surface layout so the pixels obey the mode.
        draw.from_bytes(&mode.encode(&loaded))?;
        Ok(draw)
    }

    /// Write the buffer as an RGBA PNG.
    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> DrawResult<()> {
        self.pixmap
            .save_png(path.as_ref())
            .map_err(|e| DrawError::RenderingError(format!("Failed to save PNG: {}", e)))
    }

    pub fn mode(&self) -> PixelMode {
        self.mode
    }

    pub fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    // --- Colors, pens and brushes ---

    /// Install a hook consulted for color names that are not `#rrggbb`.
    pub fn set_color_fallback<F>(&mut self, hook: F)
    where
        F: Fn(&str) -> Option<(u8, u8, u8)> + 'static,
    {
        self.resolver = ColorResolver::new().with_fallback(hook);
    }

    pub fn resolve_color(&self, color: &ColorSpec, opacity: u8) -> DrawResult<Color> {
        self.resolver.resolve(color, opacity)
    }

    /// Create a pen, resolving `color` with this surface's resolver.
    pub fn pen(&self, color: impl Into<ColorSpec>, width: f32, opacity: u8) -> DrawResult<Pen> {
        Pen::from_spec(&self.resolver, &color.into(), width, opacity)
    }

    pub fn brush(&self, color: impl Into<ColorSpec>, opacity: u8) -> DrawResult<Brush> {
        Brush::from_spec(&self.resolver, &color.into(), opacity)
    }

    // --- Surface state ---

    /// Replace the current transform. `None` removes it.
    pub fn set_transform(&mut self, transform: Option<Affine>) {
        self.dispatcher.set_transform(transform);
    }

    pub fn set_translation(&mut self, dx: f64, dy: f64) {
        self.set_transform(Some(Affine::translate(dx, dy)));
    }

    /// Set the transform from a `(dx, dy)` pair or PIL-ordered
    /// `(a, b, c, d, e, f)` coefficients. An empty sequence resets it.
    pub fn set_transform_coeffs<T: Coordinate>(&mut self, coeffs: &[T]) -> DrawResult<()> {
        let values = coeffs
            .iter()
            .map(|v| {
                v.to_coordinate()
                    .ok_or_else(|| DrawError::invalid("transform coefficient is not a number"))
            })
            .collect::<DrawResult<Vec<f64>>>()?;

        let transform = match values.as_slice() {
            [] => None,
            &[dx, dy] => Some(Affine::translate(dx, dy)),
            &[a, b, c, d, e, f] => Some(Affine::from_pil(a, b, c, d, e, f)),
            other => {
                return Err(DrawError::invalid(format!(
                    "transform needs 2 or 6 values, got {}",
                    other.len()
                )));
            }
        };
        self.set_transform(transform);
        Ok(())
    }

    pub fn reset_transform(&mut self) {
        self.set_transform(None);
    }

    pub fn transform(&self) -> Option<&Affine> {
        self.dispatcher.transform()
    }

    pub fn set_antialias(&mut self, antialias: bool) {
        self.dispatcher.set_antialias(antialias);
    }

    pub fn antialias(&self) -> bool {
        self.dispatcher.antialias()
    }

    // --- Primitives ---

    /// Polyline through `xy` (`x, y, x, y, ...`).
    pub fn line<T: Coordinate>(&mut self, xy: &[T], pen: Option<&Pen>) -> DrawResult<()> {
        let path = shapes::line(&extract_points(xy)?);
        self.render(&path, pen, None)
    }

    pub fn polygon<T: Coordinate>(
        &mut self,
        xy: &[T],
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    ) -> DrawResult<()> {
        let path = shapes::polygon(&extract_points(xy)?);
        self.render(&path, pen, brush)
    }

    pub fn rectangle(
        &mut self,
        bbox: [f64; 4],
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    ) -> DrawResult<()> {
        self.render(&shapes::rectangle(bbox), pen, brush)
    }

    pub fn ellipse(
        &mut self,
        bbox: [f64; 4],
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    ) -> DrawResult<()> {
        self.render(&shapes::ellipse(bbox), pen, brush)
    }

    pub fn arc(&mut self, bbox: [f64; 4], start: f64, end: f64, pen: Option<&Pen>) -> DrawResult<()> {
        self.render(&shapes::arc(bbox, start, end), pen, None)
    }

    pub fn chord(
        &mut self,
        bbox: [f64; 4],
        start: f64,
        end: f64,
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    ) -> DrawResult<()> {
        self.render(&shapes::chord(bbox, start, end), pen, brush)
    }

    pub fn pieslice(
        &mut self,
        bbox: [f64; 4],
        start: f64,
        end: f64,
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    ) -> DrawResult<()> {
        self.render(&shapes::pieslice(bbox, start, end), pen, brush)
    }

    /// Draw an arbitrary path. The path itself is never modified.
    pub fn path(&mut self, path: &Path, pen: Option<&Pen>, brush: Option<&Brush>) -> DrawResult<()> {
        self.render(path, pen, brush)
    }

    /// Draw `symbol` once at each position in `xy`.
    pub fn symbol<T: Coordinate>(
        &mut self,
        xy: &[T],
        symbol: &Path,
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    ) -> DrawResult<()> {
        for p in extract_points(xy)? {
            self.render(&symbol.translated(p.x, p.y), pen, brush)?;
        }
        Ok(())
    }

    /// Draw `text` with its top-left corner at `xy`, in the font's color.
    pub fn text(&mut self, xy: (f64, f64), text: &str, font: &Font) -> DrawResult<()> {
        let path = font.layout(xy.0, xy.1, text)?;
        let color = self.ink(font.color());
        let mut device = SkiaDevice::new(self.pixmap.as_mut());
        self.dispatcher.fill(&mut device, &path, color)
    }

    /// Width and line height of `text` in `font`.
    pub fn text_size(&self, text: &str, font: &Font) -> DrawResult<(f64, f64)> {
        font.text_size(text)
    }

    // --- Buffer ---

    /// Fill the whole buffer with `background`, or with the surface's own
    /// background if `None`.
    pub fn clear(&mut self, background: Option<Color>) {
        let color = background.or(self.background).unwrap_or(Color::white());
        let color = match self.mode {
            PixelMode::L => color.to_gray().with_alpha(255),
            PixelMode::Rgb | PixelMode::Bgr => color.with_alpha(255),
            PixelMode::Rgba | PixelMode::Bgra => color,
        };
        self.pixmap.fill(color.to_skia());
    }

    /// The buffer packed in the surface's pixel layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.mode.encode(&self.pixmap)
    }

    /// Replace the buffer with packed data in the surface's pixel layout.
    ///
    /// Fails with [`DrawError::InvalidArgument`] if `data` is shorter than
    /// the buffer; the buffer is left unchanged in that case.
    pub fn from_bytes(&mut self, data: &[u8]) -> DrawResult<()> {
        self.mode.decode(data, &mut self.pixmap)
    }

    #[cfg(test)]
    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    fn ink(&self, color: Color) -> Color {
        if self.mode == PixelMode::L {
            color.to_gray()
        } else {
            color
        }
    }

    fn render(&mut self, path: &Path, pen: Option<&Pen>, brush: Option<&Brush>) -> DrawResult<()> {
        let (pen, brush) = if self.mode == PixelMode::L {
            (pen.map(|p| p.to_gray()), brush.map(|b| b.to_gray()))
        } else {
            (pen.copied(), brush.copied())
        };

        let mut device = SkiaDevice::new(self.pixmap.as_mut());
        self.dispatcher
            .draw(&mut device, path, pen.as_ref(), brush.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_at(draw: &Draw, x: u32, y: u32) -> (u8, u8, u8) {
        let p = draw.pixmap().pixel(x, y).unwrap().demultiply();
        (p.red(), p.green(), p.blue())
    }

    #[test]
    fn test_default_background_is_white() {
        let draw = Draw::new(PixelMode::Rgba, 4, 3, None).unwrap();
        let bytes = draw.to_bytes();
        assert_eq!(bytes.len(), 4 * 3 * 4);
        assert!(bytes.iter().all(|b| *b == 255));
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(Draw::new(PixelMode::Rgb, 0, 10, None).is_err());
    }

    #[test]
    fn test_fill_then_stroke() {
        let mut draw = Draw::new(PixelMode::Rgb, 40, 40, None).unwrap();
        let pen = draw.pen("red", 4.0, 255).unwrap();
        let brush = draw.brush("blue", 255).unwrap();
        draw.rectangle([10.0, 10.0, 30.0, 30.0], Some(&pen), Some(&brush))
            .unwrap();

        // Interior shows the brush, the edge shows the pen on top of it
        assert_eq!(rgb_at(&draw, 20, 20), (0, 0, 255));
        assert_eq!(rgb_at(&draw, 10, 20), (255, 0, 0));
        assert_eq!(rgb_at(&draw, 2, 2), (255, 255, 255));
    }

    #[test]
    fn test_gray_mode_uses_luminance() {
        let mut draw = Draw::new(PixelMode::L, 10, 10, Some(Color::black())).unwrap();
        let brush = draw.brush("red", 255).unwrap();
        draw.rectangle([0.0, 0.0, 10.0, 10.0], None, Some(&brush))
            .unwrap();
        let bytes = draw.to_bytes();
        assert_eq!(bytes.len(), 100);
        assert_eq!(bytes[55], 76);
    }

    #[test]
    fn test_from_bytes_short_input() {
        let mut draw = Draw::new(PixelMode::Bgr, 2, 2, None).unwrap();
        let before = draw.to_bytes();
        assert!(matches!(
            draw.from_bytes(&[0; 11]),
            Err(DrawError::InvalidArgument(_))
        ));
        assert_eq!(draw.to_bytes(), before);

        draw.from_bytes(&[1, 2, 3].repeat(4)).unwrap();
        assert_eq!(draw.to_bytes(), [1, 2, 3].repeat(4));
    }

    #[test]
    fn test_transform_coeffs() {
        let mut draw = Draw::new(PixelMode::Rgb, 2, 2, None).unwrap();
        draw.set_transform_coeffs(&[5, 6]).unwrap();
        assert_eq!(draw.transform(), Some(&Affine::translate(5.0, 6.0)));

        draw.set_transform_coeffs(&[1.0, 0.0, 3.0, 0.0, 1.0, 4.0]).unwrap();
        assert_eq!(draw.transform(), Some(&Affine::translate(3.0, 4.0)));

        assert!(draw.set_transform_coeffs(&[1.0, 2.0, 3.0]).is_err());
        assert_eq!(draw.transform(), Some(&Affine::translate(3.0, 4.0)));

        draw.set_transform_coeffs::<f64>(&[]).unwrap();
        assert_eq!(draw.transform(), None);
    }

    #[test]
    fn test_clear_uses_background() {
        let mut draw = Draw::new(PixelMode::Rgba, 1, 1, Some(Color::rgba(10, 20, 30, 255))).unwrap();
        draw.clear(Some(Color::black()));
        assert_eq!(draw.to_bytes(), vec![0, 0, 0, 255]);
        draw.clear(None);
        assert_eq!(draw.to_bytes(), vec![10, 20, 30, 255]);
    }

    #[test]
    fn test_color_fallback_hook() {
        let mut draw = Draw::new(PixelMode::Rgb, 1, 1, None).unwrap();
        draw.set_color_fallback(|name| (name == "brand").then_some((1, 2, 3)));
        let pen = draw.pen("brand", 1.0, 255).unwrap();
        assert_eq!(pen.color(), Color::rgb(1, 2, 3));
    }
}
