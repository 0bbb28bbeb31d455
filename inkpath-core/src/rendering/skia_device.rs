//! A tiny-skia based rendering device.

use tiny_skia::{
    FillRule, LineCap, LineJoin, Mask, Paint as SkiaPaint, PathBuilder, PixmapMut, Rect, Stroke,
    Transform,
};

use super::device::{Device, Geometry, RenderPass};
use super::graphics_state::MITER_LIMIT;
use super::path::{Path, PathCommand};
use crate::core::color::Color;
use crate::core::error::{DrawError, DrawResult};

// --- Conversion helpers ---

fn to_skia_paint(color: Color, antialias: bool) -> SkiaPaint<'static> {
    let mut sk_paint = SkiaPaint::default();
    sk_paint.set_color(color.to_skia());
    sk_paint.anti_alias = antialias;
    sk_paint
}

fn to_skia_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        miter_limit: MITER_LIMIT,
        line_cap: LineCap::Butt,
        line_join: LineJoin::Miter,
        dash: None,
    }
}

/// Convert a path for tiny-skia. Returns `None` for paths with no area to
/// cover (empty, or a lone move).
pub(crate) fn to_skia_path(path: &Path) -> Option<tiny_skia::Path> {
    build_skia_path(path, false)
}

/// Like [`to_skia_path`], with every open contour closed. Used for the
/// outline of a fill expansion, which must run along the implicit closing
/// edge as well.
pub(crate) fn to_closed_skia_path(path: &Path) -> Option<tiny_skia::Path> {
    build_skia_path(path, true)
}

fn build_skia_path(path: &Path, close_contours: bool) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::with_capacity(path.len() + 1, path.len());
    let mut open = false;
    for cmd in path {
        match *cmd {
            PathCommand::MoveTo(x, y) => {
                if close_contours && open {
                    pb.close();
                }
                pb.move_to(x as f32, y as f32);
                open = true;
            }
            PathCommand::LineTo(x, y) => pb.line_to(x as f32, y as f32),
            PathCommand::Curve3(cx, cy, x, y) => {
                pb.quad_to(cx as f32, cy as f32, x as f32, y as f32)
            }
            PathCommand::Curve4(c1x, c1y, c2x, c2y, x, y) => pb.cubic_to(
                c1x as f32, c1y as f32, c2x as f32, c2y as f32, x as f32, y as f32,
            ),
            PathCommand::ClosePolygon => {
                pb.close();
                open = false;
            }
            // Ends the contour without closing; the next move starts a new one.
            PathCommand::EndPoly => {
                if close_contours && open {
                    pb.close();
                    open = false;
                }
            }
        }
    }
    if close_contours && open {
        pb.close();
    }
    pb.finish()
}

/// Rasterizes render passes straight into a borrowed pixmap.
pub struct SkiaDevice<'a> {
    pixmap: PixmapMut<'a>,
}

impl<'a> SkiaDevice<'a> {
    pub fn new(pixmap: PixmapMut<'a>) -> Self {
        SkiaDevice { pixmap }
    }

    /// Fill plus a miter-joined outline of width `2·offset`, merged into a
    /// single coverage mask so overlapping parts are painted once.
    fn fill_contour(
        &mut self,
        path: &tiny_skia::Path,
        outline: Option<tiny_skia::Path>,
        offset: f32,
        color: Color,
        antialias: bool,
    ) -> DrawResult<()> {
        let mut mask = Mask::new(self.pixmap.width(), self.pixmap.height())
            .ok_or_else(|| DrawError::RenderingError("Failed to allocate coverage mask".into()))?;

        mask.fill_path(path, FillRule::Winding, antialias, Transform::identity());
        if offset > 0.0 {
            let grown = outline.and_then(|o| o.stroke(&to_skia_stroke(offset * 2.0), 1.0));
            if let Some(grown) = grown {
                mask.fill_path(&grown, FillRule::Winding, antialias, Transform::identity());
            }
        }

        let area = Rect::from_xywh(
            0.0,
            0.0,
            self.pixmap.width() as f32,
            self.pixmap.height() as f32,
        )
        .ok_or_else(|| DrawError::RenderingError("Invalid pixmap bounds".into()))?;

        // The mask carries the coverage, so the rectangle itself is not anti-aliased.
        let sk_paint = to_skia_paint(color, false);
        self.pixmap
            .fill_rect(area, &sk_paint, Transform::identity(), Some(&mask));
        Ok(())
    }
}

impl<'a> Device for SkiaDevice<'a> {
    fn rasterize(&mut self, pass: &RenderPass, antialias: bool) -> DrawResult<()> {
        let Some(path) = to_skia_path(pass.geometry.path()) else {
            log::debug!("skipping {} pass with empty geometry", pass.geometry);
            return Ok(());
        };

        match &pass.geometry {
            Geometry::Contour { path: source, offset } => {
                let outline = to_closed_skia_path(source);
                self.fill_contour(&path, outline, *offset, pass.color, antialias)?;
            }
            Geometry::Stroke { width, .. } => {
                if *width <= 0.0 {
                    return Ok(());
                }
                let sk_paint = to_skia_paint(pass.color, antialias);
                if let Some(outline) = path.stroke(&to_skia_stroke(*width), 1.0) {
                    self.pixmap.fill_path(
                        &outline,
                        &sk_paint,
                        FillRule::Winding,
                        Transform::identity(),
                        None,
                    );
                }
            }
            Geometry::Fill { .. } => {
                let sk_paint = to_skia_paint(pass.color, antialias);
                self.pixmap.fill_path(
                    &path,
                    &sk_paint,
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
        }

        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Pixmap;

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let p = pixmap.pixel(x, y).unwrap();
        (p.red(), p.green(), p.blue(), p.alpha())
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Path {
        let mut path = Path::new();
        path.polygon(&[
            (x0, y0).into(),
            (x1, y0).into(),
            (x1, y1).into(),
            (x0, y1).into(),
        ]);
        path
    }

    #[test]
    fn test_contour_fills_interior() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        let mut device = SkiaDevice::new(pixmap.as_mut());
        device
            .rasterize(
                &RenderPass {
                    geometry: Geometry::Contour {
                        path: square(5.0, 5.0, 15.0, 15.0),
                        offset: 0.5,
                    },
                    color: Color::rgb(255, 0, 0),
                },
                true,
            )
            .unwrap();

        assert_eq!(pixel(&pixmap, 10, 10), (255, 0, 0, 255));
        assert_eq!(pixel(&pixmap, 1, 1), (0, 0, 0, 0));
    }

    #[test]
    fn test_contour_offset_grows_shape() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        let mut device = SkiaDevice::new(pixmap.as_mut());
        device
            .rasterize(
                &RenderPass {
                    geometry: Geometry::Contour {
                        path: square(5.0, 5.0, 15.0, 15.0),
                        offset: 3.0,
                    },
                    color: Color::black(),
                },
                false,
            )
            .unwrap();

        // Pixel (3, 10) is outside the square but inside the expansion
        assert_eq!(pixel(&pixmap, 3, 10).3, 255);
        assert_eq!(pixel(&pixmap, 0, 10).3, 0);
    }

    #[test]
    fn test_open_contour_grows_along_closing_edge() {
        let mut open = Path::new();
        open.move_to(10.0, 10.0);
        open.line_to(30.0, 10.0).unwrap();
        open.line_to(30.0, 30.0).unwrap();
        open.line_to(10.0, 30.0).unwrap();

        let mut pixmap = Pixmap::new(40, 40).unwrap();
        let mut device = SkiaDevice::new(pixmap.as_mut());
        device
            .rasterize(
                &RenderPass {
                    geometry: Geometry::Contour {
                        path: open,
                        offset: 2.0,
                    },
                    color: Color::black(),
                },
                false,
            )
            .unwrap();

        // (8, 20) sits left of the implicit closing edge x=10
        assert_eq!(pixel(&pixmap, 8, 20).3, 255);
        assert_eq!(pixel(&pixmap, 31, 20).3, 255);
    }

    #[test]
    fn test_closed_conversion_closes_every_contour() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(4.0, 0.0).unwrap();
        path.move_to(10.0, 0.0);
        path.line_to(14.0, 0.0).unwrap();
        path.end_poly();

        let closed = to_closed_skia_path(&path).unwrap();
        let closes = closed
            .segments()
            .filter(|s| matches!(s, tiny_skia::PathSegment::Close))
            .count();
        assert_eq!(closes, 2);

        let raw = to_skia_path(&path).unwrap();
        assert_eq!(
            raw.segments()
                .filter(|s| matches!(s, tiny_skia::PathSegment::Close))
                .count(),
            0
        );
    }

    #[test]
    fn test_stroke_leaves_interior() {
        let mut pixmap = Pixmap::new(40, 40).unwrap();
        let mut device = SkiaDevice::new(pixmap.as_mut());
        device
            .rasterize(
                &RenderPass {
                    geometry: Geometry::Stroke {
                        path: square(5.0, 5.0, 35.0, 35.0),
                        width: 2.0,
                    },
                    color: Color::rgb(0, 0, 255),
                },
                false,
            )
            .unwrap();

        assert_eq!(pixel(&pixmap, 5, 20), (0, 0, 255, 255));
        assert_eq!(pixel(&pixmap, 20, 20), (0, 0, 0, 0));
    }

    #[test]
    fn test_empty_path_draws_nothing() {
        let mut pixmap = Pixmap::new(10, 10).unwrap();
        let mut device = SkiaDevice::new(pixmap.as_mut());
        device
            .rasterize(
                &RenderPass {
                    geometry: Geometry::Stroke {
                        path: Path::new(),
                        width: 1.0,
                    },
                    color: Color::black(),
                },
                true,
            )
            .unwrap();
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn test_converts_curves_and_end_poly() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.curve3(5.0, 10.0, 10.0, 0.0).unwrap();
        path.curve4(12.0, 2.0, 14.0, 2.0, 16.0, 0.0).unwrap();
        path.end_poly();
        let sk = to_skia_path(&path).unwrap();
        assert_eq!(sk.bounds().right(), 16.0);
        assert_eq!(sk.bounds().bottom(), 10.0);
        assert!(to_skia_path(&Path::new()).is_none());
    }
}
