//! Drawing state: pens, brushes and the affine transform.

use crate::core::color::{Color, ColorResolver, ColorSpec};
use crate::core::error::{DrawError, DrawResult};

/// Miter limit used for both stroke outlines and fill expansion.
pub const MITER_LIMIT: f32 = 4.0;

/// Stroke specification.
///
/// Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    color: Color,
    width: f32,
}

impl Pen {
    /// Create a pen from an already resolved color.
    pub fn new(color: Color, width: f32) -> DrawResult<Self> {
        if !width.is_finite() || width < 0.0 {
            return Err(DrawError::invalid(format!("bad pen width {}", width)));
        }
        Ok(Pen { color, width })
    }

    /// Create a pen from a color specifier, the way callers usually write it:
    /// `Pen::from_spec(&resolver, &"red".into(), 2.0, 255)`.
    pub fn from_spec(
        resolver: &ColorResolver,
        color: &ColorSpec,
        width: f32,
        opacity: u8,
    ) -> DrawResult<Self> {
        Pen::new(resolver.resolve(color, opacity)?, width)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub(crate) fn to_gray(self) -> Self {
        Pen {
            color: self.color.to_gray(),
            width: self.width,
        }
    }
}

impl Default for Pen {
    fn default() -> Self {
        Pen {
            color: Color::black(),
            width: 1.0,
        }
    }
}

/// Fill specification.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Brush {
    color: Color,
}

impl Brush {
    pub fn new(color: Color) -> Self {
        Brush { color }
    }

    pub fn from_spec(resolver: &ColorResolver, color: &ColorSpec, opacity: u8) -> DrawResult<Self> {
        Ok(Brush::new(resolver.resolve(color, opacity)?))
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub(crate) fn to_gray(self) -> Self {
        Brush {
            color: self.color.to_gray(),
        }
    }
}

/// A 2D affine transform `(a, b, c, d, e, f)` representing
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
/// so that `(x, y) → (a·x + c·y + e, b·x + d·y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Affine { a, b, c, d, e, f }
    }

    pub const fn identity() -> Self {
        Affine::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub const fn translate(dx: f64, dy: f64) -> Self {
        Affine::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Affine::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Build from PIL-ordered coefficients, where
    /// `x' = a·x + b·y + c` and `y' = d·x + e·y + f`.
    pub const fn from_pil(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Affine::new(a, d, b, e, c, f)
    }

    pub fn from_row(matrix: &[f64; 6]) -> Self {
        let [a, b, c, d, e, f] = *matrix;
        Affine::new(a, b, c, d, e, f)
    }

    pub fn to_row(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Transform a single coordinate pair.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// The transform that applies `self` first and `next` afterwards.
    pub fn then(&self, next: &Affine) -> Affine {
        Affine {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Affine::identity()
    }
}

impl Default for Affine {
    fn default() -> Self {
        Affine::identity()
    }
}
