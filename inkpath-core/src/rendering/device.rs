//! Device trait for rasterizer backend abstraction.
//!
//! The dispatcher decides *what* to paint and in which order; a [`Device`]
//! turns each [`RenderPass`] into pixels. This keeps the pass planning
//! testable without a pixel buffer (see [`TestDevice`]).

use std::fmt;

use super::path::Path;
use crate::core::color::Color;
use crate::core::error::DrawResult;

/// Geometry generated from a path for one pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Fill expansion: the path's interior grown outward by `offset`
    Contour { path: Path, offset: f32 },
    /// Outline traced by a pen of the given width
    Stroke { path: Path, width: f32 },
    /// The interior of the path, without expansion
    Fill { path: Path },
}

impl Geometry {
    /// The (already transformed) path this geometry is built from.
    pub fn path(&self) -> &Path {
        match self {
            Geometry::Contour { path, .. }
            | Geometry::Stroke { path, .. }
            | Geometry::Fill { path } => path,
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Contour { offset, .. } => write!(f, "contour({})", offset),
            Geometry::Stroke { width, .. } => write!(f, "stroke({})", width),
            Geometry::Fill { .. } => write!(f, "fill"),
        }
    }
}

/// One rasterize-and-composite step.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass {
    pub geometry: Geometry,
    pub color: Color,
}

/// A target that can rasterize render passes.
pub trait Device {
    /// Rasterize `pass.geometry` and composite it with `pass.color`.
    ///
    /// With `antialias` off, coverage is thresholded at the pixel center.
    fn rasterize(&mut self, pass: &RenderPass, antialias: bool) -> DrawResult<()>;

    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);
}

/// A device that records passes instead of painting them.
#[derive(Debug, Default)]
pub struct TestDevice {
    width: u32,
    height: u32,
    passes: Vec<RenderPass>,
    /// Recorded operations for testing
    operations: Vec<String>,
}

impl TestDevice {
    /// Create a new test device with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        TestDevice {
            width,
            height,
            passes: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// Get the recorded operations.
    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    /// Get the recorded passes, in rasterization order.
    pub fn passes(&self) -> &[RenderPass] {
        &self.passes
    }

    /// Clear the recorded operations.
    pub fn clear_operations(&mut self) {
        self.operations.clear();
        self.passes.clear();
    }
}

impl Device for TestDevice {
    fn rasterize(&mut self, pass: &RenderPass, antialias: bool) -> DrawResult<()> {
        self.operations.push(format!(
            "{} {} aa={} [{}]",
            pass.geometry,
            pass.color,
            antialias,
            pass.geometry.path()
        ));
        self.passes.push(pass.clone());
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
