//! Draw dispatch: turning a path plus pen and brush into render passes.

use smallvec::SmallVec;

use super::device::{Device, Geometry, RenderPass};
use super::graphics_state::{Affine, Brush, Pen};
use super::path::Path;
use crate::core::color::Color;
use crate::core::error::DrawResult;

/// Fill expansion used when a brush is drawn without a pen.
pub const DEFAULT_FILL_OFFSET: f32 = 0.5;

/// Plans and issues render passes.
///
/// The transform and anti-alias flag are read at every draw call, so changing
/// them affects later draws only. Setting a transform replaces the previous
/// one.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    transform: Option<Affine>,
    antialias: bool,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Dispatcher {
            transform: None,
            antialias: true,
        }
    }

    pub fn set_transform(&mut self, transform: Option<Affine>) {
        self.transform = transform;
    }

    pub fn transform(&self) -> Option<&Affine> {
        self.transform.as_ref()
    }

    pub fn set_antialias(&mut self, antialias: bool) {
        self.antialias = antialias;
    }

    pub fn antialias(&self) -> bool {
        self.antialias
    }

    /// Plan the passes for drawing `path`: the brush first, then the pen.
    ///
    /// The returned geometry holds a transformed copy of `path`.
    pub fn plan(
        &self,
        path: &Path,
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    ) -> SmallVec<[RenderPass; 2]> {
        let mut passes = SmallVec::new();
        if pen.is_none() && brush.is_none() {
            return passes;
        }

        let path = self.prepare(path);

        if let Some(brush) = brush {
            let offset = pen.map_or(DEFAULT_FILL_OFFSET, |p| p.width() / 2.0);
            passes.push(RenderPass {
                geometry: Geometry::Contour {
                    path: path.clone(),
                    offset,
                },
                color: brush.color(),
            });
        }

        if let Some(pen) = pen {
            passes.push(RenderPass {
                geometry: Geometry::Stroke {
                    path,
                    width: pen.width(),
                },
                color: pen.color(),
            });
        }

        passes
    }

    /// Draw `path` onto `device`. Without pen and brush this does nothing.
    pub fn draw(
        &self,
        device: &mut dyn Device,
        path: &Path,
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    ) -> DrawResult<()> {
        let passes = self.plan(path, pen, brush);
        self.execute(device, &passes)
    }

    /// Fill `path` as is, with no expansion. Used for glyph outlines.
    pub fn fill(&self, device: &mut dyn Device, path: &Path, color: Color) -> DrawResult<()> {
        let pass = RenderPass {
            geometry: Geometry::Fill {
                path: self.prepare(path),
            },
            color,
        };
        self.execute(device, std::slice::from_ref(&pass))
    }

    fn prepare(&self, path: &Path) -> Path {
        match &self.transform {
            Some(t) => path.transformed(t),
            None => path.clone(),
        }
    }

    fn execute(&self, device: &mut dyn Device, passes: &[RenderPass]) -> DrawResult<()> {
        for pass in passes {
            log::debug!(
                "render pass {} color={} commands={} aa={}",
                pass.geometry,
                pass.color,
                pass.geometry.path().len(),
                self.antialias
            );
            device.rasterize(pass, self.antialias)?;
        }
        Ok(())
    }
}
