//! Path storage.
//!
//! Paths are an ordered list of [`PathCommand`]s built incrementally with
//! move, line, curve and close operations. The cursor ("last vertex") is not
//! stored separately; it is always derived from the commands themselves.

use std::fmt;

use super::flatten::{self, DEFAULT_TOLERANCE};
use super::graphics_state::Affine;
use crate::core::coords::{Coordinate, Point, extract_points, flatten_points};
use crate::core::error::{DrawError, DrawResult};

/// A single path command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new contour at (x, y)
    MoveTo(f64, f64),
    /// Straight edge to (x, y)
    LineTo(f64, f64),
    /// Quadratic Bézier (cx, cy, x, y)
    Curve3(f64, f64, f64, f64),
    /// Cubic Bézier (c1x, c1y, c2x, c2y, x, y)
    Curve4(f64, f64, f64, f64, f64, f64),
    /// Close the current contour back to its MoveTo point
    ClosePolygon,
    /// End the current contour without closing it
    EndPoly,
}

impl PathCommand {
    /// The point this command leaves the cursor at, if it emits a vertex.
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            PathCommand::MoveTo(x, y)
            | PathCommand::LineTo(x, y)
            | PathCommand::Curve3(_, _, x, y)
            | PathCommand::Curve4(_, _, _, _, x, y) => Some(Point::new(x, y)),
            PathCommand::ClosePolygon | PathCommand::EndPoly => None,
        }
    }

    /// The control point adjacent to the end point of a curve command.
    pub fn last_control(&self) -> Option<Point> {
        match *self {
            PathCommand::Curve3(cx, cy, _, _) => Some(Point::new(cx, cy)),
            PathCommand::Curve4(_, _, c2x, c2y, _, _) => Some(Point::new(c2x, c2y)),
            _ => None,
        }
    }

    pub fn is_curve(&self) -> bool {
        matches!(self, PathCommand::Curve3(..) | PathCommand::Curve4(..))
    }

    /// Apply `t` to every coordinate of the command, control points included.
    pub fn transformed(&self, t: &Affine) -> PathCommand {
        match *self {
            PathCommand::MoveTo(x, y) => {
                let (x, y) = t.apply(x, y);
                PathCommand::MoveTo(x, y)
            }
            PathCommand::LineTo(x, y) => {
                let (x, y) = t.apply(x, y);
                PathCommand::LineTo(x, y)
            }
            PathCommand::Curve3(cx, cy, x, y) => {
                let (cx, cy) = t.apply(cx, cy);
                let (x, y) = t.apply(x, y);
                PathCommand::Curve3(cx, cy, x, y)
            }
            PathCommand::Curve4(c1x, c1y, c2x, c2y, x, y) => {
                let (c1x, c1y) = t.apply(c1x, c1y);
                let (c2x, c2y) = t.apply(c2x, c2y);
                let (x, y) = t.apply(x, y);
                PathCommand::Curve4(c1x, c1y, c2x, c2y, x, y)
            }
            cmd @ (PathCommand::ClosePolygon | PathCommand::EndPoly) => cmd,
        }
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCommand::MoveTo(x, y) => write!(f, "M {} {}", x, y),
            PathCommand::LineTo(x, y) => write!(f, "L {} {}", x, y),
            PathCommand::Curve3(cx, cy, x, y) => write!(f, "Q {} {} {} {}", cx, cy, x, y),
            PathCommand::Curve4(c1x, c1y, c2x, c2y, x, y) => {
                write!(f, "C {} {} {} {} {} {}", c1x, c1y, c2x, c2y, x, y)
            }
            PathCommand::ClosePolygon => write!(f, "Z"),
            PathCommand::EndPoly => write!(f, "E"),
        }
    }
}

/// An ordered, append-only sequence of path commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// Create a new empty path.
    pub fn new() -> Self {
        Path {
            commands: Vec::new(),
        }
    }

    /// An open polyline: a move to the first point, then lines.
    pub fn from_points(points: &[Point]) -> Self {
        let mut path = Path::new();
        path.push_polyline(points);
        path
    }

    /// Like [`Path::from_points`], from a flat `x, y, ...` sequence.
    pub fn from_coords<T: Coordinate>(seq: &[T]) -> DrawResult<Self> {
        Ok(Path::from_points(&extract_points(seq)?))
    }

    pub(crate) fn from_commands(commands: Vec<PathCommand>) -> Self {
        Path { commands }
    }

    /// Start a new contour.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo(x, y));
    }

    /// Add a straight edge from the cursor to (x, y).
    pub fn line_to(&mut self, x: f64, y: f64) -> DrawResult<()> {
        self.require_cursor("line_to")?;
        self.commands.push(PathCommand::LineTo(x, y));
        Ok(())
    }

    /// Add a quadratic Bézier segment.
    pub fn curve3(&mut self, cx: f64, cy: f64, x: f64, y: f64) -> DrawResult<()> {
        self.require_cursor("curve3")?;
        self.commands.push(PathCommand::Curve3(cx, cy, x, y));
        Ok(())
    }

    /// Add a cubic Bézier segment.
    ///
    /// # Arguments
    /// * `c1x, c1y` - First control point
    /// * `c2x, c2y` - Second control point
    /// * `x, y` - End point
    pub fn curve4(
        &mut self,
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        x: f64,
        y: f64,
    ) -> DrawResult<()> {
        self.require_cursor("curve4")?;
        self.commands
            .push(PathCommand::Curve4(c1x, c1y, c2x, c2y, x, y));
        Ok(())
    }

    /// Close the current contour back to its starting point.
    pub fn close_polygon(&mut self) -> DrawResult<()> {
        self.require_cursor("close_polygon")?;
        self.commands.push(PathCommand::ClosePolygon);
        Ok(())
    }

    /// End the current contour, leaving it open.
    pub fn end_poly(&mut self) {
        self.commands.push(PathCommand::EndPoly);
    }

    /// Move relative to the cursor (relative to the origin on an empty path).
    pub fn rmove_to(&mut self, dx: f64, dy: f64) {
        let (x, y) = self.rel_to_abs(dx, dy);
        self.move_to(x, y);
    }

    pub fn rline_to(&mut self, dx: f64, dy: f64) -> DrawResult<()> {
        let (x, y) = self.rel_to_abs(dx, dy);
        self.line_to(x, y)
    }

    /// Cubic Bézier with every point given relative to the cursor.
    pub fn rcurve_to(
        &mut self,
        dx1: f64,
        dy1: f64,
        dx2: f64,
        dy2: f64,
        dx: f64,
        dy: f64,
    ) -> DrawResult<()> {
        let (c1x, c1y) = self.rel_to_abs(dx1, dy1);
        let (c2x, c2y) = self.rel_to_abs(dx2, dy2);
        let (x, y) = self.rel_to_abs(dx, dy);
        self.curve4(c1x, c1y, c2x, c2y, x, y)
    }

    /// Offset (dx, dy) by the last vertex. Returned unchanged if there is none.
    pub fn rel_to_abs(&self, dx: f64, dy: f64) -> (f64, f64) {
        match self.last_vertex() {
            Some(p) => (p.x + dx, p.y + dy),
            None => (dx, dy),
        }
    }

    /// End point of the most recent move, line or curve command.
    pub fn last_vertex(&self) -> Option<Point> {
        self.vertices_rev().next()
    }

    /// End point of the vertex-emitting command before [`Path::last_vertex`].
    pub fn previous_vertex(&self) -> Option<Point> {
        self.vertices_rev().nth(1)
    }

    /// If the path ends in a curve, the control point next to its end point.
    pub fn previous_control(&self) -> Option<Point> {
        self.commands.last().and_then(PathCommand::last_control)
    }

    /// The command most recently appended.
    pub fn last_command(&self) -> Option<&PathCommand> {
        self.commands.last()
    }

    /// Append the commands of `other`. With `close_as_polygon`, the appended
    /// contour is closed regardless of how `other` ends.
    pub fn append(&mut self, other: &Path, close_as_polygon: bool) {
        if other.is_empty() {
            return;
        }
        self.commands.extend_from_slice(&other.commands);
        if close_as_polygon {
            match self.commands.last() {
                Some(PathCommand::ClosePolygon) => {}
                Some(PathCommand::EndPoly) => {
                    if let Some(last) = self.commands.last_mut() {
                        *last = PathCommand::ClosePolygon;
                    }
                }
                _ => self.commands.push(PathCommand::ClosePolygon),
            }
        }
    }

    /// Append a closed contour through `points`. Empty input is a no-op.
    pub fn polygon(&mut self, points: &[Point]) {
        if self.push_polyline(points) {
            self.commands.push(PathCommand::ClosePolygon);
        }
    }

    /// A copy with every curve replaced by line segments.
    pub fn to_polyline(&self, tolerance: f64) -> Path {
        flatten::flatten(self, tolerance)
    }

    pub fn has_curves(&self) -> bool {
        self.commands.iter().any(PathCommand::is_curve)
    }

    /// A copy with `t` applied to every coordinate. `self` is untouched.
    pub fn transformed(&self, t: &Affine) -> Path {
        Path {
            commands: self.commands.iter().map(|c| c.transformed(t)).collect(),
        }
    }

    /// A copy moved by (dx, dy).
    pub fn translated(&self, dx: f64, dy: f64) -> Path {
        self.transformed(&Affine::translate(dx, dy))
    }

    /// Vertex coordinates as a flat `x, y, ...` list, curves flattened.
    pub fn coords(&self) -> Vec<f64> {
        let flat = self.to_polyline(DEFAULT_TOLERANCE);
        let points: Vec<Point> = flat
            .commands
            .iter()
            .filter_map(PathCommand::end_point)
            .collect();
        flatten_points(&points)
    }

    /// Get the path commands.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathCommand> {
        self.commands.iter()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Get the number of commands in the path.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Get the bounding box of the path as `(min_x, min_y, max_x, max_y)`.
    ///
    /// Control points are included, so this is a conservative box for
    /// curved paths.
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        let mut bbox: Option<(f64, f64, f64, f64)> = None;
        let mut include = |x: f64, y: f64| {
            bbox = Some(match bbox {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        };

        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(x, y) | PathCommand::LineTo(x, y) => include(x, y),
                PathCommand::Curve3(cx, cy, x, y) => {
                    include(cx, cy);
                    include(x, y);
                }
                PathCommand::Curve4(c1x, c1y, c2x, c2y, x, y) => {
                    include(c1x, c1y);
                    include(c2x, c2y);
                    include(x, y);
                }
                PathCommand::ClosePolygon | PathCommand::EndPoly => {}
            }
        }

        bbox
    }

    fn vertices_rev(&self) -> impl Iterator<Item = Point> + '_ {
        self.commands.iter().rev().filter_map(PathCommand::end_point)
    }

    fn require_cursor(&self, op: &str) -> DrawResult<()> {
        if self.last_vertex().is_none() {
            return Err(DrawError::invalid(format!(
                "{} without a current point (call move_to first)",
                op
            )));
        }
        Ok(())
    }

    /// Returns whether anything was pushed.
    fn push_polyline(&mut self, points: &[Point]) -> bool {
        let Some((first, rest)) = points.split_first() else {
            return false;
        };
        self.commands.reserve(points.len());
        self.commands.push(PathCommand::MoveTo(first.x, first.y));
        self.commands
            .extend(rest.iter().map(|p| PathCommand::LineTo(p.x, p.y)));
        true
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", cmd)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathCommand;
    type IntoIter = std::slice::Iter<'a, PathCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

/// Builder for constructing paths.
///
/// The first failing call is remembered and reported by [`PathBuilder::build`];
/// later calls are ignored.
#[derive(Debug, Default)]
pub struct PathBuilder {
    path: Path,
    error: Option<DrawError>,
}

impl PathBuilder {
    /// Create a new path builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to a point.
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        if self.error.is_none() {
            self.path.move_to(x, y);
        }
        self
    }

    /// Add a line segment.
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.apply(|p| p.line_to(x, y))
    }

    /// Add a quadratic Bézier curve.
    pub fn curve3(&mut self, cx: f64, cy: f64, x: f64, y: f64) -> &mut Self {
        self.apply(|p| p.curve3(cx, cy, x, y))
    }

    /// Add a cubic Bézier curve.
    pub fn curve4(
        &mut self,
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        x: f64,
        y: f64,
    ) -> &mut Self {
        self.apply(|p| p.curve4(c1x, c1y, c2x, c2y, x, y))
    }

    /// Close the current contour.
    pub fn close(&mut self) -> &mut Self {
        self.apply(|p| p.close_polygon())
    }

    /// Build and return the path.
    pub fn build(&self) -> DrawResult<Path> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.path.clone()),
        }
    }

    /// Get a reference to the path being built.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn apply(&mut self, op: impl FnOnce(&mut Path) -> DrawResult<()>) -> &mut Self {
        if self.error.is_none() {
            if let Err(err) = op(&mut self.path) {
                self.error = Some(err);
            }
        }
        self
    }
}
