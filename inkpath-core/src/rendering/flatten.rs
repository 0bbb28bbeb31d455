//! Curve flattening.
//!
//! Replaces quadratic and cubic segments with line segments by recursive
//! De Casteljau subdivision until each piece is within `tolerance` of its
//! chord.

use super::path::{Path, PathCommand};
use crate::core::coords::Point;

/// Chord error in device units. Equivalent to an approximation scale of 1.
pub const DEFAULT_TOLERANCE: f64 = 0.5;

/// Subdivision depth limit (at most 2^16 segments per curve).
const MAX_DEPTH: u32 = 16;

/// Flatten every curve of `path`. Contour boundaries are preserved and
/// line-only paths come back unchanged.
pub fn flatten(path: &Path, tolerance: f64) -> Path {
    // Non-positive or NaN tolerances would never terminate before MAX_DEPTH.
    let tolerance = if tolerance > f64::EPSILON {
        tolerance
    } else {
        f64::EPSILON
    };

    let mut out = Vec::with_capacity(path.len());
    let mut cursor: Option<Point> = None;
    // A closed contour hands the pen back to its move point.
    let mut contour_start: Option<Point> = None;

    for cmd in path.iter() {
        match *cmd {
            PathCommand::Curve3(cx, cy, x, y) => {
                let start = cursor.unwrap_or_default();
                let end = Point::new(x, y);
                flatten_quad(start, Point::new(cx, cy), end, tolerance, &mut out);
            }
            PathCommand::Curve4(c1x, c1y, c2x, c2y, x, y) => {
                let start = cursor.unwrap_or_default();
                let end = Point::new(x, y);
                flatten_cubic(
                    start,
                    Point::new(c1x, c1y),
                    Point::new(c2x, c2y),
                    end,
                    tolerance,
                    &mut out,
                );
            }
            other => out.push(other),
        }
        match *cmd {
            PathCommand::MoveTo(x, y) => {
                contour_start = Some(Point::new(x, y));
                cursor = contour_start;
            }
            PathCommand::ClosePolygon => cursor = contour_start.or(cursor),
            _ => {
                if let Some(p) = cmd.end_point() {
                    cursor = Some(p);
                }
            }
        }
    }

    Path::from_commands(out)
}

fn flatten_quad(p0: Point, p1: Point, p2: Point, tolerance: f64, out: &mut Vec<PathCommand>) {
    if p0 == p1 && p1 == p2 {
        out.push(PathCommand::LineTo(p2.x, p2.y));
        return;
    }
    flatten_quad_recursive(p0, p1, p2, tolerance, out, 0);
}

fn flatten_quad_recursive(
    p0: Point,
    p1: Point,
    p2: Point,
    tolerance: f64,
    out: &mut Vec<PathCommand>,
    depth: u32,
) {
    // The curve stays within half the control point's distance from the chord midpoint.
    let mx = (p0.x + p2.x) * 0.5;
    let my = (p0.y + p2.y) * 0.5;
    let dx = p1.x - mx;
    let dy = p1.y - my;
    let dist_sq = (dx * dx + dy * dy) * 0.25;

    if depth >= MAX_DEPTH || dist_sq <= tolerance * tolerance {
        out.push(PathCommand::LineTo(p2.x, p2.y));
        return;
    }

    let q0 = midpoint(p0, p1);
    let q1 = midpoint(p1, p2);
    let r = midpoint(q0, q1);

    flatten_quad_recursive(p0, q0, r, tolerance, out, depth + 1);
    flatten_quad_recursive(r, q1, p2, tolerance, out, depth + 1);
}

fn flatten_cubic(
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    tolerance: f64,
    out: &mut Vec<PathCommand>,
) {
    if p0 == p1 && p1 == p2 && p2 == p3 {
        out.push(PathCommand::LineTo(p3.x, p3.y));
        return;
    }
    flatten_cubic_recursive(p0, p1, p2, p3, tolerance, out, 0);
}

fn flatten_cubic_recursive(
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    tolerance: f64,
    out: &mut Vec<PathCommand>,
    depth: u32,
) {
    if depth >= MAX_DEPTH || cubic_is_flat(p0, p1, p2, p3, tolerance) {
        out.push(PathCommand::LineTo(p3.x, p3.y));
        return;
    }

    // De Casteljau subdivision at t=0.5
    let m01 = midpoint(p0, p1);
    let m12 = midpoint(p1, p2);
    let m23 = midpoint(p2, p3);
    let m012 = midpoint(m01, m12);
    let m123 = midpoint(m12, m23);
    let m = midpoint(m012, m123);

    flatten_cubic_recursive(p0, m01, m012, m, tolerance, out, depth + 1);
    flatten_cubic_recursive(m, m123, m23, p3, tolerance, out, depth + 1);
}

/// Distance of both control points from the chord p0→p3, summed.
fn cubic_is_flat(p0: Point, p1: Point, p2: Point, p3: Point, tolerance: f64) -> bool {
    let dx = p3.x - p0.x;
    let dy = p3.y - p0.y;
    let len_sq = dx * dx + dy * dy;

    if len_sq <= f64::EPSILON {
        // Closed loop: the chord is a point, measure from it directly.
        let d1 = distance_sq(p0, p1);
        let d2 = distance_sq(p0, p2);
        return d1.max(d2) <= tolerance * tolerance;
    }

    let d1 = ((p1.x - p0.x) * dy - (p1.y - p0.y) * dx).abs();
    let d2 = ((p2.x - p0.x) * dy - (p2.y - p0.y) * dx).abs();
    (d1 + d2) * (d1 + d2) <= tolerance * tolerance * len_sq
}

#[inline]
fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

#[inline]
fn distance_sq(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arch() -> Path {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.curve4(0.0, 10.0, 10.0, 10.0, 10.0, 0.0).unwrap();
        path
    }

    #[test]
    fn test_cubic_endpoints_are_exact() {
        let flat = flatten(&arch(), 0.01);
        let cmds = flat.commands();
        assert_eq!(cmds[0], PathCommand::MoveTo(0.0, 0.0));
        assert_eq!(*cmds.last().unwrap(), PathCommand::LineTo(10.0, 0.0));
        assert!(cmds.len() > 8);
        assert!(!flat.has_curves());
    }

    #[test]
    fn test_curve_after_close_starts_at_move_point() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0).unwrap();
        path.line_to(10.0, 10.0).unwrap();
        path.close_polygon().unwrap();
        path.curve3(20.0, 20.0, 0.0, 20.0).unwrap();

        let mut alone = Path::new();
        alone.move_to(0.0, 0.0);
        alone.curve3(20.0, 20.0, 0.0, 20.0).unwrap();

        let after_close = flatten(&path, 0.1);
        let expected = flatten(&alone, 0.1);
        assert_eq!(after_close.commands()[4..], expected.commands()[1..]);
    }

    #[test]
    fn test_tighter_tolerance_adds_points() {
        let coarse = flatten(&arch(), 2.0);
        let fine = flatten(&arch(), 0.01);
        assert!(fine.len() > coarse.len());
    }

    #[test]
    fn test_points_stay_near_curve() {
        // Peak of this cubic is at y = 7.5
        let flat = flatten(&arch(), 0.1);
        for cmd in flat.iter() {
            let p = cmd.end_point().unwrap();
            assert!(p.y >= -1e-9 && p.y <= 7.5 + 1e-9);
            assert!(p.x >= -1e-9 && p.x <= 10.0 + 1e-9);
        }
    }

    #[test]
    fn test_quadratic() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.curve3(5.0, 10.0, 10.0, 0.0).unwrap();
        let flat = flatten(&path, 0.1);
        assert!(flat.len() > 2);
        assert_eq!(*flat.commands().last().unwrap(), PathCommand::LineTo(10.0, 0.0));
    }

    #[test]
    fn test_line_only_path_unchanged() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0).unwrap();
        path.line_to(10.0, 10.0).unwrap();
        path.close_polygon().unwrap();
        path.end_poly();
        assert_eq!(flatten(&path, DEFAULT_TOLERANCE), path);
    }

    #[test]
    fn test_zero_length_curve_collapses() {
        let mut path = Path::new();
        path.move_to(3.0, 3.0);
        path.curve4(3.0, 3.0, 3.0, 3.0, 3.0, 3.0).unwrap();
        let flat = flatten(&path, DEFAULT_TOLERANCE);
        assert_eq!(
            flat.commands(),
            &[PathCommand::MoveTo(3.0, 3.0), PathCommand::LineTo(3.0, 3.0)]
        );
    }

    #[test]
    fn test_closed_loop_curve_is_subdivided() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.curve4(10.0, 10.0, -10.0, 10.0, 0.0, 0.0).unwrap();
        let flat = flatten(&path, DEFAULT_TOLERANCE);
        assert!(flat.len() > 3);
    }

    #[test]
    fn test_zero_tolerance_terminates() {
        let flat = flatten(&arch(), 0.0);
        assert_eq!(*flat.commands().last().unwrap(), PathCommand::LineTo(10.0, 0.0));
    }
}
