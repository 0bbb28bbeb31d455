//! Geometry for the primitive shapes.
//!
//! Boxes are given as `[x0, y0, x1, y1]` with the upper left corner first.
//! Angles are in degrees; they are negated before use, so with y pointing
//! down a positive angle turns counter-clockwise on screen.

use std::f64::consts::PI;

use super::path::{Path, PathCommand};
use crate::core::coords::Point;

/// Curve approximation scale used for arcs and ellipses.
const APPROXIMATION_SCALE: f64 = 1.0;

/// Upper bound on the vertices generated for one ellipse or arc.
const MAX_STEPS: usize = 1 << 14;

/// Open polyline through `points`.
pub fn line(points: &[Point]) -> Path {
    Path::from_points(points)
}

/// Closed polygon through `points`.
pub fn polygon(points: &[Point]) -> Path {
    let mut path = Path::new();
    path.polygon(points);
    path
}

pub fn rectangle(bbox: [f64; 4]) -> Path {
    let [x0, y0, x1, y1] = bbox;
    Path::from_commands(vec![
        PathCommand::MoveTo(x0, y0),
        PathCommand::LineTo(x1, y0),
        PathCommand::LineTo(x1, y1),
        PathCommand::LineTo(x0, y1),
        PathCommand::ClosePolygon,
    ])
}

/// Ellipse inscribed in `bbox`, as a closed polygon.
pub fn ellipse(bbox: [f64; 4]) -> Path {
    let (cx, cy, rx, ry) = center_radii(bbox);
    let steps = ((2.0 * PI) / angle_step(rx, ry))
        .round()
        .clamp(4.0, MAX_STEPS as f64) as usize;

    let points: Vec<Point> = (0..steps)
        .map(|i| {
            let angle = i as f64 / steps as f64 * 2.0 * PI;
            Point::new(cx + angle.cos() * rx, cy + angle.sin() * ry)
        })
        .collect();
    polygon(&points)
}

/// Open arc along the ellipse inscribed in `bbox`.
pub fn arc(bbox: [f64; 4], start: f64, end: f64) -> Path {
    Path::from_points(&arc_points(bbox, start, end))
}

/// Arc closed by a straight line between its ends.
pub fn chord(bbox: [f64; 4], start: f64, end: f64) -> Path {
    polygon(&arc_points(bbox, start, end))
}

/// Arc closed through the center of `bbox`.
pub fn pieslice(bbox: [f64; 4], start: f64, end: f64) -> Path {
    let (cx, cy, _, _) = center_radii(bbox);
    let mut points = arc_points(bbox, start, end);
    points.push(Point::new(cx, cy));
    polygon(&points)
}

fn center_radii(bbox: [f64; 4]) -> (f64, f64, f64, f64) {
    let [x0, y0, x1, y1] = bbox;
    ((x1 + x0) / 2.0, (y1 + y0) / 2.0, (x1 - x0) / 2.0, (y1 - y0) / 2.0)
}

/// Angular step keeping the chord error below 1/8 device unit.
///
/// Never smaller than a full turn split into [`MAX_STEPS`] pieces; huge
/// radii would otherwise round the step down to zero.
fn angle_step(rx: f64, ry: f64) -> f64 {
    let ra = (rx.abs() + ry.abs()) / 2.0;
    let da = (ra / (ra + 0.125 / APPROXIMATION_SCALE)).acos() * 2.0;
    let min_step = 2.0 * PI / MAX_STEPS as f64;
    if da > min_step { da } else { min_step }
}

/// Points along the arc from `start` to `end` degrees, both ends included.
///
/// The sweep always runs from the negated start angle down to the negated
/// end angle, wrapping by full turns as needed.
fn arc_points(bbox: [f64; 4], start: f64, end: f64) -> Vec<Point> {
    let (cx, cy, rx, ry) = center_radii(bbox);
    let mut a1 = (-start).to_radians();
    let a2 = (-end).to_radians();

    if !(a1.is_finite() && a2.is_finite()) {
        return Vec::new();
    }
    if a1 < a2 {
        a1 += ((a2 - a1) / (2.0 * PI)).ceil() * 2.0 * PI;
    }
    if a1 < a2 {
        a1 = a2;
    }

    let da = angle_step(rx, ry);
    let at = |angle: f64| Point::new(cx + angle.cos() * rx, cy + angle.sin() * ry);

    // Interior vertices strictly between the two ends.
    let interior = ((a1 - a2) / da).ceil().clamp(1.0, MAX_STEPS as f64) as usize - 1;
    let step = if interior == 0 { 0.0 } else { (a1 - a2) / (interior + 1) as f64 };

    let mut points = Vec::with_capacity(interior + 2);
    points.push(at(a1));
    points.extend((1..=interior).map(|i| at(a1 - step * i as f64)));
    points.push(at(a2));
    points
}
