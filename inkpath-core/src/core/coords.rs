//! Coordinate sequence handling.
//!
//! Drawing calls take flat `x, y, x, y, ...` sequences. This module turns
//! them into structured [`Point`]s and back.

use std::fmt;

use super::error::{DrawError, DrawResult};

/// A point in user space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Reflect `other` about this point (`2·self − other`).
    pub fn reflect(&self, other: Point) -> Point {
        Point::new(2.0 * self.x - other.x, 2.0 * self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A loosely typed value as handed over by a scripting host.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    None,
}

/// Something that can be read as a single coordinate.
pub trait Coordinate {
    /// Returns `None` if the value is not numeric.
    fn to_coordinate(&self) -> Option<f64>;
}

macro_rules! impl_coordinate {
    ($($ty:ty),*) => {
        $(
            impl Coordinate for $ty {
                #[inline]
                fn to_coordinate(&self) -> Option<f64> {
                    Some(*self as f64)
                }
            }
        )*
    };
}

impl_coordinate!(f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Coordinate for Value {
    fn to_coordinate(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Value::Text(_) | Value::None => None,
        }
    }
}

impl<T: Coordinate + ?Sized> Coordinate for &T {
    #[inline]
    fn to_coordinate(&self) -> Option<f64> {
        (**self).to_coordinate()
    }
}

/// Convert a flat `[x0, y0, x1, y1, ...]` sequence into points.
///
/// Fails with [`DrawError::InvalidArgument`] if the sequence has an odd
/// length or any element is not numeric.
pub fn extract_points<T: Coordinate>(seq: &[T]) -> DrawResult<Vec<Point>> {
    let n = pair_count(seq)?;
    let mut points = Vec::with_capacity(n);
    fill_points(seq, &mut points)?;
    Ok(points)
}

/// Like [`extract_points`], but reserves one trailing zeroed slot for
/// algorithms that need a sentinel after the last point.
pub fn extract_points_with_scratch<T: Coordinate>(seq: &[T]) -> DrawResult<Vec<Point>> {
    let n = pair_count(seq)?;
    let mut points = Vec::with_capacity(n + 1);
    fill_points(seq, &mut points)?;
    points.push(Point::default());
    Ok(points)
}

/// Inverse of [`extract_points`].
pub fn flatten_points(points: &[Point]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

fn pair_count<T>(seq: &[T]) -> DrawResult<usize> {
    if seq.len() % 2 != 0 {
        return Err(DrawError::invalid(format!(
            "expected even number of coordinates, got {}",
            seq.len()
        )));
    }
    Ok(seq.len() / 2)
}

fn fill_points<T: Coordinate>(seq: &[T], points: &mut Vec<Point>) -> DrawResult<()> {
    for (i, pair) in seq.chunks_exact(2).enumerate() {
        let x = coordinate_at(&pair[0], 2 * i)?;
        let y = coordinate_at(&pair[1], 2 * i + 1)?;
        points.push(Point::new(x, y));
    }
    Ok(())
}

fn coordinate_at<T: Coordinate>(value: &T, index: usize) -> DrawResult<f64> {
    value
        .to_coordinate()
        .ok_or_else(|| DrawError::invalid(format!("coordinate {} is not a number", index)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_pairs() {
        let points = extract_points(&[0.0, 1.0, 2.5, -3.0]).unwrap();
        assert_eq!(points, vec![Point::new(0.0, 1.0), Point::new(2.5, -3.0)]);
    }

    #[test]
    fn test_extract_integers() {
        let points = extract_points(&[10i32, 20, 30, 40]).unwrap();
        assert_eq!(points[1], Point::new(30.0, 40.0));
    }

    #[test]
    fn test_extract_empty() {
        let points = extract_points::<f64>(&[]).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_odd_length_rejected() {
        let err = extract_points(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, DrawError::InvalidArgument(_)));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let seq = vec![Value::Int(1), Value::Text("two".into())];
        let err = extract_points(&seq).unwrap_err();
        assert_eq!(
            err,
            DrawError::InvalidArgument("coordinate 1 is not a number".into())
        );
    }

    #[test]
    fn test_mixed_host_values() {
        let seq = vec![Value::Int(1), Value::Float(2.5), Value::Bool(true), Value::Int(-4)];
        let points = extract_points(&seq).unwrap();
        assert_eq!(points, vec![Point::new(1.0, 2.5), Point::new(1.0, -4.0)]);
    }

    #[test]
    fn test_scratch_slot() {
        let points = extract_points_with_scratch(&[1.0, 2.0]).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1], Point::default());
    }

    #[test]
    fn test_reflect() {
        let cursor = Point::new(10.0, 10.0);
        assert_eq!(cursor.reflect(Point::new(5.0, 0.0)), Point::new(15.0, 20.0));
    }

    #[test]
    fn test_flatten_points() {
        let points = vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        assert_eq!(flatten_points(&points), vec![1.0, 2.0, 3.0, 4.0]);
    }
}
