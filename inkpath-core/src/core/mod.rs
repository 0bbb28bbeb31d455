pub mod color;
pub mod coords;
pub mod error;

pub use color::{Color, ColorResolver, ColorSpec};
pub use coords::{
    Coordinate, Point, Value, extract_points, extract_points_with_scratch, flatten_points,
};
pub use error::{DrawError, DrawResult};
