//! # inkpath-core
//!
//! Anti-aliased 2D drawing of paths onto in-memory pixel buffers.
//!
//! Paths are built from move, line, quadratic and cubic curve, close and
//! end-polygon commands, either programmatically or from SVG path strings.
//! Drawing a path fills it with a brush first, then strokes it with a pen.
//!
//! ## Quick Start
//!
//! ```rust
//! use inkpath_core::{Draw, PixelMode, parse_symbol};
//!
//! let mut draw = Draw::new(PixelMode::Rgb, 64, 64, None)?;
//! let pen = draw.pen("black", 2.0, 255)?;
//! let brush = draw.brush("#ff8000", 255)?;
//!
//! let star = parse_symbol("M32,4 L40,56 L8,22 L56,22 L24,56 Z", 1.0)?;
//! draw.path(&star, Some(&pen), Some(&brush))?;
//!
//! let rgb = draw.to_bytes();
//! assert_eq!(rgb.len(), 64 * 64 * 3);
//! # Ok::<(), inkpath_core::DrawError>(())
//! ```
//!
//! ## Features
//!
//! - `text`: font loading and glyph rendering through rustybuzz
//! - `debug-logging`: per-operator trace output from the path parser

pub mod core;
pub mod rendering;

// Re-export main types for convenience
pub use core::{
    Color, ColorResolver, ColorSpec, Coordinate, DrawError, DrawResult, Point, Value,
    extract_points, flatten_points,
};

pub use rendering::{
    Affine, Brush, Device, Dispatcher, Draw, Font, Geometry, Path, PathBuilder, PathCommand, Pen,
    PixelMode, RenderPass, SkiaDevice, TestDevice, flatten, parse_symbol,
};
