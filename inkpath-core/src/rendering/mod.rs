//! Path storage, parsing and rendering.
//!
//! The layers, bottom up:
//! - [`path`]: the command list every primitive is built from
//! - [`symbol`] and [`shapes`]: producers of paths
//! - [`flatten`]: curve to polyline conversion
//! - [`dispatch`] and [`device`]: planning render passes for a backend
//! - [`surface`]: the user-facing [`Draw`] object

pub mod device;
pub mod dispatch;
pub mod flatten;
pub mod font;
pub mod graphics_state;
pub mod path;
pub mod pixel_format;
pub mod shapes;
pub mod skia_device;
pub mod surface;
pub mod symbol;

// Re-export key types
pub use device::{Device, Geometry, RenderPass, TestDevice};
pub use dispatch::{DEFAULT_FILL_OFFSET, Dispatcher};
pub use flatten::{DEFAULT_TOLERANCE, flatten};
pub use font::Font;
pub use graphics_state::{Affine, Brush, MITER_LIMIT, Pen};
pub use path::{Path, PathBuilder, PathCommand};
pub use pixel_format::PixelMode;
pub use skia_device::SkiaDevice;
pub use surface::Draw;
pub use symbol::parse_symbol;
