//! Color specifiers and their resolution to RGBA8.

use std::fmt;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use super::error::{DrawError, DrawResult};

/// An 8-bit RGBA color (not premultiplied).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::rgba(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Color::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Color::rgb(255, 255, 255)
    }

    /// Replace the alpha channel.
    pub const fn with_alpha(self, a: u8) -> Self {
        Color::rgba(self.r, self.g, self.b, a)
    }

    /// ITU-R 601 luma, used when drawing onto 8-bit grayscale targets.
    pub fn luminance(&self) -> u8 {
        ((self.r as u32 * 299 + self.g as u32 * 587 + self.b as u32 * 114) / 1000) as u8
    }

    /// The same color with every channel replaced by its luminance.
    pub fn to_gray(self) -> Self {
        let l = self.luminance();
        Color::rgba(l, l, l, self.a)
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::black()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// A color as written by a caller, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpec {
    /// Gray level, used for all three channels
    Gray(u8),
    Rgb(u8, u8, u8),
    /// Carries its own alpha, which takes precedence over any opacity
    Rgba(u8, u8, u8, u8),
    /// `#rrggbb` or a color name
    Name(String),
}

impl From<&str> for ColorSpec {
    fn from(name: &str) -> Self {
        ColorSpec::Name(name.to_string())
    }
}

impl From<(u8, u8, u8)> for ColorSpec {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        ColorSpec::Rgb(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for ColorSpec {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        ColorSpec::Rgba(r, g, b, a)
    }
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        ColorSpec::Rgba(color.r, color.g, color.b, color.a)
    }
}

type FallbackHook = Box<dyn Fn(&str) -> Option<(u8, u8, u8)>>;

/// Turns [`ColorSpec`]s into [`Color`]s.
///
/// Names are looked up as `#rrggbb` first, then handed to the optional
/// fallback hook, then matched against the built-in HTML color names.
#[derive(Default)]
pub struct ColorResolver {
    fallback: Option<FallbackHook>,
}

impl ColorResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a hook for names this resolver does not know.
    pub fn with_fallback<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) -> Option<(u8, u8, u8)> + 'static,
    {
        self.fallback = Some(Box::new(hook));
        self
    }

    /// Resolve a color with the given opacity (0-255).
    pub fn resolve(&self, spec: &ColorSpec, opacity: u8) -> DrawResult<Color> {
        match spec {
            ColorSpec::Gray(ink) => Ok(Color::rgba(*ink, *ink, *ink, opacity)),
            ColorSpec::Rgb(r, g, b) => Ok(Color::rgba(*r, *g, *b, opacity)),
            ColorSpec::Rgba(r, g, b, a) => Ok(Color::rgba(*r, *g, *b, *a)),
            ColorSpec::Name(name) => self.resolve_name(name, opacity),
        }
    }

    fn resolve_name(&self, name: &str, opacity: u8) -> DrawResult<Color> {
        if let Some(color) = parse_hex(name) {
            return Ok(color.with_alpha(opacity));
        }

        if let Some(hook) = &self.fallback {
            if let Some((r, g, b)) = hook(name) {
                return Ok(Color::rgba(r, g, b, opacity));
            }
        }

        named_colors()
            .get(name.to_ascii_lowercase().as_str())
            .map(|color| color.with_alpha(opacity))
            .ok_or_else(|| {
                log::warn!("unknown color name {:?}", name);
                DrawError::invalid(format!("unknown color '{}'", name))
            })
    }
}

impl fmt::Debug for ColorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorResolver")
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

fn parse_hex(name: &str) -> Option<Color> {
    let hex = name.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some(Color::rgb(
        (value >> 16) as u8,
        (value >> 8) as u8,
        value as u8,
    ))
}

fn named_colors() -> &'static FxHashMap<&'static str, Color> {
    static TABLE: OnceLock<FxHashMap<&'static str, Color>> = OnceLock::new();
    TABLE.get_or_init(|| {
        [
            ("aqua", Color::rgb(0x00, 0xFF, 0xFF)),
            ("black", Color::rgb(0x00, 0x00, 0x00)),
            ("blue", Color::rgb(0x00, 0x00, 0xFF)),
            ("fuchsia", Color::rgb(0xFF, 0x00, 0xFF)),
            ("gray", Color::rgb(0x80, 0x80, 0x80)),
            ("green", Color::rgb(0x00, 0x80, 0x00)),
            ("lime", Color::rgb(0x00, 0xFF, 0x00)),
            ("maroon", Color::rgb(0x80, 0x00, 0x00)),
            ("navy", Color::rgb(0x00, 0x00, 0x80)),
            ("olive", Color::rgb(0x80, 0x80, 0x00)),
            ("purple", Color::rgb(0x80, 0x00, 0x80)),
            ("red", Color::rgb(0xFF, 0x00, 0x00)),
            ("silver", Color::rgb(0xC0, 0xC0, 0xC0)),
            ("teal", Color::rgb(0x00, 0x80, 0x80)),
            ("white", Color::rgb(0xFF, 0xFF, 0xFF)),
            ("yellow", Color::rgb(0xFF, 0xFF, 0x00)),
            ("gold", Color::rgb(0xFF, 0xD7, 0x00)),
            ("orange", Color::rgb(0xFF, 0xA5, 0x00)),
            ("skyblue", Color::rgb(0x87, 0xCE, 0xEB)),
            ("tomato", Color::rgb(0xFF, 0x63, 0x47)),
        ]
        .into_iter()
        .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        let resolver = ColorResolver::new();
        let color = resolver.resolve(&"#ff8000".into(), 255).unwrap();
        assert_eq!(color, Color::rgb(255, 128, 0));
    }

    #[test]
    fn test_named_color_with_opacity() {
        let resolver = ColorResolver::new();
        let color = resolver.resolve(&"Teal".into(), 128).unwrap();
        assert_eq!(color, Color::rgba(0, 128, 128, 128));
    }

    #[test]
    fn test_tuple_alpha_wins_over_opacity() {
        let resolver = ColorResolver::new();
        let color = resolver.resolve(&(1u8, 2u8, 3u8, 4u8).into(), 200).unwrap();
        assert_eq!(color, Color::rgba(1, 2, 3, 4));
    }

    #[test]
    fn test_gray_level() {
        let resolver = ColorResolver::new();
        let color = resolver.resolve(&ColorSpec::Gray(90), 255).unwrap();
        assert_eq!(color, Color::rgb(90, 90, 90));
    }

    #[test]
    fn test_fallback_hook_runs_before_builtin_names() {
        let resolver = ColorResolver::new().with_fallback(|name| match name {
            "red" => Some((200, 0, 0)),
            "brand" => Some((1, 2, 3)),
            _ => None,
        });
        assert_eq!(
            resolver.resolve(&"brand".into(), 255).unwrap(),
            Color::rgb(1, 2, 3)
        );
        assert_eq!(
            resolver.resolve(&"red".into(), 255).unwrap(),
            Color::rgb(200, 0, 0)
        );
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let resolver = ColorResolver::new();
        let err = resolver.resolve(&"no-such-color".into(), 255).unwrap_err();
        assert!(matches!(err, DrawError::InvalidArgument(_)));
    }

    #[test]
    fn test_luminance() {
        assert_eq!(Color::white().luminance(), 255);
        assert_eq!(Color::black().luminance(), 0);
        assert_eq!(Color::rgb(255, 0, 0).luminance(), 76);
    }
}
