//! SVG-style path descriptions ("symbols").
//!
//! Supported operators are `M L H V C S Q T Z` and their lower-case
//! relative forms. An operator letter is sticky: a number group without a
//! letter in front repeats the previous operator. Numbers may be separated
//! by whitespace and at most one comma.

use super::flatten::DEFAULT_TOLERANCE;
use super::path::{Path, PathCommand};
use crate::core::coords::Point;
use crate::core::error::{DrawError, DrawResult};

/// Parse a path description, scaling every coordinate by `scale`.
///
/// If the description contains curves, the returned path is flattened with
/// [`DEFAULT_TOLERANCE`].
pub fn parse_symbol(source: &str, scale: f64) -> DrawResult<Path> {
    let mut path = Path::new();
    path.extend_from_svg(source, scale)?;
    if path.has_curves() {
        path = path.to_polyline(DEFAULT_TOLERANCE);
    }
    Ok(path)
}

impl Path {
    /// Append the commands described by `source` to this path.
    ///
    /// Curves are kept as curves. On error, commands emitted before the
    /// failing operator stay in the path.
    pub fn extend_from_svg(&mut self, source: &str, scale: f64) -> DrawResult<()> {
        SymbolParser::new(source, scale, self).run()
    }
}

struct SymbolParser<'a> {
    src: &'a [u8],
    pos: usize,
    scale: f64,
    path: &'a mut Path,
}

impl<'a> SymbolParser<'a> {
    fn new(source: &'a str, scale: f64, path: &'a mut Path) -> Self {
        SymbolParser {
            src: source.as_bytes(),
            pos: 0,
            scale,
            path,
        }
    }

    fn run(&mut self) -> DrawResult<()> {
        let mut op: Option<u8> = None;

        loop {
            self.skip_whitespace();
            let Some(ch) = self.peek() else {
                break;
            };

            let op_pos = self.pos;
            let current = if ch.is_ascii_alphabetic() {
                self.pos += 1;
                ch
            } else {
                match op {
                    None => {
                        return Err(DrawError::parse(op_pos, "no command at start of path"));
                    }
                    Some(b'Z' | b'z') => {
                        return Err(DrawError::parse(op_pos, "unexpected number after close"));
                    }
                    Some(prev) => {
                        self.skip_comma_wsp();
                        prev
                    }
                }
            };
            op = Some(current);

            #[cfg(feature = "debug-logging")]
            log::trace!("symbol: '{}' at offset {}", current as char, op_pos);

            self.operator(current, op_pos)?;
        }

        Ok(())
    }

    fn operator(&mut self, op: u8, op_pos: usize) -> DrawResult<()> {
        let relative = op.is_ascii_lowercase();

        match op {
            b'M' | b'm' => {
                let (x, y) = self.read_point(relative)?;
                self.path.move_to(x, y);
            }
            b'L' | b'l' => {
                let (x, y) = self.read_point(relative)?;
                self.ensure_cursor();
                self.path.line_to(x, y)?;
            }
            b'H' | b'h' => {
                let mut x = self.read_number()?;
                let last = self.cursor();
                if relative {
                    x += last.x;
                }
                self.ensure_cursor();
                self.path.line_to(x, last.y)?;
            }
            b'V' | b'v' => {
                let mut y = self.read_number()?;
                let last = self.cursor();
                if relative {
                    y += last.y;
                }
                self.ensure_cursor();
                self.path.line_to(last.x, y)?;
            }
            b'C' | b'c' => {
                let (x1, y1) = self.read_point(relative)?;
                self.skip_comma_wsp();
                let (x2, y2) = self.read_point(relative)?;
                self.skip_comma_wsp();
                let (x, y) = self.read_point(relative)?;
                self.ensure_cursor();
                self.path.curve4(x1, y1, x2, y2, x, y)?;
            }
            b'S' | b's' => {
                let (x2, y2) = self.read_point(relative)?;
                self.skip_comma_wsp();
                let (x, y) = self.read_point(relative)?;
                let c1 = self.smooth_control(op, |cmd| matches!(cmd, PathCommand::Curve4(..)));
                self.ensure_cursor();
                self.path.curve4(c1.x, c1.y, x2, y2, x, y)?;
            }
            b'Q' | b'q' => {
                let (x1, y1) = self.read_point(relative)?;
                self.skip_comma_wsp();
                let (x, y) = self.read_point(relative)?;
                self.ensure_cursor();
                self.path.curve3(x1, y1, x, y)?;
            }
            b'T' | b't' => {
                let (x, y) = self.read_point(relative)?;
                let c = self.smooth_control(op, |cmd| matches!(cmd, PathCommand::Curve3(..)));
                self.ensure_cursor();
                self.path.curve3(c.x, c.y, x, y)?;
            }
            b'Z' | b'z' => {
                // Closing an empty path has nothing to close.
                if self.path.last_vertex().is_some() {
                    self.path.close_polygon()?;
                }
            }
            other => {
                return Err(DrawError::parse(
                    op_pos,
                    format!("unknown path command '{}'", other as char),
                ));
            }
        }

        Ok(())
    }

    /// Reflection of the previous control point about the cursor when the
    /// previous command is of the kind `accepts` matches, else the cursor.
    ///
    /// `S` only mirrors a cubic and `T` only a quadratic, as in SVG: an `S`
    /// after a quadratic (or a `T` after a cubic) starts from the cursor.
    fn smooth_control(&self, op: u8, accepts: impl Fn(&PathCommand) -> bool) -> Point {
        let cursor = self.cursor();
        match self.path.last_command() {
            Some(cmd) if accepts(cmd) => match cmd.last_control() {
                Some(ctrl) => cursor.reflect(ctrl),
                None => cursor,
            },
            _ => {
                log::warn!(
                    "smooth curve '{}' at offset {} does not follow a curve of its kind",
                    op as char,
                    self.pos
                );
                cursor
            }
        }
    }

    /// The last vertex, or the origin on an empty path.
    fn cursor(&self) -> Point {
        self.path.last_vertex().unwrap_or_default()
    }

    /// Drawing operators on an empty path start from the origin.
    fn ensure_cursor(&mut self) {
        if self.path.last_vertex().is_none() {
            log::debug!("symbol: implicit move to origin at offset {}", self.pos);
            self.path.move_to(0.0, 0.0);
        }
    }

    fn read_point(&mut self, relative: bool) -> DrawResult<(f64, f64)> {
        let x = self.read_number()?;
        self.skip_comma_wsp();
        let y = self.read_number()?;
        if relative {
            Ok(self.path.rel_to_abs(x, y))
        } else {
            Ok((x, y))
        }
    }

    /// Reads one number and applies the scale factor.
    fn read_number(&mut self) -> DrawResult<f64> {
        self.skip_whitespace();
        let start = self.pos;
        let mut end = start;

        // Optional sign
        if matches!(self.byte_at(end), Some(b'+' | b'-')) {
            end += 1;
        }

        let int_digits = self.count_digits(end);
        end += int_digits;

        let mut frac_digits = 0;
        if self.byte_at(end) == Some(b'.') {
            frac_digits = self.count_digits(end + 1);
            end += 1 + frac_digits;
        }

        if int_digits == 0 && frac_digits == 0 {
            return Err(DrawError::parse(start, "invalid arguments: expected a number"));
        }

        // Exponent, only when followed by at least one digit
        if matches!(self.byte_at(end), Some(b'e' | b'E')) {
            let mut exp_end = end + 1;
            if matches!(self.byte_at(exp_end), Some(b'+' | b'-')) {
                exp_end += 1;
            }
            let exp_digits = self.count_digits(exp_end);
            if exp_digits > 0 {
                end = exp_end + exp_digits;
            }
        }

        let text = std::str::from_utf8(&self.src[start..end])
            .map_err(|_| DrawError::parse(start, "invalid arguments: expected a number"))?;
        let value: f64 = text
            .parse()
            .map_err(|_| DrawError::parse(start, format!("invalid number '{}'", text)))?;

        self.pos = end;
        Ok(value * self.scale)
    }

    fn count_digits(&self, from: usize) -> usize {
        self.src
            .get(from..)
            .map(|rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
            .unwrap_or(0)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Whitespace, at most one comma, then whitespace again.
    fn skip_comma_wsp(&mut self) {
        self.skip_whitespace();
        if self.peek() == Some(b',') {
            self.pos += 1;
            self.skip_whitespace();
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.byte_at(self.pos)
    }

    #[inline]
    fn byte_at(&self, i: usize) -> Option<u8> {
        self.src.get(i).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(src: &str) -> Vec<PathCommand> {
        let mut path = Path::new();
        path.extend_from_svg(src, 1.0).unwrap();
        path.commands().to_vec()
    }

    #[test]
    fn test_square() {
        let path = parse_symbol("M0,0 L10,0 L10,10 Z", 1.0).unwrap();
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(0.0, 0.0),
                PathCommand::LineTo(10.0, 0.0),
                PathCommand::LineTo(10.0, 10.0),
                PathCommand::ClosePolygon,
            ]
        );
    }

    #[test]
    fn test_relative_matches_absolute() {
        assert_eq!(commands("m0,0 l10,0 l0,10"), commands("M0,0 L10,0 L10,10"));
    }

    #[test]
    fn test_sticky_operator() {
        assert_eq!(
            commands("M0 0 L1 1 2 2, 3 3"),
            vec![
                PathCommand::MoveTo(0.0, 0.0),
                PathCommand::LineTo(1.0, 1.0),
                PathCommand::LineTo(2.0, 2.0),
                PathCommand::LineTo(3.0, 3.0),
            ]
        );
    }

    #[test]
    fn test_horizontal_and_vertical() {
        assert_eq!(
            commands("M5,5 H10 V20 h-5 v-5"),
            vec![
                PathCommand::MoveTo(5.0, 5.0),
                PathCommand::LineTo(10.0, 5.0),
                PathCommand::LineTo(10.0, 20.0),
                PathCommand::LineTo(5.0, 20.0),
                PathCommand::LineTo(5.0, 15.0),
            ]
        );
    }

    #[test]
    fn test_scale_applies_to_every_coordinate() {
        let mut path = Path::new();
        path.extend_from_svg("C1,2 3,4 5,6", 2.0).unwrap();
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(0.0, 0.0),
                PathCommand::Curve4(2.0, 4.0, 6.0, 8.0, 10.0, 12.0),
            ]
        );
    }

    #[test]
    fn test_relative_curve_after_scale() {
        let mut path = Path::new();
        path.extend_from_svg("M1,1 c1,0 1,1 0,1", 10.0).unwrap();
        assert_eq!(
            path.commands()[1],
            PathCommand::Curve4(20.0, 10.0, 20.0, 20.0, 10.0, 20.0)
        );
    }

    #[test]
    fn test_smooth_quadratic_reflects_control() {
        let cmds = commands("M0,0 Q5,10 10,0 T20,0");
        assert_eq!(cmds[2], PathCommand::Curve3(15.0, -10.0, 20.0, 0.0));
    }

    #[test]
    fn test_smooth_cubic_reflects_control() {
        let cmds = commands("M0,0 C0,10 10,10 10,0 S20,-10 20,0");
        assert_eq!(cmds[2], PathCommand::Curve4(10.0, -10.0, 20.0, -10.0, 20.0, 0.0));
    }

    #[test]
    fn test_smooth_without_previous_curve_degenerates() {
        let cmds = commands("M5,5 T10,10");
        assert_eq!(cmds[1], PathCommand::Curve3(5.0, 5.0, 10.0, 10.0));

        // A cubic does not qualify as the previous curve of T
        let cmds = commands("M0,0 C1,1 2,2 3,3 T6,6");
        assert_eq!(cmds[2], PathCommand::Curve3(3.0, 3.0, 6.0, 6.0));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            commands("M-1.5e1,.5 L+2-3 L1.5.5"),
            vec![
                PathCommand::MoveTo(-15.0, 0.5),
                PathCommand::LineTo(2.0, -3.0),
                PathCommand::LineTo(1.5, 0.5),
            ]
        );
    }

    #[test]
    fn test_curves_are_flattened() {
        let path = parse_symbol("M0,0 Q5,10 10,0", 1.0).unwrap();
        assert!(!path.has_curves());
        assert!(path.len() > 2);
        assert_eq!(*path.commands().last().unwrap(), PathCommand::LineTo(10.0, 0.0));
    }

    #[test]
    fn test_unknown_operator() {
        let mut path = Path::new();
        let err = path.extend_from_svg("M0,0 X10,10", 1.0).unwrap_err();
        assert_eq!(
            err,
            DrawError::ParseError {
                position: 5,
                message: "unknown path command 'X'".into()
            }
        );
        // Commands before the bad operator are kept
        assert_eq!(path.commands(), &[PathCommand::MoveTo(0.0, 0.0)]);
    }

    #[test]
    fn test_number_before_operator() {
        let err = parse_symbol("10,10 L5,5", 1.0).unwrap_err();
        assert!(matches!(err, DrawError::ParseError { position: 0, .. }));
    }

    #[test]
    fn test_missing_argument() {
        let err = parse_symbol("M10", 1.0).unwrap_err();
        assert!(matches!(err, DrawError::ParseError { position: 3, .. }));

        let err = parse_symbol("M10,10 L5,", 1.0).unwrap_err();
        assert!(matches!(err, DrawError::ParseError { .. }));
    }

    #[test]
    fn test_number_after_close() {
        let err = parse_symbol("M0,0 L1,1 Z 5,5", 1.0).unwrap_err();
        assert!(matches!(err, DrawError::ParseError { position: 12, .. }));
    }

    #[test]
    fn test_empty_and_blank() {
        assert!(parse_symbol("", 1.0).unwrap().is_empty());
        assert!(parse_symbol("  \n\t", 1.0).unwrap().is_empty());
        assert!(parse_symbol("Z", 1.0).unwrap().is_empty());
    }
}
