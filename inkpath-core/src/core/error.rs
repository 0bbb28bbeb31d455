use std::fmt;

/// Universal error type for drawing operations.
///
/// Every fallible call in the crate reports one of these. Errors are raised
/// eagerly at the call boundary and abort only that call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawError {
    /// Malformed numeric sequence, odd coordinate count, bad pixel mode, ...
    InvalidArgument(String),

    /// Malformed SVG-style path description
    ParseError { position: usize, message: String },

    /// The operation needs an optional component that was not compiled in
    UnsupportedOperation(String),

    /// The rasterizer backend refused the request (allocation, empty geometry)
    RenderingError(String),
}

impl DrawError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        DrawError::InvalidArgument(msg.into())
    }

    pub(crate) fn parse(position: usize, msg: impl Into<String>) -> Self {
        DrawError::ParseError {
            position,
            message: msg.into(),
        }
    }
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::InvalidArgument(msg) => {
                write!(f, "Invalid argument: {}", msg)
            }
            DrawError::ParseError { position, message } => {
                write!(f, "Parse error at offset {}: {}", position, message)
            }
            DrawError::UnsupportedOperation(msg) => {
                write!(f, "Unsupported operation: {}", msg)
            }
            DrawError::RenderingError(msg) => {
                write!(f, "Rendering error: {}", msg)
            }
        }
    }
}

impl std::error::Error for DrawError {}

/// Result type alias for drawing operations
pub type DrawResult<T> = Result<T, DrawError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = DrawError::parse(4, "unknown path command 'X'");
        assert_eq!(
            err.to_string(),
            "Parse error at offset 4: unknown path command 'X'"
        );

        let err = DrawError::invalid("expected even number of coordinates");
        assert_eq!(
            err.to_string(),
            "Invalid argument: expected even number of coordinates"
        );
    }
}
