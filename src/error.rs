//! Error types for metafield.
//!
//! The engine has no fallible I/O; its failure surface is degenerate
//! configuration values. Everything inside a tick is infallible.

use std::fmt;

/// Errors that can occur when configuring or commanding an engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineError {
    /// A logical dimension was zero. Buffers, scale factors, and the grid
    /// all require `width, height > 0`.
    InvalidDimensions { width: u32, height: u32 },
    /// Resolution scale outside `(0, 1]` or non-finite.
    InvalidResolutionScale(f64),
    /// Field strength was non-finite or not positive.
    InvalidFieldStrength(f64),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidDimensions { width, height } => {
                write!(f, "Invalid dimensions {}x{}: both must be > 0", width, height)
            }
            EngineError::InvalidResolutionScale(s) => {
                write!(f, "Invalid resolution scale {}: must be finite and in (0, 1]", s)
            }
            EngineError::InvalidFieldStrength(s) => {
                write!(f, "Invalid field strength {}: must be finite and > 0", s)
            }
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_bad_value() {
        let err = EngineError::InvalidDimensions { width: 0, height: 600 };
        assert!(err.to_string().contains("0x600"));

        let err = EngineError::InvalidResolutionScale(1.5);
        assert!(err.to_string().contains("1.5"));
    }
}
