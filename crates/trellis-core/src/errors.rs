//! Error types for the Trellis engine.

use thiserror::Error;

use crate::types::Orientation;

/// Which bound of an axis constraint a value was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeField {
    Min,
    Pref,
    Max,
}

impl std::fmt::Display for SizeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SizeField::Min => f.write_str("min"),
            SizeField::Pref => f.write_str("pref"),
            SizeField::Max => f.write_str("max"),
        }
    }
}

/// Configuration errors raised when constraints or cells are registered.
///
/// The sizing passes themselves never fail; every invalid input is rejected
/// here, at the point it enters the grid.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("Invalid {orientation} span {span}: a span must cover at least one axis")]
    InvalidSpan { orientation: Orientation, span: u32 },

    #[error("Negative {field} size {value} on axis {index}")]
    NegativeSize {
        index: usize,
        field: SizeField,
        value: f64,
    },

    #[error("Non-finite {field} size on axis {index}")]
    NonFiniteSize { index: usize, field: SizeField },

    #[error("Percentage {value} on axis {index} is outside 0..=100")]
    InvalidPercent { index: usize, value: f64 },

    #[error("Cell placed at {orientation} index {start} extends past the last supported axis")]
    AxisOutOfRange { orientation: Orientation, start: usize },

    #[error("Negative {what}: {value}")]
    NegativeSpacing { what: &'static str, value: f64 },

    #[error("Unknown cell id {0}")]
    UnknownCell(u64),
}

/// Convenience alias used by configuration methods.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GridError::InvalidSpan {
            orientation: Orientation::Horizontal,
            span: 0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid horizontal span 0: a span must cover at least one axis"
        );

        let err = GridError::NegativeSize {
            index: 2,
            field: SizeField::Max,
            value: -4.0,
        };
        assert_eq!(err.to_string(), "Negative max size -4 on axis 2");

        let err = GridError::InvalidPercent { index: 0, value: 120.0 };
        assert!(err.to_string().contains("outside 0..=100"));

        let err = GridError::AxisOutOfRange {
            orientation: Orientation::Vertical,
            start: 70_000,
        };
        assert_eq!(
            err.to_string(),
            "Cell placed at vertical index 70000 extends past the last supported axis"
        );
    }
}
