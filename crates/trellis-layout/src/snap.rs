//! Pixel snapping.

/// Rounds spacing, sizes, and positions to whole pixels when enabled.
///
/// Spacing and positions round to the nearest pixel; sizes round up so that
/// content is never clipped by snapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapper {
    enabled: bool,
}

impl Snapper {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Snap a gap, padding, or limit.
    pub fn space(&self, value: f64) -> f64 {
        if self.enabled && value.is_finite() {
            value.round()
        } else {
            value
        }
    }

    /// Snap a size.
    pub fn size(&self, value: f64) -> f64 {
        if self.enabled && value.is_finite() && value < f64::MAX {
            value.ceil()
        } else {
            value
        }
    }

    /// Snap a position.
    pub fn position(&self, value: f64) -> f64 {
        self.space(value)
    }
}

impl Default for Snapper {
    fn default() -> Self {
        Self::new(true)
    }
}
