//! Row and column constraints, spans, and the size sentinels.

use crate::errors::{GridError, Result, SizeField};
use crate::types::{HPos, Orientation, Priority, VPos};

/// An explicit size bound on a row or column.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SizeOverride {
    /// Derive the bound from the content of the axis
    #[default]
    Computed,
    /// Use the axis's preferred size as this bound
    UsePref,
    /// A fixed length
    Fixed(f64),
}

/// Sentinel: derive the bound from content.
pub const USE_COMPUTED_SIZE: SizeOverride = SizeOverride::Computed;

/// Sentinel: reuse the preferred size.
pub const USE_PREF_SIZE: SizeOverride = SizeOverride::UsePref;

impl SizeOverride {
    /// The fixed length, if any.
    pub fn fixed(self) -> Option<f64> {
        match self {
            SizeOverride::Fixed(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_use_pref(self) -> bool {
        matches!(self, SizeOverride::UsePref)
    }

    pub fn is_computed(self) -> bool {
        matches!(self, SizeOverride::Computed)
    }

    fn validate(self, index: usize, field: SizeField) -> Result<()> {
        match self {
            SizeOverride::Fixed(v) if !v.is_finite() => {
                Err(GridError::NonFiniteSize { index, field })
            }
            SizeOverride::Fixed(v) if v < 0.0 => Err(GridError::NegativeSize {
                index,
                field,
                value: v,
            }),
            _ => Ok(()),
        }
    }
}

impl From<f64> for SizeOverride {
    fn from(value: f64) -> Self {
        SizeOverride::Fixed(value)
    }
}

/// Number of consecutive axes a cell occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Span {
    /// A finite span; must be at least 1
    Cells(u32),
    /// Extend to the last axis of the grid
    Remaining,
}

/// Sentinel: span to the last row or column.
pub const REMAINING: Span = Span::Remaining;

/// Most rows or columns a grid can hold; every cell must end below this index.
pub const MAX_AXES: usize = 1 << 16;

impl Span {
    pub const ONE: Self = Span::Cells(1);

    /// Whether the span covers exactly one axis.
    pub fn is_single(self) -> bool {
        self == Span::ONE
    }

    /// Reject spans that cover no axis.
    pub fn validate(self, orientation: Orientation) -> Result<()> {
        match self {
            Span::Cells(0) => Err(GridError::InvalidSpan {
                orientation,
                span: 0,
            }),
            _ => Ok(()),
        }
    }

    /// The last axis index covered by a span starting at `start`, given the
    /// resolved axis count. `Remaining` resolves to `count - 1`.
    pub fn end_index(self, start: usize, count: usize) -> usize {
        match self {
            Span::Cells(n) => start.saturating_add((n as usize).saturating_sub(1)),
            Span::Remaining => count.saturating_sub(1).max(start),
        }
    }

    /// The last axis index a span starting at `start` is known to cover,
    /// or `None` if it does not fit in `usize`. `Remaining` vouches for its
    /// start only.
    pub fn checked_end(self, start: usize) -> Option<usize> {
        match self {
            Span::Cells(n) => start.checked_add((n as usize).checked_sub(1)?),
            Span::Remaining => Some(start),
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Span::ONE
    }
}

impl From<u32> for Span {
    fn from(n: u32) -> Self {
        Span::Cells(n)
    }
}

/// Constraints applied to one row or one column.
///
/// `A` is the alignment type of the axis: [`VPos`] for rows, [`HPos`] for
/// columns.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AxisConstraints<A> {
    /// Minimum size of the axis
    pub min: SizeOverride,
    /// Preferred size of the axis
    pub pref: SizeOverride,
    /// Maximum size of the axis
    pub max: SizeOverride,
    /// Share of the container, 0 to 100; takes precedence over min/pref/max
    pub percent: Option<f64>,
    /// Grow priority; `None` behaves as `Priority::Never`
    pub grow: Option<Priority>,
    /// Default alignment for cells on this axis
    pub alignment: Option<A>,
    /// Whether cells on this axis are stretched to fill it by default
    pub fill: bool,
}

/// Constraints for a row.
pub type RowConstraints = AxisConstraints<VPos>;

/// Constraints for a column.
pub type ColumnConstraints = AxisConstraints<HPos>;

impl<A> Default for AxisConstraints<A> {
    fn default() -> Self {
        Self {
            min: SizeOverride::Computed,
            pref: SizeOverride::Computed,
            max: SizeOverride::Computed,
            percent: None,
            grow: None,
            alignment: None,
            fill: true,
        }
    }
}

impl<A> AxisConstraints<A> {
    /// Unconstrained axis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Axis whose min, pref, and max are all `size`.
    pub fn fixed(size: f64) -> Self {
        Self::default().with_min(size).with_pref(size).with_max(size)
    }

    /// Axis taking `percent` of the container.
    pub fn percent(percent: f64) -> Self {
        Self::default().with_percent(percent)
    }

    /// Axis that grows with the given priority.
    pub fn growing(priority: Priority) -> Self {
        Self::default().with_grow(priority)
    }

    pub fn with_min(mut self, min: impl Into<SizeOverride>) -> Self {
        self.min = min.into();
        self
    }

    pub fn with_pref(mut self, pref: impl Into<SizeOverride>) -> Self {
        self.pref = pref.into();
        self
    }

    pub fn with_max(mut self, max: impl Into<SizeOverride>) -> Self {
        self.max = max.into();
        self
    }

    pub fn with_percent(mut self, percent: f64) -> Self {
        self.percent = Some(percent);
        self
    }

    pub fn with_grow(mut self, priority: Priority) -> Self {
        self.grow = Some(priority);
        self
    }

    pub fn with_alignment(mut self, alignment: A) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    /// Check the constraint for negative or non-finite values.
    pub fn validate(&self, index: usize) -> Result<()> {
        self.min.validate(index, SizeField::Min)?;
        self.pref.validate(index, SizeField::Pref)?;
        self.max.validate(index, SizeField::Max)?;
        if let Some(percent) = self.percent {
            if !(0.0..=100.0).contains(&percent) {
                return Err(GridError::InvalidPercent {
                    index,
                    value: percent,
                });
            }
        }
        Ok(())
    }

    /// The sizing-relevant part of the constraint, independent of the
    /// alignment type.
    pub fn sizing(&self) -> AxisSizing {
        AxisSizing {
            min: self.min,
            pref: self.pref,
            max: self.max,
            percent: self.percent,
            grow: self.grow.unwrap_or_default(),
        }
    }
}

/// Alignment-free view of an axis constraint, as consumed by the sizing
/// passes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisSizing {
    pub min: SizeOverride,
    pub pref: SizeOverride,
    pub max: SizeOverride,
    pub percent: Option<f64>,
    pub grow: Priority,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_validation() {
        assert!(Span::Cells(1).validate(Orientation::Horizontal).is_ok());
        assert!(REMAINING.validate(Orientation::Vertical).is_ok());
        assert_eq!(
            Span::Cells(0).validate(Orientation::Vertical),
            Err(GridError::InvalidSpan {
                orientation: Orientation::Vertical,
                span: 0
            })
        );
    }

    #[test]
    fn test_span_end_index() {
        assert_eq!(Span::Cells(1).end_index(3, 10), 3);
        assert_eq!(Span::Cells(3).end_index(2, 10), 4);
        assert_eq!(Span::Remaining.end_index(2, 6), 5);
        // Remaining never ends before it starts
        assert_eq!(Span::Remaining.end_index(4, 2), 4);
        assert_eq!(Span::Cells(3).end_index(usize::MAX - 1, 0), usize::MAX);
    }

    #[test]
    fn test_span_checked_end() {
        assert_eq!(Span::Cells(3).checked_end(2), Some(4));
        assert_eq!(REMAINING.checked_end(7), Some(7));
        assert_eq!(Span::Cells(0).checked_end(2), None);
        assert_eq!(Span::Cells(1).checked_end(usize::MAX), Some(usize::MAX));
        assert_eq!(Span::Cells(3).checked_end(usize::MAX - 1), None);
    }

    #[test]
    fn test_constraint_validation() {
        let ok = ColumnConstraints::fixed(40.0).with_percent(25.0);
        assert!(ok.validate(0).is_ok());

        let negative = RowConstraints::new().with_min(-1.0);
        assert_eq!(
            negative.validate(3),
            Err(GridError::NegativeSize {
                index: 3,
                field: SizeField::Min,
                value: -1.0
            })
        );

        let nan = RowConstraints::new().with_max(f64::NAN);
        assert!(matches!(
            nan.validate(0),
            Err(GridError::NonFiniteSize { field: SizeField::Max, .. })
        ));

        let over = ColumnConstraints::percent(101.0);
        assert!(matches!(over.validate(1), Err(GridError::InvalidPercent { .. })));

        let sentinel = ColumnConstraints::new().with_max(USE_PREF_SIZE);
        assert!(sentinel.validate(0).is_ok());
    }

    #[test]
    fn test_sizing_defaults() {
        let sizing = RowConstraints::new().sizing();
        assert!(sizing.min.is_computed());
        assert_eq!(sizing.grow, Priority::Never);
        assert_eq!(sizing.percent, None);

        let sizing = ColumnConstraints::growing(Priority::Sometimes)
            .with_pref(30.0)
            .sizing();
        assert_eq!(sizing.pref.fixed(), Some(30.0));
        assert_eq!(sizing.grow, Priority::Sometimes);
    }
}
