//! Cells placed on the grid and the content they measure.

use std::fmt;
use std::rc::Rc;

use trellis_core::{
    GridError, HPos, Insets, Orientation, Priority, SizeRange, Span, VPos, MAX_AXES,
};

/// Something that can report its size to the grid.
///
/// Implementations must be deterministic and must not query the grid that
/// owns them. They may call [`GridPane::invalidate`](crate::GridPane::invalidate);
/// the call is deferred until the running sizing pass finishes.
pub trait Content {
    /// Min/pref/max extent along `orientation`, optionally given the extent
    /// already resolved for the opposite orientation.
    fn measure(&self, orientation: Orientation, for_opposite: Option<f64>) -> SizeRange;

    /// The orientation this content's other size depends on, if any.
    fn content_bias(&self) -> Option<Orientation> {
        None
    }

    /// Distance from the top edge to the text baseline. `None` places the
    /// baseline on the bottom edge.
    fn baseline_offset(&self) -> Option<f64> {
        None
    }
}

/// Plain-data content with fixed size ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedContent {
    pub width: SizeRange,
    pub height: SizeRange,
    pub baseline: Option<f64>,
}

impl FixedContent {
    /// Resizable content preferring `width` x `height`.
    pub fn new(width: f64, height: f64) -> Self {
        Self::sized(SizeRange::flexible(width), SizeRange::flexible(height))
    }

    /// Content with explicit ranges on both orientations.
    pub fn sized(width: SizeRange, height: SizeRange) -> Self {
        Self {
            width,
            height,
            baseline: None,
        }
    }

    /// Content that can neither grow nor shrink.
    pub fn rigid(width: f64, height: f64) -> Self {
        Self::sized(SizeRange::fixed(width), SizeRange::fixed(height))
    }

    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Wrap into the shared handle cells hold.
    pub fn shared(self) -> Rc<dyn Content> {
        Rc::new(self)
    }
}

impl Content for FixedContent {
    fn measure(&self, orientation: Orientation, _for_opposite: Option<f64>) -> SizeRange {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }

    fn baseline_offset(&self) -> Option<f64> {
        self.baseline
    }
}

/// Identifier of a cell within one grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId(pub u64);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A managed cell together with its id, as seen by the sizing passes.
pub type CellRef<'a> = (CellId, &'a GridCell);

/// A cell: placement, alignment, and growth requests for one piece of
/// content.
#[derive(Clone)]
pub struct GridCell {
    /// Start column
    pub column: usize,
    /// Start row
    pub row: usize,
    pub column_span: Span,
    pub row_span: Span,
    /// Horizontal alignment; falls back to the column, then `Left`
    pub halignment: Option<HPos>,
    /// Vertical alignment; falls back to the row, then `Center`
    pub valignment: Option<VPos>,
    /// Stretch to the area width; falls back to the column, then `true`
    pub fill_width: Option<bool>,
    /// Stretch to the area height; falls back to the row, then `true`
    pub fill_height: Option<bool>,
    /// Grow request for the column (single-span cells only)
    pub hgrow: Option<Priority>,
    /// Grow request for the row (single-span cells only)
    pub vgrow: Option<Priority>,
    pub margin: Insets,
    /// Unmanaged cells take no part in sizing or placement
    pub managed: bool,
    content: Rc<dyn Content>,
}

impl GridCell {
    /// Place `content` at (`column`, `row`) with a 1x1 span.
    pub fn new(content: Rc<dyn Content>, column: usize, row: usize) -> Self {
        Self {
            column,
            row,
            column_span: Span::ONE,
            row_span: Span::ONE,
            halignment: None,
            valignment: None,
            fill_width: None,
            fill_height: None,
            hgrow: None,
            vgrow: None,
            margin: Insets::ZERO,
            managed: true,
            content,
        }
    }

    pub fn with_span(mut self, column_span: impl Into<Span>, row_span: impl Into<Span>) -> Self {
        self.column_span = column_span.into();
        self.row_span = row_span.into();
        self
    }

    pub fn with_column_span(mut self, span: impl Into<Span>) -> Self {
        self.column_span = span.into();
        self
    }

    pub fn with_row_span(mut self, span: impl Into<Span>) -> Self {
        self.row_span = span.into();
        self
    }

    pub fn with_halignment(mut self, halignment: HPos) -> Self {
        self.halignment = Some(halignment);
        self
    }

    pub fn with_valignment(mut self, valignment: VPos) -> Self {
        self.valignment = Some(valignment);
        self
    }

    pub fn with_fill(mut self, fill_width: bool, fill_height: bool) -> Self {
        self.fill_width = Some(fill_width);
        self.fill_height = Some(fill_height);
        self
    }

    pub fn with_hgrow(mut self, priority: Priority) -> Self {
        self.hgrow = Some(priority);
        self
    }

    pub fn with_vgrow(mut self, priority: Priority) -> Self {
        self.vgrow = Some(priority);
        self
    }

    pub fn with_margin(mut self, margin: Insets) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_managed(mut self, managed: bool) -> Self {
        self.managed = managed;
        self
    }

    pub fn content(&self) -> &Rc<dyn Content> {
        &self.content
    }

    pub fn set_content(&mut self, content: Rc<dyn Content>) {
        self.content = content;
    }

    /// Start index along an orientation (column for horizontal).
    pub fn start(&self, orientation: Orientation) -> usize {
        match orientation {
            Orientation::Horizontal => self.column,
            Orientation::Vertical => self.row,
        }
    }

    pub fn span(&self, orientation: Orientation) -> Span {
        match orientation {
            Orientation::Horizontal => self.column_span,
            Orientation::Vertical => self.row_span,
        }
    }

    /// Grow request along an orientation.
    pub fn grow(&self, orientation: Orientation) -> Priority {
        match orientation {
            Orientation::Horizontal => self.hgrow,
            Orientation::Vertical => self.vgrow,
        }
        .unwrap_or_default()
    }

    /// Last axis index this cell covers, given the resolved axis count.
    pub fn end(&self, orientation: Orientation, count: usize) -> usize {
        self.span(orientation).end_index(self.start(orientation), count)
    }

    /// Last axis index known before the axis count is resolved; a
    /// `Remaining` span only vouches for its start.
    pub(crate) fn known_end(&self, orientation: Orientation) -> usize {
        match self.span(orientation) {
            Span::Remaining => self.start(orientation),
            span => span.end_index(self.start(orientation), 0),
        }
    }

    /// Reject zero spans, placements past the last supported axis, and
    /// invalid margins.
    pub fn validate(&self) -> Result<(), GridError> {
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let span = self.span(orientation);
            span.validate(orientation)?;
            let start = self.start(orientation);
            match span.checked_end(start) {
                Some(end) if end < MAX_AXES => {}
                _ => return Err(GridError::AxisOutOfRange { orientation, start }),
            }
        }
        if !self.margin.is_valid() {
            return Err(GridError::NegativeSpacing {
                what: "cell margin",
                value: [
                    self.margin.top,
                    self.margin.right,
                    self.margin.bottom,
                    self.margin.left,
                ]
                .into_iter()
                .fold(0.0, f64::min),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridCell")
            .field("column", &self.column)
            .field("row", &self.row)
            .field("column_span", &self.column_span)
            .field("row_span", &self.row_span)
            .field("halignment", &self.halignment)
            .field("valignment", &self.valignment)
            .field("fill_width", &self.fill_width)
            .field("fill_height", &self.fill_height)
            .field("hgrow", &self.hgrow)
            .field("vgrow", &self.vgrow)
            .field("margin", &self.margin)
            .field("managed", &self.managed)
            .finish_non_exhaustive()
    }
}
