//! The grid container: configuration, cached sizing state, and the sizing
//! entry points.

use std::cell::{Cell, OnceCell, RefCell};
use std::rc::Rc;

use glam::DVec2;
use indexmap::IndexMap;
use tracing::{debug, trace};
use trellis_core::{
    Bounds, ColumnConstraints, GridError, Insets, Orientation, Pos, Result, RowConstraints,
    REMAINING,
};

use crate::cell::{CellId, CellRef, Content, GridCell};
use crate::composite::CompositeSize;
use crate::config::{check_padding, check_spacing, GridConfig};
use crate::distribute::AxisDistributor;
use crate::metrics::{Aspect, GridMetrics};
use crate::placement::{x_offset, y_offset, Placement};
use crate::snap::Snapper;
use crate::tables::TableBuilder;

/// Result of sizing the grid to a container.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayout {
    /// Row heights, top to bottom
    pub rows: Vec<f64>,
    /// Column widths, left to right
    pub columns: Vec<f64>,
    /// Height the rows occupy, gaps included
    pub row_total: f64,
    /// Width the columns occupy, gaps included
    pub column_total: f64,
    /// Bounds of every managed cell, in insertion order
    pub cells: IndexMap<CellId, Bounds>,
}

impl GridLayout {
    pub fn cell(&self, id: CellId) -> Option<&Bounds> {
        self.cells.get(&id)
    }
}

/// Metrics plus the unconstrained composite tables, built together and
/// dropped together.
#[derive(Debug)]
struct GridSnapshot {
    metrics: GridMetrics,
    row_min: OnceCell<CompositeSize>,
    row_pref: OnceCell<CompositeSize>,
    row_max: OnceCell<CompositeSize>,
    column_min: OnceCell<CompositeSize>,
    column_pref: OnceCell<CompositeSize>,
    column_max: OnceCell<CompositeSize>,
}

impl GridSnapshot {
    fn new(metrics: GridMetrics) -> Self {
        Self {
            metrics,
            row_min: OnceCell::new(),
            row_pref: OnceCell::new(),
            row_max: OnceCell::new(),
            column_min: OnceCell::new(),
            column_pref: OnceCell::new(),
            column_max: OnceCell::new(),
        }
    }

    /// The cached table for an aspect, built on first use.
    fn table(
        &self,
        aspect: Aspect,
        orientation: Orientation,
        builder: &TableBuilder<'_>,
    ) -> &CompositeSize {
        let slot = match (orientation, aspect) {
            (Orientation::Vertical, Aspect::Min) => &self.row_min,
            (Orientation::Vertical, Aspect::Pref) => &self.row_pref,
            (Orientation::Vertical, Aspect::Max) => &self.row_max,
            (Orientation::Horizontal, Aspect::Min) => &self.column_min,
            (Orientation::Horizontal, Aspect::Pref) => &self.column_pref,
            (Orientation::Horizontal, Aspect::Max) => &self.column_max,
        };
        if let Some(table) = slot.get() {
            return table;
        }
        // Built outside the cell so a nested query cannot re-enter it
        let built = builder.table(aspect, orientation, None);
        slot.get_or_init(|| built)
    }
}

/// Marks a sizing or query pass; invalidations requested while any pass is
/// running are applied when the outermost one ends.
struct PassGuard<'a> {
    pane: &'a GridPane,
}

impl<'a> PassGuard<'a> {
    fn enter(pane: &'a GridPane) -> Self {
        pane.depth.set(pane.depth.get() + 1);
        Self { pane }
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        let depth = self.pane.depth.get().saturating_sub(1);
        self.pane.depth.set(depth);
        if depth == 0 && self.pane.pending_invalidation.replace(false) {
            trace!("applying deferred invalidation");
            self.pane.snapshot.borrow_mut().take();
        }
    }
}

/// A grid container that sizes rows and columns and places cells in them.
///
/// Configuration goes through `&mut self` and drops the cached sizing state.
/// Queries and [`layout`](Self::layout) take `&self`, build the cached state
/// on demand, and return identical results until the configuration changes
/// or [`invalidate`](Self::invalidate) is called.
///
/// # Example
///
/// ```
/// use trellis_layout::{FixedContent, GridCell, GridPane};
/// use trellis_core::{ColumnConstraints, Priority};
///
/// let mut grid = GridPane::new();
/// grid.set_column_constraints(vec![
///     ColumnConstraints::new(),
///     ColumnConstraints::growing(Priority::Always),
/// ])
/// .unwrap();
/// grid.add(GridCell::new(FixedContent::new(80.0, 20.0).shared(), 0, 0)).unwrap();
/// grid.add(GridCell::new(FixedContent::new(50.0, 20.0).shared(), 1, 0)).unwrap();
///
/// let layout = grid.layout(300.0, 100.0);
/// assert_eq!(layout.columns, vec![80.0, 220.0]);
/// ```
#[derive(Debug)]
pub struct GridPane {
    rows: Vec<RowConstraints>,
    columns: Vec<ColumnConstraints>,
    cells: IndexMap<CellId, GridCell>,
    next_id: u64,
    hgap: f64,
    vgap: f64,
    padding: Insets,
    alignment: Pos,
    snap_to_pixel: bool,
    snapshot: RefCell<Option<Rc<GridSnapshot>>>,
    depth: Cell<u32>,
    pending_invalidation: Cell<bool>,
}

impl Default for GridPane {
    fn default() -> Self {
        Self::new()
    }
}

impl GridPane {
    /// An empty grid with no gaps, no padding, and top-left alignment.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            columns: Vec::new(),
            cells: IndexMap::new(),
            next_id: 0,
            hgap: 0.0,
            vgap: 0.0,
            padding: Insets::ZERO,
            alignment: Pos::TOP_LEFT,
            snap_to_pixel: true,
            snapshot: RefCell::new(None),
            depth: Cell::new(0),
            pending_invalidation: Cell::new(false),
        }
    }

    /// A grid configured from `config`.
    pub fn with_config(config: GridConfig) -> Result<Self> {
        config.validate()?;
        let mut pane = Self::new();
        pane.hgap = config.hgap;
        pane.vgap = config.vgap;
        pane.padding = config.padding;
        pane.alignment = config.alignment;
        pane.snap_to_pixel = config.snap_to_pixel;
        pane.rows = config.rows;
        pane.columns = config.columns;
        Ok(pane)
    }

    /// The current settings and constraints as a config value.
    pub fn config(&self) -> GridConfig {
        GridConfig {
            hgap: self.hgap,
            vgap: self.vgap,
            padding: self.padding,
            alignment: self.alignment,
            snap_to_pixel: self.snap_to_pixel,
            rows: self.rows.clone(),
            columns: self.columns.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    pub fn set_row_constraints(&mut self, rows: Vec<RowConstraints>) -> Result<()> {
        for (i, row) in rows.iter().enumerate() {
            row.validate(i)?;
        }
        self.rows = rows;
        self.invalidate();
        Ok(())
    }

    pub fn set_column_constraints(&mut self, columns: Vec<ColumnConstraints>) -> Result<()> {
        for (i, column) in columns.iter().enumerate() {
            column.validate(i)?;
        }
        self.columns = columns;
        self.invalidate();
        Ok(())
    }

    /// Append a row constraint, returning its index.
    pub fn add_row_constraints(&mut self, row: RowConstraints) -> Result<usize> {
        row.validate(self.rows.len())?;
        self.rows.push(row);
        self.invalidate();
        Ok(self.rows.len() - 1)
    }

    /// Append a column constraint, returning its index.
    pub fn add_column_constraints(&mut self, column: ColumnConstraints) -> Result<usize> {
        column.validate(self.columns.len())?;
        self.columns.push(column);
        self.invalidate();
        Ok(self.columns.len() - 1)
    }

    pub fn row_constraints(&self) -> &[RowConstraints] {
        &self.rows
    }

    pub fn column_constraints(&self) -> &[ColumnConstraints] {
        &self.columns
    }

    /// Add a cell. Indices beyond the current grid extend it, up to
    /// [`MAX_AXES`](trellis_core::MAX_AXES) rows and columns.
    pub fn add(&mut self, cell: GridCell) -> Result<CellId> {
        cell.validate()?;
        let id = CellId(self.next_id);
        self.next_id += 1;
        self.cells.insert(id, cell);
        self.invalidate();
        Ok(id)
    }

    /// Place `contents` left to right in `row`, after the last column any
    /// managed cell covering that row occupies. Stops at the first cell
    /// that would fall past the last supported column; cells added before
    /// it stay.
    pub fn add_row(
        &mut self,
        row: usize,
        contents: impl IntoIterator<Item = Rc<dyn Content>>,
    ) -> Result<Vec<CellId>> {
        let column = self.next_free(Orientation::Vertical, row);
        contents
            .into_iter()
            .enumerate()
            .map(|(i, content)| self.add(GridCell::new(content, column.saturating_add(i), row)))
            .collect()
    }

    /// Place `contents` top to bottom in `column`, after the last row any
    /// managed cell covering that column occupies. Stops at the first cell
    /// that would fall past the last supported row.
    pub fn add_column(
        &mut self,
        column: usize,
        contents: impl IntoIterator<Item = Rc<dyn Content>>,
    ) -> Result<Vec<CellId>> {
        let row = self.next_free(Orientation::Horizontal, column);
        contents
            .into_iter()
            .enumerate()
            .map(|(i, content)| self.add(GridCell::new(content, column, row.saturating_add(i))))
            .collect()
    }

    /// First free index along the other orientation of axis `index`.
    fn next_free(&self, orientation: Orientation, index: usize) -> usize {
        let along = orientation.opposite();
        self.cells
            .values()
            .filter(|cell| cell.managed)
            .filter(|cell| {
                let start = cell.start(orientation);
                index >= start
                    && (index <= cell.known_end(orientation)
                        || cell.span(orientation) == REMAINING)
            })
            .map(|cell| cell.known_end(along).saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    /// Remove a cell, returning it.
    pub fn remove(&mut self, id: CellId) -> Result<GridCell> {
        let cell = self
            .cells
            .shift_remove(&id)
            .ok_or(GridError::UnknownCell(id.0))?;
        self.invalidate();
        Ok(cell)
    }

    pub fn cell(&self, id: CellId) -> Option<&GridCell> {
        self.cells.get(&id)
    }

    /// Edit a cell in place. The edit is rejected, leaving the cell
    /// untouched, if the result is invalid.
    pub fn update_cell(&mut self, id: CellId, edit: impl FnOnce(&mut GridCell)) -> Result<()> {
        let current = self.cells.get(&id).ok_or(GridError::UnknownCell(id.0))?;
        let mut updated = current.clone();
        edit(&mut updated);
        updated.validate()?;
        self.cells.insert(id, updated);
        self.invalidate();
        Ok(())
    }

    /// All cells, managed or not, in insertion order.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &GridCell)> {
        self.cells.iter().map(|(id, cell)| (*id, cell))
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn set_hgap(&mut self, hgap: f64) -> Result<()> {
        check_spacing("hgap", hgap)?;
        self.hgap = hgap;
        self.invalidate();
        Ok(())
    }

    pub fn set_vgap(&mut self, vgap: f64) -> Result<()> {
        check_spacing("vgap", vgap)?;
        self.vgap = vgap;
        self.invalidate();
        Ok(())
    }

    pub fn set_padding(&mut self, padding: Insets) -> Result<()> {
        check_padding(&padding)?;
        self.padding = padding;
        self.invalidate();
        Ok(())
    }

    pub fn set_alignment(&mut self, alignment: Pos) {
        self.alignment = alignment;
        self.invalidate();
    }

    pub fn set_snap_to_pixel(&mut self, snap: bool) {
        self.snap_to_pixel = snap;
        self.invalidate();
    }

    pub fn hgap(&self) -> f64 {
        self.hgap
    }

    pub fn vgap(&self) -> f64 {
        self.vgap
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }

    pub fn alignment(&self) -> Pos {
        self.alignment
    }

    pub fn snap_to_pixel(&self) -> bool {
        self.snap_to_pixel
    }

    /// Drop the cached sizing state. While a sizing pass is running the
    /// drop is deferred until the pass ends.
    pub fn invalidate(&self) {
        if self.depth.get() > 0 {
            trace!("invalidation deferred until the running pass ends");
            self.pending_invalidation.set(true);
            return;
        }
        self.snapshot.borrow_mut().take();
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn min_width(&self, height: Option<f64>) -> f64 {
        self.query(Orientation::Horizontal, Aspect::Min, height)
    }

    pub fn min_height(&self, width: Option<f64>) -> f64 {
        self.query(Orientation::Vertical, Aspect::Min, width)
    }

    pub fn pref_width(&self, height: Option<f64>) -> f64 {
        self.query(Orientation::Horizontal, Aspect::Pref, height)
    }

    pub fn pref_height(&self, width: Option<f64>) -> f64 {
        self.query(Orientation::Vertical, Aspect::Pref, width)
    }

    /// Largest useful width; `f64::MAX` unless every column has a max.
    pub fn max_width(&self, height: Option<f64>) -> f64 {
        self.query(Orientation::Horizontal, Aspect::Max, height)
    }

    /// Largest useful height; `f64::MAX` unless every row has a max.
    pub fn max_height(&self, width: Option<f64>) -> f64 {
        self.query(Orientation::Vertical, Aspect::Max, width)
    }

    /// The orientation whose size the grid needs first, if any cell's
    /// content depends on one.
    pub fn content_bias(&self) -> Option<Orientation> {
        let _guard = PassGuard::enter(self);
        self.snapshot().metrics.content_bias
    }

    pub fn row_count(&self) -> usize {
        let _guard = PassGuard::enter(self);
        self.snapshot().metrics.rows.count
    }

    pub fn column_count(&self) -> usize {
        let _guard = PassGuard::enter(self);
        self.snapshot().metrics.columns.count
    }

    /// Size the grid to a `width` x `height` container and place every
    /// managed cell.
    pub fn layout(&self, width: f64, height: f64) -> GridLayout {
        let _guard = PassGuard::enter(self);
        debug!(width, height, cells = self.cells.len(), "grid layout");

        let snapshot = self.snapshot();
        let cells = self.managed_cells();
        let builder = self.builder(&snapshot.metrics, &cells);

        let (columns, column_total, rows, row_total) = match snapshot.metrics.content_bias {
            None => {
                let (rows, row_total) = self.fit_pref(&snapshot, &builder, Orientation::Vertical, height);
                let (columns, column_total) =
                    self.fit_pref(&snapshot, &builder, Orientation::Horizontal, width);
                (columns, column_total, rows, row_total)
            }
            Some(Orientation::Horizontal) => {
                let (columns, column_total) =
                    self.fit_pref(&snapshot, &builder, Orientation::Horizontal, width);
                let widths = columns.sizes();
                let mut rows = builder.pref(Orientation::Vertical, Some(&widths));
                let row_total = self
                    .distributor(&snapshot, &builder, Orientation::Vertical)
                    .adjust(&mut rows, height);
                (columns, column_total, rows, row_total)
            }
            Some(Orientation::Vertical) => {
                let (rows, row_total) = self.fit_pref(&snapshot, &builder, Orientation::Vertical, height);
                let heights = rows.sizes();
                let mut columns = builder.pref(Orientation::Horizontal, Some(&heights));
                let column_total = self
                    .distributor(&snapshot, &builder, Orientation::Horizontal)
                    .adjust(&mut columns, width);
                (columns, column_total, rows, row_total)
            }
        };

        let snap = self.snapper();
        let (left, right) = self.padded(Orientation::Horizontal);
        let (top, bottom) = self.padded(Orientation::Vertical);
        let origin = DVec2::new(
            left + x_offset(width - left - right, column_total, self.alignment.hpos),
            top + y_offset(height - top - bottom, row_total, self.alignment.vpos),
        );

        let columns = columns.sizes();
        let rows = rows.sizes();
        let placement = Placement {
            columns: &columns,
            rows: &rows,
            column_constraints: &self.columns,
            row_constraints: &self.rows,
            hgap: builder.hgap,
            vgap: builder.vgap,
            origin,
            snap,
        };
        let bounds = placement.place(&cells, &snapshot.metrics);

        GridLayout {
            rows,
            columns,
            row_total,
            column_total,
            cells: bounds,
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// The cached snapshot, built if missing. The returned handle stays
    /// valid even if the pane is invalidated while it is in use.
    fn snapshot(&self) -> Rc<GridSnapshot> {
        if let Some(snapshot) = self.snapshot.borrow().as_ref() {
            return Rc::clone(snapshot);
        }
        let cells = self.managed_cells();
        let snapshot = Rc::new(GridSnapshot::new(GridMetrics::build(
            &self.rows,
            &self.columns,
            &cells,
        )));
        *self.snapshot.borrow_mut() = Some(Rc::clone(&snapshot));
        snapshot
    }

    fn managed_cells(&self) -> Vec<CellRef<'_>> {
        self.cells
            .iter()
            .filter(|(_, cell)| cell.managed)
            .map(|(id, cell)| (*id, cell))
            .collect()
    }

    fn snapper(&self) -> Snapper {
        Snapper::new(self.snap_to_pixel)
    }

    /// Snapped padding along an orientation.
    fn padded(&self, orientation: Orientation) -> (f64, f64) {
        let snap = self.snapper();
        let (lead, trail) = self.padding.along(orientation);
        (snap.space(lead), snap.space(trail))
    }

    fn builder<'a>(&self, metrics: &'a GridMetrics, cells: &'a [CellRef<'a>]) -> TableBuilder<'a> {
        let snap = self.snapper();
        TableBuilder {
            metrics,
            cells,
            hgap: snap.space(self.hgap),
            vgap: snap.space(self.vgap),
            snap,
        }
    }

    fn distributor<'a>(
        &self,
        snapshot: &'a GridSnapshot,
        builder: &TableBuilder<'_>,
        orientation: Orientation,
    ) -> AxisDistributor<'a> {
        AxisDistributor {
            axis: snapshot.metrics.axis(orientation),
            gap: builder.gap(orientation),
            padding: self.padded(orientation),
            snap: builder.snap,
            min: snapshot.table(Aspect::Min, orientation, builder),
            max: snapshot.table(Aspect::Max, orientation, builder),
        }
    }

    /// Pref sizes for an axis fitted to `available`.
    fn fit_pref(
        &self,
        snapshot: &GridSnapshot,
        builder: &TableBuilder<'_>,
        orientation: Orientation,
        available: f64,
    ) -> (CompositeSize, f64) {
        let mut sizes = snapshot.table(Aspect::Pref, orientation, builder).clone();
        let total = self
            .distributor(snapshot, builder, orientation)
            .adjust(&mut sizes, available);
        (sizes, total)
    }

    /// Sizes for an axis fitted to `available`, used as the opposite input
    /// of a query. Axes fully covered by percentages skip content sizing.
    fn sizes_to_fit(
        &self,
        snapshot: &GridSnapshot,
        builder: &TableBuilder<'_>,
        orientation: Orientation,
        available: f64,
    ) -> Vec<f64> {
        if snapshot.metrics.axis(orientation).percent_total >= 100.0 {
            let mut sizes = builder.zeroed(orientation);
            self.distributor(snapshot, builder, orientation)
                .adjust(&mut sizes, available);
            sizes.sizes()
        } else {
            self.fit_pref(snapshot, builder, orientation, available).0.sizes()
        }
    }

    fn query(&self, orientation: Orientation, aspect: Aspect, opposite: Option<f64>) -> f64 {
        let _guard = PassGuard::enter(self);
        let snapshot = self.snapshot();
        let cells = self.managed_cells();
        let builder = self.builder(&snapshot.metrics, &cells);

        let total = match (aspect, opposite) {
            (Aspect::Max, _) | (_, None) => snapshot
                .table(aspect, orientation, &builder)
                .total_with_multi_size(),
            (_, Some(size)) => {
                let fitted = self.sizes_to_fit(&snapshot, &builder, orientation.opposite(), size);
                builder
                    .table(aspect, orientation, Some(&fitted))
                    .total_with_multi_size()
            }
        };

        let (lead, trail) = self.padded(orientation);
        (lead + total + trail).min(f64::MAX)
    }
}
