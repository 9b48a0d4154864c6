//! Grid metrics: axis counts, normalized percentages, effective grow
//! priorities, baseline bookkeeping, and content bias.

use smallvec::SmallVec;
use tracing::debug;
use trellis_core::{
    AxisConstraints, AxisSizing, ColumnConstraints, Orientation, Priority, RowConstraints,
    SizeRange, VPos,
};

use crate::cell::{CellRef, GridCell};

/// Derived per-axis data for one orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisMetrics {
    /// Number of rows or columns
    pub count: usize,
    /// Constraint sizing per axis, padded with defaults up to `count`
    pub sizing: Vec<AxisSizing>,
    /// Normalized percentage per axis
    pub percent: Vec<Option<f64>>,
    /// Sum of positive percentages, at most 100
    pub percent_total: f64,
    /// Effective grow priority per axis
    pub grow: Vec<Priority>,
}

impl AxisMetrics {
    fn build<A>(
        orientation: Orientation,
        constraints: &[AxisConstraints<A>],
        cells: &[CellRef<'_>],
    ) -> Self {
        let count = cells
            .iter()
            .map(|(_, cell)| cell.known_end(orientation).saturating_add(1))
            .fold(constraints.len(), usize::max);

        let mut sizing: Vec<AxisSizing> = constraints.iter().map(|c| c.sizing()).collect();
        sizing.resize(count, AxisSizing::default());

        let mut percent: Vec<Option<f64>> = sizing.iter().map(|s| s.percent).collect();
        let mut grow: Vec<Priority> = sizing.iter().map(|s| s.grow).collect();

        for (_, cell) in cells {
            if cell.span(orientation).is_single() {
                let index = cell.start(orientation);
                grow[index] = grow[index].max(cell.grow(orientation));
            }
        }

        let mut percent_total: f64 = percent.iter().flatten().filter(|p| **p > 0.0).sum();
        if percent_total > 100.0 {
            let weight = 100.0 / percent_total;
            for p in percent.iter_mut().flatten() {
                if *p > 0.0 {
                    *p *= weight;
                }
            }
            debug!(
                %orientation,
                total = percent_total,
                "percentages exceed 100, scaling down"
            );
            percent_total = 100.0;
        }

        Self {
            count,
            sizing,
            percent,
            percent_total,
            grow,
        }
    }

    /// Whether axis `index` is sized by percentage.
    pub fn is_percent(&self, index: usize) -> bool {
        self.percent.get(index).is_some_and(Option::is_some)
    }

    /// Total of the gaps between all axes.
    pub fn gaps(&self, gap: f64) -> f64 {
        gap * self.count.saturating_sub(1) as f64
    }
}

/// Which of the three measured sizes a table is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aspect {
    Min,
    Pref,
    Max,
}

impl Aspect {
    /// Pick this aspect out of a measured range.
    pub fn of(self, range: &SizeRange) -> f64 {
        match self {
            Aspect::Min => range.min,
            Aspect::Pref => range.pref,
            Aspect::Max => range.max,
        }
    }
}

/// Below-baseline extent of a row, per aspect.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BaselineComplement {
    pub min: f64,
    pub pref: f64,
    pub max: f64,
}

impl BaselineComplement {
    pub fn get(&self, aspect: Aspect) -> f64 {
        match aspect {
            Aspect::Min => self.min,
            Aspect::Pref => self.pref,
            Aspect::Max => self.max,
        }
    }
}

/// Baseline-aligned cells starting in one row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowBaselines {
    /// Indices into the managed cell list
    pub cells: SmallVec<[usize; 4]>,
    pub complement: BaselineComplement,
}

/// Everything derived from constraints and cells that does not depend on a
/// container size.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMetrics {
    pub rows: AxisMetrics,
    pub columns: AxisMetrics,
    /// One entry per row
    pub baselines: Vec<RowBaselines>,
    /// Per managed cell, whether it is positioned by its baseline
    pub baseline_aligned: Vec<bool>,
    pub content_bias: Option<Orientation>,
}

impl GridMetrics {
    /// Derive metrics from the constraints and the managed cells.
    pub fn build(
        rows: &[RowConstraints],
        columns: &[ColumnConstraints],
        cells: &[CellRef<'_>],
    ) -> Self {
        let row_metrics = AxisMetrics::build(Orientation::Vertical, rows, cells);
        let column_metrics = AxisMetrics::build(Orientation::Horizontal, columns, cells);

        let baseline_aligned: Vec<bool> = cells
            .iter()
            .map(|(_, cell)| effective_valignment(cell, rows) == VPos::Baseline)
            .collect();

        let mut baselines = vec![RowBaselines::default(); row_metrics.count];
        for (k, (_, cell)) in cells.iter().enumerate() {
            if baseline_aligned[k] {
                let row = &mut baselines[cell.row];
                row.cells.push(k);
                if let Some(baseline) = cell.content().baseline_offset() {
                    let height = cell.content().measure(Orientation::Vertical, None);
                    let complement = &mut row.complement;
                    complement.min = complement.min.max(height.min - baseline);
                    complement.pref = complement.pref.max(height.pref - baseline);
                    complement.max = complement.max.max(height.max - baseline);
                }
            }
        }

        let mut content_bias = None;
        for (_, cell) in cells {
            if let Some(bias) = cell.content().content_bias() {
                content_bias = Some(bias);
                if bias == Orientation::Horizontal {
                    break;
                }
            }
        }

        debug!(
            rows = row_metrics.count,
            columns = column_metrics.count,
            cells = cells.len(),
            ?content_bias,
            "grid metrics rebuilt"
        );

        Self {
            rows: row_metrics,
            columns: column_metrics,
            baselines,
            baseline_aligned,
            content_bias,
        }
    }

    /// Metrics for one orientation: columns for horizontal, rows for vertical.
    pub fn axis(&self, orientation: Orientation) -> &AxisMetrics {
        match orientation {
            Orientation::Horizontal => &self.columns,
            Orientation::Vertical => &self.rows,
        }
    }
}

/// A cell's vertical alignment after falling back to its row.
pub(crate) fn effective_valignment(cell: &GridCell, rows: &[RowConstraints]) -> VPos {
    cell.valignment
        .or_else(|| rows.get(cell.row).and_then(|r| r.alignment))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellId, FixedContent};
    use trellis_core::{Span, REMAINING};

    fn cell(column: usize, row: usize) -> GridCell {
        GridCell::new(FixedContent::new(10.0, 10.0).shared(), column, row)
    }

    fn refs(cells: &[GridCell]) -> Vec<CellRef<'_>> {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| (CellId(i as u64), c))
            .collect()
    }

    #[test]
    fn test_counts_expand_to_cells() {
        let cells = vec![cell(0, 0), cell(4, 1).with_row_span(3)];
        let rows = vec![RowConstraints::new(); 2];
        let metrics = GridMetrics::build(&rows, &[], &refs(&cells));
        assert_eq!(metrics.columns.count, 5);
        assert_eq!(metrics.rows.count, 4);
        assert_eq!(metrics.rows.sizing.len(), 4);
    }

    #[test]
    fn test_remaining_span_counts_start_only() {
        let cells = vec![cell(2, 0).with_column_span(REMAINING), cell(0, 1)];
        let metrics = GridMetrics::build(&[], &[], &refs(&cells));
        assert_eq!(metrics.columns.count, 3);
        assert_eq!(cells[0].end(Orientation::Horizontal, metrics.columns.count), 2);
    }

    #[test]
    fn test_percent_normalization() {
        let columns = vec![ColumnConstraints::percent(50.0); 3];
        let metrics = GridMetrics::build(&[], &columns, &[]);
        assert_eq!(metrics.columns.percent_total, 100.0);
        for p in metrics.columns.percent.iter().flatten() {
            assert!((p - 100.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_percent_is_still_a_percent_axis() {
        let columns = vec![ColumnConstraints::percent(0.0), ColumnConstraints::new()];
        let metrics = GridMetrics::build(&[], &columns, &[]);
        assert!(metrics.columns.is_percent(0));
        assert!(!metrics.columns.is_percent(1));
        assert_eq!(metrics.columns.percent_total, 0.0);
    }

    #[test]
    fn test_grow_from_single_span_cells_only() {
        let cells = vec![
            cell(0, 0).with_hgrow(Priority::Sometimes),
            cell(1, 0)
                .with_column_span(Span::Cells(2))
                .with_hgrow(Priority::Always),
        ];
        let columns = vec![ColumnConstraints::new(), ColumnConstraints::growing(Priority::Always)];
        let metrics = GridMetrics::build(&[], &columns, &refs(&cells));
        assert_eq!(
            metrics.columns.grow,
            vec![Priority::Sometimes, Priority::Always, Priority::Never]
        );
    }

    #[test]
    fn test_baseline_complement() {
        let text = FixedContent::sized(SizeRange::new(8.0, 20.0, 30.0), SizeRange::new(10.0, 16.0, 40.0))
            .with_baseline(12.0)
            .shared();
        let cells = vec![
            GridCell::new(text, 0, 0).with_valignment(VPos::Baseline),
            cell(1, 0),
        ];
        let metrics = GridMetrics::build(&[], &[], &refs(&cells));
        assert_eq!(metrics.baseline_aligned, vec![true, false]);
        let row = &metrics.baselines[0];
        assert_eq!(row.cells.as_slice(), &[0]);
        assert_eq!(row.complement.min, 0.0);
        assert_eq!(row.complement.pref, 4.0);
        assert_eq!(row.complement.max, 28.0);
    }

    #[test]
    fn test_row_alignment_makes_cells_baseline_aligned() {
        let rows = vec![RowConstraints::new().with_alignment(VPos::Baseline)];
        let cells = vec![cell(0, 0), cell(1, 0).with_valignment(VPos::Top)];
        let metrics = GridMetrics::build(&rows, &[], &refs(&cells));
        assert_eq!(metrics.baseline_aligned, vec![true, false]);
        assert_eq!(metrics.baselines[0].complement, BaselineComplement::default());
    }

    struct Biased(Orientation);

    impl crate::cell::Content for Biased {
        fn measure(&self, _: Orientation, _: Option<f64>) -> SizeRange {
            SizeRange::flexible(10.0)
        }

        fn content_bias(&self) -> Option<Orientation> {
            Some(self.0)
        }
    }

    #[test]
    fn test_content_bias_prefers_horizontal() {
        let cells = vec![
            GridCell::new(std::rc::Rc::new(Biased(Orientation::Vertical)), 0, 0),
            GridCell::new(std::rc::Rc::new(Biased(Orientation::Horizontal)), 1, 0),
        ];
        let metrics = GridMetrics::build(&[], &[], &refs(&cells));
        assert_eq!(metrics.content_bias, Some(Orientation::Horizontal));

        let metrics = GridMetrics::build(&[], &[], &refs(&cells[..1]));
        assert_eq!(metrics.content_bias, Some(Orientation::Vertical));
    }
}
