//! Turns resolved axis sizes into cell bounds.

use glam::DVec2;
use indexmap::IndexMap;
use trellis_core::{
    bounded_size, Bounds, ColumnConstraints, HPos, Orientation, RowConstraints, SizeRange, VPos,
};

use crate::cell::{CellId, CellRef, GridCell};
use crate::metrics::{effective_valignment, GridMetrics};
use crate::snap::Snapper;

/// Offset of `content` inside `space` for a horizontal position.
pub(crate) fn x_offset(space: f64, content: f64, hpos: HPos) -> f64 {
    match hpos {
        HPos::Left => 0.0,
        HPos::Center => (space - content) / 2.0,
        HPos::Right => space - content,
    }
}

/// Offset of `content` inside `space` for a vertical position; baseline
/// positions are resolved by the caller and place like `Top` here.
pub(crate) fn y_offset(space: f64, content: f64, vpos: VPos) -> f64 {
    match vpos {
        VPos::Top | VPos::Baseline => 0.0,
        VPos::Center => (space - content) / 2.0,
        VPos::Bottom => space - content,
    }
}

/// Leading edge of every axis, starting at `origin`.
fn offsets(sizes: &[f64], gap: f64, origin: f64) -> Vec<f64> {
    let mut acc = origin;
    sizes
        .iter()
        .map(|size| {
            let start = acc;
            acc += size + gap;
            start
        })
        .collect()
}

/// Extent of `[start, end]` including the gaps inside it.
fn extent(sizes: &[f64], gap: f64, start: usize, end: usize) -> f64 {
    if start >= sizes.len() {
        return 0.0;
    }
    let end = end.min(sizes.len() - 1);
    sizes[start..=end].iter().sum::<f64>() + gap * (end - start) as f64
}

/// A cell's area and its resolved size, before positioning.
struct Sized {
    area: Bounds,
    size: DVec2,
    halign: HPos,
    valign: VPos,
}

/// Positions cells inside the areas their axes describe.
pub(crate) struct Placement<'a> {
    pub columns: &'a [f64],
    pub rows: &'a [f64],
    pub column_constraints: &'a [ColumnConstraints],
    pub row_constraints: &'a [RowConstraints],
    pub hgap: f64,
    pub vgap: f64,
    /// Top-left corner of the first cell area
    pub origin: DVec2,
    pub snap: Snapper,
}

impl<'a> Placement<'a> {
    pub fn place(&self, cells: &[CellRef<'_>], metrics: &GridMetrics) -> IndexMap<CellId, Bounds> {
        let xs = offsets(self.columns, self.hgap, self.origin.x);
        let ys = offsets(self.rows, self.vgap, self.origin.y);

        let sized: Vec<Sized> = cells
            .iter()
            .map(|(_, cell)| self.size_cell(cell, &xs, &ys))
            .collect();

        // Shared baseline per row: the deepest top margin plus ascent
        let mut row_baselines: Vec<Option<f64>> = vec![None; self.rows.len()];
        for (row, baselines) in metrics.baselines.iter().enumerate() {
            for &k in &baselines.cells {
                let (_, cell) = cells[k];
                let ascent = cell.margin.top + baseline_of(cell, sized[k].size.y);
                let shared = row_baselines[row].get_or_insert(ascent);
                *shared = shared.max(ascent);
            }
        }

        cells
            .iter()
            .zip(&sized)
            .map(|((id, cell), s)| {
                let margin = cell.margin;
                let inner_width = s.area.width - margin.horizontal();
                let inner_height = s.area.height - margin.vertical();
                let x = s.area.x + margin.left + x_offset(inner_width, s.size.x, s.halign);
                let y = match (s.valign, row_baselines.get(cell.row).copied().flatten()) {
                    (VPos::Baseline, Some(shared)) => {
                        s.area.y + shared - baseline_of(cell, s.size.y)
                    }
                    _ => s.area.y + margin.top + y_offset(inner_height, s.size.y, s.valign),
                };
                let position = DVec2::new(self.snap.position(x), self.snap.position(y));
                (*id, Bounds::from_vecs(position, s.size))
            })
            .collect()
    }

    fn size_cell(&self, cell: &GridCell, xs: &[f64], ys: &[f64]) -> Sized {
        let column = cell.column;
        let row = cell.row;
        let column_end = cell.end(Orientation::Horizontal, self.columns.len());
        let row_end = cell.end(Orientation::Vertical, self.rows.len());

        let area = Bounds::new(
            xs.get(column).copied().unwrap_or(self.origin.x),
            ys.get(row).copied().unwrap_or(self.origin.y),
            extent(self.columns, self.hgap, column, column_end),
            extent(self.rows, self.vgap, row, row_end),
        );

        let column_constraints = self.column_constraints.get(column);
        let row_constraints = self.row_constraints.get(row);
        let halign = cell
            .halignment
            .or_else(|| column_constraints.and_then(|c| c.alignment))
            .unwrap_or_default();
        let valign = effective_valignment(cell, self.row_constraints);
        let fill_width = cell
            .fill_width
            .unwrap_or_else(|| column_constraints.map_or(true, |c| c.fill));
        let fill_height = cell
            .fill_height
            .unwrap_or_else(|| row_constraints.map_or(true, |c| c.fill));

        let inner_width = area.width - cell.margin.horizontal();
        let inner_height = area.height - cell.margin.vertical();
        let content = cell.content();
        let fit = |range: SizeRange, space: f64, fill: bool| {
            let target = if fill { space } else { space.min(range.pref) };
            self.snap.size(bounded_size(range.min, target, range.max))
        };

        let size = if content.content_bias() == Some(Orientation::Vertical) {
            let height = fit(content.measure(Orientation::Vertical, None), inner_height, fill_height);
            let width = fit(
                content.measure(Orientation::Horizontal, Some(height)),
                inner_width,
                fill_width,
            );
            DVec2::new(width, height)
        } else {
            let width = fit(content.measure(Orientation::Horizontal, None), inner_width, fill_width);
            let for_width =
                (content.content_bias() == Some(Orientation::Horizontal)).then_some(width);
            let height = fit(
                content.measure(Orientation::Vertical, for_width),
                inner_height,
                fill_height,
            );
            DVec2::new(width, height)
        };

        Sized {
            area,
            size,
            halign,
            valign,
        }
    }
}

/// Distance from a cell's top to its baseline at the given height.
fn baseline_of(cell: &GridCell, height: f64) -> f64 {
    cell.content().baseline_offset().unwrap_or(height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::FixedContent;
    use trellis_core::Insets;

    #[test]
    fn test_offsets_and_extent() {
        let sizes = [10.0, 20.0, 30.0];
        assert_eq!(offsets(&sizes, 5.0, 2.0), vec![2.0, 17.0, 42.0]);
        assert_eq!(extent(&sizes, 5.0, 0, 2), 70.0);
        assert_eq!(extent(&sizes, 5.0, 1, 1), 20.0);
    }

    #[test]
    fn test_alignment_offsets() {
        assert_eq!(x_offset(100.0, 40.0, HPos::Left), 0.0);
        assert_eq!(x_offset(100.0, 40.0, HPos::Center), 30.0);
        assert_eq!(x_offset(100.0, 40.0, HPos::Right), 60.0);
        assert_eq!(y_offset(100.0, 40.0, VPos::Baseline), 0.0);
        assert_eq!(y_offset(100.0, 40.0, VPos::Bottom), 60.0);
    }

    fn place(cells: &[GridCell], columns: &[f64], rows: &[f64]) -> Vec<Bounds> {
        let refs: Vec<CellRef<'_>> = cells
            .iter()
            .enumerate()
            .map(|(i, c)| (CellId(i as u64), c))
            .collect();
        let metrics = GridMetrics::build(&[], &[], &refs);
        let placement = Placement {
            columns,
            rows,
            column_constraints: &[],
            row_constraints: &[],
            hgap: 0.0,
            vgap: 0.0,
            origin: DVec2::ZERO,
            snap: Snapper::new(true),
        };
        placement.place(&refs, &metrics).into_values().collect()
    }

    #[test]
    fn test_fill_and_alignment() {
        let content = FixedContent::new(20.0, 10.0).shared();
        let cells = vec![
            GridCell::new(content.clone(), 0, 0),
            GridCell::new(content.clone(), 1, 0)
                .with_fill(false, false)
                .with_halignment(HPos::Right)
                .with_valignment(VPos::Bottom),
            GridCell::new(content, 0, 1)
                .with_column_span(2)
                .with_margin(Insets::uniform(5.0)),
        ];
        let bounds = place(&cells, &[50.0, 50.0], &[40.0, 40.0]);
        assert_eq!(bounds[0], Bounds::new(0.0, 0.0, 50.0, 40.0));
        assert_eq!(bounds[1], Bounds::new(80.0, 30.0, 20.0, 10.0));
        assert_eq!(bounds[2], Bounds::new(5.0, 45.0, 90.0, 30.0));
    }

    #[test]
    fn test_non_fill_respects_min_and_area() {
        let content = FixedContent::sized(SizeRange::new(30.0, 80.0, 100.0), SizeRange::fixed(10.0))
            .shared();
        let cells = vec![GridCell::new(content, 0, 0).with_fill(false, false)];
        let bounds = place(&cells, &[50.0], &[10.0]);
        assert_eq!(bounds[0].width, 50.0);

        let bounds = place(&cells, &[20.0], &[10.0]);
        assert_eq!(bounds[0].width, 30.0);
    }

    #[test]
    fn test_baselines_align_across_row() {
        let big = FixedContent::sized(SizeRange::fixed(20.0), SizeRange::fixed(30.0))
            .with_baseline(24.0)
            .shared();
        let small = FixedContent::sized(SizeRange::fixed(20.0), SizeRange::fixed(12.0))
            .with_baseline(9.0)
            .shared();
        let cells = vec![
            GridCell::new(big, 0, 0).with_valignment(VPos::Baseline),
            GridCell::new(small, 1, 0)
                .with_valignment(VPos::Baseline)
                .with_margin(Insets::new(2.0, 0.0, 0.0, 0.0)),
        ];
        let bounds = place(&cells, &[20.0, 20.0], &[40.0]);
        // Shared baseline is max(0 + 24, 2 + 9) = 24
        assert_eq!(bounds[0].y, 0.0);
        assert_eq!(bounds[1].y, 15.0);
        assert_eq!(bounds[0].y + 24.0, bounds[1].y + 9.0);
    }
}
