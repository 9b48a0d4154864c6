//! Builds the min, pref, and max composite tables for an axis.

use trellis_core::{bounded_size, Insets, Orientation, SizeOverride, SizeRange};

use crate::cell::{CellRef, GridCell};
use crate::composite::CompositeSize;
use crate::metrics::{Aspect, GridMetrics};
use crate::snap::Snapper;

/// Measures cells and folds their requirements into composite tables.
pub(crate) struct TableBuilder<'a> {
    pub metrics: &'a GridMetrics,
    pub cells: &'a [CellRef<'a>],
    pub hgap: f64,
    pub vgap: f64,
    pub snap: Snapper,
}

impl<'a> TableBuilder<'a> {
    pub fn gap(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.hgap,
            Orientation::Vertical => self.vgap,
        }
    }

    fn empty(&self, orientation: Orientation, init: f64) -> CompositeSize {
        CompositeSize::new(
            self.metrics.axis(orientation),
            self.gap(orientation),
            init,
        )
    }

    /// An all-zero table for the axis.
    pub fn zeroed(&self, orientation: Orientation) -> CompositeSize {
        self.empty(orientation, 0.0)
    }

    /// Dispatch on the aspect. `opposite` holds resolved sizes of the other
    /// orientation, when known.
    pub fn table(
        &self,
        aspect: Aspect,
        orientation: Orientation,
        opposite: Option<&[f64]>,
    ) -> CompositeSize {
        match aspect {
            Aspect::Min => self.min(orientation, opposite),
            Aspect::Pref => self.pref(orientation, opposite),
            Aspect::Max => self.max(orientation),
        }
    }

    pub fn pref(&self, orientation: Orientation, opposite: Option<&[f64]>) -> CompositeSize {
        let axis = self.metrics.axis(orientation);
        let mut result = self.empty(orientation, 0.0);

        for (i, sizing) in axis.sizing.iter().enumerate() {
            let min = self.snapped(sizing.min);
            match self.snapped(sizing.pref) {
                SizeOverride::Fixed(pref) => {
                    let max = self.snapped(sizing.max);
                    let value = match (min.fixed(), max.fixed()) {
                        (None, None) => pref,
                        (min, max) => bounded_size(
                            min.unwrap_or(0.0),
                            pref,
                            max.unwrap_or(f64::INFINITY),
                        ),
                    };
                    result.set_preset(i, value);
                }
                _ => {
                    if let Some(m) = min.fixed().filter(|m| *m > 0.0) {
                        result.set(i, m);
                    }
                }
            }
        }

        for (k, (_, cell)) in self.cells.iter().enumerate() {
            let start = cell.start(orientation);
            let end = cell.end(orientation, axis.count);
            let area = self.area_size(k, cell, orientation, Aspect::Pref, opposite);
            if start == end {
                if !result.is_preset(start) {
                    let sizing = &axis.sizing[start];
                    let min = sizing.min.fixed().unwrap_or(0.0);
                    let max = sizing.max.fixed().unwrap_or(f64::MAX);
                    result.raise(start, bounded_size(min, area, max));
                }
            } else {
                result.raise_multi(start, end + 1, area);
            }
        }
        result
    }

    pub fn min(&self, orientation: Orientation, opposite: Option<&[f64]>) -> CompositeSize {
        let axis = self.metrics.axis(orientation);
        let mut result = self.empty(orientation, 0.0);
        let mut pref: Option<CompositeSize> = None;

        for (i, sizing) in axis.sizing.iter().enumerate() {
            match self.snapped(sizing.min) {
                SizeOverride::UsePref => {
                    let pref = pref.get_or_insert_with(|| self.pref(orientation, opposite));
                    result.set_preset(i, pref.get(i));
                }
                SizeOverride::Fixed(m) => result.set_preset(i, m),
                SizeOverride::Computed => {}
            }
        }

        for (k, (_, cell)) in self.cells.iter().enumerate() {
            let start = cell.start(orientation);
            let end = cell.end(orientation, axis.count);
            if start == end {
                if !result.is_preset(start) {
                    let area = self.area_size(k, cell, orientation, Aspect::Min, opposite);
                    result.raise(start, area);
                }
            } else {
                let area = self.area_size(k, cell, orientation, Aspect::Min, opposite);
                result.raise_multi(start, end + 1, area);
            }
        }
        result
    }

    /// Max table; cells do not contribute, so it never depends on the
    /// opposite orientation.
    pub fn max(&self, orientation: Orientation) -> CompositeSize {
        let axis = self.metrics.axis(orientation);
        let mut result = self.empty(orientation, f64::MAX);
        let mut pref: Option<CompositeSize> = None;

        for (i, sizing) in axis.sizing.iter().enumerate() {
            match self.snapped(sizing.max) {
                SizeOverride::UsePref => {
                    let pref = pref.get_or_insert_with(|| self.pref(orientation, None));
                    result.set_preset(i, pref.get(i));
                }
                SizeOverride::Fixed(max) => {
                    let value = match self.snapped(sizing.min).fixed() {
                        Some(min) => bounded_size(min, max, max),
                        None => max,
                    };
                    result.set_preset(i, value);
                }
                SizeOverride::Computed => {}
            }
        }
        result
    }

    fn snapped(&self, value: SizeOverride) -> SizeOverride {
        match value {
            SizeOverride::Fixed(v) => SizeOverride::Fixed(self.snap.size(v)),
            other => other,
        }
    }

    /// Extent the cell's spanned axes of `orientation` have in `sizes`.
    fn spanned(&self, cell: &GridCell, orientation: Orientation, sizes: &[f64]) -> f64 {
        let start = cell.start(orientation);
        let end = cell.end(orientation, sizes.len()).min(sizes.len().saturating_sub(1));
        if start >= sizes.len() {
            return 0.0;
        }
        let gap = self.gap(orientation);
        sizes[start..=end].iter().sum::<f64>() + gap * (end - start) as f64
    }

    /// The size cell `k` needs along `orientation`, margins included.
    fn area_size(
        &self,
        k: usize,
        cell: &GridCell,
        orientation: Orientation,
        aspect: Aspect,
        opposite: Option<&[f64]>,
    ) -> f64 {
        let content = cell.content();
        let margin = cell.margin;
        let opposite_area = opposite.map(|sizes| self.spanned(cell, orientation.opposite(), sizes));
        let baseline_aligned = self.metrics.baseline_aligned.get(k).copied().unwrap_or(false);

        match orientation {
            Orientation::Vertical => {
                let for_width = (content.content_bias() == Some(Orientation::Horizontal)).then(|| {
                    let width = content.measure(Orientation::Horizontal, None);
                    let available = opposite_area
                        .map(|w| w - margin.horizontal())
                        .unwrap_or(width.pref);
                    self.snap.size(bounded_size(width.min, available, width.max))
                });
                let height = self.snap.size(aspect.of(&content.measure(Orientation::Vertical, for_width)));
                if baseline_aligned {
                    let complement = self.metrics.baselines[cell.row].complement.get(aspect);
                    match content.baseline_offset() {
                        Some(baseline) => margin.top + baseline + complement + margin.bottom,
                        None => margin.top + height + margin.bottom + complement,
                    }
                } else {
                    margin.top + height + margin.bottom
                }
            }
            Orientation::Horizontal => {
                let for_height = match opposite_area {
                    Some(area) if content.content_bias() == Some(Orientation::Vertical) => {
                        Some(self.biased_height(k, cell, area, &margin))
                    }
                    _ => None,
                };
                let width = content.measure(Orientation::Horizontal, for_height);
                margin.left + self.snap.size(aspect.of(&width)) + margin.right
            }
        }
    }

    /// Height a vertically biased cell settles on inside a row area, used
    /// to measure its width.
    fn biased_height(&self, k: usize, cell: &GridCell, area: f64, margin: &Insets) -> f64 {
        let height: SizeRange = cell.content().measure(Orientation::Vertical, None);
        let mut available = area - margin.vertical();
        let baseline_aligned = self.metrics.baseline_aligned.get(k).copied().unwrap_or(false);
        if baseline_aligned && cell.content().baseline_offset().is_none() {
            available -= self.metrics.baselines[cell.row].complement.min;
        }
        self.snap
            .size(bounded_size(height.min, height.pref, height.max.min(available)))
    }
}
