//! Composite size tables: per-axis working sizes plus multi-span
//! requirements.

use std::collections::BTreeMap;

use crate::metrics::AxisMetrics;

/// One axis slot of a composite table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisSize {
    /// Derived from content (or not yet constrained)
    Computed(f64),
    /// Fixed by an axis constraint; content no longer raises it
    Preset(f64),
}

impl AxisSize {
    pub fn value(self) -> f64 {
        match self {
            AxisSize::Computed(v) | AxisSize::Preset(v) => v,
        }
    }

    pub fn is_preset(self) -> bool {
        matches!(self, AxisSize::Preset(_))
    }

    /// Same tag, new value.
    fn with_value(self, value: f64) -> Self {
        match self {
            AxisSize::Computed(_) => AxisSize::Computed(value),
            AxisSize::Preset(_) => AxisSize::Preset(value),
        }
    }
}

/// Half-open axis range `[begin, end)` covered by a spanning cell.
///
/// Ordered by `begin`, then `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    pub begin: usize,
    pub end: usize,
}

impl Interval {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    pub fn contains(&self, position: usize) -> bool {
        self.begin <= position && position < self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.begin
    }
}

/// Working sizes for every row or every column.
///
/// Single-span requirements live in `slots`; requirements of cells that span
/// several axes are kept apart, per interval, so that overlapping spanning
/// cells are never counted twice.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeSize {
    slots: Vec<AxisSize>,
    multi: BTreeMap<Interval, f64>,
    percent: Vec<Option<f64>>,
    percent_total: f64,
    gap: f64,
}

impl CompositeSize {
    /// A table with every slot `Computed(init)`.
    pub fn new(axis: &AxisMetrics, gap: f64, init: f64) -> Self {
        Self {
            slots: vec![AxisSize::Computed(init); axis.count],
            multi: BTreeMap::new(),
            percent: axis.percent.clone(),
            percent_total: axis.percent_total,
            gap,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn slot(&self, index: usize) -> AxisSize {
        self.slots[index]
    }

    pub fn get(&self, index: usize) -> f64 {
        self.slots[index].value()
    }

    pub fn is_preset(&self, index: usize) -> bool {
        self.slots[index].is_preset()
    }

    /// Overwrite a slot's value, keeping its tag.
    pub fn set(&mut self, index: usize, value: f64) {
        self.slots[index] = self.slots[index].with_value(value);
    }

    pub fn set_preset(&mut self, index: usize, value: f64) {
        self.slots[index] = AxisSize::Preset(value);
    }

    pub fn add(&mut self, index: usize, change: f64) {
        self.set(index, self.get(index) + change);
    }

    /// Raise a slot to at least `value`.
    pub fn raise(&mut self, index: usize, value: f64) {
        self.set(index, self.get(index).max(value));
    }

    /// Raise the combined requirement of `[begin, end)` to at least `value`.
    pub fn raise_multi(&mut self, begin: usize, end: usize, value: f64) {
        self.multi
            .entry(Interval::new(begin, end))
            .and_modify(|v| *v = v.max(value))
            .or_insert(value);
    }

    /// Multi-span requirements in interval order.
    pub fn multi(&self) -> impl Iterator<Item = (Interval, f64)> + '_ {
        self.multi.iter().map(|(i, v)| (*i, *v))
    }

    pub fn has_multi(&self) -> bool {
        !self.multi.is_empty()
    }

    /// Plain slot values.
    pub fn sizes(&self) -> Vec<f64> {
        self.slots.iter().map(|s| s.value()).collect()
    }

    /// The limit slot `index` may grow or shrink to, tightened by the
    /// intervals it belongs to.
    ///
    /// Each interval's requirement is split into even segments; when the
    /// other members of the interval sit below (for max limits) or above
    /// (for min limits) their segment, the difference is shifted onto this
    /// slot.
    pub fn proportional_limit(&self, index: usize, shrinking: bool) -> f64 {
        let mut result = self.get(index);
        if self.is_preset(index) {
            return result;
        }
        for (interval, required) in self.multi() {
            if !interval.contains(index) {
                continue;
            }
            let segment = required / interval.len() as f64;
            let mut proportional = segment;
            for j in interval.begin..interval.end {
                if j == index {
                    continue;
                }
                let other = self.get(j);
                let shifted = if shrinking {
                    other > segment
                } else {
                    other < segment
                };
                if shifted {
                    proportional += segment - other;
                }
            }
            result = if shrinking {
                result.max(proportional)
            } else {
                result.min(proportional)
            };
        }
        result
    }

    /// Sum of slots in `[from, to)` plus the gaps between them.
    pub fn total_range(&self, from: usize, to: usize) -> f64 {
        if to <= from {
            return 0.0;
        }
        let sizes: f64 = self.slots[from..to].iter().map(|s| s.value()).sum();
        sizes + self.gap * (to - from - 1) as f64
    }

    /// Sum of all slots plus gaps.
    pub fn total(&self) -> f64 {
        self.total_range(0, self.slots.len())
    }

    fn all_preset(&self, interval: Interval) -> bool {
        self.slots[interval.begin..interval.end]
            .iter()
            .all(|s| s.is_preset())
    }

    /// Total size including the shortfall of every multi-span requirement
    /// and the growth needed to honor percentage shares.
    pub fn total_with_multi_size(&self) -> f64 {
        let mut total = self.total();
        for (interval, required) in self.multi() {
            if self.all_preset(interval) {
                continue;
            }
            let current = self.total_range(interval.begin, interval.end);
            if required > current {
                total += required - current;
            }
        }

        if self.percent_total > 0.0 {
            let mut not_fixed = 0.0;
            for (i, percent) in self.percent.iter().enumerate() {
                if *percent == Some(0.0) {
                    total -= self.get(i);
                }
            }
            for (i, percent) in self.percent.iter().enumerate() {
                match *percent {
                    Some(p) if p > 0.0 => total = total.max(self.get(i) * (100.0 / p)),
                    Some(_) => {}
                    None => not_fixed += self.get(i),
                }
            }
            if self.percent_total < 100.0 {
                total = total.max(not_fixed * 100.0 / (100.0 - self.percent_total));
            }
        }
        total
    }
}
