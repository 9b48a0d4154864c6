//! Distribution of a concrete container dimension over the axes of one
//! orientation.
//!
//! Sizing runs in three phases:
//!
//! 1. **Percentages**: percentage axes take their share of the content
//!    extent, floored, with the fractional parts carried from axis to axis
//!    in index order so that whole pixels are handed out one at a time.
//! 2. **Multi-span growth**: surplus space first tops up intervals whose
//!    spanning cells are not yet satisfied, through `Always` members, then
//!    `Sometimes` members, then the last axis of each interval.
//! 3. **Grow/shrink**: remaining surplus goes to `Always` axes, then
//!    `Sometimes` axes, each clipped to its max; a deficit is taken from
//!    every non-percentage axis, clipped to its min.

use std::collections::BTreeSet;

use tracing::trace;
use trellis_core::{bounded_size, Priority, SizeOverride};

use crate::composite::CompositeSize;
use crate::metrics::AxisMetrics;
use crate::snap::Snapper;

/// Which members of the multi-span intervals a growth tier feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Always,
    Sometimes,
    LastAxis,
}

/// Sizes the axes of one orientation to a container dimension.
pub struct AxisDistributor<'a> {
    pub axis: &'a AxisMetrics,
    /// Snapped gap between axes
    pub gap: f64,
    /// Snapped leading and trailing padding
    pub padding: (f64, f64),
    pub snap: Snapper,
    /// Unconstrained min table, the shrink limits
    pub min: &'a CompositeSize,
    /// Max table, the grow limits
    pub max: &'a CompositeSize,
}

impl<'a> AxisDistributor<'a> {
    /// Fit `sizes` to `available` (outer size, padding included) and return
    /// the total extent the axes now occupy.
    ///
    /// Never fails; when `available` is below the minimum, axes stop at
    /// their min sizes and the total exceeds the content extent.
    pub fn adjust(&self, sizes: &mut CompositeSize, available: f64) -> f64 {
        let (lead, trail) = self.padding;
        let content = available - lead - trail;

        if self.axis.percent_total > 0.0 {
            let extent = (content - self.axis.gaps(self.gap)).max(0.0);
            let mut remainder = 0.0;
            for (i, percent) in self.axis.percent.iter().enumerate() {
                if let Some(percent) = percent {
                    let raw = extent * (percent / 100.0);
                    let floor = raw.floor();
                    remainder += raw - floor;
                    let mut size = floor;
                    if remainder >= 0.5 {
                        size += 1.0;
                        remainder -= 1.0;
                    }
                    sizes.set(i, size);
                }
            }
            trace!(extent, total = self.axis.percent_total, "percentage axes sized");
        }

        let mut total = sizes.total();
        if self.axis.percent_total < 100.0 {
            let leftover = content - total;
            if leftover != 0.0 {
                let mut remaining = self.grow_to_multi_span(sizes, leftover);
                remaining = self.grow_or_shrink(sizes, Priority::Always, remaining);
                remaining = self.grow_or_shrink(sizes, Priority::Sometimes, remaining);
                trace!(leftover, remaining, "surplus distributed");
                total += leftover - remaining;
            }
        }
        total
    }

    /// Feed surplus to axes of under-sized spanning intervals.
    fn grow_to_multi_span(&self, sizes: &mut CompositeSize, extra: f64) -> f64 {
        if extra <= 0.0 || !sizes.has_multi() {
            return extra;
        }

        let mut always = BTreeSet::new();
        let mut sometimes = BTreeSet::new();
        let mut last = BTreeSet::new();
        for (interval, _) in sizes.multi() {
            for i in interval.begin..interval.end {
                if self.axis.is_percent(i) {
                    continue;
                }
                match self.axis.grow[i] {
                    Priority::Always => {
                        always.insert(i);
                    }
                    Priority::Sometimes => {
                        sometimes.insert(i);
                    }
                    Priority::Never => {}
                }
            }
            if !self.axis.is_percent(interval.end - 1) {
                last.insert(interval.end - 1);
            }
        }

        let mut remaining = extra;
        remaining = self.grow_tier(sizes, always, Tier::Always, remaining);
        remaining = self.grow_tier(sizes, sometimes, Tier::Sometimes, remaining);
        remaining = self.grow_tier(sizes, last, Tier::LastAxis, remaining);
        trace!(extra, remaining, "multi-span growth");
        remaining
    }

    fn grow_tier(
        &self,
        sizes: &mut CompositeSize,
        mut active: BTreeSet<usize>,
        tier: Tier,
        mut remaining: f64,
    ) -> f64 {
        let mut worklist: Vec<usize> = active.iter().copied().collect();

        while !worklist.is_empty() && remaining > worklist.len() as f64 {
            let portion = (remaining / worklist.len() as f64).floor();
            let mut survivors = Vec::with_capacity(worklist.len());

            for &i in &worklist {
                let mut actual = portion;
                for (interval, required) in sizes.multi() {
                    let current = sizes.total_range(interval.begin, interval.end);
                    match tier {
                        Tier::LastAxis if interval.end - 1 == i => {
                            actual = actual.min((required - current).max(0.0));
                        }
                        Tier::Always | Tier::Sometimes if interval.contains(i) => {
                            // Members that dropped out earlier in this round no
                            // longer share the shortfall.
                            let members = (interval.begin..interval.end)
                                .filter(|j| active.contains(j))
                                .count() as f64;
                            let share = ((required - current) / members).max(0.0).floor();
                            actual = actual.min(share);
                        }
                        _ => {}
                    }
                }

                let current = sizes.get(i);
                let bounded = self.cap(i, current + actual);
                let used = bounded - current;
                remaining -= used;
                if used != actual || used == 0.0 {
                    active.remove(&i);
                } else {
                    survivors.push(i);
                }
                sizes.set(i, bounded);
            }
            worklist = survivors;
        }
        remaining
    }

    /// Clip a grown size to the axis's max override, or its pref override
    /// when the max defers to the pref.
    fn cap(&self, index: usize, size: f64) -> f64 {
        let sizing = &self.axis.sizing[index];
        match (sizing.max, sizing.pref) {
            (SizeOverride::Fixed(max), _) => bounded_size(0.0, size, max),
            (SizeOverride::UsePref, SizeOverride::Fixed(pref)) if pref > 0.0 => {
                bounded_size(0.0, size, pref)
            }
            _ => size,
        }
    }

    /// Grow the axes of `priority` (or shrink every non-percentage axis)
    /// by `extra`, returning what could not be placed.
    fn grow_or_shrink(&self, sizes: &mut CompositeSize, priority: Priority, extra: f64) -> f64 {
        let shrinking = extra < 0.0;
        let mut adjusting: Vec<usize> = (0..self.axis.count)
            .filter(|&i| !self.axis.is_percent(i) && (shrinking || self.axis.grow[i] == priority))
            .collect();

        let limits = if shrinking { self.min } else { self.max };
        let mut available = extra;
        let mut handle_remainder = false;
        let mut portion = 0.0;

        // Stop as soon as `available` crosses zero
        let was_positive = available >= 0.0;
        let mut is_positive = was_positive;

        while available != 0.0 && was_positive == is_positive && !adjusting.is_empty() {
            if !handle_remainder {
                let n = adjusting.len() as f64;
                portion = if available > 0.0 {
                    (available / n).floor()
                } else {
                    (available / n).ceil()
                };
            }

            if portion != 0.0 {
                let mut survivors = Vec::with_capacity(adjusting.len());
                for (pos, &index) in adjusting.iter().enumerate() {
                    let mut limit = self.snap.space(limits.proportional_limit(index, shrinking))
                        - sizes.get(index);
                    // Already past the limit: hold
                    if (shrinking && limit > 0.0) || (!shrinking && limit < 0.0) {
                        limit = 0.0;
                    }
                    let change = if limit.abs() <= portion.abs() {
                        limit
                    } else {
                        portion
                    };
                    sizes.add(index, change);
                    available -= change;
                    is_positive = available >= 0.0;
                    if change.abs() >= portion.abs() {
                        survivors.push(index);
                    }
                    if available == 0.0 {
                        survivors.extend_from_slice(&adjusting[pos + 1..]);
                        break;
                    }
                }
                adjusting = survivors;
            } else {
                let remainder = (available as i64) % (adjusting.len() as i64);
                if remainder == 0 {
                    break;
                }
                portion = if shrinking { -1.0 } else { 1.0 };
                handle_remainder = true;
            }
        }
        available
    }
}
