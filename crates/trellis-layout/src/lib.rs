//! Grid sizing engine for Trellis.
//!
//! This crate sizes the rows and columns of a grid from their constraints
//! and the content of the cells placed on them, then positions every cell
//! inside the area its rows and columns describe.
//!
//! # Architecture
//!
//! 1. **Metrics**: axis counts, normalized percentages, effective grow
//!    priorities, and baseline bookkeeping, derived once per configuration
//! 2. **Composite tables**: min, pref, and max sizes per axis, with the
//!    requirements of spanning cells kept per interval
//! 3. **Distribution**: percentage allocation, multi-span growth, and
//!    priority-tiered grow/shrink against a container size
//! 4. **Placement**: offsets, fill, alignment, margins, and baselines
//!
//! # Example
//!
//! ```
//! use trellis_core::{ColumnConstraints, Priority};
//! use trellis_layout::{FixedContent, GridCell, GridPane};
//!
//! let mut grid = GridPane::new();
//! grid.set_column_constraints(vec![
//!     ColumnConstraints::percent(50.0),
//!     ColumnConstraints::new(),
//! ])?;
//! let label = grid.add(GridCell::new(FixedContent::new(30.0, 20.0).shared(), 0, 0))?;
//! grid.add(GridCell::new(FixedContent::new(40.0, 20.0).shared(), 1, 0))?;
//!
//! let layout = grid.layout(200.0, 50.0);
//! assert_eq!(layout.columns, vec![100.0, 40.0]);
//! assert_eq!(layout.cell(label).map(|b| b.width), Some(100.0));
//! # Ok::<(), trellis_core::GridError>(())
//! ```

mod cell;
mod composite;
mod config;
mod distribute;
mod metrics;
mod pane;
mod placement;
mod snap;
mod tables;

pub use cell::{CellId, CellRef, Content, FixedContent, GridCell};
pub use composite::{AxisSize, CompositeSize, Interval};
pub use config::GridConfig;
pub use distribute::AxisDistributor;
pub use metrics::{Aspect, AxisMetrics, BaselineComplement, GridMetrics, RowBaselines};
pub use pane::{GridLayout, GridPane};
pub use snap::Snapper;
