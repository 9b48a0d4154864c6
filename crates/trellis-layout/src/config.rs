//! Declarative grid configuration.

use trellis_core::{ColumnConstraints, GridError, Insets, Pos, Result, RowConstraints};

/// Container-level settings and axis constraints, loadable as data.
///
/// Cells carry content handles and are added to the [`GridPane`](crate::GridPane)
/// separately.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Horizontal gap between columns
    pub hgap: f64,
    /// Vertical gap between rows
    pub vgap: f64,
    pub padding: Insets,
    /// Alignment of the grid inside the container
    pub alignment: Pos,
    /// Round positions and spacing to whole pixels
    pub snap_to_pixel: bool,
    pub rows: Vec<RowConstraints>,
    pub columns: Vec<ColumnConstraints>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            hgap: 0.0,
            vgap: 0.0,
            padding: Insets::ZERO,
            alignment: Pos::TOP_LEFT,
            snap_to_pixel: true,
            rows: Vec::new(),
            columns: Vec::new(),
        }
    }
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gaps(mut self, hgap: f64, vgap: f64) -> Self {
        self.hgap = hgap;
        self.vgap = vgap;
        self
    }

    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_alignment(mut self, alignment: Pos) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_snap_to_pixel(mut self, snap: bool) -> Self {
        self.snap_to_pixel = snap;
        self
    }

    pub fn with_rows(mut self, rows: Vec<RowConstraints>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_columns(mut self, columns: Vec<ColumnConstraints>) -> Self {
        self.columns = columns;
        self
    }

    /// Check spacing and every axis constraint.
    pub fn validate(&self) -> Result<()> {
        check_spacing("hgap", self.hgap)?;
        check_spacing("vgap", self.vgap)?;
        check_padding(&self.padding)?;
        for (i, row) in self.rows.iter().enumerate() {
            row.validate(i)?;
        }
        for (i, column) in self.columns.iter().enumerate() {
            column.validate(i)?;
        }
        Ok(())
    }
}

pub(crate) fn check_spacing(what: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GridError::NegativeSpacing { what, value })
    }
}

pub(crate) fn check_padding(padding: &Insets) -> Result<()> {
    if padding.is_valid() {
        return Ok(());
    }
    let worst = [padding.top, padding.right, padding.bottom, padding.left]
        .into_iter()
        .find(|v| !(v.is_finite() && *v >= 0.0))
        .unwrap_or(0.0);
    Err(GridError::NegativeSpacing {
        what: "padding",
        value: worst,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::Priority;

    #[test]
    fn test_default_config() {
        let config = GridConfig::default();
        assert!(config.snap_to_pixel);
        assert_eq!(config.alignment, Pos::TOP_LEFT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let config = GridConfig::new().with_gaps(-1.0, 0.0);
        assert_eq!(
            config.validate(),
            Err(GridError::NegativeSpacing {
                what: "hgap",
                value: -1.0
            })
        );

        let config = GridConfig::new().with_padding(Insets::new(0.0, 0.0, -3.0, 0.0));
        assert_eq!(
            config.validate(),
            Err(GridError::NegativeSpacing {
                what: "padding",
                value: -3.0
            })
        );

        let config = GridConfig::new().with_rows(vec![
            RowConstraints::new(),
            RowConstraints::percent(140.0),
        ]);
        assert!(matches!(
            config.validate(),
            Err(GridError::InvalidPercent { index: 1, .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "hgap": 4.0,
            "padding": { "top": 1.0, "right": 2.0, "bottom": 3.0, "left": 4.0 },
            "columns": [
                { "pref": { "fixed": 120.0 } },
                { "percent": 30.0, "grow": "always", "alignment": "center" }
            ]
        }"#;
        let config: GridConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.hgap, 4.0);
        assert_eq!(config.vgap, 0.0);
        assert!(config.snap_to_pixel);
        assert_eq!(config.columns[0].pref.fixed(), Some(120.0));
        assert_eq!(config.columns[1].grow, Some(Priority::Always));
        assert_eq!(config.columns[1].alignment, Some(trellis_core::HPos::Center));
        assert!(config.columns[1].fill);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let config = GridConfig::new()
            .with_alignment(Pos::CENTER)
            .with_snap_to_pixel(false)
            .with_columns(vec![ColumnConstraints::growing(Priority::Sometimes)]);
        assert_eq!(config.columns.len(), 1);
        assert!(!config.snap_to_pixel);
    }
}
