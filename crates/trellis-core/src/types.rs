//! Core value types for the grid engine.

use glam::DVec2;

/// Orientation of an axis, or of a content bias.
///
/// `Horizontal` measures widths (columns), `Vertical` measures heights (rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The other orientation.
    pub fn opposite(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Horizontal => f.write_str("horizontal"),
            Orientation::Vertical => f.write_str("vertical"),
        }
    }
}

/// Grow priority of a row or column.
///
/// Ordered so that `Never < Sometimes < Always`; an axis's effective priority
/// is the maximum of what it declares and what its single-span cells request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Priority {
    /// Never absorbs surplus space
    #[default]
    Never,
    /// Absorbs surplus once every `Always` axis is at its limit
    Sometimes,
    /// Absorbs surplus first
    Always,
}

/// Horizontal position of a cell inside its area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HPos {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical position of a cell inside its area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VPos {
    Top,
    #[default]
    Center,
    /// Align text baselines of all baseline cells sharing a row
    Baseline,
    Bottom,
}

/// Combined horizontal and vertical position, used for the grid's own
/// alignment inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub hpos: HPos,
    pub vpos: VPos,
}

impl Pos {
    pub const TOP_LEFT: Self = Self::new(HPos::Left, VPos::Top);
    pub const CENTER: Self = Self::new(HPos::Center, VPos::Center);
    pub const BOTTOM_RIGHT: Self = Self::new(HPos::Right, VPos::Bottom);

    pub const fn new(hpos: HPos, vpos: VPos) -> Self {
        Self { hpos, vpos }
    }
}

impl Default for Pos {
    fn default() -> Self {
        Self::TOP_LEFT
    }
}

/// Insets on all four sides, used for container padding and cell margins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create uniform insets.
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Create symmetric insets.
    pub fn symmetric(horizontal: f64, vertical: f64) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    /// Total horizontal inset.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Total vertical inset.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// The leading and trailing inset along one orientation.
    pub fn along(&self, orientation: Orientation) -> (f64, f64) {
        match orientation {
            Orientation::Horizontal => (self.left, self.right),
            Orientation::Vertical => (self.top, self.bottom),
        }
    }

    /// Whether every side is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Position relative to the grid container
    pub x: f64,
    pub y: f64,
    /// Size of the cell
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Create bounds with position and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create bounds from position and size vectors.
    pub fn from_vecs(position: DVec2, size: DVec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    /// Get position as a vector.
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Get size as a vector.
    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// Get the right edge (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom edge (y + height).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if a point is inside the bounds.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Shrink the bounds by the given insets.
    pub fn inset(&self, insets: &Insets) -> Bounds {
        Bounds::new(
            self.x + insets.left,
            self.y + insets.top,
            self.width - insets.horizontal(),
            self.height - insets.vertical(),
        )
    }
}

/// Minimum, preferred, and maximum extent of a piece of content along one
/// orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeRange {
    pub min: f64,
    pub pref: f64,
    pub max: f64,
}

impl SizeRange {
    pub fn new(min: f64, pref: f64, max: f64) -> Self {
        Self { min, pref, max }
    }

    /// A range where min, pref, and max are all `size`.
    pub fn fixed(size: f64) -> Self {
        Self::new(size, size, size)
    }

    /// A range that can shrink to zero and grow without limit.
    pub fn flexible(pref: f64) -> Self {
        Self::new(0.0, pref, f64::MAX)
    }

    /// The preferred size clamped into `[min, max]`.
    pub fn bounded_pref(&self) -> f64 {
        bounded_size(self.min, self.pref, self.max)
    }
}

/// Clamp `pref` into `[min, max]`, letting `min` win when the range is empty.
pub fn bounded_size(min: f64, pref: f64, max: f64) -> f64 {
    let a = if pref >= min { pref } else { min };
    let b = if min >= max { min } else { max };
    if a <= b {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Never < Priority::Sometimes);
        assert!(Priority::Sometimes < Priority::Always);
        assert_eq!(Priority::Never.max(Priority::Always), Priority::Always);
        assert_eq!(Priority::default(), Priority::Never);
    }

    #[test]
    fn test_bounded_size_min_wins() {
        assert_eq!(bounded_size(0.0, 50.0, 100.0), 50.0);
        assert_eq!(bounded_size(0.0, 150.0, 100.0), 100.0);
        assert_eq!(bounded_size(20.0, 10.0, 100.0), 20.0);
        // Inverted range: min takes precedence over max
        assert_eq!(bounded_size(80.0, 10.0, 40.0), 80.0);
    }

    #[test]
    fn test_insets() {
        let insets = Insets::symmetric(4.0, 2.0);
        assert_eq!(insets.horizontal(), 8.0);
        assert_eq!(insets.vertical(), 4.0);
        assert_eq!(insets.along(Orientation::Vertical), (2.0, 2.0));
        assert!(insets.is_valid());
        assert!(!Insets::uniform(-1.0).is_valid());
    }

    #[test]
    fn test_bounds_inset_and_vecs() {
        let b = Bounds::new(10.0, 20.0, 100.0, 50.0);
        let inner = b.inset(&Insets::uniform(5.0));
        assert_eq!(inner, Bounds::new(15.0, 25.0, 90.0, 40.0));
        assert!(b.contains(10.0, 70.0));
        assert_eq!(b.right(), 110.0);

        let rebuilt = Bounds::from_vecs(b.position(), b.size());
        assert_eq!(rebuilt, b);
    }

    #[test]
    fn test_orientation_opposite() {
        assert_eq!(Orientation::Horizontal.opposite(), Orientation::Vertical);
        assert_eq!(Orientation::Vertical.to_string(), "vertical");
    }
}
