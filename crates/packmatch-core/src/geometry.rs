//! Geometric primitives for artwork layout.
//!
//! All coordinates live in a single y-up artboard space: x grows to the
//! right and y grows upward, so "below" means a smaller y value. Distances
//! are Euclidean, measured in artboard units (points at scale 1.0).

use serde::{Deserialize, Serialize};

/// A point in y-up artboard coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, growing rightward.
    pub x: f64,
    /// Vertical coordinate, growing upward.
    pub y: f64,
}

impl Point {
    /// Creates a new `Point` from its coordinates.
    #[inline]
    #[must_use = "creates a new Point with coordinates"]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the Euclidean distance to another point.
    #[inline]
    #[must_use = "returns the distance between the two points"]
    pub fn distance(&self, other: Self) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Returns `true` if both coordinates are finite numbers.
    #[inline]
    #[must_use = "returns whether the point has finite coordinates"]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned rectangle in y-up artboard coordinates.
///
/// A well-formed box satisfies `x_min <= x_max` and `y_min <= y_max` with
/// all four coordinates finite. Boxes are validated when a document is
/// loaded; geometry queries assume the invariant holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x_min: f64,
    /// Bottom edge (smallest y).
    pub y_min: f64,
    /// Right edge.
    pub x_max: f64,
    /// Top edge (largest y).
    pub y_max: f64,
}

impl BoundingBox {
    /// Creates a new `BoundingBox` with the given edges.
    ///
    /// # Arguments
    ///
    /// * `x_min` - Left edge
    /// * `y_min` - Bottom edge
    /// * `x_max` - Right edge
    /// * `y_max` - Top edge
    #[inline]
    #[must_use = "creates a new BoundingBox with coordinates"]
    pub const fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Returns the width of the bounding box.
    #[inline]
    #[must_use = "returns the width of the bounding box"]
    pub const fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Returns the height of the bounding box.
    #[inline]
    #[must_use = "returns the height of the bounding box"]
    pub const fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Returns the geometric center of the box.
    ///
    /// This is the association origin for a tagged group: candidate labels
    /// are measured from here.
    #[inline]
    #[must_use = "returns the center point of the bounding box"]
    pub fn centroid(&self) -> Point {
        Point::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Returns the distance from `point` to the nearest edge of the box.
    ///
    /// Points inside the box (edges included) are at distance zero.
    #[must_use = "returns the distance from the point to the box"]
    pub fn distance_to_point(&self, point: Point) -> f64 {
        let nearest = Point::new(
            point.x.clamp(self.x_min, self.x_max),
            point.y.clamp(self.y_min, self.y_max),
        );
        point.distance(nearest)
    }

    /// Returns `true` if the box is non-degenerate and fully finite.
    #[must_use = "returns whether the bounding box is well-formed"]
    pub fn is_well_formed(&self) -> bool {
        self.x_min.is_finite()
            && self.y_min.is_finite()
            && self.x_max.is_finite()
            && self.y_max.is_finite()
            && self.x_min <= self.x_max
            && self.y_min <= self.y_max
    }
}

/// Returns `true` if `candidate` lies in the lower-right quadrant of `origin`.
///
/// In y-up coordinates that means at-or-right-of and at-or-below the origin:
/// `candidate.x >= origin.x && candidate.y <= origin.y`. Both boundary rays
/// are inclusive, so a label level with or directly beneath the origin still
/// qualifies.
#[inline]
#[must_use = "returns whether the candidate lies in the lower-right quadrant"]
pub fn quadrant_ok(origin: Point, candidate: Point) -> bool {
    candidate.x >= origin.x && candidate.y <= origin.y
}
