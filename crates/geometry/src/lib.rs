//! # Oriented Bounding Boxes
//!
//! Minimum-area oriented bounding boxes for tracked-region contours: a
//! rotating-calipers sweep over a convex hull, with hull construction
//! delegated to a [`ConvexHullBuilder`] collaborator.
//!
//! ```rust
//! use geometry::{oriented_bounding_box, GeoHullBuilder};
//!
//! # fn main() -> geometry::Result<()> {
//! let points = [[0.0, 0.0], [3.0, 0.0], [3.0, 3.0], [0.0, 3.0], [1.5, 1.5]];
//! let bbox = oriented_bounding_box(&GeoHullBuilder, &points)?;
//! assert!((bbox.area() - 9.0).abs() < 1e-3);
//! # Ok(())
//! # }
//! ```

pub mod bounding_box;
pub mod calipers;
pub mod error;
pub mod hull;

pub use bounding_box::BoundingBox;
pub use calipers::minimum_bounding_box;
pub use error::{GeometryError, Result};
pub use hull::{ConvexHullBuilder, GeoHullBuilder};

/// Convex hull then calipers in one call: the minimum-area oriented
/// bounding box of an arbitrary point set.
pub fn oriented_bounding_box<H: ConvexHullBuilder>(
    builder: &H,
    points: &[[f32; 2]],
) -> Result<BoundingBox> {
    let hull = builder.hull(points)?;
    Ok(minimum_bounding_box(&hull))
}
