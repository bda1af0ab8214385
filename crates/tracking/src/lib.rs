//! # Depth Region Tracking
//!
//! Segments and temporally tracks a foreground region in a stream of
//! depth-sensor frames, producing an occupancy mask and a closed-polyline
//! boundary per frame.
//!
//! ## Core Features
//!
//! - **Incremental engine**: growth and shrink restart from the previous
//!   frame's region, so per-frame cost follows the boundary change, not the
//!   grid size
//! - **Trait-based seams**: the tracker depends only on the
//!   [`HomogeneityOracle`] capability, which in turn delegates to a
//!   [`BackgroundModel`] capability
//! - **Adaptive background**: per-cell depth thresholds refined from
//!   confirmed-background samples
//! - **Bit-coded contours**: boundary edges recorded as direction bits and
//!   traced into closed polylines
//! - **GeoJSON export**: frame outlines serialize to standard feature
//!   collections
//!
//! ## Quick Start
//!
//! ```rust
//! use tracking::{
//!     AdaptiveBackgroundModel, DepthFrame, DepthHomogeneity, HomogeneityOracle,
//!     OccupancyGrid, RegionTracker,
//! };
//!
//! # fn main() -> tracking::Result<()> {
//! let model = AdaptiveBackgroundModel::new(64, 48)?;
//! let mut oracle = DepthHomogeneity::new(model, 300, 1300, 40);
//!
//! // Let the model see the empty scene before tracking starts.
//! let background = DepthFrame::from_pixel(64, 48, image::Luma([900]));
//! oracle.learn(&background, &OccupancyGrid::new(64, 48));
//!
//! let mut tracker = RegionTracker::new(64, 48, 8, 8, oracle)?;
//! tracker.track(&background, true)?;
//! println!("{} boundary polylines", tracker.contour().polyline_count());
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod background;
pub mod contour;
mod edges;
pub mod error;
pub mod frontier;
pub mod homogeneity;
pub mod io;
pub mod tracker;
pub mod types;

pub use background::{AdaptiveBackgroundModel, BackgroundModel, MIN_MODEL_DIM};
pub use contour::Contour;
pub use error::{Result, TrackingError};
pub use frontier::FrontierStack;
pub use homogeneity::{DepthHomogeneity, HomogeneityOracle};
pub use io::TrackOutline;
pub use tracker::{RegionTracker, MIN_TRACKER_DIM};
pub use types::{DepthFrame, GridPoint, OccupancyGrid, NO_READING};
