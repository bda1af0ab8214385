use crate::background::BackgroundModel;
use crate::types::{DepthFrame, OccupancyGrid, NO_READING};

/// Per-cell foreground/background predicate used by the tracker at every
/// candidate cell.
pub trait HomogeneityOracle {
    /// Whether the cell at `(x, y)` belongs to the tracked foreground.
    /// Out-of-range coordinates are resolved by edge clamping.
    fn is_foreground(&self, frame: &DepthFrame, x: i32, y: i32) -> bool;

    /// Forwards a frame and its final occupancy mask so the underlying
    /// background model can learn from confirmed-background cells.
    fn learn(&mut self, frame: &DepthFrame, occupancy: &OccupancyGrid);
}

/// Depth-based homogeneity criterion backed by an adaptive background model.
///
/// A sample is foreground when it is a valid reading inside the configured
/// distance band and convincingly closer than the learned background: closer
/// than the cell threshold by more than `threshold_offset`, so sensor noise
/// near the background surface does not flicker into the region.
///
/// Frames handed to the predicate must share the background model's grid
/// dimensions; the tracker enforces this for its own frames.
#[derive(Debug, Clone)]
pub struct DepthHomogeneity<B> {
    background: B,
    min_distance: u16,
    max_distance: u16,
    threshold_offset: u16,
}

impl<B: BackgroundModel> DepthHomogeneity<B> {
    pub fn new(background: B, min_distance: u16, max_distance: u16, threshold_offset: u16) -> Self {
        Self {
            background,
            min_distance,
            max_distance,
            threshold_offset,
        }
    }

    pub fn background(&self) -> &B {
        &self.background
    }

    pub fn background_mut(&mut self) -> &mut B {
        &mut self.background
    }
}

impl<B: BackgroundModel> HomogeneityOracle for DepthHomogeneity<B> {
    fn is_foreground(&self, frame: &DepthFrame, x: i32, y: i32) -> bool {
        let (width, height) = frame.dimensions();
        // Edge-clamped, non-wrapping lookup.
        let cx = x.clamp(0, width as i32 - 1) as u32;
        let cy = y.clamp(0, height as i32 - 1) as u32;
        let sample = frame.get_pixel(cx, cy)[0];

        if sample == NO_READING || sample < self.min_distance || sample > self.max_distance {
            return false;
        }

        let threshold = self.background.threshold(cx, cy);
        sample < threshold && threshold - sample > self.threshold_offset
    }

    fn learn(&mut self, frame: &DepthFrame, occupancy: &OccupancyGrid) {
        self.background.learn(frame, occupancy);
    }
}
