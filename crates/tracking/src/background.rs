use tracing::warn;

use crate::error::{Result, TrackingError};
use crate::types::{DepthFrame, OccupancyGrid, NO_READING};

/// Half-width of the confirmed-background neighborhood, and therefore the
/// interior margin the learning pass keeps from the grid border.
const NEIGHBORHOOD_RADIUS: i32 = 2;

/// Smallest grid dimension for which the neighborhood test is well-defined.
pub const MIN_MODEL_DIM: u32 = (2 * NEIGHBORHOOD_RADIUS + 1) as u32;

/// Per-cell adaptive background capability: learns expected background depth
/// from confirmed-background samples and answers threshold lookups.
pub trait BackgroundModel {
    /// Refines thresholds from cells the given mask confirms as background.
    fn learn(&mut self, frame: &DepthFrame, occupancy: &OccupancyGrid);

    /// Current expected background depth at a cell.
    fn threshold(&self, x: u32, y: u32) -> u16;

    /// The whole threshold map, row-major.
    fn thresholds(&self) -> &[u16];
}

/// Background model with one u16 threshold per cell.
///
/// Thresholds start at zero and are only ever refined toward confirmed
/// background samples; they persist for the model's lifetime. A cell counts
/// as confirmed background when its entire 5x5 neighborhood (the cell plus
/// two concentric square rings) is unoccupied and its sample is a real
/// reading. Each confirmation blends 50/50:
/// `threshold = (threshold + sample) / 2`.
#[derive(Debug, Clone)]
pub struct AdaptiveBackgroundModel {
    width: u32,
    height: u32,
    thresholds: Vec<u16>,
}

impl AdaptiveBackgroundModel {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width < MIN_MODEL_DIM || height < MIN_MODEL_DIM {
            return Err(TrackingError::GridTooSmall {
                width,
                height,
                min: MIN_MODEL_DIM,
            });
        }
        Ok(Self {
            width,
            height,
            thresholds: vec![0; (width * height) as usize],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn neighborhood_clear(&self, occupancy: &[u8], x: i32, y: i32) -> bool {
        let w = self.width as i32;
        for dy in -NEIGHBORHOOD_RADIUS..=NEIGHBORHOOD_RADIUS {
            let row = (y + dy) * w;
            for dx in -NEIGHBORHOOD_RADIUS..=NEIGHBORHOOD_RADIUS {
                if occupancy[(row + x + dx) as usize] != 0 {
                    return false;
                }
            }
        }
        true
    }
}

impl BackgroundModel for AdaptiveBackgroundModel {
    fn learn(&mut self, frame: &DepthFrame, occupancy: &OccupancyGrid) {
        if frame.dimensions() != (self.width, self.height)
            || (occupancy.width(), occupancy.height()) != (self.width, self.height)
        {
            warn!(
                frame_width = frame.width(),
                frame_height = frame.height(),
                model_width = self.width,
                model_height = self.height,
                "background learn skipped: dimensions do not match the model"
            );
            return;
        }

        let margin = NEIGHBORHOOD_RADIUS;
        let mask = occupancy.as_slice();
        for y in margin..self.height as i32 - margin {
            for x in margin..self.width as i32 - margin {
                let sample = frame.get_pixel(x as u32, y as u32)[0];
                if sample == NO_READING {
                    continue;
                }
                if !self.neighborhood_clear(mask, x, y) {
                    continue;
                }
                let i = (y * self.width as i32 + x) as usize;
                self.thresholds[i] = ((self.thresholds[i] as u32 + sample as u32) / 2) as u16;
            }
        }
    }

    fn threshold(&self, x: u32, y: u32) -> u16 {
        self.thresholds[(y * self.width + x) as usize]
    }

    fn thresholds(&self) -> &[u16] {
        &self.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_frame(width: u32, height: u32, value: u16) -> DepthFrame {
        DepthFrame::from_pixel(width, height, image::Luma([value]))
    }

    #[test]
    fn rejects_grids_below_the_neighborhood_margin() {
        assert!(matches!(
            AdaptiveBackgroundModel::new(4, 10),
            Err(TrackingError::GridTooSmall { .. })
        ));
        assert!(AdaptiveBackgroundModel::new(5, 5).is_ok());
    }

    #[test]
    fn threshold_error_halves_on_each_confirmation() {
        let mut model = AdaptiveBackgroundModel::new(8, 8).unwrap();
        let frame = constant_frame(8, 8, 1000);
        let empty = OccupancyGrid::new(8, 8);

        let mut expected_error = 1000u32;
        for _ in 0..6 {
            model.learn(&frame, &empty);
            expected_error /= 2;
            assert_eq!(1000 - model.threshold(4, 4) as u32, expected_error);
        }
    }

    #[test]
    fn border_cells_are_never_learned() {
        let mut model = AdaptiveBackgroundModel::new(8, 8).unwrap();
        let frame = constant_frame(8, 8, 1000);
        model.learn(&frame, &OccupancyGrid::new(8, 8));
        assert_eq!(model.threshold(0, 0), 0);
        assert_eq!(model.threshold(1, 1), 0);
        assert_eq!(model.threshold(7, 4), 0);
        assert_eq!(model.threshold(2, 2), 500);
    }

    #[test]
    fn occupied_neighborhood_blocks_learning() {
        let mut model = AdaptiveBackgroundModel::new(11, 11).unwrap();
        let frame = constant_frame(11, 11, 600);
        let mut mask = OccupancyGrid::new(11, 11);
        let center = mask.index(4, 4);
        mask.cells[center] = 1;

        model.learn(&frame, &mask);
        // Every cell within two rings of the occupied cell keeps its prior
        // threshold; cells farther out are refined.
        assert_eq!(model.threshold(4, 4), 0);
        assert_eq!(model.threshold(6, 6), 0);
        assert_eq!(model.threshold(2, 4), 0);
        assert_eq!(model.threshold(7, 4), 300);
        assert_eq!(model.threshold(8, 8), 300);
    }

    #[test]
    fn sentinel_samples_are_ignored() {
        let mut model = AdaptiveBackgroundModel::new(8, 8).unwrap();
        let mut frame = constant_frame(8, 8, 800);
        frame.put_pixel(3, 3, image::Luma([NO_READING]));
        model.learn(&frame, &OccupancyGrid::new(8, 8));
        assert_eq!(model.threshold(3, 3), 0);
        assert_eq!(model.threshold(4, 4), 400);
    }

    #[test]
    fn mismatched_dimensions_leave_thresholds_untouched() {
        let mut model = AdaptiveBackgroundModel::new(8, 8).unwrap();
        let frame = constant_frame(6, 6, 1000);
        model.learn(&frame, &OccupancyGrid::new(6, 6));
        assert!(model.thresholds().iter().all(|&t| t == 0));
    }
}
