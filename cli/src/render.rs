//! Rendering sink for traced contours and bounding boxes.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;

/// Sink consuming contour points and a color. The core never needs anything
/// back from rendering; implementations decide where pixels go.
pub trait ContourSink {
    /// Draws the open polyline through `points`; callers pass a closed ring
    /// (first point repeated at the end) to draw a loop.
    fn draw_polyline(&mut self, points: &[[f32; 2]], color: Rgba<u8>);
}

/// Draws contours onto an RGBA image, optionally scaling grid coordinates
/// up to image coordinates.
pub struct OverlayRenderer {
    image: RgbaImage,
    scale_x: f32,
    scale_y: f32,
}

impl OverlayRenderer {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    pub fn with_scale(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl ContourSink for OverlayRenderer {
    fn draw_polyline(&mut self, points: &[[f32; 2]], color: Rgba<u8>) {
        for pair in points.windows(2) {
            draw_line_segment_mut(
                &mut self.image,
                (pair[0][0] * self.scale_x, pair[0][1] * self.scale_y),
                (pair[1][0] * self.scale_x, pair[1][1] * self.scale_y),
                color,
            );
        }
    }
}
