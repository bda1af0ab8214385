use crate::frontier::FrontierStack;
use crate::types::GridPoint;

/// Boundary of the tracked region after one pass: a flat point buffer
/// partitioned into disjoint closed polylines.
///
/// Points are edge-grid corner coordinates. Polyline `i` spans
/// `offsets[i]..offsets[i + 1]` of the buffer; the offset list always starts
/// at 0 and its last entry equals the buffer length.
#[derive(Debug, Clone)]
pub struct Contour {
    points: FrontierStack,
    offsets: Vec<usize>,
}

impl Contour {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: FrontierStack::with_capacity(capacity),
            offsets: vec![0],
        }
    }

    pub fn push(&mut self, point: GridPoint) {
        self.points.push(point);
    }

    /// Closes the polyline currently being traced by recording its end
    /// offset. A close with no new points since the last one is a no-op.
    pub fn close_polyline(&mut self) {
        let end = self.points.len();
        if self.offsets.last() != Some(&end) {
            self.offsets.push(end);
        }
    }

    pub fn polyline_count(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn polyline(&self, index: usize) -> &[GridPoint] {
        &self.points.as_slice()[self.offsets[index]..self.offsets[index + 1]]
    }

    pub fn polylines(&self) -> impl Iterator<Item = &[GridPoint]> {
        (0..self.polyline_count()).map(move |i| self.polyline(i))
    }

    /// All points of all polylines, in trace order.
    pub fn points(&self) -> &[GridPoint] {
        self.points.as_slice()
    }

    /// Polyline boundaries into the point buffer: `offsets()[i]` starts
    /// polyline `i`, `offsets()[i + 1]` ends it.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.offsets.clear();
        self.offsets.push(0);
    }
}
