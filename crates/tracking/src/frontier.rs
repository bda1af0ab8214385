use crate::types::GridPoint;

/// Fixed-capacity LIFO work-list of grid coordinates.
///
/// Backs both the grow and shrink frontiers as well as the contour point
/// buffer. Capacity is fixed at construction: the engine pushes each cell at
/// most once per phase per frame, so a frontier never needs more slots than
/// the grid has cells. Exceeding the capacity means that invariant broke
/// (in practice a frame whose dimensions disagree with the tracker's) and
/// is unrecoverable.
#[derive(Debug, Clone)]
pub struct FrontierStack {
    points: Vec<GridPoint>,
    capacity: usize,
}

impl FrontierStack {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a coordinate in O(1).
    ///
    /// Panics on overflow: the one-push-per-cell-per-phase invariant is
    /// broken, almost always by a frame/grid size mismatch.
    pub fn push(&mut self, point: GridPoint) {
        assert!(
            self.points.len() < self.capacity,
            "frontier stack overflow (capacity {}): a cell was pushed twice in one phase; \
             the frame dimensions likely no longer match the tracker grid",
            self.capacity
        );
        self.points.push(point);
    }

    pub fn pop(&mut self) -> Option<GridPoint> {
        self.points.pop()
    }

    pub fn peek_last(&self) -> Option<GridPoint> {
        self.points.last().copied()
    }

    /// Resets the logical length; the allocation is kept for reuse.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> GridPoint {
        self.points[index]
    }

    pub fn as_slice(&self) -> &[GridPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridPoint> {
        self.points.iter()
    }
}
