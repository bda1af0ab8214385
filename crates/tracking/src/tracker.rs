use tracing::warn;

use crate::contour::Contour;
use crate::edges::{Direction, EdgeGrid};
use crate::error::{Result, TrackingError};
use crate::frontier::FrontierStack;
use crate::homogeneity::HomogeneityOracle;
use crate::types::{DepthFrame, GridPoint, OccupancyGrid};

/// Smallest grid the 4-neighbor offset arithmetic supports.
pub const MIN_TRACKER_DIM: u32 = 2;

/// Axis-neighbor probe order shared by the shrink and grow phases.
const NEIGHBOR_ORDER: [Direction; 4] = [
    Direction::South,
    Direction::East,
    Direction::North,
    Direction::West,
];

/// The boundary edge separating `cell` from its neighbor toward `toward`:
/// start corner plus travel direction. Edges wind clockwise around the
/// region (in screen coordinates), so the region stays on the same side of
/// every traced segment.
fn boundary_edge(cell: GridPoint, toward: Direction) -> (GridPoint, Direction) {
    match toward {
        Direction::South => (GridPoint::new(cell.x, cell.y + 1), Direction::East),
        Direction::East => (GridPoint::new(cell.x + 1, cell.y + 1), Direction::North),
        Direction::North => (GridPoint::new(cell.x + 1, cell.y), Direction::West),
        Direction::West => (GridPoint::new(cell.x, cell.y), Direction::South),
    }
}

/// Incremental region growth/shrink engine.
///
/// Tracks one evolving occupancy region across depth frames. Occupancy and
/// the shrink frontier persist between `track` calls, so per-frame work is
/// proportional to the boundary change rather than the grid size: shrink
/// erodes from the previous boundary where the homogeneity criterion no
/// longer holds, grow expands from seeds and survivors, and the boundary
/// edges discovered while growing are traced into closed polylines.
pub struct RegionTracker<O> {
    width: i32,
    height: i32,
    seed_spacing_x: i32,
    seed_spacing_y: i32,
    occupancy: OccupancyGrid,
    edges: EdgeGrid,
    grow_frontier: FrontierStack,
    shrink_frontier: FrontierStack,
    contour: Contour,
    oracle: O,
}

impl<O: HomogeneityOracle> RegionTracker<O> {
    /// Builds a tracker for a `width` x `height` cell grid, seeding on a
    /// lattice with the given spacings. The oracle is injected and owned.
    pub fn new(
        width: u32,
        height: u32,
        seed_spacing_x: u32,
        seed_spacing_y: u32,
        oracle: O,
    ) -> Result<Self> {
        if width < MIN_TRACKER_DIM || height < MIN_TRACKER_DIM {
            return Err(TrackingError::GridTooSmall {
                width,
                height,
                min: MIN_TRACKER_DIM,
            });
        }
        if seed_spacing_x == 0 || seed_spacing_x > width {
            return Err(TrackingError::InvalidSeedSpacing {
                axis: "x",
                spacing: seed_spacing_x,
                max: width,
            });
        }
        if seed_spacing_y == 0 || seed_spacing_y > height {
            return Err(TrackingError::InvalidSeedSpacing {
                axis: "y",
                spacing: seed_spacing_y,
                max: height,
            });
        }

        let cells = (width * height) as usize;
        // One contour point per consumed directed edge; four direction bits
        // per corner bounds the buffer.
        let corner_cells = ((width + 1) * (height + 1)) as usize;
        Ok(Self {
            width: width as i32,
            height: height as i32,
            seed_spacing_x: seed_spacing_x as i32,
            seed_spacing_y: seed_spacing_y as i32,
            occupancy: OccupancyGrid::new(width, height),
            edges: EdgeGrid::new(width as i32, height as i32),
            grow_frontier: FrontierStack::with_capacity(cells),
            shrink_frontier: FrontierStack::with_capacity(cells),
            contour: Contour::with_capacity(4 * corner_cells + cells),
            oracle,
        })
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }

    pub fn contour(&self) -> &Contour {
        &self.contour
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    /// Drops all carried state: occupancy, frontiers, edges and contour.
    pub fn reset(&mut self) {
        self.occupancy.reset();
        self.edges.clear();
        self.grow_frontier.clear();
        self.shrink_frontier.clear();
        self.contour.clear();
    }

    /// Runs one tracking pass over `frame`: seed discovery, shrink, grow and
    /// contour extraction, in that fixed order. With `learn_background` the
    /// final occupancy mask is fed back to the oracle so its background
    /// model can refine thresholds from confirmed-background cells.
    pub fn track(&mut self, frame: &DepthFrame, learn_background: bool) -> Result<()> {
        let (frame_width, frame_height) = frame.dimensions();
        if (frame_width as i32, frame_height as i32) != (self.width, self.height) {
            return Err(TrackingError::FrameSizeMismatch {
                frame_width,
                frame_height,
                width: self.width as u32,
                height: self.height as u32,
            });
        }

        self.find_seeders(frame);
        self.shrink(frame);
        self.grow(frame);
        self.make_contour();
        self.flush_stale_edges();

        if learn_background {
            self.oracle.learn(frame, &self.occupancy);
        }
        Ok(())
    }

    /// Probes a coarse lattice of currently-unoccupied cells, in row-major
    /// order; hits are occupied and queued for growth.
    fn find_seeders(&mut self, frame: &DepthFrame) {
        let mut y = 0;
        while y < self.height {
            let mut x = 0;
            while x < self.width {
                let i = self.occupancy.index(x, y);
                if self.occupancy.cells[i] == 0 && self.oracle.is_foreground(frame, x, y) {
                    self.occupancy.cells[i] = 1;
                    self.grow_frontier.push(GridPoint::new(x, y));
                }
                x += self.seed_spacing_x;
            }
            y += self.seed_spacing_y;
        }
    }

    /// Erodes from the previous frame's boundary. Every carried cell is
    /// speculatively vacated; cells that still satisfy the criterion survive
    /// onto the grow frontier, and every failure vacates its still-occupied
    /// axis neighbors so the erosion spreads from the point of failure.
    fn shrink(&mut self, frame: &DepthFrame) {
        for i in 0..self.shrink_frontier.len() {
            let p = self.shrink_frontier.get(i);
            let idx = self.occupancy.index(p.x, p.y);
            self.occupancy.cells[idx] = 0;
        }

        while let Some(cell) = self.shrink_frontier.pop() {
            if self.oracle.is_foreground(frame, cell.x, cell.y) {
                self.grow_frontier.push(cell);
            } else {
                for toward in NEIGHBOR_ORDER {
                    let (sx, sy) = toward.step();
                    let nx = cell.x + sx;
                    let ny = cell.y + sy;
                    if nx < 0 || ny < 0 || nx >= self.width || ny >= self.height {
                        continue;
                    }
                    let idx = self.occupancy.index(nx, ny);
                    if self.occupancy.cells[idx] != 0 {
                        self.occupancy.cells[idx] = 0;
                        self.shrink_frontier.push(GridPoint::new(nx, ny));
                    }
                }
            }
        }

        // Survivors are region members again.
        for i in 0..self.grow_frontier.len() {
            let p = self.grow_frontier.get(i);
            let idx = self.occupancy.index(p.x, p.y);
            self.occupancy.cells[idx] = 1;
        }
    }

    /// Expands the region from the grow frontier. Neighbors that satisfy the
    /// criterion join the region; neighbors that fail (or lie outside the
    /// grid) record a boundary edge, and every boundary-generating cell
    /// seeds the next frame's shrink frontier.
    fn grow(&mut self, frame: &DepthFrame) {
        while let Some(cell) = self.grow_frontier.pop() {
            let mut generated = false;
            for toward in NEIGHBOR_ORDER {
                if self.probe_neighbor(frame, cell, toward) {
                    generated = true;
                }
            }
            if generated {
                self.shrink_frontier.push(cell);
            }
        }
    }

    /// Probes one axis neighbor during growth. Returns whether a boundary
    /// edge was recorded between `cell` and that neighbor.
    fn probe_neighbor(&mut self, frame: &DepthFrame, cell: GridPoint, toward: Direction) -> bool {
        let (sx, sy) = toward.step();
        let nx = cell.x + sx;
        let ny = cell.y + sy;
        let inside = nx >= 0 && ny >= 0 && nx < self.width && ny < self.height;
        if inside {
            let idx = self.occupancy.index(nx, ny);
            if self.occupancy.cells[idx] != 0 {
                return false;
            }
            if self.oracle.is_foreground(frame, nx, ny) {
                self.occupancy.cells[idx] = 1;
                self.grow_frontier.push(GridPoint::new(nx, ny));
                return false;
            }
        }
        let (corner, direction) = boundary_edge(cell, toward);
        self.edges.set(corner, direction);
        true
    }

    /// Traces the recorded boundary edges into closed polylines. Trace
    /// starts are found by scanning the shrink frontier (the
    /// boundary-generating cells) for a cell with an unconsumed own edge.
    fn make_contour(&mut self) {
        self.contour.clear();
        let mut scan = 0;
        while let Some((corner, direction)) = self.next_trace_start(&mut scan) {
            self.trace_polyline(corner, direction);
            self.contour.close_polyline();
        }
    }

    fn next_trace_start(&self, scan: &mut usize) -> Option<(GridPoint, Direction)> {
        while *scan < self.shrink_frontier.len() {
            let cell = self.shrink_frontier.get(*scan);
            *scan += 1;
            if let Some(start) = self.boundary_start(cell) {
                return Some(start);
            }
        }
        None
    }

    /// First unconsumed edge among the cell's own four boundary edges.
    fn boundary_start(&self, cell: GridPoint) -> Option<(GridPoint, Direction)> {
        for toward in NEIGHBOR_ORDER {
            let (corner, direction) = boundary_edge(cell, toward);
            if self.edges.has(corner, direction) {
                return Some((corner, direction));
            }
        }
        None
    }

    /// Walks one closed polyline from `start`, consuming each edge it
    /// follows and emitting every visited corner. At each corner the
    /// continuation candidates are tried in fixed priority: the clockwise
    /// turn, then straight ahead, then the counter-clockwise turn.
    fn trace_polyline(&mut self, start: GridPoint, start_direction: Direction) {
        let mut corner = start;
        let mut direction = start_direction;
        loop {
            self.contour.push(corner);
            match self.consume_continuation(corner, direction) {
                Some((next_corner, next_direction)) => {
                    corner = next_corner;
                    direction = next_direction;
                }
                None => break,
            }
        }
    }

    fn consume_continuation(
        &mut self,
        corner: GridPoint,
        direction: Direction,
    ) -> Option<(GridPoint, Direction)> {
        for candidate in [
            direction.clockwise(),
            direction,
            direction.counter_clockwise(),
        ] {
            if self.edges.take(corner, candidate) {
                let (sx, sy) = candidate.step();
                return Some((GridPoint::new(corner.x + sx, corner.y + sy), candidate));
            }
        }
        None
    }

    /// Edge flags surviving contour tracing would corrupt the next frame's
    /// trace. They cannot occur when the one-consumption-per-edge invariant
    /// holds, so any survivor is reported and discarded.
    fn flush_stale_edges(&mut self) {
        let stale = self.edges.set_count();
        if stale > 0 {
            warn!(stale, "boundary edges left untraced; clearing the edge grid");
            debug_assert!(
                false,
                "contour tracing left {stale} boundary edge flags unconsumed"
            );
            self.edges.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis;
    use crate::background::{AdaptiveBackgroundModel, BackgroundModel};
    use crate::homogeneity::DepthHomogeneity;
    use crate::types::NO_READING;
    use std::cell::RefCell;

    const W: u32 = 10;
    const H: u32 = 10;

    fn constant_frame(value: u16) -> DepthFrame {
        DepthFrame::from_pixel(W, H, image::Luma([value]))
    }

    /// 4x4 block of near samples at cells (3..7, 3..7), far background
    /// everywhere else.
    fn block_frame() -> DepthFrame {
        let mut frame = constant_frame(1000);
        for y in 3..7 {
            for x in 3..7 {
                frame.put_pixel(x, y, image::Luma([100]));
            }
        }
        frame
    }

    /// Oracle with a background learned from a few empty far-field frames.
    fn learned_oracle() -> DepthHomogeneity<AdaptiveBackgroundModel> {
        let model = AdaptiveBackgroundModel::new(W, H).unwrap();
        let mut oracle = DepthHomogeneity::new(model, 0, 2000, 10);
        let background = constant_frame(1000);
        let empty = OccupancyGrid::new(W, H);
        for _ in 0..3 {
            oracle.learn(&background, &empty);
        }
        oracle
    }

    fn block_tracker() -> RegionTracker<DepthHomogeneity<AdaptiveBackgroundModel>> {
        RegionTracker::new(W, H, 5, 5, learned_oracle()).unwrap()
    }

    /// Records every criterion probe; never claims foreground.
    struct ProbeOracle {
        calls: RefCell<Vec<(i32, i32)>>,
    }

    impl ProbeOracle {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl HomogeneityOracle for ProbeOracle {
        fn is_foreground(&self, _frame: &DepthFrame, x: i32, y: i32) -> bool {
            self.calls.borrow_mut().push((x, y));
            false
        }

        fn learn(&mut self, _frame: &DepthFrame, _occupancy: &OccupancyGrid) {}
    }

    #[test]
    fn rejects_degenerate_grids_and_spacings() {
        assert!(matches!(
            RegionTracker::new(1, 10, 1, 1, ProbeOracle::new()),
            Err(TrackingError::GridTooSmall { .. })
        ));
        assert!(matches!(
            RegionTracker::new(10, 10, 0, 1, ProbeOracle::new()),
            Err(TrackingError::InvalidSeedSpacing { axis: "x", .. })
        ));
        assert!(matches!(
            RegionTracker::new(10, 10, 1, 11, ProbeOracle::new()),
            Err(TrackingError::InvalidSeedSpacing { axis: "y", .. })
        ));
    }

    #[test]
    fn rejects_mismatched_frames() {
        let mut tracker = RegionTracker::new(W, H, 5, 5, ProbeOracle::new()).unwrap();
        let wrong = DepthFrame::from_pixel(8, 8, image::Luma([0]));
        assert!(matches!(
            tracker.track(&wrong, false),
            Err(TrackingError::FrameSizeMismatch { .. })
        ));
    }

    #[test]
    fn seed_lattice_is_probed_in_row_major_order() {
        let mut tracker = RegionTracker::new(W, H, 3, 3, ProbeOracle::new()).unwrap();
        let frame = constant_frame(500);
        tracker.track(&frame, false).unwrap();

        let mut expected = Vec::new();
        for y in (0..10).step_by(3) {
            for x in (0..10).step_by(3) {
                expected.push((x, y));
            }
        }
        assert_eq!(*tracker.oracle().calls.borrow(), expected);

        // A second identical pass probes the same cells in the same order.
        tracker.oracle_mut().calls.borrow_mut().clear();
        tracker.track(&frame, false).unwrap();
        assert_eq!(*tracker.oracle().calls.borrow(), expected);
    }

    #[test]
    fn tracks_a_block_into_one_closed_polyline() {
        let mut tracker = block_tracker();
        let frame = block_frame();
        tracker.track(&frame, false).unwrap();

        assert_eq!(tracker.occupancy().occupied_count(), 16);
        assert!(tracker.occupancy().as_slice().iter().all(|&c| c <= 1));

        let contour = tracker.contour();
        assert_eq!(contour.polyline_count(), 1);
        let polyline = contour.polyline(0);
        assert_eq!(polyline.first(), polyline.last());

        let (min, max) = analysis::axis_aligned_bounding_box(polyline).unwrap();
        assert_eq!((min.x, min.y), (3, 3));
        assert_eq!((max.x, max.y), (7, 7));
        let area = (max.x - min.x) * (max.y - min.y);
        assert_eq!(area, 16);
    }

    #[test]
    fn repeated_frames_are_stable() {
        let mut tracker = block_tracker();
        let frame = block_frame();

        tracker.track(&frame, false).unwrap();
        let occupancy_first = tracker.occupancy().clone();
        let contour_first: Vec<_> = tracker.contour().points().to_vec();

        for _ in 0..3 {
            tracker.track(&frame, false).unwrap();
            assert_eq!(tracker.occupancy().as_slice(), occupancy_first.as_slice());
            assert_eq!(tracker.contour().points(), contour_first.as_slice());
            assert_eq!(tracker.contour().polyline_count(), 1);
        }
    }

    #[test]
    fn region_vanishes_when_samples_return_to_background() {
        let mut tracker = block_tracker();
        tracker.track(&block_frame(), false).unwrap();
        assert_eq!(tracker.occupancy().occupied_count(), 16);

        tracker.track(&constant_frame(1000), false).unwrap();
        assert_eq!(tracker.occupancy().occupied_count(), 0);
        assert!(tracker.contour().is_empty());
    }

    #[test]
    fn two_blocks_produce_two_polylines() {
        let model = AdaptiveBackgroundModel::new(W, H).unwrap();
        let mut oracle = DepthHomogeneity::new(model, 0, 2000, 10);
        let background = constant_frame(1000);
        let empty = OccupancyGrid::new(W, H);
        for _ in 0..3 {
            oracle.learn(&background, &empty);
        }
        // Seeds every other cell so both blocks are found.
        let mut tracker = RegionTracker::new(W, H, 2, 2, oracle).unwrap();

        let mut frame = constant_frame(1000);
        for y in 2..4 {
            for x in 2..4 {
                frame.put_pixel(x, y, image::Luma([100]));
            }
        }
        for y in 6..8 {
            for x in 6..8 {
                frame.put_pixel(x, y, image::Luma([100]));
            }
        }
        tracker.track(&frame, false).unwrap();

        assert_eq!(tracker.occupancy().occupied_count(), 8);
        assert_eq!(tracker.contour().polyline_count(), 2);
        for polyline in tracker.contour().polylines() {
            assert_eq!(polyline.first(), polyline.last());
        }
    }

    #[test]
    fn no_reading_cells_are_not_tracked() {
        let mut tracker = block_tracker();
        let mut frame = block_frame();
        for y in 3..7 {
            for x in 3..7 {
                frame.put_pixel(x, y, image::Luma([NO_READING]));
            }
        }
        tracker.track(&frame, false).unwrap();
        assert_eq!(tracker.occupancy().occupied_count(), 0);
    }

    #[test]
    fn learned_mask_protects_the_region_from_background_updates() {
        let model = AdaptiveBackgroundModel::new(16, 16).unwrap();
        let mut oracle = DepthHomogeneity::new(model, 0, 2000, 10);
        let background = DepthFrame::from_pixel(16, 16, image::Luma([1000]));
        let empty = OccupancyGrid::new(16, 16);
        for _ in 0..3 {
            oracle.learn(&background, &empty);
        }
        let mut tracker = RegionTracker::new(16, 16, 5, 5, oracle).unwrap();

        let mut frame = DepthFrame::from_pixel(16, 16, image::Luma([1000]));
        for y in 3..7 {
            for x in 3..7 {
                frame.put_pixel(x, y, image::Luma([100]));
            }
        }
        tracker.track(&frame, true).unwrap();

        let model = tracker.oracle().background();
        // Cells inside the tracked block kept their learned far threshold:
        // the occupancy mask excluded them from background refinement.
        assert_eq!(model.threshold(5, 5), 875);
        // So did cells within two rings of the block.
        assert_eq!(model.threshold(8, 8), 875);
        // Cells clear of the block kept learning toward the background.
        assert_eq!(model.threshold(12, 12), 937);
    }

    #[test]
    fn reset_clears_carried_state() {
        let mut tracker = block_tracker();
        tracker.track(&block_frame(), false).unwrap();
        tracker.reset();
        assert_eq!(tracker.occupancy().occupied_count(), 0);
        assert!(tracker.contour().is_empty());

        // After a reset the same frame is re-acquired from seeds alone.
        tracker.track(&block_frame(), false).unwrap();
        assert_eq!(tracker.occupancy().occupied_count(), 16);
    }
}
