//! Measures over traced polylines: centers, bounds and selection.

use crate::contour::Contour;
use crate::types::GridPoint;

/// Integer mean center of mass of a polyline. `None` for an empty one.
pub fn centroid(points: &[GridPoint]) -> Option<GridPoint> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as i64;
    let sum_x: i64 = points.iter().map(|p| p.x as i64).sum();
    let sum_y: i64 = points.iter().map(|p| p.y as i64).sum();
    Some(GridPoint::new((sum_x / n) as i32, (sum_y / n) as i32))
}

/// Per-axis median center, more robust against boundary spikes than the
/// mean. `None` for an empty polyline.
pub fn median_center(points: &[GridPoint]) -> Option<GridPoint> {
    if points.is_empty() {
        return None;
    }
    let mut xs: Vec<i32> = points.iter().map(|p| p.x).collect();
    let mut ys: Vec<i32> = points.iter().map(|p| p.y).collect();
    let mid = points.len() / 2;
    let (_, &mut mx, _) = xs.select_nth_unstable(mid);
    let (_, &mut my, _) = ys.select_nth_unstable(mid);
    Some(GridPoint::new(mx, my))
}

/// Axis-aligned bounding box of a polyline as `(min, max)` corners.
/// `None` for an empty polyline.
pub fn axis_aligned_bounding_box(points: &[GridPoint]) -> Option<(GridPoint, GridPoint)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}

/// Polylines with at least `min_points` points, in trace order.
pub fn polylines_with_min_points(contour: &Contour, min_points: usize) -> Vec<&[GridPoint]> {
    contour
        .polylines()
        .filter(|polyline| polyline.len() >= min_points)
        .collect()
}

/// The `n` longest polylines, longest first. `n == 0` means no limit.
pub fn longest_polylines(contour: &Contour, n: usize) -> Vec<&[GridPoint]> {
    let mut polylines: Vec<&[GridPoint]> = contour.polylines().collect();
    polylines.sort_by(|a, b| b.len().cmp(&a.len()));
    if n > 0 {
        polylines.truncate(n);
    }
    polylines
}
