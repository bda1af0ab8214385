//! Rotating-calipers sweep for the minimum-area oriented bounding box.

use tracing::warn;

use crate::bounding_box::BoundingBox;

fn sub(p: [f32; 2], q: [f32; 2]) -> [f32; 2] {
    [p[0] - q[0], p[1] - q[1]]
}

fn dot(p: [f32; 2], q: [f32; 2]) -> f32 {
    p[0] * q[0] + p[1] * q[1]
}

/// Unit vector along `v`; a zero-length input is treated as length 1 and
/// reported, since it signals duplicate hull vertices.
fn normalize(v: [f32; 2]) -> [f32; 2] {
    let mut len = (v[0] * v[0] + v[1] * v[1]).sqrt();
    if len == 0.0 {
        warn!("zero-length hull edge; input polygon has duplicate vertices");
        len = 1.0;
    }
    [v[0] / len, v[1] / len]
}

/// The three support indices of the sweep. Each only ever advances forward
/// around the hull across the whole sweep, so total movement is O(n).
struct Calipers<'a> {
    hull: &'a [[f32; 2]],
    /// Farthest along the edge direction.
    top: usize,
    /// Farthest in the perpendicular direction.
    opposite: usize,
    /// Farthest against the edge direction.
    bottom: usize,
}

impl<'a> Calipers<'a> {
    fn new(hull: &'a [[f32; 2]]) -> Self {
        Self {
            hull,
            top: 1,
            opposite: 1,
            bottom: 1,
        }
    }

    /// Advances `index` forward around the hull while `score` keeps
    /// improving, never reaching `stop`. Returns the settled index.
    fn advance_support<F>(&self, mut index: usize, stop: usize, score: F) -> (usize, f32)
    where
        F: Fn([f32; 2]) -> f32,
    {
        let n = self.hull.len();
        let mut best = score(self.hull[index]);
        let mut next = (index + 1) % n;
        while next != stop {
            let candidate = score(self.hull[next]);
            if candidate < best {
                break;
            }
            best = candidate;
            index = next;
            next = (index + 1) % n;
        }
        (index, best)
    }

    /// Re-seats all three supports for the edge `(edge_a, edge_b)` and
    /// returns the perpendicular extent of the hull over that edge.
    fn advance(&mut self, edge_a: usize, edge_b: usize) -> f32 {
        let a = self.hull[edge_a];
        let u = normalize(sub(self.hull[edge_b], a));
        let n = [-u[1], u[0]];

        let (top, _) = self.advance_support(self.top, edge_a, |p| dot(sub(p, a), u));
        self.top = top;

        // The supports never fall behind one another in cyclic order from
        // the current edge; carry the later index forward.
        if self.top > self.opposite || (self.top < self.opposite && self.top < edge_a) {
            self.opposite = self.top;
        }

        let (opposite, extent) =
            self.advance_support(self.opposite, edge_a, |p| dot(sub(p, a), n).abs());
        self.opposite = opposite;

        if self.opposite > self.bottom || (self.opposite < self.bottom && self.bottom < edge_a) {
            self.bottom = self.opposite;
        }

        let (bottom, _) = self.advance_support(self.bottom, edge_a, |p| -dot(sub(p, a), u));
        self.bottom = bottom;

        extent
    }
}

/// Rebuilds the rectangle for the winning edge/support configuration by
/// projecting the extreme points onto the edge direction.
fn build_box(
    hull: &[[f32; 2]],
    edge_a: usize,
    edge_b: usize,
    supports: (usize, usize, usize),
) -> BoundingBox {
    let (top, opposite, bottom) = supports;
    let a = hull[edge_a];
    let co = hull[opposite];
    let u = normalize(sub(hull[edge_b], a));

    let hi = dot(sub(hull[top], a), u);
    // The sweep never seats a support on the edge base itself, so the base
    // vertex (projection 0) caps the low extent.
    let lo = dot(sub(hull[bottom], a), u).min(0.0);
    let shift = dot(sub(co, a), u);

    BoundingBox {
        a: [a[0] + u[0] * hi, a[1] + u[1] * hi],
        b: [co[0] + u[0] * (hi - shift), co[1] + u[1] * (hi - shift)],
        c: [co[0] + u[0] * (lo - shift), co[1] + u[1] * (lo - shift)],
        d: [a[0] + u[0] * lo, a[1] + u[1] * lo],
    }
}

/// Minimum-area oriented bounding box of a convex polygon.
///
/// `hull` must hold the polygon's vertices in a consistent winding. Every
/// edge is tried as a box side while the three support points advance
/// monotonically around the hull; the edge with the smallest perpendicular
/// extent wins. Fewer than 3 points is reported and yields
/// [`BoundingBox::ZERO`].
pub fn minimum_bounding_box(hull: &[[f32; 2]]) -> BoundingBox {
    if hull.len() < 3 {
        warn!(
            points = hull.len(),
            "convex hull too small for a bounding box; returning a zero box"
        );
        return BoundingBox::ZERO;
    }

    let mut sweep = Calipers::new(hull);
    let mut best_edge = (0, 1);
    let mut best_supports = (1, 1, 1);
    let mut best_extent = f32::INFINITY;

    for edge_a in 0..hull.len() {
        let edge_b = (edge_a + 1) % hull.len();
        let extent = sweep.advance(edge_a, edge_b);
        if extent < best_extent {
            best_extent = extent;
            best_edge = (edge_a, edge_b);
            best_supports = (sweep.top, sweep.opposite, sweep.bottom);
        }
    }

    build_box(hull, best_edge.0, best_edge.1, best_supports)
}
