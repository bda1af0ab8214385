use serde::{Deserialize, Serialize};

/// Minimum-area rectangle enclosing a convex polygon: four corners in the
/// winding order of the polygon they were derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub a: [f32; 2],
    pub b: [f32; 2],
    pub c: [f32; 2],
    pub d: [f32; 2],
}

impl BoundingBox {
    /// Degenerate zero-sized box, returned for inputs too small to bound.
    pub const ZERO: BoundingBox = BoundingBox {
        a: [0.0, 0.0],
        b: [0.0, 0.0],
        c: [0.0, 0.0],
        d: [0.0, 0.0],
    };

    pub fn corners(&self) -> [[f32; 2]; 4] {
        [self.a, self.b, self.c, self.d]
    }

    fn side(p: [f32; 2], q: [f32; 2]) -> f32 {
        let dx = q[0] - p[0];
        let dy = q[1] - p[1];
        (dx * dx + dy * dy).sqrt()
    }

    pub fn area(&self) -> f32 {
        Self::side(self.a, self.b) * Self::side(self.a, self.d)
    }

    pub fn perimeter(&self) -> f32 {
        2.0 * (Self::side(self.a, self.b) + Self::side(self.a, self.d))
    }

    pub fn center(&self) -> [f32; 2] {
        [
            (self.a[0] + self.b[0] + self.c[0] + self.d[0]) / 4.0,
            (self.a[1] + self.b[1] + self.c[1] + self.d[1]) / 4.0,
        ]
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::ZERO
    }
}
