//! Planar predicates and small vector helpers.
//!
//! Purpose
//! - Segment intersection (touching and collinear overlap count as crossing) and
//!   ray-casting point-in-convex-polygon, both built on `orientation`.
//! - Magnitude helpers for `Vector2` that keep the zero vector at zero instead of
//!   producing NaN when normalizing.
//!
//! Conventions
//! - Screen coordinates (y grows downward); only equality of orientations matters
//!   to the predicates, so the handedness of the sign is irrelevant to callers.

use nalgebra::Vector2;

/// Horizontal reach of the ray cast by `point_in_convex_polygon`.
pub const RAY_EXTENT: f64 = 1_000_000.0;

/// Turn direction of the path `a → b → c`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    Collinear,
}

impl Orientation {
    /// `+1`, `-1` or `0`.
    #[inline]
    pub fn signum(self) -> i8 {
        match self {
            Orientation::Clockwise => 1,
            Orientation::CounterClockwise => -1,
            Orientation::Collinear => 0,
        }
    }
}

/// Sign of the cross product of `b - a` and `c - b`.
#[inline]
pub fn orientation(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> Orientation {
    let v = (b.y - a.y) * (c.x - b.x) - (b.x - a.x) * (c.y - b.y);
    if v > 0.0 {
        Orientation::Clockwise
    } else if v < 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Collinear
    }
}

/// `p` lies inside the axis-aligned bounding box of `s1–s2` (closed).
#[inline]
fn within_bounds(p: Vector2<f64>, s1: Vector2<f64>, s2: Vector2<f64>) -> bool {
    p.x <= s1.x.max(s2.x) && p.x >= s1.x.min(s2.x) && p.y <= s1.y.max(s2.y) && p.y >= s1.y.min(s2.y)
}

/// True if segment `p1–p2` meets segment `q1–q2`.
///
/// General position uses the four-orientation test. A collinear endpoint that
/// falls within the other segment's bounding box also counts, so shared
/// endpoints, T-junctions and collinear overlaps all report an intersection.
pub fn segments_intersect(
    p1: Vector2<f64>,
    p2: Vector2<f64>,
    q1: Vector2<f64>,
    q2: Vector2<f64>,
) -> bool {
    let d1 = orientation(p1, p2, q1);
    let d2 = orientation(p1, p2, q2);
    let d3 = orientation(q1, q2, p1);
    let d4 = orientation(q1, q2, p2);
    if d1 != d2 && d3 != d4 {
        return true;
    }
    (d1 == Orientation::Collinear && within_bounds(q1, p1, p2))
        || (d2 == Orientation::Collinear && within_bounds(q2, p1, p2))
        || (d3 == Orientation::Collinear && within_bounds(p1, q1, q2))
        || (d4 == Orientation::Collinear && within_bounds(p2, q1, q2))
}

/// Ray-casting parity test against a convex polygon given by its vertices in order.
///
/// Returns `false` for fewer than 3 vertices. A ray whose height equals a
/// vertex's height may count that vertex twice (both adjacent edges touch it);
/// callers that need exact boundary semantics must not rely on this test.
pub fn point_in_convex_polygon(point: Vector2<f64>, polygon: &[Vector2<f64>]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let extreme = Vector2::new(RAY_EXTENT, point.y);
    let crossings = (0..polygon.len())
        .filter(|&i| {
            let next = (i + 1) % polygon.len();
            segments_intersect(polygon[i], polygon[next], point, extreme)
        })
        .count();
    crossings % 2 == 1
}

/// Vertex mean of a polygon; `None` when empty.
pub fn centroid(polygon: &[Vector2<f64>]) -> Option<Vector2<f64>> {
    if polygon.is_empty() {
        return None;
    }
    let sum = polygon.iter().fold(Vector2::<f64>::zeros(), |acc, v| acc + v);
    Some(sum / polygon.len() as f64)
}

/// `v` rescaled to length `mag`; the zero vector stays zero.
#[inline]
pub fn with_magnitude(v: Vector2<f64>, mag: f64) -> Vector2<f64> {
    let norm = v.norm();
    if norm > 0.0 && norm.is_finite() {
        v * (mag / norm)
    } else {
        Vector2::zeros()
    }
}

/// `v` shortened to at most `max`.
#[inline]
pub fn limit_magnitude(v: Vector2<f64>, max: f64) -> Vector2<f64> {
    let norm = v.norm();
    if norm > max {
        v * (max / norm)
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn square(side: f64) -> Vec<Vector2<f64>> {
        vec![
            vector![0.0, 0.0],
            vector![side, 0.0],
            vector![side, side],
            vector![0.0, side],
        ]
    }

    #[test]
    fn orientation_signs() {
        let a = vector![0.0, 0.0];
        let b = vector![1.0, 0.0];
        assert_eq!(orientation(a, b, vector![1.0, 1.0]), Orientation::CounterClockwise);
        assert_eq!(orientation(a, b, vector![1.0, -1.0]), Orientation::Clockwise);
        assert_eq!(orientation(a, b, vector![5.0, 0.0]), Orientation::Collinear);
        assert_eq!(Orientation::Clockwise.signum(), 1);
        assert_eq!(Orientation::Collinear.signum(), 0);
    }

    #[test]
    fn crossing_and_disjoint_segments() {
        // X shape
        assert!(segments_intersect(
            vector![0.0, 0.0],
            vector![10.0, 10.0],
            vector![0.0, 10.0],
            vector![10.0, 0.0]
        ));
        // parallel, apart
        assert!(!segments_intersect(
            vector![0.0, 0.0],
            vector![10.0, 0.0],
            vector![0.0, 1.0],
            vector![10.0, 1.0]
        ));
        // lines would cross, segments stop short
        assert!(!segments_intersect(
            vector![0.0, 0.0],
            vector![1.0, 1.0],
            vector![3.0, 0.0],
            vector![2.0, 1.0]
        ));
    }

    #[test]
    fn boundary_cases_count_as_intersecting() {
        // shared endpoint
        assert!(segments_intersect(
            vector![0.0, 0.0],
            vector![1.0, 1.0],
            vector![1.0, 1.0],
            vector![2.0, 0.0]
        ));
        // T-junction: q1 lies on p
        assert!(segments_intersect(
            vector![0.0, 0.0],
            vector![4.0, 0.0],
            vector![2.0, 0.0],
            vector![2.0, 3.0]
        ));
        // collinear overlap
        assert!(segments_intersect(
            vector![0.0, 0.0],
            vector![4.0, 0.0],
            vector![2.0, 0.0],
            vector![6.0, 0.0]
        ));
        // collinear, disjoint
        assert!(!segments_intersect(
            vector![0.0, 0.0],
            vector![1.0, 0.0],
            vector![2.0, 0.0],
            vector![3.0, 0.0]
        ));
    }

    #[test]
    fn point_in_square() {
        let sq = square(10.0);
        assert!(point_in_convex_polygon(vector![5.0, 5.0], &sq));
        assert!(point_in_convex_polygon(vector![0.5, 9.5], &sq));
        assert!(!point_in_convex_polygon(vector![-1.0, 5.0], &sq));
        assert!(!point_in_convex_polygon(vector![11.0, 5.0], &sq));
        assert!(!point_in_convex_polygon(vector![5.0, 12.0], &sq));
    }

    #[test]
    fn point_in_triangle_seeded() {
        let tri = vec![vector![0.0, 0.0], vector![8.0, 1.0], vector![3.0, 7.0]];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            // barycentric sample strictly inside
            let (mut u, mut v): (f64, f64) = (rng.gen_range(0.01..0.98), rng.gen_range(0.01..0.98));
            if u + v >= 0.99 {
                u = 0.99 - u;
                v = 0.99 - v;
            }
            let p = tri[0] + (tri[1] - tri[0]) * u + (tri[2] - tri[0]) * v;
            if (0..3).any(|k| (p.y - tri[k].y).abs() < 1e-9) {
                continue;
            }
            assert!(point_in_convex_polygon(p, &tri), "{p:?}");
        }
    }

    #[test]
    fn centroid_and_magnitudes() {
        let c = centroid(&square(2.0)).unwrap();
        assert!((c - vector![1.0, 1.0]).norm() < 1e-12);
        assert!(centroid(&[]).is_none());

        let v = with_magnitude(vector![3.0, 4.0], 10.0);
        assert!((v - vector![6.0, 8.0]).norm() < 1e-12);
        assert_eq!(with_magnitude(Vector2::zeros(), 5.0), Vector2::zeros());
        assert_eq!(limit_magnitude(vector![3.0, 4.0], 10.0), vector![3.0, 4.0]);
        assert!((limit_magnitude(vector![3.0, 4.0], 1.0).norm() - 1.0).abs() < 1e-12);
    }

    fn pt() -> impl Strategy<Value = Vector2<f64>> {
        // integer grid makes collinear and touching cases common
        (-6i32..6, -6i32..6).prop_map(|(x, y)| vector![x as f64, y as f64])
    }

    proptest! {
        #[test]
        fn intersection_is_symmetric(p1 in pt(), p2 in pt(), q1 in pt(), q2 in pt()) {
            let base = segments_intersect(p1, p2, q1, q2);
            prop_assert_eq!(base, segments_intersect(q1, q2, p1, p2));
            prop_assert_eq!(base, segments_intersect(p2, p1, q1, q2));
            prop_assert_eq!(base, segments_intersect(p1, p2, q2, q1));
        }

        #[test]
        fn degenerate_polygon_contains_nothing(
            p in pt(),
            verts in proptest::collection::vec(pt(), 0..3),
        ) {
            prop_assert!(!point_in_convex_polygon(p, &verts));
        }
    }
}
