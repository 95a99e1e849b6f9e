//! Vector and point helpers for axis-excluded and tangent-frame geometry.
//!
//! These are the leaf math routines the grouping and repositioning operations
//! are built on: distances that ignore one coordinate axis, flattening onto a
//! reference point, centroids, and the local tangent/perpendicular frame used
//! by orthogonal equalization.
//!
//! Direction-valued helpers return `None` instead of a direction when the
//! geometry degenerates (coincident points, an offset parallel to the
//! tangent). Callers treat a `None` as a per-vertex skip.

use nalgebra::{Point3, Vector3};

/// A coordinate axis to exclude from a distance or flattening computation.
///
/// The excluded axis is exempt; the other two axes are the ones actually
/// compared or averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    /// Exclude the X axis (compare/average Y and Z).
    #[default]
    X,
    /// Exclude the Y axis (compare/average X and Z).
    Y,
    /// Exclude the Z axis (compare/average X and Y).
    Z,
}

impl Axis {
    /// Squared distance between two points over the two non-excluded axes.
    pub fn planar_distance_squared(self, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
        match self {
            Axis::X => (a.y - b.y).powi(2) + (a.z - b.z).powi(2),
            Axis::Y => (a.x - b.x).powi(2) + (a.z - b.z).powi(2),
            Axis::Z => (a.x - b.x).powi(2) + (a.y - b.y).powi(2),
        }
    }

    /// Project `point` onto `target` along the two non-excluded axes.
    ///
    /// The result takes `target`'s coordinates on the constrained axes and
    /// keeps `point`'s coordinate on the excluded axis.
    pub fn flatten(self, point: &Point3<f64>, target: &Point3<f64>) -> Point3<f64> {
        match self {
            Axis::X => Point3::new(point.x, target.y, target.z),
            Axis::Y => Point3::new(target.x, point.y, target.z),
            Axis::Z => Point3::new(target.x, target.y, point.z),
        }
    }
}

/// Arithmetic mean of a set of points, or `None` if the set is empty.
pub fn centroid<It>(points: It) -> Option<Point3<f64>>
where
    It: IntoIterator<Item = Point3<f64>>,
{
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(Point3::from(sum / count as f64))
    }
}

/// Estimate a unit tangent at `anchor` from its neighbor positions.
///
/// With a single neighbor the tangent is the anchor-to-neighbor direction.
/// With two or more, it is the direction between the first two neighbors,
/// which approximates the local curve direction when the anchor sits on a
/// vertex strip. Returns `None` when there are no neighbors or the chosen
/// points coincide.
pub fn tangent_direction(anchor: &Point3<f64>, neighbors: &[Point3<f64>]) -> Option<Vector3<f64>> {
    match neighbors {
        [] => None,
        [single] => (single - anchor).try_normalize(f64::EPSILON),
        [first, second, ..] => (second - first).try_normalize(f64::EPSILON),
    }
}

/// Unit direction of the component of `offset` perpendicular to `tangent`.
///
/// Computed as the double cross-product t x (offset x t), which stays in the
/// plane spanned by `offset` and `tangent`. Returns `None` when the offset is
/// parallel to the tangent (or either vector is zero), since no perpendicular
/// direction exists then.
pub fn perpendicular_direction(
    offset: &Vector3<f64>,
    tangent: &Vector3<f64>,
) -> Option<Vector3<f64>> {
    let rejected = tangent.cross(&offset.cross(tangent));
    rejected.try_normalize(f64::EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_planar_distance_excludes_axis() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(100.0, 3.0, 4.0);

        // X is excluded, so only the (3, 4) offset counts
        assert_relative_eq!(Axis::X.planar_distance_squared(&a, &b), 25.0);
        assert_relative_eq!(Axis::Y.planar_distance_squared(&a, &b), 100.0 * 100.0 + 16.0);
        assert_relative_eq!(Axis::Z.planar_distance_squared(&a, &b), 100.0 * 100.0 + 9.0);
    }

    #[test]
    fn test_flatten_keeps_excluded_coordinate() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let target = Point3::new(10.0, 20.0, 30.0);

        assert_eq!(Axis::X.flatten(&p, &target), Point3::new(1.0, 20.0, 30.0));
        assert_eq!(Axis::Y.flatten(&p, &target), Point3::new(10.0, 2.0, 30.0));
        assert_eq!(Axis::Z.flatten(&p, &target), Point3::new(10.0, 20.0, 3.0));
    }

    #[test]
    fn test_centroid() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 3.0, 0.0),
        ];
        let c = centroid(points).unwrap();
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 1.0);
        assert_relative_eq!(c.z, 0.0);

        assert!(centroid(std::iter::empty()).is_none());
    }

    #[test]
    fn test_tangent_single_neighbor() {
        let anchor = Point3::new(0.0, 0.0, 0.0);
        let neighbors = [Point3::new(0.0, 2.0, 0.0)];
        let t = tangent_direction(&anchor, &neighbors).unwrap();
        assert_relative_eq!(t.y, 1.0);
        assert_relative_eq!(t.norm(), 1.0);
    }

    #[test]
    fn test_tangent_two_neighbors() {
        let anchor = Point3::new(0.0, 0.0, 0.0);
        let neighbors = [
            Point3::new(-1.0, 0.5, 0.0),
            Point3::new(1.0, 0.5, 0.0),
            Point3::new(9.0, 9.0, 9.0), // further neighbors are ignored
        ];
        let t = tangent_direction(&anchor, &neighbors).unwrap();
        assert_relative_eq!(t.x, 1.0);
        assert_relative_eq!(t.y, 0.0);
    }

    #[test]
    fn test_tangent_degenerate() {
        let anchor = Point3::new(1.0, 1.0, 1.0);
        assert!(tangent_direction(&anchor, &[]).is_none());
        assert!(tangent_direction(&anchor, &[anchor]).is_none());
        let twice = [Point3::new(2.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)];
        assert!(tangent_direction(&anchor, &twice).is_none());
    }

    #[test]
    fn test_perpendicular_direction() {
        let tangent = Vector3::new(1.0, 0.0, 0.0);
        let offset = Vector3::new(3.0, 4.0, 0.0);
        let perp = perpendicular_direction(&offset, &tangent).unwrap();

        assert_relative_eq!(perp.dot(&tangent), 0.0, epsilon = 1e-12);
        assert_relative_eq!(perp.norm(), 1.0, epsilon = 1e-12);
        // Stays in the offset/tangent plane and points toward the offset side
        assert_relative_eq!(perp.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_perpendicular_parallel_offset() {
        let tangent = Vector3::new(0.0, 0.0, 1.0);
        let offset = Vector3::new(0.0, 0.0, -5.0);
        assert!(perpendicular_direction(&offset, &tangent).is_none());
    }
}
