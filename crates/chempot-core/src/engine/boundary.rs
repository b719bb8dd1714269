use super::vertices::Point;
use crate::core::utils::geometry::{
    PlanarPca, Point2, convex_hull_2d, nearest_point_index, polygon_centroid,
    unique_point_indices,
};
use crate::core::utils::linalg::euclidean_distance;
use serde::Serialize;

/// Vertices closer than this are merged before the boundary is computed.
pub const DEDUP_TOLERANCE: f64 = 1e-4;

/// Closed boundary of a domain face and its label anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainBoundary {
    /// Boundary edges as pairs of indices into the input point list. For a proper
    /// polygon the edges form one closed cycle; a segment has a single edge and a
    /// lone point has none.
    pub simplexes: Vec<[usize; 2]>,
    /// Annotation anchor in the input space.
    pub ann_loc: Point,
}

/// Boundary edges and annotation anchor of a domain with three or more axes.
///
/// Duplicate vertices are merged, the remainder is projected onto its best-fit
/// plane by PCA, and the planar convex hull gives the boundary order. The anchor is
/// the hull polygon's area centroid lifted back into the full space. Hull vertices
/// are mapped back to input indices by nearest projected point.
pub fn domain_simplexes_and_ann_loc(points: &[Point]) -> DomainBoundary {
    let unique = unique_point_indices(points, DEDUP_TOLERANCE);

    match unique.len() {
        0 => {
            return DomainBoundary {
                simplexes: Vec::new(),
                ann_loc: Vec::new(),
            };
        }
        1 => {
            return DomainBoundary {
                simplexes: Vec::new(),
                ann_loc: points[unique[0]].clone(),
            };
        }
        2 => return segment_boundary(points, unique[0], unique[1]),
        _ => {}
    }

    let unique_points: Vec<Point> = unique.iter().map(|&i| points[i].clone()).collect();
    let pca = PlanarPca::fit(&unique_points);
    let projected: Vec<Point2> = unique_points.iter().map(|p| pca.project(p)).collect();
    let hull = convex_hull_2d(&projected);

    let hull_indices: Vec<usize> = hull
        .iter()
        .filter_map(|&vertex| nearest_point_index(&projected, vertex))
        .map(|i| unique[i])
        .collect();

    if hull_indices.len() < 3 {
        return match hull_indices.as_slice() {
            [a, b, ..] => segment_boundary(points, *a, *b),
            _ => farthest_pair_boundary(points, &unique),
        };
    }

    let simplexes = (0..hull_indices.len())
        .map(|k| [hull_indices[k], hull_indices[(k + 1) % hull_indices.len()]])
        .collect();
    let ann_loc = pca.lift(polygon_centroid(&hull));

    DomainBoundary { simplexes, ann_loc }
}

/// End points and midpoint anchor of a two-axis domain.
///
/// A domain in a two-axis diagram is a segment (or a point); its end points are
/// the farthest-apart pair of distinct vertices.
pub fn domain_line_and_ann_loc(points: &[Point]) -> DomainBoundary {
    let unique = unique_point_indices(points, DEDUP_TOLERANCE);
    match unique.len() {
        0 => DomainBoundary {
            simplexes: Vec::new(),
            ann_loc: Vec::new(),
        },
        1 => DomainBoundary {
            simplexes: Vec::new(),
            ann_loc: points[unique[0]].clone(),
        },
        _ => farthest_pair_boundary(points, &unique),
    }
}

fn farthest_pair_boundary(points: &[Point], candidates: &[usize]) -> DomainBoundary {
    let mut best = (candidates[0], candidates[0], f64::NEG_INFINITY);
    for (k, &i) in candidates.iter().enumerate() {
        for &j in &candidates[k + 1..] {
            let distance = euclidean_distance(&points[i], &points[j]);
            if distance > best.2 {
                best = (i, j, distance);
            }
        }
    }
    segment_boundary(points, best.0, best.1)
}

fn segment_boundary(points: &[Point], a: usize, b: usize) -> DomainBoundary {
    let ann_loc = points[a]
        .iter()
        .zip(&points[b])
        .map(|(x, y)| (x + y) / 2.0)
        .collect();
    DomainBoundary {
        simplexes: vec![[a, b]],
        ann_loc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const TOLERANCE: f64 = 1e-6;

    fn assert_point_approx_equal(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < TOLERANCE, "{:?} != {:?}", actual, expected);
        }
    }

    fn assert_single_closed_cycle(simplexes: &[[usize; 2]], num_points: usize) {
        let mut degree: HashMap<usize, usize> = HashMap::new();
        for &[a, b] in simplexes {
            assert!(a < num_points && b < num_points);
            assert_ne!(a, b);
            *degree.entry(a).or_default() += 1;
            *degree.entry(b).or_default() += 1;
        }
        assert!(degree.values().all(|&d| d == 2));

        let mut current = simplexes[0][1];
        let mut steps = 1;
        while current != simplexes[0][0] {
            let next = simplexes.iter().find(|s| s[0] == current).unwrap();
            current = next[1];
            steps += 1;
            assert!(steps <= simplexes.len());
        }
        assert_eq!(steps, simplexes.len());
    }

    /// Tests whether `p` lies in the triangle `abc` using barycentric coordinates.
    fn in_triangle(p: &[f64], a: &[f64], b: &[f64], c: &[f64]) -> bool {
        let v0: Vec<f64> = (0..3).map(|i| c[i] - a[i]).collect();
        let v1: Vec<f64> = (0..3).map(|i| b[i] - a[i]).collect();
        let v2: Vec<f64> = (0..3).map(|i| p[i] - a[i]).collect();
        let d = |x: &[f64], y: &[f64]| x.iter().zip(y).map(|(a, b)| a * b).sum::<f64>();
        let (d00, d01, d02, d11, d12) = (d(&v0, &v0), d(&v0, &v1), d(&v0, &v2), d(&v1, &v1), d(&v1, &v2));
        let inv = 1.0 / (d00 * d11 - d01 * d01);
        let u = (d11 * d02 - d01 * d12) * inv;
        let v = (d00 * d12 - d01 * d02) * inv;
        u >= -TOLERANCE && v >= -TOLERANCE && u + v <= 1.0 + TOLERANCE
    }

    #[test]
    fn triangle_face_yields_closed_cycle_and_centroid_anchor() {
        let points = vec![
            vec![-3.0, 0.0, 0.0],
            vec![0.0, -3.0, 0.0],
            vec![0.0, 0.0, -3.0],
        ];
        let boundary = domain_simplexes_and_ann_loc(&points);
        assert_eq!(boundary.simplexes.len(), 3);
        assert_single_closed_cycle(&boundary.simplexes, points.len());
        assert_point_approx_equal(&boundary.ann_loc, &[-1.0, -1.0, -1.0]);
    }

    #[test]
    fn duplicated_vertices_map_to_first_occurrence() {
        let points = vec![
            vec![0.0, 0.0, -3.0],
            vec![-3.0, 0.0, 0.0],
            vec![0.0, 0.0, -3.0],
            vec![0.0, -3.0, 0.0],
            vec![-3.0, 0.0, 0.00001],
        ];
        let boundary = domain_simplexes_and_ann_loc(&points);
        assert_eq!(boundary.simplexes.len(), 3);
        assert_single_closed_cycle(&boundary.simplexes, points.len());
        let used: Vec<usize> = boundary.simplexes.iter().map(|s| s[0]).collect();
        assert!(used.contains(&0) && used.contains(&1) && used.contains(&3));
    }

    #[test]
    fn quadrilateral_face_excludes_interior_points_from_boundary() {
        // Square in the plane z = -2 with an interior point.
        let points = vec![
            vec![0.0, 0.0, -2.0],
            vec![-4.0, 0.0, -2.0],
            vec![-4.0, -4.0, -2.0],
            vec![0.0, -4.0, -2.0],
            vec![-1.0, -2.0, -2.0],
        ];
        let boundary = domain_simplexes_and_ann_loc(&points);
        assert_eq!(boundary.simplexes.len(), 4);
        assert_single_closed_cycle(&boundary.simplexes, points.len());
        assert!(boundary.simplexes.iter().all(|s| s[0] != 4 && s[1] != 4));
        assert_point_approx_equal(&boundary.ann_loc, &[-2.0, -2.0, -2.0]);
    }

    #[test]
    fn anchor_lies_inside_hull_of_irregular_face() {
        let points = vec![
            vec![0.0, -1.0, -5.0],
            vec![-6.0, 0.0, -0.5],
            vec![-1.0, -7.0, 0.0],
        ];
        let boundary = domain_simplexes_and_ann_loc(&points);
        assert_single_closed_cycle(&boundary.simplexes, points.len());
        assert!(in_triangle(
            &boundary.ann_loc,
            &points[0],
            &points[1],
            &points[2]
        ));
    }

    #[test]
    fn degenerate_inputs_return_point_or_segment() {
        let single = domain_simplexes_and_ann_loc(&[vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]]);
        assert!(single.simplexes.is_empty());
        assert_point_approx_equal(&single.ann_loc, &[1.0, 2.0, 3.0]);

        let segment = domain_simplexes_and_ann_loc(&[vec![0.0, 0.0, 0.0], vec![2.0, 4.0, 6.0]]);
        assert_eq!(segment.simplexes, vec![[0, 1]]);
        assert_point_approx_equal(&segment.ann_loc, &[1.0, 2.0, 3.0]);

        let empty = domain_simplexes_and_ann_loc(&[]);
        assert!(empty.simplexes.is_empty() && empty.ann_loc.is_empty());
    }

    #[test]
    fn collinear_points_collapse_to_their_extreme_segment() {
        let points = vec![
            vec![0.0, 0.0, 0.0],
            vec![1.0, 1.0, 1.0],
            vec![2.0, 2.0, 2.0],
        ];
        let boundary = domain_simplexes_and_ann_loc(&points);
        assert_eq!(boundary.simplexes.len(), 1);
        let [a, b] = boundary.simplexes[0];
        let mut ends = [a, b];
        ends.sort();
        assert_eq!(ends, [0, 2]);
        assert_point_approx_equal(&boundary.ann_loc, &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn two_axis_line_uses_extreme_vertices() {
        let points = vec![
            vec![0.0, -4.0],
            vec![-4.0, 0.0],
            vec![0.0, -4.0],
            vec![-2.0, -2.0],
        ];
        let line = domain_line_and_ann_loc(&points);
        assert_eq!(line.simplexes, vec![[0, 1]]);
        assert_point_approx_equal(&line.ann_loc, &[-2.0, -2.0]);
    }
}
