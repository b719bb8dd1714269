use super::linalg::euclidean_distance;
use nalgebra::{DMatrix, DVector};

/// Fixed iteration count of the power method; there is no convergence check.
pub const PCA_POWER_ITERATIONS: usize = 100;

/// Signed polygon areas below this fall back to the vertex mean.
const DEGENERATE_AREA: f64 = 1e-12;

const ZERO_NORM: f64 = 1e-300;

pub type Point2 = [f64; 2];

/// Indices of the first occurrence of every distinct point.
///
/// Two points are the same if their Euclidean distance is below `tolerance`.
/// Comparison is pairwise against the points kept so far.
pub fn unique_point_indices(points: &[Vec<f64>], tolerance: f64) -> Vec<usize> {
    let mut kept: Vec<usize> = Vec::new();
    for (i, point) in points.iter().enumerate() {
        if !kept
            .iter()
            .any(|&k| euclidean_distance(&points[k], point) < tolerance)
        {
            kept.push(i);
        }
    }
    kept
}

/// Two-component principal component basis, found by power iteration with deflation.
#[derive(Debug, Clone)]
pub struct PlanarPca {
    mean: DVector<f64>,
    axes: [DVector<f64>; 2],
}

impl PlanarPca {
    /// Fits the best-fit plane through `points`.
    ///
    /// Every point must have the same length, and that length must be at least 2.
    /// Nearly collinear or duplicated point sets converge poorly within the fixed
    /// iteration budget; the returned axes are still orthonormal.
    pub fn fit(points: &[Vec<f64>]) -> Self {
        let dim = points.first().map_or(0, Vec::len);
        let n = points.len().max(1) as f64;

        let mut mean = DVector::zeros(dim);
        for point in points {
            mean += DVector::from_column_slice(point);
        }
        mean /= n;

        let mut covariance = DMatrix::zeros(dim, dim);
        for point in points {
            let centred = DVector::from_column_slice(point) - &mean;
            covariance += &centred * centred.transpose();
        }
        covariance /= n;

        let first = power_iteration(&covariance, &[]);
        let eigenvalue = first.dot(&(&covariance * &first));
        let deflated = &covariance - eigenvalue * &first * first.transpose();
        let second = power_iteration(&deflated, std::slice::from_ref(&first));

        Self {
            mean,
            axes: [first, second],
        }
    }

    pub fn project(&self, point: &[f64]) -> Point2 {
        let centred = DVector::from_column_slice(point) - &self.mean;
        [self.axes[0].dot(&centred), self.axes[1].dot(&centred)]
    }

    /// Maps planar coordinates back into the original space.
    pub fn lift(&self, point: Point2) -> Vec<f64> {
        let lifted = &self.mean + &self.axes[0] * point[0] + &self.axes[1] * point[1];
        lifted.iter().copied().collect()
    }
}

fn power_iteration(matrix: &DMatrix<f64>, orthogonal_to: &[DVector<f64>]) -> DVector<f64> {
    let dim = matrix.nrows();
    let mut v = DVector::from_fn(dim, |i, _| 1.0 / (i as f64 + 1.0));
    orthogonalize(&mut v, orthogonal_to);
    if v.norm() < ZERO_NORM {
        return fallback_axis(dim, orthogonal_to);
    }
    v.normalize_mut();

    for _ in 0..PCA_POWER_ITERATIONS {
        let next = matrix * &v;
        let norm = next.norm();
        if norm < ZERO_NORM {
            break;
        }
        v = next / norm;
    }

    orthogonalize(&mut v, orthogonal_to);
    if v.norm() < ZERO_NORM {
        return fallback_axis(dim, orthogonal_to);
    }
    v.normalize()
}

fn orthogonalize(v: &mut DVector<f64>, basis: &[DVector<f64>]) {
    for b in basis {
        let projection = b.dot(v);
        *v -= b * projection;
    }
}

/// The coordinate axis with the largest component orthogonal to `basis`.
fn fallback_axis(dim: usize, basis: &[DVector<f64>]) -> DVector<f64> {
    (0..dim)
        .map(|i| {
            let mut axis = DVector::zeros(dim);
            axis[i] = 1.0;
            orthogonalize(&mut axis, basis);
            axis
        })
        .max_by(|a, b| a.norm().total_cmp(&b.norm()))
        .map(|axis| axis.normalize())
        .unwrap_or_else(|| DVector::zeros(dim))
}

fn cross(o: Point2, a: Point2, b: Point2) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Counter-clockwise convex hull of planar points (monotone chain).
///
/// Collinear boundary points are dropped. Fewer than three input points, or a
/// fully collinear input, yield at most two hull vertices.
pub fn convex_hull_2d(points: &[Point2]) -> Vec<Point2> {
    let mut sorted: Vec<Point2> = points.to_vec();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    let mut lower: Vec<Point2> = Vec::with_capacity(sorted.len());
    for &p in &sorted {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point2> = Vec::with_capacity(sorted.len());
    for &p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Area centroid of a simple polygon given in boundary order.
///
/// Uses the shoelace-weighted formula, falling back to the arithmetic mean of the
/// vertices when the signed area is ~0.
pub fn polygon_centroid(polygon: &[Point2]) -> Point2 {
    if polygon.is_empty() {
        return [0.0, 0.0];
    }
    let mut twice_area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..polygon.len() {
        let [x0, y0] = polygon[i];
        let [x1, y1] = polygon[(i + 1) % polygon.len()];
        let w = x0 * y1 - x1 * y0;
        twice_area += w;
        cx += (x0 + x1) * w;
        cy += (y0 + y1) * w;
    }

    if (twice_area / 2.0).abs() < DEGENERATE_AREA {
        let n = polygon.len() as f64;
        let sx: f64 = polygon.iter().map(|p| p[0]).sum();
        let sy: f64 = polygon.iter().map(|p| p[1]).sum();
        return [sx / n, sy / n];
    }

    [cx / (3.0 * twice_area), cy / (3.0 * twice_area)]
}

/// Index of the point in `candidates` nearest to `target`.
pub fn nearest_point_index(candidates: &[Point2], target: Point2) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .map(|(i, p)| (i, (p[0] - target[0]).powi(2) + (p[1] - target[1]).powi(2)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn unique_point_indices_keeps_first_occurrences() {
        let points = vec![
            vec![0.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.00001],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 2.0, 0.0],
        ];
        assert_eq!(unique_point_indices(&points, 1e-4), vec![0, 1, 4]);
    }

    #[test]
    fn hull_of_square_with_interior_and_edge_points() {
        let points = [
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
            [0.5, 0.5],
            [0.5, 0.0],
        ];
        let hull = convex_hull_2d(&points);
        assert_eq!(hull, vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    }

    #[test]
    fn hull_of_collinear_points_is_a_segment() {
        let hull = convex_hull_2d(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]);
        assert_eq!(hull, vec![[0.0, 0.0], [2.0, 2.0]]);
    }

    #[test]
    fn centroid_of_triangle_is_vertex_mean() {
        let c = polygon_centroid(&[[0.0, 0.0], [3.0, 0.0], [0.0, 3.0]]);
        assert!(f64_approx_equal(c[0], 1.0));
        assert!(f64_approx_equal(c[1], 1.0));
    }

    #[test]
    fn centroid_is_area_weighted_not_vertex_weighted() {
        // Pentagon with clustered vertices on one side: vertex mean differs from area centroid.
        let polygon = [[0.0, 0.0], [4.0, 0.0], [4.0, 1.0], [4.0, 2.0], [0.0, 2.0]];
        let c = polygon_centroid(&polygon);
        assert!(f64_approx_equal(c[0], 2.0));
        assert!(f64_approx_equal(c[1], 1.0));
    }

    #[test]
    fn centroid_of_degenerate_polygon_falls_back_to_mean() {
        let c = polygon_centroid(&[[0.0, 0.0], [2.0, 0.0], [4.0, 0.0]]);
        assert!(f64_approx_equal(c[0], 2.0));
        assert!(f64_approx_equal(c[1], 0.0));
    }

    #[test]
    fn pca_recovers_plane_of_tilted_points() {
        // Points on the plane x + y + z = -3.
        let points = vec![
            vec![-3.0, 0.0, 0.0],
            vec![0.0, -3.0, 0.0],
            vec![0.0, 0.0, -3.0],
            vec![-1.0, -1.0, -1.0],
        ];
        let pca = PlanarPca::fit(&points);
        for point in &points {
            let lifted = pca.lift(pca.project(point));
            for (a, b) in lifted.iter().zip(point) {
                assert!((a - b).abs() < 1e-6, "{:?} vs {:?}", lifted, point);
            }
        }
    }

    #[test]
    fn pca_axes_are_orthonormal_even_for_collinear_points() {
        let points = vec![vec![0.0, 0.0, 0.0], vec![1.0, 1.0, 0.0], vec![2.0, 2.0, 0.0]];
        let pca = PlanarPca::fit(&points);
        assert!(f64_approx_equal(pca.axes[0].norm(), 1.0));
        assert!(f64_approx_equal(pca.axes[1].norm(), 1.0));
        assert!(pca.axes[0].dot(&pca.axes[1]).abs() < 1e-9);
    }

    #[test]
    fn nearest_point_index_picks_closest_candidate() {
        let candidates = [[0.0, 0.0], [1.0, 1.0], [5.0, 5.0]];
        assert_eq!(nearest_point_index(&candidates, [0.9, 1.2]), Some(1));
        assert_eq!(nearest_point_index(&[], [0.0, 0.0]), None);
    }
}
