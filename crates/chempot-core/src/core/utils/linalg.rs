use nalgebra::{DMatrix, DVector};

/// Systems whose determinant magnitude falls below this are treated as singular.
pub const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Square-system solve strategy, selected from the system dimension.
///
/// Two- and three-dimensional systems use closed forms; everything else goes
/// through an LU factorization. All strategies share [`SINGULAR_TOLERANCE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStrategy {
    Cramer2,
    Cofactor3,
    Lu,
}

impl SolveStrategy {
    pub fn for_dim(dim: usize) -> Self {
        match dim {
            2 => SolveStrategy::Cramer2,
            3 => SolveStrategy::Cofactor3,
            _ => SolveStrategy::Lu,
        }
    }

    /// Solves `rows · x = rhs`, where `rows[i]` is the i-th row of a square matrix.
    ///
    /// Returns `None` for singular systems. `rows` and `rhs` must have the length
    /// this strategy was selected for (any length for [`SolveStrategy::Lu`]).
    pub fn solve(self, rows: &[&[f64]], rhs: &[f64]) -> Option<Vec<f64>> {
        match self {
            SolveStrategy::Cramer2 => solve_cramer_2(rows, rhs),
            SolveStrategy::Cofactor3 => solve_cofactor_3(rows, rhs),
            SolveStrategy::Lu => solve_lu(rows, rhs),
        }
    }
}

fn solve_cramer_2(a: &[&[f64]], b: &[f64]) -> Option<Vec<f64>> {
    let det = a[0][0] * a[1][1] - a[0][1] * a[1][0];
    if det.abs() < SINGULAR_TOLERANCE {
        return None;
    }
    let x0 = (b[0] * a[1][1] - a[0][1] * b[1]) / det;
    let x1 = (a[0][0] * b[1] - b[0] * a[1][0]) / det;
    Some(vec![x0, x1])
}

fn solve_cofactor_3(a: &[&[f64]], b: &[f64]) -> Option<Vec<f64>> {
    let c00 = a[1][1] * a[2][2] - a[1][2] * a[2][1];
    let c01 = -(a[1][0] * a[2][2] - a[1][2] * a[2][0]);
    let c02 = a[1][0] * a[2][1] - a[1][1] * a[2][0];

    let det = a[0][0] * c00 + a[0][1] * c01 + a[0][2] * c02;
    if det.abs() < SINGULAR_TOLERANCE {
        return None;
    }

    let c10 = -(a[0][1] * a[2][2] - a[0][2] * a[2][1]);
    let c11 = a[0][0] * a[2][2] - a[0][2] * a[2][0];
    let c12 = -(a[0][0] * a[2][1] - a[0][1] * a[2][0]);
    let c20 = a[0][1] * a[1][2] - a[0][2] * a[1][1];
    let c21 = -(a[0][0] * a[1][2] - a[0][2] * a[1][0]);
    let c22 = a[0][0] * a[1][1] - a[0][1] * a[1][0];

    // x = adj(A) · b / det, with adj(A) the transposed cofactor matrix.
    let x0 = (c00 * b[0] + c10 * b[1] + c20 * b[2]) / det;
    let x1 = (c01 * b[0] + c11 * b[1] + c21 * b[2]) / det;
    let x2 = (c02 * b[0] + c12 * b[1] + c22 * b[2]) / det;
    Some(vec![x0, x1, x2])
}

fn solve_lu(a: &[&[f64]], b: &[f64]) -> Option<Vec<f64>> {
    let dim = b.len();
    let matrix = DMatrix::from_fn(dim, dim, |i, j| a[i][j]);
    let lu = matrix.lu();
    if lu.determinant().abs() < SINGULAR_TOLERANCE {
        return None;
    }
    lu.solve(&DVector::from_column_slice(b))
        .map(|x| x.iter().copied().collect())
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn assert_vec_approx_equal(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < TOLERANCE, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn strategy_is_selected_by_dimension() {
        assert_eq!(SolveStrategy::for_dim(2), SolveStrategy::Cramer2);
        assert_eq!(SolveStrategy::for_dim(3), SolveStrategy::Cofactor3);
        assert_eq!(SolveStrategy::for_dim(4), SolveStrategy::Lu);
        assert_eq!(SolveStrategy::for_dim(7), SolveStrategy::Lu);
    }

    #[test]
    fn cramer_solves_two_by_two_system() {
        let rows: [&[f64]; 2] = [&[2.0, 1.0], &[1.0, 3.0]];
        let x = SolveStrategy::Cramer2.solve(&rows, &[5.0, 10.0]).unwrap();
        assert_vec_approx_equal(&x, &[1.0, 3.0]);
    }

    #[test]
    fn cofactor_solves_three_by_three_system() {
        let rows: [&[f64]; 3] = [&[2.0, 1.0, -1.0], &[-3.0, -1.0, 2.0], &[-2.0, 1.0, 2.0]];
        let x = SolveStrategy::Cofactor3
            .solve(&rows, &[8.0, -11.0, -3.0])
            .unwrap();
        assert_vec_approx_equal(&x, &[2.0, 3.0, -1.0]);
    }

    #[test]
    fn closed_forms_agree_with_lu() {
        let rows: [&[f64]; 3] = [&[0.5, 0.25, 0.25], &[1.0, 0.0, 0.0], &[0.0, 0.0, -1.0]];
        let rhs = [1.5, -0.2, 4.0];
        let closed = SolveStrategy::Cofactor3.solve(&rows, &rhs).unwrap();
        let general = SolveStrategy::Lu.solve(&rows, &rhs).unwrap();
        assert_vec_approx_equal(&closed, &general);

        let rows: [&[f64]; 2] = [&[0.5, 0.5], &[-1.0, 0.0]];
        let closed = SolveStrategy::Cramer2.solve(&rows, &[-2.0, 50.0]).unwrap();
        let general = SolveStrategy::Lu.solve(&rows, &[-2.0, 50.0]).unwrap();
        assert_vec_approx_equal(&closed, &general);
    }

    #[test]
    fn lu_solves_four_by_four_system() {
        let rows: [&[f64]; 4] = [
            &[1.0, 0.0, 0.0, 0.0],
            &[0.0, 2.0, 0.0, 0.0],
            &[0.0, 0.0, 4.0, 0.0],
            &[0.25, 0.25, 0.25, 0.25],
        ];
        let x = SolveStrategy::Lu.solve(&rows, &[1.0, 4.0, 12.0, 2.0]).unwrap();
        assert_vec_approx_equal(&x, &[1.0, 2.0, 3.0, 2.0]);
    }

    #[test]
    fn singular_systems_are_rejected_on_every_path() {
        let rows2: [&[f64]; 2] = [&[1.0, 2.0], &[2.0, 4.0]];
        assert!(SolveStrategy::Cramer2.solve(&rows2, &[1.0, 2.0]).is_none());

        let rows3: [&[f64]; 3] = [&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0], &[1.0, 1.0, 0.0]];
        assert!(SolveStrategy::Cofactor3.solve(&rows3, &[1.0, 1.0, 2.0]).is_none());
        assert!(SolveStrategy::Lu.solve(&rows3, &[1.0, 1.0, 2.0]).is_none());
    }

    #[test]
    fn distance_and_dot_products() {
        assert!((dot(&[1.0, 2.0, 3.0], &[4.0, -5.0, 6.0]) - 12.0).abs() < TOLERANCE);
        assert!((euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < TOLERANCE);
    }
}
