//! Gauss-Jordan elimination with partial pivoting for `A x = b`, where `A` may be rectangular
//! or rank deficient. The reduced row echelon form tells apart the three possible outcomes:
//! a unique solution, a family of solutions parametrised by the free columns, or no solution.
use log::debug;
use nalgebra::{DMatrix, DVector};

/// relative threshold under which a pivot is considered zero
const PIVOT_EPS: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub enum LinearResult {
    Unique(DVector<f64>),
    Infinite(LinearFamily),
    /// index of an (eliminated) row that reads `0 = c` with `c != 0`
    Inconsistent(usize),
}

/// x[pivot_columns[k]] = constants[k] - sum_j coefficients[k][j] * x[free_columns[j]]
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFamily {
    pub pivot_columns: Vec<usize>,
    pub free_columns: Vec<usize>,
    pub constants: Vec<f64>,
    pub coefficients: Vec<Vec<f64>>,
}

impl LinearFamily {
    pub fn rank(&self) -> usize {
        self.pivot_columns.len()
    }
}

/// Reduces the augmented matrix `[A | b]` in place and returns the pivot columns.
fn rref(m: &mut DMatrix<f64>, n_vars: usize, eps: f64) -> Vec<usize> {
    let rows = m.nrows();
    let mut pivot_columns = Vec::new();
    let mut row = 0;
    for col in 0..n_vars {
        if row == rows {
            break;
        }
        // partial pivoting
        let (best, best_val) = (row..rows)
            .map(|r| (r, m[(r, col)].abs()))
            .fold((row, -1.0), |acc, x| if x.1 > acc.1 { x } else { acc });
        if best_val <= eps {
            continue;
        }
        m.swap_rows(row, best);
        let pivot = m[(row, col)];
        for j in 0..m.ncols() {
            m[(row, j)] /= pivot;
        }
        for r in 0..rows {
            let factor = m[(r, col)];
            if r == row || factor == 0.0 {
                continue;
            }
            for j in 0..m.ncols() {
                let v = m[(row, j)];
                m[(r, j)] -= factor * v;
            }
        }
        pivot_columns.push(col);
        row += 1;
    }
    pivot_columns
}

/// Solves `a x = b`. `a` is `m x n`, `b` has `m` entries.
pub fn solve_linear_system(a: &DMatrix<f64>, b: &DVector<f64>) -> LinearResult {
    let n_vars = a.ncols();
    let mut m = DMatrix::zeros(a.nrows(), n_vars + 1);
    m.view_mut((0, 0), (a.nrows(), n_vars)).copy_from(a);
    m.set_column(n_vars, b);
    let scale = a.amax().max(b.amax()).max(1.0);
    let eps = PIVOT_EPS * scale;

    let pivot_columns = rref(&mut m, n_vars, eps);
    let rank = pivot_columns.len();
    debug!("linear system {}x{} has rank {}", a.nrows(), n_vars, rank);

    if let Some(row) = (rank..m.nrows()).find(|&r| m[(r, n_vars)].abs() > eps) {
        return LinearResult::Inconsistent(row);
    }

    if rank == n_vars {
        let mut x = DVector::zeros(n_vars);
        for (row, &col) in pivot_columns.iter().enumerate() {
            x[col] = m[(row, n_vars)];
        }
        return LinearResult::Unique(x);
    }

    let free_columns: Vec<usize> = (0..n_vars).filter(|c| !pivot_columns.contains(c)).collect();
    let constants = (0..rank).map(|row| m[(row, n_vars)]).collect();
    let coefficients = (0..rank)
        .map(|row| free_columns.iter().map(|&c| m[(row, c)]).collect())
        .collect();
    LinearResult::Infinite(LinearFamily {
        pivot_columns,
        free_columns,
        constants,
        coefficients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unique_solution() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, -1.0]);
        let b = DVector::from_vec(vec![10.0, 2.0]);
        match solve_linear_system(&a, &b) {
            LinearResult::Unique(x) => {
                assert_relative_eq!(x[0], 6.0, epsilon = 1e-12);
                assert_relative_eq!(x[1], 4.0, epsilon = 1e-12);
            }
            other => panic!("expected unique solution, got {:?}", other),
        }
    }

    #[test]
    fn test_pivoting_on_zero_diagonal() {
        let a = DMatrix::from_row_slice(2, 2, &[0.0, 2.0, 3.0, 0.0]);
        let b = DVector::from_vec(vec![4.0, 9.0]);
        assert_eq!(
            solve_linear_system(&a, &b),
            LinearResult::Unique(DVector::from_vec(vec![3.0, 2.0]))
        );
    }

    #[test]
    fn test_overdetermined_consistent() {
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 1.0, -1.0, 2.0, 0.0]);
        let b = DVector::from_vec(vec![10.0, 2.0, 12.0]);
        assert!(matches!(solve_linear_system(&a, &b), LinearResult::Unique(_)));
    }

    #[test]
    fn test_inconsistent() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 2.0, 2.0]);
        let b = DVector::from_vec(vec![1.0, 3.0]);
        assert!(matches!(solve_linear_system(&a, &b), LinearResult::Inconsistent(1)));
    }

    #[test]
    fn test_family() {
        // x + y + z = 6, y - z = 1
        let a = DMatrix::from_row_slice(2, 3, &[1.0, 1.0, 1.0, 0.0, 1.0, -1.0]);
        let b = DVector::from_vec(vec![6.0, 1.0]);
        let LinearResult::Infinite(family) = solve_linear_system(&a, &b) else {
            panic!("expected a family of solutions");
        };
        assert_eq!(family.rank(), 2);
        assert_eq!(family.pivot_columns, vec![0, 1]);
        assert_eq!(family.free_columns, vec![2]);
        // x = 5 - 2z, y = 1 + z
        assert_relative_eq!(family.constants[0], 5.0, epsilon = 1e-12);
        assert_relative_eq!(family.coefficients[0][0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(family.constants[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(family.coefficients[1][0], -1.0, epsilon = 1e-12);
    }
}
