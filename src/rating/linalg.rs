//! Dense linear systems for the Colley and Massey solvers
//!
//! Systems are built fresh per call and solved with Gaussian elimination and
//! partial pivoting. Solving never fails: a singular system is reported as
//! [`SolveOutcome::Singular`] and the caller picks the fallback.

use serde::{Deserialize, Serialize};

/// Relative pivot threshold below which the system is treated as singular
const PIVOT_EPSILON: f64 = 1e-12;

/// Result of attempting to solve a linear system
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Solved(Vec<f64>),
    Singular,
}

impl SolveOutcome {
    /// The solution, or `fallback` evaluated for a singular system
    pub fn unwrap_or_else(self, fallback: impl FnOnce() -> Vec<f64>) -> Vec<f64> {
        match self {
            SolveOutcome::Solved(x) => x,
            SolveOutcome::Singular => fallback(),
        }
    }

    pub fn is_singular(&self) -> bool {
        matches!(self, SolveOutcome::Singular)
    }
}

/// Square coefficient matrix (row-major) paired with a right-hand side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSystem {
    pub coefficients: Vec<Vec<f64>>,
    pub rhs: Vec<f64>,
}

impl LinearSystem {
    /// All-zero system of dimension `n`
    pub fn zeros(n: usize) -> Self {
        Self {
            coefficients: vec![vec![0.0; n]; n],
            rhs: vec![0.0; n],
        }
    }

    pub fn dimension(&self) -> usize {
        self.rhs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }

    /// Solve `coefficients * x = rhs`
    pub fn solve(&self) -> SolveOutcome {
        let n = self.dimension();
        if n == 0 {
            return SolveOutcome::Solved(Vec::new());
        }
        if self.coefficients.len() != n || self.coefficients.iter().any(|row| row.len() != n) {
            return SolveOutcome::Singular;
        }

        let scale = self
            .coefficients
            .iter()
            .flat_map(|row| row.iter())
            .fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if scale == 0.0 || !scale.is_finite() {
            return SolveOutcome::Singular;
        }
        let threshold = PIVOT_EPSILON * scale;

        // Augmented working copy
        let mut a: Vec<Vec<f64>> = self
            .coefficients
            .iter()
            .zip(&self.rhs)
            .map(|(row, b)| {
                let mut r = row.clone();
                r.push(*b);
                r
            })
            .collect();

        for col in 0..n {
            let pivot_row = (col..n)
                .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
                .unwrap_or(col);
            if a[pivot_row][col].abs() < threshold {
                return SolveOutcome::Singular;
            }
            a.swap(col, pivot_row);

            let pivot = a[col].clone();
            for row in a.iter_mut().skip(col + 1) {
                let factor = row[col] / pivot[col];
                if factor == 0.0 {
                    continue;
                }
                for (k, value) in row.iter_mut().enumerate().skip(col) {
                    *value -= factor * pivot[k];
                }
            }
        }

        let mut x = vec![0.0; n];
        for row in (0..n).rev() {
            let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
            x[row] = (a[row][n] - tail) / a[row][row];
        }

        if x.iter().all(|v| v.is_finite()) {
            SolveOutcome::Solved(x)
        } else {
            SolveOutcome::Singular
        }
    }
}
