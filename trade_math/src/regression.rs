//! Ordinary least squares trend fitting
//!
//! Fits `y = intercept + slope * x` over arbitrary abscissae (for example day
//! offsets from the first observation) and keeps the slope standard error
//! needed to widen trend extrapolations.

use crate::{MathError, Result};

/// Fitted linear trend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    slope: f64,
    /// Standard error of the slope estimate
    slope_std_error: f64,
    /// Coefficient of determination, `None` when `y` is constant
    r_squared: Option<f64>,
}

impl LinearTrend {
    /// Fit the trend on paired observations
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(MathError::InvalidInput(format!(
                "x and y lengths differ ({} vs {})",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(MathError::InsufficientData(
                "Need at least 2 points for linear regression".to_string(),
            ));
        }

        let n = x.len() as f64;
        let x_mean = x.iter().sum::<f64>() / n;
        let y_mean = y.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (&xi, &yi) in x.iter().zip(y) {
            numerator += (xi - x_mean) * (yi - y_mean);
            denominator += (xi - x_mean) * (xi - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;
        for (&xi, &yi) in x.iter().zip(y) {
            ss_total += (yi - y_mean).powi(2);
            ss_residual += (yi - (intercept + slope * xi)).powi(2);
        }

        let dof = (n - 2.0).max(1.0);
        let slope_std_error = (ss_residual / dof / denominator).sqrt();
        let r_squared = if ss_total.abs() < 1e-10 {
            None
        } else {
            Some(1.0 - ss_residual / ss_total)
        };

        Ok(Self {
            slope,
            slope_std_error,
            r_squared,
        })
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn slope_std_error(&self) -> f64 {
        self.slope_std_error
    }

    pub fn r_squared(&self) -> Option<f64> {
        self.r_squared
    }
}

/// Solve a small dense linear system `a * x = b` by Gaussian elimination with
/// partial pivoting. `a` is row-major and square.
pub fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(MathError::InvalidInput(
            "System matrix must be square and match the right-hand side".to_string(),
        ));
    }

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-12 {
            return Err(MathError::CalculationError(
                "Singular system matrix".to_string(),
            ));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    Ok(x)
}

/// Least squares fit of `y ~ X * beta` with an optional ridge penalty, solved
/// through the normal equations. Rows of `design` are observations.
pub fn least_squares(design: &[Vec<f64>], y: &[f64], ridge: f64) -> Result<Vec<f64>> {
    if design.len() != y.len() || design.is_empty() {
        return Err(MathError::InvalidInput(
            "Design matrix and targets must have the same non-zero length".to_string(),
        ));
    }
    let width = design[0].len();

    let mut xtx = vec![vec![0.0; width]; width];
    let mut xty = vec![0.0; width];
    for (row, &target) in design.iter().zip(y) {
        for i in 0..width {
            xty[i] += row[i] * target;
            for j in 0..width {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for (i, row) in xtx.iter_mut().enumerate() {
        row[i] += ridge;
    }

    solve_linear_system(xtx, xty)
}
