//! Pairwise Pearson correlation between the measurement columns.

use crate::stats::pearson;
use aqdash_common::{AqError, Dataset, Result, Variable};
use serde::Serialize;
use tracing::debug;

/// Square matrix of correlations, rows and columns in `variables` order.
///
/// Entries are `None` where fewer than two rows have both values or one side
/// is constant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    variables: Vec<Variable>,
    values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Builds a matrix; `values` must be `n x n` for `n` variables.
    pub fn new(variables: Vec<Variable>, values: Vec<Vec<Option<f64>>>) -> Result<Self> {
        let n = variables.len();
        if values.len() != n || values.iter().any(|row| row.len() != n) {
            return Err(AqError::analysis(format!(
                "correlation matrix must be {n}x{n} for {n} variables"
            )));
        }
        Ok(Self { variables, values })
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Rows in `variables` order.
    pub fn values(&self) -> &[Vec<Option<f64>>] {
        &self.values
    }

    pub fn size(&self) -> usize {
        self.variables.len()
    }

    fn at(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j)).copied().flatten()
    }

    pub fn get(&self, a: Variable, b: Variable) -> Option<f64> {
        let i = self.variables.iter().position(|v| *v == a)?;
        let j = self.variables.iter().position(|v| *v == b)?;
        self.at(i, j)
    }

    pub fn labels(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.column().to_string()).collect()
    }

    /// Whether `m[i][j]` and `m[j][i]` agree within `tolerance` everywhere.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let n = self.size();
        (0..n).all(|i| {
            (0..n).all(|j| match (self.at(i, j), self.at(j, i)) {
                (Some(a), Some(b)) => (a - b).abs() <= tolerance,
                (None, None) => true,
                _ => false,
            })
        })
    }

    /// Smallest and largest defined coefficient.
    pub fn range(&self) -> Option<(f64, f64)> {
        let defined = self.values.iter().flatten().flatten().copied();
        defined.fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Correlates every pair of [`Variable::ALL`] using pairwise deletion.
pub fn correlation_matrix(dataset: &Dataset) -> Result<CorrelationMatrix> {
    correlation_matrix_for(dataset, &Variable::ALL)
}

/// Correlates the given columns only.
pub fn correlation_matrix_for(dataset: &Dataset, variables: &[Variable]) -> Result<CorrelationMatrix> {
    if dataset.is_empty() {
        return Err(AqError::insufficient_data("correlation needs readings", 2, 0));
    }

    let n = variables.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let (a, b) = (variables[i], variables[j]);
            let r = pearson(dataset.readings().iter().map(|r| (r.value(a), r.value(b))));
            let r = if i == j { r.map(|_| 1.0) } else { r };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    debug!(variables = n, "Computed correlation matrix");
    CorrelationMatrix::new(variables.to_vec(), values)
}
