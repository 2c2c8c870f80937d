use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Polynomial feature expansion fitted offline and loaded as an artifact.
///
/// Expands a raw feature row into all monomials up to `degree`, bias term
/// and cross-terms included. The exponent table is stored explicitly so the
/// serving path reproduces the exact basis the model was trained against:
/// for each output feature, `powers[i][j]` is the exponent of input feature
/// `j` in output term `i`.
///
/// Term ordering matches the training-time transformer: degree blocks in
/// ascending order, each block enumerated as combinations with replacement
/// over the input features. For two features `a, b` at degree 2 this yields
/// `[1, a, b, a^2, ab, b^2]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolynomialFeatures {
    degree: u32,
    n_input_features: usize,
    powers: Vec<Vec<u32>>,
}

impl PolynomialFeatures {
    /// Builds the expansion for `n_input_features` raw features up to
    /// `degree`, generating the exponent table in training order.
    pub fn new(n_input_features: usize, degree: u32) -> Self {
        let mut powers = Vec::new();
        let mut current = vec![0u32; n_input_features];
        for total in 0..=degree {
            push_terms(n_input_features, total, 0, &mut current, &mut powers);
        }

        Self {
            degree,
            n_input_features,
            powers,
        }
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn n_input_features(&self) -> usize {
        self.n_input_features
    }

    /// Width of the expanded row: C(K + D, D) for K inputs at degree D.
    pub fn n_output_features(&self) -> usize {
        self.powers.len()
    }

    /// Expands a single raw feature row.
    ///
    /// Pure and deterministic. Fails with `ShapeMismatch` when the row width
    /// differs from the fitted input width; never truncates or pads.
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.n_input_features {
            return Err(Error::ShapeMismatch {
                expected: self.n_input_features,
                actual: row.len(),
            });
        }

        let expanded = self
            .powers
            .iter()
            .map(|exponents| {
                exponents
                    .iter()
                    .zip(row)
                    .map(|(&p, &x)| x.powi(p as i32))
                    .product()
            })
            .collect();

        Ok(expanded)
    }

    /// Checks that the stored exponent table is internally consistent.
    /// Run once at artifact-load time.
    pub fn validate(&self) -> Result<()> {
        for (i, exponents) in self.powers.iter().enumerate() {
            if exponents.len() != self.n_input_features {
                return Err(Error::artifact(format!(
                    "transformer term {} has {} exponents, expected {}",
                    i,
                    exponents.len(),
                    self.n_input_features
                )));
            }
            let total: u32 = exponents.iter().sum();
            if total > self.degree {
                return Err(Error::artifact(format!(
                    "transformer term {} has total degree {} above the fitted degree {}",
                    i, total, self.degree
                )));
            }
        }
        Ok(())
    }
}

// Combinations with replacement over feature indices, recursing from `start`
// to keep each degree block in lexicographic order.
fn push_terms(
    n_features: usize,
    remaining: u32,
    start: usize,
    current: &mut Vec<u32>,
    out: &mut Vec<Vec<u32>>,
) {
    if remaining == 0 {
        out.push(current.clone());
        return;
    }
    for i in start..n_features {
        current[i] += 1;
        push_terms(n_features, remaining - 1, i, current, out);
        current[i] -= 1;
    }
}
