use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Fitted linear regression over an expanded feature row.
///
/// Coefficients and intercept are fixed at training time; inference is a
/// single dot product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionModel {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl RegressionModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    /// Number of expanded features the model was fit on.
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Applies the fitted model: `intercept + sum(coef_i * x_i)`.
    ///
    /// The row width must equal the coefficient count; anything else is a
    /// `ShapeMismatch`, not a silent truncation.
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            return Err(Error::ShapeMismatch {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }

        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();

        Ok(self.intercept + dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_predict_is_intercept_plus_dot_product() {
        let model = RegressionModel::new(vec![2.0, -1.0, 0.5], 10.0);
        let prediction = model.predict(&[3.0, 4.0, 2.0]).unwrap();
        assert_eq!(prediction, 10.0 + 6.0 - 4.0 + 1.0);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let model = RegressionModel::new(vec![0.1, 0.2, 0.3, 0.4], -2.5);
        let row = [1.1, 2.2, 3.3, 4.4];
        let first = model.predict(&row).unwrap();
        let second = model.predict(&row).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_negative_predictions_pass_through() {
        let model = RegressionModel::new(vec![-100.0], 5.0);
        let prediction = model.predict(&[1.0]).unwrap();
        assert_eq!(prediction, -95.0);
    }

    #[test]
    fn test_shape_mismatch_on_wrong_width() {
        let model = RegressionModel::new(vec![1.0, 2.0, 3.0], 0.0);
        assert!(matches!(
            model.predict(&[1.0, 2.0]),
            Err(Error::ShapeMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert!(matches!(
            model.predict(&[1.0, 2.0, 3.0, 4.0]),
            Err(Error::ShapeMismatch {
                expected: 3,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_empty_model_predicts_intercept() {
        let model = RegressionModel::new(vec![], 42.0);
        assert_eq!(model.predict(&[]).unwrap(), 42.0);
    }
}
