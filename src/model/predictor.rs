use super::{PolynomialFeatures, RegressionModel};
use crate::{Error, Result};
use tracing::debug;

/// Raw features for a single cost prediction, already bounds-checked by the
/// HTTP layer.
#[derive(Debug, Clone, Copy)]
pub struct PredictionInput {
    pub age: u32,
    pub bmi: f64,
    pub children: u32,
    pub smoker: bool,
}

/// The full inference pipeline: fixed-order raw row, polynomial expansion,
/// then the fitted linear model. Immutable once constructed and shared
/// read-only across requests.
pub struct Predictor {
    model: RegressionModel,
    transformer: PolynomialFeatures,
}

impl Predictor {
    /// Pairs a fitted model with its transformer, rejecting artifact pairs
    /// whose widths disagree so a mismatch fails at startup rather than on
    /// the first request.
    pub fn new(model: RegressionModel, transformer: PolynomialFeatures) -> Result<Self> {
        if model.n_features() != transformer.n_output_features() {
            return Err(Error::ShapeMismatch {
                expected: transformer.n_output_features(),
                actual: model.n_features(),
            });
        }

        Ok(Self { model, transformer })
    }

    /// Predicts the insurance cost for one input.
    ///
    /// The raw row order (age, bmi, children, smoker-as-0/1) is the order
    /// the model was trained on and must never change independently of the
    /// artifacts. The output is the model's raw estimate; negative values
    /// are passed through unclamped.
    pub fn predict(&self, input: &PredictionInput) -> Result<f64> {
        let raw = [
            f64::from(input.age),
            input.bmi,
            f64::from(input.children),
            if input.smoker { 1.0 } else { 0.0 },
        ];

        let expanded = self.transformer.transform(&raw)?;
        let prediction = self.model.predict(&expanded)?;

        debug!(
            "Predicted cost {:.2} for age={} bmi={} children={} smoker={}",
            prediction, input.age, input.bmi, input.children, input.smoker
        );

        Ok(prediction)
    }
}
