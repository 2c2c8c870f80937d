pub mod artifacts;
mod features;
mod predictor;
mod regression;

pub use features::PolynomialFeatures;
pub use predictor::{PredictionInput, Predictor};
pub use regression::RegressionModel;
