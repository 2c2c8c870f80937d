use super::{PolynomialFeatures, RegressionModel};
use crate::{Error, Result};
use tracing::info;

/// Loads the two serialized artifacts produced by the offline training
/// script. Called once at startup; any failure here is fatal for the
/// process, so errors carry the offending path.
pub async fn load(
    model_path: &str,
    transformer_path: &str,
) -> Result<(RegressionModel, PolynomialFeatures)> {
    let model = read_json::<RegressionModel>(model_path).await?;
    let transformer = read_json::<PolynomialFeatures>(transformer_path).await?;
    transformer.validate()?;

    info!(
        "Loaded model artifacts: {} coefficients, degree {} over {} raw features",
        model.n_features(),
        transformer.degree(),
        transformer.n_input_features()
    );

    Ok((model, transformer))
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::artifact(format!("failed to read {}: {}", path, e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| Error::artifact(format!("failed to decode {}: {}", path, e)))
}
