use crate::model::PredictionInput;
use crate::store::{User, UserPatch};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub age: Option<u32>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name must not be empty"));
        }
        validate_email(&self.email)
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(Error::validation("name must not be empty"));
            }
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }

    pub fn into_patch(self) -> UserPatch {
        UserPatch {
            name: self.name,
            email: self.email,
            age: self.age,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: Option<u32>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            age: user.age,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PredictRequest {
    pub age: u32,
    pub bmi: f64,
    pub children: u32,
    pub smoker: bool,
}

impl PredictRequest {
    /// Bounds-checks the request before it reaches the predictor.
    pub fn validate(&self) -> Result<()> {
        if self.age > 120 {
            return Err(Error::validation("age must be between 0 and 120"));
        }
        if !self.bmi.is_finite() || self.bmi < 0.0 || self.bmi > 100.0 {
            return Err(Error::validation("bmi must be between 0 and 100"));
        }
        Ok(())
    }

    pub fn into_input(self) -> PredictionInput {
        PredictionInput {
            age: self.age,
            bmi: self.bmi,
            children: self.children,
            smoker: self.smoker,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub cost_prediction: f64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn validate_email(email: &str) -> Result<()> {
    if !email_address::EmailAddress::is_valid(email) {
        return Err(Error::validation(format!("malformed email: {}", email)));
    }
    Ok(())
}
