use serde::Deserialize;

use super::repo_types::ProfileFields;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub telegram_id: Option<String>,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

impl ProfileFields {
    /// Checks every field that is present against the profile schema.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(age) = self.age {
            if !(1..=120).contains(&age) {
                return Err(AppError::validation("age must be between 1 and 120"));
            }
        }
        for (field, value) in [
            ("weight", self.weight_kg),
            ("height", self.height_cm),
            ("budget", self.daily_budget),
        ] {
            if let Some(v) = value {
                if !(v.is_finite() && v > 0.0) {
                    return Err(AppError::validation(format!("{field} must be positive")));
                }
            }
        }
        Ok(())
    }
}
