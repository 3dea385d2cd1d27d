use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::{ActivityLevel, Gender, Goal, Profile};

/// User record. Profile columns stay empty until the form is filled in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub telegram_id: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
    pub daily_budget: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    /// Complete profile, if every field has been provided.
    pub fn profile(&self) -> Option<Profile> {
        Some(Profile {
            age: u32::try_from(self.age?).ok()?,
            gender: self.gender?,
            weight_kg: self.weight_kg?,
            height_cm: self.height_cm?,
            activity_level: self.activity_level?,
            goal: self.goal?,
            daily_budget: self.daily_budget?,
        })
    }
}

/// Profile columns as written by create/update. `None` leaves a column as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileFields {
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    #[serde(alias = "weight")]
    pub weight_kg: Option<f64>,
    #[serde(alias = "height")]
    pub height_cm: Option<f64>,
    #[serde(alias = "activity")]
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
    #[serde(alias = "budget")]
    pub daily_budget: Option<f64>,
}

impl From<&Profile> for ProfileFields {
    fn from(p: &Profile) -> Self {
        Self {
            age: i32::try_from(p.age).ok(),
            gender: Some(p.gender),
            weight_kg: Some(p.weight_kg),
            height_cm: Some(p.height_cm),
            activity_level: Some(p.activity_level),
            goal: Some(p.goal),
            daily_budget: Some(p.daily_budget),
        }
    }
}
