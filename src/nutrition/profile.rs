use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    High,
    Extreme,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::High => 1.725,
            ActivityLevel::Extreme => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Goal {
    pub fn factor(self) -> f64 {
        match self {
            Goal::Lose => 0.8,
            Goal::Maintain => 1.0,
            Goal::Gain => 1.15,
        }
    }
}

/// Physiological profile submitted from the mini app form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub age: u32,
    pub gender: Gender,
    #[serde(alias = "weight")]
    pub weight_kg: f64,
    #[serde(alias = "height")]
    pub height_cm: f64,
    #[serde(alias = "activity")]
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    #[serde(alias = "budget")]
    pub daily_budget: f64,
}

impl Profile {
    /// Schema checks that must pass before a profile reaches the evaluator.
    pub fn validate(&self) -> AppResult<()> {
        if !(1..=120).contains(&self.age) {
            return Err(AppError::validation("age must be between 1 and 120"));
        }
        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            return Err(AppError::validation("weight must be positive"));
        }
        if !(self.height_cm.is_finite() && self.height_cm > 0.0) {
            return Err(AppError::validation("height must be positive"));
        }
        if !(self.daily_budget.is_finite() && self.daily_budget > 0.0) {
            return Err(AppError::validation("budget must be positive"));
        }
        Ok(())
    }
}
