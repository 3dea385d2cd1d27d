use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Kilometres per degree used by the flat distance approximation.
pub const KM_PER_DEGREE: f64 = 111.0;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub image_url: Option<String>,
}

impl Store {
    /// Approximate distance in km. Ignores longitude shrinking away from the
    /// equator; good enough for a few kilometres.
    pub fn distance_km(&self, lat: f64, lng: f64) -> f64 {
        let dlat = self.latitude - lat;
        let dlng = self.longitude - lng;
        (dlat * dlat + dlng * dlng).sqrt() * KM_PER_DEGREE
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStore {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub image_url: Option<String>,
}

impl NewStore {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() || self.address.trim().is_empty() {
            return Err(AppError::validation("name and address are required"));
        }
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AppError::validation("Invalid coordinates"));
        }
        if let Some(r) = self.rating {
            if !(0.0..=5.0).contains(&r) {
                return Err(AppError::validation("rating must be between 0 and 5"));
            }
        }
        Ok(())
    }
}
