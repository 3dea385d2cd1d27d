use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    grocery::views::GroceryTotals,
    meal_plans::PlanSource,
    nutrition::{Profile, RoundedTarget},
};

/// `{type, data}` message posted by the mini app.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum WebAppMessage {
    Profile(ProfileData),
    MealPlan(UserRef),
    Groceries(UserRef),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileData {
    /// Saves the profile on this user when present.
    pub user_id: Option<Uuid>,
    #[serde(flatten)]
    pub profile: Profile,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UserRef {
    pub user_id: Uuid,
}

/// Reply envelope, same shape as the request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum WebAppReply {
    Profile(ProfileSummary),
    MealPlan(PlanSummary),
    Groceries(GroceryTotals),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileSummary {
    pub daily_nutrition: RoundedTarget,
    pub saved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSummary {
    pub plan_id: Uuid,
    pub days: i32,
    pub source: PlanSource,
    pub meals: usize,
    pub daily_nutrition: RoundedTarget,
    pub total_cost: f64,
}
