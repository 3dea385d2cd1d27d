use serde::{Deserialize, Serialize};

use super::profile::{Gender, Profile};

/// Daily energy and macro targets. Values are kept unrounded; use
/// [`NutritionTarget::rounded`] for presentation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NutritionTarget {
    pub calories: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
    pub budget: f64,
}

/// Integer view of a target as shown to the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RoundedTarget {
    pub calories: i64,
    pub protein: i64,
    pub fat: i64,
    pub carbs: i64,
    pub budget: f64,
}

impl NutritionTarget {
    /// Rounds every macro once. Negative carbs (tiny calorie targets against a
    /// heavy body weight) are shown as zero.
    pub fn rounded(&self) -> RoundedTarget {
        if self.carbs_g < 0.0 {
            tracing::warn!(carbs_g = self.carbs_g, "carbohydrate target is negative; showing 0");
        }
        RoundedTarget {
            calories: self.calories.round() as i64,
            protein: self.protein_g.round() as i64,
            fat: self.fat_g.round() as i64,
            carbs: self.carbs_g.max(0.0).round() as i64,
            budget: self.budget,
        }
    }
}

/// Harris-Benedict basal metabolic rate in kcal/day.
pub fn basal_metabolic_rate(profile: &Profile) -> f64 {
    let w = profile.weight_kg;
    let h = profile.height_cm;
    let a = f64::from(profile.age);
    match profile.gender {
        Gender::Male => 88.362 + 13.397 * w + 4.799 * h - 5.677 * a,
        Gender::Female | Gender::Other => 447.593 + 9.247 * w + 3.098 * h - 4.330 * a,
    }
}

pub fn evaluate(profile: &Profile) -> NutritionTarget {
    let bmr = basal_metabolic_rate(profile);
    let tdee = bmr * profile.activity_level.multiplier();
    let calories = tdee * profile.goal.factor();

    let protein_g = profile.weight_kg * 2.0;
    let fat_g = (calories * 0.3) / 9.0;
    let carbs_g = (calories - protein_g * 4.0 - fat_g * 9.0) / 4.0;

    NutritionTarget {
        calories,
        protein_g,
        fat_g,
        carbs_g,
        budget: profile.daily_budget,
    }
}
