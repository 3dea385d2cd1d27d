use serde::{Deserialize, Serialize};

/// `GET /mealplanner/generate?timeFrame=day` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteMealPlan {
    #[serde(default)]
    pub meals: Vec<PlannedMeal>,
    #[serde(default)]
    pub nutrients: PlanNutrients,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMeal {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub servings: Option<f64>,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlanNutrients {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub carbohydrates: f64,
}

/// `GET /recipes/{id}/information?includeNutrition=true`, reduced to what
/// meal composition and recipe import need.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetails {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub servings: Option<f64>,
    /// US cents.
    #[serde(default)]
    pub price_per_serving: Option<f64>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub dish_types: Vec<String>,
    #[serde(default)]
    pub extended_ingredients: Vec<ExtendedIngredient>,
    #[serde(default)]
    pub nutrition: Option<RecipeNutrition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtendedIngredient {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub aisle: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecipeNutrition {
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
    #[serde(default)]
    pub ingredients: Vec<IngredientNutrition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Nutrient {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}

/// Per-serving nutrients of one recipe ingredient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientNutrition {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
}

pub fn nutrient_amount(nutrients: &[Nutrient], name: &str) -> f64 {
    nutrients
        .iter()
        .find(|n| n.name.eq_ignore_ascii_case(name))
        .map(|n| n.amount)
        .unwrap_or(0.0)
}

/// Ingredient line of a recipe with the nutrients the catalog needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeIngredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub category: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

impl RecipeDetails {
    /// Ingredient lines, preferring the per-serving nutrition breakdown and
    /// falling back to the plain ingredient list (no nutrients) without one.
    pub fn ingredients(&self) -> Vec<RecipeIngredient> {
        let aisle_of = |name: &str| {
            self.extended_ingredients
                .iter()
                .find(|e| e.name.eq_ignore_ascii_case(name))
                .and_then(|e| e.aisle.clone())
                .unwrap_or_else(|| "other".to_string())
        };

        match &self.nutrition {
            Some(n) if !n.ingredients.is_empty() => n
                .ingredients
                .iter()
                .map(|i| RecipeIngredient {
                    name: i.name.clone(),
                    amount: i.amount,
                    unit: i.unit.clone(),
                    category: aisle_of(&i.name),
                    calories: nutrient_amount(&i.nutrients, "Calories"),
                    protein: nutrient_amount(&i.nutrients, "Protein"),
                    fat: nutrient_amount(&i.nutrients, "Fat"),
                    carbs: nutrient_amount(&i.nutrients, "Carbohydrates"),
                })
                .collect(),
            _ => self
                .extended_ingredients
                .iter()
                .map(|e| RecipeIngredient {
                    name: e.name.clone(),
                    amount: e.amount,
                    unit: e.unit.clone(),
                    category: e.aisle.clone().unwrap_or_else(|| "other".to_string()),
                    calories: 0.0,
                    protein: 0.0,
                    fat: 0.0,
                    carbs: 0.0,
                })
                .collect(),
        }
    }

    /// Price of one serving in currency units.
    pub fn serving_price(&self) -> f64 {
        self.price_per_serving.unwrap_or(0.0) / 100.0
    }
}
