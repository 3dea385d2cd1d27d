use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RecipeApiConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// `None` disables the remote recipe strategy; plans come from the local catalog.
    pub recipe_api: Option<RecipeApiConfig>,
    pub recipe_timeout_secs: u64,
    pub meal_slots: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let recipe_api = std::env::var("SPOONACULAR_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(|api_key| RecipeApiConfig {
                api_key,
                base_url: std::env::var("SPOONACULAR_BASE_URL")
                    .unwrap_or_else(|_| "https://api.spoonacular.com".into()),
            });
        Ok(Self {
            database_url,
            recipe_api,
            recipe_timeout_secs: std::env::var("RECIPE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
            meal_slots: std::env::var("MEAL_SLOTS")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(3),
        })
    }
}
