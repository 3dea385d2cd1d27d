use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{catalog, grocery, meal_plans, recipes, stores, users, webapp};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(users::router())
                .merge(catalog::router())
                .merge(meal_plans::router())
                .merge(grocery::router())
                .merge(stores::router())
                .merge(recipes::router())
                .merge(webapp::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::testing::{food, recipe, FakeRecipes, InMemoryCatalog};

    async fn call(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(b) => request
                .header("content-type", "application/json")
                .body(Body::from(b.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();
        let res = app.oneshot(request).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::with_items(vec![
            food("oats", "grains", 380.0, 0.4),
            food("milk", "dairy", 120.0, 0.2),
            food("chicken", "meat", 450.0, 2.0),
            food("rice", "grains", 200.0, 0.3),
            food("salmon", "fish", 500.0, 3.5),
            food("apple", "fruit", 95.0, 0.5),
        ])
    }

    fn profile_json() -> Value {
        json!({
            "age": 30, "gender": "male", "weight": 70, "height": 175,
            "activity": "moderate", "goal": "maintain", "budget": 500
        })
    }

    #[tokio::test]
    async fn health() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn user_lifecycle() {
        let state = AppState::fake();
        let (status, user) = call(
            build_app(state.clone()),
            Method::POST,
            "/api/v1/users",
            Some(json!({"username": "anna", "telegram_id": "777", "age": 28})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = user["id"].as_str().unwrap().to_string();

        let (status, found) = call(
            build_app(state.clone()),
            Method::GET,
            "/api/v1/users/telegram/777",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found["id"], user["id"]);

        let (status, updated) = call(
            build_app(state.clone()),
            Method::PATCH,
            &format!("/api/v1/users/{id}"),
            Some(json!({"weight": 61.5, "goal": "lose"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["weight_kg"], 61.5);
        assert_eq!(updated["age"], 28);

        let (status, body) = call(
            build_app(state.clone()),
            Method::PATCH,
            &format!("/api/v1/users/{id}"),
            Some(json!({"age": 500})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("age"));

        let (status, _) = call(
            build_app(state),
            Method::GET,
            &format!("/api/v1/users/{}", Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn generate_then_read_plan_and_groceries() {
        let state = AppState::fake_with(catalog(), None);
        let user = state.seed_user().await;

        let (status, plan) = call(
            build_app(state.clone()),
            Method::POST,
            "/api/v1/meal-plans/generate",
            Some(json!({"user_id": user, "profile": profile_json(), "days": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(plan["source"], "local");
        assert_eq!(plan["daily_nutrition"]["calories"], 2628);
        assert_eq!(plan["daily_nutrition"]["fat"], 88);
        assert!(plan["grocery_items"].as_u64().unwrap() > 0);

        let (status, latest) = call(
            build_app(state.clone()),
            Method::GET,
            &format!("/api/v1/meal-plans/user/{user}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(latest["id"], plan["id"]);

        let (status, day2) = call(
            build_app(state.clone()),
            Method::GET,
            &format!("/api/v1/meals/user/{user}/day/2"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!day2.as_array().unwrap().is_empty());

        let (status, list) = call(
            build_app(state.clone()),
            Method::GET,
            &format!("/api/v1/grocery-items/user/{user}?category=grains"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(list["totals"]["totalCount"].as_u64().unwrap() >= 1);
        assert!(list["items"]
            .as_array()
            .unwrap()
            .iter()
            .all(|i| i["food_item"]["category"] == "grains"));
    }

    #[tokio::test]
    async fn generate_validates_and_reports_missing_data() {
        let state = AppState::fake();
        let user = state.seed_user().await;

        let mut bad = profile_json();
        bad["weight"] = json!(-1);
        let (status, _) = call(
            build_app(state.clone()),
            Method::POST,
            "/api/v1/meal-plans/generate",
            Some(json!({"user_id": user, "profile": bad})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            build_app(state),
            Method::POST,
            "/api/v1/meal-plans/generate",
            Some(json!({"user_id": user, "profile": profile_json()})),
        )
        .await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert!(body["message"].as_str().unwrap().contains("no data available"));
    }

    #[tokio::test]
    async fn malformed_bodies_are_bad_requests() {
        let state = AppState::fake_with(catalog(), None);
        let user = state.seed_user().await;

        let mut robot = profile_json();
        robot["gender"] = json!("robot");
        let (status, body) = call(
            build_app(state.clone()),
            Method::POST,
            "/api/v1/meal-plans/generate",
            Some(json!({"user_id": user, "profile": robot})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());

        let mut negative_age = profile_json();
        negative_age["age"] = json!(-4);
        let (status, _) = call(
            build_app(state.clone()),
            Method::POST,
            "/api/v1/meal-plans/generate",
            Some(json!({"user_id": user, "profile": negative_age})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            build_app(state),
            Method::POST,
            "/api/v1/grocery-items",
            Some(json!({"user_id": user, "food_item_id": Uuid::new_v4(), "quantity": "lots"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn remote_failure_maps_to_500() {
        let state = AppState::fake_with(catalog(), Some(Arc::new(FakeRecipes::failing_with_status(502))));
        let user = state.seed_user().await;
        let (status, body) = call(
            build_app(state),
            Method::POST,
            "/api/v1/meal-plans/generate",
            Some(json!({"user_id": user})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["message"].as_str().unwrap().contains("HTTP 502"));
    }

    #[tokio::test]
    async fn grocery_batch_and_updates() {
        let items = catalog();
        let all = crate::catalog::CatalogRepo::all(&items).await.unwrap();
        let state = AppState::fake_with(items, None);
        let user = state.seed_user().await;

        let (status, outcome) = call(
            build_app(state.clone()),
            Method::POST,
            "/api/v1/grocery-items/batch",
            Some(json!({
                "user_id": user,
                "items": [
                    {"food_item_id": all[0].id, "quantity": 2},
                    {"food_item_id": all[1].id, "quantity": 0},
                    {"food_item_id": all[2].id, "quantity": 1.5}
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(outcome["items"].as_array().unwrap().len(), 2);
        assert_eq!(outcome["rejected"][0]["index"], 1);

        let first = outcome["items"][0]["id"].as_str().unwrap().to_string();
        let (status, updated) = call(
            build_app(state.clone()),
            Method::PATCH,
            &format!("/api/v1/grocery-items/{first}"),
            Some(json!({"purchased": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["purchased"], true);

        let (status, outcome) = call(
            build_app(state.clone()),
            Method::PATCH,
            "/api/v1/grocery-items/batch",
            Some(json!({"items": [{"id": first, "quantity": 3}, {"quantity": 1}]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["items"][0]["quantity"], 3.0);
        assert_eq!(outcome["rejected"][0]["index"], 1);

        let (status, list) = call(
            build_app(state.clone()),
            Method::GET,
            &format!("/api/v1/grocery-items/user/{user}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["totals"]["totalCount"], 2);
        assert_eq!(list["totals"]["purchasedCount"], 1);
        // 0.4 * 3 + 2.0 * 1.5
        assert!((list["totals"]["totalCost"].as_f64().unwrap() - 4.2).abs() < 1e-9);

        let (status, _) = call(
            build_app(state),
            Method::POST,
            "/api/v1/grocery-items/batch",
            Some(json!({"items": [{"food_item_id": all[0].id, "quantity": 1}]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn grocery_from_recipe_requires_configured_service() {
        let state = AppState::fake();
        let user = state.seed_user().await;
        let (status, _) = call(
            build_app(state),
            Method::POST,
            "/api/v1/grocery-items/from-recipe",
            Some(json!({"user_id": user, "recipe_id": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let recipes = FakeRecipes::with_recipes(vec![recipe(5, "Soup", &[("carrot", 100.0, 41.0)], 80.0)]);
        let state = AppState::fake_with(InMemoryCatalog::default(), Some(Arc::new(recipes)));
        let user = state.seed_user().await;
        let (status, outcome) = call(
            build_app(state),
            Method::POST,
            "/api/v1/grocery-items/from-recipe",
            Some(json!({"user_id": user, "recipe_id": 5})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(outcome["items"][0]["quantity"], 100.0);
    }

    #[tokio::test]
    async fn stores_nearby() {
        let state = AppState::fake();
        for (name, lat, lng) in [("Central", 55.751, 37.618), ("Outskirts", 55.9, 37.9)] {
            let (status, _) = call(
                build_app(state.clone()),
                Method::POST,
                "/api/v1/stores",
                Some(json!({"name": name, "address": "somewhere", "latitude": lat, "longitude": lng})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, hits) = call(
            build_app(state.clone()),
            Method::GET,
            "/api/v1/stores/nearby?lat=55.75&lng=37.618",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(hits.as_array().unwrap().len(), 1);
        assert_eq!(hits[0]["name"], "Central");

        let (status, all) = call(build_app(state.clone()), Method::GET, "/api/v1/stores", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 2);

        let (status, _) = call(build_app(state), Method::GET, "/api/v1/stores/nearby?lat=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn recipe_routes_pass_through() {
        let recipes = FakeRecipes::with_recipes(vec![recipe(9, "Tomato soup", &[("tomato", 300.0, 54.0)], 120.0)]);
        let state = AppState::fake_with(InMemoryCatalog::default(), Some(Arc::new(recipes)));

        let (status, found) = call(
            build_app(state.clone()),
            Method::GET,
            "/api/v1/recipes/search?query=soup",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found["results"][0]["id"], 9);

        let (status, _) = call(build_app(state.clone()), Method::GET, "/api/v1/recipes/search", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, detail) = call(build_app(state.clone()), Method::GET, "/api/v1/recipes/9", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["title"], "Tomato soup");

        let (status, _) = call(
            build_app(state),
            Method::GET,
            "/api/v1/recipes/by-ingredients?ingredients=tomato,basil",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn webapp_envelope_round_trip() {
        let (status, reply) = call(
            build_app(AppState::fake()),
            Method::POST,
            "/api/v1/webapp/data",
            Some(json!({"type": "profile", "data": profile_json()})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["type"], "profile");
        assert_eq!(reply["data"]["daily_nutrition"]["calories"], 2628);
    }
}
