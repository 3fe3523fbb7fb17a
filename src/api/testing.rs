//! In-process fake of the meals/auth API for tests.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use time::OffsetDateTime;

use crate::config::ApiConfig;

pub(crate) const USER: &str = "ada@example.com";
pub(crate) const PASSWORD: &str = "correct-horse";
pub(crate) const GOOD_TOKEN: &str = "good-token";

/// Binds the fake on an ephemeral port and returns a config pointing at it.
pub(crate) async fn spawn_fake_api() -> ApiConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake api");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, fake_router())
            .await
            .expect("fake api serve");
    });
    ApiConfig {
        base_url: format!("http://{addr}"),
        prefix: "/api".into(),
        timeout_secs: 5,
    }
}

fn fake_router() -> Router {
    Router::new()
        .route("/api/auth/jwt/login", post(login))
        .route("/api/meals/", get(list_meals).post(create_meal))
        .route("/api/meals/stats/daily", get(daily_stats))
        .route(
            "/api/meals/:id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
}

fn fixture() -> Vec<Value> {
    vec![
        json!({"id": 1, "user_id": 1, "name": "porridge", "calories": 500.0, "proteins": 20.0,
               "carbohydrates": 80.0, "fats": 10.0, "fiber": 8.0, "meal_type": "breakfast",
               "date": "2024-01-01T08:00:00"}),
        json!({"id": 2, "user_id": 1, "name": "salad", "calories": 300.0, "proteins": 12.0,
               "carbohydrates": 20.0, "fats": 15.0, "fiber": null, "meal_type": "lunch",
               "date": "2024-01-01T12:30:00"}),
        json!({"id": 3, "user_id": 1, "name": "pasta", "calories": 700.0, "proteins": 25.0,
               "carbohydrates": 110.0, "fats": 18.0, "fiber": 6.0, "meal_type": "dinner",
               "date": "2024-01-02T19:00:00"}),
        json!({"id": 4, "user_id": 1, "name": "bar", "calories": 210.0, "meal_type": "snack",
               "date": null}),
    ]
}

fn issue_token() -> String {
    let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;
    encode(
        &Header::default(),
        &json!({"sub": "1", "aud": ["fastapi-users:auth"], "exp": exp}),
        &EncodingKey::from_secret(b"fake-api-secret"),
    )
    .expect("sign fake token")
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|t| !t.is_empty() && t != "expired")
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Unauthorized"}))).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Meal not found"}))).into_response()
}

fn on_day(meal: &Value, day: Option<&String>) -> bool {
    match day {
        Some(d) => meal["date"]
            .as_str()
            .is_some_and(|s| s.starts_with(d.as_str())),
        None => true,
    }
}

async fn login(Form(form): Form<HashMap<String, String>>) -> Response {
    let ok = form.get("username").map(String::as_str) == Some(USER)
        && form.get("password").map(String::as_str) == Some(PASSWORD);
    if !ok {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "LOGIN_BAD_CREDENTIALS"})),
        )
            .into_response();
    }
    Json(json!({"access_token": issue_token(), "token_type": "bearer"})).into_response()
}

async fn list_meals(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let meals: Vec<Value> = fixture()
        .into_iter()
        .filter(|m| on_day(m, q.get("date_filter")))
        .collect();
    Json(meals).into_response()
}

async fn create_meal(headers: HeaderMap, Json(mut body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    body["id"] = json!(99);
    body["user_id"] = json!(1);
    (StatusCode::OK, Json(body)).into_response()
}

async fn get_meal(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if id == 7 {
        return (StatusCode::OK, "<html>proxy error</html>").into_response();
    }
    match fixture().into_iter().find(|m| m["id"] == json!(id)) {
        Some(meal) => Json(meal).into_response(),
        None => not_found(),
    }
}

async fn update_meal(
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(patch): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let Some(mut meal) = fixture().into_iter().find(|m| m["id"] == json!(id)) else {
        return not_found();
    };
    if let (Some(target), Some(fields)) = (meal.as_object_mut(), patch.as_object()) {
        for (k, v) in fields {
            target.insert(k.clone(), v.clone());
        }
    }
    Json(meal).into_response()
}

async fn delete_meal(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if !fixture().iter().any(|m| m["id"] == json!(id)) {
        return not_found();
    }
    Json(json!({"message": "Meal deleted"})).into_response()
}

async fn daily_stats(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let day = q.get("date_filter").cloned().unwrap_or_default();
    let meals: Vec<Value> = fixture()
        .into_iter()
        .filter(|m| on_day(m, Some(&day)))
        .collect();
    let total = |field: &str| -> f64 { meals.iter().filter_map(|m| m[field].as_f64()).sum() };
    Json(json!({
        "date": day,
        "total_calories": total("calories"),
        "total_proteins": total("proteins"),
        "total_carbohydrates": total("carbohydrates"),
        "total_fats": total("fats"),
        "total_fiber": total("fiber"),
        "meal_count": meals.len(),
    }))
    .into_response()
}
