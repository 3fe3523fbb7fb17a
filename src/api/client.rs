use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use time::Date;
use tracing::{debug, instrument, warn};

use super::MealsApi;
use crate::auth::{LoginForm, Session, TokenResponse};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::meals::dto::{format_day, DeletedMeal};
use crate::meals::{DailyStats, MealRecord, MealUpdate, NewMeal};

/// HTTP client for the meals/auth API.
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `POST /auth/jwt/login`. A rejection here is a credentials problem,
    /// so 401 is reported as a plain status error.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let res = self
            .http
            .post(self.config.url("/auth/jwt/login"))
            .form(&LoginForm { username, password })
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            warn!(%status, "login rejected");
            return Err(status_error(status, body, "Invalid credentials"));
        }
        Ok(serde_json::from_str(&body)?)
    }

    #[instrument(skip(self, session))]
    pub async fn get_meal(&self, session: &Session, id: i64) -> Result<MealRecord, ApiError> {
        let req = self.http.get(self.config.url(&format!("/meals/{id}")));
        self.send(req, session).await
    }

    #[instrument(skip(self, session, update))]
    pub async fn update_meal(
        &self,
        session: &Session,
        id: i64,
        update: &MealUpdate,
    ) -> Result<MealRecord, ApiError> {
        let req = self
            .http
            .put(self.config.url(&format!("/meals/{id}")))
            .json(update);
        self.send(req, session).await
    }

    #[instrument(skip(self, session))]
    pub async fn delete_meal(&self, session: &Session, id: i64) -> Result<(), ApiError> {
        let req = self.http.delete(self.config.url(&format!("/meals/{id}")));
        let deleted: DeletedMeal = self.send(req, session).await?;
        debug!(id, message = %deleted.message, "meal deleted");
        Ok(())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        session: &Session,
    ) -> Result<T, ApiError> {
        let res = req.bearer_auth(&session.access_token).send().await?;
        let status = res.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("session rejected by server");
            return Err(ApiError::Unauthorized);
        }
        let body = res.text().await?;
        if !status.is_success() {
            warn!(%status, "request failed");
            return Err(status_error(status, body, "Request failed"));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl MealsApi for ApiClient {
    #[instrument(skip(self, session))]
    async fn list_meals(
        &self,
        session: &Session,
        day: Option<Date>,
    ) -> Result<Vec<MealRecord>, ApiError> {
        let mut req = self.http.get(self.config.url("/meals/"));
        if let Some(day) = day {
            req = req.query(&[("date_filter", format_day(day))]);
        }
        let meals: Vec<MealRecord> = self.send(req, session).await?;
        debug!(count = meals.len(), "meals fetched");
        Ok(meals)
    }

    #[instrument(skip(self, session, meal), fields(meal_type = %meal.meal_type))]
    async fn create_meal(&self, session: &Session, meal: &NewMeal) -> Result<MealRecord, ApiError> {
        let req = self.http.post(self.config.url("/meals/")).json(meal);
        self.send(req, session).await
    }

    #[instrument(skip(self, session))]
    async fn daily_stats(&self, session: &Session, day: Date) -> Result<DailyStats, ApiError> {
        let req = self
            .http
            .get(self.config.url("/meals/stats/daily"))
            .query(&[("date_filter", format_day(day))]);
        self.send(req, session).await
    }
}

fn status_error(status: StatusCode, body: String, fallback: &str) -> ApiError {
    let message = match body.trim() {
        "" => fallback.to_string(),
        text => text.to_string(),
    };
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}
