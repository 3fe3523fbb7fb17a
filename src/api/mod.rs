mod client;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use time::Date;

use crate::auth::Session;
use crate::error::ApiError;
use crate::meals::{DailyStats, MealRecord, NewMeal};

pub use client::ApiClient;

/// The calls the views depend on.
#[async_trait]
pub trait MealsApi: Send + Sync {
    /// All meals of the user, or only those of `day`.
    async fn list_meals(
        &self,
        session: &Session,
        day: Option<Date>,
    ) -> Result<Vec<MealRecord>, ApiError>;

    async fn create_meal(&self, session: &Session, meal: &NewMeal) -> Result<MealRecord, ApiError>;

    async fn daily_stats(&self, session: &Session, day: Date) -> Result<DailyStats, ApiError>;
}
