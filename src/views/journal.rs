use time::Date;
use tracing::{info, warn};

use super::remote::{Remote, Settled};
use crate::aggregate::{sum_macros, MacroTotals};
use crate::api::MealsApi;
use crate::auth::Session;
use crate::error::ApiError;
use crate::meals::{MealForm, MealRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStatus {
    Idle,
    Loading,
    Success,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    SessionExpired,
    Error(String),
    Empty,
    Ready(Vec<MealRecord>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JournalSnapshot {
    pub day: Date,
    pub meals: ListState,
    pub totals: MacroTotals,
    pub submit: SubmitStatus,
}

/// Day screen: meals of the selected day, their running total, and meal entry.
#[derive(Debug)]
pub struct JournalView {
    day: Date,
    meals: Remote<Vec<MealRecord>>,
    submit: SubmitStatus,
}

impl JournalView {
    pub fn new(day: Date) -> Self {
        Self {
            day,
            meals: Remote::default(),
            submit: SubmitStatus::Idle,
        }
    }

    pub fn day(&self) -> Date {
        self.day
    }

    pub fn select_day(&mut self, day: Date) {
        self.day = day;
    }

    pub fn meals(&self) -> &Remote<Vec<MealRecord>> {
        &self.meals
    }

    pub async fn refresh(&mut self, api: &dyn MealsApi, session: &Session) -> Settled {
        self.meals.load(api.list_meals(session, Some(self.day))).await
    }

    /// Sends the form as a meal of the selected day, then reloads the day.
    pub async fn submit(
        &mut self,
        api: &dyn MealsApi,
        session: &Session,
        form: MealForm,
    ) -> &SubmitStatus {
        let meal = match form.into_new_meal(self.day) {
            Ok(meal) => meal,
            Err(e) => {
                self.submit = SubmitStatus::Error(e.to_string());
                return &self.submit;
            }
        };

        self.submit = SubmitStatus::Loading;
        match api.create_meal(session, &meal).await {
            Ok(created) => {
                info!(id = ?created.id, name = %created.name, "meal added");
                self.submit = SubmitStatus::Success;
                self.refresh(api, session).await;
            }
            Err(ApiError::Unauthorized) => {
                self.submit = SubmitStatus::Idle;
                self.meals.expire_session();
            }
            Err(e) => {
                warn!(error = %e, "meal submission failed");
                self.submit = SubmitStatus::Error(e.to_string());
            }
        }
        &self.submit
    }

    pub fn totals(&self) -> MacroTotals {
        self.meals
            .value()
            .map(|meals| sum_macros(meals))
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> JournalSnapshot {
        let meals = if self.meals.session_expired() {
            ListState::SessionExpired
        } else if self.meals.is_loading() {
            ListState::Loading
        } else if let Some(err) = self.meals.error() {
            ListState::Error(err.to_string())
        } else {
            match self.meals.value() {
                None => ListState::Loading,
                Some(meals) if meals.is_empty() => ListState::Empty,
                Some(meals) => ListState::Ready(meals.clone()),
            }
        };
        JournalSnapshot {
            day: self.day,
            meals,
            totals: self.totals(),
            submit: self.submit.clone(),
        }
    }
}
