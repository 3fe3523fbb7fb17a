use time::Date;
use tracing::debug;

use super::remote::{Remote, Settled};
use crate::aggregate::{aggregate_by_day, rolling_averages, select_window, Macro, RollingAverages, Window};
use crate::api::MealsApi;
use crate::auth::Session;
use crate::meals::MealRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub date: Date,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub selected: Macro,
    /// Most recent daily totals, oldest first.
    pub points: Vec<ChartPoint>,
    pub averages: RollingAverages,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardSnapshot {
    Loading,
    SessionExpired,
    Error(String),
    Empty,
    Ready(DashboardData),
}

/// Trend screen: daily totals of one macro with 7/30/all-time averages.
#[derive(Debug)]
pub struct DashboardView {
    selected: Macro,
    chart_days: usize,
    meals: Remote<Vec<MealRecord>>,
}

impl DashboardView {
    pub fn new(chart_days: usize) -> Self {
        Self {
            selected: Macro::default(),
            chart_days,
            meals: Remote::default(),
        }
    }

    pub fn selected(&self) -> Macro {
        self.selected
    }

    pub fn select(&mut self, m: Macro) {
        self.selected = m;
    }

    pub fn meals(&self) -> &Remote<Vec<MealRecord>> {
        &self.meals
    }

    pub fn meals_mut(&mut self) -> &mut Remote<Vec<MealRecord>> {
        &mut self.meals
    }

    pub async fn refresh(&mut self, api: &dyn MealsApi, session: &Session) -> Settled {
        let settled = self.meals.load(api.list_meals(session, None)).await;
        debug!(?settled, "dashboard refreshed");
        settled
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        if self.meals.session_expired() {
            return DashboardSnapshot::SessionExpired;
        }
        if self.meals.is_loading() {
            return DashboardSnapshot::Loading;
        }
        if let Some(err) = self.meals.error() {
            return DashboardSnapshot::Error(err.to_string());
        }
        let Some(meals) = self.meals.value() else {
            return DashboardSnapshot::Loading;
        };

        let totals = aggregate_by_day(meals);
        if totals.is_empty() {
            return DashboardSnapshot::Empty;
        }
        let points = select_window(&totals, Window::Days(self.chart_days))
            .iter()
            .map(|d| ChartPoint {
                date: d.date,
                value: d.get(self.selected),
            })
            .collect();
        DashboardSnapshot::Ready(DashboardData {
            selected: self.selected,
            points,
            averages: rolling_averages(&totals, self.selected),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fake::{meal, session, FakeApi};
    use time::macros::date;

    #[tokio::test]
    async fn ready_snapshot_aggregates_and_averages() {
        let api = FakeApi::with_meals(vec![
            meal("2024-01-01T08:00:00", 500.0),
            meal("2024-01-01T20:00:00", 300.0),
            meal("2024-01-02T12:00:00", 700.0),
        ]);
        let mut view = DashboardView::new(30);
        assert_eq!(view.snapshot(), DashboardSnapshot::Loading);
        assert_eq!(view.refresh(&api, &session()).await, Settled::Applied);

        let DashboardSnapshot::Ready(data) = view.snapshot() else {
            panic!("expected ready snapshot");
        };
        assert_eq!(data.selected, Macro::Calories);
        assert_eq!(
            data.points,
            vec![
                ChartPoint { date: date!(2024 - 01 - 01), value: 800.0 },
                ChartPoint { date: date!(2024 - 01 - 02), value: 700.0 },
            ]
        );
        assert_eq!(data.averages.last_7, 750.0);
        assert_eq!(data.averages.all_time, 750.0);

        view.select(Macro::Fiber);
        let DashboardSnapshot::Ready(data) = view.snapshot() else {
            panic!("expected ready snapshot");
        };
        assert_eq!(data.points[0].value, 4.0);
    }

    #[tokio::test]
    async fn chart_is_capped_but_all_time_average_is_not() {
        let meals = (1..=31)
            .map(|d| meal(&format!("2024-03-{d:02}T12:00:00"), d as f64))
            .collect();
        let api = FakeApi::with_meals(meals);
        let mut view = DashboardView::new(30);
        view.refresh(&api, &session()).await;

        let DashboardSnapshot::Ready(data) = view.snapshot() else {
            panic!("expected ready snapshot");
        };
        assert_eq!(data.points.len(), 30);
        assert_eq!(data.points[0].date, date!(2024 - 03 - 02));
        assert_eq!(data.averages.all_time, 16.0);
        assert_eq!(data.averages.last_30, 16.5);
        assert_eq!(data.averages.last_7, 28.0);
    }

    #[tokio::test]
    async fn no_meals_is_empty_state() {
        let api = FakeApi::default();
        let mut view = DashboardView::new(30);
        view.refresh(&api, &session()).await;
        assert_eq!(view.snapshot(), DashboardSnapshot::Empty);
    }

    #[tokio::test]
    async fn unauthorized_fetch_raises_session_expired_only() {
        let api = FakeApi::failing(401);
        let mut view = DashboardView::new(30);
        view.refresh(&api, &session()).await;
        assert!(view.meals().session_expired());
        assert_eq!(view.meals().error(), None);
        assert_eq!(view.snapshot(), DashboardSnapshot::SessionExpired);
    }

    #[tokio::test]
    async fn refetch_after_login_leaves_expired_state() {
        let mut view = DashboardView::new(30);
        view.refresh(&FakeApi::failing(401), &session()).await;
        assert_eq!(view.snapshot(), DashboardSnapshot::SessionExpired);

        let api = FakeApi::with_meals(vec![meal("2024-01-01T08:00:00", 500.0)]);
        view.refresh(&api, &session()).await;
        assert!(!view.meals().session_expired());
        assert!(matches!(view.snapshot(), DashboardSnapshot::Ready(d) if d.points[0].value == 500.0));
    }

    #[tokio::test]
    async fn server_error_is_inline() {
        let api = FakeApi::failing(503);
        let mut view = DashboardView::new(30);
        view.refresh(&api, &session()).await;
        assert_eq!(
            view.snapshot(),
            DashboardSnapshot::Error("Error 503: server unavailable".into())
        );
    }

    #[tokio::test]
    async fn superseded_fetch_does_not_overwrite_newer_data() {
        let mut view = DashboardView::new(30);
        let older = view.meals_mut().begin();
        let newer = view.meals_mut().begin();
        view.meals_mut()
            .settle(newer, Ok(vec![meal("2024-05-02T09:00:00", 900.0)]));
        let late = view
            .meals_mut()
            .settle(older, Ok(vec![meal("2024-05-01T09:00:00", 100.0)]));
        assert_eq!(late, Settled::Stale);

        let DashboardSnapshot::Ready(data) = view.snapshot() else {
            panic!("expected ready snapshot");
        };
        assert_eq!(data.points.len(), 1);
        assert_eq!(data.points[0].value, 900.0);
    }
}
