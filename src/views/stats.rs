use time::Date;

use super::remote::{Remote, Settled};
use crate::aggregate::Macro;
use crate::api::MealsApi;
use crate::auth::Session;
use crate::meals::DailyStats;

/// Daily targets used for the progress bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goals {
    pub calories: f64,
    pub proteins: f64,
    pub carbohydrates: f64,
    pub fats: f64,
    pub fiber: f64,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            proteins: 150.0,
            carbohydrates: 250.0,
            fats: 65.0,
            fiber: 25.0,
        }
    }
}

impl Goals {
    pub fn get(&self, m: Macro) -> f64 {
        match m {
            Macro::Calories => self.calories,
            Macro::Proteins => self.proteins,
            Macro::Carbohydrates => self.carbohydrates,
            Macro::Fats => self.fats,
            Macro::Fiber => self.fiber,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroProgress {
    pub nutrient: Macro,
    pub value: f64,
    pub goal: f64,
    /// Share of the goal reached, clamped to 0..=100.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub stats: DailyStats,
    pub progress: Vec<MacroProgress>,
    pub calories_per_meal: f64,
    /// Proteins + carbohydrates + fats, in grams.
    pub macro_grams: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatsSnapshot {
    Loading,
    SessionExpired,
    Error(String),
    Empty,
    Ready(StatsSummary),
}

pub fn progress(current: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return 0.0;
    }
    (current / goal * 100.0).clamp(0.0, 100.0)
}

fn stat_value(stats: &DailyStats, m: Macro) -> f64 {
    match m {
        Macro::Calories => stats.total_calories,
        Macro::Proteins => stats.total_proteins,
        Macro::Carbohydrates => stats.total_carbohydrates,
        Macro::Fats => stats.total_fats,
        Macro::Fiber => stats.total_fiber,
    }
}

/// Server-aggregated statistics for one day, measured against `Goals`.
#[derive(Debug)]
pub struct StatsView {
    day: Date,
    goals: Goals,
    stats: Remote<DailyStats>,
}

impl StatsView {
    pub fn new(day: Date, goals: Goals) -> Self {
        Self {
            day,
            goals,
            stats: Remote::default(),
        }
    }

    pub fn day(&self) -> Date {
        self.day
    }

    pub fn select_day(&mut self, day: Date) {
        self.day = day;
    }

    pub fn stats(&self) -> &Remote<DailyStats> {
        &self.stats
    }

    pub async fn refresh(&mut self, api: &dyn MealsApi, session: &Session) -> Settled {
        self.stats.load(api.daily_stats(session, self.day)).await
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        if self.stats.session_expired() {
            return StatsSnapshot::SessionExpired;
        }
        if self.stats.is_loading() {
            return StatsSnapshot::Loading;
        }
        if let Some(err) = self.stats.error() {
            return StatsSnapshot::Error(err.to_string());
        }
        let Some(stats) = self.stats.value() else {
            return StatsSnapshot::Loading;
        };
        if stats.meal_count == 0 {
            return StatsSnapshot::Empty;
        }

        let bars = Macro::ALL
            .iter()
            .map(|&m| {
                let value = stat_value(stats, m);
                let goal = self.goals.get(m);
                MacroProgress {
                    nutrient: m,
                    value,
                    goal,
                    percent: progress(value, goal),
                }
            })
            .collect();
        StatsSnapshot::Ready(StatsSummary {
            stats: stats.clone(),
            progress: bars,
            calories_per_meal: stats.total_calories / f64::from(stats.meal_count),
            macro_grams: stats.total_proteins + stats.total_carbohydrates + stats.total_fats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fake::{session, FakeApi};
    use time::macros::date;

    fn stats() -> DailyStats {
        DailyStats {
            date: "2024-01-01".into(),
            total_calories: 2500.0,
            total_proteins: 75.0,
            total_carbohydrates: 200.0,
            total_fats: 65.0,
            total_fiber: 10.0,
            meal_count: 4,
        }
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress(2500.0, 2000.0), 100.0);
        assert_eq!(progress(75.0, 150.0), 50.0);
        assert_eq!(progress(10.0, 0.0), 0.0);
    }

    #[tokio::test]
    async fn summary_against_default_goals() {
        let api = FakeApi {
            stats: Some(stats()),
            ..FakeApi::default()
        };
        let mut view = StatsView::new(date!(2024 - 01 - 01), Goals::default());
        view.refresh(&api, &session()).await;

        let StatsSnapshot::Ready(summary) = view.snapshot() else {
            panic!("expected ready snapshot");
        };
        assert_eq!(summary.calories_per_meal, 625.0);
        assert_eq!(summary.macro_grams, 340.0);
        let percents: Vec<f64> = summary.progress.iter().map(|p| p.percent).collect();
        assert_eq!(percents, vec![100.0, 50.0, 80.0, 100.0, 40.0]);
    }

    #[tokio::test]
    async fn zero_meals_is_empty() {
        let api = FakeApi {
            stats: Some(DailyStats {
                date: "2024-01-01".into(),
                ..DailyStats::default()
            }),
            ..FakeApi::default()
        };
        let mut view = StatsView::new(date!(2024 - 01 - 01), Goals::default());
        view.refresh(&api, &session()).await;
        assert_eq!(view.snapshot(), StatsSnapshot::Empty);
    }

    #[tokio::test]
    async fn unauthorized_is_session_expired() {
        let api = FakeApi::failing(401);
        let mut view = StatsView::new(date!(2024 - 01 - 01), Goals::default());
        view.refresh(&api, &session()).await;
        assert_eq!(view.snapshot(), StatsSnapshot::SessionExpired);
        assert_eq!(view.stats().error(), None);
    }
}
