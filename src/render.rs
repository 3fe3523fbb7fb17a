//! Plain-text rendering of view snapshots.

use crate::aggregate::{Macro, MacroTotals};
use crate::meals::dto::format_day;
use crate::meals::MealRecord;
use crate::views::{
    DashboardSnapshot, JournalSnapshot, ListState, StatsSnapshot, SubmitStatus,
};

pub const SESSION_EXPIRED: &str =
    "Session expired: you are no longer authenticated. Please log in again.";
pub const NO_DATA: &str = "No data to display";
pub const LOADING: &str = "Loading...";

const BAR_WIDTH: usize = 40;

fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * width as f64).round() as usize;
    "#".repeat(len.clamp(1, width))
}

pub fn render_meal(meal: &MealRecord) -> String {
    let when = meal.date.as_deref().unwrap_or("-");
    let id = meal
        .id
        .map(|id| format!("#{id} "))
        .unwrap_or_default();
    let mut line = format!(
        "{id}{name} ({kind}, {when}): {kcal:.0} kcal, P {p:.1} g, C {c:.1} g, F {f:.1} g, fiber {fi:.1} g",
        name = meal.name,
        kind = meal.meal_type,
        kcal = Macro::Calories.of(meal),
        p = Macro::Proteins.of(meal),
        c = Macro::Carbohydrates.of(meal),
        f = Macro::Fats.of(meal),
        fi = Macro::Fiber.of(meal),
    );
    if let Some(desc) = meal.description.as_deref().filter(|d| !d.is_empty()) {
        line.push_str(&format!(" - {desc}"));
    }
    line
}

fn render_totals(totals: &MacroTotals) -> String {
    Macro::ALL
        .iter()
        .map(|&m| format!("{}: {:.1} {}", m.label(), totals.get(m), m.unit()))
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn render_dashboard(snapshot: &DashboardSnapshot) -> String {
    let data = match snapshot {
        DashboardSnapshot::Loading => return LOADING.to_string(),
        DashboardSnapshot::SessionExpired => return SESSION_EXPIRED.to_string(),
        DashboardSnapshot::Error(e) => return e.clone(),
        DashboardSnapshot::Empty => return NO_DATA.to_string(),
        DashboardSnapshot::Ready(data) => data,
    };

    let max = data.points.iter().map(|p| p.value).fold(0.0, f64::max);
    let mut lines = vec![format!(
        "{} per day ({})",
        data.selected.label(),
        data.selected.unit()
    )];
    for p in &data.points {
        lines.push(format!(
            "{} | {:<width$} {:.1}",
            format_day(p.date),
            bar(p.value, max, BAR_WIDTH),
            p.value,
            width = BAR_WIDTH
        ));
    }
    lines.push(format!(
        "All-time average: {:.1} | 30-day average: {:.1} | 7-day average: {:.1}",
        data.averages.all_time, data.averages.last_30, data.averages.last_7
    ));
    lines.join("\n")
}

pub fn render_journal(snapshot: &JournalSnapshot) -> String {
    let mut lines = vec![format!("Meals of {}", format_day(snapshot.day))];
    match &snapshot.meals {
        ListState::Loading => lines.push(LOADING.to_string()),
        ListState::SessionExpired => lines.push(SESSION_EXPIRED.to_string()),
        ListState::Error(e) => lines.push(e.clone()),
        ListState::Empty => lines.push("No meals recorded for this day".to_string()),
        ListState::Ready(meals) => lines.extend(meals.iter().map(|m| format!("  {}", render_meal(m)))),
    }
    lines.push(format!("Total: {}", render_totals(&snapshot.totals)));
    match &snapshot.submit {
        SubmitStatus::Idle => {}
        SubmitStatus::Loading => lines.push("Adding meal...".to_string()),
        SubmitStatus::Success => lines.push("Meal added.".to_string()),
        SubmitStatus::Error(e) => lines.push(format!("Could not add meal: {e}")),
    }
    lines.join("\n")
}

pub fn render_stats(snapshot: &StatsSnapshot) -> String {
    let summary = match snapshot {
        StatsSnapshot::Loading => return LOADING.to_string(),
        StatsSnapshot::SessionExpired => return SESSION_EXPIRED.to_string(),
        StatsSnapshot::Error(e) => return e.clone(),
        StatsSnapshot::Empty => return "No data for this date".to_string(),
        StatsSnapshot::Ready(summary) => summary,
    };

    let mut lines = vec![format!("Daily statistics ({})", summary.stats.date)];
    for p in &summary.progress {
        lines.push(format!(
            "{:<14} {:>8.1} {:<4} [{:<20}] {:.1}% of {:.0}",
            p.nutrient.label(),
            p.value,
            p.nutrient.unit(),
            bar(p.percent, 100.0, 20),
            p.percent,
            p.goal
        ));
    }
    lines.push(format!("Meals recorded: {}", summary.stats.meal_count));
    lines.push(format!(
        "Average calories per meal: {:.0}",
        summary.calories_per_meal
    ));
    lines.push(format!("Total macronutrients: {:.1} g", summary.macro_grams));
    lines.join("\n")
}
