//! Client-side aggregation of meal records into per-day macro totals and
//! trailing-window averages.
//!
//! Everything here is pure: the same input always yields the same output, and
//! nothing is cached between calls.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::meals::MealRecord;

/// One of the five tracked nutritional quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Macro {
    #[default]
    Calories,
    Proteins,
    Carbohydrates,
    Fats,
    Fiber,
}

impl Macro {
    pub const ALL: [Macro; 5] = [
        Macro::Calories,
        Macro::Proteins,
        Macro::Carbohydrates,
        Macro::Fats,
        Macro::Fiber,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Macro::Calories => "Calories",
            Macro::Proteins => "Proteins",
            Macro::Carbohydrates => "Carbohydrates",
            Macro::Fats => "Fats",
            Macro::Fiber => "Fiber",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Macro::Calories => "kcal",
            _ => "g",
        }
    }

    /// Value of this macro on a single meal; missing or non-finite counts as zero.
    pub fn of(self, meal: &MealRecord) -> f64 {
        let v = match self {
            Macro::Calories => meal.calories,
            Macro::Proteins => meal.proteins,
            Macro::Carbohydrates => meal.carbohydrates,
            Macro::Fats => meal.fats,
            Macro::Fiber => meal.fiber,
        };
        v.filter(|x| x.is_finite()).unwrap_or(0.0)
    }
}

impl fmt::Display for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Macro {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "calories" | "kcal" => Ok(Macro::Calories),
            "proteins" | "protein" => Ok(Macro::Proteins),
            "carbohydrates" | "carbs" => Ok(Macro::Carbohydrates),
            "fats" | "fat" => Ok(Macro::Fats),
            "fiber" | "fibre" => Ok(Macro::Fiber),
            other => Err(format!("unknown macro {other:?}")),
        }
    }
}

/// Running sums of the five macros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub proteins: f64,
    pub carbohydrates: f64,
    pub fats: f64,
    pub fiber: f64,
}

impl MacroTotals {
    pub fn add(&mut self, meal: &MealRecord) {
        self.calories += Macro::Calories.of(meal);
        self.proteins += Macro::Proteins.of(meal);
        self.carbohydrates += Macro::Carbohydrates.of(meal);
        self.fats += Macro::Fats.of(meal);
        self.fiber += Macro::Fiber.of(meal);
    }

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

/// Sum of every macro over one calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTotal {
    pub date: Date,
    pub macros: MacroTotals,
}

impl DailyTotal {
    pub fn get(&self, m: Macro) -> f64 {
        self.macros.get(m)
    }
}

/// Trailing window over the daily totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Days(usize),
    All,
}

/// Groups meals by calendar day and sums each macro. Meals without a usable
/// date are dropped. Output is ascending by date with one entry per distinct day.
pub fn aggregate_by_day(records: &[MealRecord]) -> Vec<DailyTotal> {
    let mut by_day: BTreeMap<Date, MacroTotals> = BTreeMap::new();
    for meal in records {
        let Some(day) = meal.day() else {
            continue;
        };
        by_day.entry(day).or_default().add(meal);
    }
    by_day
        .into_iter()
        .map(|(date, macros)| DailyTotal { date, macros })
        .collect()
}

/// Sum over all given meals regardless of date.
pub fn sum_macros(records: &[MealRecord]) -> MacroTotals {
    records.iter().fold(MacroTotals::default(), |mut acc, meal| {
        acc.add(meal);
        acc
    })
}

/// Last `n` entries (clamped, never padded), or everything for `Window::All`.
pub fn select_window<T>(totals: &[T], window: Window) -> &[T] {
    match window {
        Window::Days(n) => &totals[totals.len().saturating_sub(n)..],
        Window::All => totals,
    }
}

/// Arithmetic mean, 0 for an empty slice.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RollingAverages {
    pub last_7: f64,
    pub last_30: f64,
    pub all_time: f64,
}

pub fn rolling_averages(totals: &[DailyTotal], m: Macro) -> RollingAverages {
    let avg = |window| {
        let values: Vec<f64> = select_window(totals, window)
            .iter()
            .map(|d| d.get(m))
            .collect();
        average(&values)
    };
    RollingAverages {
        last_7: avg(Window::Days(7)),
        last_30: avg(Window::Days(30)),
        all_time: avg(Window::All),
    }
}
