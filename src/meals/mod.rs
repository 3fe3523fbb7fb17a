pub mod dto;
pub mod form;

pub use dto::{DailyStats, MealRecord, MealType, MealUpdate, NewMeal};
pub use form::MealForm;
