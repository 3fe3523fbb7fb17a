use time::Date;

use super::dto::{MealType, NewMeal};
use crate::error::FormError;

/// Raw meal-entry input, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct MealForm {
    pub calories: String,
    pub proteins: String,
    pub carbohydrates: String,
    pub fats: String,
    pub fiber: String,
    pub meal_type: String,
    pub name: String,
    pub description: String,
}

impl MealForm {
    /// Validates the form and builds the payload for `day` (midnight UTC).
    /// A blank name falls back to the meal type.
    pub fn into_new_meal(self, day: Date) -> Result<NewMeal, FormError> {
        let required = [
            &self.calories,
            &self.proteins,
            &self.carbohydrates,
            &self.fats,
            &self.fiber,
            &self.meal_type,
        ];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err(FormError::MissingFields);
        }

        let meal_type: MealType = self
            .meal_type
            .parse()
            .map_err(|_| FormError::UnknownMealType(self.meal_type.clone()))?;

        let name = match self.name.trim() {
            "" => meal_type.as_str().to_string(),
            n => n.to_string(),
        };
        let description = Some(self.description.trim().to_string()).filter(|d| !d.is_empty());

        Ok(NewMeal {
            name,
            description,
            calories: number("calories", &self.calories)?,
            proteins: number("proteins", &self.proteins)?,
            carbohydrates: number("carbohydrates", &self.carbohydrates)?,
            fats: number("fats", &self.fats)?,
            fiber: number("fiber", &self.fiber)?,
            meal_type,
            date: day.midnight().assume_utc(),
        })
    }
}

fn number(field: &'static str, raw: &str) -> Result<f64, FormError> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FormError::NotANumber {
            field,
            value: raw.to_string(),
        })
}
