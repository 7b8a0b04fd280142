// Wire payloads for the meals and diets services

use serde::{Deserialize, Serialize};

/// Creation payload for POST /dishes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewDish {
    pub name: String,
}

/// Creation payload for POST /meals
///
/// The three references are dish ids assigned by the server at dish
/// creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMeal {
    pub name: String,
    pub appetizer: i64,
    pub main: i64,
    pub dessert: i64,
}

/// Creation payload for POST /diets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewDiet {
    pub name: String,
    pub cal: f64,
    pub sodium: f64,
    pub sugar: f64,
}

/// Dish as returned by GET /dishes/{id|name}
///
/// The nutrition fields are computed server-side from the name. They are
/// optional here because the contract does not guarantee their presence
/// on every deployment; the query script renders absences as `N/A`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dish {
    pub name: String,
    #[serde(default)]
    pub cal: Option<f64>,
    #[serde(default)]
    pub sodium: Option<f64>,
    #[serde(default)]
    pub sugar: Option<f64>,
}

/// Meal as returned by GET /meals
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    pub name: String,
    #[serde(default)]
    pub appetizer: Option<i64>,
    #[serde(default)]
    pub main: Option<i64>,
    #[serde(default)]
    pub dessert: Option<i64>,
    /// Aggregate calories of the three referenced dishes
    #[serde(default)]
    pub cal: Option<f64>,
}

/// Diet as returned by GET /diets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diet {
    pub name: String,
    pub cal: f64,
    pub sodium: f64,
    pub sugar: f64,
}
