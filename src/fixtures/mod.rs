//! Fixture catalog for populating the remote store.
//!
//! A [`FixtureSet`] is an ordered description of dishes, meals, and diets.
//! Order is load-bearing: dishes must be created before meals because meal
//! records reference dish ids by their creation order (1-based), and diets
//! load last. The built-in catalog mirrors the canonical population data;
//! alternative sets can be supplied as JSON files.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::HarnessError;

/// A dish to create. Nutrition is computed server-side from the name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DishFixture {
    pub name: String,
}

/// A meal to create. References are 1-based positions in the dish list,
/// which match the ids the server assigns when loading an empty store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealFixture {
    pub name: String,
    pub appetizer: i64,
    pub main: i64,
    pub dessert: i64,
}

/// A diet threshold profile to create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DietFixture {
    pub name: String,
    pub cal: f64,
    pub sodium: f64,
    pub sugar: f64,
}

/// Ordered fixture catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FixtureSet {
    #[serde(default)]
    pub dishes: Vec<DishFixture>,
    #[serde(default)]
    pub meals: Vec<MealFixture>,
    #[serde(default)]
    pub diets: Vec<DietFixture>,
}

static BUILTIN: Lazy<FixtureSet> = Lazy::new(|| {
    let dishes = [
        "100g Chicken Breast",
        "100g Salmon",
        "100g Beef",
        "100g Pork",
        "100g Tofu",
        "200g Broccoli",
        "200g Carrots",
        "200g Spinach",
        "150g Rice",
        "150g Pasta",
        "150g Potatoes",
        "150g Vanilla Ice Cream",
        "150g Chocolate Ice Cream",
        "150g Strawberry Ice Cream",
    ]
    .into_iter()
    .map(|name| DishFixture {
        name: name.to_string(),
    })
    .collect();

    let meals = vec![
        meal("Breakfast", 1, 2, 3),
        meal("Lunch", 4, 5, 6),
        meal("Dinner", 7, 8, 9),
        meal("Snack", 12, 13, 14),
    ];

    let diets = vec![
        diet("Keto", 2000.0, 2000.0, 2000.0),
        diet("Paleo", 1000.0, 500.0, 200.0),
        diet("Vegan", 1500.0, 1000.0, 1000.0),
        diet("Sugar Free", 2000.0, 2000.0, 0.0),
        diet("Low Sodium", 2000.0, 100.0, 2000.0),
    ];

    FixtureSet {
        dishes,
        meals,
        diets,
    }
});

fn meal(name: &str, appetizer: i64, main: i64, dessert: i64) -> MealFixture {
    MealFixture {
        name: name.to_string(),
        appetizer,
        main,
        dessert,
    }
}

fn diet(name: &str, cal: f64, sodium: f64, sugar: f64) -> DietFixture {
    DietFixture {
        name: name.to_string(),
        cal,
        sodium,
        sugar,
    }
}

impl FixtureSet {
    /// The canonical catalog: 14 dishes, 4 meals, 5 diets.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Load a fixture set from a JSON file and validate it.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, HarnessError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| HarnessError::Io {
            path: path.display().to_string(),
            details: err.to_string(),
        })?;
        let set: FixtureSet =
            serde_json::from_str(&contents).map_err(|err| HarnessError::InvalidFixture {
                details: format!("{}: {}", path.display(), err),
            })?;
        set.validate()?;
        Ok(set)
    }

    /// Validate invariants the loader depends on: unique dish and diet
    /// names, and meal references that stay inside the dish list.
    pub fn validate(&self) -> Result<(), HarnessError> {
        let mut dish_names = HashSet::new();
        for dish in &self.dishes {
            if dish.name.trim().is_empty() {
                return Err(HarnessError::InvalidFixture {
                    details: "dish with empty name".to_string(),
                });
            }
            if !dish_names.insert(dish.name.as_str()) {
                return Err(HarnessError::InvalidFixture {
                    details: format!("duplicate dish name {:?}", dish.name),
                });
            }
        }

        let dish_count = self.dishes.len() as i64;
        for meal in &self.meals {
            for (slot, reference) in [
                ("appetizer", meal.appetizer),
                ("main", meal.main),
                ("dessert", meal.dessert),
            ] {
                if reference < 1 || reference > dish_count {
                    return Err(HarnessError::InvalidFixture {
                        details: format!(
                            "meal {:?} {} references dish {} (set has {})",
                            meal.name, slot, reference, dish_count
                        ),
                    });
                }
            }
        }

        let mut diet_names = HashSet::new();
        for diet in &self.diets {
            if !diet_names.insert(diet.name.as_str()) {
                return Err(HarnessError::InvalidFixture {
                    details: format!("duplicate diet name {:?}", diet.name),
                });
            }
        }

        Ok(())
    }

    /// Total number of records the loader will post.
    pub fn record_count(&self) -> usize {
        self.dishes.len() + self.meals.len() + self.diets.len()
    }
}
