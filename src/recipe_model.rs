//! # Recipe Data Model
//!
//! This module defines the data structures shared by the planner: ingredients,
//! recipes with their selection flag, and the owned recipe collection that the
//! UI layer toggles.
//!
//! ## Core Concepts
//!
//! - **Ingredient**: a named amount with a unit and the store department it is bought in
//! - **Recipe**: a named dish with a priority, a comment and an ordered ingredient list
//! - **RecipeCollection**: the session's recipes in display order; only `toggle`
//!   mutates it, everything else reads through `Deref<Target = [Recipe]>`
//!
//! ## Usage
//!
//! ```rust
//! use meal_planner::recipe_model::{Ingredient, Recipe, RecipeCollection};
//!
//! let soup = Recipe::new("Soup", 1)
//!     .with_ingredient(Ingredient::new("Salt", "g", 5.0, "Pantry"));
//!
//! let mut collection = RecipeCollection::from_ordered(vec![soup]);
//! collection.toggle(0)?;
//! assert_eq!(collection.selected().count(), 1);
//! # Ok::<(), meal_planner::planner_errors::PlannerError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

use crate::planner_errors::PlannerError;

/// One ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient name, the aggregation key (e.g., "Salt", "Carrots")
    pub name: String,
    /// Unit of the amount (e.g., "g", "ml", "pcs")
    pub unit: String,
    /// Amount in `unit`
    pub amount: f64,
    /// Store department (e.g., "Pantry", "Produce")
    pub department: String,
}

/// A dish in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub recipe_name: String,
    /// Grouping and ordering key, lower comes first
    pub priority: i64,
    pub comment: String,
    pub ingredients: Vec<Ingredient>,
    /// Whether the recipe is part of the current plan
    #[serde(default)]
    pub selected: bool,
}

impl Ingredient {
    pub fn new(name: &str, unit: &str, amount: f64, department: &str) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            amount,
            department: department.to_string(),
        }
    }
}

impl Recipe {
    /// Create an unselected recipe without comment or ingredients
    pub fn new(recipe_name: &str, priority: i64) -> Self {
        Self {
            recipe_name: recipe_name.to_string(),
            priority,
            comment: String::new(),
            ingredients: Vec::new(),
            selected: false,
        }
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    pub fn with_ingredient(mut self, ingredient: Ingredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }
}

/// Format an amount the way the shopping list prints numbers
///
/// Whole numbers print without a decimal point, everything else uses the
/// shortest representation that round-trips (`0.5`, `1.25`). Magnitudes of
/// at least `1e21` or below `1e-6` switch to exponent form (`1e+21`, `1e-7`).
///
/// # Examples
///
/// ```rust
/// use meal_planner::recipe_model::format_amount;
///
/// assert_eq!(format_amount(8.0), "8");
/// assert_eq!(format_amount(0.25), "0.25");
/// ```
pub fn format_amount(amount: f64) -> String {
    if amount == 0.0 {
        // Avoids "-0"
        return "0".to_string();
    }

    let magnitude = amount.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        // Exponent form with an explicit sign, as in `1e+21` or `2.5e-7`
        let exponential = format!("{amount:e}");
        return match exponential.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => exponential,
        };
    }
    format!("{amount}")
}

/// Render a single `"<amount> <unit> <name>"` line
pub fn ingredient_line(amount: f64, unit: &str, name: &str) -> String {
    format!("{} {} {}", format_amount(amount), unit, name)
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ingredient_line(self.amount, &self.unit, &self.name))
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.recipe_name)
    }
}

/// The session's recipes in display order
///
/// The structure is fixed once built; the only mutation is flipping a
/// recipe's `selected` flag through [`RecipeCollection::toggle`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecipeCollection {
    recipes: Vec<Recipe>,
}

impl RecipeCollection {
    /// Wrap recipes that are already in display order
    pub fn from_ordered(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// Flip the `selected` flag of the recipe at `index`
    ///
    /// Returns the new value of the flag.
    pub fn toggle(&mut self, index: usize) -> Result<bool, PlannerError> {
        let len = self.recipes.len();
        let recipe = self
            .recipes
            .get_mut(index)
            .ok_or(PlannerError::IndexOutOfRange { index, len })?;
        recipe.selected = !recipe.selected;
        log::debug!("Toggled '{}' to selected={}", recipe.recipe_name, recipe.selected);
        Ok(recipe.selected)
    }

    /// Recipes currently part of the plan, in display order
    pub fn selected(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter().filter(|recipe| recipe.selected)
    }

    /// Indices of the selected recipes
    pub fn selected_indices(&self) -> Vec<usize> {
        self.recipes
            .iter()
            .enumerate()
            .filter(|(_, recipe)| recipe.selected)
            .map(|(index, _)| index)
            .collect()
    }
}

impl Deref for RecipeCollection {
    type Target = [Recipe];

    fn deref(&self) -> &[Recipe] {
        &self.recipes
    }
}
