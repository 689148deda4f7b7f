//! # Shopping List Module
//!
//! Derives the shopping list from the selected recipes.
//!
//! ## Aggregation rules
//!
//! - Only recipes with `selected == true` contribute
//! - Ingredients are merged by exact name; amounts add up
//! - The unit and department of the first occurrence win. Later occurrences
//!   with a different unit or department are still summed, and the mismatch
//!   is reported as an [`IngredientConflict`]
//! - The list is ordered by department descending, then name ascending

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::clipboard::long_date;
use crate::recipe_model::{ingredient_line, Recipe};

/// One merged shopping list entry
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedIngredient {
    pub name: String,
    pub unit: String,
    pub amount: f64,
    pub department: String,
}

impl AggregatedIngredient {
    pub fn line(&self) -> String {
        ingredient_line(self.amount, &self.unit, &self.name)
    }
}

/// An ingredient seen with a unit or department differing from its first occurrence
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientConflict {
    pub name: String,
    /// Recipe in which the differing occurrence was found
    pub recipe_name: String,
    pub kept_unit: String,
    pub kept_department: String,
    pub found_unit: String,
    pub found_department: String,
}

/// Aggregated ingredients keyed by name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregation {
    pub ingredients: HashMap<String, AggregatedIngredient>,
    pub conflicts: Vec<IngredientConflict>,
}

impl Aggregation {
    /// Entries in shopping list order
    pub fn into_sorted(self) -> Vec<AggregatedIngredient> {
        let mut items: Vec<AggregatedIngredient> = self.ingredients.into_values().collect();
        items.sort_by(shopping_order);
        items
    }
}

/// Department descending, then name ascending
pub fn shopping_order(left: &AggregatedIngredient, right: &AggregatedIngredient) -> Ordering {
    right
        .department
        .cmp(&left.department)
        .then_with(|| left.name.cmp(&right.name))
}

/// Merge the ingredients of all selected recipes
///
/// # Examples
///
/// ```rust
/// use meal_planner::recipe_model::{Ingredient, Recipe};
/// use meal_planner::shopping_list::aggregate;
///
/// let mut soup = Recipe::new("Soup", 1).with_ingredient(Ingredient::new("Salt", "g", 5.0, "Pantry"));
/// let mut stew = Recipe::new("Stew", 1).with_ingredient(Ingredient::new("Salt", "g", 3.0, "Pantry"));
/// soup.selected = true;
/// stew.selected = true;
///
/// let aggregation = aggregate(&[soup, stew]);
/// assert_eq!(aggregation.ingredients["Salt"].amount, 8.0);
/// ```
pub fn aggregate(recipes: &[Recipe]) -> Aggregation {
    let mut aggregation = Aggregation::default();

    for recipe in recipes.iter().filter(|recipe| recipe.selected) {
        for ingredient in &recipe.ingredients {
            match aggregation.ingredients.get_mut(&ingredient.name) {
                None => {
                    aggregation.ingredients.insert(
                        ingredient.name.clone(),
                        AggregatedIngredient {
                            name: ingredient.name.clone(),
                            unit: ingredient.unit.clone(),
                            amount: ingredient.amount,
                            department: ingredient.department.clone(),
                        },
                    );
                }
                Some(entry) => {
                    entry.amount += ingredient.amount;
                    if entry.unit != ingredient.unit || entry.department != ingredient.department {
                        log::warn!(
                            "Ingredient '{}' in '{}' uses {}/{} but {}/{} was seen first; keeping the first",
                            ingredient.name,
                            recipe.recipe_name,
                            ingredient.unit,
                            ingredient.department,
                            entry.unit,
                            entry.department
                        );
                        aggregation.conflicts.push(IngredientConflict {
                            name: ingredient.name.clone(),
                            recipe_name: recipe.recipe_name.clone(),
                            kept_unit: entry.unit.clone(),
                            kept_department: entry.department.clone(),
                            found_unit: ingredient.unit.clone(),
                            found_department: ingredient.department.clone(),
                        });
                    }
                }
            }
        }
    }

    log::debug!(
        "Aggregated {} distinct ingredients with {} conflicts",
        aggregation.ingredients.len(),
        aggregation.conflicts.len()
    );
    aggregation
}

/// Sorted shopping list entries for the selected recipes
pub fn shopping_items(recipes: &[Recipe]) -> Vec<AggregatedIngredient> {
    aggregate(recipes).into_sorted()
}

/// Shopping list lines (`"<amount> <unit> <name>"`) for the selected recipes
pub fn shopping_list(recipes: &[Recipe]) -> Vec<String> {
    shopping_items(recipes).iter().map(AggregatedIngredient::line).collect()
}

/// Shopping list text for the clipboard, headed by the given date
pub fn clipboard_shopping_list(recipes: &[Recipe], date: NaiveDate) -> String {
    format!(
        "Shopping list for {}:\n{}",
        long_date(date),
        shopping_list(recipes).join("\n")
    )
}
