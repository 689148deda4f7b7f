//! # Menu Summary Module
//!
//! Renders the selected recipes as a plain-text menu for the clipboard:
//! a dated header listing every dish, then one block per recipe with its
//! ingredients, comment and priority.

use chrono::NaiveDate;

use crate::clipboard::long_date;
use crate::recipe_model::Recipe;

/// Separator printed under each recipe name
pub const SEPARATOR: &str = "--------------------";

/// Selected recipes ordered by priority, then name
///
/// Both sorts are stable, so recipes sharing a priority keep the name order
/// established by the first pass.
pub fn menu_order(recipes: &[Recipe]) -> Vec<&Recipe> {
    let mut selected: Vec<&Recipe> = recipes.iter().filter(|recipe| recipe.selected).collect();
    selected.sort_by(|left, right| left.recipe_name.cmp(&right.recipe_name));
    selected.sort_by_key(|recipe| recipe.priority);
    selected
}

/// Format the menu summary for the selected recipes
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use meal_planner::menu_summary::format_menu;
///
/// let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// assert_eq!(format_menu(&[], date), "Menu list starting from Monday, October 19, 2026:\n\n\n");
/// ```
pub fn format_menu(recipes: &[Recipe], date: NaiveDate) -> String {
    let ordered = menu_order(recipes);

    let names = ordered
        .iter()
        .map(|recipe| recipe.recipe_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
        .to_uppercase();

    let mut output = format!("Menu list starting from {}:\n{}\n\n", long_date(date), names);

    for recipe in &ordered {
        output.push_str(&recipe.recipe_name.to_uppercase());
        output.push('\n');
        output.push_str(SEPARATOR);
        output.push('\n');
        for ingredient in &recipe.ingredients {
            output.push_str(&format!("{ingredient}\n"));
        }
        output.push_str(&format!(
            "\n\"{}\" Priority {}\n\n\n",
            recipe.comment, recipe.priority
        ));
    }

    log::debug!("Formatted menu with {} recipes", ordered.len());
    output
}
