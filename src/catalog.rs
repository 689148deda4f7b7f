//! # Catalog Parsing Module
//!
//! This module turns the raw catalog body (a JSON array of recipe records)
//! into validated [`Recipe`] values.
//!
//! Records are validated one at a time. A malformed record is rejected with
//! a [`RejectReason`] and reported back to the caller; it never turns into a
//! recipe with a missing or non-numeric priority. Only a body that is not a
//! JSON array fails the whole parse.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use crate::planner_errors::CatalogError;
use crate::recipe_model::{Ingredient, Recipe};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecipe {
    recipe_name: Option<String>,
    priority: Option<Value>,
    comment: Option<String>,
    ingredients: Option<Vec<RawIngredient>>,
}

#[derive(Debug, Deserialize)]
struct RawIngredient {
    name: Option<String>,
    unit: Option<String>,
    amount: Option<Value>,
    department: Option<String>,
}

/// Why a catalog record was not accepted
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// Record is not an object of the expected shape
    Malformed(String),
    /// A required recipe field is absent
    MissingField(&'static str),
    /// Priority present but not an integer
    InvalidPriority(String),
    /// An ingredient lacks a required field
    MissingIngredientField { position: usize, field: &'static str },
    /// An ingredient amount is not a finite number
    InvalidAmount { ingredient: String, value: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Malformed(msg) => write!(f, "malformed record: {msg}"),
            RejectReason::MissingField(field) => write!(f, "missing field '{field}'"),
            RejectReason::InvalidPriority(value) => write!(f, "priority {value} is not an integer"),
            RejectReason::MissingIngredientField { position, field } => {
                write!(f, "ingredient #{} is missing '{field}'", position + 1)
            }
            RejectReason::InvalidAmount { ingredient, value } => {
                write!(f, "amount {value} of '{ingredient}' is not a number")
            }
        }
    }
}

/// A catalog record that failed validation
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// Position of the record in the catalog array
    pub index: usize,
    /// Recipe name, when the record had a readable one
    pub recipe_name: Option<String>,
    pub reason: RejectReason,
}

impl fmt::Display for RejectedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.recipe_name {
            Some(name) => write!(f, "record #{} ('{}'): {}", self.index, name, self.reason),
            None => write!(f, "record #{}: {}", self.index, self.reason),
        }
    }
}

/// Result of parsing a catalog body
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedCatalog {
    /// Valid recipes in catalog order, all unselected
    pub recipes: Vec<Recipe>,
    pub rejected: Vec<RejectedRecord>,
}

/// Parse a catalog body into recipes
///
/// # Errors
///
/// Returns `CatalogError::Parse` when the body is not valid JSON or not an
/// array. Individual bad records end up in `ParsedCatalog::rejected`.
///
/// # Examples
///
/// ```rust
/// use meal_planner::catalog::parse_catalog;
///
/// let body = r#"[
///     {"recipeName": "Soup", "priority": "1", "comment": "",
///      "ingredients": [{"name": "Salt", "unit": "g", "amount": 5, "department": "Pantry"}]},
///     {"recipeName": "Mystery", "priority": "soon", "ingredients": []}
/// ]"#;
///
/// let catalog = parse_catalog(body)?;
/// assert_eq!(catalog.recipes.len(), 1);
/// assert_eq!(catalog.recipes[0].priority, 1);
/// assert_eq!(catalog.rejected.len(), 1);
/// # Ok::<(), meal_planner::planner_errors::CatalogError>(())
/// ```
pub fn parse_catalog(body: &str) -> Result<ParsedCatalog, CatalogError> {
    let value: Value = serde_json::from_str(body)?;
    let records = match value {
        Value::Array(records) => records,
        other => {
            return Err(CatalogError::Parse(format!(
                "expected a JSON array of recipes, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut catalog = ParsedCatalog::default();
    for (index, record) in records.into_iter().enumerate() {
        let recipe_name = record
            .get("recipeName")
            .and_then(Value::as_str)
            .map(str::to_string);

        match validate_record(record) {
            Ok(recipe) => catalog.recipes.push(recipe),
            Err(reason) => {
                let rejected = RejectedRecord { index, recipe_name, reason };
                log::warn!("Rejected catalog {rejected}");
                catalog.rejected.push(rejected);
            }
        }
    }

    log::info!(
        "Parsed catalog: {} recipes accepted, {} rejected",
        catalog.recipes.len(),
        catalog.rejected.len()
    );
    Ok(catalog)
}

fn validate_record(record: Value) -> Result<Recipe, RejectReason> {
    let raw: RawRecipe =
        serde_json::from_value(record).map_err(|e| RejectReason::Malformed(e.to_string()))?;

    let recipe_name = raw.recipe_name.ok_or(RejectReason::MissingField("recipeName"))?;
    let priority = parse_priority(raw.priority.as_ref().ok_or(RejectReason::MissingField("priority"))?)?;
    let raw_ingredients = raw.ingredients.ok_or(RejectReason::MissingField("ingredients"))?;

    let ingredients = raw_ingredients
        .into_iter()
        .enumerate()
        .map(|(position, ingredient)| validate_ingredient(position, ingredient))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Recipe {
        recipe_name,
        priority,
        comment: raw.comment.unwrap_or_default(),
        ingredients,
        selected: false,
    })
}

fn validate_ingredient(position: usize, raw: RawIngredient) -> Result<Ingredient, RejectReason> {
    let missing = |field: &'static str| RejectReason::MissingIngredientField { position, field };

    let name = raw.name.ok_or_else(|| missing("name"))?;
    let unit = raw.unit.ok_or_else(|| missing("unit"))?;
    let department = raw.department.ok_or_else(|| missing("department"))?;
    let amount = raw.amount.ok_or_else(|| missing("amount"))?;

    let amount = amount
        .as_f64()
        .filter(|value| value.is_finite())
        .ok_or_else(|| RejectReason::InvalidAmount {
            ingredient: name.clone(),
            value: amount.to_string(),
        })?;

    Ok(Ingredient { name, unit, amount, department })
}

/// Interpret a catalog priority value as an integer
///
/// Accepts JSON integers, floats without a fractional part, and strings
/// that parse as an integer once trimmed (`"2"`, `" 3 "`).
pub fn parse_priority(value: &Value) -> Result<i64, RejectReason> {
    let invalid = || RejectReason::InvalidPriority(value.to_string());
    match value {
        Value::Number(number) => {
            if let Some(priority) = number.as_i64() {
                Ok(priority)
            } else {
                number
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
                    .ok_or_else(invalid)
            }
        }
        Value::String(text) => text.trim().parse::<i64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_priority_forms() {
        assert_eq!(parse_priority(&json!(2)), Ok(2));
        assert_eq!(parse_priority(&json!("3")), Ok(3));
        assert_eq!(parse_priority(&json!(" 4 ")), Ok(4));
        assert_eq!(parse_priority(&json!(5.0)), Ok(5));
        assert_eq!(parse_priority(&json!(-1)), Ok(-1));
    }

    #[test]
    fn test_priority_rejections() {
        assert!(matches!(parse_priority(&json!("soon")), Err(RejectReason::InvalidPriority(_))));
        assert!(matches!(parse_priority(&json!(1.5)), Err(RejectReason::InvalidPriority(_))));
        assert!(matches!(parse_priority(&json!(null)), Err(RejectReason::InvalidPriority(_))));
        assert!(matches!(parse_priority(&json!("")), Err(RejectReason::InvalidPriority(_))));
    }

    #[test]
    fn test_missing_comment_defaults_to_empty() {
        let body = r#"[{"recipeName":"Toast","priority":1,"ingredients":[]}]"#;
        let catalog = parse_catalog(body).unwrap();
        assert_eq!(catalog.recipes[0].comment, "");
        assert!(catalog.rejected.is_empty());
    }

    #[test]
    fn test_record_level_rejections() {
        let body = r#"[
            {"priority": 1, "ingredients": []},
            {"recipeName": "NoPriority", "ingredients": []},
            {"recipeName": "NoIngredients", "priority": 1},
            {"recipeName": "BadAmount", "priority": 1,
             "ingredients": [{"name": "Milk", "unit": "ml", "amount": "lots", "department": "Dairy"}]},
            {"recipeName": "NoUnit", "priority": 1,
             "ingredients": [{"name": "Egg", "amount": 2, "department": "Dairy"}]},
            "not a record"
        ]"#;

        let catalog = parse_catalog(body).unwrap();
        assert!(catalog.recipes.is_empty());

        let reasons: Vec<RejectReason> = catalog.rejected.iter().map(|r| r.reason.clone()).collect();
        assert_eq!(reasons[0], RejectReason::MissingField("recipeName"));
        assert_eq!(reasons[1], RejectReason::MissingField("priority"));
        assert_eq!(reasons[2], RejectReason::MissingField("ingredients"));
        assert_eq!(
            reasons[3],
            RejectReason::InvalidAmount { ingredient: "Milk".to_string(), value: "\"lots\"".to_string() }
        );
        assert_eq!(reasons[4], RejectReason::MissingIngredientField { position: 0, field: "unit" });
        assert!(matches!(reasons[5], RejectReason::Malformed(_)));

        assert_eq!(catalog.rejected[1].recipe_name.as_deref(), Some("NoPriority"));
        assert_eq!(catalog.rejected[5].index, 5);
    }

    #[test]
    fn test_non_array_body_is_a_parse_error() {
        assert!(matches!(parse_catalog(r#"{"recipes": []}"#), Err(CatalogError::Parse(_))));
        assert!(matches!(parse_catalog("<html>"), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_empty_array_is_an_empty_catalog() {
        assert_eq!(parse_catalog("[]").unwrap(), ParsedCatalog::default());
    }
}
