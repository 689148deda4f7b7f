//! # Meal Planner
//!
//! Loads a recipe catalog, lets the user pick recipes for the coming days,
//! and derives a department-sorted shopping list and a menu summary from
//! the selection.

pub mod catalog;
pub mod catalog_loader;
pub mod circuit_breaker;
pub mod clipboard;
pub mod collection_builder;
pub mod load_state;
pub mod localization;
pub mod menu_summary;
pub mod planner_config;
pub mod planner_errors;
pub mod recipe_model;
pub mod session;
pub mod shopping_list;
