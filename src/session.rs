//! # Planner Session Module
//!
//! Line-oriented front end for the planner. The session owns the catalog
//! load state and is the only holder of a writable handle to the recipe
//! collection; every command is dispatched here and answered with
//! localized text.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};

use crate::catalog_loader::CatalogLoader;
use crate::clipboard::ClipboardSink;
use crate::load_state::{load_collection, LoadState};
use crate::localization::LocalizationManager;
use crate::menu_summary::format_menu;
use crate::planner_config::PlannerConfig;
use crate::planner_errors::PlannerError;
use crate::recipe_model::RecipeCollection;
use crate::shopping_list::{aggregate, clipboard_shopping_list, AggregatedIngredient};

/// Which text blob to copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    ShoppingList,
    Menu,
}

/// A parsed user command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    /// 1-based recipe number as typed, `None` if it was not a number
    Toggle(Option<usize>),
    Clear,
    Shopping,
    Menu,
    /// `None` when the target was missing or unknown
    Copy(Option<CopyTarget>),
    Reload,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse one input line; blank lines yield `None`
    ///
    /// A bare number is shorthand for `/toggle N`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let head = words.next()?;
        let argument = words.next();

        if let Ok(number) = head.parse::<usize>() {
            return Some(Command::Toggle(Some(number)));
        }

        let command = match head.trim_start_matches('/').to_ascii_lowercase().as_str() {
            "help" | "start" => Command::Help,
            "list" => Command::List,
            "toggle" => Command::Toggle(argument.and_then(|arg| arg.parse().ok())),
            "clear" => Command::Clear,
            "shopping" => Command::Shopping,
            "menu" => Command::Menu,
            "copy" => Command::Copy(match argument.map(str::to_ascii_lowercase).as_deref() {
                Some("shopping") => Some(CopyTarget::ShoppingList),
                Some("menu") => Some(CopyTarget::Menu),
                _ => None,
            }),
            "reload" => Command::Reload,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.trim().to_string()),
        };
        Some(command)
    }
}

/// Text to show the user after a command
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReply {
    pub text: String,
    /// The user asked to leave
    pub quit: bool,
}

impl SessionReply {
    fn text(text: String) -> Self {
        Self { text, quit: false }
    }
}

/// An interactive planning session
pub struct PlannerSession {
    loader: CatalogLoader,
    state: LoadState,
    l10n: LocalizationManager,
    language: &'static str,
    clipboard: Box<dyn ClipboardSink>,
    rng: StdRng,
    date_override: Option<NaiveDate>,
}

impl PlannerSession {
    /// Create a session in the `Loading` state; call [`PlannerSession::reload`] to load
    pub fn new(config: &PlannerConfig, clipboard: Box<dyn ClipboardSink>) -> Result<Self> {
        let l10n = LocalizationManager::new()?;
        let language = l10n.resolve_language(Some(config.language.as_str()));
        Ok(Self {
            loader: CatalogLoader::new(config)?,
            state: LoadState::Loading,
            l10n,
            language,
            clipboard,
            rng: StdRng::from_entropy(),
            date_override: None,
        })
    }

    /// Use a fixed random source for collection shuffles
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Use a fixed date in exported headers instead of today
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date_override = Some(date);
        self
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn language(&self) -> &str {
        self.language
    }

    fn today(&self) -> NaiveDate {
        self.date_override.unwrap_or_else(|| Local::now().date_naive())
    }

    fn t(&self, key: &str) -> String {
        self.l10n.t(key, self.language)
    }

    fn t_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.l10n.t_args(key, self.language, args)
    }

    /// (Re)load the catalog and rebuild the collection
    ///
    /// Any previous selection is discarded.
    pub async fn reload(&mut self) -> String {
        let source = self.loader.source().to_string();
        let mut lines = vec![self.t_args("status-loading", &[("source", &source)])];

        self.state = LoadState::Loading;
        let (state, report) = load_collection(&self.loader, &mut self.rng).await;
        self.state = state;

        match (&self.state, report) {
            (LoadState::Ready(collection), Some(report)) => {
                info!(source = %source, recipes = collection.len(), "Session ready");
                lines.push(self.t_args(
                    "status-ready",
                    &[("count", &collection.len().to_string()), ("source", &source)],
                ));
                if !report.rejected.is_empty() {
                    lines.push(self.t_args(
                        "status-rejected",
                        &[("count", &report.rejected.len().to_string())],
                    ));
                }
            }
            (LoadState::Failed(e), _) => {
                error!(source = %source, error = %e, "Catalog unavailable");
                lines.push(self.t_args("catalog-unavailable", &[("error", &e.to_string())]));
            }
            (state, _) => {
                warn!(state = ?state, "Unexpected state after load");
                lines.push(self.t("catalog-loading"));
            }
        }

        lines.join("\n")
    }

    /// Handle one line of user input
    pub async fn handle_line(&mut self, line: &str) -> Option<SessionReply> {
        let command = Command::parse(line)?;
        debug!(command = ?command, "Handling command");

        let reply = match command {
            Command::Help => SessionReply::text(self.help()),
            Command::List => SessionReply::text(self.with_collection(|session, c| session.render_list(c))),
            Command::Toggle(number) => SessionReply::text(self.toggle(number)),
            Command::Clear => SessionReply::text(self.clear()),
            Command::Shopping => SessionReply::text(self.with_collection(|session, c| session.render_shopping(c))),
            Command::Menu => SessionReply::text(self.with_collection(|session, c| format_menu(c, session.today()))),
            Command::Copy(target) => SessionReply::text(self.copy(target)),
            Command::Reload => SessionReply::text(self.reload().await),
            Command::Quit => SessionReply { text: self.t("goodbye"), quit: true },
            Command::Unknown(input) => {
                debug!(input = %input, "Unknown command");
                SessionReply::text(self.t("unknown-command"))
            }
        };
        Some(reply)
    }

    pub fn help(&self) -> String {
        [
            "help-title",
            "help-list",
            "help-toggle",
            "help-clear",
            "help-shopping",
            "help-menu",
            "help-copy",
            "help-reload",
            "help-quit",
        ]
        .iter()
        .map(|key| self.t(key))
        .collect::<Vec<_>>()
        .join("\n")
    }

    fn unavailable_message(&self, err: &PlannerError) -> String {
        match &self.state {
            LoadState::Loading => self.t("catalog-loading"),
            LoadState::Failed(e) => self.t_args("catalog-unavailable", &[("error", &e.to_string())]),
            LoadState::Ready(_) => err.to_string(),
        }
    }

    fn with_collection<F>(&self, render: F) -> String
    where
        F: FnOnce(&Self, &RecipeCollection) -> String,
    {
        match self.state.collection() {
            Ok(collection) => render(self, collection),
            Err(e) => self.unavailable_message(&e),
        }
    }

    fn render_list(&self, collection: &RecipeCollection) -> String {
        if collection.is_empty() {
            return self.t("list-empty");
        }

        let mut lines = Vec::new();
        let mut current_priority = None;
        for (index, recipe) in collection.iter().enumerate() {
            if current_priority != Some(recipe.priority) {
                current_priority = Some(recipe.priority);
                lines.push(self.t_args("priority-heading", &[("priority", &recipe.priority.to_string())]));
            }
            let marker = if recipe.selected { "[x]" } else { "[ ]" };
            lines.push(format!("  {:>2}. {} {}", index + 1, marker, recipe.recipe_name));
        }
        lines.join("\n")
    }

    fn render_shopping(&self, collection: &RecipeCollection) -> String {
        let aggregation = aggregate(collection);
        if aggregation.ingredients.is_empty() {
            return self.t("shopping-empty");
        }

        let conflict_notes: Vec<String> = aggregation
            .conflicts
            .iter()
            .map(|conflict| {
                self.t_args(
                    "conflict-warning",
                    &[
                        ("name", &conflict.name),
                        ("unit", &conflict.kept_unit),
                        ("department", &conflict.kept_department),
                    ],
                )
            })
            .collect();

        let mut lines: Vec<String> = aggregation
            .into_sorted()
            .iter()
            .map(AggregatedIngredient::line)
            .collect();
        if !conflict_notes.is_empty() {
            lines.push(String::new());
            lines.extend(conflict_notes);
        }
        lines.join("\n")
    }

    fn toggle(&mut self, number: Option<usize>) -> String {
        let collection = match self.state.collection_mut() {
            Ok(collection) => collection,
            Err(e) => return self.unavailable_message(&e),
        };
        let count = collection.len();
        if count == 0 {
            return self.t("list-empty");
        }

        let Some(index) = number.and_then(|n| n.checked_sub(1)) else {
            return self.t_args("toggle-invalid", &[("count", &count.to_string())]);
        };

        match collection.toggle(index) {
            Ok(selected) => {
                let recipe = collection[index].recipe_name.clone();
                info!(recipe = %recipe, selected, "Recipe toggled");
                let key = if selected { "toggle-selected" } else { "toggle-deselected" };
                self.t_args(key, &[("recipe", &recipe)])
            }
            Err(e) => {
                debug!(error = %e, "Toggle rejected");
                self.t_args("toggle-invalid", &[("count", &count.to_string())])
            }
        }
    }

    fn clear(&mut self) -> String {
        let collection = match self.state.collection_mut() {
            Ok(collection) => collection,
            Err(e) => return self.unavailable_message(&e),
        };

        let selected = collection.selected_indices();
        for index in &selected {
            if let Err(e) = collection.toggle(*index) {
                warn!(error = %e, "Failed to deselect recipe");
            }
        }
        info!(cleared = selected.len(), "Selection cleared");
        self.t_args("selection-cleared", &[("count", &selected.len().to_string())])
    }

    fn copy(&mut self, target: Option<CopyTarget>) -> String {
        let Some(target) = target else {
            return self.t("copy-usage");
        };

        let text = match self.state.collection() {
            Ok(collection) => match target {
                CopyTarget::ShoppingList => clipboard_shopping_list(collection, self.today()),
                CopyTarget::Menu => format_menu(collection, self.today()),
            },
            Err(e) => return self.unavailable_message(&e),
        };

        match self.clipboard.copy(&text) {
            Ok(()) => {
                info!(target = ?target, bytes = text.len(), "Copied to clipboard");
                format!("{}\n\n{}", self.t("copy-success"), text)
            }
            Err(e) => {
                error!(target = ?target, error = %e, "Clipboard copy failed");
                self.t("copy-error")
            }
        }
    }
}
