//! Catalog load state exposed to the user interface.

use rand::Rng;

use crate::catalog_loader::{CatalogLoader, LoadReport};
use crate::collection_builder::build_collection;
use crate::planner_errors::{CatalogError, PlannerError};
use crate::recipe_model::RecipeCollection;

/// Where the session is in loading its recipe catalog
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// A load is in progress, no collection yet
    Loading,
    /// The last load failed; the catalog is unavailable
    Failed(CatalogError),
    /// Catalog loaded and ordered for display
    Ready(RecipeCollection),
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    pub fn collection(&self) -> Result<&RecipeCollection, PlannerError> {
        match self {
            LoadState::Ready(collection) => Ok(collection),
            LoadState::Loading => Err(PlannerError::CatalogUnavailable("still loading".to_string())),
            LoadState::Failed(e) => Err(PlannerError::CatalogUnavailable(e.to_string())),
        }
    }

    /// Writable handle for the selection toggle
    pub fn collection_mut(&mut self) -> Result<&mut RecipeCollection, PlannerError> {
        match self {
            LoadState::Ready(collection) => Ok(collection),
            LoadState::Loading => Err(PlannerError::CatalogUnavailable("still loading".to_string())),
            LoadState::Failed(e) => Err(PlannerError::CatalogUnavailable(e.to_string())),
        }
    }
}

/// Run a load and build the display collection
///
/// Never fails: a failed load becomes `LoadState::Failed`.
pub async fn load_collection<R: Rng + ?Sized>(
    loader: &CatalogLoader,
    rng: &mut R,
) -> (LoadState, Option<LoadReport>) {
    match loader.load().await {
        Ok((recipes, report)) => (LoadState::Ready(build_collection(recipes, rng)), Some(report)),
        Err(e) => (LoadState::Failed(e), None),
    }
}
