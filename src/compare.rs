use crate::catalog::store::{RouteStore, SortOrder};
use crate::catalog::{ListQuery, RouteCatalog};
use crate::error::{Result, SafeRouteError};
use crate::types::route::ScoredRoute;
use tracing::debug;

/// Active routes between one source and destination, safest first.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteComparison {
    pub source: String,
    pub destination: String,
    pub routes: Vec<ScoredRoute>,
    pub safest_id: String,
    pub riskiest_id: String,
}

pub struct RouteComparator<'a, S> {
    catalog: &'a RouteCatalog<S>,
}

impl<'a, S: RouteStore> RouteComparator<'a, S> {
    pub fn new(catalog: &'a RouteCatalog<S>) -> Self {
        Self { catalog }
    }

    /// Ranks routes by ascending `final_score`; equal scores keep catalog order.
    pub fn compare(&self, source: &str, destination: &str) -> Result<RouteComparison> {
        if source.is_empty() {
            return Err(SafeRouteError::validation("source", "is required"));
        }
        if destination.is_empty() {
            return Err(SafeRouteError::validation("destination", "is required"));
        }

        let routes = self.catalog.list(&ListQuery {
            source: Some(source.to_string()),
            destination: Some(destination.to_string()),
            order: SortOrder::SAFEST_FIRST,
            ..ListQuery::default()
        })?;

        let (safest_id, riskiest_id) = match (routes.first(), routes.last()) {
            (Some(safest), Some(riskiest)) => (
                safest.route_id().to_string(),
                riskiest.route_id().to_string(),
            ),
            _ => {
                return Err(SafeRouteError::NotFound(format!(
                    "no active routes from {source} to {destination}"
                )))
            }
        };

        debug!(
            source,
            destination,
            candidates = routes.len(),
            safest = %safest_id,
            riskiest = %riskiest_id,
            "compared routes"
        );
        Ok(RouteComparison {
            source: source.to_string(),
            destination: destination.to_string(),
            routes,
            safest_id,
            riskiest_id,
        })
    }
}
