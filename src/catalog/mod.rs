pub mod json_file;
pub mod memory;
pub mod store;

use crate::error::{Result, SafeRouteError};
use crate::geometry;
use crate::types::route::{RouteInput, ScoredRoute};
use crate::types::weights::ScoreWeights;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use store::{RouteFilter, RouteQuery, RouteStore, SortOrder};
use tracing::{debug, info, warn};

/// Loosely typed create-or-update payload, as it arrives from a caller.
///
/// Scores and coordinates stay as raw JSON so a wrong type is reported as a
/// validation failure on the named field. JSON `null` counts as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertRequest {
    pub route_id: Option<String>,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub traffic_score: Option<Value>,
    pub crime_score: Option<Value>,
    pub weather_score: Option<Value>,
    pub source_coords: Option<Value>,
    pub destination_coords: Option<Value>,
    pub route_geometry: Option<Value>,
}

impl UpsertRequest {
    pub fn validate(&self) -> Result<RouteInput> {
        Ok(RouteInput {
            route_id: required_text("route_id", self.route_id.as_deref())?,
            source: required_text("source", self.source.as_deref())?,
            destination: required_text("destination", self.destination.as_deref())?,
            traffic_score: required_score("traffic_score", self.traffic_score.as_ref())?,
            crime_score: required_score("crime_score", self.crime_score.as_ref())?,
            weather_score: required_score("weather_score", self.weather_score.as_ref())?,
            source_point: present(self.source_coords.as_ref())
                .map(|value| geometry::parse_point("source_coords", value))
                .transpose()?,
            destination_point: present(self.destination_coords.as_ref())
                .map(|value| geometry::parse_point("destination_coords", value))
                .transpose()?,
            route_geometry: present(self.route_geometry.as_ref())
                .map(|value| geometry::parse_line_string("route_geometry", value))
                .transpose()?,
        })
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

fn required_text(field: &str, value: Option<&str>) -> Result<String> {
    match value {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(SafeRouteError::validation(field, "is required")),
    }
}

fn required_score(field: &str, value: Option<&Value>) -> Result<f64> {
    match present(value) {
        None => Err(SafeRouteError::validation(field, "is required")),
        Some(value) => value
            .as_f64()
            .filter(|score| score.is_finite())
            .ok_or_else(|| SafeRouteError::validation(field, "must be a number")),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOutcome {
    pub route: ScoredRoute,
    pub created: bool,
}

/// Listing parameters. Defaults to active routes, newest first, no limit.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub active_only: bool,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub order: SortOrder,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            active_only: true,
            source: None,
            destination: None,
            order: SortOrder::NEWEST_FIRST,
            offset: 0,
            limit: None,
        }
    }
}

impl ListQuery {
    /// 1-indexed page of `limit` routes.
    pub fn page(page: usize, limit: usize) -> Result<Self> {
        if page == 0 {
            return Err(SafeRouteError::validation("page", "must be at least 1"));
        }
        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| SafeRouteError::validation("page", "is out of range"))?;
        Ok(Self {
            offset,
            limit: Some(limit),
            ..Self::default()
        })
    }

    fn to_store_query(&self) -> RouteQuery {
        RouteQuery {
            filter: RouteFilter {
                source: self.source.clone(),
                destination: self.destination.clone(),
                is_active: self.active_only.then_some(true),
            },
            order: self.order,
            offset: self.offset,
            limit: self.limit,
        }
    }
}

/// Source of truth for scored routes, keyed by `route_id`.
///
/// The only write paths are [`RouteCatalog::upsert`] and
/// [`RouteCatalog::deactivate`], so a stored `final_score` always matches the
/// component scores saved with it. Both run their read-merge-save cycle through
/// [`RouteStore::update`], which the store serialises per write.
#[derive(Debug)]
pub struct RouteCatalog<S> {
    store: S,
    weights: ScoreWeights,
}

impl<S: RouteStore> RouteCatalog<S> {
    pub fn new(store: S, weights: ScoreWeights) -> Self {
        Self { store, weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates or updates the route named by `request.route_id`.
    ///
    /// `weights` overrides the catalog weights for this write only.
    pub fn upsert(
        &self,
        request: &UpsertRequest,
        weights: Option<&ScoreWeights>,
    ) -> Result<UpsertOutcome> {
        self.upsert_at(request, weights, Utc::now())
    }

    pub(crate) fn upsert_at(
        &self,
        request: &UpsertRequest,
        weights: Option<&ScoreWeights>,
        now: DateTime<Utc>,
    ) -> Result<UpsertOutcome> {
        let input = request.validate().map_err(|error| {
            warn!(error = %error, "rejected route upsert");
            error
        })?;
        let weights = weights.unwrap_or(&self.weights);

        let route_id = input.route_id.clone();
        let mut created = false;
        let route = self.store.update(&route_id, |existing| {
            Ok(match existing {
                Some(mut existing) => {
                    existing.apply(input, weights, now);
                    existing
                }
                None => {
                    created = true;
                    ScoredRoute::create(input, weights, now)
                }
            })
        })?;

        info!(
            route_id = route.route_id(),
            final_score = route.final_score(),
            created,
            "route {}",
            if created { "created" } else { "updated" }
        );
        Ok(UpsertOutcome { route, created })
    }

    /// Looks a route up whether or not it is active.
    pub fn get(&self, route_id: &str) -> Result<ScoredRoute> {
        self.store
            .find_by_id(route_id)?
            .ok_or_else(|| SafeRouteError::NotFound(format!("route {route_id}")))
    }

    pub fn list(&self, query: &ListQuery) -> Result<Vec<ScoredRoute>> {
        let routes = self.store.query(&query.to_store_query())?;
        debug!(
            order = %query.order,
            offset = query.offset,
            returned = routes.len(),
            "listed routes"
        );
        Ok(routes)
    }

    /// Soft-deletes a route: it stays retrievable by id but leaves listings
    /// and comparisons until it is upserted again.
    pub fn deactivate(&self, route_id: &str) -> Result<ScoredRoute> {
        self.deactivate_at(route_id, Utc::now())
    }

    pub(crate) fn deactivate_at(&self, route_id: &str, now: DateTime<Utc>) -> Result<ScoredRoute> {
        let route = self.store.update(route_id, |existing| {
            let mut route = existing
                .ok_or_else(|| SafeRouteError::NotFound(format!("route {route_id}")))?;
            route.deactivate(now);
            Ok(route)
        })?;
        info!(route_id, "route deactivated");
        Ok(route)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::memory::MemoryStore;
    use crate::types::route::tests::at;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    pub(crate) fn request(
        route_id: &str,
        source: &str,
        destination: &str,
        scores: [f64; 3],
    ) -> UpsertRequest {
        UpsertRequest {
            route_id: Some(route_id.to_string()),
            source: Some(source.to_string()),
            destination: Some(destination.to_string()),
            traffic_score: Some(json!(scores[0])),
            crime_score: Some(json!(scores[1])),
            weather_score: Some(json!(scores[2])),
            ..UpsertRequest::default()
        }
    }

    fn catalog() -> RouteCatalog<MemoryStore> {
        RouteCatalog::new(MemoryStore::new(), ScoreWeights::default())
    }

    #[test]
    fn repeated_payload_updates_without_changing_score() {
        let catalog = catalog();
        let payload = request("r1", "X", "Y", [4.0, 6.0, 2.0]);

        let first = catalog.upsert_at(&payload, None, at(0)).expect("create");
        let second = catalog.upsert_at(&payload, None, at(1)).expect("update");

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.route.final_score(), second.route.final_score());
        assert_eq!(second.route.created_at(), at(0));
        assert_eq!(second.route.updated_at(), at(1));
    }

    #[test]
    fn partial_update_keeps_geometry_and_rescores() {
        let catalog = catalog();
        let mut payload = request("r1", "X", "Y", [10.0, 10.0, 10.0]);
        payload.source_coords = Some(json!([76.38, 30.33]));
        payload.route_geometry = Some(json!([[76.38, 30.33], [76.40, 30.35]]));
        catalog.upsert_at(&payload, None, at(0)).expect("create");

        let update = request("r1", "X", "Y", [0.0, 0.0, 10.0]);
        let outcome = catalog.upsert_at(&update, None, at(1)).expect("update");

        assert!((outcome.route.final_score() - 2.0).abs() < 1e-9);
        let stored = catalog.get("r1").expect("stored route");
        assert_eq!(
            stored.route_geometry().map(geometry::line_coords),
            Some(vec![[76.38, 30.33], [76.40, 30.35]])
        );
        assert!(stored.source_point().is_some());
    }

    #[test]
    fn distinct_ids_never_collide() {
        let catalog = catalog();
        catalog
            .upsert_at(&request("a", "X", "Y", [1.0, 1.0, 1.0]), None, at(0))
            .expect("a");
        catalog
            .upsert_at(&request("b", "X", "Y", [2.0, 2.0, 2.0]), None, at(1))
            .expect("b");
        catalog
            .upsert_at(&request("a", "X", "Y", [3.0, 3.0, 3.0]), None, at(2))
            .expect("a again");

        let all = catalog
            .list(&ListQuery {
                active_only: false,
                ..ListQuery::default()
            })
            .expect("list");
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn non_numeric_score_is_rejected() {
        let catalog = catalog();
        let mut payload = request("r1", "X", "Y", [1.0, 1.0, 1.0]);
        payload.traffic_score = Some(json!("high"));

        let err = catalog.upsert(&payload, None).expect_err("should reject");
        assert!(
            matches!(err, SafeRouteError::Validation { ref field, .. } if field == "traffic_score")
        );
    }

    #[test]
    fn missing_and_empty_required_fields_are_rejected() {
        let catalog = catalog();
        let mut payload = request("r1", "X", "Y", [1.0, 1.0, 1.0]);
        payload.source = Some(String::new());
        assert!(matches!(
            catalog.upsert(&payload, None),
            Err(SafeRouteError::Validation { ref field, .. }) if field == "source"
        ));

        let mut payload = request("r1", "X", "Y", [1.0, 1.0, 1.0]);
        payload.weather_score = None;
        assert!(matches!(
            catalog.upsert(&payload, None),
            Err(SafeRouteError::Validation { ref field, .. }) if field == "weather_score"
        ));
    }

    #[test]
    fn malformed_geometry_leaves_existing_record_untouched() {
        let catalog = catalog();
        let original = catalog
            .upsert_at(&request("r1", "X", "Y", [1.0, 1.0, 1.0]), None, at(0))
            .expect("create")
            .route;

        let mut payload = request("r1", "X", "Z", [9.0, 9.0, 9.0]);
        payload.route_geometry = Some(json!([[0, 0]]));
        let err = catalog
            .upsert_at(&payload, None, at(1))
            .expect_err("single point line should fail");
        assert!(matches!(err, SafeRouteError::Validation { .. }));
        assert_eq!(catalog.get("r1").expect("stored"), original);
    }

    #[test]
    fn per_call_weights_override_catalog_weights() {
        let catalog = catalog();
        let weights = ScoreWeights::new(1.0, 0.0, 0.0);
        let outcome = catalog
            .upsert_at(&request("r1", "X", "Y", [7.0, 100.0, 100.0]), Some(&weights), at(0))
            .expect("create");
        assert!((outcome.route.final_score() - 7.0).abs() < 1e-9);
        assert_eq!(catalog.weights(), &ScoreWeights::default());
    }

    #[test]
    fn get_unknown_route_is_not_found() {
        let err = catalog().get("nonexistent").expect_err("should be missing");
        assert!(matches!(err, SafeRouteError::NotFound(_)));
    }

    #[test]
    fn deactivated_routes_leave_listing_but_remain_gettable() {
        let catalog = catalog();
        catalog
            .upsert_at(&request("a", "X", "Y", [1.0, 1.0, 1.0]), None, at(0))
            .expect("a");
        catalog
            .upsert_at(&request("b", "X", "Y", [1.0, 1.0, 1.0]), None, at(1))
            .expect("b");
        catalog.deactivate_at("a", at(2)).expect("deactivate");

        let listed = catalog.list(&ListQuery::default()).expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].route_id(), "b");
        assert!(!catalog.get("a").expect("still stored").is_active());

        let revived = catalog
            .upsert_at(&request("a", "X", "Y", [1.0, 1.0, 1.0]), None, at(3))
            .expect("reactivate");
        assert!(revived.route.is_active());
        assert!(!revived.created);
    }

    #[test]
    fn deactivate_unknown_route_is_not_found() {
        assert!(matches!(
            catalog().deactivate("ghost"),
            Err(SafeRouteError::NotFound(_))
        ));
    }

    #[test]
    fn list_pages_newest_first() {
        let catalog = catalog();
        for (second, id) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            catalog
                .upsert_at(&request(id, "X", "Y", [1.0, 1.0, 1.0]), None, at(second as u32))
                .expect("create");
        }

        let ids = |query: ListQuery| {
            catalog
                .list(&query)
                .expect("list")
                .iter()
                .map(|route| route.route_id().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(ListQuery::page(1, 2).expect("page")), vec!["e", "d"]);
        assert_eq!(ids(ListQuery::page(3, 2).expect("page")), vec!["a"]);
        assert!(ids(ListQuery::page(4, 2).expect("page")).is_empty());
        assert!(ids(ListQuery::page(1, 0).expect("empty page")).is_empty());
        assert!(ListQuery::page(0, 2).is_err());
    }

    #[test]
    fn concurrent_upserts_on_one_id_keep_a_single_consistent_record() {
        let catalog = Arc::new(catalog());
        let handles = (0..8u8)
            .map(|worker| {
                let catalog = Arc::clone(&catalog);
                thread::spawn(move || {
                    let score = f64::from(worker);
                    catalog
                        .upsert(&request("shared", "X", "Y", [score, score, score]), None)
                        .expect("upsert should succeed")
                })
            })
            .collect::<Vec<_>>();
        let created = handles
            .into_iter()
            .map(|handle| handle.join().expect("worker should finish"))
            .filter(|outcome| outcome.created)
            .count();

        assert_eq!(created, 1);
        let stored = catalog.get("shared").expect("stored");
        let expected = stored.traffic_score() * 0.3
            + stored.crime_score() * 0.5
            + stored.weather_score() * 0.2;
        assert!((stored.final_score() - expected).abs() < 1e-9);
    }
}
