use crate::compare::RouteComparison;
use crate::geometry;
use crate::types::route::ScoredRoute;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct UpsertSummary {
    pub route_id: String,
    pub final_score: f64,
    pub created: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteDetail {
    pub route_id: String,
    pub source: String,
    pub destination: String,
    pub source_coords: Option<[f64; 2]>,
    pub destination_coords: Option<[f64; 2]>,
    pub route_geometry: Option<Vec<[f64; 2]>>,
    pub length_m: Option<f64>,
    pub traffic_score: f64,
    pub crime_score: f64,
    pub weather_score: f64,
    pub final_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl From<&ScoredRoute> for RouteDetail {
    fn from(route: &ScoredRoute) -> Self {
        Self {
            route_id: route.route_id().to_string(),
            source: route.source().to_string(),
            destination: route.destination().to_string(),
            source_coords: route.source_point().map(geometry::point_coords),
            destination_coords: route.destination_point().map(geometry::point_coords),
            route_geometry: route.route_geometry().map(geometry::line_coords),
            length_m: route.route_geometry().map(geometry::length_meters),
            traffic_score: route.traffic_score(),
            crime_score: route.crime_score(),
            weather_score: route.weather_score(),
            final_score: route.final_score(),
            created_at: route.created_at(),
            updated_at: route.updated_at(),
            is_active: route.is_active(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    pub route_id: String,
    pub source: String,
    pub destination: String,
    pub final_score: f64,
    pub created_at: DateTime<Utc>,
}

impl From<&ScoredRoute> for RouteSummary {
    fn from(route: &ScoredRoute) -> Self {
        Self {
            route_id: route.route_id().to_string(),
            source: route.source().to_string(),
            destination: route.destination().to_string(),
            final_score: route.final_score(),
            created_at: route.created_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutePage {
    pub page: usize,
    pub limit: usize,
    pub routes: Vec<RouteSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparedRoute {
    pub route_id: String,
    pub traffic_score: f64,
    pub crime_score: f64,
    pub weather_score: f64,
    pub final_score: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub source: String,
    pub destination: String,
    pub routes: Vec<ComparedRoute>,
    pub safest_route_id: String,
    pub riskiest_route_id: String,
}

impl From<&RouteComparison> for ComparisonReport {
    fn from(comparison: &RouteComparison) -> Self {
        Self {
            source: comparison.source.clone(),
            destination: comparison.destination.clone(),
            routes: comparison
                .routes
                .iter()
                .map(|route| ComparedRoute {
                    route_id: route.route_id().to_string(),
                    traffic_score: route.traffic_score(),
                    crime_score: route.crime_score(),
                    weather_score: route.weather_score(),
                    final_score: route.final_score(),
                    created_at: route.created_at(),
                })
                .collect(),
            safest_route_id: comparison.safest_id.clone(),
            riskiest_route_id: comparison.riskiest_id.clone(),
        }
    }
}

/// Everything a subcommand can print.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Output {
    Upsert(UpsertSummary),
    Detail(Box<RouteDetail>),
    Page(RoutePage),
    Comparison(ComparisonReport),
}
