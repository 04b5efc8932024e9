use crate::geometry;
use crate::scoring::compute_final_score;
use crate::types::weights::ScoreWeights;
use chrono::{DateTime, Utc};
use geo::{LineString, Point};
use serde::{Deserialize, Serialize};

/// Validated write payload. Geometry fields left as `None` keep whatever the
/// stored record already has.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteInput {
    pub route_id: String,
    pub source: String,
    pub destination: String,
    pub traffic_score: f64,
    pub crime_score: f64,
    pub weather_score: f64,
    pub source_point: Option<Point<f64>>,
    pub destination_point: Option<Point<f64>>,
    pub route_geometry: Option<LineString<f64>>,
}

/// A catalogued route and its risk scores.
///
/// Fields are read-only outside the crate; `final_score` is only ever written
/// together with the component scores it is derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRoute {
    route_id: String,
    source: String,
    destination: String,
    #[serde(default, with = "geometry::opt_point")]
    source_point: Option<Point<f64>>,
    #[serde(default, with = "geometry::opt_point")]
    destination_point: Option<Point<f64>>,
    #[serde(default, with = "geometry::opt_line_string")]
    route_geometry: Option<LineString<f64>>,
    traffic_score: f64,
    crime_score: f64,
    weather_score: f64,
    final_score: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default = "default_active")]
    is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ScoredRoute {
    pub(crate) fn create(input: RouteInput, weights: &ScoreWeights, now: DateTime<Utc>) -> Self {
        let final_score = compute_final_score(
            input.traffic_score,
            input.crime_score,
            input.weather_score,
            Some(weights),
        );
        Self {
            route_id: input.route_id,
            source: input.source,
            destination: input.destination,
            source_point: input.source_point,
            destination_point: input.destination_point,
            route_geometry: input.route_geometry,
            traffic_score: input.traffic_score,
            crime_score: input.crime_score,
            weather_score: input.weather_score,
            final_score,
            created_at: now,
            updated_at: now,
            is_active: true,
        }
    }

    /// Merges a new payload into an existing record and reactivates it.
    pub(crate) fn apply(&mut self, input: RouteInput, weights: &ScoreWeights, now: DateTime<Utc>) {
        self.source = input.source;
        self.destination = input.destination;
        if input.source_point.is_some() {
            self.source_point = input.source_point;
        }
        if input.destination_point.is_some() {
            self.destination_point = input.destination_point;
        }
        if input.route_geometry.is_some() {
            self.route_geometry = input.route_geometry;
        }
        self.traffic_score = input.traffic_score;
        self.crime_score = input.crime_score;
        self.weather_score = input.weather_score;
        self.final_score = compute_final_score(
            self.traffic_score,
            self.crime_score,
            self.weather_score,
            Some(weights),
        );
        self.is_active = true;
        self.updated_at = now;
    }

    pub(crate) fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = now;
    }

    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn source_point(&self) -> Option<&Point<f64>> {
        self.source_point.as_ref()
    }

    pub fn destination_point(&self) -> Option<&Point<f64>> {
        self.destination_point.as_ref()
    }

    pub fn route_geometry(&self) -> Option<&LineString<f64>> {
        self.route_geometry.as_ref()
    }

    pub fn traffic_score(&self) -> f64 {
        self.traffic_score
    }

    pub fn crime_score(&self) -> f64 {
        self.crime_score
    }

    pub fn weather_score(&self) -> f64 {
        self.weather_score
    }

    pub fn final_score(&self) -> f64 {
        self.final_score
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}
