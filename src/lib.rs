//! Route risk catalog.
//!
//! Routes carry traffic, crime and weather scores; a weighted sum of the three
//! is stored as the route's final score. Lower final scores are safer.
//! [`catalog::RouteCatalog`] owns every write, and
//! [`compare::RouteComparator`] ranks the active routes sharing a source and
//! destination.

pub mod catalog;
pub mod compare;
pub mod config;
pub mod error;
pub mod geometry;
pub mod report;
pub mod scoring;
pub mod types;

pub use catalog::{ListQuery, RouteCatalog, UpsertOutcome, UpsertRequest};
pub use compare::{RouteComparator, RouteComparison};
pub use error::{Result, SafeRouteError};
pub use scoring::compute_final_score;
pub use types::route::ScoredRoute;
pub use types::weights::ScoreWeights;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const INVALID_INPUT: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const RUNTIME_FAILURE: i32 = 4;
}
