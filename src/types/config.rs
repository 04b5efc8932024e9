use crate::error::SafeRouteError;
use crate::types::weights::{
    ScoreWeights, DEFAULT_CRIME_WEIGHT, DEFAULT_TRAFFIC_WEIGHT, DEFAULT_WEATHER_WEIGHT,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_STORE_FILE: &str = ".saferoute/routes.json";
pub const DEFAULT_PAGE_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SafeRouteConfig {
    pub store: Option<StoreConfig>,
    pub scoring: Option<ScoringConfig>,
    pub listing: Option<ListingConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringConfig {
    pub weights: Option<HashMap<String, f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingConfig {
    pub default_limit: Option<usize>,
}

impl SafeRouteConfig {
    /// Lays `upper` over this config. Set keys replace lower ones; weights are
    /// replaced per weight name, so a layer may change a single weight.
    pub fn overlay(&mut self, upper: SafeRouteConfig) {
        if let Some(path) = upper.store.and_then(|store| store.path) {
            self.store = Some(StoreConfig { path: Some(path) });
        }
        if let Some(weights) = upper.scoring.and_then(|scoring| scoring.weights) {
            self.scoring
                .get_or_insert_with(ScoringConfig::default)
                .weights
                .get_or_insert_with(HashMap::new)
                .extend(weights);
        }
        if let Some(limit) = upper.listing.and_then(|listing| listing.default_limit) {
            self.listing = Some(ListingConfig {
                default_limit: Some(limit),
            });
        }
    }

    pub fn weights(&self) -> ScoreWeights {
        match self
            .scoring
            .as_ref()
            .and_then(|scoring| scoring.weights.as_ref())
        {
            Some(weights) => ScoreWeights::new(
                *weights.get("traffic").unwrap_or(&DEFAULT_TRAFFIC_WEIGHT),
                *weights.get("crime").unwrap_or(&DEFAULT_CRIME_WEIGHT),
                *weights.get("weather").unwrap_or(&DEFAULT_WEATHER_WEIGHT),
            ),
            None => ScoreWeights::default(),
        }
    }

    pub fn store_path(&self, root: &Path) -> PathBuf {
        let relative = self
            .store
            .as_ref()
            .and_then(|store| store.path.as_ref())
            .map_or(DEFAULT_STORE_FILE, String::as_str);
        root.join(relative)
    }

    pub fn default_limit(&self) -> usize {
        self.listing
            .as_ref()
            .and_then(|listing| listing.default_limit)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
    }

    pub fn validate(&self) -> Result<(), SafeRouteError> {
        if let Some(weights) = self
            .scoring
            .as_ref()
            .and_then(|scoring| scoring.weights.as_ref())
        {
            const ALLOWED_WEIGHT_KEYS: [&str; 3] = ["traffic", "crime", "weather"];
            let mut unknown = weights
                .keys()
                .filter(|key| !ALLOWED_WEIGHT_KEYS.contains(&key.as_str()))
                .cloned()
                .collect::<Vec<_>>();
            if !unknown.is_empty() {
                unknown.sort();
                return Err(SafeRouteError::ConfigParse(format!(
                    "scoring.weights contains unknown key(s): {}",
                    unknown.join(", ")
                )));
            }
        }

        if !self.weights().is_finite() {
            return Err(SafeRouteError::ConfigParse(
                "scoring.weights values must be finite numbers".to_string(),
            ));
        }

        if self.default_limit() == 0 {
            return Err(SafeRouteError::ConfigParse(
                "listing.default_limit must be greater than 0".to_string(),
            ));
        }

        if let Some(path) = self.store.as_ref().and_then(|store| store.path.as_ref()) {
            if path.trim().is_empty() {
                return Err(SafeRouteError::ConfigParse(
                    "store.path cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
