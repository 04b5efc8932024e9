use serde::{Deserialize, Serialize};

pub const DEFAULT_TRAFFIC_WEIGHT: f64 = 0.3;
pub const DEFAULT_CRIME_WEIGHT: f64 = 0.5;
pub const DEFAULT_WEATHER_WEIGHT: f64 = 0.2;

/// Per-component multipliers for the final risk score.
///
/// Weights are used as given: they are not normalised and need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub traffic: f64,
    pub crime: f64,
    pub weather: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            traffic: DEFAULT_TRAFFIC_WEIGHT,
            crime: DEFAULT_CRIME_WEIGHT,
            weather: DEFAULT_WEATHER_WEIGHT,
        }
    }
}

impl ScoreWeights {
    pub fn new(traffic: f64, crime: f64, weather: f64) -> Self {
        Self {
            traffic,
            crime,
            weather,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.traffic.is_finite() && self.crime.is_finite() && self.weather.is_finite()
    }
}
