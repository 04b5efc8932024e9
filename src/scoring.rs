use crate::types::weights::ScoreWeights;

/// Weighted risk score for one route. Lower is safer.
///
/// Falls back to [`ScoreWeights::default`] when no weights are given.
pub fn compute_final_score(
    traffic: f64,
    crime: f64,
    weather: f64,
    weights: Option<&ScoreWeights>,
) -> f64 {
    let defaults = ScoreWeights::default();
    let weights = weights.unwrap_or(&defaults);
    weights.traffic * traffic + weights.crime * crime + weights.weather * weather
}
