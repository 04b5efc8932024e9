//! Coordinate parsing for route endpoints and paths.
//!
//! All coordinates are `[longitude, latitude]` pairs in WGS84 (EPSG:4326).
//! Values leave this module as `geo` types and are treated as already valid
//! everywhere else.

use crate::error::{Result, SafeRouteError};
use geo::{HaversineLength, LineString, Point};
use serde_json::Value;

pub const MIN_LINE_POINTS: usize = 2;

pub fn parse_point(field: &str, value: &Value) -> Result<Point<f64>> {
    let [lng, lat] = parse_pair(field, value)?;
    Ok(Point::new(lng, lat))
}

pub fn parse_line_string(field: &str, value: &Value) -> Result<LineString<f64>> {
    let items = value.as_array().ok_or_else(|| {
        SafeRouteError::validation(field, "expected an array of [lng, lat] pairs")
    })?;
    if items.len() < MIN_LINE_POINTS {
        return Err(SafeRouteError::validation(
            field,
            format!(
                "expected at least {MIN_LINE_POINTS} points, found {}",
                items.len()
            ),
        ));
    }

    let coords = items
        .iter()
        .map(|item| parse_pair(field, item))
        .collect::<Result<Vec<_>>>()?;
    Ok(LineString::from(coords))
}

fn parse_pair(field: &str, value: &Value) -> Result<[f64; 2]> {
    let items = value
        .as_array()
        .ok_or_else(|| SafeRouteError::validation(field, "expected a [lng, lat] pair"))?;
    if items.len() != 2 {
        return Err(SafeRouteError::validation(
            field,
            format!("expected exactly 2 coordinates, found {}", items.len()),
        ));
    }

    let mut pair = [0.0; 2];
    for (slot, item) in pair.iter_mut().zip(items) {
        *slot = item
            .as_f64()
            .filter(|number| number.is_finite())
            .ok_or_else(|| SafeRouteError::validation(field, "coordinates must be numbers"))?;
    }
    Ok(pair)
}

pub fn point_coords(point: &Point<f64>) -> [f64; 2] {
    [point.x(), point.y()]
}

pub fn line_coords(line: &LineString<f64>) -> Vec<[f64; 2]> {
    line.coords().map(|coord| [coord.x, coord.y]).collect()
}

/// Geodesic length of the path in metres.
pub fn length_meters(line: &LineString<f64>) -> f64 {
    line.haversine_length()
}

/// Stores an optional point as `[lng, lat]`.
pub mod opt_point {
    use geo::Point;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        point: &Option<Point<f64>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        point.as_ref().map(super::point_coords).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Point<f64>>, D::Error> {
        let coords = Option::<[f64; 2]>::deserialize(deserializer)?;
        Ok(coords.map(|[lng, lat]| Point::new(lng, lat)))
    }
}

/// Stores an optional path as `[[lng, lat], ...]`.
pub mod opt_line_string {
    use geo::LineString;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        line: &Option<LineString<f64>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        line.as_ref().map(super::line_coords).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<LineString<f64>>, D::Error> {
        match Option::<Vec<[f64; 2]>>::deserialize(deserializer)? {
            Some(coords) if coords.len() < super::MIN_LINE_POINTS => Err(D::Error::custom(
                format!("route geometry needs at least {} points", super::MIN_LINE_POINTS),
            )),
            Some(coords) => Ok(Some(LineString::from(coords))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn point_requires_exactly_two_numbers() {
        let point = parse_point("source_coords", &json!([76.38, 30.33])).expect("valid point");
        assert_eq!(point_coords(&point), [76.38, 30.33]);

        let err = parse_point("source_coords", &json!([1.0, 2.0, 3.0])).unwrap_err();
        assert!(matches!(err, SafeRouteError::Validation { ref field, .. } if field == "source_coords"));

        let err = parse_point("source_coords", &json!(["a", 2.0])).unwrap_err();
        assert!(matches!(err, SafeRouteError::Validation { .. }));
    }

    #[test]
    fn line_rejects_single_point() {
        let err = parse_line_string("route_geometry", &json!([[0, 0]])).unwrap_err();
        assert!(err.to_string().contains("at least 2 points"));
    }

    #[test]
    fn line_rejects_malformed_member() {
        let err = parse_line_string("route_geometry", &json!([[0, 0], [1]])).unwrap_err();
        assert!(err.to_string().contains("exactly 2 coordinates"));
    }

    #[test]
    fn line_keeps_point_order() {
        let line =
            parse_line_string("route_geometry", &json!([[0, 0], [1, 1], [2, 0]])).expect("line");
        assert_eq!(line_coords(&line), vec![[0.0, 0.0], [1.0, 1.0], [2.0, 0.0]]);
    }

    #[test]
    fn length_of_one_degree_of_latitude_is_about_111_km() {
        let line = parse_line_string("route_geometry", &json!([[0, 0], [0, 1]])).expect("line");
        let length = length_meters(&line);
        assert!((length - 111_195.0).abs() < 500.0, "got {length}");
    }
}
