use crate::error::{Result, SafeRouteError};
use crate::types::route::ScoredRoute;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Persistence contract for scored routes.
///
/// `update` is the only write primitive: it hands the current record for
/// `route_id` to `change` and stores what comes back, with no other writer
/// able to touch the store in between. When `change` fails nothing is written.
/// `query` must sort stably, so records with equal sort keys come back in
/// insertion order.
pub trait RouteStore: Send + Sync {
    fn find_by_id(&self, route_id: &str) -> Result<Option<ScoredRoute>>;

    fn update<F>(&self, route_id: &str, change: F) -> Result<ScoredRoute>
    where
        F: FnOnce(Option<ScoredRoute>) -> Result<ScoredRoute>;

    fn query(&self, query: &RouteQuery) -> Result<Vec<ScoredRoute>>;

    /// Inserts or replaces `route` as a whole.
    fn save(&self, route: &ScoredRoute) -> Result<()> {
        self.update(route.route_id(), |_| Ok(route.clone()))
            .map(|_| ())
    }
}

/// Applies `change` to the record named `route_id` inside `records`, keeping
/// insertion order. `records` is left as it was when `change` fails.
pub(crate) fn update_records<F>(
    records: &mut Vec<ScoredRoute>,
    route_id: &str,
    change: F,
) -> Result<ScoredRoute>
where
    F: FnOnce(Option<ScoredRoute>) -> Result<ScoredRoute>,
{
    let position = records
        .iter()
        .position(|route| route.route_id() == route_id);
    let route = change(position.map(|index| records[index].clone()))?;
    match position {
        Some(index) => records[index] = route.clone(),
        None => records.push(route.clone()),
    }
    Ok(route)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteFilter {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub is_active: Option<bool>,
}

impl RouteFilter {
    pub fn matches(&self, route: &ScoredRoute) -> bool {
        self.source
            .as_deref()
            .map_or(true, |source| route.source() == source)
            && self
                .destination
                .as_deref()
                .map_or(true, |destination| route.destination() == destination)
            && self
                .is_active
                .map_or(true, |active| route.is_active() == active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    FinalScore,
    RouteId,
}

impl SortField {
    fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::FinalScore => "final_score",
            Self::RouteId => "route_id",
        }
    }
}

/// Ordering key in `field` / `-field` form, `-` meaning descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub descending: bool,
}

impl SortOrder {
    pub const NEWEST_FIRST: Self = Self {
        field: SortField::CreatedAt,
        descending: true,
    };

    pub const SAFEST_FIRST: Self = Self {
        field: SortField::FinalScore,
        descending: false,
    };

    pub fn compare(&self, left: &ScoredRoute, right: &ScoredRoute) -> Ordering {
        let ordering = match self.field {
            SortField::CreatedAt => left.created_at().cmp(&right.created_at()),
            SortField::UpdatedAt => left.updated_at().cmp(&right.updated_at()),
            SortField::FinalScore => left.final_score().total_cmp(&right.final_score()),
            SortField::RouteId => left.route_id().cmp(right.route_id()),
        };
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::NEWEST_FIRST
    }
}

impl FromStr for SortOrder {
    type Err = SafeRouteError;

    fn from_str(value: &str) -> Result<Self> {
        let (descending, name) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value),
        };
        let field = match name {
            "created_at" => SortField::CreatedAt,
            "updated_at" => SortField::UpdatedAt,
            "final_score" => SortField::FinalScore,
            "route_id" => SortField::RouteId,
            _ => {
                return Err(SafeRouteError::validation(
                    "order",
                    format!("unsupported sort field: {value}"),
                ))
            }
        };
        Ok(Self { field, descending })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-")?;
        }
        write!(f, "{}", self.field.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteQuery {
    pub filter: RouteFilter,
    pub order: SortOrder,
    pub offset: usize,
    pub limit: Option<usize>,
}

/// Filters, stably sorts and slices records given in insertion order.
pub fn apply_query<'a>(
    records: impl IntoIterator<Item = &'a ScoredRoute>,
    query: &RouteQuery,
) -> Vec<ScoredRoute> {
    let mut selected = records
        .into_iter()
        .filter(|route| query.filter.matches(route))
        .collect::<Vec<_>>();
    selected.sort_by(|left, right| query.order.compare(left, right));

    let limit = query.limit.unwrap_or(usize::MAX);
    selected
        .into_iter()
        .skip(query.offset)
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::route::tests::{at, input};
    use crate::types::weights::ScoreWeights;

    fn route(id: &str, score: f64, second: u32) -> ScoredRoute {
        let mut payload = input(id, "X", "Y");
        payload.traffic_score = 0.0;
        payload.crime_score = score * 2.0;
        payload.weather_score = 0.0;
        ScoredRoute::create(payload, &ScoreWeights::default(), at(second))
    }

    #[test]
    fn sort_order_parses_prefixed_fields() {
        assert_eq!(
            "-created_at".parse::<SortOrder>().expect("valid order"),
            SortOrder::NEWEST_FIRST
        );
        assert_eq!(
            "final_score".parse::<SortOrder>().expect("valid order"),
            SortOrder::SAFEST_FIRST
        );
        assert_eq!(SortOrder::NEWEST_FIRST.to_string(), "-created_at");
        assert!("-distance".parse::<SortOrder>().is_err());
    }

    #[test]
    fn query_sorts_stably_by_score() {
        let records = vec![
            route("a", 10.0, 0),
            route("b", 5.0, 1),
            route("c", 10.0, 2),
            route("d", 1.0, 3),
        ];
        let query = RouteQuery {
            order: SortOrder::SAFEST_FIRST,
            ..RouteQuery::default()
        };
        let ids = apply_query(&records, &query)
            .iter()
            .map(|route| route.route_id().to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn query_applies_filter_then_offset_and_limit() {
        let mut other = input("z", "X", "Q");
        other.crime_score = 1.0;
        let records = vec![
            route("a", 1.0, 0),
            route("b", 2.0, 1),
            ScoredRoute::create(other, &ScoreWeights::default(), at(2)),
            route("c", 3.0, 3),
        ];
        let query = RouteQuery {
            filter: RouteFilter {
                destination: Some("Y".to_string()),
                ..RouteFilter::default()
            },
            order: SortOrder::NEWEST_FIRST,
            offset: 1,
            limit: Some(1),
        };
        let page = apply_query(&records, &query);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].route_id(), "b");
    }

    #[test]
    fn filter_matches_active_flag() {
        let mut inactive = route("a", 1.0, 0);
        inactive.deactivate(at(1));
        let active_only = RouteFilter {
            is_active: Some(true),
            ..RouteFilter::default()
        };
        assert!(!active_only.matches(&inactive));
        assert!(RouteFilter::default().matches(&inactive));
    }

    #[test]
    fn failed_change_leaves_records_untouched() {
        let mut records = vec![route("a", 1.0, 0), route("b", 2.0, 1)];
        let before = records.clone();

        let err = update_records(&mut records, "a", |_| {
            Err(SafeRouteError::validation("route_id", "rejected"))
        })
        .expect_err("change should fail");
        assert!(matches!(err, SafeRouteError::Validation { .. }));
        assert_eq!(records, before);

        update_records(&mut records, "c", |existing| {
            assert!(existing.is_none());
            Ok(route("c", 3.0, 2))
        })
        .expect("insert");
        let ids = records
            .iter()
            .map(|route| route.route_id().to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
