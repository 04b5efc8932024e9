use crate::catalog::store::{apply_query, update_records, RouteQuery, RouteStore};
use crate::error::{Result, SafeRouteError};
use crate::types::route::ScoredRoute;
use std::sync::{Mutex, MutexGuard};

/// Process-local store keeping records in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ScoredRoute>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<MutexGuard<'_, Vec<ScoredRoute>>> {
        self.records
            .lock()
            .map_err(|_| SafeRouteError::Storage("memory store lock poisoned".to_string()))
    }
}

impl RouteStore for MemoryStore {
    fn find_by_id(&self, route_id: &str) -> Result<Option<ScoredRoute>> {
        Ok(self
            .records()?
            .iter()
            .find(|route| route.route_id() == route_id)
            .cloned())
    }

    fn update<F>(&self, route_id: &str, change: F) -> Result<ScoredRoute>
    where
        F: FnOnce(Option<ScoredRoute>) -> Result<ScoredRoute>,
    {
        update_records(&mut *self.records()?, route_id, change)
    }

    fn query(&self, query: &RouteQuery) -> Result<Vec<ScoredRoute>> {
        Ok(apply_query(self.records()?.iter(), query))
    }
}
