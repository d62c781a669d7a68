//! Name search over stops and buses.

use serde::Serialize;

use crate::domain::{BusId, DomainError, Stop};
use crate::error::CoreError;
use crate::schedule::ScheduleStore;

/// Results returned when the caller gives no limit.
pub const DEFAULT_LIMIT: usize = 20;

/// Upper bound on any requested limit.
pub const MAX_LIMIT: usize = 50;

/// A bus as listed in search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusSummary {
    pub id: BusId,
    pub name: String,
}

/// Lowercased, trimmed needle. Blank input is rejected.
fn needle(query: &str) -> Result<String, DomainError> {
    let q = query.trim();
    if q.is_empty() {
        return Err(DomainError::EmptyField("q"));
    }
    Ok(q.to_lowercase())
}

fn clamp(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Stops whose name contains `query`, ignoring case, ordered by name.
pub fn search_stops(
    store: &dyn ScheduleStore,
    query: &str,
    limit: Option<usize>,
) -> Result<Vec<Stop>, CoreError> {
    let needle = needle(query)?;
    let mut stops: Vec<Stop> = store
        .list_stops()?
        .into_iter()
        .filter(|s| s.name.to_lowercase().contains(&needle))
        .collect();
    // stable, so equal names stay in id order
    stops.sort_by(|a, b| a.name.cmp(&b.name));
    stops.truncate(clamp(limit));
    Ok(stops)
}

/// Active buses whose name contains `query`, ignoring case, ordered by name.
pub fn search_buses(
    store: &dyn ScheduleStore,
    query: &str,
    limit: Option<usize>,
) -> Result<Vec<BusSummary>, CoreError> {
    let needle = needle(query)?;
    let mut buses: Vec<BusSummary> = store
        .list_buses()?
        .into_iter()
        .filter(|b| b.is_active && b.name.to_lowercase().contains(&needle))
        .map(|b| BusSummary {
            id: b.id,
            name: b.name,
        })
        .collect();
    buses.sort_by(|a, b| a.name.cmp(&b.name));
    buses.truncate(clamp(limit));
    Ok(buses)
}
