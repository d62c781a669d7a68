//! Caching layer for road distance lookups.
//!
//! Stop coordinates rarely change, so the driving distance between two
//! stops is safe to reuse for a while. Coordinates are bucketed to 1e-5
//! degrees (about a metre) to build the key. Only successful lookups are
//! cached; a failed lookup is retried on the next request.

use std::future::Future;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::Coordinates;
use crate::fare::{DistanceError, RoadDistance};

/// Cache key: both endpoints as integer multiples of 1e-5 degrees.
type PairKey = (i64, i64, i64, i64);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(6 * 60 * 60),
            max_capacity: 10_000,
        }
    }
}

fn bucket(degrees: f64) -> i64 {
    (degrees * 1e5).round() as i64
}

fn pair_key(from: Coordinates, to: Coordinates) -> PairKey {
    (
        bucket(from.lat()),
        bucket(from.lon()),
        bucket(to.lat()),
        bucket(to.lon()),
    )
}

/// Road distance service with caching.
///
/// Wraps any [`RoadDistance`] and remembers its answers per coordinate pair.
pub struct CachedRoadDistance<D> {
    inner: D,
    distances: MokaCache<PairKey, f64>,
}

impl<D: RoadDistance> CachedRoadDistance<D> {
    pub fn new(inner: D, config: &CacheConfig) -> Self {
        let distances = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, distances }
    }

    async fn lookup(&self, from: Coordinates, to: Coordinates) -> Result<f64, DistanceError> {
        let key = pair_key(from, to);

        if let Some(km) = self.distances.get(&key).await {
            debug!(km, "road distance cache hit");
            return Ok(km);
        }

        let km = self.inner.driving_distance_km(from, to).await?;
        self.distances.insert(key, km).await;
        Ok(km)
    }

    /// Access the underlying service for lookups that bypass the cache.
    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: RoadDistance> RoadDistance for CachedRoadDistance<D> {
    fn driving_distance_km(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> impl Future<Output = Result<f64, DistanceError>> + Send {
        self.lookup(from, to)
    }
}
