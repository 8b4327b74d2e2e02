//! Weather source adapter
//!
//! Normalizes district names, fetches observations from the configured
//! weather source and keeps a short-lived per-district cache.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use shared::{normalize_district, validate_district, WeatherObservation};

use crate::error::{AppError, AppResult};
use crate::external::WeatherSource;

/// Outcome of a weather lookup
///
/// Absence of data is its own variant so it can never be mistaken for a
/// calm, zero-valued reading.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherLookup {
    Found(WeatherObservation),
    NotFound { district: String },
}

/// Adapter between the advisory pipeline and the raw weather source
#[derive(Clone)]
pub struct WeatherSourceAdapter {
    source: Arc<dyn WeatherSource>,
    cache: Option<Cache<String, WeatherObservation>>,
    timeout: Duration,
}

impl WeatherSourceAdapter {
    /// Create an adapter without caching
    pub fn new(source: Arc<dyn WeatherSource>, timeout: Duration) -> Self {
        Self {
            source,
            cache: None,
            timeout,
        }
    }

    /// Enable the per-district observation cache
    pub fn with_cache(mut self, ttl: Duration, max_entries: u64) -> Self {
        self.cache = Some(
            Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
        );
        self
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Fetch the current observation for a district
    pub async fn fetch_observation(&self, district: &str) -> AppResult<WeatherLookup> {
        validate_district(district).map_err(|msg| AppError::invalid_input("district", msg))?;
        let key = normalize_district(district);

        if let Some(cache) = &self.cache {
            if let Some(observation) = cache.get(&key).await {
                tracing::debug!("Cache hit for district {}", key);
                return Ok(WeatherLookup::Found(observation));
            }
            tracing::debug!("Cache miss for district {}", key);
        }

        let fetched = match tokio::time::timeout(self.timeout, self.source.get(&key)).await {
            Ok(Ok(fetched)) => fetched,
            Ok(Err(AppError::WeatherServiceUnavailable(msg))) => {
                tracing::warn!("Weather source unavailable for {}: {}", key, msg);
                return Err(AppError::WeatherServiceUnavailable(msg));
            }
            Ok(Err(e)) => {
                tracing::warn!("Weather source failed for {}: {}", key, e);
                return Err(AppError::WeatherServiceUnavailable(e.to_string()));
            }
            Err(_) => {
                tracing::warn!("Weather source timed out after {:?} for {}", self.timeout, key);
                return Err(AppError::WeatherServiceUnavailable(format!(
                    "Timed out after {}ms",
                    self.timeout.as_millis()
                )));
            }
        };

        let Some(observation) = fetched else {
            tracing::info!("No weather data for district {}", key);
            return Ok(WeatherLookup::NotFound {
                district: district.trim().to_string(),
            });
        };

        if let Err(reason) = observation.validate() {
            tracing::warn!("Discarding unusable reading for {}: {}", key, reason);
            return Ok(WeatherLookup::NotFound {
                district: district.trim().to_string(),
            });
        }

        if let Some(cache) = &self.cache {
            cache.insert(key, observation.clone()).await;
        }

        Ok(WeatherLookup::Found(observation))
    }

    /// Drop any cached observation for a district
    pub async fn invalidate(&self, district: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(&normalize_district(district)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory weather source keyed by normalized district
    struct FakeSource {
        readings: HashMap<String, WeatherObservation>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn with(district: &str, humidity: i64) -> Self {
            let mut readings = HashMap::new();
            readings.insert(
                district.to_string(),
                WeatherObservation {
                    district: district.to_string(),
                    temperature_c: Decimal::from(30),
                    humidity_pct: Decimal::from(humidity),
                    rainfall_mm: Decimal::ZERO,
                    wind_speed_kph: Decimal::ZERO,
                    observed_at: Utc::now(),
                },
            );
            Self {
                readings,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherSource for FakeSource {
        async fn get(&self, district: &str) -> AppResult<Option<WeatherObservation>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.readings.get(district).cloned())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl WeatherSource for FailingSource {
        async fn get(&self, _district: &str) -> AppResult<Option<WeatherObservation>> {
            Err(AppError::Configuration("invalid api key".to_string()))
        }
    }

    struct SlowSource;

    #[async_trait]
    impl WeatherSource for SlowSource {
        async fn get(&self, _district: &str) -> AppResult<Option<WeatherObservation>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }
    }

    const TIMEOUT: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn test_found_after_normalization() {
        let source = Arc::new(FakeSource::with("dakshina kannada", 70));
        let adapter = WeatherSourceAdapter::new(source.clone(), TIMEOUT);

        let lookup = adapter.fetch_observation("  Dakshina   KANNADA ").await.unwrap();
        match lookup {
            WeatherLookup::Found(obs) => assert_eq!(obs.district, "dakshina kannada"),
            other => panic!("expected observation, got {:?}", other),
        }
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_district_is_not_found_with_echo() {
        let adapter = WeatherSourceAdapter::new(Arc::new(FakeSource::with("mysuru", 70)), TIMEOUT);

        let lookup = adapter.fetch_observation("Unknownpur").await.unwrap();
        assert_eq!(
            lookup,
            WeatherLookup::NotFound {
                district: "Unknownpur".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_source() {
        let source = Arc::new(FakeSource::with("mysuru", 70));
        let adapter = WeatherSourceAdapter::new(source.clone(), TIMEOUT);

        let result = adapter.fetch_observation("   ").await;
        assert!(matches!(result, Err(AppError::InvalidInput { .. })));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_unusable_reading_is_not_found() {
        let adapter = WeatherSourceAdapter::new(Arc::new(FakeSource::with("mysuru", 140)), TIMEOUT);

        let lookup = adapter.fetch_observation("Mysuru").await.unwrap();
        assert!(matches!(lookup, WeatherLookup::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_source_failure_is_unavailable() {
        let adapter = WeatherSourceAdapter::new(Arc::new(FailingSource), TIMEOUT);

        let result = adapter.fetch_observation("Mysuru").await;
        assert!(matches!(result, Err(AppError::WeatherServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_timeout_is_unavailable() {
        let adapter = WeatherSourceAdapter::new(Arc::new(SlowSource), TIMEOUT);

        let result = adapter.fetch_observation("Mysuru").await;
        assert!(matches!(result, Err(AppError::WeatherServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_source() {
        let source = Arc::new(FakeSource::with("mysuru", 70));
        let adapter = WeatherSourceAdapter::new(source.clone(), TIMEOUT)
            .with_cache(Duration::from_secs(60), 100);

        adapter.fetch_observation("Mysuru").await.unwrap();
        adapter.fetch_observation("mysuru ").await.unwrap();
        assert_eq!(source.calls(), 1);

        adapter.invalidate("MYSURU").await;
        adapter.fetch_observation("Mysuru").await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_lookups_share_cache_entry() {
        let source = Arc::new(FakeSource::with("mysuru", 70));
        let adapter = WeatherSourceAdapter::new(source.clone(), TIMEOUT)
            .with_cache(Duration::from_secs(60), 100);

        let (first, second, other) = tokio::join!(
            adapter.fetch_observation("Mysuru"),
            adapter.fetch_observation(" MYSURU"),
            adapter.fetch_observation("Unknownpur"),
        );
        let first = first.unwrap();
        assert!(matches!(first, WeatherLookup::Found(_)));
        assert_eq!(first, second.unwrap());
        assert!(matches!(other.unwrap(), WeatherLookup::NotFound { .. }));

        // both misses may reach the source; the entry is then shared
        let mysuru_calls = source.calls() - 1;
        assert!((1..=2).contains(&mysuru_calls));
        adapter.fetch_observation("mysuru").await.unwrap();
        assert_eq!(source.calls(), mysuru_calls + 1);
    }

    #[tokio::test]
    async fn test_without_cache_every_call_reaches_source() {
        let source = Arc::new(FakeSource::with("mysuru", 70));
        let adapter = WeatherSourceAdapter::new(source.clone(), TIMEOUT);
        assert!(!adapter.is_cached());

        adapter.fetch_observation("Mysuru").await.unwrap();
        adapter.fetch_observation("Mysuru").await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let source = Arc::new(FakeSource::with("mysuru", 70));
        let adapter = WeatherSourceAdapter::new(source.clone(), TIMEOUT)
            .with_cache(Duration::from_secs(60), 100);

        adapter.fetch_observation("Unknownpur").await.unwrap();
        adapter.fetch_observation("Unknownpur").await.unwrap();
        assert_eq!(source.calls(), 2);
    }
}
