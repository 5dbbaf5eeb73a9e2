use crate::service::retry::RetryPolicy;

/// Concurrency settings for an aggregation run.
#[derive(Debug, Clone)]
pub struct AssetServiceConfig {
    /// Asset pages requested concurrently per batch.
    ///
    /// ESI error-limits aggressive clients, so this is clamped to
    /// [`MIN_PAGE_CONCURRENCY`](Self::MIN_PAGE_CONCURRENCY)..=[`MAX_PAGE_CONCURRENCY`](Self::MAX_PAGE_CONCURRENCY).
    pub page_concurrency: usize,

    /// Distinct root locations resolved in parallel, clamped to 1..=8.
    pub location_workers: usize,

    /// Retry policy applied to every asset page and name batch.
    pub retry: RetryPolicy,
}

impl AssetServiceConfig {
    pub const MIN_PAGE_CONCURRENCY: usize = 1;
    pub const MAX_PAGE_CONCURRENCY: usize = 10;
    pub const DEFAULT_PAGE_CONCURRENCY: usize = 5;

    pub const MIN_LOCATION_WORKERS: usize = 1;
    pub const MAX_LOCATION_WORKERS: usize = 8;
    pub const DEFAULT_LOCATION_WORKERS: usize = 4;

    /// Create a new configuration, clamping both values into their allowed ranges.
    ///
    /// # Arguments
    /// * `page_concurrency` - Pages per concurrent fetch batch
    /// * `location_workers` - Parallel location resolutions
    pub fn new(page_concurrency: usize, location_workers: usize) -> Self {
        Self {
            page_concurrency: page_concurrency
                .clamp(Self::MIN_PAGE_CONCURRENCY, Self::MAX_PAGE_CONCURRENCY),
            location_workers: location_workers
                .clamp(Self::MIN_LOCATION_WORKERS, Self::MAX_LOCATION_WORKERS),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for AssetServiceConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_PAGE_CONCURRENCY,
            Self::DEFAULT_LOCATION_WORKERS,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = AssetServiceConfig::default();

        assert_eq!(
            config.page_concurrency, 5,
            "Default page_concurrency should be 5"
        );
        assert_eq!(
            config.location_workers, 4,
            "Default location_workers should be 4"
        );
        assert_eq!(
            config.retry,
            RetryPolicy::new(3, Duration::from_secs(1)),
            "Default retry policy should be 3 attempts starting at 1s"
        );
    }

    #[test]
    fn test_new_config_clamps_upper_bounds() {
        let config = AssetServiceConfig::new(50, 32);

        assert_eq!(
            config.page_concurrency, 10,
            "page_concurrency should be clamped to 10"
        );
        assert_eq!(
            config.location_workers, 8,
            "location_workers should be clamped to 8"
        );
    }

    #[test]
    fn test_new_config_clamps_lower_bounds() {
        let config = AssetServiceConfig::new(0, 0);

        assert_eq!(
            config.page_concurrency, 1,
            "page_concurrency should be at least 1"
        );
        assert_eq!(
            config.location_workers, 1,
            "location_workers should be at least 1"
        );
    }

    #[test]
    fn test_with_retry_overrides_policy() {
        let retry = RetryPolicy::new(2, Duration::ZERO);
        let config = AssetServiceConfig::new(2, 2).with_retry(retry);

        assert_eq!(config.retry, retry, "with_retry should replace the policy");
        assert_eq!(config.page_concurrency, 2);
    }
}
