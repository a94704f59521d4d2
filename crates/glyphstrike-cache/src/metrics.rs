//! How well are the strike caches doing?

/// Counters shared by every cache in this crate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheMetrics {
    pub total_requests: u64,
    pub hits: u64,
    pub misses: u64,
    /// Strikes actually built
    pub materializations: u64,
    /// Builds that returned an error
    pub failures: u64,
    pub evictions: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.hits as f64 / self.total_requests as f64
        }
    }

    /// Human-readable summary
    pub fn report(&self, name: &str) -> String {
        format!(
            "{} Strike Cache:\n\
             - Requests: {}\n\
             - Hit Rate: {:.2}%\n\
             - Materialized: {} ({} failed)\n\
             - Evicted: {}",
            name,
            self.total_requests,
            self.hit_rate() * 100.0,
            self.materializations,
            self.failures,
            self.evictions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_of_nothing_is_zero() {
        assert_eq!(CacheMetrics::default().hit_rate(), 0.0);
    }

    #[test]
    fn report_mentions_counts() {
        let metrics = CacheMetrics {
            total_requests: 4,
            hits: 3,
            misses: 1,
            materializations: 1,
            failures: 0,
            evictions: 0,
        };
        let report = metrics.report("Exclusive");
        assert!(report.contains("Exclusive Strike Cache"));
        assert!(report.contains("75.00%"));
    }
}
