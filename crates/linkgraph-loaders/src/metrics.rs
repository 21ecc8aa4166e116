use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Metrics collected during a project build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoaderMetrics {
    /// Loaders run
    pub sources_attempted: usize,

    /// Loaders whose source was present and loaded
    pub sources_loaded: usize,

    /// Loaders whose source was absent
    pub sources_missing: usize,

    /// Loaders that failed and contributed nothing
    pub sources_failed: usize,

    /// Net node entries added
    pub nodes_added: usize,

    /// Edges added
    pub edges_added: usize,

    /// Total time spent loading
    #[serde(with = "duration_millis")]
    pub total_load_time: Duration,
}

// Helper module for serializing Duration
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis: u64 = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

impl LoaderMetrics {
    /// Fraction of attempted sources that did not fail (0.0 to 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.sources_attempted == 0 {
            0.0
        } else {
            (self.sources_attempted - self.sources_failed) as f64 / self.sources_attempted as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        let metrics = LoaderMetrics {
            sources_attempted: 4,
            sources_failed: 1,
            ..Default::default()
        };
        assert_eq!(metrics.success_rate(), 0.75);
        assert_eq!(LoaderMetrics::default().success_rate(), 0.0);
    }

    #[test]
    fn test_duration_serialized_as_millis() {
        let metrics = LoaderMetrics {
            total_load_time: Duration::from_millis(1500),
            ..Default::default()
        };
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["total_load_time"], 1500);
    }
}
