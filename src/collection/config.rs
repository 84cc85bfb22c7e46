//! Stream collection configuration

/// Configuration for a stream collection
#[derive(Debug, Clone)]
pub struct CollectionConfig {
    /// Capacity of the collection-level notification channel
    ///
    /// Observers that fall more than this many notifications behind see
    /// `Lagged` and skip ahead.
    pub notify_capacity: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            notify_capacity: 64,
        }
    }
}

impl CollectionConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the notification channel capacity (minimum 1)
    pub fn notify_capacity(mut self, capacity: usize) -> Self {
        self.notify_capacity = capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CollectionConfig::default();

        assert_eq!(config.notify_capacity, 64);
    }

    #[test]
    fn test_builder_notify_capacity() {
        let config = CollectionConfig::new().notify_capacity(8);

        assert_eq!(config.notify_capacity, 8);
    }

    #[test]
    fn test_builder_notify_capacity_min() {
        // tokio broadcast channels panic on zero capacity
        let config = CollectionConfig::new().notify_capacity(0);

        assert_eq!(config.notify_capacity, 1);
    }
}
