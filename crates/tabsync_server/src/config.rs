//! Server configuration.

/// Configuration for the record server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path prefix the dataset routes live under.
    pub base_path: String,
    /// Maximum rows a single bulk create may carry.
    pub max_bulk_rows: usize,
}

impl ServerConfig {
    /// Creates a configuration with the given base path.
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            max_bulk_rows: 500,
        }
    }

    /// Sets the bulk-create row cap.
    pub fn with_max_bulk_rows(mut self, max: usize) -> Self {
        self.max_bulk_rows = max;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("/records")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.base_path, "/records");
        assert_eq!(config.max_bulk_rows, 500);
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new("/api/faculty").with_max_bulk_rows(50);
        assert_eq!(config.base_path, "/api/faculty");
        assert_eq!(config.max_bulk_rows, 50);
    }
}
