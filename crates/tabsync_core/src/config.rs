//! Configuration for a dataset controller.

use tabsync_protocol::QueryParams;

/// Configuration of one dataset instance.
#[derive(Debug, Clone, Default)]
pub struct DatasetConfig {
    /// Filters applied to every fetch, e.g. only recent years.
    pub default_query: QueryParams,
}

impl DatasetConfig {
    /// Creates a configuration with no default filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter applied to every fetch.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.default_query.push(key, value);
        self
    }

    /// Restricts fetches to rows whose `field` is within the last
    /// `years` years, the common "recent records only" screen default.
    pub fn with_recent_years(self, field: &str, years: u32, current_year: u32) -> Self {
        let cutoff = current_year.saturating_sub(years);
        Self {
            default_query: self.default_query.with_gte(field, cutoff),
        }
    }
}
