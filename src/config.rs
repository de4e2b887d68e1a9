//! Construction-time parameters for `HashTable`.

use crate::error::TableError;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableConfig {
    /// Bucket count the table starts with. Must be at least 1.
    pub initial_buckets: usize,
    /// Growth threshold for `len / num_buckets`. Must be finite and at least
    /// `MIN_MAX_LOAD_FACTOR`.
    pub max_load_factor: f64,
}

impl TableConfig {
    pub const DEFAULT_INITIAL_BUCKETS: usize = 16;
    pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;
    /// Smallest accepted growth threshold. At this bound the bucket count
    /// needed for every entry the arena can address stays far below
    /// `usize::MAX`, so growth never overflows.
    pub const MIN_MAX_LOAD_FACTOR: f64 = 0.05;

    pub const fn new() -> Self {
        Self {
            initial_buckets: Self::DEFAULT_INITIAL_BUCKETS,
            max_load_factor: Self::DEFAULT_MAX_LOAD_FACTOR,
        }
    }

    pub fn with_initial_buckets(mut self, buckets: usize) -> Self {
        self.initial_buckets = buckets;
        self
    }

    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.initial_buckets < 1 {
            return Err(TableError::InvalidBucketCount {
                requested: self.initial_buckets,
            });
        }
        let lf = self.max_load_factor;
        if !(lf.is_finite() && lf >= Self::MIN_MAX_LOAD_FACTOR) {
            return Err(TableError::InvalidLoadFactor {
                value: self.max_load_factor,
            });
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}
