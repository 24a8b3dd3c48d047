//! Process-wide retention limits.

use super::error::RetentionError;

/// Row count at which a table is evicted.
pub const DEFAULT_THRESHOLD: u64 = 500;

/// Rows removed per eviction.
pub const DEFAULT_BATCH_SIZE: u64 = 250;

/// Column names accepted as the recency key, in order of preference.
///
/// `create_time` is the legacy name still used by older tables.
pub const RECENCY_KEY_CANDIDATES: &[&str] = &["created_at", "create_time"];

/// Threshold and batch size shared by every tracked table.
///
/// Construction enforces `0 < batch_size < threshold`, so one eviction
/// always leaves a table strictly below its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    threshold: u64,
    batch_size: u64,
}

impl RetentionPolicy {
    /// Creates a policy, rejecting limits that could never converge.
    ///
    /// # Errors
    ///
    /// Returns [`RetentionError::InvalidPolicy`] if `batch_size` is zero or
    /// not strictly below `threshold`.
    pub fn new(threshold: u64, batch_size: u64) -> Result<Self, RetentionError> {
        if batch_size == 0 || batch_size >= threshold {
            return Err(RetentionError::InvalidPolicy {
                threshold,
                batch_size,
            });
        }

        Ok(Self {
            threshold,
            batch_size,
        })
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// Number of rows a table holds right after one eviction at threshold.
    pub fn floor(&self) -> u64 {
        self.threshold - self.batch_size
    }

    /// Normalizes a row count into the tracker's counter range.
    pub fn normalize(&self, count: u64) -> u64 {
        count % self.threshold
    }

    pub fn is_over(&self, count: u64) -> bool {
        count >= self.threshold
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}
