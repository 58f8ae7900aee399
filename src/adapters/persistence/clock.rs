//! Creation timestamps that never go backwards within one store handle.
//!
//! Listing sorts by `created_at`; if the wall clock steps back, a plain
//! `Utc::now()` would place a newer post below older ones.

use crate::domain::DomainError;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug, Default)]
pub struct CreationClock {
    last_ms: AtomicI64,
}

impl CreationClock {
    /// Start from the newest timestamp already persisted.
    pub fn starting_at(last_ms: i64) -> Self {
        Self {
            last_ms: AtomicI64::new(last_ms),
        }
    }

    /// Wall-clock millis, clamped to the last value issued.
    pub fn stamp(&self) -> Result<DateTime<Utc>, DomainError> {
        to_datetime(self.stamp_at(Utc::now().timestamp_millis()))
    }

    pub fn stamp_at(&self, now_ms: i64) -> i64 {
        let prev = self.last_ms.fetch_max(now_ms, Ordering::SeqCst);
        prev.max(now_ms)
    }
}

pub fn to_datetime(ms: i64) -> Result<DateTime<Utc>, DomainError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| DomainError::Repo(format!("invalid created_at: {ms}")))
}
