//! Shared helpers for backend integration tests.
//!
//! Integration tests compile as separate crates, so each suite declares
//! `mod support;` and uses the helpers it needs.

#![allow(dead_code, reason = "each suite uses a subset of the helpers")]

pub mod memory_store;
pub mod pg;

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock frozen at one instant.
pub struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    /// Clock reading `2026-02-24 10:30:00` UTC.
    pub fn frozen() -> Arc<dyn Clock> {
        Arc::new(Self {
            utc_now: Utc
                .with_ymd_and_hms(2026, 2, 24, 10, 30, 0)
                .single()
                .expect("valid fixture timestamp"),
        })
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}
