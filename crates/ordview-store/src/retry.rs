//! Retrying saves that fail transiently.
//!
//! A [`SaveRetry`] is part of a screen's configuration:
//!
//! ```toml
//! [save_retry]
//! retries = 3
//! backoff = { kind = "doubling", first_ms = 50, cap_ms = 400 }
//! ```
//!
//! Only [`StoreError::is_transient`](crate::StoreError::is_transient)
//! failures are retried; an invalid order or a revision conflict would fail
//! the same way again.

use ordview_core::{ItemId, SectionId};
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::Result;
use crate::section::Revision;
use crate::store::OrderStore;

/// Pause between two save attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SaveBackoff {
    #[default]
    Immediate,
    Fixed { delay_ms: u64 },
    /// `first_ms`, then twice the previous pause, never above `cap_ms`.
    Doubling { first_ms: u64, cap_ms: u64 },
}

/// How many times a transiently failed save is repeated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveRetry {
    /// Attempts after the first one; 0 saves once.
    pub retries: u32,
    pub backoff: SaveBackoff,
}

impl SaveRetry {
    /// A single attempt.
    #[must_use]
    pub const fn once() -> Self {
        Self {
            retries: 0,
            backoff: SaveBackoff::Immediate,
        }
    }

    #[must_use]
    pub const fn immediate(retries: u32) -> Self {
        Self {
            retries,
            backoff: SaveBackoff::Immediate,
        }
    }

    #[must_use]
    pub const fn fixed(retries: u32, delay_ms: u64) -> Self {
        Self {
            retries,
            backoff: SaveBackoff::Fixed { delay_ms },
        }
    }

    #[must_use]
    pub const fn doubling(retries: u32, first_ms: u64, cap_ms: u64) -> Self {
        Self {
            retries,
            backoff: SaveBackoff::Doubling { first_ms, cap_ms },
        }
    }

    /// Problems that make the settings unusable; empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        match self.backoff {
            SaveBackoff::Doubling { first_ms, cap_ms } if first_ms > cap_ms => vec![format!(
                "backoff first_ms ({first_ms}) must not exceed cap_ms ({cap_ms})"
            )],
            _ => Vec::new(),
        }
    }

    /// Pause before repeating after `failures` failed attempts (1-based).
    fn pause_after(&self, failures: u32) -> Duration {
        let millis = match self.backoff {
            SaveBackoff::Immediate => 0,
            SaveBackoff::Fixed { delay_ms } => delay_ms,
            SaveBackoff::Doubling { first_ms, cap_ms } => {
                let factor = 1u64.checked_shl(failures - 1).unwrap_or(u64::MAX);
                first_ms.saturating_mul(factor).min(cap_ms)
            }
        };
        Duration::from_millis(millis)
    }

    /// Save `order`, repeating transient failures.
    ///
    /// Permanent errors are returned at once; after the last retry the final
    /// error is returned.
    pub fn save<S: OrderStore + ?Sized>(
        &self,
        store: &S,
        section: &SectionId,
        order: &[ItemId],
    ) -> Result<Revision> {
        let mut failures = 0;
        loop {
            match store.save_order(section, order) {
                Ok(revision) => return Ok(revision),
                Err(err) if err.is_transient() && failures < self.retries => {
                    failures += 1;
                    let pause = self.pause_after(failures);
                    tracing::warn!(
                        target: "ordview.store",
                        section = %section,
                        failures,
                        pause_ms = u64::try_from(pause.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "save failed, retrying"
                    );
                    if !pause.is_zero() {
                        std::thread::sleep(pause);
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::memory::MemoryOrderStore;
    use crate::section::{ItemRecord, SectionRecord};
    use ordview_core::Attributes;

    fn store() -> MemoryOrderStore {
        MemoryOrderStore::with_sections([SectionRecord::new("s", "S")
            .with_item("a", ItemRecord::new(Attributes::default()))
            .with_item("b", ItemRecord::new(Attributes::default()))])
    }

    fn order() -> Vec<ItemId> {
        vec![ItemId::new("b"), ItemId::new("a")]
    }

    #[test]
    fn doubling_pauses_are_capped() {
        let retry = SaveRetry::doubling(4, 10, 25);
        let pauses: Vec<u128> = (1..=4).map(|n| retry.pause_after(n).as_millis()).collect();
        assert_eq!(pauses, [10, 20, 25, 25]);
        assert_eq!(SaveRetry::doubling(1, 1, 500).pause_after(200).as_millis(), 500);
        assert_eq!(SaveRetry::fixed(2, 7).pause_after(2).as_millis(), 7);
    }

    #[test]
    fn validate_flags_inverted_bounds() {
        assert_eq!(SaveRetry::doubling(1, 10, 5).validate().len(), 1);
        assert!(SaveRetry::default().validate().is_empty());
        assert_eq!(SaveRetry::default(), SaveRetry::once());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let retry: SaveRetry = serde_json::from_str(r#"{"retries": 2}"#).expect("parse");
        assert_eq!(retry, SaveRetry::immediate(2));
    }

    #[test]
    fn transient_failures_are_retried() {
        let store = store();
        store.fail_next_saves(2);
        let revision = SaveRetry::immediate(2)
            .save(&store, &SectionId::new("s"), &order())
            .expect("third attempt succeeds");
        assert_eq!(revision, Revision::new(1));
    }

    #[test]
    fn retries_are_bounded() {
        let store = store();
        store.fail_next_saves(3);
        let err = SaveRetry::immediate(2)
            .save(&store, &SectionId::new("s"), &order())
            .expect_err("out of retries");
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn permanent_errors_are_not_retried() {
        let store = store();
        let err = SaveRetry::immediate(2)
            .save(&store, &SectionId::new("s"), &order()[..1])
            .expect_err("subset");
        assert!(matches!(err, StoreError::NotAPermutation { .. }));
        assert_eq!(store.revision(&SectionId::new("s")).expect("revision"), Revision::ZERO);
    }
}
