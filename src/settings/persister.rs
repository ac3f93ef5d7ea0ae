// ABOUTME: Batch persister committing a diff as independent per-key writes
// ABOUTME: Bounded concurrency, per-write timeout, cancellation, and a result covering every key
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::table::SettingsTable;
use super::timeout_millis;
use super::types::{BatchResult, CommittedValue, Diff};
use crate::errors::CommitError;
use clinic_core::constants::settings;
use futures_util::stream::{self, StreamExt};
use std::future::{self, Future};
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Limits applied to one commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOptions {
    /// Writes allowed in flight at once
    pub max_in_flight: usize,
    /// Upper bound on a single write
    pub write_timeout: Duration,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self {
            max_in_flight: settings::DEFAULT_COMMIT_CONCURRENCY,
            write_timeout: Duration::from_secs(settings::DEFAULT_WRITE_TIMEOUT_SECS),
        }
    }
}

/// Sends a diff to the remote table, one write per key
///
/// A commit is not atomic across keys: each write succeeds or fails on its
/// own and the result says which. Nothing is retried here.
pub struct BatchPersister {
    table: Arc<dyn SettingsTable>,
    options: CommitOptions,
}

impl BatchPersister {
    /// Persister writing to `table`
    #[must_use]
    pub fn new(table: Arc<dyn SettingsTable>, options: CommitOptions) -> Self {
        Self { table, options }
    }

    /// Limits in use
    #[must_use]
    pub const fn options(&self) -> CommitOptions {
        self.options
    }

    /// Write every key of `diff`
    ///
    /// Resolves once all writes have settled. An empty diff returns an empty
    /// result without touching the table.
    pub async fn commit(&self, diff: &Diff) -> BatchResult {
        self.commit_or_cancel(diff, future::pending()).await
    }

    /// Like [`commit`](Self::commit), stopped early when `cancel` resolves
    ///
    /// Keys whose write had not settled at cancellation are reported as
    /// `CommitError::Cancelled`; keys that already settled keep their outcome.
    pub async fn commit_or_cancel<C>(&self, diff: &Diff, cancel: C) -> BatchResult
    where
        C: Future<Output = ()> + Send,
    {
        let mut result = BatchResult::default();
        if diff.is_empty() {
            debug!("Nothing to commit");
            return result;
        }

        info!(
            keys = diff.len(),
            max_in_flight = self.options.max_in_flight,
            "Committing settings"
        );

        let mut writes = pin!(stream::iter(diff.iter())
            .map(|(key, value)| async move { (key, self.write(key, value).await) })
            .buffer_unordered(self.options.max_in_flight.max(1)));
        let mut cancel = pin!(cancel);

        // cancel is polled first, so it can win even after the last write settled
        let cancelled = loop {
            tokio::select! {
                biased;
                () = &mut cancel => break true,
                next = writes.next() => match next {
                    Some((key, Ok(committed))) => {
                        debug!(key = %key, "Setting saved");
                        result.committed.insert(key.clone(), committed);
                    }
                    Some((key, Err(error))) => {
                        warn!(key = %key, error = %error, "Setting failed to save");
                        result.failed.insert(key.clone(), error);
                    }
                    None => break false,
                },
            }
        };

        // a cancel that lands once every key has an outcome changes nothing
        let cancelled = cancelled && result.len() < diff.len();
        if cancelled {
            for key in diff.keys() {
                if !result.committed.contains_key(key) && !result.failed.contains_key(key) {
                    result.failed.insert(key.clone(), CommitError::Cancelled);
                }
            }
            warn!(
                committed = result.committed.len(),
                failed = result.failed.len(),
                "Commit cancelled"
            );
        } else {
            info!(
                committed = result.committed.len(),
                failed = result.failed.len(),
                "Commit finished"
            );
        }
        result
    }

    async fn write(&self, key: &str, value: &str) -> Result<CommittedValue, CommitError> {
        let timeout = self.options.write_timeout;
        match tokio::time::timeout(timeout, self.table.update_value(key, value)).await {
            Ok(Ok(updated_at)) => Ok(CommittedValue {
                value: value.to_owned(),
                updated_at,
            }),
            Ok(Err(error)) => Err(error.into()),
            Err(_) => Err(CommitError::TimedOut {
                after_ms: timeout_millis(timeout),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TableError;
    use crate::test_utils::{sample_rows, MemoryTable};
    use std::task::Poll;

    fn persister(table: &Arc<MemoryTable>, options: CommitOptions) -> BatchPersister {
        BatchPersister::new(Arc::clone(table) as Arc<dyn SettingsTable>, options)
    }

    fn diff(pairs: &[(&str, &str)]) -> Diff {
        pairs
            .iter()
            .map(|&(key, value)| (key.to_owned(), value.to_owned()))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_diff_makes_no_calls() {
        let table = Arc::new(MemoryTable::new(sample_rows()));
        let result = persister(&table, CommitOptions::default())
            .commit(&Diff::new())
            .await;

        assert!(result.is_empty());
        assert_eq!(table.write_calls(), 0);
    }

    #[tokio::test]
    async fn test_partial_failure_reports_every_key() {
        let table = Arc::new(MemoryTable::new(sample_rows()));
        table.fail_writes_for("site.about", TableError::Unavailable("reset".to_owned()));
        let diff = diff(&[
            ("site.title", "New Clinic"),
            ("site.about", "Walk-ins welcome."),
            ("site.gone", "x"),
        ]);

        let result = persister(&table, CommitOptions::default()).commit(&diff).await;

        assert_eq!(result.len(), 3);
        assert_eq!(result.committed["site.title"].value, "New Clinic");
        assert!(matches!(
            result.failed["site.about"],
            CommitError::Table(TableError::Unavailable(_))
        ));
        assert!(matches!(
            result.failed["site.gone"],
            CommitError::Table(TableError::NotFound { .. })
        ));
        assert_eq!(table.value("site.title").as_deref(), Some("New Clinic"));
        assert_eq!(table.write_calls(), 3);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let table = Arc::new(MemoryTable::new(sample_rows()));
        table.set_write_delay(Duration::from_millis(20));
        let diff = diff(&[
            ("site.title", "a"),
            ("site.about", "b"),
            ("appearance.primary_color", "#000000"),
            ("appearance.logo", "/assets/x.png"),
            ("booking.slot_minutes", "15"),
        ]);
        let options = CommitOptions {
            max_in_flight: 2,
            write_timeout: Duration::from_secs(5),
        };

        let result = persister(&table, options).commit(&diff).await;

        assert!(result.is_success());
        assert_eq!(result.committed.len(), 5);
        assert!(table.peak_in_flight() <= 2);
    }

    #[tokio::test]
    async fn test_slow_write_times_out() {
        let table = Arc::new(MemoryTable::new(sample_rows()));
        table.set_write_delay(Duration::from_secs(30));
        let options = CommitOptions {
            max_in_flight: 4,
            write_timeout: Duration::from_secs(1),
        };

        let result = persister(&table, options)
            .commit(&diff(&[("site.title", "slow")]))
            .await;

        assert_eq!(
            result.failed["site.title"],
            CommitError::TimedOut { after_ms: 1_000 }
        );
    }

    #[tokio::test]
    async fn test_cancelled_commit_marks_unsettled_keys() {
        let table = Arc::new(MemoryTable::new(sample_rows()));
        let diff = diff(&[("site.title", "a"), ("site.about", "b")]);

        let result = persister(&table, CommitOptions::default())
            .commit_or_cancel(&diff, future::ready(()))
            .await;

        assert_eq!(result.len(), 2);
        assert!(result.committed.is_empty());
        assert!(result.was_cancelled());
        assert!(result
            .failed
            .values()
            .all(|error| *error == CommitError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_after_last_write_settled_keeps_outcomes() {
        let table = Arc::new(MemoryTable::new(sample_rows()));
        let watched = Arc::clone(&table);
        // ready only once the write is stored, racing the stream's final poll
        let cancel = future::poll_fn(move |_| {
            if watched.value("site.title").as_deref() == Some("New Clinic") {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        });

        let result = persister(&table, CommitOptions::default())
            .commit_or_cancel(&diff(&[("site.title", "New Clinic")]), cancel)
            .await;

        assert!(result.is_success());
        assert!(!result.was_cancelled());
        assert_eq!(result.committed["site.title"].value, "New Clinic");
    }
}
