// SPDX-License-Identifier: MPL-2.0
//
// Anslag
//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this file,
//   You can obtain one at https://mozilla.org/MPL/2.0/.

mod announcement;

use std::io;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;

pub use self::announcement::Announcement;

const SECONDS_PER_DAY: f64 = 86400.0;

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("cannot read persist file: {0}")]
    Read(#[from] io::Error),
    #[error("cannot parse persist file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot serialize queue: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("cannot write persist file: {0}")]
    Write(#[from] io::Error),
}

/// Ordered, time-bounded collection of announcements (oldest first, newest
/// last). The in-memory sequence is the authoritative source for reads; the
/// persistence file is a best-effort mirror, read once at construction and
/// rewritten in full after every mutation that changed the sequence.
pub struct AnnouncementQueue {
    announcements: RwLock<Vec<Announcement>>,
    persist_path: Option<PathBuf>,
    lifetime: Duration,

    // Serializes snapshot-and-write cycles so two persists never interleave
    // on the same file
    persist_lock: Mutex<()>,
}

impl AnnouncementQueue {
    /// Builds the queue, seeding it from `persist_path` if one is given. A
    /// missing or unreadable persistence file is never fatal: the queue just
    /// starts empty.
    pub fn new(persist_path: Option<PathBuf>, lifetime_days: f64) -> Self {
        let announcements = match &persist_path {
            Some(path) => {
                tracing::info!("restoring queue from {}", path.display());

                match Self::restore(path) {
                    Ok(announcements) => announcements,
                    Err(RestoreError::Read(err)) if err.kind() == io::ErrorKind::NotFound => {
                        tracing::info!("persist file not found ({})", path.display());

                        Vec::new()
                    }
                    Err(err) => {
                        tracing::error!("failed to restore queue ({err})");

                        Vec::new()
                    }
                }
            }
            None => {
                tracing::info!("ephemeral queue, persist path not set");

                Vec::new()
            }
        };

        tracing::info!("queue has {} announcements", announcements.len());

        AnnouncementQueue {
            announcements: RwLock::new(announcements),
            persist_path,
            lifetime: Duration::seconds_f64(lifetime_days * SECONDS_PER_DAY),
            persist_lock: Mutex::new(()),
        }
    }

    fn restore(path: &Path) -> Result<Vec<Announcement>, RestoreError> {
        let raw = std::fs::read_to_string(path)?;

        Ok(serde_json::from_str(&raw)?)
    }

    /// Appends an announcement stamped with the current time, then rewrites
    /// the persistence file if one is configured. The write is awaited, never
    /// fire-and-forget, but its failure does not roll the append back.
    pub async fn append(&self, user: &str, announcement: &str) {
        {
            let mut announcements = self.announcements.write();

            // Timestamp taken under the write lock, so insertion order is
            // timestamp order
            announcements.push(Announcement {
                user: user.to_string(),
                announcement: announcement.to_string(),
                timestamp: OffsetDateTime::now_utc(),
            });
        }

        if self.persist_path.is_some() {
            self.handle_persist().await;
        }
    }

    /// Last announcement in the queue, or `None` when empty. The HTTP layer
    /// substitutes the empty placeholder object; the list endpoint does not.
    pub fn latest(&self) -> Option<Announcement> {
        self.announcements.read().last().cloned()
    }

    /// The `limit` most recent announcements in storage order (most recent
    /// last). A non-positive limit yields nothing.
    pub fn list(&self, limit: i64) -> Vec<Announcement> {
        if limit <= 0 {
            return Vec::new();
        }

        let announcements = self.announcements.read();
        let skip = announcements.len().saturating_sub(limit as usize);

        announcements[skip..].to_vec()
    }

    /// Full sequence, oldest first.
    pub fn snapshot(&self) -> Vec<Announcement> {
        self.announcements.read().clone()
    }

    pub fn len(&self) -> usize {
        self.announcements.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.announcements.read().is_empty()
    }

    /// Drops every announcement whose age reached the configured lifetime,
    /// preserving the relative order of survivors. The persistence file is
    /// only rewritten when the purge actually removed something.
    pub async fn purge(&self, now: OffsetDateTime) {
        let removed = {
            let mut announcements = self.announcements.write();
            let old_count = announcements.len();

            announcements.retain(|announcement| now - announcement.timestamp < self.lifetime);

            old_count - announcements.len()
        };

        if removed > 0 {
            tracing::info!("purged {removed} expired announcements");

            if self.persist_path.is_some() {
                self.handle_persist().await;
            }
        }
    }

    async fn handle_persist(&self) {
        if let Err(err) = self.persist().await {
            tracing::error!("failed to persist queue ({err})");
        }
    }

    async fn persist(&self) -> Result<(), PersistError> {
        let Some(path) = &self.persist_path else {
            return Ok(());
        };

        let _guard = self.persist_lock.lock().await;

        // Snapshot under the persist lock: the last writer to the file always
        // carries a state at least as new as any earlier writer's
        let payload = {
            let announcements = self.announcements.read();

            serde_json::to_vec_pretty(&*announcements)?
        };

        tracing::info!("persisting queue to {}", path.display());

        tokio::fs::write(path, payload).await?;

        Ok(())
    }
}
