// SPDX-License-Identifier: MPL-2.0
//
// Anslag
//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this file,
//   You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::queue::AnnouncementQueue;

/// Fires a queue purge on a fixed period until the shutdown channel flips.
/// A slow purge delays the next firing, it never overlaps it.
pub async fn run(
    queue: Arc<AnnouncementQueue>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    tracing::debug!("purger started (period: {}s)", period.as_secs());

    let mut ticker = tokio::time::interval(period);

    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // An interval yields immediately on its first tick; consume it so the
    // first purge happens one full period after startup
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                queue.purge(OffsetDateTime::now_utc()).await;
            }
            _ = shutdown.changed() => {
                break;
            }
        }
    }

    tracing::debug!("purger stopped");
}
