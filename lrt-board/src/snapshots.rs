//! Latest reconciled board per station.
//!
//! Polls run independently and can finish out of order. Every board is
//! published with the sequence number of the poll that produced it, and a
//! board from an older poll never replaces one from a newer poll
//! (last-writer-wins by poll, not by arrival).
//!
//! Snapshots expire after a TTL, so a feed that stops updating decays to
//! "no data" instead of showing arrivals that have long since left.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use moka::future::Cache as MokaCache;
use moka::ops::compute::{CompResult, Op};
use serde::Serialize;
use tracing::debug;

use crate::board::ReconciledBoard;
use crate::domain::StationId;

/// Configuration for the snapshot store.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// How long a snapshot stays visible without being replaced.
    pub ttl: Duration,

    /// Maximum number of stations tracked.
    pub max_capacity: u64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(90), // three 30s poll cycles
            max_capacity: 256,
        }
    }
}

/// A reconciled board as published by one poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    /// Sequence number of the poll that produced this board.
    pub poll: u64,

    pub board: ReconciledBoard,

    /// Latest upstream update time in the poll's payload.
    pub feed_updated_at: Option<DateTime<FixedOffset>>,

    /// When the board was published here.
    pub received_at: DateTime<Utc>,
}

impl BoardSnapshot {
    pub fn new(
        poll: u64,
        board: ReconciledBoard,
        feed_updated_at: Option<DateTime<FixedOffset>>,
    ) -> Self {
        Self {
            poll,
            board,
            feed_updated_at,
            received_at: Utc::now(),
        }
    }
}

/// What happened to a published snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Stored,
    /// A newer poll had already been published for this station.
    Stale { current_poll: u64 },
}

/// Counts from publishing a whole line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublishSummary {
    pub stored: usize,
    pub stale: usize,
}

/// Store of the latest board per station.
pub struct BoardSnapshots {
    boards: MokaCache<StationId, Arc<BoardSnapshot>>,
}

impl BoardSnapshots {
    /// Create a new store with the given configuration.
    pub fn new(config: &SnapshotConfig) -> Self {
        let boards = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { boards }
    }

    /// Publish one station's board unless a newer poll got there first.
    ///
    /// A board from the same poll replaces the stored one.
    pub async fn publish(&self, snapshot: BoardSnapshot) -> PublishOutcome {
        let poll = snapshot.poll;
        let station_id = snapshot.board.station_id.clone();
        let incoming = Arc::new(snapshot);

        let result = self
            .boards
            .entry(station_id.clone())
            .and_compute_with(|existing| {
                let op = match existing {
                    Some(entry) if entry.value().poll > poll => Op::Nop,
                    _ => Op::Put(incoming),
                };
                std::future::ready(op)
            })
            .await;

        match result {
            CompResult::Unchanged(entry) => {
                let current_poll = entry.value().poll;
                debug!(station = %station_id, poll, current_poll, "discarding stale board");
                PublishOutcome::Stale { current_poll }
            }
            _ => PublishOutcome::Stored,
        }
    }

    /// Publish the boards of one poll.
    pub async fn publish_all(
        &self,
        poll: u64,
        boards: Vec<ReconciledBoard>,
        feed_updated_at: Option<DateTime<FixedOffset>>,
    ) -> PublishSummary {
        let mut summary = PublishSummary::default();

        for board in boards {
            match self
                .publish(BoardSnapshot::new(poll, board, feed_updated_at))
                .await
            {
                PublishOutcome::Stored => summary.stored += 1,
                PublishOutcome::Stale { .. } => summary.stale += 1,
            }
        }

        summary
    }

    /// The latest board for a station, if one is still fresh.
    pub async fn latest(&self, station_id: &StationId) -> Option<Arc<BoardSnapshot>> {
        self.boards.get(station_id).await
    }

    /// Approximate number of stored boards.
    pub fn entry_count(&self) -> u64 {
        self.boards.entry_count()
    }
}
