//! Time-derived workspace identifiers

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::data::WorkspaceId;

/// Largest id a caller may supply; every id up to it survives a JSON number
/// round trip through the host exactly.
pub const MAX_WORKSPACE_ID: u64 = (1 << 53) - 1;

/// Mints workspace ids from the wall clock.
///
/// Ids are milliseconds since the epoch, bumped past the previous id when two
/// are requested within the same millisecond, so ids minted by one generator
/// never collide and always increase.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next id
    pub fn next(&self) -> WorkspaceId {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        WorkspaceId(now.max(previous.saturating_add(1)))
    }

    /// Make sure future ids are minted after `id` (used for caller-supplied ids)
    pub fn observe(&self, id: WorkspaceId) {
        self.last.fetch_max(id.0, Ordering::SeqCst);
    }
}
