//! Click entity representing a single successful resolution.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A click event recorded when a shortened link is resolved.
///
/// One row per successful resolution; the owning link's `click_count` is
/// incremented in the same transaction that inserts the row, so the counter
/// and the event log cannot drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    pub id: Uuid,
    pub link_id: Uuid,
    pub clicked_at: DateTime<Utc>,
}

impl Click {
    /// Creates a new Click instance.
    pub fn new(id: Uuid, link_id: Uuid, clicked_at: DateTime<Utc>) -> Self {
        Self {
            id,
            link_id,
            clicked_at,
        }
    }
}
