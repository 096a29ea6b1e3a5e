use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Node in the content tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub content_id: Uuid,
    pub parent_id: Option<Uuid>,
    /// Materialized path, `/` separated location ids from the root.
    pub path: String,
    pub depth: i32,
    pub hidden: bool,
}

/// A location moved to the recoverable holding area.
///
/// `id` equals the id of the source location so a trash item can be
/// correlated with the subtree it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrashItem {
    pub id: Uuid,
    pub location: Location,
    pub trashed_at: DateTime<Utc>,
}

impl TrashItem {
    pub fn new(location: Location) -> Self {
        Self {
            id: location.id,
            location,
            trashed_at: Utc::now(),
        }
    }
}
