//! Guest list types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marquee_core::{Email, GuestId, ProfileId, RsvpStatus};

/// A guest list entry, independent per user, no cross-entity invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestEntry {
    pub id: GuestId,
    pub user_id: ProfileId,
    #[serde(rename = "guest_name")]
    pub name: String,
    #[serde(rename = "guest_email")]
    pub email: Option<Email>,
    pub rsvp_status: RsvpStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a guest entry (RSVP defaults to pending).
#[derive(Debug, Clone, Serialize)]
pub struct NewGuest {
    pub user_id: ProfileId,
    #[serde(rename = "guest_name")]
    pub name: String,
    #[serde(rename = "guest_email")]
    pub email: Option<Email>,
}
