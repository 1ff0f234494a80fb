//! Vendor membership types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marquee_core::{MembershipId, MembershipPlan, MembershipStatus, ProfileId};

/// A vendor's time-bounded membership record.
///
/// Created by admin action; mutated only by admin extend/cancel actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,
    pub vendor_id: ProfileId,
    #[serde(rename = "membership_type")]
    pub plan: MembershipPlan,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: MembershipStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a membership (status defaults to active).
#[derive(Debug, Clone, Serialize)]
pub struct NewMembership {
    pub vendor_id: ProfileId,
    #[serde(rename = "membership_type")]
    pub plan: MembershipPlan,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Partial update applied by the membership lifecycle operations.
///
/// `None` fields are left untouched by the store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MembershipUpdate {
    #[serde(rename = "membership_type", skip_serializing_if = "Option::is_none")]
    pub plan: Option<MembershipPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MembershipStatus>,
}
