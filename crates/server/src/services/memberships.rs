//! Vendor membership lifecycle: add, extend, cancel.

use chrono::{DateTime, Months, Utc};

use marquee_core::{MembershipId, MembershipPlan, MembershipStatus, ProfileId};

use crate::models::{Membership, MembershipUpdate, NewMembership};
use crate::store::MembershipStore;

use super::ServiceError;

/// End date for a plan starting at `start`.
///
/// Calendar-month arithmetic with day-of-month clamping: a start on a day
/// the target month lacks lands on that month's last day.
#[must_use]
pub fn plan_end(start: DateTime<Utc>, plan: MembershipPlan) -> DateTime<Utc> {
    start
        .checked_add_months(Months::new(plan.months()))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Membership lifecycle operations over a membership store.
pub struct MembershipService<'a, S> {
    store: &'a S,
}

impl<'a, S: MembershipStore> MembershipService<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Grant a vendor a new membership starting now.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn add(
        &self,
        vendor: ProfileId,
        plan: MembershipPlan,
    ) -> Result<Membership, ServiceError> {
        let start = Utc::now();
        Ok(self
            .store
            .insert_membership(NewMembership {
                vendor_id: vendor,
                plan,
                start_date: start,
                end_date: plan_end(start, plan),
            })
            .await?)
    }

    /// Extend an existing membership by a plan's duration.
    ///
    /// The offset is applied to the stored end date, not to now, so an
    /// extension bought early loses nothing. The stored plan is
    /// overwritten with the extension plan and the status is forced back
    /// to active, which deliberately reactivates a cancelled membership.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] if no membership has this id.
    pub async fn extend(
        &self,
        id: MembershipId,
        plan: MembershipPlan,
    ) -> Result<Membership, ServiceError> {
        let current = self
            .store
            .membership_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("membership {id}")))?;

        Ok(self
            .store
            .update_membership(
                id,
                MembershipUpdate {
                    plan: Some(plan),
                    end_date: Some(plan_end(current.end_date, plan)),
                    status: Some(MembershipStatus::Active),
                },
            )
            .await?)
    }

    /// Cancel a membership. Only the status changes; dates and plan stay
    /// as a record of what was granted.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] if no membership has this id.
    pub async fn cancel(&self, id: MembershipId) -> Result<Membership, ServiceError> {
        self.store
            .update_membership(
                id,
                MembershipUpdate {
                    status: Some(MembershipStatus::Cancelled),
                    ..MembershipUpdate::default()
                },
            )
            .await
            .map_err(|error| match error {
                crate::store::StoreError::NotFound => {
                    ServiceError::NotFound(format!("membership {id}"))
                }
                other => ServiceError::Store(other),
            })
    }

    /// All memberships, newest first (admin listing).
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list(&self) -> Result<Vec<Membership>, ServiceError> {
        Ok(self.store.list_memberships().await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_plan_end_six_months() {
        assert_eq!(
            plan_end(date(2024, 3, 10), MembershipPlan::SixMonths),
            date(2024, 9, 10)
        );
    }

    #[test]
    fn test_plan_end_one_year() {
        assert_eq!(
            plan_end(date(2024, 1, 15), MembershipPlan::OneYear),
            date(2025, 1, 15)
        );
    }

    #[test]
    fn test_plan_end_two_years() {
        assert_eq!(
            plan_end(date(2024, 6, 1), MembershipPlan::TwoYears),
            date(2026, 6, 1)
        );
    }

    #[test]
    fn test_plan_end_clamps_to_last_day_of_shorter_month() {
        // Aug 31 + 6 months: February has no 31st.
        assert_eq!(
            plan_end(date(2023, 8, 31), MembershipPlan::SixMonths),
            date(2024, 2, 29)
        );
        assert_eq!(
            plan_end(date(2024, 8, 31), MembershipPlan::SixMonths),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn test_plan_end_leap_day_plus_year() {
        assert_eq!(
            plan_end(date(2024, 2, 29), MembershipPlan::OneYear),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn test_plan_end_preserves_time_of_day() {
        let start = Utc.with_ymd_and_hms(2024, 5, 20, 7, 45, 30).unwrap();
        let end = plan_end(start, MembershipPlan::OneYear);
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 5, 20, 7, 45, 30).unwrap());
    }
}
