//! Profile listings for the admin overview.

use crate::models::ProfileWithRole;
use crate::store::ProfileStore;

use super::ServiceError;

/// Profile listing operations over a profile store.
pub struct ProfileService<'a, S> {
    store: &'a S,
}

impl<'a, S: ProfileStore> ProfileService<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// All profiles joined with their role assignments, newest first.
    ///
    /// A profile with no role row appears with `role: None` rather than
    /// being dropped, so unprovisioned accounts stay visible to admins.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list_with_roles(&self) -> Result<Vec<ProfileWithRole>, ServiceError> {
        let profiles = self.store.list_profiles().await?;

        let mut rows = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let role = self.store.role_for_profile(profile.id).await?;
            rows.push(ProfileWithRole { profile, role });
        }
        Ok(rows)
    }
}
