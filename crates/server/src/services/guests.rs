//! Guest list management.

use marquee_core::{Email, GuestId, ProfileId};

use crate::models::{GuestEntry, NewGuest};
use crate::store::GuestStore;

use super::ServiceError;

/// Guest list operations over a guest store.
pub struct GuestService<'a, S> {
    store: &'a S,
}

impl<'a, S: GuestStore> GuestService<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Add a guest. The email is optional; when present it must parse.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Invalid`] for a blank name or malformed email.
    pub async fn add(
        &self,
        user: ProfileId,
        name: &str,
        email: Option<&str>,
    ) -> Result<GuestEntry, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("guest name is required".into()));
        }

        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(Email::parse)
            .transpose()
            .map_err(|error| ServiceError::Invalid(error.to_string()))?;

        Ok(self
            .store
            .insert_guest(NewGuest {
                user_id: user,
                name: name.to_owned(),
                email,
            })
            .await?)
    }

    /// The user's guest list, oldest first.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list(&self, user: ProfileId) -> Result<Vec<GuestEntry>, ServiceError> {
        Ok(self.store.guests_for_user(user).await?)
    }

    /// Remove a guest entry.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn remove(&self, id: GuestId) -> Result<(), ServiceError> {
        Ok(self.store.delete_guest(id).await?)
    }
}
