//! Session and role resolution.
//!
//! The [`SessionManager`] maintains the single authoritative
//! `{identity, profile_id, role, loading}` snapshot consumed by the rest
//! of the application. It is an explicitly constructed object owned by
//! the application state; consumers observe it through a watch
//! subscription, never through an ambient global.
//!
//! Two resolution paths converge on the same invariant: a one-shot
//! session check at construction, and the auth provider's change-event
//! subscription. Both perform the same two-step lookup
//! (profile-by-identity, then role-by-profile) and publish one full
//! replacement snapshot. No interim state is ever visible.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use marquee_core::{ProfileId, Role};

use crate::store::{AuthChange, AuthError, AuthProvider, ProfileStore, SignUpMetadata};
use crate::models::Identity;

/// The resolved session state.
///
/// Tri-state: resolving (`loading` true), signed out, or signed in with
/// the profile/role lookups applied. Every published value is a complete
/// snapshot; `PartialEq` makes resolution idempotence directly testable.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    pub profile_id: Option<ProfileId>,
    pub role: Option<Role>,
    pub loading: bool,
}

impl SessionSnapshot {
    /// The initial state, before the first resolution completes.
    #[must_use]
    pub const fn resolving() -> Self {
        Self {
            identity: None,
            profile_id: None,
            role: None,
            loading: true,
        }
    }

    /// The signed-out state.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            identity: None,
            profile_id: None,
            role: None,
            loading: false,
        }
    }
}

/// Resolve an identity to a full snapshot.
///
/// A missing profile row yields authenticated-but-unprovisioned
/// (`profile_id` and `role` both `None`); a missing role row yields
/// `role: None`. Lookup errors resolve the same way, with a warning -
/// the snapshot is still complete, never half-updated.
async fn resolve<S: ProfileStore>(store: &S, identity: Identity) -> SessionSnapshot {
    let profile = match store.profile_by_identity(identity.id).await {
        Ok(profile) => profile,
        Err(error) => {
            tracing::warn!(%error, "profile lookup failed during session resolution");
            None
        }
    };

    let Some(profile) = profile else {
        return SessionSnapshot {
            identity: Some(identity),
            profile_id: None,
            role: None,
            loading: false,
        };
    };

    let role = match store.role_for_profile(profile.id).await {
        Ok(role) => role,
        Err(error) => {
            tracing::warn!(%error, "role lookup failed during session resolution");
            None
        }
    };

    SessionSnapshot {
        identity: Some(identity),
        profile_id: Some(profile.id),
        role,
        loading: false,
    }
}

/// Owns the resolver task and the snapshot channel.
///
/// Dropping the manager aborts the resolver task, releasing the auth
/// subscription; a store response arriving after that is simply
/// discarded.
pub struct SessionManager<A> {
    auth: Arc<A>,
    snapshot: watch::Sender<SessionSnapshot>,
    resolver: JoinHandle<()>,
}

impl<A: AuthProvider + 'static> SessionManager<A> {
    /// Construct the manager and start its resolver task.
    ///
    /// The task first runs the one-shot session check, then follows the
    /// provider's change events for the life of the manager.
    #[must_use]
    pub fn new<S: ProfileStore + 'static>(auth: Arc<A>, store: Arc<S>) -> Self {
        let (snapshot, _) = watch::channel(SessionSnapshot::resolving());

        // Subscribe before the one-shot check so a change firing in
        // between is never lost.
        let events = auth.subscribe();

        let resolver = tokio::spawn(resolver_loop(
            Arc::clone(&auth),
            store,
            snapshot.clone(),
            events,
        ));

        Self {
            auth,
            snapshot,
            resolver,
        }
    }

    /// Subscribe to snapshot updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.subscribe()
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Delegate a password sign-in to the provider.
    ///
    /// Does not update the snapshot; the resulting state change arrives
    /// through the subscription.
    ///
    /// # Errors
    ///
    /// Surfaces the provider's failure ([`AuthError::InvalidCredentials`],
    /// transport errors) for the caller to present.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.auth.sign_in_with_password(email, password).await
    }

    /// Delegate account creation to the provider.
    ///
    /// # Errors
    ///
    /// Surfaces the provider's failure (duplicate account, weak password).
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignUpMetadata,
    ) -> Result<(), AuthError> {
        self.auth.sign_up(email, password, metadata).await
    }

    /// Delegate sign-out; the subscription drives the snapshot back to
    /// signed-out.
    ///
    /// # Errors
    ///
    /// Surfaces provider transport failures.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.auth.sign_out().await
    }
}

impl<A> Drop for SessionManager<A> {
    fn drop(&mut self) {
        self.resolver.abort();
    }
}

async fn resolver_loop<A: AuthProvider, S: ProfileStore>(
    auth: Arc<A>,
    store: Arc<S>,
    snapshot: watch::Sender<SessionSnapshot>,
    mut events: broadcast::Receiver<AuthChange>,
) {
    // One-shot path: resolve whatever session already exists.
    match auth.get_session().await {
        Ok(Some(identity)) => {
            snapshot.send_replace(resolve(store.as_ref(), identity).await);
        }
        Ok(None) => {
            snapshot.send_replace(SessionSnapshot::signed_out());
        }
        Err(error) => {
            tracing::warn!(%error, "initial session check failed");
            snapshot.send_replace(SessionSnapshot::signed_out());
        }
    }

    // Event path: every change re-resolves to a full snapshot. Repeated
    // events for the same identity are harmless; resolution is idempotent.
    loop {
        match events.recv().await {
            Ok(AuthChange {
                session: Some(identity),
            }) => {
                // Hard ordering requirement: the provider holds its auth
                // lock while delivering this event and disallows further
                // auth calls until it returns. Yield back to the scheduler
                // before resolving.
                tokio::task::yield_now().await;
                snapshot.send_replace(resolve(store.as_ref(), identity).await);
            }
            Ok(AuthChange { session: None }) => {
                snapshot.send_replace(SessionSnapshot::signed_out());
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                // Only the latest state matters; re-resolve from scratch.
                tracing::warn!(skipped, "auth event stream lagged");
                match auth.get_session().await {
                    Ok(Some(identity)) => {
                        tokio::task::yield_now().await;
                        snapshot.send_replace(resolve(store.as_ref(), identity).await);
                    }
                    Ok(None) => {
                        snapshot.send_replace(SessionSnapshot::signed_out());
                    }
                    Err(error) => {
                        tracing::warn!(%error, "session check failed after lag");
                    }
                }
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
