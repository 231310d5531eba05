//! Process-wide console context.
//!
//! One `ClinicContext` exists per running console. It is created at start-up,
//! receives the signed-in user on [`sign_in`](ClinicContext::sign_in) and is
//! emptied on [`sign_out`](ClinicContext::sign_out) or when the server answers
//! 401. It also owns the shared loading counter.

use crate::config::CoreConfig;
use crate::constants::SIGN_IN_ROUTE;
use crate::failure::{Failure, Notice};
use crate::loading::LoadingCounter;
use crate::roles::{Permission, Role};
use crate::{ClinicError, ClinicResult};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Snapshot of the signed-in staff member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedInUser {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub center_ids: Vec<String>,
}

impl SignedInUser {
    pub fn can(&self, permission: Permission) -> bool {
        self.role.allows(permission)
    }

    /// Whether this user may act on data of `center_id`.
    pub fn works_at(&self, center_id: &str) -> bool {
        self.role.spans_all_centres() || self.center_ids.iter().any(|c| c == center_id)
    }
}

/// What the console does after a failed action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reaction {
    /// Show the toast; stay on the page with its previous state.
    Notify(Notice),
    /// Session dropped: show the toast and go to `route`.
    Redirect { route: &'static str, notice: Notice },
}

#[derive(Debug)]
pub struct ClinicContext {
    cfg: Arc<CoreConfig>,
    user: RwLock<Option<SignedInUser>>,
    loading: LoadingCounter,
}

impl ClinicContext {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            cfg,
            user: RwLock::new(None),
            loading: LoadingCounter::new(),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn loading(&self) -> &LoadingCounter {
        &self.loading
    }

    pub fn sign_in(&self, user: SignedInUser) -> ClinicResult<()> {
        let mut slot = self.user.write().map_err(|_| ClinicError::LockPoisoned)?;
        tracing::info!("signed in as {} ({})", user.email, user.role);
        *slot = Some(user);
        Ok(())
    }

    /// Drops the session and resets the loading counter.
    pub fn sign_out(&self) -> ClinicResult<()> {
        let mut slot = self.user.write().map_err(|_| ClinicError::LockPoisoned)?;
        if let Some(user) = slot.take() {
            tracing::info!("signed out {}", user.email);
        }
        self.loading.reset();
        Ok(())
    }

    pub fn current_user(&self) -> ClinicResult<Option<SignedInUser>> {
        let slot = self.user.read().map_err(|_| ClinicError::LockPoisoned)?;
        Ok(slot.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.read().map(|u| u.is_some()).unwrap_or(false)
    }

    /// Whether the signed-in user has `permission`; `false` when signed out.
    pub fn can(&self, permission: Permission) -> bool {
        self.user
            .read()
            .map(|u| u.as_ref().is_some_and(|u| u.can(permission)))
            .unwrap_or(false)
    }

    /// Decides how the console reacts to `failure`.
    ///
    /// A 401 ends the session and redirects to the sign-in route; every other
    /// failure only produces its toast.
    pub fn handle_failure(&self, failure: &Failure) -> ClinicResult<Reaction> {
        let notice = failure.notice();
        if failure.is_unauthorized() {
            tracing::warn!("server rejected the session, signing out");
            self.sign_out()?;
            return Ok(Reaction::Redirect {
                route: SIGN_IN_ROUTE,
                notice,
            });
        }
        tracing::debug!("action failed: {}", failure);
        Ok(Reaction::Notify(notice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor() -> SignedInUser {
        SignedInUser {
            id: "u-1".into(),
            name: "Dr. S. Fernando".into(),
            email: "s.fernando@clinic.lk".into(),
            role: Role::Doctor,
            center_ids: vec!["c-1".into()],
        }
    }

    fn context() -> ClinicContext {
        ClinicContext::new(Arc::new(CoreConfig::default()))
    }

    #[test]
    fn sign_in_and_out_bracket_the_session() {
        let ctx = context();
        assert!(!ctx.is_signed_in());
        assert!(!ctx.can(Permission::WritePrescriptions));

        ctx.sign_in(doctor()).unwrap();
        assert!(ctx.can(Permission::WritePrescriptions));
        assert!(!ctx.can(Permission::ManageUsers));
        assert_eq!(ctx.current_user().unwrap().unwrap().name, "Dr. S. Fernando");

        ctx.sign_out().unwrap();
        assert_eq!(ctx.current_user().unwrap(), None);
    }

    #[test]
    fn unauthorised_clears_session_and_redirects() {
        let ctx = context();
        ctx.sign_in(doctor()).unwrap();
        let _pending = ctx.loading().begin();

        let reaction = ctx.handle_failure(&Failure::Unauthorized).unwrap();
        assert!(matches!(reaction, Reaction::Redirect { route: "/", .. }));
        assert!(!ctx.is_signed_in());
        assert!(!ctx.loading().is_busy());
    }

    #[test]
    fn other_failures_keep_the_session() {
        let ctx = context();
        ctx.sign_in(doctor()).unwrap();
        let failure = Failure::Server {
            status: 500,
            message: "Database unavailable".into(),
        };
        let reaction = ctx.handle_failure(&failure).unwrap();
        assert_eq!(reaction, Reaction::Notify(Notice::error("Database unavailable")));
        assert!(ctx.is_signed_in());
    }

    #[test]
    fn centre_scope_follows_role() {
        let mut user = doctor();
        assert!(user.works_at("c-1"));
        assert!(!user.works_at("c-2"));
        user.role = Role::SuperAdmin;
        assert!(user.works_at("c-2"));
    }

    #[test]
    fn user_snapshot_decodes_backend_shape() {
        let json = r#"{"_id":"u-9","name":"Ruwan","email":"ruwan@clinic.lk","role":"receptionist"}"#;
        let user: SignedInUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u-9");
        assert!(user.center_ids.is_empty());
        assert!(user.can(Permission::ManageAppointments));
    }
}
