//! Session store: who is signed in.
//!
//! Holds the actor and the persisted session snapshot. Sign-in never fails
//! from the caller's point of view; see [`DemoFallback`].

use std::sync::{Arc, PoisonError, RwLock};

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::gateway::{decode_body, endpoints, GatewayError, RemoteGateway};
use crate::models::{User, UserPatch, UserRole};
use crate::storage::{load_json, save_json, KeyValueStore, ACTOR_KEY, AUTH_TOKEN_KEY};
use crate::store::commands::profile_write;
use crate::store::outbox::Outbox;

pub mod fallback;

pub use fallback::{avatar_for, DemoFallback, SignInSource};

/// Password sent when the caller supplies none. Demo accounts share it.
pub const DEFAULT_PASSWORD: &str = "password";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// `restore` has not run yet.
    Uninitialized,
    Anonymous,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignIn {
    pub actor: User,
    pub source: SignInSource,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    user: Value,
}

#[derive(Debug, Default)]
struct Inner {
    initialized: bool,
    actor: Option<User>,
}

pub struct SessionStore {
    inner: RwLock<Inner>,
    gateway: Arc<dyn RemoteGateway>,
    storage: Arc<dyn KeyValueStore>,
    outbox: Outbox,
    fallback: DemoFallback,
}

impl SessionStore {
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        storage: Arc<dyn KeyValueStore>,
        outbox: Outbox,
    ) -> Self {
        Self::with_fallback(gateway, storage, outbox, DemoFallback::default())
    }

    pub fn with_fallback(
        gateway: Arc<dyn RemoteGateway>,
        storage: Arc<dyn KeyValueStore>,
        outbox: Outbox,
        fallback: DemoFallback,
    ) -> Self {
        Self {
            inner: RwLock::default(),
            gateway,
            storage,
            outbox,
            fallback,
        }
    }

    pub fn actor(&self) -> Option<User> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .actor
            .clone()
    }

    pub fn state(&self) -> SessionState {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        match (inner.initialized, inner.actor.is_some()) {
            (false, _) => SessionState::Uninitialized,
            (true, false) => SessionState::Anonymous,
            (true, true) => SessionState::Authenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    fn set_actor(&self, actor: Option<User>) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.initialized = true;
        inner.actor = actor;
    }

    fn persist_actor(&self, actor: &User) {
        if let Err(e) = save_json(self.storage.as_ref(), ACTOR_KEY, actor) {
            warn!("Could not persist session snapshot: {e}");
        }
    }

    fn persist_token(&self, token: &str) {
        if let Err(e) = self.storage.set(AUTH_TOKEN_KEY, token) {
            warn!("Could not persist auth token: {e}");
        }
    }

    fn has_token(&self) -> bool {
        match self.storage.get(AUTH_TOKEN_KEY) {
            Ok(token) => token.is_some_and(|t| !t.is_empty()),
            Err(e) => {
                warn!("Could not read auth token: {e}");
                false
            }
        }
    }

    fn saved_actor(&self) -> Option<User> {
        load_json(self.storage.as_ref(), ACTOR_KEY).unwrap_or_else(|e| {
            warn!("Could not read session snapshot: {e}");
            None
        })
    }

    /// Restores the session at startup. With a token the backend is asked for
    /// the current user; if that fails the persisted snapshot is used as-is.
    pub async fn restore(&self) -> SessionState {
        let saved = self.saved_actor();

        let actor = if self.has_token() {
            let fetched = match self.gateway.get(endpoints::CURRENT_USER).await {
                Ok(body) => decode_body::<User>(body),
                Err(e) => Err(e),
            };
            match fetched {
                Ok(user) => {
                    debug!("Session refreshed from backend for {}", user.id);
                    self.persist_actor(&user);
                    Some(user)
                }
                Err(e) => {
                    warn!("Could not refresh session, using saved snapshot: {e}");
                    saved
                }
            }
        } else {
            saved
        };

        self.set_actor(actor);
        let state = self.state();
        info!("Session restored: {state:?}");
        state
    }

    /// Signs in with `email` as `role`. Any backend failure falls through to
    /// the demo fallback, so this always yields an actor.
    pub async fn sign_in(&self, email: &str, role: UserRole, password: Option<&str>) -> SignIn {
        let password = password.unwrap_or(DEFAULT_PASSWORD);

        let (actor, source) = match self.remote_sign_in(email, role, password).await {
            Ok((actor, token)) => {
                if let Some(token) = token.filter(|t| !t.is_empty()) {
                    self.persist_token(&token);
                }
                (actor, SignInSource::Remote)
            }
            Err(e) => {
                warn!("Backend login failed, using demo fallback: {e}");
                let (actor, source) = self.fallback.resolve(email, role);
                self.persist_token(self.fallback.token());
                (actor, source)
            }
        };

        self.persist_actor(&actor);
        self.set_actor(Some(actor.clone()));
        info!("Signed in {} as {:?} ({:?})", actor.id, actor.role, source);
        SignIn { actor, source }
    }

    async fn remote_sign_in(
        &self,
        email: &str,
        role: UserRole,
        password: &str,
    ) -> Result<(User, Option<String>), GatewayError> {
        let body = json!({ "email": email, "password": password, "role": role });
        let response: LoginResponse = decode_body(self.gateway.post(endpoints::LOGIN, &body).await?)?;

        let Value::Object(mut user) = response.user else {
            return Err(GatewayError::Payload("login response user is not an object".into()));
        };
        // The role picked at sign-in wins over whatever the backend stored.
        user.insert("role".into(), serde_json::to_value(role)?);
        let has_avatar = user
            .get("avatar")
            .and_then(Value::as_str)
            .is_some_and(|a| !a.is_empty());
        if !has_avatar {
            user.insert("avatar".into(), Value::String(avatar_for(email)));
        }

        let actor: User = serde_json::from_value(Value::Object(user))?;
        Ok((actor, response.token))
    }

    /// Clears the actor and the persisted session. Domain collections are
    /// left untouched.
    pub async fn sign_out(&self) {
        if let Err(e) = self.gateway.post(endpoints::LOGOUT, &json!({})).await {
            debug!("Logout call failed, clearing session anyway: {e}");
        }

        {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            inner.initialized = true;
            inner.actor = None;
        }
        for key in [ACTOR_KEY, AUTH_TOKEN_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!("Could not clear '{key}': {e}");
            }
        }
        info!("Signed out");
    }

    /// Merges `patch` into the actor, persists the snapshot and queues the
    /// remote update. Returns the updated actor, or `None` when signed out.
    pub fn update_actor(&self, patch: &UserPatch) -> Option<User> {
        let updated = {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            let actor = inner.actor.as_mut()?;
            patch.apply_to(actor);
            actor.clone()
        };

        self.persist_actor(&updated);
        if !patch.is_empty() {
            self.outbox.enqueue(profile_write(&updated.id, patch));
        }
        Some(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::store::outbox::{OutboxWorker, RetryPolicy};
    use crate::test_support::FakeGateway;
    use std::time::Duration;

    struct Harness {
        gateway: FakeGateway,
        storage: Arc<MemoryStore>,
        session: SessionStore,
        worker: OutboxWorker,
    }

    fn harness() -> Harness {
        let gateway = FakeGateway::new();
        let storage = Arc::new(MemoryStore::new());
        let (outbox, worker) = Outbox::channel(
            Arc::new(gateway.clone()),
            RetryPolicy {
                max_attempts: 1,
                base_delay: Duration::ZERO,
            },
        );
        let session = SessionStore::new(Arc::new(gateway.clone()), storage.clone(), outbox);
        Harness {
            gateway,
            storage,
            session,
            worker,
        }
    }

    #[tokio::test]
    async fn test_starts_uninitialized_and_restores_anonymous() {
        let h = harness();
        assert_eq!(h.session.state(), SessionState::Uninitialized);
        assert_eq!(h.session.restore().await, SessionState::Anonymous);
        assert!(h.session.actor().is_none());
        // No token, so no backend call.
        assert!(h.gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_restore_prefers_backend_user_when_token_present() {
        let h = harness();
        h.storage.set(AUTH_TOKEN_KEY, "tok").unwrap();
        h.gateway.respond(
            "GET",
            "/user",
            json!({ "id": "42", "name": "Ada", "email": "ada@example.com", "role": "RECRUITER" }),
        );

        assert_eq!(h.session.restore().await, SessionState::Authenticated);
        let actor = h.session.actor().unwrap();
        assert_eq!(actor.id, "42");
        let saved: User = load_json(h.storage.as_ref(), ACTOR_KEY).unwrap().unwrap();
        assert_eq!(saved.id, "42");
    }

    #[tokio::test]
    async fn test_restore_falls_back_to_snapshot_when_backend_fails() {
        let h = harness();
        h.storage.set(AUTH_TOKEN_KEY, "tok").unwrap();
        let saved = crate::seed::users().remove(0);
        save_json(h.storage.as_ref(), ACTOR_KEY, &saved).unwrap();
        h.gateway.fail("GET", "/user", 500);

        assert_eq!(h.session.restore().await, SessionState::Authenticated);
        assert_eq!(h.session.actor().unwrap(), saved);
    }

    #[tokio::test]
    async fn test_sign_in_merges_backend_user_with_selected_role() {
        let h = harness();
        h.gateway.respond(
            "POST",
            "/login",
            json!({
                "token": "real-token",
                "user": { "id": "77", "name": "Grace", "email": "grace@navy.mil", "role": "CANDIDATE" }
            }),
        );

        let result = h.session.sign_in("grace@navy.mil", UserRole::Recruiter, None).await;
        assert_eq!(result.source, SignInSource::Remote);
        assert_eq!(result.actor.role, UserRole::Recruiter);
        assert_eq!(result.actor.avatar, "https://picsum.photos/seed/grace@navy.mil/200");
        assert!(result.actor.connections.is_empty());
        assert_eq!(h.storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("real-token"));

        let login = &h.gateway.calls_to("POST", "/login")[0];
        assert_eq!(
            login.body,
            Some(json!({ "email": "grace@navy.mil", "password": "password", "role": "RECRUITER" }))
        );
    }

    #[tokio::test]
    async fn test_sign_in_with_unknown_email_synthesizes_actor() {
        let h = harness();
        h.gateway.fail("POST", "/login", 503);

        let result = h
            .session
            .sign_in("nobody@nowhere.dev", UserRole::Candidate, Some("hunter2"))
            .await;
        assert_eq!(result.source, SignInSource::Synthesized);
        assert_eq!(result.actor.role, UserRole::Candidate);
        assert_eq!(result.actor.name, "nobody");
        assert!(h.session.is_authenticated());
        assert_eq!(
            h.storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(),
            Some(fallback::MOCK_TOKEN)
        );
    }

    #[tokio::test]
    async fn test_sign_in_with_malformed_payload_uses_seed_user() {
        let h = harness();
        h.gateway.respond("POST", "/login", json!({ "token": "t", "user": "oops" }));

        let result = h.session.sign_in("sarah@candidate.com", UserRole::Candidate, None).await;
        assert_eq!(result.source, SignInSource::Seed);
        assert_eq!(result.actor.id, "u1");
    }

    #[tokio::test]
    async fn test_sign_out_clears_session_even_when_logout_fails() {
        let h = harness();
        h.gateway.fail("POST", "/login", 503).fail("POST", "/logout", 500);
        h.session.sign_in("sarah@candidate.com", UserRole::Candidate, None).await;

        h.session.sign_out().await;
        assert_eq!(h.session.state(), SessionState::Anonymous);
        assert_eq!(h.storage.get(ACTOR_KEY).unwrap(), None);
        assert_eq!(h.storage.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert_eq!(h.gateway.calls_to("POST", "/logout").len(), 1);
    }

    #[tokio::test]
    async fn test_update_actor_persists_and_queues_put() {
        let mut h = harness();
        h.gateway.fail("POST", "/login", 503).respond_empty("PUT", "/user/u1");
        h.session.sign_in("sarah@candidate.com", UserRole::Candidate, None).await;

        let patch = UserPatch {
            headline: Some("Staff Engineer".into()),
            ..Default::default()
        };
        let updated = h.session.update_actor(&patch).unwrap();
        assert_eq!(updated.headline, "Staff Engineer");
        let saved: User = load_json(h.storage.as_ref(), ACTOR_KEY).unwrap().unwrap();
        assert_eq!(saved.headline, "Staff Engineer");

        let report = h.worker.drain().await;
        assert_eq!(report.delivered, 1);
        let put = &h.gateway.calls_to("PUT", "/user/u1")[0];
        assert_eq!(put.body, Some(json!({ "headline": "Staff Engineer" })));
    }

    #[tokio::test]
    async fn test_update_actor_without_session_is_a_no_op() {
        let mut h = harness();
        let patch = UserPatch {
            bio: Some("x".into()),
            ..Default::default()
        };
        assert!(h.session.update_actor(&patch).is_none());
        assert_eq!(h.worker.drain().await.total(), 0);
    }
}
