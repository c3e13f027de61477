//! Client session lifecycle.
//!
//! The session manager owns the in-memory copy of the signed-in user and the
//! token, keeps the durable store and memory in step, and exposes a loading
//! flag so UIs can hold rendering until rehydration has run.

use crate::api::ApiClient;
use crate::errors::ClientError;
use crate::session::store::{SessionStore, StoredSession};
use crate::session::types::{
    LoginRequest, RegisterRequest, RegisterResponse, SessionResponse, UserView,
};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    /// A login or register call is in flight. Failure restores the state
    /// that was current when the call started.
    Authenticating,
    Authenticated { token: String, user: UserView },
}

/// Outcome of a registration call, shaped by the server's policy.
#[derive(Debug)]
pub enum RegisterOutcome {
    /// The server opened a session; the store and memory hold it already.
    SignedIn(UserView),
    /// The server accepted the account without a session.
    Accepted { message: Option<String> },
}

pub struct AuthSession {
    api: ApiClient,
    store: Arc<dyn SessionStore>,
    state: SessionState,
    loading: bool,
}

impl AuthSession {
    /// Creates a session that still needs [`Self::rehydrate`]. The loading
    /// flag starts raised so a UI built on top of this shows nothing stale.
    #[must_use]
    pub fn new(api: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            state: SessionState::Unauthenticated,
            loading: true,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// UI convenience only; authorization always happens server side.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserView> {
        match &self.state {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Restores a persisted session into memory.
    ///
    /// Runs exactly once per session object; later calls are no-ops. A corrupt
    /// store is cleared and treated as signed out rather than surfaced, so a
    /// half-written session from a previous run cannot wedge startup.
    pub fn rehydrate(&mut self) {
        if !self.loading {
            return;
        }

        match self.store.load() {
            Ok(Some(session)) => {
                self.state = SessionState::Authenticated {
                    token: session.token,
                    user: session.user,
                };
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!("discarding unreadable session: {err}");
                if let Err(err) = self.store.clear() {
                    tracing::warn!("failed to clear session store: {err}");
                }
            }
        }
        self.loading = false;
    }

    /// Signs in and persists the resulting session.
    ///
    /// The store is written before memory changes; any failure restores the
    /// state that was current when the call started, with the store
    /// untouched.
    ///
    /// # Errors
    ///
    /// `Api` for rejected credentials, `Network`/`Parse`/`Storage` as usual.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&UserView, ClientError> {
        let prior = std::mem::replace(&mut self.state, SessionState::Authenticating);

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: Result<SessionResponse, ClientError> =
            self.api.post_json("/api/auth/login", &request, None).await;

        match response {
            Ok(session) => self.adopt(prior, session.token, session.user),
            Err(err) => {
                self.state = prior;
                Err(err)
            }
        }
    }

    /// Registers a new account. When the server replies with a session it is
    /// adopted exactly like a login; otherwise the prior state is restored.
    ///
    /// # Errors
    ///
    /// `Api` for rejected registrations, `Network`/`Parse`/`Storage` as usual.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisterOutcome, ClientError> {
        let prior = std::mem::replace(&mut self.state, SessionState::Authenticating);

        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: Result<RegisterResponse, ClientError> = self
            .api
            .post_json("/api/auth/register", &request, None)
            .await;

        match response {
            Ok(response) => match (response.token, response.user) {
                (Some(token), Some(user)) => {
                    let user = self.adopt(prior, token, user)?.clone();
                    Ok(RegisterOutcome::SignedIn(user))
                }
                _ => {
                    self.state = prior;
                    Ok(RegisterOutcome::Accepted {
                        message: response.message,
                    })
                }
            },
            Err(err) => {
                self.state = prior;
                Err(err)
            }
        }
    }

    /// Replaces the user view in memory and in the store, keeping the token.
    /// Used after a profile edit; does not re-validate the token.
    ///
    /// # Errors
    ///
    /// `Config` when signed out, `Storage` when the store write fails (the
    /// in-memory view is then left unchanged).
    pub fn update_user(&mut self, user: UserView) -> Result<(), ClientError> {
        let SessionState::Authenticated { token, .. } = &self.state else {
            return Err(ClientError::Config("not signed in".to_string()));
        };
        let token = token.clone();

        self.store.save(&StoredSession {
            token: token.clone(),
            user: user.clone(),
        })?;
        self.state = SessionState::Authenticated { token, user };
        Ok(())
    }

    /// Signs out. Clearing an already-clear session succeeds.
    ///
    /// # Errors
    ///
    /// `Storage` when the store cannot be cleared; memory is left signed in
    /// so the caller can retry without losing the token.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.store.clear()?;
        self.state = SessionState::Unauthenticated;
        Ok(())
    }

    /// Persists then adopts a session. Store first: a failed write restores
    /// `prior` and leaves memory as it was.
    fn adopt(
        &mut self,
        prior: SessionState,
        token: String,
        user: UserView,
    ) -> Result<&UserView, ClientError> {
        if let Err(err) = self.store.save(&StoredSession {
            token: token.clone(),
            user: user.clone(),
        }) {
            self.state = prior;
            return Err(err.into());
        }
        self.state = SessionState::Authenticated { token, user };
        match &self.state {
            SessionState::Authenticated { user, .. } => Ok(user),
            _ => unreachable!("state assigned above"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::MemorySessionStore;

    fn user() -> UserView {
        UserView {
            id: "2f0c9c9e-6f0a-4f41-93a8-2f9f5b1f0c11".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: "customer".into(),
        }
    }

    fn session_with(store: Arc<dyn SessionStore>) -> AuthSession {
        AuthSession::new(ApiClient::new("http://localhost:5000"), store)
    }

    #[test]
    fn starts_loading_and_signed_out() {
        let session = session_with(Arc::new(MemorySessionStore::new()));
        assert!(session.is_loading());
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn rehydrate_restores_persisted_session() {
        let store = Arc::new(MemorySessionStore::new());
        store
            .save(&StoredSession {
                token: "abc.def.ghi".into(),
                user: user(),
            })
            .unwrap();

        let mut session = session_with(store);
        session.rehydrate();

        assert!(!session.is_loading());
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("abc.def.ghi"));
        assert_eq!(session.user().map(|u| u.email.as_str()), Some("ada@example.com"));
    }

    #[test]
    fn rehydrate_with_empty_store_finishes_loading() {
        let mut session = session_with(Arc::new(MemorySessionStore::new()));
        session.rehydrate();

        assert!(!session.is_loading());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn rehydrate_clears_torn_store() {
        let store = Arc::new(MemorySessionStore::new());
        store.put_raw("token", "abc.def.ghi");

        let mut session = session_with(Arc::clone(&store) as Arc<dyn SessionStore>);
        session.rehydrate();

        assert!(!session.is_loading());
        assert!(!session.is_authenticated());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn rehydrate_runs_once() {
        let store = Arc::new(MemorySessionStore::new());
        let mut session = session_with(Arc::clone(&store) as Arc<dyn SessionStore>);
        session.rehydrate();

        // A session persisted after the first rehydrate is not picked up.
        store
            .save(&StoredSession {
                token: "abc.def.ghi".into(),
                user: user(),
            })
            .unwrap();
        session.rehydrate();

        assert!(!session.is_authenticated());
    }

    #[test]
    fn adopt_writes_store_before_memory() {
        let store = Arc::new(MemorySessionStore::new());
        let mut session = session_with(Arc::clone(&store) as Arc<dyn SessionStore>);
        session.rehydrate();

        session
            .adopt(SessionState::Unauthenticated, "abc.def.ghi".into(), user())
            .unwrap();

        assert!(session.is_authenticated());
        assert_eq!(
            store.load().unwrap(),
            Some(StoredSession {
                token: "abc.def.ghi".into(),
                user: user(),
            })
        );
    }

    #[test]
    fn update_user_keeps_the_token() {
        let store = Arc::new(MemorySessionStore::new());
        let mut session = session_with(Arc::clone(&store) as Arc<dyn SessionStore>);
        session.rehydrate();
        session
            .adopt(SessionState::Unauthenticated, "abc.def.ghi".into(), user())
            .unwrap();

        let mut renamed = user();
        renamed.name = "Ada Renamed".into();
        session.update_user(renamed.clone()).unwrap();

        assert_eq!(session.token(), Some("abc.def.ghi"));
        assert_eq!(session.user(), Some(&renamed));
        assert_eq!(
            store.load().unwrap(),
            Some(StoredSession {
                token: "abc.def.ghi".into(),
                user: renamed,
            })
        );
    }

    #[test]
    fn update_user_requires_a_session() {
        let mut session = session_with(Arc::new(MemorySessionStore::new()));
        session.rehydrate();

        let result = session.update_user(user());
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn logout_clears_store_and_memory() {
        let store = Arc::new(MemorySessionStore::new());
        let mut session = session_with(Arc::clone(&store) as Arc<dyn SessionStore>);
        session.rehydrate();
        session
            .adopt(SessionState::Unauthenticated, "abc.def.ghi".into(), user())
            .unwrap();

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(store.load().unwrap(), None);

        // Logging out twice is fine.
        session.logout().unwrap();
    }
}
