use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{ApiClient, AuthApi, ClientConfig, ClientError, ClientResult};
use crate::services::views::UserView;

/// What survives a restart: the bearer token and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: UserView,
}

#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> ClientResult<Option<StoredSession>>;
    async fn save(&self, session: &StoredSession) -> ClientResult<()>;
    async fn clear(&self) -> ClientResult<()>;
}

/// Keeps the session as a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> ClientResult<Option<StoredSession>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_slice(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                // An unreadable file is a signed-out session, not a failure.
                tracing::warn!(path = %self.path.display(), error = %err, "discarding corrupt session file");
                self.clear().await?;
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &StoredSession) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_vec_pretty(session)
            .map_err(|err| ClientError::Storage(err.to_string()))?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: Mutex<Option<StoredSession>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> ClientResult<Option<StoredSession>> {
        Ok(self.inner.lock().await.clone())
    }

    async fn save(&self, session: &StoredSession) -> ClientResult<()> {
        *self.inner.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        *self.inner.lock().await = None;
        Ok(())
    }
}

/// The signed-in user, passed explicitly to whatever acts on their behalf.
pub struct Session<S: TokenStore> {
    store: S,
    current: Option<StoredSession>,
    check_timeout: Duration,
}

impl<S: TokenStore> Session<S> {
    /// Restores whatever `store` holds. Call [`Session::check`] to confirm
    /// the restored token with the server.
    pub async fn init(store: S, config: &ClientConfig) -> ClientResult<Self> {
        let current = store.load().await?;
        Ok(Self {
            store,
            current,
            check_timeout: config.session_check_timeout,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn user(&self) -> Option<&UserView> {
        self.current.as_ref().map(|session| &session.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|session| session.token.as_str())
    }

    pub async fn login<A: AuthApi + ?Sized>(
        &mut self,
        api: &A,
        email: &str,
        password: &str,
    ) -> ClientResult<&UserView> {
        let payload = api.login(email, password).await?;
        let session = StoredSession {
            token: payload.token,
            user: payload.user,
        };
        self.store.save(&session).await?;
        Ok(&self.current.insert(session).user)
    }

    /// Confirms the token with the server. Returns `Ok(false)` when there is
    /// no session or the server rejected it (the session is then cleared).
    /// Timeouts and transport failures leave the session in place.
    pub async fn check<A: AuthApi + ?Sized>(&mut self, api: &A) -> ClientResult<bool> {
        let Some(token) = self.token().map(str::to_string) else {
            return Ok(false);
        };

        match tokio::time::timeout(self.check_timeout, api.me(&token)).await {
            Ok(Ok(user)) => {
                let session = StoredSession { token, user };
                self.store.save(&session).await?;
                self.current = Some(session);
                Ok(true)
            }
            Ok(Err(err)) if err.is_unauthorized() => {
                tracing::info!("stored session rejected, signing out");
                self.logout().await?;
                Ok(false)
            }
            Ok(Err(err)) => Err(err),
            Err(_) => Err(ClientError::Timeout(self.check_timeout)),
        }
    }

    pub async fn logout(&mut self) -> ClientResult<()> {
        self.current = None;
        self.store.clear().await
    }

    /// `client` carrying this session's token.
    pub fn authorize(&self, client: &ApiClient) -> ClientResult<ApiClient> {
        self.token()
            .map(|token| client.with_token(token))
            .ok_or(ClientError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use uuid::Uuid;

    use super::{FileTokenStore, MemoryTokenStore, Session, StoredSession, TokenStore};
    use crate::client::{AuthApi, ClientConfig, ClientError, ClientResult};
    use crate::services::views::{AuthPayload, UserView};

    fn user() -> UserView {
        UserView {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            role: "user".to_string(),
            last_login_at: None,
            created_at: Utc::now().fixed_offset(),
        }
    }

    enum MeBehaviour {
        Ok,
        Unauthorized,
        Hang,
    }

    struct FakeAuth {
        me: MeBehaviour,
    }

    #[async_trait::async_trait]
    impl AuthApi for FakeAuth {
        async fn login(&self, email: &str, _password: &str) -> ClientResult<AuthPayload> {
            Ok(AuthPayload {
                token: format!("token-for-{email}"),
                user: user(),
            })
        }

        async fn me(&self, _token: &str) -> ClientResult<UserView> {
            match self.me {
                MeBehaviour::Ok => Ok(user()),
                MeBehaviour::Unauthorized => Err(ClientError::Api {
                    status: 401,
                    message: "Invalid or expired token".to_string(),
                    errors: Vec::new(),
                }),
                MeBehaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(user())
                }
            }
        }
    }

    async fn signed_in(me: MeBehaviour) -> (Session<MemoryTokenStore>, FakeAuth) {
        let api = FakeAuth { me };
        let config = ClientConfig {
            session_check_timeout: Duration::from_millis(50),
            ..ClientConfig::default()
        };
        let mut session = Session::init(MemoryTokenStore::new(), &config)
            .await
            .expect("init");
        session
            .login(&api, "alice@example.com", "secret1")
            .await
            .expect("login");
        (session, api)
    }

    #[tokio::test]
    async fn login_persists_token_and_user() {
        let (session, _api) = signed_in(MeBehaviour::Ok).await;
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("token-for-alice@example.com"));
        assert!(session.store.load().await.expect("load").is_some());
    }

    #[tokio::test]
    async fn rejected_token_tears_session_down() {
        let (mut session, api) = signed_in(MeBehaviour::Unauthorized).await;

        assert!(!session.check(&api).await.expect("check"));
        assert!(!session.is_authenticated());
        assert!(session.store.load().await.expect("load").is_none());
    }

    #[tokio::test]
    async fn check_times_out_but_keeps_session() {
        let (mut session, api) = signed_in(MeBehaviour::Hang).await;

        let err = session.check(&api).await.expect_err("check should time out");
        assert!(matches!(err, ClientError::Timeout(timeout) if timeout == Duration::from_millis(50)));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn check_without_token_is_false() {
        let mut session = Session::init(MemoryTokenStore::new(), &ClientConfig::default())
            .await
            .expect("init");
        assert!(!session.check(&FakeAuth { me: MeBehaviour::Ok }).await.expect("check"));
    }

    #[tokio::test]
    async fn file_store_round_trips_and_clears() {
        let path = std::env::temp_dir().join(format!("ppwrify-session-{}.json", Uuid::new_v4()));
        let store = FileTokenStore::new(&path);
        assert!(store.load().await.expect("load").is_none());

        let stored = StoredSession {
            token: "abc".to_string(),
            user: user(),
        };
        store.save(&stored).await.expect("save");
        assert_eq!(store.load().await.expect("load"), Some(stored));

        store.clear().await.expect("clear");
        assert!(store.load().await.expect("load").is_none());
    }
}
