use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use super::{api::AuthApi, ClientResult};
use crate::users::repo_types::User;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the JSON-serialized user.
pub const USER_KEY: &str = "user";

/// String key/value store that survives restarts, the analogue of browser
/// local storage.
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&mut self, key: &str) -> ClientResult<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> ClientResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> ClientResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStorage {
    /// Opens `path`; a missing or unreadable file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, path = %path.display(), "session file corrupt; starting empty");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self { path, entries }
    }

    fn flush(&self) -> ClientResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&self.entries)?)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> ClientResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    /// Always rewrites the file, so a retry after a failed write still
    /// clears the key on disk.
    fn remove(&mut self, key: &str) -> ClientResult<()> {
        self.entries.remove(key);
        self.flush()
    }
}

/// Snapshot of who is logged in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub token: Option<String>,
}

/// Authentication state for one front-end instance. Constructed explicitly
/// with its storage and auth API; lifecycle is `init`, then any number of
/// `login`/`logout`.
///
/// A persisted token is trusted on `init` without asking the server.
pub struct SessionContext<S, A> {
    storage: S,
    auth: A,
    session: Session,
    last_error: Option<String>,
}

impl<S: SessionStorage, A: AuthApi> SessionContext<S, A> {
    /// Restores the session from storage. Authenticated only when both the
    /// token and a parseable user are present.
    pub fn init(storage: S, auth: A) -> Self {
        let token = storage.get(TOKEN_KEY).filter(|t| !t.is_empty());
        let user = storage
            .get(USER_KEY)
            .and_then(|raw| serde_json::from_str::<User>(&raw).ok());

        let session = match (token, user) {
            (Some(token), Some(user)) => {
                debug!(user_id = user.id, "session restored from storage");
                Session {
                    is_authenticated: true,
                    user: Some(user),
                    token: Some(token),
                }
            }
            _ => Session::default(),
        };

        Self {
            storage,
            auth,
            session,
            last_error: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    /// Message of the most recent failed login, for inline display.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns `false` on any failure and leaves the session untouched.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        let outcome = match self.auth.login(email, password).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "login failed");
                self.last_error = Some(e.to_string());
                return false;
            }
        };

        if let Err(e) = self.persist(&outcome.user, &outcome.token) {
            warn!(error = %e, "could not persist session");
            self.last_error = Some(e.to_string());
            return false;
        }

        info!(user_id = outcome.user.id, "logged in");
        self.last_error = None;
        self.session = Session {
            is_authenticated: true,
            user: Some(outcome.user),
            token: Some(outcome.token),
        };
        true
    }

    fn persist(&mut self, user: &User, token: &str) -> ClientResult<()> {
        let user_json = serde_json::to_string(user)?;
        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(USER_KEY, &user_json)
    }

    /// Local only; the token is never revoked server-side.
    pub fn logout(&mut self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(error = %e, key, "could not clear session key");
            }
        }
        self.session = Session::default();
        info!("logged out");
    }

    /// Hands the storage back, e.g. to simulate a restart.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{api::LoginSuccess, ClientError};
    use async_trait::async_trait;

    fn ana() -> User {
        User {
            id: 1,
            name: "Ana".into(),
            last_name: "Diaz".into(),
            email: "ana@example.com".into(),
            password_hash: String::new(),
            agency: "CABORCA".into(),
            is_superuser: 1,
        }
    }

    struct FakeAuth;

    #[async_trait]
    impl AuthApi for FakeAuth {
        async fn login(&self, email: &str, password: &str) -> ClientResult<LoginSuccess> {
            if email == "ana@example.com" && password == "s3cret" {
                Ok(LoginSuccess {
                    user: ana(),
                    token: "ab".repeat(32),
                })
            } else {
                Err(ClientError::Status {
                    status: 401,
                    message: "Invalid credentials".into(),
                })
            }
        }
    }

    /// Fails the test if anything tries to reach the server.
    struct OfflineAuth;

    #[async_trait]
    impl AuthApi for OfflineAuth {
        async fn login(&self, _: &str, _: &str) -> ClientResult<LoginSuccess> {
            panic!("no network expected");
        }
    }

    #[tokio::test]
    async fn fresh_storage_is_logged_out() {
        let ctx = SessionContext::init(MemoryStorage::default(), OfflineAuth);
        assert!(!ctx.is_authenticated());
        assert!(ctx.user().is_none());
    }

    #[tokio::test]
    async fn login_persists_and_flips_flag() {
        let mut ctx = SessionContext::init(MemoryStorage::default(), FakeAuth);
        assert!(ctx.login("ana@example.com", "s3cret").await);
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.user().map(|u| u.id), Some(1));

        let storage = ctx.into_storage();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().len(), 64);
        assert!(storage.get(USER_KEY).unwrap().contains("ana@example.com"));
    }

    #[tokio::test]
    async fn failed_login_leaves_state_unchanged() {
        let mut ctx = SessionContext::init(MemoryStorage::default(), FakeAuth);
        assert!(!ctx.login("ana@example.com", "wrong").await);
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.last_error(), Some("Invalid credentials"));
        assert!(ctx.into_storage().get(TOKEN_KEY).is_none());
    }

    #[tokio::test]
    async fn restored_session_is_trusted_without_network() {
        let mut ctx = SessionContext::init(MemoryStorage::default(), FakeAuth);
        assert!(ctx.login("ana@example.com", "s3cret").await);

        let reloaded = SessionContext::init(ctx.into_storage(), OfflineAuth);
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.user(), Some(&ana()));
    }

    #[tokio::test]
    async fn logout_survives_reload() {
        let mut ctx = SessionContext::init(MemoryStorage::default(), FakeAuth);
        assert!(ctx.login("ana@example.com", "s3cret").await);
        ctx.logout();
        assert!(!ctx.is_authenticated());

        let reloaded = SessionContext::init(ctx.into_storage(), OfflineAuth);
        assert!(!reloaded.is_authenticated());
    }

    #[tokio::test]
    async fn partial_or_corrupt_storage_is_logged_out() {
        let mut storage = MemoryStorage::default();
        storage.set(TOKEN_KEY, "tok").unwrap();
        let ctx = SessionContext::init(storage.clone(), OfflineAuth);
        assert!(!ctx.is_authenticated());

        storage.set(USER_KEY, "{not json").unwrap();
        let ctx = SessionContext::init(storage, OfflineAuth);
        assert!(!ctx.is_authenticated());
    }

    #[tokio::test]
    async fn file_storage_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut ctx = SessionContext::init(FileStorage::open(&path), FakeAuth);
        assert!(ctx.login("ana@example.com", "s3cret").await);
        drop(ctx);

        let mut ctx = SessionContext::init(FileStorage::open(&path), OfflineAuth);
        assert!(ctx.is_authenticated());
        ctx.logout();
        drop(ctx);

        let ctx = SessionContext::init(FileStorage::open(&path), OfflineAuth);
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn retried_remove_clears_key_after_failed_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        let mut storage = FileStorage::open(&path);
        storage.set(TOKEN_KEY, "t0k3n").unwrap();

        storage.path = blocker.join("session.json");
        assert!(storage.remove(TOKEN_KEY).is_err());
        assert_eq!(FileStorage::open(&path).get(TOKEN_KEY).as_deref(), Some("t0k3n"));

        storage.path = path.clone();
        storage.remove(TOKEN_KEY).unwrap();
        assert_eq!(FileStorage::open(&path).get(TOKEN_KEY), None);
    }
}
