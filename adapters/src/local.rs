//! Local email/password authentication backend.
//!
//! Users and the single active session are held in memory and, when a state
//! file is configured, mirrored to it after every change so a restart can
//! restore the previous session. Passwords are stored as Argon2 PHC strings.

use std::path::PathBuf;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use log::{debug, info};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    errors::AdapterError,
    models::{AuthEvent, Identity},
    AuthBackend,
};

const MIN_PASSWORD_LEN: usize = 6;
const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    identity: Identity,
    password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ActiveSession {
    token: String,
    user_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AuthState {
    #[serde(default)]
    users: Vec<UserRecord>,
    #[serde(default)]
    active: Option<ActiveSession>,
}

impl AuthState {
    fn find_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.identity.email == email)
    }
}

pub struct LocalAuthBackend {
    state: RwLock<AuthState>,
    path: Option<PathBuf>,
    hasher: Argon2<'static>,
    events: broadcast::Sender<AuthEvent>,
}

impl LocalAuthBackend {
    /// Backend with no state file; everything is lost on drop.
    pub fn in_memory() -> Self {
        Self::with_state(AuthState::default(), None)
    }

    /// Loads the state file at `path`, starting empty if it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AdapterError> {
        let path = path.into();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<AuthState>(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => AuthState::default(),
            Err(err) => return Err(err.into()),
        };
        info!(
            "Loaded auth state from {} ({} users)",
            path.display(),
            state.users.len()
        );
        Ok(Self::with_state(state, Some(path)))
    }

    pub fn with_hasher(mut self, hasher: Argon2<'static>) -> Self {
        self.hasher = hasher;
        self
    }

    fn with_state(state: AuthState, path: Option<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: RwLock::new(state),
            path,
            hasher: Argon2::default(),
            events,
        }
    }

    async fn persist(&self) -> Result<(), AdapterError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = {
            let state = self.state.read();
            serde_json::to_vec_pretty(&*state)?
        };
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    /// Runs on the blocking pool, as does verification.
    async fn hash_password(&self, password: &str) -> Result<String, AdapterError> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || -> Result<String, AdapterError> {
            let mut salt_bytes = [0u8; 16];
            getrandom::getrandom(&mut salt_bytes)
                .map_err(|err| AdapterError::PasswordHash(err.to_string()))?;
            let salt = SaltString::encode_b64(&salt_bytes)
                .map_err(|err| AdapterError::PasswordHash(err.to_string()))?;
            let phc = hasher
                .hash_password(password.as_bytes(), &salt)
                .map_err(|err| AdapterError::PasswordHash(err.to_string()))?;
            Ok(phc.to_string())
        })
        .await
        .map_err(|err| AdapterError::PasswordHash(err.to_string()))?
    }

    async fn verify_password(&self, phc: String, password: &str) -> Result<bool, AdapterError> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || match PasswordHash::new(&phc) {
            Ok(parsed) => hasher.verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        })
        .await
        .map_err(|err| AdapterError::PasswordHash(err.to_string()))
    }

    async fn start_session(&self, identity: Identity) -> Result<Identity, AdapterError> {
        let token = new_token()?;
        self.state.write().active = Some(ActiveSession {
            token,
            user_id: identity.id,
        });
        self.persist().await?;

        debug!("Session started for {}", identity.email);
        // No receivers is fine.
        let _ = self.events.send(AuthEvent::SignedIn(identity.clone()));
        Ok(identity)
    }
}

#[async_trait]
impl AuthBackend for LocalAuthBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AdapterError> {
        let email = normalize_email(email);
        validate_email(&email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AdapterError::InvalidInput(format!(
                "Password should be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.state.read().find_by_email(&email).is_some() {
            return Err(AdapterError::EmailTaken(email));
        }

        let password_hash = self.hash_password(password).await?;
        let identity = Identity::new(email.clone());
        {
            let mut state = self.state.write();
            // Re-checked under the write lock; hashing above runs unlocked.
            if state.find_by_email(&email).is_some() {
                return Err(AdapterError::EmailTaken(email));
            }
            state.users.push(UserRecord {
                identity: identity.clone(),
                password_hash,
            });
        }
        info!("Registered {}", identity.email);

        self.start_session(identity).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AdapterError> {
        let email = normalize_email(email);
        let record = self
            .state
            .read()
            .find_by_email(&email)
            .cloned()
            .ok_or(AdapterError::InvalidCredentials)?;

        if !self.verify_password(record.password_hash, password).await? {
            return Err(AdapterError::InvalidCredentials);
        }

        self.start_session(record.identity).await
    }

    async fn sign_out(&self) -> Result<(), AdapterError> {
        let was_active = self.state.write().active.take().is_some();
        if !was_active {
            return Ok(());
        }
        self.persist().await?;

        debug!("Session ended");
        let _ = self.events.send(AuthEvent::SignedOut);
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<Identity>, AdapterError> {
        let state = self.state.read();
        let Some(active) = &state.active else {
            return Ok(None);
        };
        state
            .users
            .iter()
            .find(|u| u.identity.id == active.user_id)
            .map(|u| Some(u.identity.clone()))
            .ok_or_else(|| {
                AdapterError::Corrupt(format!("session refers to unknown user {}", active.user_id))
            })
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), AdapterError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(AdapterError::InvalidInput(format!(
            "{email} is not a valid email address"
        ))),
    }
}

/// 256-bit random session token, hex encoded.
fn new_token() -> Result<String, AdapterError> {
    let mut buf = [0u8; 32];
    getrandom::getrandom(&mut buf).map_err(|err| AdapterError::Unavailable(err.to_string()))?;
    Ok(hex::encode(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{Algorithm, Params, Version};
    use tokio::sync::broadcast::error::TryRecvError;

    fn cheap_hasher() -> Argon2<'static> {
        Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Params::new(8, 1, 1, None).unwrap(),
        )
    }

    fn backend() -> LocalAuthBackend {
        LocalAuthBackend::in_memory().with_hasher(cheap_hasher())
    }

    #[tokio::test]
    async fn sign_up_then_sign_in_ignores_email_case() {
        let auth = backend();
        let created = auth.sign_up(" Ada@Example.com ", "hunter22").await.unwrap();
        assert_eq!(created.email, "ada@example.com");

        auth.sign_out().await.unwrap();
        let signed_in = auth.sign_in("ADA@example.com", "hunter22").await.unwrap();
        assert_eq!(signed_in.id, created.id);
        assert_eq!(auth.current_session().await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let auth = backend();
        auth.sign_up("ada@example.com", "hunter22").await.unwrap();

        let wrong = auth.sign_in("ada@example.com", "hunter23").await.unwrap_err();
        let unknown = auth.sign_in("bob@example.com", "hunter22").await.unwrap_err();
        assert!(matches!(wrong, AdapterError::InvalidCredentials));
        assert!(matches!(unknown, AdapterError::InvalidCredentials));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn password_hashing_yields_to_other_tasks() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let auth = backend();
        let ticks = AtomicUsize::new(0);
        let ticker = async {
            loop {
                ticks.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
            }
        };

        tokio::select! {
            biased;
            created = auth.sign_up("ada@example.com", "hunter22") => {
                created.unwrap();
            }
            _ = ticker => {}
        }
        assert!(ticks.load(Ordering::SeqCst) > 0);
    }

    #[tokio::test]
    async fn sign_up_rejects_bad_input() {
        let auth = backend();
        auth.sign_up("ada@example.com", "hunter22").await.unwrap();

        assert!(matches!(
            auth.sign_up("ada@example.com", "another1").await,
            Err(AdapterError::EmailTaken(_))
        ));
        assert!(matches!(
            auth.sign_up("bob@example.com", "short").await,
            Err(AdapterError::InvalidInput(_))
        ));
        assert!(matches!(
            auth.sign_up("not-an-email", "hunter22").await,
            Err(AdapterError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn events_follow_sign_in_and_sign_out() {
        let auth = backend();
        let mut events = auth.subscribe();

        let identity = auth.sign_up("ada@example.com", "hunter22").await.unwrap();
        assert_eq!(events.try_recv().unwrap(), AuthEvent::SignedIn(identity));

        auth.sign_out().await.unwrap();
        assert_eq!(events.try_recv().unwrap(), AuthEvent::SignedOut);

        // Already signed out: nothing to announce.
        auth.sign_out().await.unwrap();
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("auth.json");

        let auth = LocalAuthBackend::open(&path).await.unwrap().with_hasher(cheap_hasher());
        let identity = auth.sign_up("ada@example.com", "hunter22").await.unwrap();
        drop(auth);

        let reopened = LocalAuthBackend::open(&path).await.unwrap();
        assert_eq!(reopened.current_session().await.unwrap(), Some(identity));

        reopened.sign_out().await.unwrap();
        let again = LocalAuthBackend::open(&path).await.unwrap();
        assert_eq!(again.current_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn dangling_session_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");
        let state = serde_json::json!({
            "active": { "token": "abc", "user_id": Uuid::new_v4() }
        });
        std::fs::write(&path, state.to_string()).unwrap();

        let auth = LocalAuthBackend::open(&path).await.unwrap();
        assert!(matches!(
            auth.current_session().await,
            Err(AdapterError::Corrupt(_))
        ));
    }
}
