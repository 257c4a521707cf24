use crate::api::{ ApiError, ChatApi };
use crate::models::auth::User;
use crate::store::{
    CredentialStore,
    StoreError,
    ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    USER_KEY,
};
use log::{ info, warn };
use std::error::Error;
use std::sync::{ Arc, RwLock };

#[derive(Clone, Debug)]
struct Credentials {
    access_token: String,
    // Persisted alongside the access token but never exchanged for a new
    // one; an expired session fails with the server's auth error.
    refresh_token: String,
    user: User,
}

/// The single owner of the bearer credential. Every request issuer reads it
/// through here; only the auth flows write it.
pub struct AuthContext {
    state: RwLock<Option<Credentials>>,
    store: Arc<dyn CredentialStore>,
}

impl AuthContext {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            state: RwLock::new(None),
            store,
        }
    }

    /// Rehydrate a previous session from the durable store. Returns whether
    /// a stored session was found.
    pub fn restore(&self) -> Result<bool, StoreError> {
        let access_token = self.store.get(ACCESS_TOKEN_KEY)?;
        let refresh_token = self.store.get(REFRESH_TOKEN_KEY)?;
        let user_json = self.store.get(USER_KEY)?;

        if let (Some(access_token), Some(user_json)) = (access_token, user_json) {
            let user: User = serde_json::from_str(&user_json)?;
            info!("Restored session for: {}", user.username);
            let mut state = self.state.write().unwrap();
            *state = Some(Credentials {
                access_token,
                refresh_token: refresh_token.unwrap_or_default(),
                user,
            });
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn establish(
        &self,
        user: User,
        access_token: String,
        refresh_token: String
    ) -> Result<(), StoreError> {
        self.store.set(ACCESS_TOKEN_KEY, &access_token)?;
        self.store.set(REFRESH_TOKEN_KEY, &refresh_token)?;
        self.store.set(USER_KEY, &serde_json::to_string(&user)?)?;

        let mut state = self.state.write().unwrap();
        *state = Some(Credentials {
            access_token,
            refresh_token,
            user,
        });
        Ok(())
    }

    /// Drop the session, in memory and on disk. Store failures are logged
    /// and swallowed; the in-memory credential is always gone afterwards.
    pub fn clear(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to remove stored credential '{}': {}", key, e);
            }
        }
        let mut state = self.state.write().unwrap();
        *state = None;
    }

    pub fn bearer_token(&self) -> Option<String> {
        let state = self.state.read().unwrap();
        state.as_ref().map(|c| c.access_token.clone())
    }

    pub fn current_user(&self) -> Option<User> {
        let state = self.state.read().unwrap();
        state.as_ref().map(|c| c.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().unwrap().is_some()
    }
}

/// Login, register and logout flows on top of the remote client and the
/// credential context.
pub struct AuthSession {
    api: Arc<dyn ChatApi>,
    auth: Arc<AuthContext>,
}

impl AuthSession {
    pub fn new(api: Arc<dyn ChatApi>, auth: Arc<AuthContext>) -> Self {
        Self { api, auth }
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str
    ) -> Result<User, Box<dyn Error + Send + Sync>> {
        let resp = self.api.login(email, password).await?;
        self.adopt(resp.user, resp.access_token, resp.refresh_token, "login")
    }

    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str
    ) -> Result<User, Box<dyn Error + Send + Sync>> {
        let resp = self.api.register(email, username, password).await?;
        self.adopt(resp.user, resp.access_token, resp.refresh_token, "register")
    }

    /// Ends the session. The remote call is best-effort: the local
    /// credential is cleared whether or not the server acknowledged.
    pub async fn logout(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        match self.api.logout().await {
            Ok(_) => info!("Logged out"),
            Err(e) => warn!("Logout request failed, clearing session anyway: {}", e),
        }
        self.auth.clear();
        Ok(())
    }

    fn adopt(
        &self,
        user: Option<User>,
        access_token: Option<String>,
        refresh_token: Option<String>,
        operation: &str
    ) -> Result<User, Box<dyn Error + Send + Sync>> {
        match (user, access_token, refresh_token) {
            (Some(user), Some(access_token), Some(refresh_token)) => {
                self.auth.establish(user.clone(), access_token, refresh_token)?;
                Ok(user)
            }
            _ =>
                Err(
                    Box::new(
                        ApiError::Malformed(
                            format!("{} reply is missing user or tokens", operation)
                        )
                    )
                ),
        }
    }
}
