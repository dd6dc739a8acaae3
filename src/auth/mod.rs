pub mod sessions;
pub mod supabase;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::domain::Role;

pub use sessions::SessionUser;
pub use supabase::SupabaseAuth;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Rejected input (bad password, duplicate account, expired code...).
    /// The message comes from the provider and is safe to show.
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("auth request failed: {0}")]
    Network(String),
    #[error("auth service error ({status}): {message}")]
    Service { status: u16, message: String },
    #[error("unexpected auth response: {0}")]
    Decode(String),
}

impl AuthError {
    /// Text for the notification banner.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials(msg) => msg.clone(),
            _ => "An error occurred during authentication".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    GitHub,
}

impl OAuthProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::GitHub => "github",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "google" => Some(OAuthProvider::Google),
            "github" => Some(OAuthProvider::GitHub),
            _ => None,
        }
    }
}

/// Extra profile data stored with the hosted user at sign-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl AuthUser {
    /// Role recorded at sign-up; brand when missing or unknown.
    pub fn role(&self) -> Role {
        self.user_metadata
            .user_type
            .as_deref()
            .and_then(Role::parse)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

/// Sign-up either signs the user straight in or waits for email confirmation.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    SignedIn(AuthSession),
    ConfirmationSent(AuthUser),
}

/// Hosted identity service.
pub trait AuthProvider: Send + Sync {
    fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &UserMetadata,
    ) -> Result<SignUpOutcome, AuthError>;

    /// Where to send the browser to start a social login.
    fn oauth_authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
        code_challenge: &str,
    ) -> String;

    fn exchange_code(&self, auth_code: &str, code_verifier: &str) -> Result<AuthSession, AuthError>;

    /// Trade a refresh token for a fresh access token. Refresh tokens are
    /// single use, so the returned session carries a new one.
    fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, AuthError>;

    fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError>;
}
