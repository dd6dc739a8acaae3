// src/auth/supabase.rs

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::auth::{
    AuthError, AuthProvider, AuthSession, AuthUser, OAuthProvider, SignUpOutcome, UserMetadata,
};
use crate::config::SupabaseConfig;

/// GoTrue REST client for the hosted identity service.
pub struct SupabaseAuth {
    base_url: String,
    anon_key: String,
    client: Client,
}

#[derive(Serialize)]
struct PasswordPayload<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUpPayload<'a> {
    email: &'a str,
    password: &'a str,
    data: &'a UserMetadata,
}

#[derive(Serialize)]
struct PkcePayload<'a> {
    auth_code: &'a str,
    code_verifier: &'a str,
}

#[derive(Serialize)]
struct RefreshPayload<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl SupabaseAuth {
    pub fn new(config: &SupabaseConfig, client: Client) -> Self {
        Self {
            base_url: format!("{}/auth/v1", config.url),
            anon_key: config.anon_key.clone(),
            client,
        }
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header("apikey", &self.anon_key)
    }

    fn send(&self, req: RequestBuilder) -> Result<String, AuthError> {
        let resp = req.send().map_err(|e| AuthError::Network(e.to_string()))?;
        read_body(resp)
    }
}

fn read_body(resp: Response) -> Result<String, AuthError> {
    let status = resp.status().as_u16();
    let body = resp
        .text()
        .map_err(|e| AuthError::Network(e.to_string()))?;

    if (200..300).contains(&status) {
        Ok(body)
    } else {
        Err(status_error(status, &body))
    }
}

/// Client errors carry a message meant for the user; everything else is a
/// service failure.
pub(crate) fn status_error(status: u16, body: &str) -> AuthError {
    let message = error_message(body);
    match status {
        400 | 401 | 403 | 404 | 422 | 429 => AuthError::InvalidCredentials(message),
        _ => AuthError::Service { status, message },
    }
}

/// Pull the human message out of a GoTrue error body.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.msg.or(b.error_description).or(b.message).or(b.error))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| "An error occurred during authentication".to_string())
}

pub(crate) fn parse_session(body: &str) -> Result<AuthSession, AuthError> {
    serde_json::from_str(body).map_err(|e| AuthError::Decode(e.to_string()))
}

/// With auto-confirm the response is a session; otherwise it is the bare user.
pub(crate) fn parse_sign_up(body: &str) -> Result<SignUpOutcome, AuthError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| AuthError::Decode(e.to_string()))?;

    if value.get("access_token").is_some() {
        let session = serde_json::from_value(value).map_err(|e| AuthError::Decode(e.to_string()))?;
        return Ok(SignUpOutcome::SignedIn(session));
    }

    let user_value = value.get("user").cloned().unwrap_or(value);
    let user = serde_json::from_value(user_value).map_err(|e| AuthError::Decode(e.to_string()))?;
    Ok(SignUpOutcome::ConfirmationSent(user))
}

impl AuthProvider for SupabaseAuth {
    fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let body = self.send(
            self.post("/token?grant_type=password")
                .json(&PasswordPayload { email, password }),
        )?;
        parse_session(&body)
    }

    fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &UserMetadata,
    ) -> Result<SignUpOutcome, AuthError> {
        let body = self.send(self.post("/signup").json(&SignUpPayload {
            email,
            password,
            data: metadata,
        }))?;
        parse_sign_up(&body)
    }

    fn oauth_authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
        code_challenge: &str,
    ) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_to", redirect_to)
            .append_pair("code_challenge", code_challenge)
            .append_pair("code_challenge_method", "s256")
            .finish();
        format!("{}/authorize?{}", self.base_url, query)
    }

    fn exchange_code(&self, auth_code: &str, code_verifier: &str) -> Result<AuthSession, AuthError> {
        let body = self.send(self.post("/token?grant_type=pkce").json(&PkcePayload {
            auth_code,
            code_verifier,
        }))?;
        parse_session(&body)
    }

    fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let body = self.send(
            self.post("/token?grant_type=refresh_token")
                .json(&RefreshPayload { refresh_token }),
        )?;
        parse_session(&body)
    }

    fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.send(self.post("/logout").bearer_auth(access_token))?;
        Ok(())
    }

    fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let req = self
            .client
            .get(format!("{}/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token);
        let body = self.send(req)?;
        serde_json::from_str(&body).map_err(|e| AuthError::Decode(e.to_string()))
    }
}
