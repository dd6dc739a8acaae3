// src/payments/connect.rs

use base64::Engine;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::domain::Role;

const CONNECT_AUTHORIZE_URL: &str = "https://connect.stripe.com/oauth/authorize";

#[derive(Debug, thiserror::Error)]
pub enum ConnectStateError {
    #[error("connect state is not valid base64")]
    Base64(#[from] base64::DecodeError),
    #[error("connect state is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Round-tripped through the Connect OAuth flow so the callback knows who
/// started it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectState {
    pub user_id: String,
    pub user_type: Role,
}

impl ConnectState {
    /// JSON, then standard base64 with padding.
    pub fn encode(&self) -> String {
        // Serializing two plain strings cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        base64::engine::general_purpose::STANDARD.encode(json)
    }

    pub fn decode(raw: &str) -> Result<Self, ConnectStateError> {
        // Query decoding may have turned '+' into ' '.
        let cleaned = raw.trim().replace(' ', "+");
        let bytes = base64::engine::general_purpose::STANDARD.decode(cleaned)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Authorize URL for linking a payments account.
pub fn connect_oauth_url(client_id: &str, origin: &str, state: &ConnectState) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("response_type", "code")
        .append_pair("client_id", client_id)
        .append_pair("scope", "read_write")
        .append_pair("redirect_uri", &format!("{origin}/stripe/callback"))
        .append_pair("state", &state.encode())
        .finish();
    format!("{CONNECT_AUTHORIZE_URL}?{query}")
}
