// Request parsing and session helpers shared by the handlers.

use astra::Request;
use std::collections::HashMap;
use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};
use url::form_urlencoded;

use crate::auth::sessions::{load_session, revoke_session, update_session_tokens};
use crate::auth::{AuthError, SessionUser};
use crate::errors::ServerError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";
pub const PKCE_COOKIE: &str = "pkce_verifier";
const PKCE_TTL_SECS: i64 = 600;
const TOKEN_REFRESH_SKEW_SECS: i64 = 60;
const MAX_FORM_BYTES: u64 = 64 * 1024;

pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

pub fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

pub fn raw_query(req: &Request) -> &str {
    req.uri().query().unwrap_or("")
}

/// Decodes an `application/x-www-form-urlencoded` body.
pub fn parse_form(req: &mut Request) -> Result<HashMap<String, String>, ServerError> {
    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_FORM_BYTES)
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("Failed to read form body: {e}")))?;

    Ok(form_urlencoded::parse(&body).into_owned().collect())
}

pub fn cookie(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get_all("Cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}

fn secure_suffix(app: &AppState) -> &'static str {
    if app.config.site_origin.starts_with("https://") {
        "; Secure"
    } else {
        ""
    }
}

pub fn session_cookie(app: &AppState, token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        app.config.session_ttl_secs,
        secure_suffix(app)
    )
}

pub fn pkce_cookie(app: &AppState, verifier: &str) -> String {
    format!(
        "{PKCE_COOKIE}={verifier}; Path=/auth; HttpOnly; SameSite=Lax; Max-Age={PKCE_TTL_SECS}{}",
        secure_suffix(app)
    )
}

pub fn clear_cookie(app: &AppState, name: &str, path: &str) -> String {
    format!(
        "{name}=; Path={path}; HttpOnly; SameSite=Lax; Max-Age=0{}",
        secure_suffix(app)
    )
}

/// Signed-in user for this request, if the session cookie is valid. An
/// access token close to expiry is refreshed first.
pub fn current_user(req: &Request, app: &AppState) -> Result<Option<SessionUser>, ServerError> {
    let Some(token) = cookie(req, SESSION_COOKIE) else {
        return Ok(None);
    };
    let now = now_unix();
    let Some(user) = app.db.with_conn(|conn| load_session(conn, &token, now))? else {
        return Ok(None);
    };

    if user.token_expired(now, TOKEN_REFRESH_SKEW_SECS) {
        return refresh_tokens(app, &token, user, now);
    }
    Ok(Some(user))
}

/// Replaces the hosted tokens behind a session. When the provider refuses,
/// the local session is revoked so the user signs in again.
fn refresh_tokens(
    app: &AppState,
    token: &str,
    user: SessionUser,
    now: i64,
) -> Result<Option<SessionUser>, ServerError> {
    let refreshed = match user.refresh_token.as_deref() {
        Some(refresh) => app.auth.refresh_session(refresh),
        None => Err(AuthError::InvalidCredentials("no refresh token".into())),
    };

    match refreshed {
        Ok(session) => {
            let user = SessionUser {
                token_expires_at: session.expires_in.map(|secs| now.saturating_add(secs)),
                access_token: session.access_token,
                refresh_token: session.refresh_token.or(user.refresh_token),
                ..user
            };
            if !app.db.with_conn(|conn| update_session_tokens(conn, token, &user))? {
                return Ok(None);
            }
            tracing::debug!(user_id = %user.user_id, "access token refreshed");
            Ok(Some(user))
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id = %user.user_id, "token refresh failed; ending session");
            app.db.with_conn(|conn| revoke_session(conn, token, now))?;
            Ok(None)
        }
    }
}

pub fn require_user(req: &Request, app: &AppState) -> Result<SessionUser, ServerError> {
    current_user(req, app)?.ok_or_else(|| ServerError::Unauthorized("Please sign in".into()))
}

/// Adds a `notice` or `error` parameter to a local URL.
pub fn with_notice(href: &str, key: &str, message: &str) -> String {
    let pair = form_urlencoded::Serializer::new(String::new())
        .append_pair(key, message)
        .finish();
    let sep = if href.contains('?') { '&' } else { '?' };
    format!("{href}{sep}{pair}")
}
