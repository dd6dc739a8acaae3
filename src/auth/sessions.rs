// src/auth/sessions.rs
use crate::auth::token::{generate_token_default, hash_token};
use crate::domain::Role;
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

/// The signed-in user behind a browser session, with the hosted access token
/// used for calls made on their behalf.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUser {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix time the hosted access token stops working, when the provider
    /// said.
    pub token_expires_at: Option<i64>,
}

impl SessionUser {
    /// True once the access token is within `skew_secs` of expiring.
    pub fn token_expired(&self, now: i64, skew_secs: i64) -> bool {
        self.token_expires_at
            .is_some_and(|at| at <= now.saturating_add(skew_secs))
    }
}

/// Drop sessions that can no longer be used.
pub fn prune_sessions(conn: &Connection, now: i64) -> Result<usize, ServerError> {
    conn.execute(
        "delete from sessions where expires_at <= ? or revoked_at is not null",
        params![now],
    )
    .map_err(|e| ServerError::DbError(format!("prune sessions failed: {e}")))
}

/// Store a new session and return the raw cookie token. Dead sessions are
/// pruned on the way.
pub fn create_session(
    conn: &Connection,
    user: &SessionUser,
    now: i64,
    ttl_secs: i64,
) -> Result<String, ServerError> {
    let raw_token = generate_token_default();
    let hash = hash_token(&raw_token);
    let expires_at = now + ttl_secs;

    prune_sessions(conn, now)?;

    conn.execute(
        r#"
        insert into sessions
            (token_hash, user_id, email, role, access_token, refresh_token,
             token_expires_at, created_at, expires_at)
        values (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            hash.as_slice(),
            user.user_id,
            user.email,
            user.role.as_str(),
            user.access_token,
            user.refresh_token,
            user.token_expires_at,
            now,
            expires_at
        ],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

    Ok(raw_token)
}

pub fn load_session(
    conn: &Connection,
    raw_token: &str,
    now: i64,
) -> Result<Option<SessionUser>, ServerError> {
    let hash = hash_token(raw_token);

    let row = conn
        .query_row(
            r#"
            select user_id, email, role, access_token, refresh_token, token_expires_at
            from sessions
            where token_hash = ?
              and expires_at > ?
              and revoked_at is null
            "#,
            params![hash.as_slice(), now],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<i64>>(5)?,
                ))
            },
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))?;

    Ok(
        row.map(
            |(user_id, email, role, access_token, refresh_token, token_expires_at)| SessionUser {
                user_id,
                email,
                role: Role::parse(&role).unwrap_or_default(),
                access_token,
                refresh_token,
                token_expires_at,
            },
        ),
    )
}

/// Swap in tokens from a provider refresh. Returns false when the session
/// is gone.
pub fn update_session_tokens(
    conn: &Connection,
    raw_token: &str,
    user: &SessionUser,
) -> Result<bool, ServerError> {
    let hash = hash_token(raw_token);

    let changed = conn
        .execute(
            r#"
            update sessions
            set access_token = ?, refresh_token = ?, token_expires_at = ?
            where token_hash = ? and revoked_at is null
            "#,
            params![
                user.access_token,
                user.refresh_token,
                user.token_expires_at,
                hash.as_slice()
            ],
        )
        .map_err(|e| ServerError::DbError(format!("update session tokens failed: {e}")))?;

    Ok(changed == 1)
}

/// Mark the session revoked. Returns the hosted access token so the caller
/// can sign out upstream too.
pub fn revoke_session(
    conn: &Connection,
    raw_token: &str,
    now: i64,
) -> Result<Option<String>, ServerError> {
    let hash = hash_token(raw_token);

    let access_token: Option<String> = conn
        .query_row(
            "select access_token from sessions where token_hash = ? and revoked_at is null",
            params![hash.as_slice()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))?;

    conn.execute(
        "update sessions set revoked_at = ? where token_hash = ? and revoked_at is null",
        params![now, hash.as_slice()],
    )
    .map_err(|e| ServerError::DbError(format!("revoke session failed: {e}")))?;

    Ok(access_token)
}
