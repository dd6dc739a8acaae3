use astra::Request;
use serde::Serialize;

use crate::auth::sessions::{create_session, revoke_session};
use crate::auth::token::{generate_token_default, pkce_challenge};
use crate::auth::{AuthSession, OAuthProvider, SessionUser, SignUpOutcome, UserMetadata};
use crate::domain::Role;
use crate::errors::ServerError;
use crate::responses::{
    html_response, html_response_with_status, json_response, redirect, redirect_with_cookies,
    ResultResp,
};
use crate::state::AppState;
use crate::templates::pages::{login_page as render_login, AuthMode, LoginForm};
use crate::templates::Notice;

use super::request::{
    clear_cookie, cookie, current_user, now_unix, parse_form, parse_query, pkce_cookie,
    require_user, session_cookie, with_notice, PKCE_COOKIE, SESSION_COOKIE,
};

pub fn login_page(req: &Request, app: &AppState) -> ResultResp {
    if current_user(req, app)?.is_some() {
        return redirect("/dashboard");
    }
    let params = parse_query(req);
    let mode = AuthMode::parse(params.get("mode").map(String::as_str));
    let notice = Notice::from_params(&params);
    html_response(render_login(mode, &LoginForm::default(), notice.as_ref()))
}

fn login_error(mode: AuthMode, form: LoginForm, status: u16, message: String) -> ResultResp {
    html_response_with_status(
        status,
        render_login(mode, &form, Some(&Notice::Error(message))),
    )
}

/// Stores a local session for a provider session and sends the user on.
fn establish_session(app: &AppState, session: AuthSession, location: &str) -> ResultResp {
    let role = session.user.role();
    let now = now_unix();
    // Contract rows store the influencer email lowercased.
    let user = SessionUser {
        email: session.user.email.as_deref().unwrap_or_default().to_lowercase(),
        user_id: session.user.id,
        role,
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        token_expires_at: session.expires_in.map(|secs| now.saturating_add(secs)),
    };

    let ttl = app.config.session_ttl_secs;
    let token = app.db.with_conn(|conn| create_session(conn, &user, now, ttl))?;

    tracing::info!(user_id = %user.user_id, role = role.as_str(), "signed in");
    redirect_with_cookies(
        location,
        &[
            session_cookie(app, &token),
            clear_cookie(app, PKCE_COOKIE, "/auth"),
        ],
    )
}

pub fn sign_in(mut req: Request, app: &AppState) -> ResultResp {
    let form = parse_form(&mut req)?;
    let email = form.get("email").map(|s| s.trim().to_string()).unwrap_or_default();
    let password = form.get("password").cloned().unwrap_or_default();
    let echo = LoginForm {
        email: email.clone(),
        ..LoginForm::default()
    };

    if email.is_empty() || password.is_empty() {
        return login_error(AuthMode::SignIn, echo, 400, "Email and password are required".into());
    }

    match app.auth.sign_in_with_password(&email, &password) {
        Ok(session) => establish_session(app, session, "/dashboard"),
        Err(e) => {
            tracing::warn!(error = %e, "password sign-in failed");
            login_error(AuthMode::SignIn, echo, 401, e.user_message())
        }
    }
}

pub fn sign_up(mut req: Request, app: &AppState) -> ResultResp {
    let form = parse_form(&mut req)?;
    let field = |k: &str| form.get(k).cloned().unwrap_or_default();

    let email = field("email").trim().to_string();
    let password = field("password");
    let confirm = field("confirm_password");
    let role = Role::parse(&field("user_type")).unwrap_or_default();
    let echo = LoginForm {
        email: email.clone(),
        user_type: role,
    };

    if email.is_empty() || password.is_empty() {
        return login_error(AuthMode::SignUp, echo, 400, "Email and password are required".into());
    }
    if password != confirm {
        return login_error(AuthMode::SignUp, echo, 400, "Passwords do not match".into());
    }

    let metadata = UserMetadata {
        user_type: Some(role.as_str().to_string()),
        full_name: email.split('@').next().map(str::to_string),
    };

    match app.auth.sign_up(&email, &password, &metadata) {
        Ok(SignUpOutcome::SignedIn(session)) => establish_session(app, session, "/dashboard"),
        Ok(SignUpOutcome::ConfirmationSent(user)) => {
            tracing::info!(user_id = %user.id, "sign-up awaiting email confirmation");
            redirect(&with_notice(
                "/login?mode=signin",
                "notice",
                "Please check your email to verify your account.",
            ))
        }
        Err(e) => {
            tracing::warn!(error = %e, "sign-up failed");
            login_error(AuthMode::SignUp, echo, 400, e.user_message())
        }
    }
}

pub fn oauth_start(provider: &str, app: &AppState) -> ResultResp {
    let provider = OAuthProvider::parse(provider).ok_or(ServerError::NotFound)?;

    let verifier = generate_token_default();
    let redirect_to = format!("{}/auth/callback", app.config.site_origin);
    let url = app
        .auth
        .oauth_authorize_url(provider, &redirect_to, &pkce_challenge(&verifier));

    redirect_with_cookies(&url, &[pkce_cookie(app, &verifier)])
}

pub fn oauth_callback(req: &Request, app: &AppState) -> ResultResp {
    let params = parse_query(req);

    if let Some(err) = params.get("error") {
        let message = params
            .get("error_description")
            .cloned()
            .unwrap_or_else(|| err.clone());
        tracing::warn!(error = %message, "oauth provider returned an error");
        return redirect(&with_notice("/login", "error", &message));
    }

    let Some(code) = params.get("code").filter(|c| !c.is_empty()) else {
        return Err(ServerError::BadRequest("missing authorization code".into()));
    };
    let Some(verifier) = cookie(req, PKCE_COOKIE) else {
        return redirect(&with_notice(
            "/login",
            "error",
            "Your sign-in attempt expired. Please try again.",
        ));
    };

    match app.auth.exchange_code(code, &verifier) {
        Ok(session) => establish_session(app, session, "/dashboard"),
        Err(e) => {
            tracing::error!(error = %e, "oauth code exchange failed");
            redirect(&with_notice("/login", "error", &e.user_message()))
        }
    }
}

pub fn sign_out(req: &Request, app: &AppState) -> ResultResp {
    if let Some(token) = cookie(req, SESSION_COOKIE) {
        let now = now_unix();
        let access = app.db.with_conn(|conn| revoke_session(conn, &token, now))?;

        // The local session is already gone; upstream failure only gets logged.
        if let Some(access) = access {
            if let Err(e) = app.auth.sign_out(&access) {
                tracing::warn!(error = %e, "provider sign-out failed");
            }
        }
    }

    redirect_with_cookies(
        &with_notice("/", "notice", "You have been signed out."),
        &[clear_cookie(app, SESSION_COOKIE, "/")],
    )
}

#[derive(Serialize)]
struct MeResponse {
    id: String,
    email: Option<String>,
    role: Role,
    full_name: Option<String>,
}

pub fn me(req: &Request, app: &AppState) -> ResultResp {
    let viewer = require_user(req, app)?;
    let user = app.auth.get_user(&viewer.access_token)?;

    json_response(&MeResponse {
        role: user.role(),
        full_name: user.user_metadata.full_name.clone(),
        id: user.id,
        email: user.email,
    })
}
