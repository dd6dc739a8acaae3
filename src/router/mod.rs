mod auth;
mod contracts;
mod dashboard;
pub mod request;
mod stripe;

use crate::errors::ServerError;
use crate::responses::{html_response, ResultResp};
use crate::state::AppState;
use crate::templates::{self, Notice};
use astra::Request;

use request::{current_user, parse_query};

pub fn handle(req: Request, app: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    tracing::debug!(%method, %path, "dispatch");

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => home(&req, app),

        ("GET", ["login"]) => auth::login_page(&req, app),
        ("POST", ["auth", "sign-in"]) => auth::sign_in(req, app),
        ("POST", ["auth", "sign-up"]) => auth::sign_up(req, app),
        ("GET", ["auth", "oauth", provider]) => auth::oauth_start(provider, app),
        ("GET", ["auth", "callback"]) => auth::oauth_callback(&req, app),
        ("POST", ["auth", "sign-out"]) => auth::sign_out(&req, app),
        ("GET", ["api", "me"]) => auth::me(&req, app),

        ("GET", ["dashboard"]) => dashboard::show(&req, app),

        ("GET", ["contracts", "new"]) => contracts::new_form(&req, app),
        ("GET", ["contracts", "export.xlsx"]) => contracts::export(&req, app),
        ("POST", ["contracts"]) => contracts::create(req, app),
        ("GET", ["contracts", id, "edit"]) => contracts::edit_form(&req, app, id),
        ("POST", ["contracts", id]) => contracts::update(req, app, id),
        ("POST", ["contracts", id, "delete"]) => contracts::delete(&req, app, id),
        ("POST", ["contracts", id, "accept"]) => contracts::accept(&req, app, id),

        ("GET", ["stripe", "connect"]) => stripe::connect(&req, app),
        ("GET", ["stripe", "callback"]) => stripe::callback(&req, app),
        ("POST", ["stripe", "connect", "account"]) => stripe::create_account(&req, app),
        ("POST", ["payouts"]) => stripe::create_payout(req, app),

        _ => Err(ServerError::NotFound),
    }
}

fn home(req: &Request, app: &AppState) -> ResultResp {
    let viewer = current_user(req, app)?;
    let notice = Notice::from_params(&parse_query(req));
    html_response(templates::pages::home_page(viewer.as_ref(), notice.as_ref()))
}
