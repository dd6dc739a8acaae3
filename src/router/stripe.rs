use astra::Request;

use crate::errors::ServerError;
use crate::payments::{connect_oauth_url, ConnectState, PaymentsError};
use crate::responses::{redirect, ResultResp};
use crate::state::AppState;

use super::request::{parse_form, parse_query, require_user, with_notice};

/// Sends the user to the Connect authorize page.
pub fn connect(req: &Request, app: &AppState) -> ResultResp {
    let viewer = require_user(req, app)?;
    let state = ConnectState {
        user_id: viewer.user_id.clone(),
        user_type: viewer.role,
    };

    let url = connect_oauth_url(
        &app.config.stripe.connect_client_id,
        &app.config.site_origin,
        &state,
    );
    redirect(&url)
}

pub fn callback(req: &Request, app: &AppState) -> ResultResp {
    let viewer = require_user(req, app)?;
    let params = parse_query(req);

    if let Some(err) = params.get("error") {
        let message = params
            .get("error_description")
            .cloned()
            .unwrap_or_else(|| err.clone());
        tracing::warn!(error = %message, "connect authorization declined");
        return redirect(&with_notice("/dashboard", "error", &message));
    }

    let code = params
        .get("code")
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ServerError::BadRequest("missing authorization code".into()))?;
    let raw_state = params
        .get("state")
        .ok_or_else(|| ServerError::BadRequest("missing connect state".into()))?;
    let state = ConnectState::decode(raw_state).map_err(PaymentsError::from)?;

    if state.user_id != viewer.user_id {
        tracing::warn!(user_id = %viewer.user_id, state_user = %state.user_id, "connect state user mismatch");
        return Err(ServerError::Forbidden(
            "This connection was started by another account".into(),
        ));
    }

    match app.payments.complete_connect(code, &state) {
        Ok(_) => {
            tracing::info!(user_id = %viewer.user_id, "payments account connected");
            redirect(&with_notice(
                "/dashboard",
                "notice",
                "Stripe account connected successfully",
            ))
        }
        Err(e) => {
            tracing::error!(error = %e, user_id = %viewer.user_id, "connect callback failed");
            redirect(&with_notice(
                "/dashboard",
                "error",
                "Failed to connect Stripe account",
            ))
        }
    }
}

/// Creates the payout account through the backend function. When the
/// response carries an onboarding link the user is sent there.
pub fn create_account(req: &Request, app: &AppState) -> ResultResp {
    let viewer = require_user(req, app)?;

    match app.payments.create_connect_account(&viewer) {
        Ok(data) => {
            tracing::info!(user_id = %viewer.user_id, "connect account created");
            match data.get("url").and_then(|u| u.as_str()) {
                Some(url) if url.starts_with("https://") => redirect(url),
                _ => redirect(&with_notice("/dashboard", "notice", "Payout account created")),
            }
        }
        Err(e) => {
            tracing::error!(error = %e, user_id = %viewer.user_id, "connect account creation failed");
            redirect(&with_notice(
                "/dashboard",
                "error",
                "Failed to create payout account",
            ))
        }
    }
}

pub fn create_payout(mut req: Request, app: &AppState) -> ResultResp {
    let viewer = require_user(&req, app)?;
    if !viewer.role.capabilities().fund_payouts {
        return Err(ServerError::Forbidden("Only brands can fund payouts".into()));
    }

    let form = parse_form(&mut req)?;
    let account = form
        .get("connected_account_id")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let amount = form
        .get("amount")
        .and_then(|a| a.trim().parse::<i64>().ok())
        .filter(|a| *a > 0);

    let Some(amount) = amount else {
        return redirect(&with_notice(
            "/dashboard",
            "error",
            "Enter a payout amount in cents",
        ));
    };
    if account.is_empty() {
        return redirect(&with_notice(
            "/dashboard",
            "error",
            "Enter the connected account to pay",
        ));
    }

    match app.payments.create_payment_intent(amount, &account) {
        Ok(_) => {
            tracing::info!(amount, account = %account, "payment intent created");
            redirect(&with_notice("/dashboard", "notice", "Payout created"))
        }
        Err(e) => {
            tracing::error!(error = %e, amount, "payment intent failed");
            redirect(&with_notice("/dashboard", "error", "Failed to create payout"))
        }
    }
}
