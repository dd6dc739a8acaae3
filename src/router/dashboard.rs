use astra::Request;

use crate::domain::contract_list::{derive, ViewState};
use crate::domain::payouts::PayoutSummary;
use crate::responses::{html_response, ResultResp};
use crate::state::AppState;
use crate::templates::pages::{dashboard_page, DashboardVm};
use crate::templates::Notice;

use super::request::{parse_query, raw_query, require_user};

pub fn show(req: &Request, app: &AppState) -> ResultResp {
    let viewer = require_user(req, app)?;
    let state = ViewState::from_query(raw_query(req));
    let mut notice = Notice::from_params(&parse_query(req));

    // A failed load still renders the page, with the table empty and the
    // view state intact.
    let contracts = match app.contracts.list(&viewer) {
        Ok(contracts) => contracts,
        Err(e) => {
            tracing::error!(error = %e, user_id = %viewer.user_id, "contract load failed");
            notice = Some(Notice::Error("Failed to load contracts".into()));
            Vec::new()
        }
    };

    let connect = match app.payments.connect_status(&viewer) {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::warn!(error = %e, user_id = %viewer.user_id, "connect status lookup failed");
            None
        }
    };

    let vm = DashboardVm {
        viewer: &viewer,
        state: &state,
        page: derive(&contracts, &state),
        summary: PayoutSummary::from_contracts(&contracts),
        connect,
        notice,
    };

    html_response(dashboard_page(&vm))
}
