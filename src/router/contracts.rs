use astra::Request;
use chrono::{NaiveDate, Utc};

use crate::auth::SessionUser;
use crate::domain::contract_form::{validate, ContractFormInput, FieldErrors, FormMode};
use crate::domain::contract_list::{ordered_rows, ViewState};
use crate::domain::ContractStatus;
use crate::errors::ServerError;
use crate::responses::{html_response_with_status, redirect, ResultResp};
use crate::spreadsheets::export_contracts_xlsx;
use crate::state::AppState;
use crate::templates::pages::{contract_form_page, dashboard_href, ContractFormVm};
use crate::templates::Notice;

use super::request::{parse_form, raw_query, require_user, with_notice};

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn require_brand(req: &Request, app: &AppState) -> Result<SessionUser, ServerError> {
    let viewer = require_user(req, app)?;
    if !viewer.role.capabilities().create_contracts {
        return Err(ServerError::Forbidden(
            "Only brands can manage contracts".into(),
        ));
    }
    Ok(viewer)
}

fn render_form(
    viewer: &SessionUser,
    editing: Option<&str>,
    input: &ContractFormInput,
    errors: &FieldErrors,
    notice: Option<Notice>,
    status: u16,
) -> ResultResp {
    let vm = ContractFormVm {
        viewer,
        editing,
        input,
        errors,
        notice,
    };
    html_response_with_status(status, contract_form_page(&vm))
}

pub fn new_form(req: &Request, app: &AppState) -> ResultResp {
    let viewer = require_brand(req, app)?;
    let input = ContractFormInput::defaults(today());
    render_form(&viewer, None, &input, &FieldErrors::default(), None, 200)
}

pub fn create(mut req: Request, app: &AppState) -> ResultResp {
    let viewer = require_brand(&req, app)?;
    let input = ContractFormInput::from_form(&parse_form(&mut req)?);

    let draft = match validate(&input, &FormMode::Create { today: today() }) {
        Ok(draft) => draft,
        Err(errors) => return render_form(&viewer, None, &input, &errors, None, 422),
    };

    match app.contracts.create(&viewer, &draft) {
        Ok(contract) => {
            tracing::info!(contract_id = %contract.id, user_id = %viewer.user_id, "contract created");
            redirect(&with_notice("/dashboard", "notice", "Contract created"))
        }
        Err(e) => {
            tracing::error!(error = %e, "contract create failed");
            let notice = Notice::Error("Failed to create contract. Please try again.".into());
            render_form(&viewer, None, &input, &FieldErrors::default(), Some(notice), 502)
        }
    }
}

pub fn edit_form(req: &Request, app: &AppState, id: &str) -> ResultResp {
    let viewer = require_brand(req, app)?;
    let contract = app.contracts.get(&viewer, id)?;
    if !viewer.role.can_edit(&contract) {
        return Err(ServerError::Forbidden(
            "Completed contracts cannot be edited".into(),
        ));
    }

    let input = ContractFormInput::from_contract(&contract);
    render_form(&viewer, Some(id), &input, &FieldErrors::default(), None, 200)
}

pub fn update(mut req: Request, app: &AppState, id: &str) -> ResultResp {
    let viewer = require_brand(&req, app)?;
    let contract = app.contracts.get(&viewer, id)?;
    if !viewer.role.can_edit(&contract) {
        return Err(ServerError::Forbidden(
            "Completed contracts cannot be edited".into(),
        ));
    }

    let mut input = ContractFormInput::from_form(&parse_form(&mut req)?);
    input.influencer_email = contract.influencer_email.clone();
    let mode = FormMode::Edit {
        existing_email: contract.influencer_email.clone(),
    };

    let draft = match validate(&input, &mode) {
        Ok(draft) => draft,
        Err(errors) => return render_form(&viewer, Some(id), &input, &errors, None, 422),
    };

    match app.contracts.update(&viewer, id, &draft) {
        Ok(_) => {
            tracing::info!(contract_id = %id, "contract updated");
            redirect(&with_notice("/dashboard", "notice", "Contract updated"))
        }
        Err(e) => {
            tracing::error!(error = %e, contract_id = %id, "contract update failed");
            let notice = Notice::Error("Failed to update contract. Please try again.".into());
            render_form(&viewer, Some(id), &input, &FieldErrors::default(), Some(notice), 502)
        }
    }
}

pub fn delete(req: &Request, app: &AppState, id: &str) -> ResultResp {
    let viewer = require_brand(req, app)?;
    let back = dashboard_href(&ViewState::from_query(raw_query(req)));

    let contract = app.contracts.get(&viewer, id)?;
    if !viewer.role.can_delete(&contract) {
        return Err(ServerError::Forbidden(
            "Only pending contracts can be deleted".into(),
        ));
    }

    match app.contracts.delete(&viewer, id) {
        Ok(()) => {
            tracing::info!(contract_id = %id, "contract deleted");
            redirect(&with_notice(&back, "notice", "Contract deleted"))
        }
        Err(e) => {
            tracing::error!(error = %e, contract_id = %id, "contract delete failed");
            redirect(&with_notice(&back, "error", "Failed to delete contract"))
        }
    }
}

pub fn accept(req: &Request, app: &AppState, id: &str) -> ResultResp {
    let viewer = require_user(req, app)?;
    let back = dashboard_href(&ViewState::from_query(raw_query(req)));

    let contract = app.contracts.get(&viewer, id)?;
    if !viewer.role.can_accept(&contract) {
        return Err(ServerError::Forbidden(
            "Only the invited influencer can accept a pending contract".into(),
        ));
    }

    match app.contracts.set_status(&viewer, id, ContractStatus::Active) {
        Ok(_) => {
            tracing::info!(contract_id = %id, "contract accepted");
            redirect(&with_notice(&back, "notice", "Contract accepted"))
        }
        Err(e) => {
            tracing::error!(error = %e, contract_id = %id, "contract accept failed");
            redirect(&with_notice(&back, "error", "Failed to accept contract"))
        }
    }
}

/// Every filtered and sorted row, ignoring pagination.
pub fn export(req: &Request, app: &AppState) -> ResultResp {
    let viewer = require_user(req, app)?;
    let state = ViewState::from_query(raw_query(req));

    let contracts = app.contracts.list(&viewer)?;
    let rows = ordered_rows(&contracts, &state);
    tracing::info!(rows = rows.len(), user_id = %viewer.user_id, "contracts exported");

    export_contracts_xlsx(&rows, viewer.role)
}

