use crate::auth::SessionUser;
use crate::domain::contract_form::{
    ContractFormInput, FieldErrors, CAMPAIGN_NAME, COMMISSION, END_DATE, INFLUENCER_EMAIL,
    MAX_BUDGET, START_DATE,
};
use crate::templates::{desktop_layout, notice_banner, Notice};
use maud::{html, Markup};

pub struct ContractFormVm<'a> {
    pub viewer: &'a SessionUser,
    /// Id of the contract being edited; `None` for a new one.
    pub editing: Option<&'a str>,
    pub input: &'a ContractFormInput,
    pub errors: &'a FieldErrors,
    pub notice: Option<Notice>,
}

fn field_error(errors: &FieldErrors, field: &str) -> Markup {
    html! {
        @if let Some(msg) = errors.get(field) {
            p class="field-error" id=(format!("{field}-error")) { (msg) }
        }
    }
}

pub fn contract_form_page(vm: &ContractFormVm) -> Markup {
    let (title, action, submit) = match vm.editing {
        Some(id) => ("Edit Contract", format!("/contracts/{id}"), "Update Contract"),
        None => ("Create New Contract", "/contracts".to_string(), "Create Contract"),
    };
    let errors = vm.errors;
    let input = vm.input;

    desktop_layout(
        title,
        Some(vm.viewer),
        html! {
            main class="container narrow" {
                (notice_banner(vm.notice.as_ref()))
                h1 { (title) }

                form action=(action) method="post" class="contract-form" novalidate {
                    label for=(INFLUENCER_EMAIL) { "Influencer Email" }
                    @if vm.editing.is_some() {
                        input type="email" id=(INFLUENCER_EMAIL) name=(INFLUENCER_EMAIL)
                            value=(input.influencer_email) readonly;
                        p class="field-hint" { "The influencer cannot be changed on an existing contract." }
                    } @else {
                        input type="email" id=(INFLUENCER_EMAIL) name=(INFLUENCER_EMAIL)
                            value=(input.influencer_email) placeholder="influencer@example.com";
                        p class="field-hint" { "The influencer will receive an invitation to join the campaign." }
                    }
                    (field_error(errors, INFLUENCER_EMAIL))

                    label for=(CAMPAIGN_NAME) { "Campaign Name" }
                    input type="text" id=(CAMPAIGN_NAME) name=(CAMPAIGN_NAME)
                        value=(input.campaign_name) placeholder="Summer Collection Promotion";
                    (field_error(errors, CAMPAIGN_NAME))

                    label for=(COMMISSION) { "Commission Percentage" }
                    input type="number" id=(COMMISSION) name=(COMMISSION)
                        value=(input.commission_percentage) min="0" max="100" step="0.1";
                    (field_error(errors, COMMISSION))

                    div class="form-row" {
                        div {
                            label for=(START_DATE) { "Start Date" }
                            input type="date" id=(START_DATE) name=(START_DATE) value=(input.start_date);
                            (field_error(errors, START_DATE))
                        }
                        div {
                            label for=(END_DATE) { "End Date" }
                            input type="date" id=(END_DATE) name=(END_DATE) value=(input.end_date);
                            (field_error(errors, END_DATE))
                        }
                    }

                    label for=(MAX_BUDGET) { "Maximum Budget ($)" }
                    input type="number" id=(MAX_BUDGET) name=(MAX_BUDGET)
                        value=(input.max_budget) min="1" step="1";
                    p class="field-hint" { "Total amount you're willing to pay in commissions for this campaign." }
                    (field_error(errors, MAX_BUDGET))

                    div class="form-actions" {
                        a href="/dashboard" class="btn btn-outline" { "Cancel" }
                        button type="submit" class="btn btn-primary" { (submit) }
                    }
                }
            }
        },
    )
}
