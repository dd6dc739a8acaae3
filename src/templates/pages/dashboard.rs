use crate::auth::SessionUser;
use crate::domain::contract_list::{ContractPage, SortDirection, SortField, StatusFilter, ViewState};
use crate::domain::payouts::PayoutSummary;
use crate::domain::{Contract, ContractStatus, Role};
use crate::payments::ConnectStatus;
use crate::templates::components::{post_button, stat_card, status_badge};
use crate::templates::format::{amount, currency, long_date, short_date};
use crate::templates::{card, desktop_layout, notice_banner, Notice};
use maud::{html, Markup};

pub struct DashboardVm<'a> {
    pub viewer: &'a SessionUser,
    pub state: &'a ViewState,
    pub page: ContractPage<'a>,
    pub summary: PayoutSummary,
    /// `None` when the profile lookup failed.
    pub connect: Option<ConnectStatus>,
    pub notice: Option<Notice>,
}

/// Dashboard URL carrying the given view state.
pub fn dashboard_href(state: &ViewState) -> String {
    with_query("/dashboard", state)
}

/// Appends the view state so POST handlers can send the user back to the
/// same table.
pub fn with_query(path: &str, state: &ViewState) -> String {
    let query = state.to_query();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    let role = vm.viewer.role;

    desktop_layout(
        role.dashboard_title(),
        Some(vm.viewer),
        html! {
            main class="container" {
                (notice_banner(vm.notice.as_ref()))

                div class="dashboard-header" {
                    div {
                        h1 { (role.dashboard_title()) }
                        p { "Welcome back, " strong { (vm.viewer.email) } }
                        (connect_status(vm.connect.as_ref()))
                    }
                    @if role.capabilities().create_contracts {
                        a href="/contracts/new" class="btn btn-primary" { "Create New Contract" }
                    }
                }

                (stats(role, &vm.summary))

                section class="card contracts-card" {
                    div class="table-toolbar" {
                        h2 { (role.table_title()) }
                        (filter_form(vm.state))
                        a href=(with_query("/contracts/export.xlsx", vm.state)) class="btn btn-outline" {
                            "Export to Excel"
                        }
                    }
                    (contract_table(role, vm.state, &vm.page))
                    (pagination(vm.state, &vm.page))
                }

                @if let Some(selected) = vm.page.selected {
                    (detail_panel(role, vm.state, selected))
                }

                @if role.capabilities().fund_payouts {
                    (payout_form())
                }
            }
        },
    )
}

fn connect_status(status: Option<&ConnectStatus>) -> Markup {
    html! {
        p class="connect-status" {
            "Stripe Status: "
            @match status {
                Some(s) if s.is_connected() => span class="text-green" { "✅ Connected" },
                Some(_) => {
                    span class="text-red" { "❌ Not Connected" }
                    " "
                    a href="/stripe/connect" class="btn btn-small" { "Connect with Stripe" }
                    " "
                    form action="/stripe/connect/account" method="post" class="inline-form" {
                        button type="submit" class="btn btn-small btn-outline" { "Create payout account" }
                    }
                },
                None => span class="text-muted" { "Unavailable" },
            }
        }
    }
}

fn stats(role: Role, summary: &PayoutSummary) -> Markup {
    let pending = currency(summary.pending);
    let completed = currency(summary.completed);
    let failed = currency(summary.failed);
    let total = currency(summary.total_paid);

    html! {
        div class="stats-grid" {
            @match role {
                Role::Brand => {
                    (stat_card("Pending Payouts", &pending, "amber"))
                    (stat_card("Completed Payouts", &completed, "green"))
                    (stat_card("Failed Payouts", &failed, "red"))
                    (stat_card("Total Paid", &total, "blue"))
                },
                Role::Influencer => {
                    div class="card stat-card accent-amber" {
                        h3 class="stat-title" { "Incoming Commissions" }
                        div class="stat-value" { (pending) }
                        p class="stat-note" { "From " (summary.active_contracts) " active contracts" }
                    }
                    (stat_card("Completed Payouts", &completed, "green"))
                    (stat_card("Failed Payouts", &failed, "red"))
                    (stat_card("Total Earned", &total, "blue"))
                },
            }
        }
    }
}

fn filter_form(state: &ViewState) -> Markup {
    html! {
        form action="/dashboard" method="get" class="filter-form" {
            input type="search" name="q" value=(state.search) placeholder="Search contracts...";
            select name="status" {
                option value="all" selected[state.status == StatusFilter::All] { "All Statuses" }
                @for status in ContractStatus::ALL {
                    option value=(status.as_str()) selected[state.status == StatusFilter::Only(status)] {
                        (status.label())
                    }
                }
            }
            // keep the ordering; a new search starts on page one
            input type="hidden" name="sort" value=(state.sort.as_str());
            input type="hidden" name="dir" value=(state.dir.as_str());
            button type="submit" class="btn" { "Apply" }
        }
    }
}

fn sort_header(state: &ViewState, field: SortField, label: &str) -> Markup {
    let href = dashboard_href(&state.with(|s| s.toggle_sort(field)));
    html! {
        th class="sortable" {
            a href=(href) {
                (label)
                @if state.sort == field {
                    @match state.dir {
                        SortDirection::Asc => span class="sort-icon" { " ▲" },
                        SortDirection::Desc => span class="sort-icon" { " ▼" },
                    }
                }
            }
        }
    }
}

fn contract_table(role: Role, state: &ViewState, page: &ContractPage) -> Markup {
    html! {
        table class="contracts-table" {
            thead {
                tr {
                    th class="w-10" {}
                    (sort_header(state, SortField::CampaignName, "Campaign"))
                    (sort_header(state, role.counterparty_sort_field(), role.counterparty_label()))
                    (sort_header(state, SortField::Commission, "Commission %"))
                    (sort_header(state, SortField::StartDate, "Start Date"))
                    th { "Status" }
                    th class="text-right" { "Actions" }
                }
            }
            tbody {
                @if page.rows.is_empty() {
                    tr {
                        td colspan="7" class="empty-state" { "No contracts found matching your filters" }
                    }
                }
                @for contract in &page.rows {
                    (contract_row(role, state, page, contract))
                    @if page.is_expanded(&contract.id) {
                        tr class="expanded-row" {
                            td colspan="7" { (expanded_cards(contract)) }
                        }
                    }
                }
            }
        }
    }
}

fn contract_row(role: Role, state: &ViewState, page: &ContractPage, c: &Contract) -> Markup {
    let expand_href = dashboard_href(&state.with(|s| s.toggle_expanded(&c.id)));
    let details_href = dashboard_href(&state.with(|s| s.select(&c.id)));

    html! {
        tr id=(format!("contract-{}", c.id)) {
            td {
                a href=(expand_href) class="expand-toggle" title="Toggle details" {
                    @if page.is_expanded(&c.id) { "▲" } @else { "▼" }
                }
            }
            td class="font-medium" { (c.campaign_name) }
            td { (role.counterparty(c)) }
            td { (c.commission) "%" }
            td { (short_date(c.start_date)) }
            td { (status_badge(c.status)) }
            td class="text-right actions" {
                a href=(details_href) { "View Details" }
                (row_actions(role, state, c))
            }
        }
    }
}

fn row_actions(role: Role, state: &ViewState, c: &Contract) -> Markup {
    html! {
        @if role.can_edit(c) {
            " "
            a href=(format!("/contracts/{}/edit", c.id)) { "Edit Contract" }
        }
        @if role.can_delete(c) {
            " "
            (post_button(&with_query(&format!("/contracts/{}/delete", c.id), state), "Delete", "btn-link text-red"))
        }
        @if role.can_accept(c) {
            " "
            (post_button(&with_query(&format!("/contracts/{}/accept", c.id), state), "Accept", "btn-link"))
        }
    }
}

fn expanded_cards(c: &Contract) -> Markup {
    html! {
        div class="expanded-grid" {
            (card("Campaign Details", html! {
                p {
                    span class="font-medium" { "Duration:" } " "
                    (short_date(c.start_date)) " - " (short_date(c.end_date))
                }
                @if let Some(budget) = c.max_budget {
                    p { span class="font-medium" { "Max Budget:" } " $" (amount(budget)) }
                }
            }))
            (card("Commission Details", html! {
                p { span class="font-medium" { "Rate:" } " " (c.commission) "%" }
                @if let Some(sales) = c.total_sales {
                    p { span class="font-medium" { "Total Sales:" } " $" (amount(sales)) }
                }
            }))
            (card("Payout Information", html! {
                @match c.total_commission {
                    Some(total) => p { span class="font-medium" { "Total Commission:" } " $" (amount(total)) },
                    None => p { "No payouts processed yet" },
                }
                @if let Some(paid) = c.last_payout {
                    p { span class="font-medium" { "Last Payout:" } " " (short_date(paid)) }
                }
            }))
        }
    }
}

fn pagination(state: &ViewState, page: &ContractPage) -> Markup {
    if page.total_pages <= 1 {
        return html! {};
    }

    let prev = dashboard_href(&state.with(|s| s.prev_page()));
    let next = dashboard_href(&state.with(|s| s.next_page(page.total_pages)));

    html! {
        nav class="pagination" aria-label="Contract pages" {
            a href=(prev) class=(if page.page <= 1 { "page-link disabled" } else { "page-link" }) { "Previous" }
            @for n in 1..=page.total_pages {
                a href=(dashboard_href(&state.with(|s| s.page = n)))
                    class=(if n == page.page { "page-link active" } else { "page-link" }) { (n) }
            }
            a href=(next) class=(if page.page >= page.total_pages { "page-link disabled" } else { "page-link" }) { "Next" }
        }
    }
}

fn detail_panel(role: Role, state: &ViewState, c: &Contract) -> Markup {
    let close_href = dashboard_href(&state.with(|s| s.close_detail()));

    html! {
        aside class="card detail-panel" aria-label="Contract details" {
            div class="detail-header" {
                h2 { (c.campaign_name) }
                a href=(close_href) class="btn btn-link" { "Close" }
            }
            p class="text-muted" { "Complete information about this contract and its performance." }
            dl {
                dt { (role.counterparty_label()) }
                dd { (role.counterparty(c)) }
                dt { "Email" }
                dd { (c.influencer_email) }
                dt { "Status" }
                dd { (status_badge(c.status)) }
                dt { "Commission Rate" }
                dd { (c.commission) "%" }
                dt { "Start Date" }
                dd { (long_date(c.start_date)) }
                dt { "End Date" }
                dd { (long_date(c.end_date)) }
                @if let Some(budget) = c.max_budget {
                    dt { "Max Budget" }
                    dd { "$" (amount(budget)) }
                }
                @if let Some(sales) = c.total_sales {
                    dt { "Total Sales" }
                    dd { "$" (amount(sales)) }
                }
                dt { "Total Commission" }
                dd {
                    @match c.total_commission {
                        Some(total) => { "$" (amount(total)) },
                        None => "No commission yet",
                    }
                }
                @if let Some(paid) = c.last_payout {
                    dt { "Last Payout" }
                    dd { (long_date(paid)) }
                }
            }
            div class="detail-actions" {
                (row_actions(role, state, c))
            }
        }
    }
}

fn payout_form() -> Markup {
    html! {
        section class="card payout-card" {
            h2 { "Fund a Payout" }
            form action="/payouts" method="post" {
                label for="connected_account_id" { "Connected account" }
                input type="text" id="connected_account_id" name="connected_account_id"
                    placeholder="acct_..." required;
                label for="amount" { "Amount (cents)" }
                input type="number" id="amount" name="amount" min="1" step="1" required;
                button type="submit" class="btn btn-primary" { "Create Payment" }
            }
        }
    }
}
