use maud::{html, Markup};
use std::collections::HashMap;

use crate::domain::ContractStatus;

pub mod error;

pub use error::error_page;

/// One-shot message shown at the top of a page after a redirect.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    /// Reads `notice` / `error` query parameters; an error wins.
    pub fn from_params(params: &HashMap<String, String>) -> Option<Notice> {
        if let Some(msg) = params.get("error").filter(|m| !m.is_empty()) {
            return Some(Notice::Error(msg.clone()));
        }
        params
            .get("notice")
            .filter(|m| !m.is_empty())
            .map(|m| Notice::Info(m.clone()))
    }
}

pub fn notice_banner(notice: Option<&Notice>) -> Markup {
    html! {
        @match notice {
            Some(Notice::Info(msg)) => div class="notice notice-info" role="status" { (msg) },
            Some(Notice::Error(msg)) => div class="notice notice-error" role="alert" { (msg) },
            None => {},
        }
    }
}

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn stat_card(title: &str, value: &str, accent: &str) -> Markup {
    html! {
        div class=(format!("card stat-card accent-{accent}")) {
            h3 class="stat-title" { (title) }
            div class="stat-value" { (value) }
        }
    }
}

pub fn status_badge(status: ContractStatus) -> Markup {
    html! {
        span class=(format!("badge badge-{}", status.as_str())) { (status.label()) }
    }
}

/// A button that POSTs to `action`. Used for row actions.
pub fn post_button(action: &str, label: &str, class: &str) -> Markup {
    html! {
        form action=(action) method="post" class="inline-form" {
            button type="submit" class=(class) { (label) }
        }
    }
}
