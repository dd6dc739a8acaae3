// src/domain/contract_form.rs

use std::collections::{BTreeMap, HashMap};

use chrono::{Days, NaiveDate};

use super::contract::{Contract, ContractDraft};

pub const INFLUENCER_EMAIL: &str = "influencer_email";
pub const CAMPAIGN_NAME: &str = "campaign_name";
pub const COMMISSION: &str = "commission_percentage";
pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const MAX_BUDGET: &str = "max_budget";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw values exactly as they came from the create/edit form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContractFormInput {
    pub influencer_email: String,
    pub campaign_name: String,
    pub commission_percentage: String,
    pub start_date: String,
    pub end_date: String,
    pub max_budget: String,
}

impl ContractFormInput {
    /// Pre-filled values for a brand new contract: 10% for 30 days, $1000 budget.
    pub fn defaults(today: NaiveDate) -> Self {
        let end = today.checked_add_days(Days::new(30)).unwrap_or(today);
        Self {
            influencer_email: String::new(),
            campaign_name: String::new(),
            commission_percentage: "10".into(),
            start_date: today.format(DATE_FORMAT).to_string(),
            end_date: end.format(DATE_FORMAT).to_string(),
            max_budget: "1000".into(),
        }
    }

    pub fn from_contract(c: &Contract) -> Self {
        Self {
            influencer_email: c.influencer_email.clone(),
            campaign_name: c.campaign_name.clone(),
            commission_percentage: trim_number(c.commission),
            start_date: c.start_date.format(DATE_FORMAT).to_string(),
            end_date: c.end_date.format(DATE_FORMAT).to_string(),
            max_budget: c.max_budget.map(trim_number).unwrap_or_default(),
        }
    }

    pub fn from_form(form: &HashMap<String, String>) -> Self {
        let field = |k: &str| form.get(k).cloned().unwrap_or_default();
        Self {
            influencer_email: field(INFLUENCER_EMAIL),
            campaign_name: field(CAMPAIGN_NAME),
            commission_percentage: field(COMMISSION),
            start_date: field(START_DATE),
            end_date: field(END_DATE),
            max_budget: field(MAX_BUDGET),
        }
    }
}

fn trim_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    /// Start dates before `today` are rejected.
    Create { today: NaiveDate },
    /// The influencer cannot be changed once a contract exists.
    Edit { existing_email: String },
}

/// First validation message for each field, keyed by field name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    fn add(&mut self, field: &'static str, message: &str) {
        self.0.entry(field).or_insert_with(|| message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Minimal address check: one `@`, something before it, a dotted domain after.
pub fn is_valid_email(raw: &str) -> bool {
    let e = raw.trim();
    if e.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = e.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty())
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

pub fn validate(input: &ContractFormInput, mode: &FormMode) -> Result<ContractDraft, FieldErrors> {
    let mut errors = FieldErrors::default();

    let email = match mode {
        FormMode::Edit { existing_email } => existing_email.clone(),
        FormMode::Create { .. } => input.influencer_email.trim().to_lowercase(),
    };
    if !is_valid_email(&email) {
        errors.add(INFLUENCER_EMAIL, "Please enter a valid email address.");
    }

    let campaign_name = input.campaign_name.trim().to_string();
    if campaign_name.chars().count() < 3 {
        errors.add(CAMPAIGN_NAME, "Campaign name must be at least 3 characters.");
    }

    let commission = parse_number(&input.commission_percentage);
    match commission {
        None => errors.add(COMMISSION, "Commission must be a number."),
        Some(n) if n < 1.0 => errors.add(COMMISSION, "Commission must be at least 1%."),
        Some(n) if n > 100.0 => errors.add(COMMISSION, "Commission cannot exceed 100%."),
        Some(_) => {}
    }

    let max_budget = parse_number(&input.max_budget);
    match max_budget {
        Some(n) if n >= 1.0 => {}
        _ => errors.add(MAX_BUDGET, "Budget must be greater than 0."),
    }

    let start = parse_date(&input.start_date);
    let end = parse_date(&input.end_date);
    match (start, mode) {
        (None, _) => errors.add(START_DATE, "Please select a start date."),
        (Some(s), FormMode::Create { today }) if s < *today => {
            errors.add(START_DATE, "Start date cannot be in the past.")
        }
        _ => {}
    }
    match (start, end) {
        (_, None) => errors.add(END_DATE, "Please select an end date."),
        (Some(s), Some(e)) if e <= s => errors.add(END_DATE, "End date must be after start date."),
        _ => {}
    }

    match (commission, max_budget, start, end) {
        (Some(commission), Some(max_budget), Some(start_date), Some(end_date)) if errors.is_empty() => {
            let influencer_name = email.split('@').next().unwrap_or_default().to_string();
            Ok(ContractDraft {
                campaign_name,
                influencer_name,
                influencer_email: email,
                commission,
                start_date,
                end_date,
                max_budget,
            })
        }
        _ => Err(errors),
    }
}
