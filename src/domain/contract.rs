// src/domain/contract.rs

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle label of a contract. Transitions happen in the backend;
/// this layer only reads the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Pending,
    Active,
    Completed,
    Failed,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 4] = [
        ContractStatus::Pending,
        ContractStatus::Active,
        ContractStatus::Completed,
        ContractStatus::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContractStatus::Pending => "pending",
            ContractStatus::Active => "active",
            ContractStatus::Completed => "completed",
            ContractStatus::Failed => "failed",
        }
    }

    /// Capitalized label used on badges.
    pub fn label(self) -> &'static str {
        match self {
            ContractStatus::Pending => "Pending",
            ContractStatus::Active => "Active",
            ContractStatus::Completed => "Completed",
            ContractStatus::Failed => "Failed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

/// A commission agreement between a brand and an influencer.
///
/// Field names match the `contracts` table exposed by the hosted backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    #[serde(default)]
    pub brand_id: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    pub campaign_name: String,
    pub influencer_name: String,
    pub influencer_email: String,
    /// Percentage of sales, 0..=100.
    pub commission: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ContractStatus,

    #[serde(default)]
    pub total_sales: Option<f64>,
    #[serde(default)]
    pub total_commission: Option<f64>,
    #[serde(default)]
    pub last_payout: Option<NaiveDate>,
    #[serde(default)]
    pub max_budget: Option<f64>,
}

// Row ids are bigints in some deployments and uuids in others.
fn id_from_text_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(d)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// Values needed to create or edit a contract, already validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractDraft {
    pub campaign_name: String,
    pub influencer_name: String,
    pub influencer_email: String,
    pub commission: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub max_budget: f64,
}
