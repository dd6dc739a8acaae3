// src/domain/role.rs

use serde::{Deserialize, Serialize};

use super::contract::{Contract, ContractStatus};
use super::contract_list::SortField;

/// Which side of a contract the signed-in user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Brand,
    Influencer,
}

/// What a role may do from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub create_contracts: bool,
    pub edit_contracts: bool,
    pub delete_contracts: bool,
    pub accept_contracts: bool,
    pub fund_payouts: bool,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Brand => "brand",
            Role::Influencer => "influencer",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "brand" => Some(Role::Brand),
            "influencer" => Some(Role::Influencer),
            _ => None,
        }
    }

    pub fn capabilities(self) -> Capabilities {
        match self {
            Role::Brand => Capabilities {
                create_contracts: true,
                edit_contracts: true,
                delete_contracts: true,
                accept_contracts: false,
                fund_payouts: true,
            },
            Role::Influencer => Capabilities {
                create_contracts: false,
                edit_contracts: false,
                delete_contracts: false,
                accept_contracts: true,
                fund_payouts: false,
            },
        }
    }

    /// Completed contracts are frozen.
    pub fn can_edit(self, contract: &Contract) -> bool {
        self.capabilities().edit_contracts && contract.status != ContractStatus::Completed
    }

    /// Only contracts nobody has started on can be removed.
    pub fn can_delete(self, contract: &Contract) -> bool {
        self.capabilities().delete_contracts && contract.status == ContractStatus::Pending
    }

    pub fn can_accept(self, contract: &Contract) -> bool {
        self.capabilities().accept_contracts && contract.status == ContractStatus::Pending
    }

    pub fn dashboard_title(self) -> &'static str {
        match self {
            Role::Brand => "Brand Dashboard",
            Role::Influencer => "Influencer Dashboard",
        }
    }

    pub fn table_title(self) -> &'static str {
        match self {
            Role::Brand => "Your Campaigns & Contracts",
            Role::Influencer => "Your Active Contracts",
        }
    }

    /// Header of the "other party" column.
    pub fn counterparty_label(self) -> &'static str {
        match self {
            Role::Brand => "Influencer",
            Role::Influencer => "Brand",
        }
    }

    pub fn counterparty_sort_field(self) -> SortField {
        match self {
            Role::Brand => SortField::InfluencerName,
            Role::Influencer => SortField::BrandName,
        }
    }

    pub fn counterparty<'a>(self, contract: &'a Contract) -> &'a str {
        match self {
            Role::Brand => &contract.influencer_name,
            Role::Influencer => contract.brand_name.as_deref().unwrap_or("Unknown brand"),
        }
    }
}
