// src/domain/payouts.rs

use super::contract::{Contract, ContractStatus};

/// Totals behind the dashboard stat cards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PayoutSummary {
    /// Commission accrued on active contracts, not yet settled.
    pub pending: f64,
    pub completed: f64,
    pub failed: f64,
    /// Commission on every contract that has seen at least one payout.
    pub total_paid: f64,
    pub active_contracts: usize,
}

impl PayoutSummary {
    pub fn from_contracts<'a>(contracts: impl IntoIterator<Item = &'a Contract>) -> Self {
        let mut s = PayoutSummary::default();

        for c in contracts {
            let commission = c.total_commission.unwrap_or(0.0);
            match c.status {
                ContractStatus::Active => {
                    s.pending += commission;
                    s.active_contracts += 1;
                }
                ContractStatus::Completed => s.completed += commission,
                ContractStatus::Failed => s.failed += commission,
                ContractStatus::Pending => {}
            }
            if c.last_payout.is_some() {
                s.total_paid += commission;
            }
        }

        s
    }
}
