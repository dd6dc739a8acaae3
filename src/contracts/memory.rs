// src/contracts/memory.rs

use std::sync::{Mutex, MutexGuard};

use crate::auth::SessionUser;
use crate::contracts::{visible_to, ContractStore, StoreError};
use crate::domain::{Contract, ContractDraft, ContractStatus};

struct Inner {
    contracts: Vec<Contract>,
    next_id: u64,
}

/// In-process store used in demo mode and tests.
pub struct MemoryContractStore {
    inner: Mutex<Inner>,
}

impl MemoryContractStore {
    pub fn new(contracts: Vec<Contract>) -> Self {
        let next_id = contracts
            .iter()
            .filter_map(|c| c.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            inner: Mutex::new(Inner { contracts, next_id }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Request("contract store lock poisoned".into()))
    }
}

fn find_mut<'a>(
    inner: &'a mut Inner,
    viewer: &SessionUser,
    id: &str,
) -> Result<&'a mut Contract, StoreError> {
    inner
        .contracts
        .iter_mut()
        .find(|c| c.id == id && visible_to(viewer, c))
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

fn apply_draft(contract: &mut Contract, draft: &ContractDraft) {
    contract.campaign_name = draft.campaign_name.clone();
    contract.influencer_name = draft.influencer_name.clone();
    contract.influencer_email = draft.influencer_email.clone();
    contract.commission = draft.commission;
    contract.start_date = draft.start_date;
    contract.end_date = draft.end_date;
    contract.max_budget = Some(draft.max_budget);
}

impl ContractStore for MemoryContractStore {
    fn list(&self, viewer: &SessionUser) -> Result<Vec<Contract>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .contracts
            .iter()
            .filter(|c| visible_to(viewer, c))
            .cloned()
            .collect())
    }

    fn get(&self, viewer: &SessionUser, id: &str) -> Result<Contract, StoreError> {
        let inner = self.lock()?;
        inner
            .contracts
            .iter()
            .find(|c| c.id == id && visible_to(viewer, c))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn create(&self, viewer: &SessionUser, draft: &ContractDraft) -> Result<Contract, StoreError> {
        let mut inner = self.lock()?;
        let id = inner.next_id.to_string();
        inner.next_id += 1;

        let mut contract = Contract {
            id,
            brand_id: Some(viewer.user_id.clone()),
            brand_name: Some(viewer.email.clone()),
            campaign_name: String::new(),
            influencer_name: String::new(),
            influencer_email: String::new(),
            commission: 0.0,
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: ContractStatus::Pending,
            total_sales: None,
            total_commission: None,
            last_payout: None,
            max_budget: None,
        };
        apply_draft(&mut contract, draft);

        inner.contracts.push(contract.clone());
        Ok(contract)
    }

    fn update(
        &self,
        viewer: &SessionUser,
        id: &str,
        draft: &ContractDraft,
    ) -> Result<Contract, StoreError> {
        let mut inner = self.lock()?;
        let contract = find_mut(&mut inner, viewer, id)?;
        apply_draft(contract, draft);
        Ok(contract.clone())
    }

    fn set_status(
        &self,
        viewer: &SessionUser,
        id: &str,
        status: ContractStatus,
    ) -> Result<Contract, StoreError> {
        let mut inner = self.lock()?;
        let contract = find_mut(&mut inner, viewer, id)?;
        contract.status = status;
        Ok(contract.clone())
    }

    fn delete(&self, viewer: &SessionUser, id: &str) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let before = inner.contracts.len();
        inner
            .contracts
            .retain(|c| !(c.id == id && visible_to(viewer, c)));

        if inner.contracts.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
