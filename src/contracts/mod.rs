pub mod memory;
pub mod rest;

use crate::auth::SessionUser;
use crate::domain::{Contract, ContractDraft, ContractStatus, Role};

pub use memory::MemoryContractStore;
pub use rest::RestContractStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("contract {0} not found")]
    NotFound(String),
    #[error("store request failed: {0}")]
    Request(String),
    #[error("store rejected request ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("unexpected store response: {0}")]
    Decode(String),
}

/// Persistence for contracts, always scoped to the viewer.
///
/// Brands see contracts they own; influencers see contracts addressed to
/// their email. Anything outside that scope behaves as missing.
pub trait ContractStore: Send + Sync {
    fn list(&self, viewer: &SessionUser) -> Result<Vec<Contract>, StoreError>;

    fn get(&self, viewer: &SessionUser, id: &str) -> Result<Contract, StoreError>;

    /// New contracts start out pending and belong to the viewer.
    fn create(&self, viewer: &SessionUser, draft: &ContractDraft) -> Result<Contract, StoreError>;

    fn update(
        &self,
        viewer: &SessionUser,
        id: &str,
        draft: &ContractDraft,
    ) -> Result<Contract, StoreError>;

    fn set_status(
        &self,
        viewer: &SessionUser,
        id: &str,
        status: ContractStatus,
    ) -> Result<Contract, StoreError>;

    fn delete(&self, viewer: &SessionUser, id: &str) -> Result<(), StoreError>;
}

/// Visibility shared by every store. Contracts with no owning brand are
/// demo data and visible to all brands.
pub fn visible_to(viewer: &SessionUser, contract: &Contract) -> bool {
    match viewer.role {
        Role::Brand => contract
            .brand_id
            .as_deref()
            .map_or(true, |owner| owner == viewer.user_id),
        Role::Influencer => contract
            .influencer_email
            .eq_ignore_ascii_case(&viewer.email),
    }
}
