pub mod contract;
pub mod contract_form;
pub mod contract_list;
pub mod fixtures;
pub mod payouts;
pub mod role;

pub use contract::{Contract, ContractDraft, ContractStatus};
pub use role::Role;
