use crate::auth::AuthProvider;
use crate::config::AppConfig;
use crate::contracts::ContractStore;
use crate::db::Database;
use crate::payments::PaymentsApi;

/// Everything a request handler needs, shared by all workers.
pub struct AppState {
    pub db: Database,
    pub config: AppConfig,
    pub auth: Box<dyn AuthProvider>,
    pub contracts: Box<dyn ContractStore>,
    pub payments: Box<dyn PaymentsApi>,
}
