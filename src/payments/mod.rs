pub mod connect;
pub mod http;

use serde::Deserialize;
use serde_json::Value;

use crate::auth::SessionUser;

pub use connect::{connect_oauth_url, ConnectState, ConnectStateError};
pub use http::HttpPayments;

#[derive(Debug, thiserror::Error)]
pub enum PaymentsError {
    #[error(transparent)]
    State(#[from] ConnectStateError),
    #[error("payments request failed: {0}")]
    Request(String),
    #[error("payments service error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("unexpected payments response: {0}")]
    Decode(String),
}

/// Payout account linkage stored on the user's profile.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ConnectStatus {
    #[serde(default)]
    pub stripe_account_id: Option<String>,
    #[serde(default)]
    pub stripe_onboarding_complete: Option<bool>,
}

impl ConnectStatus {
    pub fn is_connected(&self) -> bool {
        self.stripe_account_id.is_some() && self.stripe_onboarding_complete.unwrap_or(false)
    }
}

/// Hosted payments backend.
pub trait PaymentsApi: Send + Sync {
    /// Forward the Connect authorization code for the user named in `state`.
    fn complete_connect(&self, code: &str, state: &ConnectState) -> Result<Value, PaymentsError>;

    /// `amount` is in the smallest currency unit.
    fn create_payment_intent(
        &self,
        amount: i64,
        connected_account_id: &str,
    ) -> Result<Value, PaymentsError>;

    fn connect_status(&self, viewer: &SessionUser) -> Result<ConnectStatus, PaymentsError>;

    fn create_connect_account(&self, viewer: &SessionUser) -> Result<Value, PaymentsError>;
}
