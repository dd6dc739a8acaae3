// src/payments/http.rs

use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::auth::SessionUser;
use crate::config::{StripeConfig, SupabaseConfig};
use crate::domain::Role;
use crate::payments::{ConnectState, ConnectStatus, PaymentsApi, PaymentsError};

/// Payments backend routes plus the profile table and edge function that
/// track payout accounts.
pub struct HttpPayments {
    api_base: String,
    supabase_url: String,
    anon_key: String,
    client: Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectCallbackPayload<'a> {
    code: &'a str,
    user_id: &'a str,
    user_type: Role,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentIntentPayload<'a> {
    amount: i64,
    connected_account_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectAccountPayload<'a> {
    user_id: &'a str,
    user_type: Role,
}

/// Non-2xx, or a JSON body with a non-null `error`, is a failure.
pub(crate) fn read_envelope(status: u16, body: &str) -> Result<Value, PaymentsError> {
    let value: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).map_err(|e| PaymentsError::Decode(e.to_string()))?
    };

    let error = value.get("error").filter(|e| !e.is_null());
    if !(200..300).contains(&status) || error.is_some() {
        let message = match error {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Object(obj)) => obj
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(obj.clone()).to_string()),
            Some(other) => other.to_string(),
            None => body.to_string(),
        };
        return Err(PaymentsError::Api { status, message });
    }

    Ok(value.get("data").cloned().unwrap_or(value))
}

/// A missing profile row means no account is linked yet.
pub(crate) fn parse_profile(body: &str) -> Result<ConnectStatus, PaymentsError> {
    let rows: Vec<ConnectStatus> =
        serde_json::from_str(body).map_err(|e| PaymentsError::Decode(e.to_string()))?;
    Ok(rows.into_iter().next().unwrap_or_default())
}

impl HttpPayments {
    pub fn new(stripe: &StripeConfig, supabase: &SupabaseConfig, client: Client) -> Self {
        Self {
            api_base: stripe.api_base.clone(),
            supabase_url: supabase.url.clone(),
            anon_key: supabase.anon_key.clone(),
            client,
        }
    }

    fn send(&self, req: RequestBuilder) -> Result<(u16, String), PaymentsError> {
        let resp = req
            .send()
            .map_err(|e| PaymentsError::Request(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| PaymentsError::Request(e.to_string()))?;
        Ok((status, body))
    }
}

impl PaymentsApi for HttpPayments {
    fn complete_connect(&self, code: &str, state: &ConnectState) -> Result<Value, PaymentsError> {
        let req = self
            .client
            .post(format!("{}/api/stripe/connect/callback", self.api_base))
            .json(&ConnectCallbackPayload {
                code,
                user_id: &state.user_id,
                user_type: state.user_type,
            });
        let (status, body) = self.send(req)?;
        read_envelope(status, &body)
    }

    fn create_payment_intent(
        &self,
        amount: i64,
        connected_account_id: &str,
    ) -> Result<Value, PaymentsError> {
        let req = self
            .client
            .post(format!("{}/api/stripe/create-payment-intent", self.api_base))
            .json(&PaymentIntentPayload {
                amount,
                connected_account_id,
            });
        let (status, body) = self.send(req)?;
        read_envelope(status, &body)
    }

    fn connect_status(&self, viewer: &SessionUser) -> Result<ConnectStatus, PaymentsError> {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("select", "stripe_account_id,stripe_onboarding_complete")
            .append_pair("id", &format!("eq.{}", viewer.user_id))
            .finish();
        let req = self
            .client
            .get(format!("{}/rest/v1/user_profiles?{}", self.supabase_url, query))
            .header("apikey", &self.anon_key)
            .bearer_auth(&viewer.access_token);

        let (status, body) = self.send(req)?;
        if !(200..300).contains(&status) {
            return Err(PaymentsError::Api {
                status,
                message: body,
            });
        }
        parse_profile(&body)
    }

    fn create_connect_account(&self, viewer: &SessionUser) -> Result<Value, PaymentsError> {
        let req = self
            .client
            .post(format!(
                "{}/functions/v1/create-stripe-connect",
                self.supabase_url
            ))
            .header("apikey", &self.anon_key)
            .bearer_auth(&viewer.access_token)
            .json(&ConnectAccountPayload {
                user_id: &viewer.user_id,
                user_type: viewer.role,
            });
        let (status, body) = self.send(req)?;
        read_envelope(status, &body)
    }
}
