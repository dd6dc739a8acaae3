// src/contracts/rest.rs

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde::Serialize;
use url::form_urlencoded;

use crate::auth::SessionUser;
use crate::config::SupabaseConfig;
use crate::contracts::{ContractStore, StoreError};
use crate::domain::{Contract, ContractDraft, ContractStatus, Role};

/// `contracts` table over PostgREST, authenticated as the viewer so row
/// level security applies as well.
pub struct RestContractStore {
    table_url: String,
    anon_key: String,
    client: Client,
}

#[derive(Serialize)]
struct NewContractRow<'a> {
    #[serde(flatten)]
    draft: &'a ContractDraft,
    brand_id: &'a str,
    status: ContractStatus,
}

#[derive(Serialize)]
struct StatusPatch {
    status: ContractStatus,
}

/// Query string limiting rows to what the viewer may see, optionally one id.
pub(crate) fn scope_query(viewer: &SessionUser, id: Option<&str>) -> String {
    let mut q = form_urlencoded::Serializer::new(String::new());
    q.append_pair("select", "*");
    match viewer.role {
        Role::Brand => q.append_pair("brand_id", &format!("eq.{}", viewer.user_id)),
        Role::Influencer => q.append_pair(
            "influencer_email",
            &format!("eq.{}", viewer.email.to_lowercase()),
        ),
    };
    if let Some(id) = id {
        q.append_pair("id", &format!("eq.{id}"));
    }
    q.finish()
}

pub(crate) fn parse_rows(body: &str) -> Result<Vec<Contract>, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))
}

fn single_row(body: &str, id: &str) -> Result<Contract, StoreError> {
    parse_rows(body)?
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

impl RestContractStore {
    pub fn new(config: &SupabaseConfig, client: Client) -> Self {
        Self {
            table_url: format!("{}/rest/v1/contracts", config.url),
            anon_key: config.anon_key.clone(),
            client,
        }
    }

    fn request(&self, method: Method, viewer: &SessionUser, query: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}?{}", self.table_url, query))
            .header("apikey", &self.anon_key)
            .bearer_auth(&viewer.access_token)
    }

    fn send(&self, req: RequestBuilder) -> Result<String, StoreError> {
        let resp = req.send().map_err(|e| StoreError::Request(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| StoreError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(body)
    }
}

impl ContractStore for RestContractStore {
    fn list(&self, viewer: &SessionUser) -> Result<Vec<Contract>, StoreError> {
        let query = format!("{}&order=start_date.desc", scope_query(viewer, None));
        let body = self.send(self.request(Method::GET, viewer, &query))?;
        parse_rows(&body)
    }

    fn get(&self, viewer: &SessionUser, id: &str) -> Result<Contract, StoreError> {
        let body = self.send(self.request(Method::GET, viewer, &scope_query(viewer, Some(id))))?;
        single_row(&body, id)
    }

    fn create(&self, viewer: &SessionUser, draft: &ContractDraft) -> Result<Contract, StoreError> {
        let row = NewContractRow {
            draft,
            brand_id: &viewer.user_id,
            status: ContractStatus::Pending,
        };
        let req = self
            .request(Method::POST, viewer, "select=*")
            .header("Prefer", "return=representation")
            .json(&row);
        let body = self.send(req)?;
        single_row(&body, "new")
    }

    fn update(
        &self,
        viewer: &SessionUser,
        id: &str,
        draft: &ContractDraft,
    ) -> Result<Contract, StoreError> {
        let req = self
            .request(Method::PATCH, viewer, &scope_query(viewer, Some(id)))
            .header("Prefer", "return=representation")
            .json(draft);
        let body = self.send(req)?;
        single_row(&body, id)
    }

    fn set_status(
        &self,
        viewer: &SessionUser,
        id: &str,
        status: ContractStatus,
    ) -> Result<Contract, StoreError> {
        let req = self
            .request(Method::PATCH, viewer, &scope_query(viewer, Some(id)))
            .header("Prefer", "return=representation")
            .json(&StatusPatch { status });
        let body = self.send(req)?;
        single_row(&body, id)
    }

    fn delete(&self, viewer: &SessionUser, id: &str) -> Result<(), StoreError> {
        let req = self
            .request(Method::DELETE, viewer, &scope_query(viewer, Some(id)))
            .header("Prefer", "return=representation");
        let body = self.send(req)?;
        single_row(&body, id).map(|_| ())
    }
}
