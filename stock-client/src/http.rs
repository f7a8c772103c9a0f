//! HTTP client for the inventory backend
//!
//! Table reads go to `/rest/v1/{table}`, stored procedures to
//! `/rest/v1/rpc/{name}`, and auth calls to `/auth/v1/*`. Every request
//! carries the public `apikey` plus a bearer token: the user's access token
//! once signed in, the anon key before that.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::client::{AuthSession, AuthUser, PasswordCredentials, SignUpResponse};
use shared::response::RemoteErrorBody;
use shared::{
    CatalogItem, ItemCreate, ItemRef, Profile, ReportDelete, ReportLineRow, ReportRangeQuery,
    ReportSubmission, ReportUpdate, Tag,
};

use crate::backend::StockBackend;
use crate::{ClientConfig, ClientError, ClientResult};

const PROC_RECORD_REPORT: &str = "record_stock_report_multi";
const PROC_UPDATE_REPORT: &str = "update_stock_report_batch";
const PROC_DELETE_REPORT: &str = "delete_stock_report_batch";
const PROC_REPORTS_BETWEEN: &str = "reports_between_multi";
const PROC_ADD_ITEM: &str = "add_item_with_tags";

/// HTTP client for the inventory backend
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    anon_key: String,
    token: Option<String>,
}

impl RestClient {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            token: config.token.clone(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current access token, if signed in
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Use an access token issued elsewhere
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let bearer = self.token.as_deref().unwrap_or(&self.anon_key);
        req.header("apikey", &self.anon_key)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", bearer))
    }

    /// Turn a non-success status into a [`ClientError`], passing the
    /// backend's message through untouched.
    async fn check(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        let (code, message) = match serde_json::from_str::<RemoteErrorBody>(&text) {
            Ok(body) => body.into_parts(),
            Err(_) => (None, None),
        };
        let message = message
            .or_else(|| (!text.trim().is_empty()).then(|| text.clone()))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        tracing::warn!(status = %status, code = ?code, message = %message, "Backend rejected request");

        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized(message)),
            _ => Err(ClientError::remote(code, message)),
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let text = Self::check(response).await?.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ClientError::InvalidResponse(format!("{} (body: {})", e, truncate(&text, 200)))
        })
    }

    /// Read rows from a table or view
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<Vec<T>> {
        let req = self
            .authorize(self.client.get(self.url(&format!("rest/v1/{}", table))))
            .query(query);
        tracing::debug!(table = %table, "Selecting rows");
        let response = req.send().await?;
        Self::decode(response).await
    }

    /// Call a stored procedure and decode its result
    async fn rpc<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        name: &str,
        params: &B,
    ) -> ClientResult<T> {
        let response = self.send_rpc(name, params).await?;
        Self::decode(response).await
    }

    /// Call a stored procedure whose result is ignored
    async fn rpc_unit<B: Serialize + Sync>(&self, name: &str, params: &B) -> ClientResult<()> {
        let response = self.send_rpc(name, params).await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn send_rpc<B: Serialize + Sync>(
        &self,
        name: &str,
        params: &B,
    ) -> ClientResult<reqwest::Response> {
        tracing::debug!(procedure = %name, "Calling procedure");
        let req = self
            .authorize(self.client.post(self.url(&format!("rest/v1/rpc/{}", name))))
            .json(params);
        Ok(req.send().await?)
    }

    // ========== Auth API ==========

    /// Sign in with email and password; the access token is kept for
    /// subsequent requests.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> ClientResult<AuthSession> {
        let body = PasswordCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let req = self
            .authorize(self.client.post(self.url("auth/v1/token")))
            .query(&[("grant_type", "password")])
            .json(&body);
        let session: AuthSession = Self::decode(req.send().await?).await?;
        self.token = Some(session.access_token.clone());
        tracing::info!(user_id = %session.user.id, "Signed in");
        Ok(session)
    }

    /// Register a new account
    pub async fn sign_up(&self, email: &str, password: &str) -> ClientResult<SignUpResponse> {
        let body = PasswordCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let req = self
            .authorize(self.client.post(self.url("auth/v1/signup")))
            .json(&body);
        let resp: SignUpResponse = Self::decode(req.send().await?).await?;
        tracing::info!(user_id = %resp.user().id, "Signed up");
        Ok(resp)
    }

    /// Sign out. The local token is dropped even when the backend call fails.
    pub async fn sign_out(&mut self) -> ClientResult<()> {
        if self.token.is_none() {
            return Ok(());
        }
        let req = self.authorize(self.client.post(self.url("auth/v1/logout")));
        self.token = None;
        let response = req.send().await?;
        Self::check(response).await?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// User owning the current access token
    pub async fn current_user(&self) -> ClientResult<AuthUser> {
        if self.token.is_none() {
            return Err(ClientError::Unauthorized("Not signed in".into()));
        }
        let req = self.authorize(self.client.get(self.url("auth/v1/user")));
        Self::decode(req.send().await?).await
    }

    /// Role and email of a user; `Profile::unknown()` when no row exists
    pub async fn profile(&self, user_id: &str) -> ClientResult<Profile> {
        let id_filter = format!("eq.{}", user_id);
        let rows: Vec<Profile> = self
            .select("profiles", &[("select", "role,email"), ("id", &id_filter)])
            .await?;
        Ok(rows.into_iter().next().unwrap_or_else(Profile::unknown))
    }
}

#[async_trait]
impl StockBackend for RestClient {
    async fn record_report(&self, submission: &ReportSubmission) -> ClientResult<()> {
        self.rpc_unit(PROC_RECORD_REPORT, submission).await
    }

    async fn update_report(&self, update: &ReportUpdate) -> ClientResult<()> {
        self.rpc_unit(PROC_UPDATE_REPORT, update).await
    }

    async fn delete_report(&self, report_id: &str) -> ClientResult<()> {
        let params = ReportDelete {
            report_id: report_id.to_string(),
        };
        self.rpc_unit(PROC_DELETE_REPORT, &params).await
    }

    async fn reports_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ClientResult<Vec<ReportLineRow>> {
        let params = ReportRangeQuery { from, to };
        let rows: Option<Vec<ReportLineRow>> = self.rpc(PROC_REPORTS_BETWEEN, &params).await?;
        Ok(rows.unwrap_or_default())
    }

    async fn list_items(&self) -> ClientResult<Vec<CatalogItem>> {
        self.select("items_view", &[("select", "*"), ("order", "name.asc")])
            .await
    }

    async fn list_item_refs(&self) -> ClientResult<Vec<ItemRef>> {
        self.select("items", &[("select", "id,name"), ("order", "name.asc")])
            .await
    }

    async fn list_tags(&self) -> ClientResult<Vec<Tag>> {
        self.select("tags", &[("select", "*"), ("order", "name.asc")])
            .await
    }

    async fn add_item(&self, item: &ItemCreate) -> ClientResult<String> {
        let value: serde_json::Value = self.rpc(PROC_ADD_ITEM, item).await?;
        created_id(&value).ok_or_else(|| {
            ClientError::InvalidResponse(format!("{} returned no item id: {}", PROC_ADD_ITEM, value))
        })
    }
}

/// Pull the new item's id out of whatever shape the procedure returned:
/// a bare id, a row, or a one-row set.
fn created_id(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(id) => Some(id.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Object(row) => row.get("id").and_then(created_id),
        serde_json::Value::Array(rows) => rows.first().and_then(created_id),
        _ => None,
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_joining() {
        let config = ClientConfig::new("https://inv.example.co/", "anon");
        let client = RestClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://inv.example.co");
        assert_eq!(
            client.url("rest/v1/rpc/record_stock_report_multi"),
            "https://inv.example.co/rest/v1/rpc/record_stock_report_multi"
        );
        assert_eq!(client.url("/auth/v1/user"), "https://inv.example.co/auth/v1/user");
    }

    #[test]
    fn test_token_from_config() {
        let config = ClientConfig::new("https://inv.example.co", "anon").with_token("jwt");
        let client = RestClient::new(&config).unwrap();
        assert_eq!(client.token(), Some("jwt"));
    }

    #[test]
    fn test_created_id_shapes() {
        assert_eq!(created_id(&json!("abc")), Some("abc".to_string()));
        assert_eq!(created_id(&json!(17)), Some("17".to_string()));
        assert_eq!(created_id(&json!({"id": "row-1", "name": "Widget"})), Some("row-1".to_string()));
        assert_eq!(created_id(&json!([{"id": "row-2"}])), Some("row-2".to_string()));
        assert_eq!(created_id(&json!(null)), None);
        assert_eq!(created_id(&json!([])), None);
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
