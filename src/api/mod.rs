pub(crate) mod firestore;
pub(crate) mod identity;

use crate::models::{InventoryItem, ItemDraft, Session, UserProfile};
use crate::storage::{clear_account_storage, load_session, save_session};
use crate::util::now_ms;
use firestore::{
    decode_item, decode_profile, encode_draft_fields, encode_profile_fields, CommitResponse,
    Document, ListDocumentsResponse, ITEM_FIELD_PATHS,
};
use identity::{
    map_identity_error, AuthResponse, PasswordSignInRequest, RefreshRequest, RefreshResponse,
    UpdatePasswordRequest,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const INVENTORY_COLLECTION: &str = "inventory";
const USERS_COLLECTION: &str = "users";
const LIST_PAGE_SIZE: u32 = 300;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
    NotFound,
    /// Rejected by the identity service (bad credentials, weak password, ...).
    Auth,
}

#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    pub(crate) fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Your session has expired. Please sign in again.".to_string(),
        }
    }

    pub(crate) fn auth(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Auth,
            message: message.into(),
        }
    }

    pub(crate) fn http(status: reqwest::StatusCode, body: &str, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {}", error_message_from_body(body)),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Google-style REST error envelope: `{"error": {"code", "message", "status"}}`.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: ErrorBody,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

pub(crate) fn error_message_from_body(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) if !env.error.message.is_empty() => env.error.message,
        _ => body.trim().to_string(),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub api_key: String,
    pub project_id: String,
    pub auth_url: String,
    pub token_url: String,
    pub firestore_url: String,
    pub poll_interval_ms: u32,
}

impl EnvConfig {
    pub const DEFAULT_PROJECT_ID: &'static str = "smartinventory-app";
    pub const DEFAULT_AUTH_URL: &'static str = "https://identitytoolkit.googleapis.com/v1";
    pub const DEFAULT_TOKEN_URL: &'static str = "https://securetoken.googleapis.com/v1";
    pub const DEFAULT_FIRESTORE_URL: &'static str = "https://firestore.googleapis.com/v1";
    pub const DEFAULT_POLL_INTERVAL_MS: u32 = 5_000;

    /// Reads `window.ENV`, falling back to defaults for anything missing.
    pub fn new() -> Self {
        let env = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object());

        Self::from_lookup(|key| {
            let env = env.as_ref()?;
            let v = js_sys::Reflect::get(env, &key.into()).ok()?;
            v.as_string().or_else(|| v.as_f64().map(|n| n.to_string()))
        })
    }

    /// Builds a config from a key lookup. Both the documented upper-case keys and the
    /// lower-case aliases are accepted for the credentials.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| lookup(*k))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let poll_interval_ms = pick(&["POLL_INTERVAL_MS", "poll_interval_ms"])
            .and_then(|s| s.parse::<f64>().ok())
            .map(|ms| ms.clamp(1_000.0, 60_000.0) as u32)
            .unwrap_or(Self::DEFAULT_POLL_INTERVAL_MS);

        Self {
            api_key: pick(&["FIREBASE_API_KEY", "api_key"]).unwrap_or_default(),
            project_id: pick(&["FIREBASE_PROJECT_ID", "project_id"])
                .unwrap_or_else(|| Self::DEFAULT_PROJECT_ID.to_string()),
            auth_url: trim_base(pick(&["AUTH_URL"]), Self::DEFAULT_AUTH_URL),
            token_url: trim_base(pick(&["TOKEN_URL"]), Self::DEFAULT_TOKEN_URL),
            firestore_url: trim_base(pick(&["FIRESTORE_URL"]), Self::DEFAULT_FIRESTORE_URL),
            poll_interval_ms,
        }
    }

    /// `projects/{p}/databases/(default)/documents`, as used inside document names.
    pub fn documents_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    pub fn documents_root(&self) -> String {
        format!("{}/{}", self.firestore_url, self.documents_path())
    }

    pub fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.documents_path())
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn trim_base(v: Option<String>, default: &str) -> String {
    v.unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Client for the hosted identity service and document store.
#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) config: EnvConfig,
    pub(crate) session: Option<Session>,
}

impl ApiClient {
    #[allow(dead_code)]
    pub fn new(config: EnvConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn load_from_storage() -> Self {
        Self {
            config: EnvConfig::new(),
            session: load_session(),
        }
    }

    pub fn save_to_storage(&self) {
        if let Some(session) = &self.session {
            save_session(session);
        }
    }

    pub fn clear_storage() {
        clear_account_storage();
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn needs_refresh(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| s.needs_refresh(now_ms()))
            .unwrap_or(false)
    }

    pub fn logout(&mut self) {
        self.session = None;
        Self::clear_storage();
    }

    fn auth_header(&self) -> Option<String> {
        self.session
            .as_ref()
            .map(|s| format!("Bearer {}", s.id_token))
    }

    fn with_auth_headers(&self, mut req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(header) = self.auth_header() {
            req = req.header("Authorization", header);
        }
        req
    }

    fn identity_url(&self, op: &str) -> String {
        format!(
            "{}/accounts:{op}?key={}",
            self.config.auth_url,
            urlencoding::encode(&self.config.api_key)
        )
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{collection}", self.config.documents_root())
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{collection}/{}",
            self.config.documents_root(),
            urlencoding::encode(id)
        )
    }

    async fn request_identity<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        body: &impl Serialize,
    ) -> ApiResult<T> {
        let res = reqwest::Client::new()
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else {
            let body = res.text().await.unwrap_or_default();
            let err = map_identity_error(&error_message_from_body(&body));
            log::warn!("identity request rejected: {}", err.message);
            Err(err)
        }
    }

    async fn send_document_request(
        &self,
        req: reqwest::RequestBuilder,
        ctx: &str,
    ) -> ApiResult<reqwest::Response> {
        let res = self
            .with_auth_headers(req)
            .send()
            .await
            .map_err(ApiError::network)?;

        let status = res.status();
        if status.is_success() {
            Ok(res)
        } else if status.as_u16() == 401 || status.as_u16() == 403 {
            log::warn!("{ctx}: unauthorized ({status})");
            Err(ApiError::unauthorized())
        } else if status.as_u16() == 404 {
            Err(ApiError {
                kind: ApiErrorKind::NotFound,
                message: format!("{ctx}: not found"),
            })
        } else {
            let body = res.text().await.unwrap_or_default();
            let err = ApiError::http(status, &body, ctx);
            log::warn!("{}", err.message);
            Err(err)
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<Session> {
        let resp: AuthResponse = self
            .request_identity(
                self.identity_url("signInWithPassword"),
                &PasswordSignInRequest::new(email, password),
            )
            .await?;
        Ok(resp.into_session(now_ms()))
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> ApiResult<Session> {
        let resp: AuthResponse = self
            .request_identity(
                self.identity_url("signUp"),
                &PasswordSignInRequest::new(email, password),
            )
            .await?;
        Ok(resp.into_session(now_ms()))
    }

    /// Exchanges the refresh token for a new id token.
    pub async fn refresh_session(&self) -> ApiResult<Session> {
        let Some(current) = self.session.clone() else {
            return Err(ApiError::unauthorized());
        };

        let url = format!(
            "{}/token?key={}",
            self.config.token_url,
            urlencoding::encode(&self.config.api_key)
        );
        let resp: RefreshResponse = self
            .request_identity(url, &RefreshRequest::new(&current.refresh_token))
            .await
            .map_err(|e| match e.kind {
                ApiErrorKind::Auth => ApiError::unauthorized(),
                _ => e,
            })?;

        Ok(resp.into_session(&current, now_ms()))
    }

    /// Signs in again with the current email; the identity service demands a recent
    /// login before a password change.
    pub async fn reauthenticate(&self, current_password: &str) -> ApiResult<Session> {
        let Some(session) = self.session.as_ref() else {
            return Err(ApiError::unauthorized());
        };
        self.sign_in(&session.email, current_password).await
    }

    pub async fn update_password(&self, new_password: &str) -> ApiResult<Session> {
        let Some(session) = self.session.clone() else {
            return Err(ApiError::unauthorized());
        };
        let resp: AuthResponse = self
            .request_identity(
                self.identity_url("update"),
                &UpdatePasswordRequest::new(&session.id_token, new_password),
            )
            .await?;
        Ok(resp.into_session_keeping(&session, now_ms()))
    }

    pub async fn get_profile(&self, uid: &str) -> ApiResult<Option<UserProfile>> {
        let req = reqwest::Client::new().get(self.document_url(USERS_COLLECTION, uid));
        match self.send_document_request(req, "Load profile failed").await {
            Ok(res) => {
                let doc: Document = res.json().await.map_err(ApiError::parse)?;
                Ok(decode_profile(&doc))
            }
            Err(e) if e.kind == ApiErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn set_profile(&self, uid: &str, profile: &UserProfile) -> ApiResult<()> {
        let req = reqwest::Client::new()
            .patch(self.document_url(USERS_COLLECTION, uid))
            .json(&serde_json::json!({ "fields": encode_profile_fields(profile) }));
        self.send_document_request(req, "Save profile failed")
            .await?;
        Ok(())
    }

    /// Reads the whole inventory collection, following pagination.
    pub async fn list_items(&self) -> ApiResult<Vec<InventoryItem>> {
        let mut out: Vec<InventoryItem> = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{}?pageSize={LIST_PAGE_SIZE}",
                self.collection_url(INVENTORY_COLLECTION)
            );
            if let Some(token) = &page_token {
                url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
            }

            let res = self
                .send_document_request(reqwest::Client::new().get(url), "Load inventory failed")
                .await?;
            let page: ListDocumentsResponse = res.json().await.map_err(ApiError::parse)?;

            out.extend(page.documents.iter().filter_map(decode_item));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        Ok(out)
    }

    /// Creates `inventory/{id}`; fails if the id is already taken.
    pub async fn create_item(&self, id: &str, draft: &ItemDraft) -> ApiResult<InventoryItem> {
        let name = self.config.document_name(INVENTORY_COLLECTION, id);
        let body = serde_json::json!({
            "writes": [{
                "update": { "name": name, "fields": encode_draft_fields(draft, None) },
                "currentDocument": { "exists": false },
                "updateTransforms": [
                    { "fieldPath": "createdAt", "setToServerValue": "REQUEST_TIME" }
                ]
            }]
        });

        let url = format!("{}:commit", self.config.documents_root());
        let res = self
            .send_document_request(reqwest::Client::new().post(url).json(&body), "Add item failed")
            .await?;
        let commit: CommitResponse = res.json().await.map_err(ApiError::parse)?;

        let mut item = InventoryItem::from_draft(id, draft);
        item.created_at = commit.server_timestamp();
        Ok(item)
    }

    pub async fn update_item(&self, id: &str, draft: &ItemDraft) -> ApiResult<InventoryItem> {
        let mut url = self.document_url(INVENTORY_COLLECTION, id);
        url.push('?');
        for path in ITEM_FIELD_PATHS.iter().chain(std::iter::once(&"updatedAt")) {
            url.push_str(&format!("updateMask.fieldPaths={path}&"));
        }
        url.push_str("currentDocument.exists=true");

        let body = serde_json::json!({
            "fields": encode_draft_fields(draft, Some(chrono::Utc::now()))
        });
        let res = self
            .send_document_request(reqwest::Client::new().patch(url).json(&body), "Update item failed")
            .await?;
        let doc: Document = res.json().await.map_err(ApiError::parse)?;

        decode_item(&doc).ok_or_else(|| ApiError::parse("updated document has no id"))
    }

    pub async fn delete_item(&self, id: &str) -> ApiResult<()> {
        let req = reqwest::Client::new().delete(self.document_url(INVENTORY_COLLECTION, id));
        self.send_document_request(req, "Delete item failed")
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> EnvConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvConfig::from_lookup(|k| map.get(k).cloned())
    }

    fn session() -> Session {
        Session {
            uid: "u1".to_string(),
            email: "u@example.com".to_string(),
            id_token: "id-token".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at_ms: i64::MAX,
        }
    }

    #[test]
    fn test_env_config_defaults() {
        let c = config_from(&[]);
        assert_eq!(c.project_id, "smartinventory-app");
        assert_eq!(c.firestore_url, EnvConfig::DEFAULT_FIRESTORE_URL);
        assert_eq!(c.poll_interval_ms, 5_000);
        assert!(c.api_key.is_empty());
    }

    #[test]
    fn test_env_config_prefers_upper_case_keys() {
        let c = config_from(&[
            ("FIREBASE_API_KEY", "k1"),
            ("api_key", "k2"),
            ("project_id", "demo"),
        ]);
        assert_eq!(c.api_key, "k1");
        assert_eq!(c.project_id, "demo");
    }

    #[test]
    fn test_env_config_trims_base_urls_and_clamps_poll() {
        let c = config_from(&[
            ("FIRESTORE_URL", "http://localhost:8080/v1/"),
            ("POLL_INTERVAL_MS", "50"),
        ]);
        assert_eq!(c.firestore_url, "http://localhost:8080/v1");
        assert_eq!(c.poll_interval_ms, 1_000);

        let c = config_from(&[("POLL_INTERVAL_MS", "not a number")]);
        assert_eq!(c.poll_interval_ms, 5_000);
    }

    #[test]
    fn test_document_paths() {
        let c = config_from(&[("FIREBASE_PROJECT_ID", "p1")]);
        assert_eq!(
            c.documents_root(),
            "https://firestore.googleapis.com/v1/projects/p1/databases/(default)/documents"
        );
        assert_eq!(
            c.document_name("inventory", "abc"),
            "projects/p1/databases/(default)/documents/inventory/abc"
        );
    }

    #[test]
    fn test_client_urls() {
        let mut client = ApiClient::new(config_from(&[("FIREBASE_API_KEY", "a b")]));
        assert_eq!(
            client.identity_url("signUp"),
            "https://identitytoolkit.googleapis.com/v1/accounts:signUp?key=a%20b"
        );
        assert!(client.document_url("inventory", "x/y").ends_with("/inventory/x%2Fy"));
        assert!(client.auth_header().is_none());

        client.set_session(session());
        assert_eq!(client.auth_header().as_deref(), Some("Bearer id-token"));
        assert!(client.is_authenticated());
        assert!(!client.needs_refresh());
    }

    #[test]
    fn test_error_message_from_body() {
        let body = r#"{"error":{"code":403,"message":"Missing or insufficient permissions.","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(
            error_message_from_body(body),
            "Missing or insufficient permissions."
        );
        assert_eq!(error_message_from_body("  plain text "), "plain text");
    }

    #[test]
    fn test_http_error_display_includes_context() {
        let e = ApiError::http(reqwest::StatusCode::BAD_REQUEST, "{}", "Add item failed");
        assert_eq!(e.kind, ApiErrorKind::Http);
        assert!(e.to_string().starts_with("Add item failed (400"));
    }
}
