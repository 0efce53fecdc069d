//! HTTP client for the NoteSafe key escrow API.
//!
//! Handles bearer authentication, token refresh on 401, and the escrow
//! record endpoints. Uses reqwest with JSON serialization.

use crate::config::CloudConfig;
use crate::error::{CloudError, CloudResult};
use crate::store::EscrowStore;
use crate::types::{AuthTokens, CloudKeyRecord};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// State shared across API client clones.
struct AuthState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    /// Bumped on every successful refresh so a caller that waited on the
    /// refresh lock can tell a concurrent refresh already happened.
    refresh_generation: u64,
}

/// HTTP client for the NoteSafe escrow endpoints.
pub struct CloudApiClient {
    client: Client,
    config: CloudConfig,
    auth: Arc<RwLock<AuthState>>,
    /// Serializes refreshes; the server rotates refresh tokens on use.
    refresh_lock: Arc<tokio::sync::Mutex<()>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
}

impl CloudApiClient {
    pub fn new(config: CloudConfig) -> CloudResult<Self> {
        if config.api_base_url.is_empty() {
            return Err(CloudError::Config("missing api_base_url".to_string()));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            auth: Arc::new(RwLock::new(AuthState {
                access_token: None,
                refresh_token: None,
                refresh_generation: 0,
            })),
            refresh_lock: Arc::new(tokio::sync::Mutex::new(())),
        })
    }

    /// Sets auth tokens (issued by the authentication layer).
    pub async fn set_tokens(&self, access_token: String, refresh_token: String) {
        let mut auth = self.auth.write().await;
        auth.access_token = Some(access_token);
        auth.refresh_token = Some(refresh_token);
    }

    pub async fn is_authenticated(&self) -> bool {
        self.auth.read().await.access_token.is_some()
    }

    pub async fn logout(&self) {
        let mut auth = self.auth.write().await;
        auth.access_token = None;
        auth.refresh_token = None;
    }

    /// Returns current auth tokens for persistence.
    pub async fn current_tokens(&self) -> Option<AuthTokens> {
        let auth = self.auth.read().await;
        Some(AuthTokens {
            access_token: auth.access_token.clone()?,
            refresh_token: auth.refresh_token.clone()?,
        })
    }

    pub async fn refresh_access_token(&self) -> CloudResult<String> {
        let pre_gen = self.auth.read().await.refresh_generation;

        let _guard = self.refresh_lock.lock().await;

        // A concurrent refresh finished while we waited: use its token.
        {
            let auth = self.auth.read().await;
            if auth.refresh_generation > pre_gen {
                return auth.access_token.clone().ok_or(CloudError::AuthRequired);
            }
        }

        let refresh_token = {
            let auth = self.auth.read().await;
            auth.refresh_token.clone().ok_or(CloudError::AuthRequired)?
        };

        let url = format!("{}/api/auth/refresh", self.config.base_url());
        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        if resp.status() == StatusCode::UNAUTHORIZED || resp.status() == StatusCode::FORBIDDEN {
            self.logout().await;
            return Err(CloudError::AuthFailed(
                "token refresh failed: session expired, re-authentication required".to_string(),
            ));
        }

        let resp: TokenResponse = resp
            .error_for_status()
            .map_err(|e| CloudError::AuthFailed(format!("token refresh failed: {e}")))?
            .json()
            .await?;

        let mut auth = self.auth.write().await;
        auth.access_token = Some(resp.access_token.clone());
        auth.refresh_token = Some(resp.refresh_token);
        auth.refresh_generation += 1;

        Ok(resp.access_token)
    }

    fn request(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Option<&CloudKeyRecord>,
    ) -> RequestBuilder {
        let req = self.client.request(method, url).bearer_auth(token);
        match body {
            Some(record) => req.json(record),
            None => req,
        }
    }

    /// Makes an authenticated request, retrying once on 401.
    async fn auth_send(
        &self,
        method: Method,
        path: &str,
        body: Option<&CloudKeyRecord>,
    ) -> CloudResult<Response> {
        let url = format!("{}{}", self.config.base_url(), path);
        let token = self.get_token().await?;

        let resp = self
            .request(method.clone(), &url, &token, body)
            .send()
            .await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            debug!("401 on {method} {path}, refreshing token");
            let new_token = self.refresh_access_token().await?;
            return Ok(self.request(method, &url, &new_token, body).send().await?);
        }

        Ok(resp)
    }

    async fn get_token(&self) -> CloudResult<String> {
        self.auth
            .read()
            .await
            .access_token
            .clone()
            .ok_or(CloudError::AuthRequired)
    }

    fn escrow_path(user_id: &str) -> String {
        format!("/api/keys/escrow/{}", urlencoding::encode(user_id))
    }
}

fn api_error(resp: Response) -> CloudResult<Response> {
    resp.error_for_status()
        .map_err(|e| CloudError::Api(e.to_string()))
}

#[async_trait]
impl EscrowStore for CloudApiClient {
    async fn fetch(&self, user_id: &str) -> CloudResult<Option<CloudKeyRecord>> {
        let resp = self
            .auth_send(Method::GET, &Self::escrow_path(user_id), None)
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(api_error(resp)?.json().await?))
    }

    async fn put(&self, user_id: &str, record: &CloudKeyRecord) -> CloudResult<()> {
        let resp = self
            .auth_send(Method::PUT, &Self::escrow_path(user_id), Some(record))
            .await?;
        api_error(resp)?;
        Ok(())
    }

    async fn exists(&self, user_id: &str) -> CloudResult<bool> {
        let resp = self
            .auth_send(Method::HEAD, &Self::escrow_path(user_id), None)
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        api_error(resp)?;
        Ok(true)
    }

    async fn delete(&self, user_id: &str) -> CloudResult<()> {
        let resp = self
            .auth_send(Method::DELETE, &Self::escrow_path(user_id), None)
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        api_error(resp)?;
        Ok(())
    }
}
