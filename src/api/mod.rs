// HTTP gateway client for the legal research backend

pub mod chat;
pub mod endpoints;
pub mod services;
pub mod types;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::session::{SessionStore, SharedSession};
use types::Paginated;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// 401: the stored token has been cleared; the caller must re-authenticate.
    #[error("authentication required")]
    Unauthorized,
    #[error("access forbidden")]
    Forbidden,
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    /// The backend answered 2xx but reported failure in its envelope.
    #[error("{0}")]
    Backend(String),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Uniform request dispatch: attaches the bearer token from the injected
/// session, logs every request/response, and maps authentication failures
/// to [`ApiError::Unauthorized`] after clearing the stored credentials.
///
/// Nothing here retries; recovery is always caller-initiated.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    session: SharedSession,
    store: SessionStore,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: u64,
        session: SharedSession,
        store: SessionStore,
    ) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(request_timeout))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            http,
            session,
            store,
        })
    }

    /// Join a path onto the base URL without doubling the slash.
    pub fn url(&self, path: &str) -> String {
        if path.is_empty() {
            return self.base_url.clone();
        }
        match (self.base_url.ends_with('/'), path.starts_with('/')) {
            (true, true) => format!("{}{}", self.base_url, &path[1..]),
            (false, false) => format!("{}/{}", self.base_url, path),
            _ => format!("{}{}", self.base_url, path),
        }
    }

    fn token(&self) -> Option<String> {
        self.session.lock().ok().and_then(|s| s.token.clone())
    }

    /// Forget the credentials after a 401 so the UI falls back to login.
    fn expire_session(&self) {
        if let Ok(mut session) = self.session.lock() {
            session.token = None;
        }
        if let Err(err) = self.store.clear_token() {
            warn!(error = %err, "failed to clear stored token");
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a prepared request and normalize the status-code handling that
    /// every endpoint shares. The original request is never replayed.
    pub(crate) async fn execute(
        &self,
        builder: RequestBuilder,
        method: &Method,
        path: &str,
    ) -> ApiResult<reqwest::Response> {
        debug!(%method, path, "api request");

        let response = builder.send().await?;
        let status = response.status();
        debug!(%method, path, status = status.as_u16(), "api response");

        if status == StatusCode::UNAUTHORIZED {
            warn!(path, "unauthorized, clearing session token");
            self.expire_session();
            return Err(ApiError::Unauthorized);
        }
        if status == StatusCode::FORBIDDEN {
            warn!(path, "access forbidden");
            return Err(ApiError::Forbidden);
        }
        if status.is_client_error() || status.is_server_error() {
            let message = response.text().await.unwrap_or_default();
            error!(path, status = status.as_u16(), "api error response");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let builder = self.request(Method::GET, path);
        let response = self.execute(builder, &Method::GET, path).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u64,
        limit: u64,
    ) -> ApiResult<Paginated<T>> {
        let builder = self
            .request(Method::GET, path)
            .query(&[("page", page), ("limit", limit)]);
        let response = self.execute(builder, &Method::GET, path).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let builder = self.request(Method::POST, path).json(body);
        let response = self.execute(builder, &Method::POST, path).await?;
        Ok(response.json().await?)
    }

    /// POST without a body (logout, refresh).
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let builder = self.request(Method::POST, path);
        let response = self.execute(builder, &Method::POST, path).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ApiResult<T> {
        let builder = self.request(Method::POST, path).multipart(form);
        let response = self.execute(builder, &Method::POST, path).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let builder = self.request(Method::PUT, path).json(body);
        let response = self.execute(builder, &Method::PUT, path).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let builder = self.request(Method::DELETE, path);
        let response = self.execute(builder, &Method::DELETE, path).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn get_bytes(&self, path: &str) -> ApiResult<Vec<u8>> {
        let builder = self.request(Method::GET, path);
        let response = self.execute(builder, &Method::GET, path).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::ApiClient;
    use crate::session::{self, Session, SessionStore};
    use tempfile::TempDir;

    /// A client wired to a wiremock server and a temp-dir session store.
    pub fn client_with(base_url: &str, session: Session) -> (TempDir, ApiClient) {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::at(temp_dir.path().join("session.json"));
        store.save(&session).unwrap();
        let client = ApiClient::new(base_url, 5, session::shared(session), store).unwrap();
        (temp_dir, client)
    }
}
