//! API client used by the console views.
//!
//! Request bodies go out form-encoded, which is what the backend's handlers
//! read. Every non-2xx answer is passed through the [`ResponseGuard`] before
//! the caller sees the error.

use axum::body::Bytes;
use owo_colors::OwoColorize;
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use std::{sync::Arc, time::Instant};
use tracing::{debug, error, info};

use crate::{
    config::RuntimeConfig,
    error::ApiError,
    guard::ResponseGuard,
    navigation::Navigator,
    notify::Notifier,
    session::{Identity, Session, SessionStore},
    util::to_params,
};

pub struct ApiClient<N, V> {
    http: reqwest::Client,
    api_base_url: String,
    api_path: String,
    guard: Arc<ResponseGuard<N, V>>,
}

impl<N: Notifier, V: Navigator> ApiClient<N, V> {
    /// `api_base_url` may omit the scheme; `http://` is assumed.
    pub fn new(api_base_url: &str, api_path: &str, guard: Arc<ResponseGuard<N, V>>) -> Self {
        let api_base_url = if api_base_url.starts_with("http") {
            api_base_url.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", api_base_url.trim_end_matches('/'))
        };
        Self {
            http: reqwest::Client::new(),
            api_base_url,
            api_path: api_path.trim_end_matches('/').to_string(),
            guard,
        }
    }

    pub fn session(&self) -> &SessionStore {
        self.guard.session()
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.api_base_url,
            self.api_path,
            path.trim_start_matches('/')
        )
    }

    async fn send(&self, request: reqwest::RequestBuilder, label: &str) -> Result<Bytes, ApiError> {
        let start = Instant::now();
        let response = request.send().await.map_err(|e| {
            error!("API request failed: {}", e);
            ApiError::Transport(e)
        })?;

        let status = response.status();
        info!(
            "{} {} {} ({}ms)",
            "API".yellow(),
            label,
            status,
            start.elapsed().as_millis()
        );

        if status.is_success() {
            return Ok(response.bytes().await?);
        }

        let outcome = self.guard.handle_reqwest(response).await;
        Err(ApiError::Status {
            status,
            message: outcome.notification.message,
        })
    }

    pub async fn get_json<T, K, Q>(&self, path: &str, query: Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: IntoIterator<Item = (K, K)>,
        K: AsRef<str>,
    {
        let mut query = query.into_iter().peekable();
        let url = if query.peek().is_some() {
            format!("{}{}", self.url(path), to_params(query))
        } else {
            self.url(path)
        };
        debug!("GET {}", url);
        let body = self
            .send(self.http.get(&url), &format!("GET {}", url))
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn send_form<F>(&self, method: Method, path: &str, form: &F) -> Result<Bytes, ApiError>
    where
        F: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!("{} {}", method, url);
        let label = format!("{} {}", method, url);
        self.send(self.http.request(method, &url).form(form), &label)
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        self.send(self.http.delete(&url), &format!("DELETE {}", url))
            .await
            .map(|_| ())
    }

    /// Signs in and loads the user record into the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        self.send_form(
            Method::POST,
            "login",
            &[("username", username), ("password", password)],
        )
        .await?;
        let identity: Identity = self.get_json("user", Vec::<(&str, &str)>::new()).await?;
        self.session().set(identity);
        Ok(self.session().snapshot())
    }

    /// Signs out. The local session is cleared even when the call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.delete("logout").await;
        self.session().reset();
        result
    }

    pub async fn fetch_runtime_config(&self) -> Result<RuntimeConfig, ApiError> {
        self.get_json("config", Vec::<(&str, &str)>::new()).await
    }
}
