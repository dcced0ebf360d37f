//! HTTP client for the user directory.

use std::time::Duration;

use async_trait::async_trait;
use common::UserId;
use reqwest::{Client, StatusCode};

use crate::{DirectoryError, Result, UserDirectory, UserSnapshot};

/// User directory reached over HTTP.
///
/// Issues `GET {base_url}/users/{id}`. Every request is bounded by the
/// timeout given at construction.
#[derive(Debug, Clone)]
pub struct HttpUserDirectory {
    client: Client,
    base_url: String,
}

impl HttpUserDirectory {
    /// Creates a client for the directory at `base_url`
    /// (e.g. `http://user-service:8081`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn transport_error(e: reqwest::Error) -> DirectoryError {
    if e.is_timeout() {
        DirectoryError::Timeout(e.to_string())
    } else {
        DirectoryError::Unavailable(e.to_string())
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get_user_by_id(&self, user_id: UserId) -> Result<UserSnapshot> {
        let response = self
            .client
            .get(format!("{}/users/{}", self.base_url, user_id))
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(DirectoryError::NotFound(user_id)),
            status if !status.is_success() => {
                return Err(DirectoryError::Service(format!("HTTP {status}")));
            }
            _ => {}
        }

        response.json::<UserSnapshot>().await.map_err(|e| {
            if e.is_timeout() {
                DirectoryError::Timeout(e.to_string())
            } else {
                DirectoryError::Malformed(e.to_string())
            }
        })
    }
}
