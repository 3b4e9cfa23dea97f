use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use url::Url;

use crate::error::ApiError;
use crate::types::{CreatedUser, RawUser, UpdatedUser, UserEnvelope, UserPayload, UsersPage};

/// Default timeout applied to every request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Operations the user directory needs from the remote service.
///
/// The store is written against this trait so tests can substitute a
/// scripted implementation for the real HTTP client.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Fetch one page of the user collection.
    async fn fetch_users(&self, page: u32, per_page: u32) -> Result<UsersPage, ApiError>;

    /// Fetch a single user by id.
    async fn fetch_user(&self, id: u32) -> Result<RawUser, ApiError>;

    /// Create a user from the given payload.
    async fn create_user(&self, payload: &UserPayload) -> Result<CreatedUser, ApiError>;

    /// Replace the user with the given id.
    async fn update_user(&self, id: u32, payload: &UserPayload) -> Result<UpdatedUser, ApiError>;

    /// Delete the user with the given id.
    async fn delete_user(&self, id: u32) -> Result<(), ApiError>;
}

/// Reqwest-backed [`DirectoryApi`] implementation.
#[derive(Debug, Clone)]
pub struct HttpDirectoryApi {
    client: Client,
    base_url: Url,
}

impl HttpDirectoryApi {
    /// Create a client for the service rooted at `base_url`.
    ///
    /// The base URL is normalized first: a missing scheme defaults to
    /// `http://` and a trailing slash is trimmed, so values like
    /// `localhost:3000` work as-is.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let normalized = normalize_base_url(base_url);
        let base_url =
            Url::parse(&normalized).map_err(|e| ApiError::Url(format!("{normalized}: {e}")))?;

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        tracing::debug!(base_url = %base_url, "created directory API client");

        Ok(Self { client, base_url })
    }

    /// The normalized base URL this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(format!("{} cannot be a base", self.base_url)))?
            .extend(segments);
        Ok(url)
    }

    fn check_status(response: &Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl DirectoryApi for HttpDirectoryApi {
    async fn fetch_users(&self, page: u32, per_page: u32) -> Result<UsersPage, ApiError> {
        let url = self.endpoint(&["users"])?;
        tracing::debug!(page, per_page, "GET /users");

        let response = self
            .client
            .get(url)
            .query(&[("page", page), ("per_page", per_page)])
            .send()
            .await?;
        Self::check_status(&response)?;
        Ok(response.json().await?)
    }

    async fn fetch_user(&self, id: u32) -> Result<RawUser, ApiError> {
        let url = self.endpoint(&["users", &id.to_string()])?;
        tracing::debug!(id, "GET /users/{{id}}");

        let response = self.client.get(url).send().await?;
        Self::check_status(&response)?;
        let envelope: UserEnvelope = response.json().await?;
        Ok(envelope.data)
    }

    async fn create_user(&self, payload: &UserPayload) -> Result<CreatedUser, ApiError> {
        let url = self.endpoint(&["users"])?;
        tracing::debug!(name = %payload.name, "POST /users");

        let response = self.client.post(url).json(payload).send().await?;
        Self::check_status(&response)?;
        Ok(response.json().await?)
    }

    async fn update_user(&self, id: u32, payload: &UserPayload) -> Result<UpdatedUser, ApiError> {
        let url = self.endpoint(&["users", &id.to_string()])?;
        tracing::debug!(id, "PUT /users/{{id}}");

        let response = self.client.put(url).json(payload).send().await?;
        Self::check_status(&response)?;
        Ok(response.json().await?)
    }

    async fn delete_user(&self, id: u32) -> Result<(), ApiError> {
        let url = self.endpoint(&["users", &id.to_string()])?;
        tracing::debug!(id, "DELETE /users/{{id}}");

        let response = self.client.delete(url).send().await?;
        Self::check_status(&response)
    }
}

/// Add a scheme when missing and trim a trailing slash.
///
/// Many operators configure `localhost:3000`, which `Url::parse` rejects.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("localhost:3000"), "http://localhost:3000");
        assert_eq!(
            normalize_base_url("https://reqres.in/api/"),
            "https://reqres.in/api"
        );
        assert_eq!(
            normalize_base_url("  http://10.0.0.1:8080  "),
            "http://10.0.0.1:8080"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = HttpDirectoryApi::new("https://reqres.in/api").expect("valid base");
        let url = api.endpoint(&["users", "7"]).expect("valid endpoint");
        assert_eq!(url.as_str(), "https://reqres.in/api/users/7");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(HttpDirectoryApi::new("http://").is_err());
    }
}
