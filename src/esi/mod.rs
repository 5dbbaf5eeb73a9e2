//! ESI HTTP client.
//!
//! A thin `reqwest` wrapper covering the endpoints the asset pipeline needs: paginated owner
//! assets, asset names, NPC stations and player structures. Owner-scoped endpoints are sent
//! with the bearer token registered for that owner through [`EsiClient::set_access_token`];
//! obtaining and refreshing tokens is the caller's job.

pub mod assets;
pub mod source;
pub mod universe;

use std::{collections::HashMap, sync::Arc};

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::{esi::EsiError, Error};

pub use assets::{CharacterAssets, CorporationAssets};

/// Default ESI base URL including the route version.
pub const DEFAULT_ESI_URL: &str = "https://esi.evetech.net/latest";

/// Cheaply cloneable ESI client sharing one connection pool and token store.
#[derive(Clone)]
pub struct EsiClient {
    inner: Arc<EsiClientRef>,
}

struct EsiClientRef {
    http: reqwest::Client,
    esi_url: String,
    tokens: RwLock<HashMap<i64, String>>,
}

/// Builder for [`EsiClient`].
///
/// ESI requires every consumer to identify itself, so a user agent is mandatory.
#[derive(Debug, Default)]
pub struct EsiClientBuilder {
    esi_url: Option<String>,
    user_agent: Option<String>,
}

impl EsiClientBuilder {
    /// Override the ESI base URL, used to point the client at a mock server.
    pub fn esi_url(mut self, esi_url: &str) -> Self {
        self.esi_url = Some(esi_url.trim_end_matches('/').to_string());
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    /// Build the client.
    ///
    /// # Returns
    /// - `Ok(EsiClient)` - Client ready for use
    /// - `Err(Error::InvalidInput)` - No user agent was provided
    /// - `Err(Error::EsiError)` - The underlying HTTP client could not be constructed
    pub fn build(self) -> Result<EsiClient, Error> {
        let user_agent = self
            .user_agent
            .filter(|agent| !agent.trim().is_empty())
            .ok_or_else(|| Error::InvalidInput("ESI client requires a user agent".to_string()))?;
        let esi_url = self
            .esi_url
            .unwrap_or_else(|| DEFAULT_ESI_URL.to_string());

        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|source| EsiError::Request {
                endpoint: esi_url.clone(),
                source,
            })?;

        Ok(EsiClient {
            inner: Arc::new(EsiClientRef {
                http,
                esi_url,
                tokens: RwLock::new(HashMap::new()),
            }),
        })
    }
}

impl EsiClient {
    pub fn builder() -> EsiClientBuilder {
        EsiClientBuilder::default()
    }

    pub fn esi_url(&self) -> &str {
        &self.inner.esi_url
    }

    /// Register the bearer token used for `owner_id`'s authenticated requests.
    ///
    /// Replaces any token previously registered for the owner.
    pub async fn set_access_token(&self, owner_id: i64, access_token: impl Into<String>) {
        self.inner
            .tokens
            .write()
            .await
            .insert(owner_id, access_token.into());
    }

    /// Start a request to `endpoint` (a path relative to the ESI base URL).
    ///
    /// With `owner_id` set, the owner's bearer token is attached and a missing token fails
    /// the request before anything is sent.
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        owner_id: Option<i64>,
    ) -> Result<RequestBuilder, EsiError> {
        let url = format!("{}{}", self.inner.esi_url, endpoint);
        let builder = self.inner.http.request(method, url);

        let Some(owner_id) = owner_id else {
            return Ok(builder);
        };

        let tokens = self.inner.tokens.read().await;
        let token = tokens
            .get(&owner_id)
            .ok_or(EsiError::MissingAccessToken(owner_id))?;

        Ok(builder.bearer_auth(token))
    }

    async fn send(endpoint: &str, request: RequestBuilder) -> Result<Response, EsiError> {
        request.send().await.map_err(|source| EsiError::Request {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn body(endpoint: &str, response: Response) -> Result<Vec<u8>, EsiError> {
        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|source| EsiError::Request {
                endpoint: endpoint.to_string(),
                source,
            })
    }

    /// Turn a non-success response into [`EsiError::Status`], keeping the body for diagnostics.
    async fn status_error(endpoint: &str, response: Response) -> EsiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        EsiError::Status {
            endpoint: endpoint.to_string(),
            status,
            body,
        }
    }

    fn decode<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<T, EsiError> {
        serde_json::from_slice(body).map_err(|source| EsiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// GET `endpoint` and decode a JSON body, mapping 404 to `Ok(None)`.
    async fn get_optional<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        owner_id: Option<i64>,
    ) -> Result<Option<T>, EsiError> {
        let request = self.request(Method::GET, endpoint, owner_id).await?;
        let response = Self::send(endpoint, request).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::status_error(endpoint, response).await);
        }

        let body = Self::body(endpoint, response).await?;
        Self::decode(endpoint, &body).map(Some)
    }
}
