//! services/gateway/src/adapters/http.rs
//!
//! The REST adapter. `RestResource` implements the `EntityGateway` port for any
//! resource path; the per-resource transition endpoints live in `resources.rs`.

use crate::config::ConfigError;
use crate::error::ClientError;
use async_trait::async_trait;
use field_service_core::domain::{Entity, EntityId};
use field_service_core::ports::{EntityGateway, PortError, PortResult, TokenProvider};
use field_service_core::validate::Validate;
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

//=========================================================================================
// The Shared HTTP Client
//=========================================================================================

/// One connection pool for every resource, plus the bearer token source.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl HttpClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, ClientError> {
        let invalid = |reason: String| {
            ClientError::Config(ConfigError::InvalidValue("API_BASE_URL".to_string(), reason))
        };
        let base_url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid(format!("'{}' cannot carry a path", base_url)));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    /// Appends `segments` to the base path. Each segment is percent-encoded,
    /// so an id containing `/`, `?` or `#` stays a single segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        debug!("{} {}", method, url);
        let request = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        // The token is read per request so login/logout apply immediately.
        match self.tokens.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a request without a body. Returns the response text, or `None`
    /// when the server answered 204 or with an empty body.
    pub async fn send(&self, method: Method, segments: &[&str]) -> PortResult<Option<String>> {
        execute(self.request(method, segments)).await
    }

    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> PortResult<Option<String>> {
        execute(self.request(method, segments).json(body)).await
    }
}

async fn execute(request: RequestBuilder) -> PortResult<Option<String>> {
    let response = request.send().await.map_err(transport_error)?;
    let status = response.status();
    let text = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(error_from_response(status, &text));
    }
    if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(text))
}

fn transport_error(e: reqwest::Error) -> PortError {
    PortError::Network(e.to_string())
}

/// Turns a non-2xx response into a `Server` error. The message is the JSON
/// body's `message`, else its `title`, else the raw text, else the reason phrase.
pub fn error_from_response(status: StatusCode, body: &str) -> PortError {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "title"].iter().find_map(|key| {
                value
                    .get(key)
                    .and_then(serde_json::Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
        });
    let raw = body.trim();
    let message = from_json
        .or_else(|| (!raw.is_empty()).then(|| raw.to_string()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string()
        });
    PortError::Server {
        status: status.as_u16(),
        message,
    }
}

fn decode<T: DeserializeOwned>(body: Option<String>) -> PortResult<Option<T>> {
    body.map(|text| {
        serde_json::from_str(&text)
            .map_err(|e| PortError::Unexpected(format!("Invalid response body: {}", e)))
    })
    .transpose()
}

//=========================================================================================
// The Generic Resource Adapter
//=========================================================================================

/// A REST collection at `/{path}` with items at `/{path}/{id}`.
pub struct RestResource<E, D, P> {
    http: HttpClient,
    path: &'static str,
    _marker: PhantomData<fn() -> (E, D, P)>,
}

impl<E, D, P> RestResource<E, D, P>
where
    E: Entity + DeserializeOwned,
{
    pub fn new(http: HttpClient, path: &'static str) -> Self {
        Self {
            http,
            path,
            _marker: PhantomData,
        }
    }

    /// `PATCH /{path}/{id}/{action}` with no body. Any 2xx means the server
    /// applied the change. Its body is used only when it is the updated
    /// entity; anything else yields `None` so callers patch locally.
    pub(crate) async fn transition(&self, id: &EntityId, action: &str) -> PortResult<Option<E>> {
        let body = self
            .http
            .send(Method::PATCH, &[self.path, id.as_str(), action])
            .await?;
        Ok(body.and_then(|text| match serde_json::from_str::<E>(&text) {
            Ok(entity) => Some(entity),
            Err(e) => {
                debug!(
                    "{} {} {} answered without the entity ({}), patching locally",
                    E::KIND,
                    id,
                    action,
                    e
                );
                None
            }
        }))
    }
}

fn required<T>(body: Option<T>, kind: &str, op: &str) -> PortResult<T> {
    body.ok_or_else(|| PortError::Unexpected(format!("Empty response body on {} {}", op, kind)))
}

#[async_trait]
impl<E, D, P> EntityGateway for RestResource<E, D, P>
where
    E: Entity + DeserializeOwned,
    D: Validate + Serialize + Send + Sync + 'static,
    P: Validate + Serialize + Send + Sync + 'static,
{
    type Entity = E;
    type Draft = D;
    type Patch = P;

    async fn list(&self) -> PortResult<Vec<E>> {
        let body = self.http.send(Method::GET, &[self.path]).await?;
        Ok(decode(body)?.unwrap_or_default())
    }

    async fn create(&self, draft: &D) -> PortResult<E> {
        let body = self.http.send_json(Method::POST, &[self.path], draft).await?;
        required(decode(body)?, E::KIND, "create")
    }

    async fn update(&self, id: &EntityId, patch: &P) -> PortResult<E> {
        let body = self
            .http
            .send_json(Method::PUT, &[self.path, id.as_str()], patch)
            .await?;
        required(decode(body)?, E::KIND, "update")
    }

    /// Any body the server sends back is ignored.
    async fn delete(&self, id: &EntityId) -> PortResult<()> {
        self.http
            .send(Method::DELETE, &[self.path, id.as_str()])
            .await?;
        Ok(())
    }
}
