//! Data source backed by the school REST API.

use std::time::Duration;

use async_trait::async_trait;
use campus_engine::{EntityKind, Record};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use super::{collection_from_body, DataSource, SourceError};

/// Talks to the upstream API over HTTP.
///
/// Cheap to clone; the inner `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
    /// Used when the caller did not supply a session token.
    service_token: Option<String>,
}

impl HttpSource {
    /// Create a source for `base_url` with a per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        service_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            service_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token.or(self.service_token.as_deref()) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: Response) -> Result<Response, SourceError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(SourceError::Status { status, message })
        }
    }

    async fn json_body(response: Response) -> Result<Value, SourceError> {
        let response = Self::check(response).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| SourceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_all(
        &self,
        entity: EntityKind,
        token: Option<&str>,
    ) -> Result<Vec<Record>, SourceError> {
        let url = self.url(entity.list_path());
        tracing::debug!(%entity, %url, "Fetching collection");

        let response = self.authorize(self.client.get(&url), token).send().await?;
        let records = collection_from_body(Self::json_body(response).await?)?;

        tracing::debug!(%entity, count = records.len(), "Fetched collection");
        Ok(records)
    }

    async fn create(
        &self,
        entity: EntityKind,
        payload: Value,
        token: Option<&str>,
    ) -> Result<Value, SourceError> {
        let url = self.url(entity.item_path());
        let request = self.client.post(&url).json(&payload);
        let response = self.authorize(request, token).send().await?;
        Self::json_body(response).await
    }

    async fn update(
        &self,
        entity: EntityKind,
        payload: Value,
        token: Option<&str>,
    ) -> Result<Value, SourceError> {
        let url = self.url(entity.item_path());
        let request = self.client.put(&url).json(&payload);
        let response = self.authorize(request, token).send().await?;
        Self::json_body(response).await
    }

    async fn delete(
        &self,
        entity: EntityKind,
        id: &str,
        token: Option<&str>,
    ) -> Result<(), SourceError> {
        let url = self.url(entity.item_path());
        let request = self.client.delete(&url).query(&[("id", id)]);
        let response = self.authorize(request, token).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_without_double_slash() {
        let source =
            HttpSource::new("http://api.local/", None, Duration::from_secs(1)).unwrap();
        assert_eq!(
            source.url(EntityKind::Teachers.list_path()),
            "http://api.local/lista-maestros/"
        );

        let source = HttpSource::new("http://api.local", None, Duration::from_secs(1)).unwrap();
        assert_eq!(
            source.url(EntityKind::Subjects.item_path()),
            "http://api.local/materias/"
        );
    }

    #[tokio::test]
    async fn unreachable_upstream_is_an_error() {
        let source =
            HttpSource::new("http://127.0.0.1:9", None, Duration::from_millis(200)).unwrap();
        let result = source.fetch_all(EntityKind::Students, None).await;
        assert!(matches!(result, Err(SourceError::Request(_))));
    }
}
