use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request to {url} failed: {source}")]
    Request { url: String, #[source] source: reqwest::Error },
    #[error("upstream {url} returned a non-JSON body: {source}")]
    Decode { url: String, #[source] source: reqwest::Error },
}

/// HTTP client for the next tier down. Every call carries the current trace
/// context in its headers.
#[derive(Clone, Debug)]
pub struct Upstream {
    client: reqwest::Client,
    base_url: String,
}

impl Upstream {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), base_url: base_url.into().trim_end_matches('/').to_string() }
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    #[instrument(skip(self), fields(otel.kind = "client", http.url = tracing::field::Empty))]
    pub async fn get_json(&self, path: &str) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::Span::current().record("http.url", url.as_str());
        let resp = self.client.get(&url)
            .headers(cloudlab_core::trace_headers())
            .send()
            .await
            .map_err(|source| UpstreamError::Request { url: url.clone(), source })?;
        resp.json::<Value>().await.map_err(|source| UpstreamError::Decode { url, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        assert_eq!(Upstream::new("http://backend:5001/").base_url(), "http://backend:5001");
    }

    #[tokio::test]
    async fn unreachable_upstream_is_request_error() {
        let up = Upstream::new("http://127.0.0.1:9");
        let err = up.get_json("/data").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Request { .. }));
        assert!(err.to_string().starts_with("upstream request to http://127.0.0.1:9/data failed"));
    }
}
