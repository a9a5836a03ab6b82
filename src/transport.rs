//! The HTTP collaborator: endpoint description and the one-shot exchange.

use async_trait::async_trait;
use log::{debug, warn};

use crate::error::FetchError;

const TOKEN_HEADER: &str = "X-Confetch-Token";
const SERVICE_VERSION: &str = "v1";

/// Raw outcome of one request/response exchange. Status classification is
/// the dispatcher's job; the transport only moves bytes.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// One HTTP exchange: the encoded context in, the raw response out.
///
/// Retry policy, TLS details, and connection pooling belong to the
/// implementation, not to the callers of this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, body: Vec<u8>) -> Result<RawResponse, FetchError>;
}

/// Describes the config service endpoint and the credentials to reach it.
///
/// ## Example
///
/// ```
/// use confetch::Environment;
///
/// let environment = Environment::new("testToken", "baseConfig1", "config.example.com")
///     .with_header("X-Confetch-Userid", "testSequence")
///     .with_port(8443);
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    token: String,
    config_name: String,
    host: String,
    port: Option<u16>,
    tls: bool,
    headers: Vec<(String, String)>,
}

impl Environment {
    /// Creates an endpoint description for the named base configuration.
    pub fn new(
        token: impl Into<String>,
        config_name: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            config_name: config_name.into(),
            host: host.into(),
            port: None,
            tls: true,
            headers: Vec::new(),
        }
    }

    /// Overrides the default port for the scheme.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Adds an extra header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Switches to plain HTTP. Intended for local development setups.
    #[must_use]
    pub fn without_tls(mut self) -> Self {
        self.tls = false;
        self
    }

    /// The full request URL for this endpoint.
    pub(crate) fn url(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        let port = match self.port {
            Some(port) => format!(":{port}"),
            None => String::new(),
        };
        format!(
            "{scheme}://{host}{port}/{SERVICE_VERSION}/config/{name}",
            host = self.host,
            name = self.config_name,
        )
    }
}

/// `reqwest`-backed transport issuing one `PUT` per send.
pub struct HttpTransport {
    client: reqwest::Client,
    environment: Environment,
}

impl HttpTransport {
    pub fn new(environment: Environment) -> Self {
        Self {
            client: reqwest::Client::new(),
            environment,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: Vec<u8>) -> Result<RawResponse, FetchError> {
        let url = self.environment.url();
        debug!("PUT {url}");

        let mut request = self
            .client
            .put(&url)
            .header(TOKEN_HEADER, &self.environment.token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        for (name, value) in &self.environment.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            warn!("transport failure for {url}: {e}");
            if e.is_connect() {
                FetchError::NoResponse
            } else {
                FetchError::Unknown
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                warn!("could not read response body from {url}: {e}");
                FetchError::NoData
            })?
            .to_vec();

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_uses_tls_and_default_port() {
        let environment = Environment::new("t", "baseConfig1", "config.example.com");
        assert_eq!(
            environment.url(),
            "https://config.example.com/v1/config/baseConfig1"
        );
    }

    #[test]
    fn test_url_with_explicit_port_and_plain_http() {
        let environment = Environment::new("t", "base", "localhost")
            .with_port(8080)
            .without_tls();
        assert_eq!(environment.url(), "http://localhost:8080/v1/config/base");
    }
}
