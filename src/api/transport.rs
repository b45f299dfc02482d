// ============================================================================
// Transport HTTP injectable
// ============================================================================
// Le fetcher ne parle jamais directement à reqwest : il passe par le trait
// HttpTransport, ce qui permet d'injecter un faux transport dans les tests
//
// CONCEPTS RUST :
// 1. async_trait : méthodes async dans un trait (object-safe, Send)
// 2. Send + Sync : le transport est partagé entre tâches tokio
// 3. Mapping d'erreurs : reqwest::Error -> TransportError (timeout, connexion)
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::TransportError;

/// Réponse HTTP brute (statut + corps texte)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Statut 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Collaborateur HTTP : un GET avec paramètres de requête
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, TransportError>;
}

/// Transport de production basé sur reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Crée le client HTTP avec le timeout configuré
    ///
    /// Un timeout déclenché remonte en TransportError::Timeout,
    /// puis en FetchError::Network côté fetcher.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sneakerwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
        debug!(url = %url, "Sending HTTP request");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        debug!(status, bytes = body.len(), "Received HTTP response");

        Ok(HttpResponse { status, body })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
