use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::client::{SearchClient, UpstreamResponse};
use crate::config::SearchConfig;
use crate::credentials::CredentialsProvider;
use crate::error::{ErrorKind, SearchError};
use crate::params::SearchParams;
use crate::query::build_query;
use crate::response::ResponseEnvelope;


/// Turns one set of query-string parameters into one signed search call.
///
/// Holds no per-request state; clones share the HTTP connection pool and the
/// credentials provider.
#[derive(Clone)]
pub struct SearchHandler {
    client: SearchClient,
    credentials: Arc<dyn CredentialsProvider>,
}

impl SearchHandler {
    pub fn new(config: &SearchConfig, credentials: Arc<dyn CredentialsProvider>) -> Result<Self, SearchError> {
        Ok(Self::with_client(SearchClient::new(config)?, credentials))
    }

    pub fn with_client(client: SearchClient, credentials: Arc<dyn CredentialsProvider>) -> Self {
        Self { client, credentials }
    }

    pub async fn search(&self, params: &SearchParams) -> Result<UpstreamResponse, SearchError> {
        info!(?params, "search request");

        let query = build_query(params)?;
        let body = query.to_json()?;
        debug!(query = %body, "search query");

        let credentials = self.credentials.credentials()?;
        let response = self.client.search(&credentials, body).await?;

        info!(status = response.status, bytes = response.body.len(), "upstream responded");
        Ok(response)
    }

    /// Like [`SearchHandler::search`], with failures folded into an error envelope.
    pub async fn handle(&self, params: &SearchParams) -> ResponseEnvelope {
        let result = self.search(params).await;

        if let Err(err) = &result {
            match err.kind() {
                ErrorKind::BadRequest => warn!(error = %err, "rejected search request"),
                ErrorKind::UpstreamUnavailable => error!(error = %err, "search upstream unavailable"),
            }
        }

        ResponseEnvelope::from(result)
    }
}
