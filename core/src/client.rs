use std::time::Duration;

use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;

use crate::config::SearchConfig;
use crate::credentials::Credentials;
use crate::error::SearchError;
use crate::signing::{sign_request, SigningScope};


pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Status and text of whatever the search domain answered.
///
/// The body is decoded as UTF-8 (the search domain answers in JSON); invalid
/// byte sequences become U+FFFD rather than failing the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: Url,
    region: String,
    service_name: String,
}

impl SearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Self::with_http(config, builder.build()?)
    }

    pub fn with_http(config: &SearchConfig, http: reqwest::Client) -> Result<Self, SearchError> {
        Ok(Self {
            http,
            endpoint: config.endpoint()?,
            region: config.region.clone(),
            service_name: config.service_name.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends `body` to the `_search` endpoint as a signed GET.
    pub async fn search(&self, credentials: &Credentials, body: String) -> Result<UpstreamResponse, SearchError> {
        let scope = SigningScope {
            region: &self.region,
            service: &self.service_name,
        };
        let signed = sign_request(
            credentials,
            scope,
            "GET",
            &self.endpoint,
            JSON_CONTENT_TYPE,
            body.as_bytes(),
            Utc::now(),
        )?;

        let mut request = self
            .http
            .get(self.endpoint.clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        for (name, value) in signed {
            request = request.header(name, value);
        }

        let response = request.body(body).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(UpstreamResponse { status, body })
    }
}
