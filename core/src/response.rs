use std::collections::BTreeMap;

use serde::Serialize;

use crate::client::{UpstreamResponse, JSON_CONTENT_TYPE};
use crate::error::SearchError;


pub const ALLOW_ORIGIN_HEADER: &str = "Access-Control-Allow-Origin";

/// What the caller receives, in the proxy-integration layout
/// (`statusCode`, `headers`, `isBase64Encoded`, `body`).
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub is_base64_encoded: bool,
    pub body: String,
}

impl ResponseEnvelope {
    fn new(status_code: u16, body: String) -> Self {
        Self {
            status_code,
            headers: BTreeMap::from([(ALLOW_ORIGIN_HEADER.to_string(), "*".to_string())]),
            is_base64_encoded: false,
            body,
        }
    }

    pub fn from_upstream(response: UpstreamResponse) -> Self {
        Self::new(response.status, response.body)
    }

    pub fn from_error(err: &SearchError) -> Self {
        let kind = err.kind();
        let body = serde_json::json!({
            "error": kind.as_str(),
            "message": err.to_string(),
        });

        let mut envelope = Self::new(kind.status_code(), body.to_string());
        envelope
            .headers
            .insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());
        envelope
    }
}

impl From<Result<UpstreamResponse, SearchError>> for ResponseEnvelope {
    fn from(result: Result<UpstreamResponse, SearchError>) -> Self {
        match result {
            Ok(response) => Self::from_upstream(response),
            Err(err) => Self::from_error(&err),
        }
    }
}
