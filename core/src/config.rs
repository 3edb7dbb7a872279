use std::env;

use reqwest::Url;

use crate::error::SearchError;


pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_SERVICE: &str = "es";
pub const DEFAULT_INDEX: &str = "bases";

/// Where the search domain lives and how requests to it are signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub region: String,
    pub service_name: String,
    /// Domain endpoint including the scheme, e.g. `https://search-foo.us-east-1.es.amazonaws.com`.
    pub host: String,
    pub index: String,
    /// Client-wide request timeout. Unset on the serverless platform, which enforces its own budget.
    pub timeout_secs: Option<u64>,
}

impl SearchConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            service_name: DEFAULT_SERVICE.to_string(),
            host: host.into(),
            index: DEFAULT_INDEX.to_string(),
            timeout_secs: None,
        }
    }

    /// Reads `SEARCH_*` variables, loading a `.env` file first if one exists.
    pub fn from_env() -> Result<Self, SearchError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, SearchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = get("SEARCH_HOST")
            .ok_or_else(|| SearchError::Config("SEARCH_HOST is not set".to_string()))?;

        let timeout_secs = match get("SEARCH_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                SearchError::Config(format!("SEARCH_TIMEOUT_SECS is not a number: {raw}"))
            })?),
            None => None,
        };

        Ok(Self {
            region: get("SEARCH_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            service_name: get("SEARCH_SERVICE").unwrap_or_else(|| DEFAULT_SERVICE.to_string()),
            host,
            index: get("SEARCH_INDEX").unwrap_or_else(|| DEFAULT_INDEX.to_string()),
            timeout_secs,
        })
    }

    /// `{host}/{index}/_search`
    pub fn endpoint(&self) -> Result<Url, SearchError> {
        let raw = format!("{}/{}/_search", self.host.trim_end_matches('/'), self.index);
        Url::parse(&raw).map_err(|e| SearchError::Config(format!("invalid search endpoint {raw}: {e}")))
    }
}
