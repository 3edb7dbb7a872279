/// How a failure is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    UpstreamUnavailable,
}

impl ErrorKind {
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::UpstreamUnavailable => 502,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::UpstreamUnavailable => "upstream_unavailable",
        }
    }
}


#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("missing required query parameter `{0}`")]
    MissingParameter(&'static str),
    #[error("could not resolve credentials: {0}")]
    Credentials(String),
    #[error("could not sign request: {0}")]
    Signing(String),
    #[error("could not serialize query: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::MissingParameter(_) => ErrorKind::BadRequest,
            SearchError::Credentials(_)
            | SearchError::Signing(_)
            | SearchError::Serialize(_)
            | SearchError::Transport(_)
            | SearchError::Config(_) => ErrorKind::UpstreamUnavailable,
        }
    }
}
