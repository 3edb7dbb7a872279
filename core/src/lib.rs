pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod handler;
pub mod params;
pub mod query;
pub mod response;
pub mod signing;

pub use client::{SearchClient, UpstreamResponse};
pub use config::SearchConfig;
pub use credentials::{Credentials, CredentialsProvider, EnvCredentialsProvider, StaticCredentialsProvider};
pub use error::{ErrorKind, SearchError};
pub use handler::SearchHandler;
pub use params::SearchParams;
pub use query::{build_query, SearchQuery};
pub use response::ResponseEnvelope;
