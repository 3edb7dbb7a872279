use std::env;
use std::fmt;

use crate::error::SearchError;


pub const ACCESS_KEY_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .finish()
    }
}


/// Source of signing credentials, asked once per request.
pub trait CredentialsProvider: Send + Sync {
    fn credentials(&self) -> Result<Credentials, SearchError>;
}

/// Reads the standard AWS variables on every call, so rotated session
/// credentials are picked up without a restart.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentialsProvider;

impl CredentialsProvider for EnvCredentialsProvider {
    fn credentials(&self) -> Result<Credentials, SearchError> {
        credentials_from_lookup(|key| env::var(key).ok())
    }
}

fn credentials_from_lookup<F>(lookup: F) -> Result<Credentials, SearchError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

    let access_key_id = get(ACCESS_KEY_VAR)
        .ok_or_else(|| SearchError::Credentials(format!("{ACCESS_KEY_VAR} is not set")))?;
    let secret_access_key = get(SECRET_KEY_VAR)
        .ok_or_else(|| SearchError::Credentials(format!("{SECRET_KEY_VAR} is not set")))?;

    Ok(Credentials {
        access_key_id,
        secret_access_key,
        session_token: get(SESSION_TOKEN_VAR),
    })
}

#[derive(Debug, Clone)]
pub struct StaticCredentialsProvider {
    credentials: Credentials,
}

impl StaticCredentialsProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialsProvider for StaticCredentialsProvider {
    fn credentials(&self) -> Result<Credentials, SearchError> {
        Ok(self.credentials.clone())
    }
}


#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn reads_keys_and_optional_token() {
        let creds = credentials_from_lookup(lookup(&[
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
        ]))
        .unwrap();
        assert_eq!(creds, Credentials::new("AKID", "secret", None));

        let creds = credentials_from_lookup(lookup(&[
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("AWS_SESSION_TOKEN", "token"),
        ]))
        .unwrap();
        assert_eq!(creds.session_token.as_deref(), Some("token"));
    }

    #[test]
    fn missing_secret_is_a_credentials_error() {
        let err = credentials_from_lookup(lookup(&[("AWS_ACCESS_KEY_ID", "AKID")])).unwrap_err();
        assert!(matches!(err, SearchError::Credentials(_)));
    }

    #[test]
    fn empty_access_key_counts_as_missing() {
        let err = credentials_from_lookup(lookup(&[
            ("AWS_ACCESS_KEY_ID", ""),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
        ]))
        .unwrap_err();
        assert!(matches!(err, SearchError::Credentials(_)));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let creds = Credentials::new("AKID", "super-secret", Some("tok-123".to_string()));
        let printed = format!("{creds:?}");
        assert!(printed.contains("AKID"));
        assert!(!printed.contains("super-secret"));
        assert!(!printed.contains("tok-123"));
    }

    #[test]
    fn static_provider_hands_out_its_credentials() {
        let creds = Credentials::new("AKID", "secret", None);
        let provider = StaticCredentialsProvider::new(creds.clone());
        assert_eq!(provider.credentials().unwrap(), creds);
    }
}
