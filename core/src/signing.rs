//! AWS Signature Version 4 for the outbound search request.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::{Digest, Sha256};

use crate::credentials::Credentials;
use crate::error::SearchError;


type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

pub const AMZ_DATE: &str = "x-amz-date";
pub const AMZ_CONTENT_SHA256: &str = "x-amz-content-sha256";
pub const AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";
pub const AUTHORIZATION: &str = "authorization";

/// Where a signature is valid: one region and one service.
#[derive(Debug, Clone, Copy)]
pub struct SigningScope<'a> {
    pub region: &'a str,
    pub service: &'a str,
}

/// Computes the headers that authenticate `method url` with `body`.
///
/// `content-type` and `host` are signed but not returned; the caller sets
/// the former and the HTTP client derives the latter from `url`.
pub fn sign_request(
    credentials: &Credentials,
    scope: SigningScope<'_>,
    method: &str,
    url: &Url,
    content_type: &str,
    body: &[u8],
    now: DateTime<Utc>,
) -> Result<Vec<(&'static str, String)>, SearchError> {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();
    let payload_hash = sha256_hex(body);

    let mut headers = BTreeMap::new();
    headers.insert("content-type".to_string(), content_type.to_string());
    headers.insert("host".to_string(), host_header(url)?);
    headers.insert(AMZ_CONTENT_SHA256.to_string(), payload_hash.clone());
    headers.insert(AMZ_DATE.to_string(), amz_date.clone());
    if let Some(token) = &credentials.session_token {
        headers.insert(AMZ_SECURITY_TOKEN.to_string(), token.clone());
    }

    let canonical = canonical_request(
        method,
        &canonical_path(url),
        &canonical_query(url),
        &headers,
        &payload_hash,
    );
    let credential_scope = format!("{date}/{}/{}/aws4_request", scope.region, scope.service);
    let to_sign = string_to_sign(&amz_date, &credential_scope, &canonical);
    let key = signing_key(&credentials.secret_access_key, &date, scope.region, scope.service)?;
    let signature = hex::encode(hmac_sha256(&key, to_sign.as_bytes())?);

    let authorization = format!(
        "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={}, Signature={signature}",
        credentials.access_key_id,
        signed_header_names(&headers),
    );

    let mut signed = vec![
        (AMZ_DATE, amz_date),
        (AMZ_CONTENT_SHA256, payload_hash),
    ];
    if let Some(token) = &credentials.session_token {
        signed.push((AMZ_SECURITY_TOKEN, token.clone()));
    }
    signed.push((AUTHORIZATION, authorization));

    Ok(signed)
}

fn host_header(url: &Url) -> Result<String, SearchError> {
    let host = url
        .host_str()
        .ok_or_else(|| SearchError::Signing(format!("endpoint {url} has no host")))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Each segment is encoded twice, as SigV4 requires for every service but S3.
fn canonical_path(url: &Url) -> String {
    let Some(segments) = url.path_segments() else {
        return "/".to_string();
    };

    let encoded: Vec<String> = segments
        .map(|segment| {
            let raw = urlencoding::decode(segment)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| segment.to_string());
            uri_encode(&uri_encode(&raw))
        })
        .collect();

    format!("/{}", encoded.join("/"))
}

fn canonical_query(url: &Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (uri_encode(&k), uri_encode(&v)))
        .collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
fn uri_encode(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

fn signed_header_names(headers: &BTreeMap<String, String>) -> String {
    headers.keys().map(String::as_str).collect::<Vec<_>>().join(";")
}

/// Header names must already be lowercase; the map keeps them sorted.
fn canonical_request(
    method: &str,
    path: &str,
    query: &str,
    headers: &BTreeMap<String, String>,
    payload_hash: &str,
) -> String {
    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{}\n", value.trim()))
        .collect();

    format!(
        "{method}\n{path}\n{query}\n{canonical_headers}\n{}\n{payload_hash}",
        signed_header_names(headers)
    )
}

fn string_to_sign(amz_date: &str, credential_scope: &str, canonical_request: &str) -> String {
    format!(
        "{ALGORITHM}\n{amz_date}\n{credential_scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    )
}

fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Result<Vec<u8>, SearchError> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, SearchError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| SearchError::Signing(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
