use std::sync::Arc;

use axum::{
    extract::Query,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use search_core::{EnvCredentialsProvider, ResponseEnvelope, SearchConfig, SearchHandler, SearchParams};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;


type GenericError = Box<dyn std::error::Error + Send + Sync + 'static>;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), GenericError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = SearchConfig::from_env()?;
    let handler = SearchHandler::new(&config, Arc::new(EnvCredentialsProvider))?;

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(handler)).await?;

    Ok(())
}

fn router(handler: SearchHandler) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/search", get(search))
        .layer(cors)
        .layer(Extension(handler))
}

async fn health() -> &'static str {
    "OK"
}

async fn search(
    Extension(handler): Extension<SearchHandler>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> EnvelopeResponse {
    let params = SearchParams::from_pairs(pairs);
    EnvelopeResponse(handler.handle(&params).await)
}


pub struct EnvelopeResponse(pub ResponseEnvelope);

impl IntoResponse for EnvelopeResponse {
    fn into_response(self) -> Response {
        let ResponseEnvelope { status_code, headers, body, .. } = self.0;
        let status = StatusCode::from_u16(status_code).unwrap_or(StatusCode::BAD_GATEWAY);

        let mut response = (status, body).into_response();
        for (name, value) in headers {
            match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => tracing::warn!("dropping unrepresentable response header"),
            }
        }

        response
    }
}


#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use search_core::{Credentials, StaticCredentialsProvider, UpstreamResponse};
    use tower::ServiceExt;

    use super::*;

    fn test_router() -> Router {
        let credentials = StaticCredentialsProvider::new(Credentials::new("AKID", "secret", None));
        // Nothing listens on port 1, so any request that gets past validation fails upstream.
        let handler = SearchHandler::new(&SearchConfig::new("http://127.0.0.1:1"), Arc::new(credentials)).unwrap();
        router(handler)
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let response = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn search_without_query_is_a_bad_request() {
        let response = test_router()
            .oneshot(Request::get("/search?z=alpha").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["content-type"], "application/json");
        assert!(body_text(response).await.contains("bad_request"));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_bad_gateway() {
        let response = test_router()
            .oneshot(Request::get("/search?q=castle").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(body_text(response).await.contains("upstream_unavailable"));
    }

    #[tokio::test]
    async fn envelope_status_and_body_are_kept() {
        let envelope = ResponseEnvelope::from_upstream(UpstreamResponse {
            status: 404,
            body: r#"{"error":"index_not_found_exception"}"#.to_string(),
        });
        let response = EnvelopeResponse(envelope).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(body_text(response).await, r#"{"error":"index_not_found_exception"}"#);
    }
}
