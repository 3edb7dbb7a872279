use std::sync::Arc;

use lambda_http::http::header::{AUTHORIZATION, COOKIE};
use lambda_http::{run, service_fn, tracing, Body, Error, Request, RequestExt, Response};
use search_core::{EnvCredentialsProvider, ResponseEnvelope, SearchConfig, SearchHandler, SearchParams};


fn search_params(event: &Request) -> SearchParams {
    let query = event.query_string_parameters();

    SearchParams {
        q: query.first("q").map(str::to_owned),
        z: query.first("z").map(str::to_owned),
        l: query.first("l").map(str::to_owned),
    }
}

const REDACTED: &str = "** redacted **";

/// Request headers for logging, with credentials blanked out.
fn redacted_headers(event: &Request) -> Vec<(&str, &str)> {
    event
        .headers()
        .iter()
        .map(|(name, value)| {
            let value = if *name == AUTHORIZATION || *name == COOKIE {
                REDACTED
            } else {
                value.to_str().unwrap_or("<non-ascii>")
            };
            (name.as_str(), value)
        })
        .collect()
}

fn into_response(envelope: ResponseEnvelope) -> Result<Response<Body>, Error> {
    let mut builder = Response::builder().status(envelope.status_code);
    for (name, value) in &envelope.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    Ok(builder.body(Body::Text(envelope.body))?)
}

async fn function_handler(handler: &SearchHandler, event: Request) -> Result<Response<Body>, Error> {
    tracing::info!(
        method = %event.method(),
        uri = %event.uri(),
        query = ?event.query_string_parameters(),
        "incoming event"
    );
    tracing::debug!(
        headers = ?redacted_headers(&event),
        context = ?event.request_context_ref(),
        "incoming event detail"
    );

    let params = search_params(&event);
    let envelope = handler.handle(&params).await;

    into_response(envelope)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = SearchConfig::from_env()?;
    let handler = SearchHandler::new(&config, Arc::new(EnvCredentialsProvider))?;
    let handler = &handler;

    run(service_fn(move |event: Request| async move {
        function_handler(handler, event).await
    }))
    .await
}


#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use search_core::{SearchError, UpstreamResponse};

    use super::*;

    fn event_with(params: &[(&str, &str)]) -> Request {
        let map: HashMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Request::default().with_query_string_parameters(map)
    }

    #[test]
    fn reads_query_string_parameters() {
        let event = event_with(&[("q", "castle"), ("z", "alpha"), ("l", "3"), ("x", "ignored")]);
        assert_eq!(
            search_params(&event),
            SearchParams::new("castle").with_zone("alpha").with_level("3")
        );
    }

    #[test]
    fn absent_parameters_stay_absent() {
        let params = search_params(&event_with(&[]));
        assert_eq!(params, SearchParams::default());
    }

    #[test]
    fn logged_headers_hide_credentials() {
        let mut event = event_with(&[("q", "castle")]);
        let headers = event.headers_mut();
        headers.insert("authorization", "AWS4-HMAC-SHA256 Credential=AKID".parse().unwrap());
        headers.insert("cookie", "session=abc".parse().unwrap());
        headers.insert("user-agent", "curl/8.0".parse().unwrap());

        let logged = redacted_headers(&event);
        assert!(logged.contains(&("authorization", "** redacted **")));
        assert!(logged.contains(&("cookie", "** redacted **")));
        assert!(logged.contains(&("user-agent", "curl/8.0")));
        assert!(!logged.iter().any(|(_, value)| value.contains("AKID")));
    }

    #[test]
    fn envelope_becomes_a_text_response() {
        let envelope = ResponseEnvelope::from_upstream(UpstreamResponse {
            status: 200,
            body: r#"{"hits":{"total":0}}"#.to_string(),
        });
        let response = into_response(envelope).unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        match response.body() {
            Body::Text(text) => assert_eq!(text, r#"{"hits":{"total":0}}"#),
            other => panic!("expected a text body, got {other:?}"),
        }
    }

    #[test]
    fn error_envelope_keeps_its_status() {
        let envelope = ResponseEnvelope::from_error(&SearchError::MissingParameter("q"));
        let response = into_response(envelope).unwrap();

        assert_eq!(response.status(), 400);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
