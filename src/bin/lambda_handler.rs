//! AWS Lambda handler for the pension preview endpoint
//!
//! Accepts a preview request as JSON and returns the projection summary and
//! timeline. Served through a Lambda Function URL.

use aws_lambda_events::event::lambda_function_urls::{
    LambdaFunctionUrlRequest, LambdaFunctionUrlResponse,
};
use aws_lambda_events::http::{HeaderMap, HeaderValue};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use pension_projection::{
    preview::{preview, ErrorBody, PreviewRequest, PREVIEW_PATH},
    PensionAssumptions, ProjectionConfig, ProjectionEngine,
};

fn headers(preflight: bool) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if !preflight {
        headers.insert("content-type", HeaderValue::from_static("application/json"));
    }
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert("access-control-allow-methods", HeaderValue::from_static("POST, OPTIONS"));
    headers.insert("access-control-allow-headers", HeaderValue::from_static("Content-Type"));
    headers
}

fn response(status: i64, body: Option<String>) -> LambdaFunctionUrlResponse {
    LambdaFunctionUrlResponse {
        status_code: status,
        headers: headers(body.is_none()),
        body,
        is_base64_encoded: false,
        cookies: Vec::new(),
    }
}

fn error_response(status: i64, body: &ErrorBody) -> LambdaFunctionUrlResponse {
    let text = serde_json::to_string(body)
        .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());
    response(status, Some(text))
}

fn message(status: i64, error: impl Into<String>) -> LambdaFunctionUrlResponse {
    error_response(status, &ErrorBody { error: error.into(), field: None })
}

/// Lambda handler function
async fn handler(
    event: LambdaEvent<LambdaFunctionUrlRequest>,
) -> Result<LambdaFunctionUrlResponse, Error> {
    let request = event.payload;
    let http = &request.request_context.http;
    let method = http.method.as_deref().unwrap_or("POST");
    let path = request
        .raw_path
        .as_deref()
        .or(http.path.as_deref())
        .unwrap_or(PREVIEW_PATH);

    // Handle CORS preflight
    if method.eq_ignore_ascii_case("OPTIONS") {
        return Ok(response(200, None));
    }
    if path != PREVIEW_PATH && path != "/" {
        return Ok(message(404, format!("no route for {path}")));
    }
    if !method.eq_ignore_ascii_case("POST") {
        return Ok(message(405, format!("method {method} not allowed")));
    }
    if request.is_base64_encoded {
        return Ok(message(400, "binary request bodies are not supported"));
    }

    let body = request.body.as_deref().unwrap_or("{}");
    let preview_request: PreviewRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return Ok(message(400, format!("Invalid JSON: {e}"))),
    };

    let engine =
        ProjectionEngine::new(PensionAssumptions::statutory(), ProjectionConfig::default());
    match preview(&engine, &preview_request) {
        Ok(preview_response) => {
            let text = serde_json::to_string(&preview_response)?;
            Ok(response(200, Some(text)))
        }
        Err(err) => {
            let status = if err.is_client_error() { 400 } else { 422 };
            log::info!("preview rejected ({status}): {err}");
            Ok(error_response(status, &ErrorBody::from(&err)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
