use std::time::Duration;

use axum::{
    body::{Body, HttpBody},
    http::{header, HeaderMap, Request, Response},
};

use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{DefaultMakeSpan, TraceLayer},
};

use tracing::Span;

type LogRequest = fn(&Request<Body>, &Span);
type LogResponse = fn(&Response<Body>, Duration, &Span);

pub type RequestLogLayer =
    TraceLayer<SharedClassifier<ServerErrorsAsFailures>, DefaultMakeSpan, LogRequest, LogResponse>;

/// Access log for the router: one line as a request comes in, one as its response goes out
pub fn request_log() -> RequestLogLayer {
    TraceLayer::new_for_http()
        .on_request(log_request as LogRequest)
        .on_response(log_response as LogResponse)
}

/// `--> GET /api/accounts HTTP/1.1 "-" "curl/8.4.0"`
fn log_request(request: &Request<Body>, _span: &Span) {
    let headers = request.headers();

    log::info!(
        "--> {} {} {:?} \"{}\" \"{}\"",
        request.method(),
        request.uri(),
        request.version(),
        header_or_dash(headers, header::REFERER),
        header_or_dash(headers, header::USER_AGENT),
    );
}

/// `<-- 200 142 3ms`
fn log_response(response: &Response<Body>, latency: Duration, _span: &Span) {
    let size = match response.body().size_hint().exact() {
        Some(size) => size.to_string(),
        None => "-".to_string(),
    };

    log::info!(
        "<-- {} {size} {}ms",
        response.status().as_u16(),
        latency.as_millis()
    );
}

fn header_or_dash(headers: &HeaderMap, name: header::HeaderName) -> &str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
}
