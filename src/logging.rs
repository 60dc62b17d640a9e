//! Middleware for logging requests and responses.

use axum::{
    extract::Request, http::header::CONTENT_TYPE, middleware::Next, response::Response,
};

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the response body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (headers, body_text) = extract_header_and_body_text_from_request(request).await;

    let is_json = headers
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if is_json {
        let display_text = redact_field(&body_text, "password");
        let display_text = redact_field(&display_text, "newPassword");
        log_request(&headers, &display_text);
    } else {
        log_request(&headers, &body_text);
    }

    let request = Request::from_parts(headers, body_text.into());
    let response = next.run(request).await;

    let (headers, body_text) = extract_header_and_body_text_from_response(response).await;
    log_response(&headers, &body_text);

    Response::from_parts(headers, body_text.into())
}

/// Replace the string value of `field_name` in a JSON body with asterisks.
///
/// Works on the raw text rather than parsing the body, so a malformed body
/// is logged untouched instead of failing the request.
fn redact_field(body_text: &str, field_name: &str) -> String {
    let field_marker = format!("\"{field_name}\"");

    let Some(marker_position) = body_text.find(&field_marker) else {
        return body_text.to_string();
    };

    let value_search_start = marker_position + field_marker.len();
    let Some(opening_quote) = body_text[value_search_start..]
        .find('"')
        .map(|position| value_search_start + position)
    else {
        return body_text.to_string();
    };

    let Some(closing_quote) = body_text[opening_quote + 1..]
        .find('"')
        .map(|position| opening_quote + 1 + position)
    else {
        return body_text.to_string();
    };

    format!(
        "{}********{}",
        &body_text[..opening_quote + 1],
        &body_text[closing_quote..]
    )
}

async fn extract_header_and_body_text_from_request(
    request: Request,
) -> (axum::http::request::Parts, String) {
    let (headers, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (headers, String::from_utf8_lossy(&body_bytes).to_string())
}

async fn extract_header_and_body_text_from_response(
    response: Response,
) -> (axum::http::response::Parts, String) {
    let (headers, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (headers, String::from_utf8_lossy(&body_bytes).to_string())
}

/// How many bytes of a body are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

fn log_request(headers: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {headers:#?}\nbody: {:}...",
            &body[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {headers:#?}\nbody: {body:?}");
    }
}

fn log_response(headers: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {headers:#?}\nbody: {:}...",
            &body[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {headers:#?}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod redact_tests {
    use super::redact_field;

    #[test]
    fn redacts_password_value() {
        let body = r#"{"email":"a@b.c","password":"hunter2"}"#;

        let redacted = redact_field(body, "password");

        assert_eq!(redacted, r#"{"email":"a@b.c","password":"********"}"#);
    }

    #[test]
    fn leaves_body_without_field_untouched() {
        let body = r#"{"email":"a@b.c"}"#;

        let redacted = redact_field(body, "password");

        assert_eq!(redacted, body);
    }

    #[test]
    fn leaves_malformed_body_untouched() {
        let body = r#"{"password":"#;

        let redacted = redact_field(body, "password");

        assert_eq!(redacted, body);
    }
}
