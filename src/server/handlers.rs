/* src/server/handlers.rs */

use axum::extract::Query;
use axum::http::header::{CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use axum::http::{Method, StatusCode, Uri, Version};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::TRACING_TARGET_HANDLER;
use super::format::{ResponseFormat, sanitize_callback};
use crate::context::RequestContext;
use crate::extractor::{find_ipv4, find_ipv6};
use crate::info::{HealthResponse, IpInfo, get_info};

/// Query string as ordered pairs, so the first occurrence of a key wins.
type QueryPairs = Vec<(String, String)>;

#[derive(Serialize)]
struct AddressBody<'a> {
    ip: &'a str,
}

fn query_param<'a>(params: &'a QueryPairs, key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        [(X_CONTENT_TYPE_OPTIONS, "nosniff")],
        format!("{message}\n"),
    )
        .into_response()
}

fn encoding_failure(err: serde_json::Error) -> Response {
    tracing::error!(
        target: TRACING_TARGET_HANDLER,
        error = %err,
        "failed to encode response"
    );
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to encode JSON response\n",
    )
        .into_response()
}

/// Serialize `value` as a single JSON line.
fn json_line<T: Serialize>(value: &T) -> Response {
    match serde_json::to_string(value) {
        Ok(body) => ([(CONTENT_TYPE, "application/json")], body + "\n").into_response(),
        Err(err) => encoding_failure(err),
    }
}

/// Render a single address in the representation the query asks for.
///
/// `callback` is only honored together with `format=jsonp`.
fn address_response(ip: &str, params: &QueryPairs) -> Response {
    let format = ResponseFormat::from_query(query_param(params, "format"));

    match format {
        ResponseFormat::Plain => ([(CONTENT_TYPE, "text/plain")], ip.to_string()).into_response(),
        ResponseFormat::Json => json_line(&AddressBody { ip }),
        ResponseFormat::Jsonp => match serde_json::to_string(&AddressBody { ip }) {
            Ok(body) => {
                let callback = sanitize_callback(query_param(params, "callback"));
                (
                    [(CONTENT_TYPE, "application/javascript")],
                    format!("{callback}({body});"),
                )
                    .into_response()
            }
            Err(err) => encoding_failure(err),
        },
    }
}

/// `GET /`: the client's IPv4 address.
pub async fn ipv4(ctx: RequestContext, Query(params): Query<QueryPairs>) -> Response {
    match find_ipv4(&ctx) {
        ip if ip.is_empty() => not_found("No IPv4 address found"),
        ip => address_response(&ip, &params),
    }
}

/// `GET /ipv6`: the client's IPv6 address.
pub async fn ipv6(ctx: RequestContext, Query(params): Query<QueryPairs>) -> Response {
    match find_ipv6(&ctx) {
        ip if ip.is_empty() => not_found("No IPv6 address found"),
        ip => address_response(&ip, &params),
    }
}

fn render_info(info: &IpInfo) -> String {
    let mut out = format!(
        "Your IP Address: {}\nDetection Method: {}\nIs Private IP: {}\nBehind Cloudflare: {}\n",
        info.client_ip, info.detected_via, info.is_private_ip, info.is_cloudflare,
    );
    if !info.ipv4_address.is_empty() {
        out.push_str(&format!("IPv4 Address: {}\n", info.ipv4_address));
    }
    if !info.ipv6_address.is_empty() {
        out.push_str(&format!("IPv6 Address: {}\n", info.ipv6_address));
    }
    out.push_str(&format!("Timestamp: {}\n", info.timestamp));
    out
}

/// `GET /info`: detection details as plain text.
pub async fn info(ctx: RequestContext) -> Response {
    let info = get_info(&ctx);
    ([(CONTENT_TYPE, "text/plain")], render_info(&info)).into_response()
}

/// `GET /json`: detection details as JSON.
pub async fn json(ctx: RequestContext) -> Response {
    json_line(&get_info(&ctx))
}

/// `GET /headers`: everything the detector saw, for debugging proxies.
pub async fn headers(ctx: RequestContext, method: Method, uri: Uri, version: Version) -> Response {
    let info = get_info(&ctx);

    let mut out = String::from("=== IP INFORMATION ===\n");
    out.push_str(&format!("Client IP: {}\n", info.client_ip));
    out.push_str(&format!("Detection Method: {}\n", info.detected_via));
    out.push_str(&format!("IPv4 Address: {}\n", info.ipv4_address));
    out.push_str(&format!("IPv6 Address: {}\n", info.ipv6_address));
    out.push_str(&format!("Is Private IP: {}\n", info.is_private_ip));
    out.push_str(&format!("Behind Cloudflare: {}\n", info.is_cloudflare));
    out.push_str(&format!("Timestamp: {}\n", info.timestamp));

    // Host is reported with the connection, not as a header.
    out.push_str("\n=== HTTP HEADERS ===\n");
    for (name, value) in ctx.headers().filter(|(name, _)| !name.eq_ignore_ascii_case("host")) {
        out.push_str(&format!("{name}: {value}\n"));
    }

    out.push_str("\n=== CONNECTION INFO ===\n");
    out.push_str(&format!("Remote Address: {}\n", ctx.peer_addr()));
    out.push_str(&format!("Method: {method}\n"));
    out.push_str(&format!("URL: {uri}\n"));
    out.push_str(&format!("Protocol: {version:?}\n"));

    ([(CONTENT_TYPE, "text/plain")], out).into_response()
}

/// `GET /health`: liveness probe.
pub async fn health() -> Response {
    json_line(&HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> QueryPairs {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_query_param_first_occurrence_wins() {
        let params = pairs(&[("format", "json"), ("format", "jsonp")]);
        assert_eq!(query_param(&params, "format"), Some("json"));
        assert_eq!(query_param(&params, "callback"), None);
    }

    #[test]
    fn test_render_info_omits_empty_families() {
        let info = IpInfo {
            client_ip: "203.0.113.1".to_string(),
            detected_via: "X-Real-IP".to_string(),
            ipv4_address: "203.0.113.1".to_string(),
            ipv6_address: String::new(),
            is_private_ip: false,
            is_cloudflare: false,
            user_agent: String::new(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
        };

        assert_eq!(
            render_info(&info),
            "Your IP Address: 203.0.113.1\n\
             Detection Method: X-Real-IP\n\
             Is Private IP: false\n\
             Behind Cloudflare: false\n\
             IPv4 Address: 203.0.113.1\n\
             Timestamp: 2024-01-01T00:00:00Z\n"
        );
    }
}
