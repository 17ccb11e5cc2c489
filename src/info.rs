/* src/info.rs */

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::context::RequestContext;
use crate::extractor::{extract_client_ip, find_ipv4, find_ipv6, is_cloudflare_request};
use crate::ranges::is_private;

/// Everything detected about the client of a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpInfo {
    pub client_ip: String,
    /// Header that supplied `client_ip`, or `RemoteAddr`.
    pub detected_via: String,
    /// Empty when no IPv4 address was found.
    pub ipv4_address: String,
    /// Empty when no IPv6 address was found.
    pub ipv6_address: String,
    pub is_private_ip: bool,
    pub is_cloudflare: bool,
    pub user_agent: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
}

/// Body of the health check endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            timestamp: now_rfc3339(),
        }
    }

    pub fn healthy() -> Self {
        Self::new("healthy")
    }
}

/// Current UTC time, e.g. `2024-05-01T12:30:00Z`.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Collect all detection results for a request.
///
/// Never fails: a context with no headers and a garbage peer address yields
/// the raw peer string as `client_ip` and empty family fields.
///
/// # Examples
///
/// ```rust
/// use myip::{RequestContext, get_info};
///
/// let ctx = RequestContext::new("[2001:db8::1]:443")
///     .with_header("CF-Connecting-IP", "203.0.113.1");
/// let info = get_info(&ctx);
///
/// assert_eq!(info.client_ip, "203.0.113.1");
/// assert_eq!(info.detected_via, "CF-Connecting-IP");
/// assert_eq!(info.ipv6_address, "2001:db8::1");
/// assert!(info.is_cloudflare);
/// ```
pub fn get_info(ctx: &RequestContext) -> IpInfo {
    let (client_ip, detected_via) = extract_client_ip(ctx);

    IpInfo {
        is_private_ip: is_private(&client_ip),
        detected_via: detected_via.to_string(),
        ipv4_address: find_ipv4(ctx),
        ipv6_address: find_ipv6(ctx),
        is_cloudflare: is_cloudflare_request(ctx),
        user_agent: ctx.user_agent().to_string(),
        timestamp: now_rfc3339(),
        client_ip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_get_info_from_headers() {
        let ctx = RequestContext::new("192.168.1.1:12345")
            .with_header("X-Forwarded-For", "203.0.113.1")
            .with_header("User-Agent", "test-agent/1.0");

        let info = get_info(&ctx);
        assert_eq!(info.client_ip, "203.0.113.1");
        assert_eq!(info.detected_via, "X-Forwarded-For");
        assert_eq!(info.ipv4_address, "203.0.113.1");
        assert_eq!(info.ipv6_address, "");
        assert!(!info.is_private_ip);
        assert!(!info.is_cloudflare);
        assert_eq!(info.user_agent, "test-agent/1.0");
    }

    #[test]
    fn test_get_info_private_remote_addr() {
        let info = get_info(&RequestContext::new("192.168.1.1:12345"));
        assert_eq!(info.client_ip, "192.168.1.1");
        assert_eq!(info.detected_via, "RemoteAddr");
        assert!(info.is_private_ip);
        assert_eq!(info.user_agent, "");
    }

    #[test]
    fn test_get_info_degenerate_context() {
        let info = get_info(&RequestContext::new("garbage"));
        assert_eq!(info.client_ip, "garbage");
        assert_eq!(info.detected_via, "RemoteAddr");
        assert_eq!(info.ipv4_address, "");
        assert_eq!(info.ipv6_address, "");
        assert!(!info.is_private_ip);
        assert!(!info.is_cloudflare);
    }

    #[test]
    fn test_timestamp_is_rfc3339_utc() {
        let info = get_info(&RequestContext::default());
        assert!(info.timestamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&info.timestamp).is_ok());

        let health = HealthResponse::healthy();
        assert_eq!(health.status, "healthy");
        assert!(DateTime::parse_from_rfc3339(&health.timestamp).is_ok());
    }
}
