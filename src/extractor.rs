/* src/extractor.rs */

use std::collections::HashSet;

use crate::addr::{Family, is_valid_address, parse_address, peer_host};
use crate::context::RequestContext;

/// Label reported when the address came from the connection, not a header.
pub const REMOTE_ADDR: &str = "RemoteAddr";

/// Headers checked for the client IP, in order of preference.
pub const HEADER_PRIORITY: [&str; 9] = [
    "CF-Connecting-IP",    // Cloudflare
    "True-Client-IP",      // Cloudflare Enterprise
    "X-Real-IP",           // nginx
    "X-Forwarded-For",     // de facto proxy standard
    "X-Client-IP",         // Apache mod_proxy_http
    "X-Cluster-Client-IP", // cluster load balancers
    "X-Forwarded",
    "Forwarded-For",
    "Forwarded",
];

/// Headers whose presence means the request passed through Cloudflare.
pub const CLOUDFLARE_HEADERS: [&str; 3] = ["CF-Connecting-IP", "CF-Ray", "True-Client-IP"];

/// Split a header value on commas and yield the trimmed, valid entries.
fn valid_candidates(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|candidate| is_valid_address(candidate))
}

/// Walk the priority headers and return the first candidate accepted by `accept`.
fn scan_headers<'a>(
    ctx: &'a RequestContext,
    mut accept: impl FnMut(&str) -> bool,
) -> Option<(&'a str, &'static str)> {
    HEADER_PRIORITY.iter().find_map(|&name| {
        let value = ctx.non_empty_header(name)?;
        valid_candidates(value)
            .find(|&candidate| accept(candidate))
            .map(|candidate| (candidate, name))
    })
}

/// Extract the client IP and the name of the header that supplied it.
///
/// The first valid entry of the highest-priority header wins. Without one,
/// the host part of the peer address is returned with [`REMOTE_ADDR`], even if
/// it is not a valid address; a peer address that cannot be split at all is
/// returned verbatim.
///
/// # Examples
///
/// ```rust
/// use myip::{RequestContext, extract_client_ip};
///
/// let ctx = RequestContext::new("10.0.0.2:51000")
///     .with_header("X-Forwarded-For", "invalid, 203.0.113.1, 192.168.1.1");
///
/// assert_eq!(extract_client_ip(&ctx), ("203.0.113.1".to_string(), "X-Forwarded-For"));
/// ```
pub fn extract_client_ip(ctx: &RequestContext) -> (String, &'static str) {
    if let Some((ip, header)) = scan_headers(ctx, |_| true) {
        tracing::trace!(ip, header, "client ip resolved from header");
        return (ip.to_string(), header);
    }

    let host = peer_host(ctx.peer_addr());
    tracing::trace!(ip = host, "client ip resolved from peer address");
    (host.to_string(), REMOTE_ADDR)
}

/// First address of the requested family, from headers or the peer address.
///
/// Returns an empty string when nothing matches.
fn find_by_family(ctx: &RequestContext, family: Family) -> String {
    let is_family = |candidate: &str| {
        parse_address(candidate).is_some_and(|ip| Family::of(&ip) == family)
    };

    if let Some((ip, _)) = scan_headers(ctx, is_family) {
        return ip.to_string();
    }

    let host = peer_host(ctx.peer_addr());
    if is_family(host) {
        return host.to_string();
    }

    String::new()
}

/// Find the first IPv4 address for the request, or an empty string.
///
/// IPv4-mapped IPv6 addresses count as IPv4.
pub fn find_ipv4(ctx: &RequestContext) -> String {
    find_by_family(ctx, Family::V4)
}

/// Find the first IPv6 address for the request, or an empty string.
pub fn find_ipv6(ctx: &RequestContext) -> String {
    find_by_family(ctx, Family::V6)
}

/// Check whether the request carries any Cloudflare header.
///
/// Only presence matters; the values are not validated.
pub fn is_cloudflare_request(ctx: &RequestContext) -> bool {
    CLOUDFLARE_HEADERS
        .iter()
        .any(|name| ctx.non_empty_header(name).is_some())
}

/// Remove repeated entries, keeping the first occurrence of each.
///
/// `None` stays `None` and an empty list stays empty.
pub fn remove_duplicates(list: Option<Vec<String>>) -> Option<Vec<String>> {
    let list = list?;
    let mut seen = HashSet::with_capacity(list.len());
    Some(
        list.into_iter()
            .filter(|item| seen.insert(item.clone()))
            .collect(),
    )
}
