/* src/lib.rs */
//! # myip
//!
//! Detects the real client IP address of an HTTP request from proxy and CDN
//! forwarding headers, with a fallback to the remote socket address, and
//! classifies it.
//!
//! ## Features
//!
//! - Fixed header precedence: `CF-Connecting-IP`, `True-Client-IP`,
//!   `X-Real-IP`, `X-Forwarded-For`, `X-Client-IP`, `X-Cluster-Client-IP`,
//!   `X-Forwarded`, `Forwarded-For`, `Forwarded`
//! - IPv4-only and IPv6-only lookups
//! - Private range classification (RFC 1918, 3927, 5735, 4193, 4291)
//! - Cloudflare detection
//! - Optional Axum middleware and extractor via the `axum` feature
//! - The complete HTTP service and `myip` binary via the `server` feature
//!
//! None of the detection functions fail. Malformed input yields an empty
//! string, `false`, or the raw peer address.
//!
//! ## Examples
//!
//! ```rust
//! use myip::{RequestContext, extract_client_ip, find_ipv6, is_private};
//!
//! let ctx = RequestContext::new("[2001:db8::1]:443")
//!     .with_header("X-Forwarded-For", "198.51.100.7, 10.0.0.1");
//!
//! let (ip, via) = extract_client_ip(&ctx);
//! assert_eq!(ip, "198.51.100.7");
//! assert_eq!(via, "X-Forwarded-For");
//! assert!(!is_private(&ip));
//! assert_eq!(find_ipv6(&ctx), "2001:db8::1");
//! ```

pub mod addr;
pub mod context;
pub mod error;
pub mod extractor;
pub mod info;
pub mod ranges;

#[cfg(feature = "axum")]
pub mod middleware;

#[cfg(feature = "server")]
pub mod server;

pub use addr::{Family, is_valid_address, split_host_port};
pub use context::RequestContext;
pub use error::{AddrError, Error, Result};
pub use extractor::{
    CLOUDFLARE_HEADERS, HEADER_PRIORITY, REMOTE_ADDR, extract_client_ip, find_ipv4, find_ipv6,
    is_cloudflare_request, remove_duplicates,
};
pub use info::{HealthResponse, IpInfo, get_info};
pub use ranges::is_private;

#[cfg(feature = "axum")]
pub use middleware::{ClientContextLayer, ClientContextService};
