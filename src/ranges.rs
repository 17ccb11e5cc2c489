/* src/ranges.rs */

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::sync::LazyLock;

use ipnet::{Ipv4Net, Ipv6Net};

use crate::addr::parse_address;
use crate::error::{Error, Result};

/// Private and reserved IPv4 blocks.
pub const PRIVATE_IPV4_CIDRS: [&str; 5] = [
    // RFC 1918
    "10.0.0.0/8",
    "172.16.0.0/12",
    "192.168.0.0/16",
    // RFC 3927 link-local
    "169.254.0.0/16",
    // RFC 5735 loopback
    "127.0.0.0/8",
];

/// Private and reserved IPv6 blocks.
pub const PRIVATE_IPV6_CIDRS: [&str; 3] = [
    // RFC 4193 unique local
    "fc00::/7",
    // RFC 4291 link-local
    "fe80::/10",
    // RFC 4291 loopback
    "::1/128",
];

static PRIVATE_RANGES: LazyLock<PrivateRanges> = LazyLock::new(|| {
    PrivateRanges::from_literals(&PRIVATE_IPV4_CIDRS, &PRIVATE_IPV6_CIDRS)
        .unwrap_or_else(|err| panic!("private range table is malformed: {err}"))
});

/// Per-family tables of networks considered private.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateRanges {
    v4: Vec<Ipv4Net>,
    v6: Vec<Ipv6Net>,
}

impl PrivateRanges {
    /// Parse both tables from CIDR literals.
    pub fn from_literals(v4: &[&str], v6: &[&str]) -> Result<Self> {
        Ok(Self {
            v4: parse_table(v4)?,
            v6: parse_table(v6)?,
        })
    }

    /// Test `ip` against the table of its family.
    ///
    /// IPv4-mapped IPv6 addresses are checked against the IPv4 table.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match ip {
            IpAddr::V4(v4) => self.contains_v4(v4),
            IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
                Some(v4) => self.contains_v4(&v4),
                None => self.v6.iter().any(|net| net.contains(v6)),
            },
        }
    }

    fn contains_v4(&self, ip: &Ipv4Addr) -> bool {
        self.v4.iter().any(|net| net.contains(ip))
    }
}

fn parse_table<N>(literals: &[&str]) -> Result<Vec<N>>
where
    N: FromStr,
    N::Err: Display,
{
    literals
        .iter()
        .map(|literal| {
            literal.parse::<N>().map_err(|err| Error::InvalidCidr {
                cidr: literal.to_string(),
                reason: err.to_string(),
            })
        })
        .collect()
}

/// The process-wide private range tables, built on first use.
pub fn private_ranges() -> &'static PrivateRanges {
    &PRIVATE_RANGES
}

/// Build the private range tables now rather than on the first request.
///
/// Panics if one of the hard-coded CIDR literals is malformed.
pub fn init() {
    LazyLock::force(&PRIVATE_RANGES);
}

/// Check whether `ip` falls in a private or reserved range.
///
/// Empty or unparsable input is not private.
///
/// # Examples
///
/// ```rust
/// use myip::is_private;
///
/// assert!(is_private("172.31.255.255"));
/// assert!(!is_private("172.32.0.0"));
/// assert!(is_private("fe80::1"));
/// assert!(!is_private("not-an-ip"));
/// ```
pub fn is_private(ip: &str) -> bool {
    match parse_address(ip) {
        Some(ip) => private_ranges().contains(&ip),
        None => false,
    }
}
