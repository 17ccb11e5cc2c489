/* src/addr.rs */

use std::net::IpAddr;

use crate::error::{AddrError, Error, Result};

/// Address family of a parsed IP.
///
/// An address belongs to [`Family::V4`] when it has a 4-byte form, which
/// includes IPv4-mapped IPv6 addresses such as `::ffff:192.0.2.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Determine the family of an already parsed address.
    pub fn of(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(v6) if v6.to_ipv4_mapped().is_some() => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }
}

/// Parse a bare IP literal. Ports, brackets, zones and whitespace are rejected.
pub fn parse_address(candidate: &str) -> Option<IpAddr> {
    candidate.parse().ok()
}

/// Check whether `candidate` is a syntactically valid IPv4 or IPv6 address.
///
/// # Examples
///
/// ```rust
/// use myip::is_valid_address;
///
/// assert!(is_valid_address("203.0.113.7"));
/// assert!(is_valid_address("2001:db8::1"));
/// assert!(!is_valid_address("256.1.1.1"));
/// assert!(!is_valid_address("[::1]:80"));
/// ```
pub fn is_valid_address(candidate: &str) -> bool {
    parse_address(candidate).is_some()
}

/// Split `host:port` into its parts.
///
/// IPv6 hosts must be bracketed (`[::1]:80`). The port itself is not
/// validated and may be empty.
pub fn split_host_port(hostport: &str) -> Result<(&str, &str)> {
    let invalid = |kind| Error::InvalidPeerAddr {
        addr: hostport.to_string(),
        kind,
    };

    // The port starts after the last colon.
    let Some(colon) = hostport.rfind(':') else {
        return Err(invalid(AddrError::MissingPort));
    };

    let (host, open_from, close_from) = if hostport.starts_with('[') {
        let Some(end) = hostport.find(']') else {
            return Err(invalid(AddrError::MissingBracket));
        };
        if end + 1 == hostport.len() {
            return Err(invalid(AddrError::MissingPort));
        }
        if end + 1 != colon {
            return Err(if hostport.as_bytes()[end + 1] == b':' {
                invalid(AddrError::TooManyColons)
            } else {
                invalid(AddrError::MissingPort)
            });
        }
        (&hostport[1..end], 1, end + 1)
    } else {
        let host = &hostport[..colon];
        if host.contains(':') {
            return Err(invalid(AddrError::TooManyColons));
        }
        (host, 0, 0)
    };

    if hostport[open_from..].contains('[') {
        return Err(invalid(AddrError::UnexpectedOpenBracket));
    }
    if hostport[close_from..].contains(']') {
        return Err(invalid(AddrError::UnexpectedCloseBracket));
    }

    Ok((host, &hostport[colon + 1..]))
}

/// Host part of a peer address, or the raw string when it cannot be split.
pub(crate) fn peer_host(peer_addr: &str) -> &str {
    match split_host_port(peer_addr) {
        Ok((host, _)) => host,
        Err(_) => peer_addr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        for ip in ["192.168.1.1", "10.0.0.1", "203.0.113.1", "::1", "2001:db8::1", "::ffff:1.2.3.4"] {
            assert!(is_valid_address(ip), "{ip} should be valid");
        }
    }

    #[test]
    fn test_invalid_addresses() {
        for ip in [
            "",
            "invalid",
            "192.168.1",
            "192.168.1.1.1",
            "256.1.1.1",
            " 192.168.1.1",
            "192.168.1.1:80",
            "[::1]",
            "fe80::1%eth0",
        ] {
            assert!(!is_valid_address(ip), "{ip:?} should be invalid");
        }
    }

    #[test]
    fn test_family_of_mapped_address_is_v4() {
        let ip = parse_address("::ffff:203.0.113.1").unwrap();
        assert_eq!(Family::of(&ip), Family::V4);
        assert_eq!(Family::of(&"2001:db8::1".parse().unwrap()), Family::V6);
        assert_eq!(Family::of(&"203.0.113.1".parse().unwrap()), Family::V4);
    }

    #[test]
    fn test_split_host_port() {
        assert_eq!(split_host_port("203.0.113.1:12345").unwrap(), ("203.0.113.1", "12345"));
        assert_eq!(split_host_port("[2001:db8::1]:443").unwrap(), ("2001:db8::1", "443"));
        assert_eq!(split_host_port("localhost:").unwrap(), ("localhost", ""));
        assert_eq!(split_host_port(":80").unwrap(), ("", "80"));
    }

    #[test]
    fn test_split_host_port_failures() {
        let kind = |s: &str| match split_host_port(s) {
            Err(Error::InvalidPeerAddr { kind, .. }) => Some(kind),
            _ => None,
        };

        assert_eq!(kind(""), Some(AddrError::MissingPort));
        assert_eq!(kind("malformed-addr"), Some(AddrError::MissingPort));
        assert_eq!(kind("2001:db8::1"), Some(AddrError::TooManyColons));
        assert_eq!(kind("[2001:db8::1]"), Some(AddrError::MissingPort));
        assert_eq!(kind("[::1]x:80"), Some(AddrError::MissingPort));
        assert_eq!(kind("[::1]:80:90"), Some(AddrError::TooManyColons));
        assert_eq!(kind("[::1:80"), Some(AddrError::MissingBracket));
        assert_eq!(kind("a[b:80"), Some(AddrError::UnexpectedOpenBracket));
        assert_eq!(kind("ab]:80"), Some(AddrError::UnexpectedCloseBracket));
    }

    #[test]
    fn test_peer_host_falls_back_to_raw() {
        assert_eq!(peer_host("192.168.1.1:8080"), "192.168.1.1");
        assert_eq!(peer_host("192.168.1.1"), "192.168.1.1");
        assert_eq!(peer_host("malformed-addr"), "malformed-addr");
        assert_eq!(peer_host(""), "");
    }
}
