/* src/context.rs */

/// Everything the detector needs to know about a request.
///
/// Holds the headers in the order they were received (names may repeat) and
/// the raw peer address exactly as the transport reported it, for example
/// `203.0.113.1:51234` or `[2001:db8::1]:443`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    headers: Vec<(String, String)>,
    peer_addr: String,
}

impl RequestContext {
    /// Create a context with no headers.
    pub fn new(peer_addr: impl Into<String>) -> Self {
        Self {
            headers: Vec::new(),
            peer_addr: peer_addr.into(),
        }
    }

    /// Add a header, keeping any earlier values with the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_header(name, value);
        self
    }

    pub fn push_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// First value of the named header. Names compare ASCII case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// First value of the named header, treating an empty value as absent.
    pub(crate) fn non_empty_header(&self, name: &str) -> Option<&str> {
        self.header(name).filter(|value| !value.is_empty())
    }

    /// All headers in received order, repeats included.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// The `User-Agent` header, or an empty string.
    pub fn user_agent(&self) -> &str {
        self.header("User-Agent").unwrap_or_default()
    }
}

#[cfg(feature = "axum")]
impl RequestContext {
    /// Build a context from an HTTP header map.
    ///
    /// Header values that are not visible ASCII are decoded lossily instead of
    /// being dropped, so the debug output still shows them.
    pub fn from_http(headers: &axum::http::HeaderMap, peer_addr: impl Into<String>) -> Self {
        let headers = headers
            .iter()
            .map(|(name, value)| {
                let value = match value.to_str() {
                    Ok(value) => value.to_string(),
                    Err(_) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
                };
                (name.as_str().to_string(), value)
            })
            .collect();

        Self {
            headers,
            peer_addr: peer_addr.into(),
        }
    }
}
