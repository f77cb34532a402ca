//! Client identity resolution.
//!
//! The identity decides which callers share a session cache bucket, so the
//! precedence is fixed: explicit header, then the body field, then the
//! address reported by a reverse proxy, then [`DEFAULT_CLIENT_ID`].

/// Identity used when nothing identifies the caller.
///
/// Every unidentified caller shares this one bucket.
pub const DEFAULT_CLIENT_ID: &str = "anonymous";

/// Raw identity candidates gathered from one inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityHints {
    /// Value of the `x-client-id` header.
    pub header: Option<String>,
    /// `client_id` / `clientId` from the request body.
    pub body: Option<String>,
    /// Raw `x-forwarded-for` header (comma-separated chain).
    pub forwarded_for: Option<String>,
    /// Raw `x-real-ip` header.
    pub real_ip: Option<String>,
}

impl IdentityHints {
    pub fn with_body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }

    /// Whether anything other than the default sentinel would be chosen.
    pub fn is_identified(&self) -> bool {
        self.resolve_explicit().is_some()
    }

    /// Pick the client id following the fixed precedence.
    pub fn resolve(&self) -> String {
        self.resolve_explicit()
            .unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string())
    }

    fn resolve_explicit(&self) -> Option<String> {
        non_blank(self.header.as_deref())
            .or_else(|| non_blank(self.body.as_deref()))
            .or_else(|| {
                self.forwarded_for
                    .as_deref()
                    .and_then(|chain| non_blank(chain.split(',').next()))
            })
            .or_else(|| non_blank(self.real_ip.as_deref()))
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
