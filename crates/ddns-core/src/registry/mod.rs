//! Built-in provider registry
//!
//! The set of providers is closed: each provider is a [`ProviderKind`]
//! variant with a compiled-in [`ProviderDescriptor`]. Adding a provider means
//! adding a variant and a table row; the exhaustive `match` in
//! [`ProviderKind::descriptor`] makes a missing row a compile error.
//!
//! ## Usage
//!
//! ```rust
//! use ddns_core::registry::{self, ProviderKind};
//!
//! let provider = registry::lookup("duckdns").unwrap();
//! assert_eq!(provider.kind, ProviderKind::DuckDns);
//! assert_eq!(
//!     provider.update_url("foo.example.com", "TOKEN"),
//!     "https://www.duckdns.org/update?domains=foo.example.com&token=TOKEN&ip=",
//! );
//! ```

/// Template slot replaced by the entry domain
const DOMAIN_SLOT: &str = "{domain}";

/// Template slot replaced by the entry secret (token providers only)
const SECRET_SLOT: &str = "{secret}";

/// Supported DNS update services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Token in the query string, no auth header
    DuckDns,
    /// Domain in the query string, credential in an `Authorization` header
    NoIp,
}

impl ProviderKind {
    /// Every registered provider
    pub const ALL: [ProviderKind; 2] = [ProviderKind::DuckDns, ProviderKind::NoIp];

    /// Static descriptor for this provider
    pub fn descriptor(self) -> &'static ProviderDescriptor {
        match self {
            ProviderKind::DuckDns => &DUCKDNS,
            ProviderKind::NoIp => &NOIP,
        }
    }
}

/// Immutable description of one provider
#[derive(Debug, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Registry key
    pub kind: ProviderKind,

    /// Identifier as written in the configuration file
    pub identifier: &'static str,

    /// Update URL with `{domain}` and optional `{secret}` slots
    pub url_template: &'static str,

    /// Whether the secret travels in an `Authorization: Basic` header
    pub basic_auth: bool,
}

static DUCKDNS: ProviderDescriptor = ProviderDescriptor {
    kind: ProviderKind::DuckDns,
    identifier: "duckdns",
    url_template: "https://www.duckdns.org/update?domains={domain}&token={secret}&ip=",
    basic_auth: false,
};

static NOIP: ProviderDescriptor = ProviderDescriptor {
    kind: ProviderKind::NoIp,
    identifier: "noip",
    url_template: "https://dynupdate.no-ip.com/nic/update?hostname={domain}&myip=",
    basic_auth: true,
};

impl ProviderDescriptor {
    /// Build the update URL for an entry
    ///
    /// The domain is always substituted. The secret is substituted only for
    /// providers that do not use Basic-Auth. Values are inserted verbatim.
    pub fn update_url(&self, domain: &str, secret: &str) -> String {
        let secret = if self.basic_auth { "" } else { secret };
        fill_slots(self.url_template, domain, secret)
    }
}

/// Resolve a provider by its exact, case-sensitive identifier
pub fn lookup(identifier: &str) -> Option<&'static ProviderDescriptor> {
    ProviderKind::ALL
        .into_iter()
        .map(|kind| kind.descriptor())
        .find(|descriptor| descriptor.identifier == identifier)
}

/// Identifiers of all registered providers, in table order
pub fn identifiers() -> impl Iterator<Item = &'static str> {
    ProviderKind::ALL.into_iter().map(|kind| kind.descriptor().identifier)
}

// Single left-to-right pass, so substituted values are never rescanned.
fn fill_slots(template: &str, domain: &str, secret: &str) -> String {
    let mut out = String::with_capacity(template.len() + domain.len() + secret.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        if let Some(after) = tail.strip_prefix(DOMAIN_SLOT) {
            out.push_str(domain);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(SECRET_SLOT) {
            out.push_str(secret);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_exact_match() {
        assert_eq!(lookup("duckdns").map(|p| p.kind), Some(ProviderKind::DuckDns));
        assert_eq!(lookup("noip").map(|p| p.kind), Some(ProviderKind::NoIp));
        assert!(lookup("DuckDNS").is_none());
        assert!(lookup("noip ").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_descriptor_table_is_consistent() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.descriptor().kind, kind);
            assert!(kind.descriptor().url_template.contains(DOMAIN_SLOT));
        }
        assert_eq!(identifiers().collect::<Vec<_>>(), ["duckdns", "noip"]);
    }

    #[test]
    fn test_basic_auth_url_omits_secret() {
        let url = ProviderKind::NoIp
            .descriptor()
            .update_url("bar.example.org", "YWxpY2U6czNjcmV0");
        assert_eq!(
            url,
            "https://dynupdate.no-ip.com/nic/update?hostname=bar.example.org&myip="
        );
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let url = ProviderKind::DuckDns
            .descriptor()
            .update_url("{secret}", "t");
        assert_eq!(
            url,
            "https://www.duckdns.org/update?domains={secret}&token=t&ip="
        );
    }
}
