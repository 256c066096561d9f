use crate::config::{CategoryConfig, ProviderConfig};

/// Lowercase host of a URL or origin string, scheme/path/port stripped.
/// Input with no recognizable host comes back lowercased as-is; this never
/// fails.
pub fn host_of(url: &str) -> String {
    let lower = url.trim().to_lowercase();

    let after_scheme = match lower.split_once("://") {
        Some((_, rest)) => rest,
        None => lower.as_str(),
    };

    let host = after_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(after_scheme);

    // Strip a port, but leave bare strings like "localhost:" alone only if
    // nothing precedes the colon.
    let host = match host.rsplit_once(':') {
        Some((name, port)) if !name.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };

    if host.is_empty() {
        return lower;
    }
    host.to_string()
}

/// Scheme + host, the `website` value stored with captured credentials.
pub fn origin_of(url: &str) -> String {
    let host = host_of(url);
    match url.split_once("://") {
        Some((scheme, _)) => format!("{}://{}", scheme.to_lowercase(), host),
        None => host,
    }
}

/// Whether a host belongs to the special-cased identity-provider family.
pub fn is_provider_host(host: &str, provider: &ProviderConfig) -> bool {
    provider.hosts.iter().any(|marker| host.contains(marker))
}

/// The credential lookup key for a URL. Provider hosts collapse to the
/// canonical domain so credentials saved under one subdomain match a login
/// form served from another.
pub fn normalize_domain(url: &str, provider: &ProviderConfig) -> String {
    let host = host_of(url);
    if is_provider_host(&host, provider) {
        provider.canonical_host.clone()
    } else {
        host
    }
}

/// Keyword-bucket category for a host, tagged onto captured credentials.
pub fn infer_category(host: &str, categories: &CategoryConfig) -> String {
    let lower = host.to_lowercase();

    let buckets = [
        ("bank", &categories.bank),
        ("social", &categories.social),
        ("work", &categories.work),
        ("health", &categories.health),
    ];

    for (label, keywords) in buckets {
        if keywords.iter().any(|k| lower.contains(k.as_str())) {
            return label.to_string();
        }
    }

    "other".to_string()
}
