use url::Url;

/// Accept either a raw resource key or the full resource URL Maximo returned
/// in an earlier `href`, and return the key.
pub fn id_from_id_or_url(id_or_url: &str) -> &str {
    let is_http = Url::parse(id_or_url)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !is_http {
        return id_or_url;
    }
    let path = id_or_url
        .split(['?', '#'])
        .next()
        .unwrap_or(id_or_url)
        .trim_end_matches('/');
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => id_or_url,
    }
}
