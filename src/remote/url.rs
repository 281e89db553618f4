/// Turn a stored media reference into something fetchable.
///
/// - empty stays empty
/// - anything starting with `http` is already absolute
/// - `/uploads/...` is served by the upload service at `api_base`
/// - everything else (local paths, `data:` URLs) passes through
pub fn resolve_url(api_base: &str, reference: &str) -> String {
    if reference.is_empty() {
        return String::new();
    }
    if reference.starts_with("http") {
        return reference.to_string();
    }
    if reference.starts_with("/uploads/") {
        return format!("{}{reference}", api_base.trim_end_matches('/'));
    }
    reference.to_string()
}

/// Whether `url` must be fetched over HTTP(S).
pub fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
#[path = "../../tests/unit/remote/url.rs"]
mod tests;
