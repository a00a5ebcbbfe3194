//! Asset reference normalization.
//!
//! While editing, assets are absolute URLs the browser can fetch. Persisted
//! layouts store paths relative to the backend storage root so that they
//! survive host changes.

use url::Url;

/// True for literal placeholder tokens such as `{{signature}}`.
pub fn is_placeholder_token(reference: &str) -> bool {
    let trimmed = reference.trim();
    trimmed.starts_with("{{") && trimmed.ends_with("}}")
}

/// Repair an absolute URL whose host runs straight into the storage path
/// (`http://host:8000storage/a.png`). Returns the canonical relative path,
/// or `None` when the URL does not have this defect.
pub fn repair_malformed(reference: &str, storage_prefix: &str) -> Option<String> {
    if storage_prefix.is_empty() {
        return None;
    }
    let (_, after_scheme) = reference.split_once("://")?;
    let index = after_scheme.find(storage_prefix)?;
    if index == 0 || after_scheme[..index].contains('/') {
        return None;
    }
    let rest = &after_scheme[index + storage_prefix.len()..];
    Some(format!("{}{}", storage_prefix, rest))
}

/// Reduce an asset reference to a storage-relative path.
///
/// Placeholder tokens and `data:` URLs are kept as they are. URLs on the
/// backend origin lose the origin; URLs on other hosts keep their path,
/// query and fragment.
pub fn to_storage_path(reference: &str, backend_origin: Option<&str>, storage_prefix: &str) -> String {
    let reference = reference.trim();
    if reference.is_empty() || is_placeholder_token(reference) || reference.starts_with("data:") {
        return reference.to_string();
    }

    if let Some(repaired) = repair_malformed(reference, storage_prefix) {
        log::warn!("Repaired malformed asset URL '{}' -> '{}'", reference, repaired);
        return repaired;
    }

    if let Some(origin) = backend_origin.map(|o| o.trim_end_matches('/')) {
        if let Some(rest) = reference.strip_prefix(origin) {
            if rest.is_empty() || rest.starts_with(['/', '?', '#']) {
                return rest.trim_start_matches('/').to_string();
            }
        }
    }

    match Url::parse(reference) {
        Ok(url) if url.has_host() => {
            let mut path = url.path().trim_start_matches('/').to_string();
            if let Some(query) = url.query() {
                path.push('?');
                path.push_str(query);
            }
            if let Some(fragment) = url.fragment() {
                path.push('#');
                path.push_str(fragment);
            }
            path
        }
        _ => reference.trim_start_matches('/').to_string(),
    }
}

/// Turn a persisted storage path back into a URL the editor can load.
pub fn to_absolute_url(path: &str, backend_origin: Option<&str>) -> String {
    let path = path.trim();
    if path.is_empty() || is_placeholder_token(path) || path.starts_with("data:") {
        return path.to_string();
    }
    if Url::parse(path).is_ok_and(|url| url.has_host()) {
        return path.to_string();
    }
    match backend_origin {
        Some(origin) => format!(
            "{}/{}",
            origin.trim_end_matches('/'),
            path.trim_start_matches('/')
        ),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Option<&str> = Some("https://api.example.com");

    #[test]
    fn test_known_origin_is_stripped() {
        assert_eq!(
            to_storage_path("https://api.example.com/storage/bg/a.png", ORIGIN, "storage/"),
            "storage/bg/a.png"
        );
        assert_eq!(
            to_storage_path("https://api.example.com/", ORIGIN, "storage/"),
            ""
        );
    }

    #[test]
    fn test_unknown_origin_keeps_path_query_fragment() {
        assert_eq!(
            to_storage_path("https://cdn.other.net/storage/x.png?v=2#top", ORIGIN, "storage/"),
            "storage/x.png?v=2#top"
        );
        assert_eq!(
            to_storage_path("https://api.example.com.evil.net/a.png", ORIGIN, "storage/"),
            "a.png"
        );
    }

    #[test]
    fn test_malformed_url_is_repaired() {
        assert_eq!(
            repair_malformed("http://localhost:8000storage/signatures/s.png", "storage/"),
            Some("storage/signatures/s.png".to_string())
        );
        assert_eq!(
            to_storage_path("http://localhost:8000storage/signatures/s.png", ORIGIN, "storage/"),
            "storage/signatures/s.png"
        );
        assert_eq!(repair_malformed("http://localhost:8000/storage/s.png", "storage/"), None);
        assert_eq!(repair_malformed("storage/s.png", "storage/"), None);
    }

    #[test]
    fn test_tokens_and_relative_paths() {
        assert_eq!(to_storage_path("{{signature}}", ORIGIN, "storage/"), "{{signature}}");
        assert_eq!(to_storage_path("/storage/a.png", ORIGIN, "storage/"), "storage/a.png");
        assert_eq!(to_storage_path("storage/a.png", None, "storage/"), "storage/a.png");
    }

    #[test]
    fn test_absolute_url_on_load() {
        assert_eq!(
            to_absolute_url("storage/a.png", Some("https://api.example.com/")),
            "https://api.example.com/storage/a.png"
        );
        assert_eq!(to_absolute_url("storage/a.png", None), "storage/a.png");
        assert_eq!(
            to_absolute_url("https://cdn.other.net/a.png", ORIGIN),
            "https://cdn.other.net/a.png"
        );
        assert_eq!(to_absolute_url("{{signature}}", ORIGIN), "{{signature}}");
    }
}
