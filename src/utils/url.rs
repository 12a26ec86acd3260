//! Joining endpoint paths onto the configured backend URL.

/// Strip trailing slashes so endpoints can be appended safely.
///
/// ```
/// use rex::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:5000/"), "http://localhost:5000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join `endpoint` onto `base_url` with exactly one slash between them.
///
/// ```
/// use rex::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:5000/", "/api/conversations"),
///     "http://localhost:5000/api/conversations"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://rex.example.com"),
            "https://rex.example.com"
        );
        assert_eq!(
            normalize_base_url("https://rex.example.com///"),
            "https://rex.example.com"
        );
        assert_eq!(normalize_base_url("  http://localhost:5000/ "), "http://localhost:5000");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn test_construct_api_url() {
        assert_eq!(
            construct_api_url("http://localhost:5000", "chat"),
            "http://localhost:5000/chat"
        );
        assert_eq!(
            construct_api_url("http://localhost:5000/", "/api/theamal/4/activate"),
            "http://localhost:5000/api/theamal/4/activate"
        );
        assert_eq!(
            construct_api_url("https://rex.example.com/prefix/", "///admin-login"),
            "https://rex.example.com/prefix/admin-login"
        );
    }
}
