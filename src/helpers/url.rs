//! URL helper functions

/// Profile link for the bio navigation.
///
/// The handle is interpolated as configured, without percent-encoding.
pub fn github_profile_url(handle: &str) -> String {
    format!("https://github.com/{}", handle)
}

/// Join the site URL and a route path
///
/// # Examples
/// ```ignore
/// absolute_url("https://example.com/", "/about/") // -> "https://example.com/about/"
/// ```
pub fn absolute_url(site_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        site_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
