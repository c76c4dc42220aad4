//! URL checks for configured endpoints.

use crate::core::constants::PLACEHOLDER_URL;

/// Validate an endpoint URL entered by the user.
///
/// Accepts `http://` and `https://` URLs with a host, and the `#`
/// placeholder. Surrounding whitespace is trimmed.
///
/// # Examples
///
/// ```
/// use bookchat::utils::url::validate_endpoint_url;
///
/// assert_eq!(
///     validate_endpoint_url(" https://qa.example/query/full "),
///     Ok("https://qa.example/query/full".to_string())
/// );
/// assert_eq!(validate_endpoint_url("#"), Ok("#".to_string()));
/// assert!(validate_endpoint_url("qa.example/query").is_err());
/// ```
pub fn validate_endpoint_url(url: &str) -> Result<String, String> {
    let trimmed = url.trim();
    if trimmed == PLACEHOLDER_URL {
        return Ok(trimmed.to_string());
    }

    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| format!("endpoint URL must start with http:// or https://: {trimmed}"))?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(format!("endpoint URL has no host: {trimmed}"));
    }

    Ok(trimmed.to_string())
}
