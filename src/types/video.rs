//! YouTube video identifiers.

/// Extract the `v` query parameter from a watch URL.
///
/// Returns `None` when the URL carries no non-empty `v` parameter.
///
/// ```
/// # use quickgist::types::extract_video_id;
/// assert_eq!(
///     extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
///     Some("dQw4w9WgXcQ"),
/// );
/// assert_eq!(extract_video_id("https://www.youtube.com/feed/subscriptions"), None);
/// ```
pub fn extract_video_id(url: &str) -> Option<&str> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.strip_prefix("v="))
        .find(|id| !id.is_empty())
}

/// Accept either a bare video id or a watch URL.
pub fn normalize_video_id(input: &str) -> Option<&str> {
    let input = input.trim();
    if input.contains('?') {
        return extract_video_id(input);
    }
    (!input.is_empty()).then_some(input)
}
