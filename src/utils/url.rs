//! URL validation for video page links

use once_cell::sync::Lazy;
use regex::Regex;

/// Known URL shapes, tried in order. Each captures the 11-character video ID,
/// which must not run on into further ID characters.
const VIDEO_URL_PATTERNS: &[&str] = &[
    r"^https?://(?:www\.)?youtube\.com/watch\?v=([a-zA-Z0-9_-]{11})(?:[^a-zA-Z0-9_-]|$)",
    r"^https?://(?:www\.)?youtube\.com/v/([a-zA-Z0-9_-]{11})(?:[^a-zA-Z0-9_-]|$)",
    r"^https?://(?:www\.)?youtube\.com/embed/([a-zA-Z0-9_-]{11})(?:[^a-zA-Z0-9_-]|$)",
    r"^https?://(?:www\.)?youtube\.com/shorts/([a-zA-Z0-9_-]{11})(?:[^a-zA-Z0-9_-]|$)",
    r"^https?://youtu\.be/([a-zA-Z0-9_-]{11})(?:[^a-zA-Z0-9_-]|$)",
    r"^https?://(?:www\.)?youtube\.com/live/([a-zA-Z0-9_-]{11})(?:[^a-zA-Z0-9_-]|$)",
];

static VIDEO_URL_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    VIDEO_URL_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).expect("video URL pattern is valid"))
        .collect()
});

/// Check if the string is a supported video page URL
pub fn is_video_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }
    VIDEO_URL_REGEXES.iter().any(|re| re.is_match(url))
}

/// Extract the video ID from the first matching URL shape
pub fn extract_video_id(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    VIDEO_URL_REGEXES
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    fn all_shapes(id: &str) -> Vec<String> {
        let mut urls = Vec::new();
        for scheme in ["http", "https"] {
            for host in ["youtube.com", "www.youtube.com"] {
                urls.push(format!("{scheme}://{host}/watch?v={id}"));
                urls.push(format!("{scheme}://{host}/v/{id}"));
                urls.push(format!("{scheme}://{host}/embed/{id}"));
                urls.push(format!("{scheme}://{host}/shorts/{id}"));
                urls.push(format!("{scheme}://{host}/live/{id}"));
            }
            urls.push(format!("{scheme}://youtu.be/{id}"));
        }
        urls
    }

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some(ID)
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ").as_deref(),
            Some(ID)
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/brZCOVlyPPo").as_deref(),
            Some("brZCOVlyPPo")
        );
    }

    #[test]
    fn test_every_shape_accepted() {
        for url in all_shapes(ID) {
            assert!(is_video_url(&url), "{url} should be accepted");
            assert_eq!(extract_video_id(&url).as_deref(), Some(ID), "{url}");
        }
    }

    #[test]
    fn test_trailing_content_tolerated() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10s").as_deref(),
            Some(ID)
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abc").as_deref(),
            Some(ID)
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ#start").as_deref(),
            Some(ID)
        );
        assert!(is_video_url("https://www.youtube.com/live/dQw4w9WgXcQ/"));
    }

    #[test]
    fn test_id_length_enforced() {
        for url in all_shapes("dQw4w9WgXc") {
            assert!(!is_video_url(&url), "{url} has a 10-char id");
            assert_eq!(extract_video_id(&url), None);
        }
        for url in all_shapes("dQw4w9WgXcQX") {
            assert!(!is_video_url(&url), "{url} has a 12-char id");
            assert_eq!(extract_video_id(&url), None);
        }
    }

    #[test]
    fn test_rejected_urls() {
        let rejected = [
            "",
            "not-a-url",
            "www.youtube.com/watch?v=dQw4w9WgXcQ",
            "youtube.com/watch?v=dQw4w9WgXcQ",
            "ftp://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtu.be/dQw4w9WgXcQ",
            "https://example.com/watch?v=dQw4w9WgXcQ",
            "https://vimeo.com/123456789",
            "https://www.youtube.com/channel/UCxxxxxxxxx",
            "https://www.youtube.com/watch?list=PLxxxx&v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgX!Q",
            " https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        ];
        for url in rejected {
            assert!(!is_video_url(url), "{url:?} should be rejected");
            assert_eq!(extract_video_id(url), None, "{url:?}");
        }
    }

    #[test]
    fn test_validation_is_deterministic() {
        let url = "https://youtu.be/dQw4w9WgXcQ";
        assert_eq!(is_video_url(url), is_video_url(url));
        assert_eq!(extract_video_id(url), extract_video_id(url));
    }
}
