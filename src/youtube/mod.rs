use regex::Regex;
use std::sync::OnceLock;

pub mod oembed;

static URL_SHAPE: OnceLock<Regex> = OnceLock::new();
static SHORT_ID: OnceLock<Regex> = OnceLock::new();
static WATCH_ID: OnceLock<Regex> = OnceLock::new();
static EMBED_ID: OnceLock<Regex> = OnceLock::new();

fn url_shape() -> &'static Regex {
    URL_SHAPE.get_or_init(|| {
        Regex::new(r"(?i)^(https?://)?(www\.|m\.)?(youtube\.com|youtu\.be)/.+$")
            .unwrap()
    })
}

/// Check whether a string has the shape of a YouTube URL: optional scheme,
/// optional `www.`/`m.` subdomain, host `youtube.com` or `youtu.be`, and a
/// non-empty path or query. Pure predicate, also used for live input feedback.
pub fn is_valid_youtube_url(url: &str) -> bool {
    url_shape().is_match(url)
}

/// Extract the video identifier from a YouTube URL.
///
/// Patterns are tried in priority order: short-form `youtu.be/<id>`, watch-page
/// `v=<id>` query parameter, then `/embed/<id>`. Identifiers are 6 or more
/// characters from `[A-Za-z0-9_-]`. Returns `None` when no pattern matches.
pub fn extract_video_id(url: &str) -> Option<String> {
    let short = SHORT_ID.get_or_init(|| Regex::new(r"youtu\.be/([A-Za-z0-9_-]{6,})").unwrap());
    if let Some(caps) = short.captures(url) {
        return Some(caps[1].to_string());
    }

    let watch = WATCH_ID.get_or_init(|| Regex::new(r"[?&]v=([A-Za-z0-9_-]{6,})").unwrap());
    if let Some(caps) = watch.captures(url) {
        return Some(caps[1].to_string());
    }

    let embed = EMBED_ID.get_or_init(|| Regex::new(r"/embed/([A-Za-z0-9_-]{6,})").unwrap());
    if let Some(caps) = embed.captures(url) {
        return Some(caps[1].to_string());
    }

    None
}

/// Canonical watch URL for a video identifier.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
