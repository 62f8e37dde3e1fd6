use std::sync::OnceLock;

use regex::Regex;

/// A playlist page, e.g. "https://www.youtube.com/playlist?list=PL..."
const PLAYLIST_PATTERN: &str = r"playlist";

/// A single video page: "/watch?v=", short links and shorts
const VIDEO_PATTERN: &str = r"watch|youtu\.be/|/shorts/";

static PLAYLIST_RE: OnceLock<Regex> = OnceLock::new();
static VIDEO_RE: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Video,
    Playlist,
    Unknown,
}

impl UrlKind {
    /// Classify a URL from its shape only, without any network access.
    ///
    /// Video URLs are checked first, so a video watched inside a playlist is a video.
    pub fn classify(url: &str) -> Self {
        let playlist_re = PLAYLIST_RE.get_or_init(|| Regex::new(PLAYLIST_PATTERN).unwrap());
        let video_re = VIDEO_RE.get_or_init(|| Regex::new(VIDEO_PATTERN).unwrap());

        if video_re.is_match(url) {
            Self::Video
        } else if playlist_re.is_match(url) {
            Self::Playlist
        } else {
            Self::Unknown
        }
    }
}
