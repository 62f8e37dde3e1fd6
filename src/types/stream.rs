use std::{cmp::Ordering, ops::Deref};

use super::{Bitrate, Extension, Resolution};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Audio and video in the same stream
    Progressive,

    /// Adaptive stream carrying only video
    VideoOnly,

    /// Adaptive stream carrying only audio
    AudioOnly,
}

/// One encoded stream of a video, as listed by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    /// Identifier the provider uses to download this exact stream
    pub format_id: String,
    pub kind: StreamKind,

    /// None for audio streams and for resolutions outside of the ladder
    pub resolution: Option<Resolution>,

    /// Container extension, e.g. "mp4"
    pub ext: String,

    /// e.g. "audio/webm"
    pub mime_type: String,

    pub bitrate: Bitrate,

    /// Approximate size in bytes, if known
    pub filesize: Option<u64>,
}

impl Stream {
    /// Approximate size in MB, rounded to 2 decimals
    pub fn size_mb(&self) -> f64 {
        let mb = self.filesize.unwrap_or(0) as f64 / BYTES_PER_MB;
        (mb * 100.0).round() / 100.0
    }

    /// The file extension to give to this stream, taken from its MIME subtype
    pub fn mime_extension(&self) -> &str {
        self.mime_type
            .split_once('/')
            .map_or(self.ext.as_str(), |(_, subtype)| subtype)
    }

    fn matches(&self, kind: StreamKind, resolution: Resolution, ext: Extension) -> bool {
        self.kind == kind && self.resolution == Some(resolution) && self.ext == ext.as_str()
    }
}

/// The catalog of streams available for a video
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Streams(Vec<Stream>);

impl Streams {
    pub fn new(data: Vec<Stream>) -> Self {
        Self(data)
    }

    /// First progressive stream with this resolution and container
    pub fn progressive(&self, resolution: Resolution, ext: Extension) -> Option<&Stream> {
        self.iter().find(|s| s.matches(StreamKind::Progressive, resolution, ext))
    }

    /// First adaptive video-only stream with this resolution and container
    pub fn adaptive_video(&self, resolution: Resolution, ext: Extension) -> Option<&Stream> {
        self.iter().find(|s| s.matches(StreamKind::VideoOnly, resolution, ext))
    }

    /// Audio-only stream with the highest bitrate, whatever its container.
    /// On ties, the first listed stream wins.
    pub fn best_audio(&self) -> Option<&Stream> {
        self.iter()
            .filter(|s| s.kind == StreamKind::AudioOnly)
            .fold(None, |best: Option<&Stream>, s| match best {
                Some(b) if s.bitrate.partial_cmp(&b.bitrate) != Some(Ordering::Greater) => {
                    Some(b)
                }
                _ => Some(s),
            })
    }
}

impl Deref for Streams {
    type Target = Vec<Stream>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}


#[cfg(test)]
mod tests {
    use super::{fixtures::*, *};

    #[test]
    fn progressive_needs_kind_resolution_and_container() {
        let streams = Streams::new(vec![
            video_only("v720", Resolution::P720, "mp4"),
            progressive("p720webm", Resolution::P720, "webm"),
            progressive("p360", Resolution::P360, "mp4"),
            progressive("p720", Resolution::P720, "mp4"),
        ]);

        let found = streams.progressive(Resolution::P720, Extension::Mp4).unwrap();
        assert_eq!(found.format_id, "p720");
        assert!(streams.progressive(Resolution::P1080, Extension::Mp4).is_none());
    }

    #[test]
    fn adaptive_video_ignores_progressive_streams() {
        let streams = Streams::new(vec![
            progressive("p720", Resolution::P720, "mp4"),
            video_only("v720", Resolution::P720, "mp4"),
        ]);

        let found = streams
            .adaptive_video(Resolution::P720, Extension::Mp4)
            .unwrap();
        assert_eq!(found.format_id, "v720");
        assert_eq!(found.kind, StreamKind::VideoOnly);
    }

    #[test]
    fn best_audio_picks_highest_bitrate_in_any_container() {
        let streams = Streams::new(vec![
            audio_only("a48", "mp4", 48.0),
            audio_only("a160", "webm", 160.0),
            audio_only("a160bis", "mp4", 160.0),
            audio_only("a128", "mp4", 128.0),
        ]);

        let best = streams.best_audio().unwrap();
        assert_eq!(best.format_id, "a160");
        assert_eq!(best.mime_extension(), "webm");

        assert!(Streams::default().best_audio().is_none());
    }

    #[test]
    fn size_is_rounded_megabytes() {
        let mut stream = audio_only("a", "webm", 160.0);
        stream.filesize = Some(1_572_864);
        assert_eq!(stream.size_mb(), 1.5);

        stream.filesize = None;
        assert_eq!(stream.size_mb(), 0.0);
    }
}
