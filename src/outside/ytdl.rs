use std::{
    ffi::OsString,
    fmt::Debug,
    path::Path,
    process::{Command, Output},
};

use miette::{Context, IntoDiagnostic};
use serde::Deserialize;
use tracing::debug;

use super::command::{assert_success_command, check_status, run_command, Capture, YT_DL, YT_DLP};
use crate::{
    result::{bail, Error, Result},
    types::{Bitrate, Resolution, Stream, StreamKind, Streams, UrlKind, Video},
};

/// Interface for querying videos and downloading their streams
pub trait VideoProvider: Debug {
    /// Tell whether the URL points to a single video or a playlist
    fn classify(&self, url: &str) -> UrlKind {
        UrlKind::classify(url)
    }

    /// Get the URLs of the playlist videos, in the playlist order
    fn playlist_video_urls(&self, url: &str) -> Result<Vec<String>>;

    /// Get the video title and its catalog of streams
    fn video(&self, url: &str) -> Result<Video>;

    /// Download one stream of the video to `<dir>/<file_name>`.
    ///
    /// Network retries are left to the implementation, up to `max_retries` times.
    fn download(
        &self,
        video: &Video,
        stream: &Stream,
        dir: &Path,
        file_name: &str,
        max_retries: u32,
    ) -> Result<()>;
}

/// Interface for the [yt-dlp](https://github.com/yt-dlp/yt-dlp) program
#[derive(Debug)]
pub struct Ytdl {
    program: &'static str,
    show_progress: bool,
}

impl Ytdl {
    /// Verify that the `yt-dlp` or `youtube-dl` binaries are reachable
    pub fn new(show_progress: bool) -> Result<Self> {
        let program = if assert_success_command(YT_DLP, |cmd| cmd.arg("--version")).is_ok() {
            YT_DLP
        } else if assert_success_command(YT_DL, |cmd| cmd.arg("--version")).is_ok() {
            YT_DL
        } else {
            return bail("Neither yt-dlp nor youtube-dl found");
        };

        debug!("Using {program} as video provider");
        Ok(Self {
            program,
            show_progress,
        })
    }

    /// Run the command and check if it failed with saying the video is unavailable.
    /// In that case, return [`Error::Unavailable`].
    ///
    /// In other cases, return the output handle.
    fn run_check_availability<F>(&self, f: F, capture: Capture) -> Result<Output>
    where
        F: FnOnce(&mut Command) -> &mut Command,
    {
        let res = run_command(self.program, f, capture | Capture::STDERR)?;

        if is_unavailable(&String::from_utf8_lossy(&res.stderr)) {
            Err(Error::Unavailable)
        } else {
            Ok(res)
        }
    }

    /// Run the command and parse its stdout as JSON
    fn run_json<T, F>(&self, f: F) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
        F: FnOnce(&mut Command) -> &mut Command,
    {
        let res = self.run_check_availability(f, Capture::STDOUT)?;
        check_status(self.program, &res)?;

        Ok(serde_json::from_slice(&res.stdout)
            .into_diagnostic()
            .wrap_err("Could not parse JSON output")?)
    }
}

impl VideoProvider for Ytdl {
    fn playlist_video_urls(&self, url: &str) -> Result<Vec<String>> {
        let playlist: PlaylistJson = self
            .run_json(|cmd| {
                cmd.arg("-q")
                    .arg("-J")
                    .arg("--flat-playlist")
                    .arg("--")
                    .arg(url)
            })
            .map_err(|err| err.wrap_err_with(|| format!("Could not list playlist {url}")))?;

        Ok(playlist.video_urls())
    }

    fn video(&self, url: &str) -> Result<Video> {
        let video: VideoJson = self
            .run_json(|cmd| {
                cmd.arg("-q")
                    .arg("-J")
                    .arg("--no-playlist")
                    .arg("--")
                    .arg(url)
            })
            .map_err(|err| err.wrap_err_with(|| format!("Could not get video info of {url}")))?;

        Ok(video.into_video(url))
    }

    fn download(
        &self,
        video: &Video,
        stream: &Stream,
        dir: &Path,
        file_name: &str,
        max_retries: u32,
    ) -> Result<()> {
        let capture = if self.show_progress {
            Capture::SHOW_STDOUT
        } else {
            Capture::empty()
        };

        let args = download_args(
            &video.url,
            &stream.format_id,
            &dir.join(file_name),
            max_retries,
            self.show_progress,
        );
        let res = self.run_check_availability(|cmd| cmd.args(args), capture)?;

        check_status(self.program, &res)
            .map_err(|err| err.wrap_err_with(|| format!("Could not download {file_name}")))
    }
}

/// Arguments downloading the `format_id` stream of the video to `output`
fn download_args(
    url: &str,
    format_id: &str,
    output: &Path,
    max_retries: u32,
    show_progress: bool,
) -> Vec<OsString> {
    // The output is a template, escape its special character
    let template = output.to_string_lossy().replace('%', "%%");

    let mut args: Vec<OsString> = Vec::with_capacity(12);
    // Without -q the program reports its progress on stdout
    if !show_progress {
        args.push("-q".into());
    }
    args.extend(
        [
            "--no-playlist",
            "--no-continue", // Or else fails when file already exists, even an empty one
            "-f",
            format_id,
            "--retries",
            &max_retries.to_string(),
            "-o",
        ]
        .map(OsString::from),
    );
    args.push(template.into());
    args.extend(["--", url].map(OsString::from));
    args
}

fn is_unavailable(stderr: &str) -> bool {
    stderr.lines().any(|line| {
        let line_lower = line.to_lowercase();
        line.starts_with("ERROR:")
            && (line_lower.contains("unavailable") || line_lower.contains("private video"))
    })
}

#[derive(Debug, Deserialize)]
struct PlaylistJson {
    #[serde(default)]
    entries: Vec<PlaylistEntryJson>,
}

#[derive(Debug, Deserialize)]
struct PlaylistEntryJson {
    id: String,
    url: Option<String>,
}

impl PlaylistJson {
    fn video_urls(self) -> Vec<String> {
        self.entries
            .into_iter()
            .map(|entry| {
                entry
                    .url
                    .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={}", entry.id))
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct VideoJson {
    title: String,
    #[serde(default)]
    formats: Vec<FormatJson>,
}

#[derive(Debug, Deserialize)]
struct FormatJson {
    format_id: String,
    ext: String,
    vcodec: Option<String>,
    acodec: Option<String>,
    /// Quality label, e.g. "1080p" or "720p60"
    format_note: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    tbr: Option<f64>,
    abr: Option<f64>,
    filesize: Option<u64>,
    filesize_approx: Option<f64>,
}

impl VideoJson {
    fn into_video(self, url: &str) -> Video {
        let streams = self
            .formats
            .into_iter()
            .filter_map(FormatJson::into_stream)
            .collect();

        Video {
            url: url.to_owned(),
            title: self.title,
            streams: Streams::new(streams),
        }
    }
}

impl FormatJson {
    /// Convert the format into a stream.
    /// Formats without audio nor video (e.g. storyboards) are dropped.
    fn into_stream(self) -> Option<Stream> {
        let has_codec = |codec: &Option<String>| codec.as_deref().is_some_and(|c| c != "none");

        let kind = match (has_codec(&self.vcodec), has_codec(&self.acodec)) {
            (true, true) => StreamKind::Progressive,
            (true, false) => StreamKind::VideoOnly,
            (false, true) => StreamKind::AudioOnly,
            (false, false) => return None,
        };

        let (mime_type, bitrate) = if kind == StreamKind::AudioOnly {
            let subtype = if self.ext == "m4a" { "mp4" } else { &self.ext };
            (format!("audio/{subtype}"), self.abr.or(self.tbr))
        } else {
            (format!("video/{}", self.ext), self.tbr)
        };

        // The label names the tier even when the frame is not 16:9 landscape
        let resolution = match kind {
            StreamKind::AudioOnly => None,
            _ => self
                .format_note
                .as_deref()
                .and_then(Resolution::from_label)
                .or_else(|| {
                    self.height
                        .and_then(|height| Resolution::from_dimensions(self.width, height))
                }),
        };

        Some(Stream {
            format_id: self.format_id,
            kind,
            resolution,
            ext: self.ext,
            mime_type,
            bitrate: Bitrate::from_kbps(bitrate.unwrap_or_default()),
            filesize: self
                .filesize
                .or(self.filesize_approx.map(|size| size as u64)),
        })
    }
}
