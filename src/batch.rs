use std::{fmt::Display, ops::Range};

use tracing::{debug, error, info, warn};

use crate::{
    downloader::{Outcome, VideoDownloader},
    outside::VideoProvider,
    result::{bail, Error, Result},
    types::UrlKind,
};

/// A 1-based inclusive range of videos to process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl Window {
    /// Convert the window to a 0-based range over a list of `len` videos.
    ///
    /// A missing start or end means the first or last video.
    /// An end past the list is clamped to its length.
    pub fn to_range(self, len: usize) -> Result<Range<usize>> {
        let start = self.start.unwrap_or(1);
        let end = self.end.map_or(len, |end| end.min(len));

        if start == 0 {
            return bail("Video numbers start at 1");
        }
        if start > end && !(len == 0 && self.start.is_none()) {
            return bail(format!(
                "Start video {start} is after end video {end} ({len} videos found)"
            ));
        }

        Ok(start - 1..end)
    }
}

/// Count of every video outcome in a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub progressive: usize,
    pub merged: usize,
    pub skipped: usize,
    pub not_downloaded: usize,
    pub unavailable: usize,
}

impl Summary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Progressive => self.progressive += 1,
            Outcome::Merged => self.merged += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::NotDownloaded => self.not_downloaded += 1,
        }
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} downloaded, {} merged, {} skipped, {} not downloaded, {} unavailable",
            self.progressive, self.merged, self.skipped, self.not_downloaded, self.unavailable
        )
    }
}

/// Expand the URLs into the ordered list of video URLs.
///
/// Playlists are replaced by their videos, in the playlist order.
/// URLs that are neither a video nor a playlist are skipped.
pub fn expand_urls(provider: &dyn VideoProvider, urls: &[String]) -> Result<Vec<String>> {
    let mut videos = Vec::with_capacity(urls.len());

    for url in urls {
        match provider.classify(url) {
            UrlKind::Video => videos.push(url.clone()),
            UrlKind::Playlist => {
                info!("Get the videos of playlist {url}");
                let members = match provider.playlist_video_urls(url) {
                    Ok(members) => members,
                    Err(Error::Unavailable) => {
                        return bail(format!("Playlist {url} is unavailable"))
                    }
                    Err(err) => return Err(err),
                };
                info!("{} videos in the playlist", members.len());
                videos.extend(members);
            }
            UrlKind::Unknown => warn!("'{url}' is neither a video nor a playlist, skipping it"),
        }
    }

    Ok(videos)
}

/// Download every video of the URLs inside the window, one after the other
pub fn run(
    provider: &dyn VideoProvider,
    downloader: &VideoDownloader,
    urls: &[String],
    window: Window,
) -> Result<Summary> {
    let videos = expand_urls(provider, urls)?;
    let range = window.to_range(videos.len())?;
    info!(
        "{} videos found, processing videos {} to {}",
        videos.len(),
        range.start + 1,
        range.end
    );

    let mut summary = Summary::default();
    for (idx, url) in videos.iter().enumerate().take(range.end).skip(range.start) {
        let number = idx + 1;
        debug!("Processing video {number}: {url}");

        let video = match provider.video(url) {
            Ok(video) => video,
            Err(Error::Unavailable) => {
                error!("Video {url} is unavailable. Not downloaded");
                summary.unavailable += 1;
                continue;
            }
            Err(err) => return Err(err),
        };

        match downloader.download(&video, number) {
            Ok(outcome) => summary.record(outcome),
            Err(Error::Unavailable) => {
                error!("Video {url} became unavailable during its download");
                summary.unavailable += 1;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        downloader::{fakes::*, DownloadOptions},
        types::{stream_fixtures::*, Extension, Numbering, Resolution},
    };

    const VIDEO_A: &str = "https://www.youtube.com/watch?v=A";
    const PLAYLIST: &str = "https://www.youtube.com/playlist?list=P";
    const MEMBERS: [&str; 3] = [
        "https://www.youtube.com/watch?v=P1",
        "https://www.youtube.com/watch?v=P2",
        "https://www.youtube.com/watch?v=P3",
    ];

    fn provider() -> FakeProvider {
        let mut provider = FakeProvider::default().with_playlist(PLAYLIST, &MEMBERS);
        let titles = [
            (VIDEO_A, "A"),
            (MEMBERS[0], "P1"),
            (MEMBERS[1], "P2"),
            (MEMBERS[2], "P3"),
        ];
        for (url, title) in titles {
            provider =
                provider.with_video(url, title, vec![progressive(title, Resolution::P720, "mp4")]);
        }
        provider
    }

    fn urls(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn playlists_are_expanded_in_order() {
        let videos = expand_urls(&provider(), &urls(&[VIDEO_A, PLAYLIST])).unwrap();
        assert_eq!(videos, [VIDEO_A, MEMBERS[0], MEMBERS[1], MEMBERS[2]]);
    }

    #[test]
    fn unknown_urls_are_skipped() {
        let videos = expand_urls(
            &provider(),
            &urls(&["https://www.youtube.com/@channel", VIDEO_A]),
        )
        .unwrap();
        assert_eq!(videos, [VIDEO_A]);
    }

    #[test]
    fn window_defaults_and_bounds() {
        assert_eq!(Window::default().to_range(4).unwrap(), 0..4);
        assert_eq!(Window::default().to_range(0).unwrap(), 0..0);

        let window = Window {
            start: Some(2),
            end: Some(3),
        };
        assert_eq!(window.to_range(4).unwrap(), 1..3);

        let clamped = Window {
            start: Some(3),
            end: Some(10),
        };
        assert_eq!(clamped.to_range(4).unwrap(), 2..4);

        let zero = Window {
            start: Some(0),
            end: None,
        };
        assert!(zero.to_range(4).is_err());

        let reversed = Window {
            start: Some(4),
            end: Some(2),
        };
        assert!(reversed.to_range(4).is_err());

        let past_end = Window {
            start: Some(6),
            end: None,
        };
        assert!(past_end.to_range(4).is_err());
    }

    #[test]
    fn window_selects_videos_and_keeps_their_numbers() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = provider();
        let merger = FakeMerger::default();
        let options = DownloadOptions {
            out_dir: tmp.path(),
            ext: Extension::Mp4,
            resolution: Resolution::P720,
            numbering: Numbering {
                enabled: true,
                digits: 3,
            },
            max_retries: 3,
            overwrite: false,
        };
        let downloader = VideoDownloader::new(&provider, &merger, options);

        let window = Window {
            start: Some(2),
            end: Some(3),
        };
        let summary = run(&provider, &downloader, &urls(&[VIDEO_A, PLAYLIST]), window).unwrap();

        assert_eq!(*provider.lookups.borrow(), [MEMBERS[0], MEMBERS[1]]);
        assert_eq!(provider.downloaded_files(), ["002-P1.mp4", "003-P2.mp4"]);
        assert_eq!(
            summary,
            Summary {
                progressive: 2,
                ..Default::default()
            }
        );
    }

    #[test]
    fn unavailable_videos_do_not_stop_the_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let mut provider = provider();
        provider.unavailable.push(MEMBERS[1].to_owned());
        provider = provider.with_video(
            "https://youtu.be/nothing",
            "Nothing",
            vec![progressive("p144", Resolution::P144, "webm")],
        );
        let merger = FakeMerger::default();
        let options = DownloadOptions {
            out_dir: tmp.path(),
            ext: Extension::Mp4,
            resolution: Resolution::P720,
            numbering: Numbering {
                enabled: false,
                digits: 3,
            },
            max_retries: 1,
            overwrite: false,
        };
        let downloader = VideoDownloader::new(&provider, &merger, options);

        let summary = run(
            &provider,
            &downloader,
            &urls(&[PLAYLIST, "https://youtu.be/nothing"]),
            Window::default(),
        )
        .unwrap();

        assert_eq!(provider.downloaded_files(), ["P1.mp4", "P3.mp4"]);
        assert_eq!(
            summary,
            Summary {
                progressive: 2,
                not_downloaded: 1,
                unavailable: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn unknown_videos_abort_the_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = provider();
        let merger = FakeMerger::default();
        let options = DownloadOptions {
            out_dir: tmp.path(),
            ext: Extension::Mp4,
            resolution: Resolution::P720,
            numbering: Numbering {
                enabled: true,
                digits: 2,
            },
            max_retries: 3,
            overwrite: false,
        };
        let downloader = VideoDownloader::new(&provider, &merger, options);

        let res = run(
            &provider,
            &downloader,
            &urls(&[VIDEO_A, "https://www.youtube.com/watch?v=missing", PLAYLIST]),
            Window::default(),
        );

        assert!(res.is_err());
        assert_eq!(provider.downloaded_files(), ["01-A.mp4"]);
    }

    #[test]
    fn videos_lost_during_download_are_counted_as_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let mut provider = provider();
        provider.unavailable_downloads.push(MEMBERS[0].to_owned());
        let merger = FakeMerger::default();
        let options = DownloadOptions {
            out_dir: tmp.path(),
            ext: Extension::Mp4,
            resolution: Resolution::P720,
            numbering: Numbering {
                enabled: true,
                digits: 1,
            },
            max_retries: 3,
            overwrite: false,
        };
        let downloader = VideoDownloader::new(&provider, &merger, options);

        let summary = run(&provider, &downloader, &urls(&[PLAYLIST]), Window::default()).unwrap();

        assert_eq!(provider.downloaded_files(), ["2-P2.mp4", "3-P3.mp4"]);
        assert_eq!(
            summary,
            Summary {
                progressive: 2,
                unavailable: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn unavailable_playlist_error_names_it() {
        let mut provider = provider();
        provider.unavailable.push(PLAYLIST.to_owned());

        let err = expand_urls(&provider, &urls(&[VIDEO_A, PLAYLIST])).unwrap_err();
        let report = miette::Report::from(err);
        assert!(report.to_string().contains(PLAYLIST), "{report}");
    }
}
