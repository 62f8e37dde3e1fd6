use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::{
    io::remove_file,
    outside::{StreamMerger, VideoProvider},
    result::Result,
    types::{Extension, FileName, Numbering, Resolution, Stream, Video},
};

/// What happened to a video once its download has been attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Downloaded as a single audio+video stream
    Progressive,

    /// Downloaded as separate video and audio streams, then merged
    Merged,

    /// The output file already exists
    Skipped,

    /// No stream matched at any resolution tier
    NotDownloaded,
}

/// The target format of the downloads and where to put them
#[derive(Debug, Clone)]
pub struct DownloadOptions<'a> {
    pub out_dir: &'a Path,
    pub ext: Extension,
    pub resolution: Resolution,
    pub numbering: Numbering,
    pub max_retries: u32,
    pub overwrite: bool,
}

/// Download a video in the wanted container, starting at the wanted resolution
/// and going down the resolution ladder until a stream matches.
#[derive(Debug)]
pub struct VideoDownloader<'a> {
    provider: &'a dyn VideoProvider,
    merger: &'a dyn StreamMerger,
    options: DownloadOptions<'a>,
}

impl<'a> VideoDownloader<'a> {
    pub fn new(
        provider: &'a dyn VideoProvider,
        merger: &'a dyn StreamMerger,
        options: DownloadOptions<'a>,
    ) -> Self {
        Self {
            provider,
            merger,
            options,
        }
    }

    /// Download the video, `number` being its 1-based position in the batch
    pub fn download(&self, video: &Video, number: usize) -> Result<Outcome> {
        let name = FileName::new(&video.title, number, self.options.numbering);
        let ext = self.options.ext;

        let output = self.options.out_dir.join(name.with_ext(ext.as_str()));
        if !self.options.overwrite && output.exists() {
            info!("'{name}' already exists, skipping it");
            return Ok(Outcome::Skipped);
        }

        let mut resolution = self.options.resolution;
        loop {
            if let Some(stream) = video.streams.progressive(resolution, ext) {
                self.download_progressive(video, stream, &name, resolution)?;
                return Ok(Outcome::Progressive);
            }

            if let Some(stream) = video.streams.adaptive_video(resolution, ext) {
                if let Some(audio) = video.streams.best_audio() {
                    self.download_adaptive(video, stream, audio, &name, resolution)?;
                    return Ok(Outcome::Merged);
                }
                debug!("'{name}' has a {resolution} video stream but no audio stream");
            }

            match resolution.lower() {
                Some(lower) => {
                    resolution = lower;
                    warn!(
                        "'{name}': requested resolution was not available. \
                        Resolution was downgraded to {resolution}"
                    );
                }
                None => break,
            }
        }

        error!("'{name}': file was not downloaded, no stream matches the {ext} container");
        Ok(Outcome::NotDownloaded)
    }

    fn download_progressive(
        &self,
        video: &Video,
        stream: &Stream,
        name: &FileName,
        resolution: Resolution,
    ) -> Result<()> {
        info!(
            "Downloading '{name}' with {resolution} resolution. Media size is {} MB",
            stream.size_mb()
        );

        let file_name = name.with_ext(&stream.ext);
        self.fetch(video, stream, &file_name)
    }

    fn download_adaptive(
        &self,
        video: &Video,
        stream: &Stream,
        audio: &Stream,
        name: &FileName,
        resolution: Resolution,
    ) -> Result<()> {
        info!(
            "Downloading video of '{name}' with {resolution} resolution. Video size is {} MB",
            stream.size_mb()
        );
        let video_name = name.with_prefix_ext("video", &stream.ext);
        self.fetch(video, stream, &video_name)?;

        info!(
            "Downloading audio of '{name}' with {} average bitrate. Audio size is {} MB",
            audio.bitrate,
            audio.size_mb()
        );
        let audio_name = name.with_prefix_ext("audio", audio.mime_extension());
        self.fetch(video, audio, &audio_name)?;

        info!("Merging video and audio of '{name}'");
        let output_name = name.with_ext(&stream.ext);
        let out_dir = self.options.out_dir;

        self.merger
            .merge(out_dir, &video_name, &audio_name, &output_name)
            .map_err(|err| {
                err.wrap_err_with(|| {
                    format!("Could not merge {video_name} and {audio_name}, both files are kept")
                })
            })?;

        remove_file(&out_dir.join(&video_name))?;
        remove_file(&out_dir.join(&audio_name))?;

        Ok(())
    }

    fn fetch(&self, video: &Video, stream: &Stream, file_name: &str) -> Result<()> {
        debug!(
            "Fetching stream {} ({:?}) as {file_name}",
            stream.format_id, stream.kind
        );

        self.provider.download(
            video,
            stream,
            self.options.out_dir,
            file_name,
            self.options.max_retries,
        )
    }
}
