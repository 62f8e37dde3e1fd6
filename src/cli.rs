use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::types::{Extension, Resolution};

macro_rules! arg_env {
    ($v:literal) => {
        concat!("TUBEFETCH_", $v)
    };
}

/// Download videos and playlists at a chosen resolution.
///
/// When no single stream matches the resolution, separate video and audio
/// streams are downloaded and merged with `ffmpeg`. If nothing matches at all,
/// the resolution is lowered one step at a time.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// The URLs of the videos and playlists to download, processed in order
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// The file extension to use for the output files. Defines the file container format to use
    #[arg(long, value_enum, default_value_t = Extension::Mp4, env = arg_env!("EXT"))]
    pub ext: Extension,

    /// The wanted resolution. Lower resolutions are used if it is not available
    #[arg(long, value_enum, default_value_t = Resolution::P720, env = arg_env!("RESOLUTION"))]
    pub resolution: Resolution,

    /// Number of the first video to download (starting at 1), once playlists are expanded
    #[arg(long)]
    pub start: Option<usize>,

    /// Number of the last video to download (included), once playlists are expanded
    #[arg(long)]
    pub end: Option<usize>,

    /// Do not prefix the file names with the video number
    #[arg(long)]
    pub no_numbering: bool,

    /// Zero-padding width of the video numbers
    #[arg(long)]
    pub digits: Option<usize>,

    /// The path to the output directory
    #[arg(long, env = arg_env!("OUT"))]
    pub out: Option<PathBuf>,

    /// The path to a TOML configuration file.
    /// Defaults to `tubefetch.toml` in the current directory, if it exists
    #[arg(long, env = arg_env!("CONFIG"))]
    pub config: Option<PathBuf>,

    /// Download videos again even if their output file already exists
    #[arg(long)]
    pub overwrite: bool,

    /// Show more logs. Can be repeated
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only show warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn log_level(&self) -> tracing::Level {
        match (self.quiet, self.verbose) {
            (true, _) => tracing::Level::WARN,
            (false, 0) => tracing::Level::INFO,
            (false, 1) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parse_full_command_line() {
        let args = Args::try_parse_from([
            "tubefetch",
            "--ext",
            "webm",
            "--resolution",
            "1080p",
            "--start",
            "2",
            "--end",
            "3",
            "--no-numbering",
            "-vv",
            "https://www.youtube.com/watch?v=A",
            "https://www.youtube.com/playlist?list=P",
        ])
        .unwrap();

        assert_eq!(args.urls.len(), 2);
        assert_eq!(args.ext, Extension::Webm);
        assert_eq!(args.resolution, Resolution::P1080);
        assert_eq!((args.start, args.end), (Some(2), Some(3)));
        assert!(args.no_numbering);
        assert_eq!(args.log_level(), tracing::Level::TRACE);
    }

    #[test]
    fn unknown_resolution_is_rejected() {
        let res = Args::try_parse_from([
            "tubefetch",
            "--resolution",
            "1440p",
            "https://www.youtube.com/watch?v=A",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn at_least_one_url_is_needed() {
        assert!(Args::try_parse_from(["tubefetch"]).is_err());
    }
}
