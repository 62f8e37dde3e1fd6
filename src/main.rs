mod batch;
mod cli;
mod config;
mod downloader;
mod io;
mod logging;
mod outside;
mod result;
mod types;

use clap::Parser;
use miette::{Context, Result};
use tracing::{debug, info};

use crate::{
    batch::Window,
    cli::Args,
    config::Settings,
    downloader::{DownloadOptions, VideoDownloader},
    outside::{Ffmpeg, Ytdl},
    types::Numbering,
};

fn main() -> Result<()> {
    // Initialize the environment & CLI
    let args = Args::parse();
    logging::init_logging(args.log_level())?;

    let settings = Settings::load(args.config.as_deref())?;
    debug!("Settings: {settings:?}");

    let out_dir = args.out.clone().unwrap_or(settings.download_dir);
    io::create_dir(&out_dir).wrap_err("Could not create out directory")?;

    // Check the external programs before downloading anything
    let ytdl = Ytdl::new(!args.quiet)
        .map_err(|err| err.wrap_err_with(|| "Could not load the video provider"))?;
    let ffmpeg = Ffmpeg::new().map_err(|err| err.wrap_err_with(|| "Could not load ffmpeg"))?;

    let options = DownloadOptions {
        out_dir: &out_dir,
        ext: args.ext,
        resolution: args.resolution,
        numbering: Numbering {
            enabled: settings.numbering && !args.no_numbering,
            digits: args.digits.unwrap_or(settings.digits),
        },
        max_retries: settings.max_retries,
        overwrite: args.overwrite,
    };
    let downloader = VideoDownloader::new(&ytdl, &ffmpeg, options);

    let window = Window {
        start: args.start,
        end: args.end,
    };
    let summary = batch::run(&ytdl, &downloader, &args.urls, window)?;

    info!("All videos processed: {summary}");
    Ok(())
}
