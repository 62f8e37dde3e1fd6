mod command;
mod ffmpeg;
mod ytdl;

pub use ffmpeg::{Ffmpeg, StreamMerger};
pub use ytdl::{VideoProvider, Ytdl};
