use std::{fmt::Debug, path::Path};

use tracing::debug;

use super::command::{
    assert_success_command, check_status, run_command, Capture, FFMPEG, FFXXX_DEFAULT_ARGS,
};
use crate::{io::CurrentDirGuard, result::Result};

pub trait StreamMerger: Debug {
    /// Mux the video stream of `video` and the audio stream of `audio`
    /// into `output`, without re-encoding them.
    ///
    /// All three file names are relative to `dir`.
    /// The input files are left untouched.
    fn merge(&self, dir: &Path, video: &str, audio: &str, output: &str) -> Result<()>;
}

/// Interface for the [ffmpeg](https://ffmpeg.org) program
#[derive(Debug)]
pub struct Ffmpeg {
    program: &'static str,
}

impl Ffmpeg {
    /// Verify that the `ffmpeg` binary is reachable
    pub fn new() -> Result<Self> {
        assert_success_command(FFMPEG, |cmd| cmd.arg("-version"))?;

        Ok(Self { program: FFMPEG })
    }
}

/// Copy the video of the first input and the audio of the second one
fn merge_args<'a>(video: &'a str, audio: &'a str, output: &'a str) -> Vec<&'a str> {
    let mut args: Vec<&'a str> = FFXXX_DEFAULT_ARGS.to_vec();
    args.extend([
        "-y", "-i", video, "-i", audio, "-c", "copy", "-map", "0:v", "-map", "1:a", output,
    ]);
    args
}

impl StreamMerger for Ffmpeg {
    fn merge(&self, dir: &Path, video: &str, audio: &str, output: &str) -> Result<()> {
        let _cwd = CurrentDirGuard::enter(dir)?;

        let res = run_command(
            self.program,
            |cmd| cmd.args(merge_args(video, audio, output)),
            Capture::STDERR,
        )?;

        check_status(self.program, &res)?;
        debug!("Merged {video} and {audio} into {output}");

        Ok(())
    }
}
