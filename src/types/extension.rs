use std::fmt::Display;

use clap::ValueEnum;

/// Container of the final video files
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Extension {
    Mp4,
    Webm,
}

impl Extension {
    /// Return the extension without the leading dot.
    /// e.g. "ext"
    pub fn as_str(self) -> &'static str {
        match self {
            Extension::Mp4 => "mp4",
            Extension::Webm => "webm",
        }
    }
}

impl Display for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
