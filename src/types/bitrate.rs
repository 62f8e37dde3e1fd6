use std::fmt::Display;

/// An average bitrate, in kbit/s
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Bitrate(f64);

impl Bitrate {
    pub fn from_kbps(kbps: f64) -> Self {
        Self(kbps)
    }
}

impl Display for Bitrate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}kbps", self.0)
    }
}
