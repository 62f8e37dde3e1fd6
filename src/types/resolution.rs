use std::fmt::Display;

use clap::ValueEnum;

/// A resolution tier of the fixed ladder.
///
/// Variants are declared from the lowest to the highest tier,
/// so the derived ordering follows the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum Resolution {
    #[value(name = "144p")]
    P144,
    #[value(name = "240p")]
    P240,
    #[value(name = "360p")]
    P360,
    #[value(name = "480p")]
    P480,
    #[value(name = "720p")]
    P720,
    #[value(name = "1080p")]
    P1080,
}

impl Resolution {
    /// Every tier, lowest first
    pub const LADDER: [Resolution; 6] = [
        Resolution::P144,
        Resolution::P240,
        Resolution::P360,
        Resolution::P480,
        Resolution::P720,
        Resolution::P1080,
    ];

    pub fn height(self) -> u32 {
        match self {
            Resolution::P144 => 144,
            Resolution::P240 => 240,
            Resolution::P360 => 360,
            Resolution::P480 => 480,
            Resolution::P720 => 720,
            Resolution::P1080 => 1080,
        }
    }

    /// Width of the tier in 16:9
    fn width(self) -> u32 {
        self.height() * 16 / 9
    }

    /// Parse a quality label such as "1080p", "720p60" or "480p HDR"
    pub fn from_label(label: &str) -> Option<Self> {
        let digits_end = label.find(|c: char| !c.is_ascii_digit())?;
        if !label[digits_end..].starts_with('p') {
            return None;
        }

        let height: u32 = label[..digits_end].parse().ok()?;
        Self::LADDER.into_iter().find(|res| res.height() == height)
    }

    /// Find the tier of a frame, whatever its orientation or aspect ratio.
    ///
    /// The short side is matched against the tier heights first,
    /// then the long side against the 16:9 tier widths (e.g. 1920x804).
    /// Both allow a 10% tolerance.
    pub fn from_dimensions(width: Option<u32>, height: u32) -> Option<Self> {
        let (short, long) = match width {
            Some(width) => (width.min(height), Some(width.max(height))),
            None => (height, None),
        };
        let near = |size: u32, target: u32| size >= target * 9 / 10 && size <= target * 11 / 10;

        Self::LADDER
            .into_iter()
            .find(|res| near(short, res.height()))
            .or_else(|| {
                let long = long?;
                Self::LADDER.into_iter().find(|res| near(long, res.width()))
            })
    }

    /// Position of the tier on the ladder
    pub fn index(self) -> usize {
        self as usize
    }

    /// The tier right below this one, or None if this is the lowest tier
    pub fn lower(self) -> Option<Self> {
        self.index().checked_sub(1).map(|idx| Self::LADDER[idx])
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}p", self.height())
    }
}
