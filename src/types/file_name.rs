use std::{fmt::Display, ops::Deref};

/// Characters replaced by the separator when building a file name
const UNSAFE_CHARS: [char; 12] = [' ', ':', '?', '!', '/', '|', ',', ';', '(', ')', '"', '*'];
const SEPARATOR: char = '-';

/// Name used when nothing remains of the title once sanitized
const FALLBACK_NAME: &str = "video";

/// How the output files of a batch are numbered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Numbering {
    pub enabled: bool,

    /// Zero-padding width of the sequence number
    pub digits: usize,
}

/// A filesystem-safe base name (without extension) for a video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileName(String);

impl FileName {
    pub fn new(title: &str, number: usize, numbering: Numbering) -> Self {
        let name = sanitize(title);

        let name = match (numbering.enabled, name.is_empty()) {
            (true, true) => format!("{number:0width$}", width = numbering.digits),
            (true, false) => format!("{number:0width$}{SEPARATOR}{name}", width = numbering.digits),
            (false, true) => FALLBACK_NAME.to_owned(),
            (false, false) => name,
        };

        Self(name)
    }

    /// `<name>.<ext>`
    pub fn with_ext(&self, ext: &str) -> String {
        format!("{}.{ext}", self.0)
    }

    /// `<prefix>-<name>.<ext>`, used for intermediate files
    pub fn with_prefix_ext(&self, prefix: &str, ext: &str) -> String {
        format!("{prefix}{SEPARATOR}{}.{ext}", self.0)
    }
}

/// Replace unsafe characters by the separator, collapse the separator runs
/// and trim it from both ends
fn sanitize(title: &str) -> String {
    let mut out = String::with_capacity(title.len());

    for c in title.chars() {
        let c = if UNSAFE_CHARS.contains(&c) { SEPARATOR } else { c };
        if c == SEPARATOR && out.ends_with(SEPARATOR) {
            continue;
        }
        out.push(c);
    }

    out.trim_matches(SEPARATOR).to_owned()
}

impl Display for FileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for FileName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
