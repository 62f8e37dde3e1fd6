use super::Streams;

/// A remote video and the streams it can be downloaded as
#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub url: String,
    pub title: String,
    pub streams: Streams,
}
