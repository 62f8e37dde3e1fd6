mod bitrate;
mod extension;
mod file_name;
mod resolution;
mod stream;
mod url_kind;
mod video;

pub use bitrate::Bitrate;
pub use extension::Extension;
pub use file_name::{FileName, Numbering};
pub use resolution::Resolution;
#[cfg(test)]
pub use stream::fixtures as stream_fixtures;
pub use stream::{Stream, StreamKind, Streams};
pub use url_kind::UrlKind;
pub use video::Video;
