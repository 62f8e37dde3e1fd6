use std::fmt::Display;

use miette::miette;

#[derive(Debug)]
pub enum Error {
    /// The provider reported the video as unavailable (removed, private, ...)
    Unavailable,

    Miette(miette::Report),
}

impl From<miette::Report> for Error {
    fn from(err: miette::Report) -> Self {
        Error::Miette(err)
    }
}

impl From<Error> for miette::Report {
    fn from(err: Error) -> Self {
        match err {
            Error::Unavailable => miette!("Unavailable video"),
            Error::Miette(err) => err,
        }
    }
}

impl Error {
    pub fn wrap_err_with<D, F>(self, f: F) -> Error
    where
        D: Display + Send + Sync + 'static,
        F: FnOnce() -> D,
    {
        match self {
            Error::Miette(report) => Error::Miette(report.wrap_err(f())),
            err => err,
        }
    }
}

/// Shortcut for returning an error built from a message
pub fn bail<T>(msg: impl Display + Send + Sync + 'static) -> Result<T> {
    Err(Error::Miette(miette!("{msg}")))
}

pub type Result<T> = std::result::Result<T, Error>;
