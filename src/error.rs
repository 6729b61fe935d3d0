use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed station data")]
    Json(#[from] serde_json::Error),
    #[error("request failed")]
    Http(#[from] reqwest::Error),
    #[error("malformed FDSN text response")]
    Csv(#[from] csv::Error),
    #[error("failed to parse station inventory")]
    Ini(#[from] ini::Error),
    #[error("station section {0:?} is not of the form NET.STA")]
    BadStationId(String),
    #[error("station section {section:?} is missing key {key:?}")]
    MissingKey { section: String, key: &'static str },
    #[error("invalid container id {0:?}")]
    BadContainerId(String),
    #[error("map container #{0} not found in host page")]
    ContainerMissing(String),
    #[error("none of the {0} configured stations could be located")]
    NothingResolved(usize),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
