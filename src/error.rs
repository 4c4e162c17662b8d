use crate::downloader::verify::CsType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChecksumError {
    #[error("Could not recognize the length of inputted checksum")]
    UnrecognizedSize,
    #[error("Unsupported checksum type: {0}")]
    UnsupportedAlgorithm(String),
    #[error("Downloaded file does not match the given {algorithm} checksum (expected {expected}, got {actual})")]
    Mismatch {
        algorithm: CsType,
        expected: String,
        actual: String,
    },
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Unable to parse URL")]
    URLParse,
    #[error("{0}")]
    RequestError(#[from] reqwest_middleware::Error),
    #[error("{0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("{0}")]
    FileError(#[from] tokio::io::Error),
    #[error("{0}")]
    Checksum(#[from] ChecksumError),
}

impl DownloadError {
    /// True for failures to reach the server or read its response to completion.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::RequestError(_) | Self::ReqwestError(_))
    }
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Checksum(ChecksumError::Mismatch { .. }))
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unable to build endpoint URL")]
    URLParse,
    #[error("{0}")]
    RequestError(#[from] reqwest_middleware::Error),
    #[error("{0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("Unable to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Download(#[from] DownloadError),
    #[error("Version {0} not found")]
    NotFound(String),
    #[error("No builds available for {0}")]
    NoBuilds(String),
    #[error("Version {version} has no {artifact} download")]
    MissingArtifact { version: String, artifact: &'static str },
}
