mod client;
mod downloader;
mod error;
pub mod providers;

pub use client::Client;
pub use downloader::verify::{Checksum, Checksums, CsType};
pub use downloader::Download;
pub use error::{ApiError, ChecksumError, DownloadError};
pub use providers::{magma::Magma, paper::Paper, purpur::Purpur, vanilla::Vanilla};

#[cfg(feature = "render_progress")]
pub use downloader::Progress;
