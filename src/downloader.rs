pub(crate) mod verify;

use crate::{client::Client, error::DownloadError};
use futures::StreamExt;
#[cfg(feature = "render_progress")]
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{header::HeaderMap, Url};
use std::path::{Path, PathBuf};
use tokio::{
    fs::{File, OpenOptions},
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt, SeekFrom},
};
use verify::{Checksum, Checksums, Hasher};

const HASH_BUFFER_SIZE: usize = 64 * 1024;
#[cfg(feature = "render_progress")]
const DEFAULT_INDIVIDUAL_PROGRESS: &str = "{bar:30.blue/red} ({percent}%) {bytes:>12.green} / {total_bytes:<12.green} {bytes_per_sec:>13.blue} - ETA: {eta_precise}";
#[cfg(feature = "render_progress")]
const PROGRESS_LINE: &str = "━╾╴─";

/// The destination is truncated if it already exists. When verification fails the
/// destination is removed before [`Download::start`] returns; after a transport or
/// I/O failure a partially written file may remain.
pub struct Download {
    url: Url,
    output: Option<PathBuf>,
    directory: Option<PathBuf>,
    filename: Option<String>,
    headers: Option<HeaderMap>,
    checksum: Checksum,
    #[cfg(feature = "render_progress")]
    progress: Option<Progress>,
}

impl Download {
    pub fn new(url: impl AsRef<str>) -> Result<Self, DownloadError> {
        let url = Url::parse(url.as_ref()).map_err(|_| DownloadError::URLParse)?;
        Ok(Self::new_from_url(url))
    }
    pub fn new_from_url(url: Url) -> Self {
        Self {
            url,
            output: None,
            directory: None,
            filename: None,
            headers: None,
            checksum: Checksum::none(),
            #[cfg(feature = "render_progress")]
            progress: None,
        }
    }
    pub fn with_filename(mut self, filename: String) -> Self {
        self.filename = Some(filename);
        self
    }
    pub fn with_output_dir(mut self, path: PathBuf) -> Self {
        self.directory = Some(path);
        self
    }
    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }
    pub fn with_checksum(mut self, checksum: Checksum) -> Self {
        self.checksum = checksum;
        self
    }
    #[cfg(feature = "render_progress")]
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = Some(progress);
        self
    }
    /// Where the file will be written. Falls back to the last URL segment in the
    /// current directory.
    pub fn output_path(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        let filename = self.filename.as_deref().unwrap_or_else(|| {
            self.url
                .path_segments()
                .and_then(|segments| segments.last())
                .and_then(|name| if name.is_empty() { None } else { Some(name) })
                .unwrap_or("download")
        });
        match &self.directory {
            Some(dir) => dir.join(filename),
            None => PathBuf::from(filename),
        }
    }
    pub async fn start(self, client: &Client) -> Result<Checksums, DownloadError> {
        let output = self.output_path();
        log::info!("Downloading {} to {}", self.url, output.display());
        let response = client
            .get(self.url.clone(), self.headers.as_ref())
            .send()
            .await?
            .error_for_status()?;
        #[cfg(feature = "render_progress")]
        let progress = self.progress.as_ref().map(|progress| progress.bar(response.content_length()));

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&output)
            .await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await.transpose()? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            #[cfg(feature = "render_progress")]
            if let Some(ref progress) = progress {
                progress.inc(chunk.len() as u64);
            }
        }
        file.flush().await?;
        file.sync_all().await?;
        #[cfg(feature = "render_progress")]
        if let Some(progress) = progress {
            progress.finish();
        }
        log::debug!("Wrote {written} bytes to {}", output.display());

        file.seek(SeekFrom::Start(0)).await?;
        let checksums = hash_file(&mut file).await?;
        drop(file);
        log::debug!("sha256 {} sha1 {} md5 {}", checksums.sha256, checksums.sha1, checksums.md5);

        finish(&output, &self.checksum, checksums).await
    }
}

/// Checks the computed digests, removing `output` on mismatch. A failed removal is
/// reported instead of the mismatch.
async fn finish(output: &Path, checksum: &Checksum, checksums: Checksums) -> Result<Checksums, DownloadError> {
    if let Err(mismatch) = checksum.verify(&checksums) {
        remove_mismatched(output).await?;
        return Err(mismatch.into());
    }
    Ok(checksums)
}

async fn hash_file(file: &mut File) -> Result<Checksums, DownloadError> {
    let mut hasher = Hasher::default();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];
    loop {
        let read = file.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hasher.finalize())
}

async fn remove_mismatched(path: &Path) -> Result<(), DownloadError> {
    log::debug!("Removing {} after failed verification", path.display());
    tokio::fs::remove_file(path).await?;
    Ok(())
}

#[cfg(feature = "render_progress")]
pub struct Progress {
    style: ProgressStyle,
}

#[cfg(feature = "render_progress")]
impl Default for Progress {
    fn default() -> Self {
        Self::new(
            ProgressStyle::with_template(DEFAULT_INDIVIDUAL_PROGRESS)
                .unwrap()
                .progress_chars(PROGRESS_LINE),
        )
    }
}

#[cfg(feature = "render_progress")]
impl Progress {
    pub fn new(style: ProgressStyle) -> Self {
        Self { style }
    }
    fn bar(&self, length: Option<u64>) -> ProgressBar {
        let bar = match length {
            Some(length) => ProgressBar::new(length),
            None => ProgressBar::new_spinner(),
        };
        let bar = bar.with_style(self.style.clone());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        bar
    }
}
