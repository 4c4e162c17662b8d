use crate::{
    client::{endpoint, Client},
    downloader::{
        verify::{Checksum, Checksums},
        Download,
    },
    error::ApiError,
};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

static MAGMA_API: Lazy<Url> = Lazy::new(|| Url::parse("https://api.magmafoundation.org/api/v2/").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub name: String,
    pub tag_name: String,
    pub created_at: DateTime<Utc>,
    pub link: String,
    #[serde(default)]
    pub installer_link: Option<String>,
    #[serde(default)]
    pub git_commit_url: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

/// Magma publishes no checksums, so downloads are not verified. The returned
/// [`Checksums`] are still computed for the caller to record.
#[derive(Clone)]
pub struct Magma {
    client: Client,
    base: Url,
}

impl Magma {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base: MAGMA_API.clone(),
        }
    }
    pub fn with_base_url(mut self, base: Url) -> Self {
        self.base = base;
        self
    }
    pub async fn versions(&self) -> Result<Vec<String>, ApiError> {
        self.client.get_json(endpoint(&self.base, &["allVersions"])?).await
    }
    pub async fn releases(&self, version: &str) -> Result<Vec<Release>, ApiError> {
        self.client.get_json(endpoint(&self.base, &[version])?).await
    }
    /// Most recently created release of `version` that is not archived.
    pub async fn latest_release(&self, version: &str) -> Result<Release, ApiError> {
        self.releases(version)
            .await?
            .into_iter()
            .filter(|release| !release.archived)
            .max_by_key(|release| release.created_at)
            .ok_or_else(|| ApiError::NoBuilds(version.to_owned()))
    }
    pub async fn download(&self, version: &str, tag: &str, path: impl Into<PathBuf>) -> Result<Checksums, ApiError> {
        let url = endpoint(&self.base, &[version, "latest", tag, "download"])?;
        let checksums = Download::new_from_url(url)
            .with_output_file(path)
            .with_checksum(Checksum::none())
            .start(&self.client)
            .await?;
        Ok(checksums)
    }
    pub async fn download_latest(&self, version: &str, path: impl Into<PathBuf>) -> Result<Checksums, ApiError> {
        let release = self.latest_release(version).await?;
        log::info!("Latest Magma release for {version} is {}", release.tag_name);
        self.download(version, &release.tag_name, path).await
    }
}
