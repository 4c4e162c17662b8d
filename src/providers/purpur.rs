use crate::{
    client::{endpoint, Client},
    downloader::{
        verify::{Checksum, Checksums, CsType},
        Download,
    },
    error::ApiError,
};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

static PURPUR_API: Lazy<Url> = Lazy::new(|| Url::parse("https://api.purpurmc.org/v2/").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projects {
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub project: String,
    pub versions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectVersion {
    pub project: String,
    pub version: String,
    pub builds: Builds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Builds {
    pub latest: String,
    pub all: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    pub project: String,
    pub version: String,
    pub build: String,
    pub result: String,
    /// Milliseconds since the epoch.
    pub timestamp: i64,
    pub duration: i64,
    pub commits: Vec<Commit>,
    #[serde(default)]
    pub md5: String,
}

impl Build {
    pub fn succeeded(&self) -> bool {
        self.result == "SUCCESS"
    }
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub author: String,
    pub email: String,
    pub description: String,
    pub hash: String,
    pub timestamp: i64,
}

#[derive(Clone)]
pub struct Purpur {
    client: Client,
    base: Url,
}

impl Purpur {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base: PURPUR_API.clone(),
        }
    }
    pub fn with_base_url(mut self, base: Url) -> Self {
        self.base = base;
        self
    }
    pub async fn projects(&self) -> Result<Projects, ApiError> {
        self.client.get_json(endpoint(&self.base, &[])?).await
    }
    pub async fn project(&self, project: &str) -> Result<Project, ApiError> {
        self.client.get_json(endpoint(&self.base, &[project])?).await
    }
    pub async fn version(&self, project: &str, version: &str) -> Result<ProjectVersion, ApiError> {
        self.client.get_json(endpoint(&self.base, &[project, version])?).await
    }
    /// `build` is a build number or `"latest"`.
    pub async fn build(&self, project: &str, version: &str, build: &str) -> Result<Build, ApiError> {
        self.client.get_json(endpoint(&self.base, &[project, version, build])?).await
    }
    /// Downloads a build, verified against the MD5 the API publishes for it.
    pub async fn download_build(
        &self,
        project: &str,
        version: &str,
        build: &str,
        path: impl Into<PathBuf>,
    ) -> Result<Checksums, ApiError> {
        let info = self.build(project, version, build).await?;
        // Use the resolved build number; "latest" may move between requests.
        let url = endpoint(&self.base, &[project, version, &info.build, "download"])?;
        let checksums = Download::new_from_url(url)
            .with_output_file(path)
            .with_checksum(Checksum::new_inner(info.md5, CsType::Md5))
            .start(&self.client)
            .await?;
        Ok(checksums)
    }
    pub async fn download_latest(&self, project: &str, version: &str, path: impl Into<PathBuf>) -> Result<Checksums, ApiError> {
        let info = self.version(project, version).await?;
        if info.builds.latest.is_empty() {
            return Err(ApiError::NoBuilds(format!("{project} {version}")));
        }
        log::info!("Latest {project} build for {version} is {}", info.builds.latest);
        self.download_build(project, version, &info.builds.latest, path).await
    }
}
