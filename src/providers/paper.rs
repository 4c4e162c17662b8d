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

static PAPER_API: Lazy<Url> = Lazy::new(|| Url::parse("https://api.papermc.io/v2/").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projects {
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,
    pub project_name: String,
    pub version_groups: Vec<String>,
    pub versions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectVersion {
    pub project_id: String,
    pub project_name: String,
    pub version: String,
    pub builds: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionBuilds {
    pub project_id: String,
    pub project_name: String,
    pub version: String,
    pub builds: Vec<VersionBuild>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionBuild {
    /// Only present when listed through a version group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub build: u32,
    pub time: DateTime<Utc>,
    pub channel: Channel,
    pub promoted: bool,
    pub changes: Vec<Change>,
    pub downloads: Downloads,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    pub project_id: String,
    pub project_name: String,
    pub version: String,
    pub build: u32,
    pub time: DateTime<Utc>,
    pub channel: Channel,
    pub promoted: bool,
    pub changes: Vec<Change>,
    pub downloads: Downloads,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Default,
    Experimental,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Change {
    pub commit: String,
    pub summary: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Downloads {
    pub application: Artifact,
    #[serde(rename = "mojang-mappings", default, skip_serializing_if = "Option::is_none")]
    pub mojang_mappings: Option<Artifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionGroup {
    pub project_id: String,
    pub project_name: String,
    pub version_group: String,
    pub versions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionGroupBuilds {
    pub project_id: String,
    pub project_name: String,
    pub version_group: String,
    pub versions: Vec<String>,
    pub builds: Vec<VersionBuild>,
}

/// Client for the PaperMC v2 API (paper, velocity, folia, waterfall).
#[derive(Clone)]
pub struct Paper {
    client: Client,
    base: Url,
}

impl Paper {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base: PAPER_API.clone(),
        }
    }
    pub fn with_base_url(mut self, base: Url) -> Self {
        self.base = base;
        self
    }
    pub async fn projects(&self) -> Result<Projects, ApiError> {
        self.client.get_json(endpoint(&self.base, &["projects"])?).await
    }
    pub async fn project(&self, project: &str) -> Result<Project, ApiError> {
        self.client.get_json(endpoint(&self.base, &["projects", project])?).await
    }
    pub async fn version(&self, project: &str, version: &str) -> Result<ProjectVersion, ApiError> {
        let url = endpoint(&self.base, &["projects", project, "versions", version])?;
        self.client.get_json(url).await
    }
    pub async fn version_builds(&self, project: &str, version: &str) -> Result<VersionBuilds, ApiError> {
        let url = endpoint(&self.base, &["projects", project, "versions", version, "builds"])?;
        self.client.get_json(url).await
    }
    pub async fn build(&self, project: &str, version: &str, build: u32) -> Result<Build, ApiError> {
        let build = build.to_string();
        let url = endpoint(&self.base, &["projects", project, "versions", version, "builds", &build])?;
        self.client.get_json(url).await
    }
    pub async fn version_group(&self, project: &str, group: &str) -> Result<VersionGroup, ApiError> {
        let url = endpoint(&self.base, &["projects", project, "version_group", group])?;
        self.client.get_json(url).await
    }
    pub async fn version_group_builds(&self, project: &str, group: &str) -> Result<VersionGroupBuilds, ApiError> {
        let url = endpoint(&self.base, &["projects", project, "version_group", group, "builds"])?;
        self.client.get_json(url).await
    }
    /// Highest numbered build of `version` on any channel.
    pub async fn latest_build(&self, project: &str, version: &str) -> Result<VersionBuild, ApiError> {
        let builds = self.version_builds(project, version).await?;
        builds
            .builds
            .into_iter()
            .max_by_key(|build| build.build)
            .ok_or_else(|| ApiError::NoBuilds(format!("{project} {version}")))
    }
    /// Highest numbered build of `version` on the default channel.
    pub async fn latest_stable_build(&self, project: &str, version: &str) -> Result<VersionBuild, ApiError> {
        let builds = self.version_builds(project, version).await?;
        builds
            .builds
            .into_iter()
            .filter(|build| build.channel == Channel::Default)
            .max_by_key(|build| build.build)
            .ok_or_else(|| ApiError::NoBuilds(format!("{project} {version} (stable)")))
    }
    /// Downloads the application jar of a build, verified against its SHA-256.
    pub async fn download_build(
        &self,
        project: &str,
        version: &str,
        build: u32,
        path: impl Into<PathBuf>,
    ) -> Result<Checksums, ApiError> {
        let info = self.build(project, version, build).await?;
        self.download_artifact(project, version, build, &info.downloads.application, path).await
    }
    pub async fn download_latest(&self, project: &str, version: &str, path: impl Into<PathBuf>) -> Result<Checksums, ApiError> {
        let latest = self.latest_stable_build(project, version).await?;
        log::info!("Latest stable {project} build for {version} is {}", latest.build);
        self.download_artifact(project, version, latest.build, &latest.downloads.application, path)
            .await
    }
    async fn download_artifact(
        &self,
        project: &str,
        version: &str,
        build: u32,
        artifact: &Artifact,
        path: impl Into<PathBuf>,
    ) -> Result<Checksums, ApiError> {
        let build = build.to_string();
        let url = endpoint(
            &self.base,
            &["projects", project, "versions", version, "builds", &build, "downloads", &artifact.name],
        )?;
        let checksums = Download::new_from_url(url)
            .with_output_file(path)
            .with_checksum(Checksum::new_inner(&artifact.sha256, CsType::Sha256))
            .start(&self.client)
            .await?;
        Ok(checksums)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_build() {
        let build: Build = serde_json::from_str(
            r#"{
                "project_id": "paper",
                "project_name": "Paper",
                "version": "1.20.4",
                "build": 496,
                "time": "2024-04-25T10:00:00.000Z",
                "channel": "default",
                "promoted": false,
                "changes": [{"commit": "abc", "summary": "Fix", "message": "Fix things"}],
                "downloads": {
                    "application": {"name": "paper-1.20.4-496.jar", "sha256": "00ff"},
                    "mojang-mappings": {"name": "mappings.txt", "sha256": "11ee"}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(build.build, 496);
        assert_eq!(build.channel, Channel::Default);
        assert_eq!(build.downloads.application.name, "paper-1.20.4-496.jar");
        assert_eq!(build.downloads.mojang_mappings.unwrap().sha256, "11ee");
    }

    #[test]
    fn unknown_channel_keeps_its_name() {
        let channel: Channel = serde_json::from_str(r#""alpha""#).unwrap();
        assert_eq!(channel, Channel::Other("alpha".to_owned()));
        assert_eq!(serde_json::to_string(&channel).unwrap(), r#""alpha""#);
        let channel: Channel = serde_json::from_str(r#""experimental""#).unwrap();
        assert_eq!(channel, Channel::Experimental);
    }
}
