use crate::{
    client::Client,
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

static MANIFEST_URL: Lazy<Url> =
    Lazy::new(|| Url::parse("https://piston-meta.mojang.com/mc/game/version_manifest_v2.json").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub latest: Latest,
    pub versions: Vec<ManifestVersion>,
}

impl Manifest {
    pub fn find(&self, id: &str) -> Option<&ManifestVersion> {
        self.versions.iter().find(|version| version.id == id)
    }
    pub fn latest_release(&self) -> Option<&ManifestVersion> {
        self.find(&self.latest.release)
    }
    pub fn latest_snapshot(&self) -> Option<&ManifestVersion> {
        self.find(&self.latest.snapshot)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Latest {
    pub release: String,
    pub snapshot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestVersion {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: VersionType,
    pub url: String,
    pub time: DateTime<Utc>,
    pub release_time: DateTime<Utc>,
    pub sha1: String,
    pub compliance_level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    Release,
    Snapshot,
    OldBeta,
    OldAlpha,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionDetails {
    pub id: String,
    pub downloads: VersionDownloads,
}

/// Very old versions have no server jar and no mappings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionDownloads {
    pub client: Artifact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_mappings: Option<Artifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<Artifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_mappings: Option<Artifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub sha1: String,
    pub size: u64,
    pub url: String,
}

/// Client for Mojang's piston-meta version manifest.
#[derive(Clone)]
pub struct Vanilla {
    client: Client,
    manifest_url: Url,
}

impl Vanilla {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            manifest_url: MANIFEST_URL.clone(),
        }
    }
    pub fn with_manifest_url(mut self, url: Url) -> Self {
        self.manifest_url = url;
        self
    }
    pub async fn manifest(&self) -> Result<Manifest, ApiError> {
        self.client.get_json(self.manifest_url.clone()).await
    }
    pub async fn version(&self, entry: &ManifestVersion) -> Result<VersionDetails, ApiError> {
        let url = Url::parse(&entry.url).map_err(|_| ApiError::URLParse)?;
        self.client.get_json(url).await
    }
    pub async fn version_by_id(&self, manifest: &Manifest, id: &str) -> Result<VersionDetails, ApiError> {
        let entry = manifest.find(id).ok_or_else(|| ApiError::NotFound(id.to_owned()))?;
        self.version(entry).await
    }
    /// Downloads the dedicated server jar, verified against its SHA-1.
    pub async fn download_server(&self, manifest: &Manifest, id: &str, path: impl Into<PathBuf>) -> Result<Checksums, ApiError> {
        let details = self.version_by_id(manifest, id).await?;
        let server = details.downloads.server.as_ref().ok_or_else(|| ApiError::MissingArtifact {
            version: id.to_owned(),
            artifact: "server",
        })?;
        self.download_artifact(server, path).await
    }
    /// Downloads the client jar, verified against its SHA-1.
    pub async fn download_client(&self, manifest: &Manifest, id: &str, path: impl Into<PathBuf>) -> Result<Checksums, ApiError> {
        let details = self.version_by_id(manifest, id).await?;
        self.download_artifact(&details.downloads.client, path).await
    }
    async fn download_artifact(&self, artifact: &Artifact, path: impl Into<PathBuf>) -> Result<Checksums, ApiError> {
        let checksums = Download::new(&artifact.url)?
            .with_output_file(path)
            .with_checksum(Checksum::new_inner(&artifact.sha1, CsType::Sha1))
            .start(&self.client)
            .await?;
        Ok(checksums)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> Manifest {
        serde_json::from_str(
            r#"{
                "latest": {"release": "1.20.4", "snapshot": "24w14a"},
                "versions": [
                    {"id": "24w14a", "type": "snapshot", "url": "https://example.com/24w14a.json",
                     "time": "2024-04-03T12:00:00+00:00", "releaseTime": "2024-04-03T11:00:00+00:00",
                     "sha1": "aa", "complianceLevel": 1},
                    {"id": "1.20.4", "type": "release", "url": "https://example.com/1.20.4.json",
                     "time": "2023-12-07T12:00:00+00:00", "releaseTime": "2023-12-07T11:00:00+00:00",
                     "sha1": "bb", "complianceLevel": 1},
                    {"id": "b1.7.3", "type": "old_beta", "url": "https://example.com/b1.7.3.json",
                     "time": "2011-07-08T00:00:00+00:00", "releaseTime": "2011-07-08T00:00:00+00:00",
                     "sha1": "cc", "complianceLevel": 0}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn resolves_latest_versions() {
        let manifest = manifest();
        assert_eq!(manifest.latest_release().unwrap().id, "1.20.4");
        assert_eq!(manifest.latest_snapshot().unwrap().version_type, VersionType::Snapshot);
        assert_eq!(manifest.find("b1.7.3").unwrap().version_type, VersionType::OldBeta);
        assert!(manifest.find("1.99").is_none());
    }

    #[test]
    fn unknown_version_type_round_trips() {
        let version_type: VersionType = serde_json::from_str(r#""experiment""#).unwrap();
        assert_eq!(version_type, VersionType::Other("experiment".to_owned()));
        assert_eq!(serde_json::to_string(&version_type).unwrap(), r#""experiment""#);
        let version_type: VersionType = serde_json::from_str(r#""old_alpha""#).unwrap();
        assert_eq!(version_type, VersionType::OldAlpha);
    }

    #[test]
    fn details_without_server() {
        let details: VersionDetails = serde_json::from_str(
            r#"{"id": "a1.0.4", "downloads": {"client": {"sha1": "dd", "size": 10, "url": "https://example.com/c.jar"}}}"#,
        )
        .unwrap();
        assert!(details.downloads.server.is_none());
        assert_eq!(details.downloads.client.size, 10);
    }
}
