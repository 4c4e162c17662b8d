use crate::{
    downloader::{
        verify::{Checksum, Checksums},
        Download,
    },
    error::{ApiError, DownloadError},
};
use reqwest::{header::HeaderMap, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use serde::de::DeserializeOwned;
use std::{path::PathBuf, sync::Arc, time::Duration};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(6);

/// HTTP client shared by every provider. Cloning is cheap.
///
/// No retry middleware is installed by default. Callers wanting a retry policy
/// build their own [`ClientWithMiddleware`] and pass it to [`Client::from_middleware`].
#[derive(Clone)]
pub struct Client {
    http: ClientWithMiddleware,
    headers: Option<Arc<HeaderMap>>,
}

impl Client {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::ClientBuilder::new().connect_timeout(CONNECT_TIMEOUT).build()?;
        Ok(Self::from_middleware(ClientBuilder::new(client).build()))
    }
    pub fn from_middleware(http: ClientWithMiddleware) -> Self {
        Self { http, headers: None }
    }
    /// Headers sent with every request, e.g. to bypass upstream caches.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers.into());
        self
    }
    pub async fn download_with_checksums(
        &self,
        url: impl AsRef<str>,
        path: impl Into<PathBuf>,
        checksum: Checksum,
    ) -> Result<Checksums, DownloadError> {
        Download::new(url)?
            .with_output_file(path)
            .with_checksum(checksum)
            .start(self)
            .await
    }
    pub(crate) fn get(&self, url: Url, headers: Option<&HeaderMap>) -> RequestBuilder {
        let mut request = self.http.get(url);
        if let Some(shared) = &self.headers {
            request = request.headers((**shared).clone());
        }
        if let Some(headers) = headers {
            request = request.headers(headers.clone());
        }
        request
    }
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        log::debug!("Fetching {url}");
        let response = self.get(url, None).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Appends path segments to a base URL, escaping each one.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    if !segments.is_empty() {
        url.path_segments_mut()
            .map_err(|_| ApiError::URLParse)?
            .pop_if_empty()
            .extend(segments);
    }
    Ok(url)
}
