use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Upper bound on images downloaded per fetch.
pub const MAX_PICTOGRAMS: usize = 5;

const IMAGE_RESOLUTION: u32 = 500;

#[derive(Debug, Error)]
pub enum PictogramError {
    #[error("no images found for '{0}'")]
    NoImagesFound(String),
    #[error("invalid search term: {0:?}")]
    InvalidTerm(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Remote pictogram catalogue: search by term, download by identifier.
#[async_trait]
pub trait PictogramSource: Send + Sync {
    async fn search(&self, term: &str) -> Result<Vec<u64>, PictogramError>;

    async fn download(&self, id: u64) -> Result<Bytes, PictogramError>;
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_id")]
    id: u64,
}

/// ARASAAC search API plus its static image host.
#[derive(Clone)]
pub struct ArasaacClient {
    api_url: String,
    static_url: String,
    client: reqwest::Client,
}

impl ArasaacClient {
    pub fn new(
        api_url: impl Into<String>,
        static_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            static_url: static_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn image_url(&self, id: u64) -> String {
        format!(
            "{}/pictograms/{id}/{id}_{IMAGE_RESOLUTION}.png",
            self.static_url
        )
    }
}

#[async_trait]
impl PictogramSource for ArasaacClient {
    async fn search(&self, term: &str) -> Result<Vec<u64>, PictogramError> {
        let url = format!(
            "{}/pictograms/en/search/{}",
            self.api_url,
            urlencoding::encode(term)
        );
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PictogramError::HttpStatus { status, url });
        }
        let hits: Vec<SearchHit> = response.json().await?;
        Ok(hits.into_iter().map(|hit| hit.id).collect())
    }

    async fn download(&self, id: u64) -> Result<Bytes, PictogramError> {
        let url = self.image_url(id);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PictogramError::HttpStatus { status, url });
        }
        Ok(response.bytes().await?)
    }
}

/// Downloads pictograms for a term into `{images_dir}/{term}/{term}_{i}.png`.
///
/// Files from an earlier fetch of the same term are overwritten by index.
#[derive(Clone)]
pub struct PictogramFetcher {
    source: Arc<dyn PictogramSource>,
    images_dir: PathBuf,
}

impl PictogramFetcher {
    pub fn new(source: Arc<dyn PictogramSource>, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            images_dir: images_dir.into(),
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Returns the filenames written, in result order. A failed or empty
    /// search is `NoImagesFound`; a failed download aborts the batch.
    pub async fn fetch(&self, term: &str) -> Result<Vec<String>, PictogramError> {
        validate_term(term)?;

        let folder = self.images_dir.join(term);
        tokio::fs::create_dir_all(&folder)
            .await
            .map_err(|source| PictogramError::Io {
                path: folder.clone(),
                source,
            })?;

        let ids = match self.source.search(term).await {
            Ok(ids) if !ids.is_empty() => ids,
            Ok(_) => return Err(PictogramError::NoImagesFound(term.to_string())),
            Err(error) => {
                warn!(term, %error, "pictogram search failed");
                return Err(PictogramError::NoImagesFound(term.to_string()));
            }
        };

        let mut filenames = Vec::with_capacity(ids.len().min(MAX_PICTOGRAMS));
        for (index, id) in ids.into_iter().take(MAX_PICTOGRAMS).enumerate() {
            let data = self.source.download(id).await?;
            let filename = format!("{term}_{index}.png");
            let path = folder.join(&filename);
            tokio::fs::write(&path, &data)
                .await
                .map_err(|source| PictogramError::Io { path, source })?;
            debug!(term, id, %filename, bytes = data.len(), "pictogram saved");
            filenames.push(filename);
        }

        info!(term, count = filenames.len(), "pictograms downloaded");
        Ok(filenames)
    }
}

/// The term becomes a directory name, so anything that could escape
/// `images_dir` is rejected.
fn validate_term(term: &str) -> Result<(), PictogramError> {
    let unsafe_term = term.trim().is_empty()
        || term == "."
        || term == ".."
        || term.contains(&['/', '\\', '\0'][..]);
    if unsafe_term {
        return Err(PictogramError::InvalidTerm(term.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSource {
        ids: Vec<u64>,
        fail_download_at: Option<u64>,
        downloads: AtomicUsize,
    }

    impl FakeSource {
        fn with_ids(ids: Vec<u64>) -> Self {
            Self {
                ids,
                fail_download_at: None,
                downloads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PictogramSource for FakeSource {
        async fn search(&self, _term: &str) -> Result<Vec<u64>, PictogramError> {
            Ok(self.ids.clone())
        }

        async fn download(&self, id: u64) -> Result<Bytes, PictogramError> {
            self.downloads.fetch_add(1, Ordering::SeqCst);
            if self.fail_download_at == Some(id) {
                return Err(PictogramError::HttpStatus {
                    status: reqwest::StatusCode::BAD_GATEWAY,
                    url: format!("fake://{id}"),
                });
            }
            Ok(Bytes::from(format!("png-{id}")))
        }
    }

    #[tokio::test]
    async fn test_fetch_caps_at_five() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(FakeSource::with_ids((1..=8).collect()));
        let fetcher = PictogramFetcher::new(source.clone(), dir.path());

        let names = fetcher.fetch("dog").await.unwrap();
        assert_eq!(
            names,
            vec!["dog_0.png", "dog_1.png", "dog_2.png", "dog_3.png", "dog_4.png"]
        );
        assert_eq!(source.downloads.load(Ordering::SeqCst), 5);

        let saved = tokio::fs::read(dir.path().join("dog").join("dog_4.png")).await.unwrap();
        assert_eq!(saved, b"png-5");
    }

    #[tokio::test]
    async fn test_empty_search_is_no_images_found() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = PictogramFetcher::new(Arc::new(FakeSource::with_ids(vec![])), dir.path());

        let err = fetcher.fetch("zzz").await.unwrap_err();
        assert!(matches!(err, PictogramError::NoImagesFound(term) if term == "zzz"));
        assert!(dir.path().join("zzz").is_dir());
    }

    #[tokio::test]
    async fn test_download_failure_aborts_batch() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(FakeSource {
            ids: vec![10, 11, 12],
            fail_download_at: Some(11),
            downloads: AtomicUsize::new(0),
        });
        let fetcher = PictogramFetcher::new(source.clone(), dir.path());

        let err = fetcher.fetch("cup").await.unwrap_err();
        assert!(matches!(err, PictogramError::HttpStatus { .. }));
        assert_eq!(source.downloads.load(Ordering::SeqCst), 2);
        assert!(dir.path().join("cup").join("cup_0.png").exists());
        assert!(!dir.path().join("cup").join("cup_2.png").exists());
    }

    #[tokio::test]
    async fn test_rejects_path_like_terms() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = PictogramFetcher::new(Arc::new(FakeSource::with_ids(vec![1])), dir.path());

        for term in ["..", "../etc", "a/b", " ", "c\\d"] {
            let err = fetcher.fetch(term).await.unwrap_err();
            assert!(matches!(err, PictogramError::InvalidTerm(_)), "{term}");
        }
    }

    #[test]
    fn test_image_url_shape() {
        let client = ArasaacClient::new(
            "https://api.example/api/",
            "https://static.example",
            reqwest::Client::new(),
        );
        assert_eq!(
            client.image_url(2349),
            "https://static.example/pictograms/2349/2349_500.png"
        );
    }
}
