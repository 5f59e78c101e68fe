#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use pictogram_backend::config::Config;
use pictogram_backend::services::documents::DocumentStore;
use pictogram_backend::services::mapping_store::MappingStore;
use pictogram_backend::services::normalizer::{Lemmatizer, Normalizer};
use pictogram_backend::services::pictograms::{PictogramError, PictogramFetcher, PictogramSource};
use pictogram_backend::services::synonyms::SynonymSource;
use pictogram_backend::services::word_images::WordImageService;
use pictogram_backend::state::AppState;

/// Table-driven lemmatizer; unknown tokens map to themselves.
pub struct StubLemmatizer(pub HashMap<String, String>);

impl Lemmatizer for StubLemmatizer {
    fn lemmatize(&self, token: &str) -> String {
        self.0.get(token).cloned().unwrap_or_else(|| token.to_string())
    }
}

/// Search results keyed by term; downloads return `image-{id}`.
pub struct StubPictograms(pub HashMap<String, Vec<u64>>);

#[async_trait]
impl PictogramSource for StubPictograms {
    async fn search(&self, term: &str) -> Result<Vec<u64>, PictogramError> {
        Ok(self.0.get(term).cloned().unwrap_or_default())
    }

    async fn download(&self, id: u64) -> Result<Bytes, PictogramError> {
        Ok(Bytes::from(format!("image-{id}")))
    }
}

pub struct StubSynonyms(pub HashMap<String, Vec<String>>);

#[async_trait]
impl SynonymSource for StubSynonyms {
    async fn top_synonyms(&self, base_form: &str, limit: usize) -> Vec<String> {
        let mut found = self.0.get(base_form).cloned().unwrap_or_default();
        found.truncate(limit);
        found
    }
}

pub struct Fixture {
    pub lemmas: Vec<(&'static str, &'static str)>,
    pub pictograms: Vec<(&'static str, Vec<u64>)>,
    pub synonyms: Vec<(&'static str, Vec<&'static str>)>,
    pub synonym_fallback: bool,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            lemmas: vec![("cats", "cat")],
            pictograms: vec![("cat", vec![101, 102])],
            synonyms: Vec::new(),
            synonym_fallback: true,
        }
    }
}

pub struct TestApp {
    pub dir: TempDir,
    pub config: Config,
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn public_dir(&self) -> PathBuf {
        self.config.public_dir.clone()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn read_json(&self, path: impl Into<PathBuf>) -> Value {
        let bytes = tokio::fs::read(path.into()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with(Fixture::default()).await
}

pub async fn create_test_app_with(fixture: Fixture) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_root(dir.path());
    tokio::fs::create_dir_all(&config.public_dir).await.unwrap();

    let lemmas = fixture
        .lemmas
        .into_iter()
        .map(|(form, lemma)| (form.to_string(), lemma.to_string()))
        .collect();
    let pictograms = fixture
        .pictograms
        .into_iter()
        .map(|(term, ids)| (term.to_string(), ids))
        .collect();
    let synonyms = fixture
        .synonyms
        .into_iter()
        .map(|(term, list)| (term.to_string(), list.into_iter().map(String::from).collect()))
        .collect();

    let normalizer = Normalizer::new(Arc::new(StubLemmatizer(lemmas)));
    let fetcher = PictogramFetcher::new(Arc::new(StubPictograms(pictograms)), config.images_dir());
    let mapping = Arc::new(
        MappingStore::open(config.word_images_path(), config.file_names_path()).await,
    );
    let service = WordImageService::new(
        normalizer,
        Arc::new(StubSynonyms(synonyms)),
        fetcher,
        mapping,
    )
    .with_synonym_fallback(fixture.synonym_fallback);

    let state = AppState::new(service, DocumentStore::new(config.public_dir.clone()));
    let router = pictogram_backend::build_app(state.clone(), &config.cors_origins);

    TestApp {
        dir,
        config,
        state,
        router,
    }
}

/// A `multipart/form-data` request carrying one file field.
pub fn multipart_request(uri: &str, field: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let boundary = "----pictogram-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}
