use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::config::Config;
use crate::services::documents::DocumentStore;
use crate::services::mapping_store::MappingStore;
use crate::services::normalizer::Normalizer;
use crate::services::pictograms::{ArasaacClient, PictogramFetcher};
use crate::services::synonyms::ConceptNetClient;
use crate::services::word_images::WordImageService;
use crate::services::http_client;

const DEFAULT_UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    word_images: Arc<WordImageService>,
    documents: Arc<DocumentStore>,
    upload_limit: usize,
}

impl AppState {
    pub fn new(word_images: WordImageService, documents: DocumentStore) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            word_images: Arc::new(word_images),
            documents: Arc::new(documents),
            upload_limit: DEFAULT_UPLOAD_LIMIT,
        }
    }

    /// Wires the production services: the English lemmatizer, ConceptNet,
    /// ARASAAC and the on-disk stores. The mapping files are read here, once.
    pub async fn from_config(config: &Config) -> Self {
        let client = http_client(config.outbound_timeout);

        let normalizer = Normalizer::english(config.lemma_lookup_path.as_deref());
        let synonyms = Arc::new(ConceptNetClient::new(
            config.conceptnet_url.clone(),
            client.clone(),
        ));
        let source = Arc::new(ArasaacClient::new(
            config.arasaac_api_url.clone(),
            config.arasaac_static_url.clone(),
            client,
        ));
        let fetcher = PictogramFetcher::new(source, config.images_dir());
        let mapping = Arc::new(
            MappingStore::open(config.word_images_path(), config.file_names_path()).await,
        );

        let word_images = WordImageService::new(normalizer, synonyms, fetcher, mapping)
            .with_synonym_count(config.synonym_count)
            .with_synonym_fallback(config.synonym_fallback);

        Self::new(word_images, DocumentStore::new(config.public_dir.clone()))
            .with_upload_limit(config.upload_limit)
    }

    pub fn with_upload_limit(mut self, limit: usize) -> Self {
        self.upload_limit = limit;
        self
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn word_images(&self) -> Arc<WordImageService> {
        Arc::clone(&self.word_images)
    }

    pub fn mapping(&self) -> Arc<MappingStore> {
        self.word_images.mapping()
    }

    pub fn documents(&self) -> Arc<DocumentStore> {
        Arc::clone(&self.documents)
    }

    pub fn upload_limit(&self) -> usize {
        self.upload_limit
    }
}
