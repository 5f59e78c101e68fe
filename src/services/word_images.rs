use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::json_file::JsonFileError;
use super::mapping_store::MappingStore;
use super::normalizer::Normalizer;
use super::pictograms::{PictogramError, PictogramFetcher};
use super::synonyms::{SynonymSource, DEFAULT_SYNONYM_COUNT};

#[derive(Debug, Error)]
pub enum WordImagesError {
    #[error("No word provided")]
    MissingInput,
    #[error("No images found for the word")]
    NotFound { base_form: String },
    #[error(transparent)]
    Pictogram(PictogramError),
    #[error("failed to save word mapping: {0}")]
    Persist(#[from] JsonFileError),
}

/// Result of resolving a word: the term the images were stored under and
/// their filenames inside `images/{word}/`.
///
/// After a synonym fallback `word` is the synonym, not the base form, while
/// the mapping entry stays keyed by the submitted word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordImages {
    pub word: String,
    pub images: Vec<String>,
}

/// Word → pictograms pipeline: normalize, fetch, fall back to synonyms when
/// nothing matched, then record the filenames under the submitted word.
#[derive(Clone)]
pub struct WordImageService {
    normalizer: Normalizer,
    synonyms: Arc<dyn SynonymSource>,
    fetcher: PictogramFetcher,
    mapping: Arc<MappingStore>,
    synonym_count: usize,
    synonym_fallback: bool,
}

impl WordImageService {
    pub fn new(
        normalizer: Normalizer,
        synonyms: Arc<dyn SynonymSource>,
        fetcher: PictogramFetcher,
        mapping: Arc<MappingStore>,
    ) -> Self {
        Self {
            normalizer,
            synonyms,
            fetcher,
            mapping,
            synonym_count: DEFAULT_SYNONYM_COUNT,
            synonym_fallback: true,
        }
    }

    pub fn with_synonym_count(mut self, count: usize) -> Self {
        self.synonym_count = count;
        self
    }

    pub fn with_synonym_fallback(mut self, enabled: bool) -> Self {
        self.synonym_fallback = enabled;
        self
    }

    pub fn mapping(&self) -> Arc<MappingStore> {
        Arc::clone(&self.mapping)
    }

    pub async fn resolve(&self, word: &str) -> Result<WordImages, WordImagesError> {
        if word.trim().is_empty() {
            return Err(WordImagesError::MissingInput);
        }

        let base_form = self.normalizer.base_form(word);
        debug!(word, %base_form, "word normalized");

        let (term, images) = match self.fetcher.fetch(&base_form).await {
            Ok(images) => (base_form, images),
            Err(PictogramError::NoImagesFound(_)) if self.synonym_fallback => {
                self.fetch_via_synonyms(&base_form).await?
            }
            Err(PictogramError::NoImagesFound(_)) => {
                return Err(WordImagesError::NotFound { base_form })
            }
            Err(other) => return Err(WordImagesError::Pictogram(other)),
        };

        let total = self.mapping.record(word, &images).await?;
        info!(word, %term, added = images.len(), total = total.len(), "word images resolved");

        Ok(WordImages { word: term, images })
    }

    async fn fetch_via_synonyms(
        &self,
        base_form: &str,
    ) -> Result<(String, Vec<String>), WordImagesError> {
        let synonyms = self
            .synonyms
            .top_synonyms(base_form, self.synonym_count)
            .await;

        for synonym in synonyms {
            match self.fetcher.fetch(&synonym).await {
                Ok(images) => {
                    info!(base_form, %synonym, "pictograms found via synonym");
                    return Ok((synonym, images));
                }
                Err(PictogramError::NoImagesFound(_) | PictogramError::InvalidTerm(_)) => {
                    debug!(base_form, %synonym, "synonym has no pictograms");
                }
                Err(other) => return Err(WordImagesError::Pictogram(other)),
            }
        }

        Err(WordImagesError::NotFound {
            base_form: base_form.to_string(),
        })
    }
}
