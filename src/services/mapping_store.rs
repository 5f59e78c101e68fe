use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::json_file::{read_json_lenient, write_json, JsonFileError};

#[derive(Debug, Default)]
struct MappingState {
    word_images: BTreeMap<String, Vec<String>>,
    file_names: Value,
}

/// Word → image filenames, plus the `file_names` registry that is persisted
/// alongside it.
///
/// Both documents are read once when the store is opened. Every `record`
/// rewrites both files in full while holding the state lock, so concurrent
/// updates are applied one after the other.
pub struct MappingStore {
    word_images_path: PathBuf,
    file_names_path: PathBuf,
    state: Mutex<MappingState>,
}

impl MappingStore {
    pub async fn open(word_images_path: impl Into<PathBuf>, file_names_path: impl Into<PathBuf>) -> Self {
        let word_images_path = word_images_path.into();
        let file_names_path = file_names_path.into();

        let word_images: BTreeMap<String, Vec<String>> =
            read_json_lenient(&word_images_path).await.unwrap_or_default();
        let file_names: Value = read_json_lenient(&file_names_path)
            .await
            .unwrap_or_else(|| Value::Object(Default::default()));

        info!(
            path = %word_images_path.display(),
            words = word_images.len(),
            "word image mapping loaded"
        );

        Self {
            word_images_path,
            file_names_path,
            state: Mutex::new(MappingState {
                word_images,
                file_names,
            }),
        }
    }

    /// Appends `filenames` to the entry for `word` and persists both
    /// documents. Returns the full list now stored for `word`.
    ///
    /// When either write fails the append is undone in memory, so the map
    /// never holds entries that were not persisted.
    pub async fn record(&self, word: &str, filenames: &[String]) -> Result<Vec<String>, JsonFileError> {
        let mut state = self.state.lock().await;

        let previous_len = state.word_images.get(word).map(Vec::len);
        let entry = state.word_images.entry(word.to_string()).or_default();
        entry.extend(filenames.iter().cloned());
        let updated = entry.clone();

        let persisted = self.persist(&state).await;
        if let Err(err) = persisted {
            match previous_len {
                Some(len) => {
                    if let Some(entry) = state.word_images.get_mut(word) {
                        entry.truncate(len);
                    }
                }
                None => {
                    state.word_images.remove(word);
                }
            }
            warn!(word, error = %err, "word mapping not persisted, append rolled back");
            return Err(err);
        }

        debug!(word, added = filenames.len(), total = updated.len(), "word mapping recorded");
        Ok(updated)
    }

    async fn persist(&self, state: &MappingState) -> Result<(), JsonFileError> {
        write_json(&self.file_names_path, &state.file_names).await?;
        write_json(&self.word_images_path, &state.word_images).await
    }

    pub async fn images_for(&self, word: &str) -> Vec<String> {
        let state = self.state.lock().await;
        state.word_images.get(word).cloned().unwrap_or_default()
    }

    pub async fn word_count(&self) -> usize {
        self.state.lock().await.word_images.len()
    }
}
