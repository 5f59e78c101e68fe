use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::json_file::{read_json, write_json, JsonFileError};

const QUESTIONS_FILE: &str = "questions.json";
const MATCH_FILE: &str = "match.json";
const SETTINGS_FILE: &str = "settings_quiz.json";
const SELECTIONS_FILE: &str = "selected_images.json";
const SYMBOLS_FILE: &str = "symbols.json";
const SYMBOLS_DIR: &str = "symbols";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("{0}")]
    MissingInput(String),
    #[error("invalid file name: {0:?}")]
    InvalidName(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Image with the name '{0}' already exists. Please rename your file and try again.")]
    Conflict(String),
    #[error("Corrupted {0} file")]
    Corrupt(String),
    #[error(transparent)]
    File(#[from] JsonFileError),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One saved sentence with the pictograms chosen for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedImages {
    pub sentence: String,
    pub image_names: Vec<String>,
}

/// JSON documents shared with the front-end's public folder.
///
/// Whole-document writes (questions, match, settings) replace the file.
/// Appends (selection log, symbol registry) hold `write_lock` for the
/// read-modify-write span.
pub struct DocumentStore {
    public_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl DocumentStore {
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    pub fn questions_path(&self) -> PathBuf {
        self.public_dir.join(QUESTIONS_FILE)
    }

    pub fn match_path(&self) -> PathBuf {
        self.public_dir.join(MATCH_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.public_dir.join(SETTINGS_FILE)
    }

    pub fn selections_path(&self) -> PathBuf {
        self.public_dir.join(SELECTIONS_FILE)
    }

    pub fn symbols_registry_path(&self) -> PathBuf {
        self.public_dir.join(SYMBOLS_FILE)
    }

    pub fn symbols_dir(&self) -> PathBuf {
        self.public_dir.join(SYMBOLS_DIR)
    }

    pub async fn save_questions(&self, questions: &Value) -> Result<(), DocumentError> {
        write_json(&self.questions_path(), questions).await?;
        debug!("question set saved");
        Ok(())
    }

    pub async fn save_match(&self, match_set: &Value) -> Result<(), DocumentError> {
        write_json(&self.match_path(), match_set).await?;
        debug!("match set saved");
        Ok(())
    }

    pub async fn load_settings(&self) -> Result<Value, DocumentError> {
        let path = self.settings_path();
        read_json(&path)
            .await?
            .ok_or_else(|| DocumentError::NotFound(format!("{} not found", path.display())))
    }

    pub async fn save_settings(&self, settings: &Value) -> Result<(), DocumentError> {
        write_json(&self.settings_path(), settings).await?;
        debug!("quiz settings saved");
        Ok(())
    }

    /// Appends an entry to the selection log, creating it when absent.
    /// Returns the number of entries now in the log.
    pub async fn append_selection(&self, entry: SelectedImages) -> Result<usize, DocumentError> {
        let _guard = self.write_lock.lock().await;
        let path = self.selections_path();

        let mut log: Vec<Value> = read_json(&path).await?.unwrap_or_default();
        log.push(serde_json::to_value(&entry).map_err(JsonFileError::from)?);
        write_json(&path, &log).await?;

        debug!(entries = log.len(), "sentence selection saved");
        Ok(log.len())
    }

    /// Truncates the selection log to `[]`. The log must already exist.
    pub async fn clear_selections(&self) -> Result<(), DocumentError> {
        let _guard = self.write_lock.lock().await;
        let path = self.selections_path();

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|source| DocumentError::Io {
                path: path.clone(),
                source,
            })?;
        if !exists {
            return Err(DocumentError::NotFound("File not found".to_string()));
        }

        write_json(&path, &Vec::<Value>::new()).await?;
        info!("sentence selections cleared");
        Ok(())
    }

    /// Stores an uploaded symbol under `symbols/` and registers its name.
    /// A name already in the registry is rejected without touching either.
    pub async fn store_symbol(&self, filename: &str, data: &[u8]) -> Result<(), DocumentError> {
        if filename.trim().is_empty() {
            return Err(DocumentError::MissingInput("No file uploaded".to_string()));
        }
        if !is_plain_file_name(filename) {
            return Err(DocumentError::InvalidName(filename.to_string()));
        }

        let _guard = self.write_lock.lock().await;
        let registry_path = self.symbols_registry_path();

        let mut symbols: Vec<String> = match read_json(&registry_path).await {
            Ok(symbols) => symbols.unwrap_or_default(),
            Err(err) if err.is_parse() => {
                return Err(DocumentError::Corrupt(SYMBOLS_FILE.to_string()))
            }
            Err(err) => return Err(err.into()),
        };

        if symbols.iter().any(|name| name == filename) {
            return Err(DocumentError::Conflict(filename.to_string()));
        }

        let dir = self.symbols_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| DocumentError::Io {
                path: dir.clone(),
                source,
            })?;
        let target = dir.join(filename);
        tokio::fs::write(&target, data)
            .await
            .map_err(|source| DocumentError::Io {
                path: target.clone(),
                source,
            })?;

        symbols.push(filename.to_string());
        write_json(&registry_path, &symbols).await?;

        info!(filename, bytes = data.len(), "symbol uploaded");
        Ok(())
    }
}

fn is_plain_file_name(name: &str) -> bool {
    name != "." && name != ".." && !name.contains(&['/', '\\', '\0'][..])
}
