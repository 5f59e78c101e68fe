use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_SYNONYM_COUNT: usize = 3;

const SYNONYM_RELATION: &str = "Synonym";

#[derive(Debug, Error)]
pub enum SynonymError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}")]
    HttpStatus { status: reqwest::StatusCode },
}

/// Source of synonym labels for a base form.
///
/// Remote failures are not surfaced: a lookup that cannot be answered
/// yields an empty list.
#[async_trait]
pub trait SynonymSource: Send + Sync {
    async fn top_synonyms(&self, base_form: &str, limit: usize) -> Vec<String>;
}

#[derive(Debug, Default, Deserialize)]
struct ConceptResponse {
    #[serde(default)]
    edges: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
struct Edge {
    #[serde(default)]
    rel: Option<Relation>,
    #[serde(default)]
    start: Option<Node>,
    #[serde(default)]
    end: Option<Node>,
}

#[derive(Debug, Deserialize)]
struct Relation {
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Node {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    language: Option<String>,
}

impl Node {
    fn english_label(&self) -> Option<&str> {
        match self.language.as_deref() {
            Some(lang) if lang != "en" => None,
            _ => self.label.as_deref(),
        }
    }
}

/// ConceptNet client. Edges are read from `/c/en/{term}`.
#[derive(Clone)]
pub struct ConceptNetClient {
    base_url: String,
    client: reqwest::Client,
}

impl ConceptNetClient {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn fetch(&self, term: &str) -> Result<ConceptResponse, SynonymError> {
        let url = format!("{}/c/en/{}", self.base_url, urlencoding::encode(term));
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SynonymError::HttpStatus { status });
        }
        Ok(response.json::<ConceptResponse>().await?)
    }
}

#[async_trait]
impl SynonymSource for ConceptNetClient {
    async fn top_synonyms(&self, base_form: &str, limit: usize) -> Vec<String> {
        match self.fetch(base_form).await {
            Ok(concept) => {
                let synonyms = collect_synonyms(&concept, base_form, limit);
                debug!(base_form, ?synonyms, "synonyms resolved");
                synonyms
            }
            Err(error) => {
                warn!(base_form, %error, "synonym lookup failed");
                Vec::new()
            }
        }
    }
}

/// Distinct labels of the `Synonym` neighbours of `base_form`, in the order
/// the edges were returned, truncated to `limit`.
fn collect_synonyms(concept: &ConceptResponse, base_form: &str, limit: usize) -> Vec<String> {
    let mut synonyms: Vec<String> = Vec::new();

    for edge in &concept.edges {
        if synonyms.len() >= limit {
            break;
        }
        let is_synonym = edge
            .rel
            .as_ref()
            .and_then(|rel| rel.label.as_deref())
            .is_some_and(|label| label == SYNONYM_RELATION);
        if !is_synonym {
            continue;
        }

        let start = edge.start.as_ref().and_then(Node::english_label);
        let end = edge.end.as_ref().and_then(Node::english_label);
        let neighbour = match (start, end) {
            (Some(s), Some(e)) if s.eq_ignore_ascii_case(base_form) => e,
            (Some(s), _) => s,
            (None, Some(e)) => e,
            (None, None) => continue,
        };

        if neighbour.eq_ignore_ascii_case(base_form) || synonyms.iter().any(|s| s == neighbour) {
            continue;
        }
        synonyms.push(neighbour.to_string());
    }

    synonyms
}
