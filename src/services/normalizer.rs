use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

/// Maps one lowercased token to its dictionary form.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, token: &str) -> String;
}

/// Reduces surface words to their base form.
///
/// Built once at start-up and shared through `AppState`; the lemmatizer it
/// wraps is never reloaded.
#[derive(Clone)]
pub struct Normalizer {
    lemmatizer: Arc<dyn Lemmatizer>,
}

impl Normalizer {
    pub fn new(lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        Self { lemmatizer }
    }

    /// English rule lemmatizer, optionally extended with a lookup table.
    pub fn english(lookup_path: Option<&Path>) -> Self {
        let lemmatizer = match lookup_path {
            Some(path) => RuleLemmatizer::with_lookup_file(path),
            None => RuleLemmatizer::english(),
        };
        Self::new(Arc::new(lemmatizer))
    }

    /// Lowercases `word` and lemmatizes its first token.
    ///
    /// Callers reject empty input before reaching this point.
    pub fn base_form(&self, word: &str) -> String {
        let lowered = word.trim().to_lowercase();
        let raw = lowered.split_whitespace().next().unwrap_or("");
        let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
        let token = if token.is_empty() { raw } else { token };
        self.lemmatizer.lemmatize(token).to_lowercase()
    }
}

const EXCEPTIONS: &[(&str, &str)] = &[
    // nouns
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "person"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("oxen", "ox"),
    ("knives", "knife"),
    ("wives", "wife"),
    ("lives", "life"),
    ("leaves", "leaf"),
    ("wolves", "wolf"),
    ("halves", "half"),
    ("loaves", "loaf"),
    ("shelves", "shelf"),
    ("thieves", "thief"),
    ("potatoes", "potato"),
    ("tomatoes", "tomato"),
    ("heroes", "hero"),
    ("buses", "bus"),
    ("fish", "fish"),
    ("sheep", "sheep"),
    // verbs
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("goes", "go"),
    ("went", "go"),
    ("gone", "go"),
    ("ate", "eat"),
    ("eaten", "eat"),
    ("ran", "run"),
    ("saw", "see"),
    ("seen", "see"),
    ("came", "come"),
    ("took", "take"),
    ("taken", "take"),
    ("gave", "give"),
    ("given", "give"),
    ("made", "make"),
    ("said", "say"),
    ("got", "get"),
    ("gotten", "get"),
    ("knew", "know"),
    ("known", "know"),
    ("thought", "think"),
    ("told", "tell"),
    ("found", "find"),
    ("sat", "sit"),
    ("stood", "stand"),
    ("wrote", "write"),
    ("written", "write"),
    ("drank", "drink"),
    ("drunk", "drink"),
    ("slept", "sleep"),
    ("swam", "swim"),
    ("flew", "fly"),
    ("flown", "fly"),
    ("bought", "buy"),
    ("brought", "bring"),
    ("caught", "catch"),
    ("taught", "teach"),
    ("sang", "sing"),
    ("sung", "sing"),
    ("began", "begin"),
    ("begun", "begin"),
    ("fell", "fall"),
    ("fallen", "fall"),
    ("felt", "feel"),
    ("kept", "keep"),
    ("lost", "lose"),
    ("met", "meet"),
    ("paid", "pay"),
    ("rode", "ride"),
    ("ridden", "ride"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("threw", "throw"),
    ("thrown", "throw"),
    ("wore", "wear"),
    ("worn", "wear"),
    ("won", "win"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("broke", "break"),
    ("broken", "break"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("hid", "hide"),
    ("hidden", "hide"),
    ("held", "hold"),
    ("built", "build"),
    ("sent", "send"),
    ("spent", "spend"),
    ("heard", "hear"),
    ("drew", "draw"),
    ("drawn", "draw"),
    ("grew", "grow"),
    ("grown", "grow"),
    // adjectives
    ("better", "good"),
    ("best", "good"),
    ("worse", "bad"),
    ("worst", "bad"),
];

/// Words the suffix rules would otherwise mangle.
const BASE_FORMS: &[&str] = &[
    "bus", "gas", "yes", "news", "always", "glass", "grass", "dress", "class", "boss",
    "address", "princess", "lens", "series", "species", "morning", "evening", "ceiling",
    "building", "king", "ring", "thing", "nothing", "something", "everything", "open",
    "visit", "listen", "eat", "read", "cook", "play", "walk", "jump", "talk", "draw",
    "sleep", "drink", "look", "paint", "wash", "brush", "need", "seed", "feed", "speed",
    "bed", "red", "hundred", "wicked", "naked", "sacred", "sled", "shed", "his", "this",
    "its", "us", "plus", "octopus", "cactus", "virus", "bonus", "chaos", "canvas",
    "christmas", "pajamas", "happy", "baby", "candy", "family", "teddy", "body", "party",
    "cat", "dog", "apple", "ball", "book", "car", "house", "school", "tree", "water",
];

/// English lemmatizer in the lookup-table style: an optional form→lemma
/// table, irregular exceptions, an index of known base forms, then suffix
/// rules.
#[derive(Debug, Clone)]
pub struct RuleLemmatizer {
    lookup: HashMap<String, String>,
    exceptions: HashMap<String, String>,
    index: HashSet<String>,
}

impl RuleLemmatizer {
    pub fn english() -> Self {
        Self::with_lookup(HashMap::new())
    }

    pub fn with_lookup(lookup: HashMap<String, String>) -> Self {
        let lookup: HashMap<String, String> = lookup
            .into_iter()
            .map(|(form, lemma)| (form.to_lowercase(), lemma.to_lowercase()))
            .collect();
        let exceptions: HashMap<String, String> = EXCEPTIONS
            .iter()
            .map(|(form, lemma)| (form.to_string(), lemma.to_string()))
            .collect();

        let mut index: HashSet<String> = BASE_FORMS.iter().map(|w| w.to_string()).collect();
        index.extend(exceptions.values().cloned());
        index.extend(lookup.values().cloned());

        Self {
            lookup,
            exceptions,
            index,
        }
    }

    /// Loads a JSON object of `form → lemma` pairs. A missing or corrupt
    /// table is logged and the built-in rules are used alone.
    pub fn with_lookup_file(path: &Path) -> Self {
        let table = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                serde_json::from_str::<HashMap<String, String>>(&raw).map_err(|e| e.to_string())
            });

        match table {
            Ok(table) => {
                tracing::info!(path = %path.display(), entries = table.len(), "lemma lookup table loaded");
                Self::with_lookup(table)
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "lemma lookup table unavailable, using rules only");
                Self::english()
            }
        }
    }

    pub fn known_base_forms(&self) -> impl Iterator<Item = &str> {
        self.index.iter().map(String::as_str)
    }
}

impl Default for RuleLemmatizer {
    fn default() -> Self {
        Self::english()
    }
}

impl RuleLemmatizer {
    fn lemmatize_once(&self, token: &str) -> String {
        if let Some(lemma) = self.lookup.get(token) {
            return lemma.clone();
        }
        if let Some(lemma) = self.exceptions.get(token) {
            return lemma.clone();
        }
        if self.index.contains(token) {
            return token.to_string();
        }
        apply_suffix_rules(token, &self.index).unwrap_or_else(|| token.to_string())
    }
}

impl Lemmatizer for RuleLemmatizer {
    /// Applies the tables and rules until the token stops changing, so
    /// stacked suffixes (`paintings` → `painting` → `paint`) fully reduce.
    /// A cycle in a user lookup table ends the loop at the first repeat.
    fn lemmatize(&self, token: &str) -> String {
        let mut current = token.to_string();
        let mut seen: HashSet<String> = HashSet::new();
        loop {
            let next = self.lemmatize_once(&current);
            if next == current || !seen.insert(current) {
                return next;
            }
            current = next;
        }
    }
}

fn apply_suffix_rules(word: &str, index: &HashSet<String>) -> Option<String> {
    if !word.is_ascii() {
        return None;
    }
    let len = word.len();

    if len > 4 && word.ends_with("ies") {
        return Some(format!("{}y", &word[..len - 3]));
    }
    if word.ends_with("sses") || word.ends_with("zzes") {
        return Some(word[..len - 2].to_string());
    }
    if len > 4 && ["ches", "shes", "xes"].iter().any(|s| word.ends_with(s)) {
        return Some(word[..len - 2].to_string());
    }
    if len >= 5 && word.ends_with("ing") {
        let stem = &word[..len - 3];
        if has_vowel(stem) {
            return Some(restore_verb_stem(stem, index));
        }
        return None;
    }
    if len > 4 && word.ends_with("ied") {
        return Some(format!("{}y", &word[..len - 3]));
    }
    if len >= 4 && word.ends_with("ed") {
        let stem = &word[..len - 2];
        if has_vowel(stem) && !stem.ends_with('e') {
            return Some(restore_verb_stem(stem, index));
        }
        return None;
    }
    if len >= 3
        && word.ends_with('s')
        && !["ss", "us", "is", "'s"].iter().any(|s| word.ends_with(s))
    {
        return Some(word[..len - 1].to_string());
    }
    None
}

/// Undoes consonant doubling (`runn` → `run`) and silent-e loss
/// (`mak` → `make`) on a stripped verb stem.
fn restore_verb_stem(stem: &str, index: &HashSet<String>) -> String {
    if index.contains(stem) {
        return stem.to_string();
    }

    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n >= 3 && bytes[n - 1] == bytes[n - 2] && b"bdgmnprt".contains(&bytes[n - 1]) {
        return stem[..n - 1].to_string();
    }

    let with_e = format!("{stem}e");
    if index.contains(&with_e) {
        return with_e;
    }

    let short_cvc = (2..=4).contains(&n)
        && !is_vowel(bytes[n - 1])
        && !b"wxy".contains(&bytes[n - 1])
        && is_vowel(bytes[n - 2])
        && (n == 2 || !is_vowel(bytes[n - 3]));
    if short_cvc {
        with_e
    } else {
        stem.to_string()
    }
}

fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u')
}

fn has_vowel(s: &str) -> bool {
    s.bytes().any(|b| is_vowel(b) || b == b'y')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(Arc::new(RuleLemmatizer::english()))
    }

    #[test]
    fn test_plural_nouns() {
        let n = normalizer();
        assert_eq!(n.base_form("cats"), "cat");
        assert_eq!(n.base_form("Dogs"), "dog");
        assert_eq!(n.base_form("babies"), "baby");
        assert_eq!(n.base_form("boxes"), "box");
        assert_eq!(n.base_form("glasses"), "glass");
        assert_eq!(n.base_form("apples"), "apple");
        assert_eq!(n.base_form("children"), "child");
    }

    #[test]
    fn test_verb_forms() {
        let n = normalizer();
        assert_eq!(n.base_form("running"), "run");
        assert_eq!(n.base_form("making"), "make");
        assert_eq!(n.base_form("playing"), "play");
        assert_eq!(n.base_form("jumped"), "jump");
        assert_eq!(n.base_form("cried"), "cry");
        assert_eq!(n.base_form("went"), "go");
        assert_eq!(n.base_form("going"), "go");
        assert_eq!(n.base_form("eating"), "eat");
    }

    #[test]
    fn test_words_left_alone() {
        let n = normalizer();
        for word in ["bus", "glass", "news", "thing", "bring", "string", "need", "bed", "sing"] {
            assert_eq!(n.base_form(word), word, "{word}");
        }
    }

    #[test]
    fn test_stacked_suffixes_reduce_fully() {
        let n = normalizer();
        for (word, base) in [
            ("paintings", "paint"),
            ("meetings", "meet"),
            ("feelings", "feel"),
            ("beings", "be"),
            ("weddings", "wed"),
            ("drawings", "draw"),
        ] {
            assert_eq!(n.base_form(word), base, "{word}");
            assert_eq!(n.base_form(base), base, "{base}");
        }
        assert_eq!(n.base_form("buildings"), "building");
    }

    #[test]
    fn test_lookup_cycle_terminates() {
        let mut table = HashMap::new();
        table.insert("foo".to_string(), "bar".to_string());
        table.insert("bar".to_string(), "foo".to_string());
        let lemmatizer = RuleLemmatizer::with_lookup(table);
        let lemma = lemmatizer.lemmatize("foo");
        assert!(lemma == "foo" || lemma == "bar");
    }

    #[test]
    fn test_first_token_and_punctuation() {
        let n = normalizer();
        assert_eq!(n.base_form("  Cats are cute "), "cat");
        assert_eq!(n.base_form("dogs!"), "dog");
    }

    #[test]
    fn test_lookup_table_wins() {
        let mut table = HashMap::new();
        table.insert("Data".to_string(), "Datum".to_string());
        let n = Normalizer::new(Arc::new(RuleLemmatizer::with_lookup(table)));
        assert_eq!(n.base_form("data"), "datum");
        assert_eq!(n.base_form("datum"), "datum");
    }

    #[test]
    fn test_missing_lookup_file_falls_back() {
        let n = Normalizer::english(Some(Path::new("/nonexistent/lemmas.json")));
        assert_eq!(n.base_form("cats"), "cat");
    }

    #[test]
    fn test_inflected_forms_are_idempotent() {
        let n = normalizer();
        for word in [
            "cats", "running", "babies", "boxes", "made", "hopped", "baked", "dishes", "paintings",
            "weddings",
        ] {
            let once = n.base_form(word);
            assert_eq!(n.base_form(&once), once, "{word}");
        }
    }
}
