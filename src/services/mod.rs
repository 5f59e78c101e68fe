pub mod documents;
pub mod json_file;
pub mod mapping_store;
pub mod normalizer;
pub mod pictograms;
pub mod synonyms;
pub mod word_images;

use std::time::Duration;

/// Shared outbound client. Without a timeout, requests wait for the
/// transport's own defaults.
pub fn http_client(timeout: Option<Duration>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}
