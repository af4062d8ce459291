//! HTTP client for the Rick and Morty character API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::CharacterSource;
use crate::error::{MortyError, MortyResult};
use crate::models::CharacterPage;

/// Fetches character pages from `{base_url}character?page=N`
#[derive(Debug, Clone)]
pub struct HttpCharacterSource {
    client: Client,
    endpoint: String,
}

impl HttpCharacterSource {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> MortyResult<Self> {
        let base = check_base_url(base_url)?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("morty-cache/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MortyError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/character", base.trim_end_matches('/')),
        })
    }
}

/// Check that `url` can serve as the API base, returning it trimmed
pub fn check_base_url(url: &str) -> MortyResult<&str> {
    let base = url.trim();
    let rest = base
        .strip_prefix("https://")
        .or_else(|| base.strip_prefix("http://"));

    match rest {
        Some(host) if !host.trim_matches('/').is_empty() => Ok(base),
        _ => Err(MortyError::Validation(format!(
            "API base URL must be an http(s) URL: '{}'",
            url
        ))),
    }
}

#[async_trait]
impl CharacterSource for HttpCharacterSource {
    async fn fetch_page(&self, page: u32) -> MortyResult<CharacterPage> {
        tracing::debug!(page, endpoint = %self.endpoint, "requesting character page");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("page", page)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        parse_page(status.as_u16(), &body)
    }
}

/// Interpret a response from the character endpoint
///
/// The API answers 404 for pages past the end; that is the empty page.
pub fn parse_page(status: u16, body: &str) -> MortyResult<CharacterPage> {
    if status == StatusCode::NOT_FOUND.as_u16() {
        return Ok(CharacterPage::empty());
    }

    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| body.chars().take(200).collect());
        return Err(MortyError::Remote { status, message });
    }

    serde_json::from_str(body)
        .map_err(|e| MortyError::Json(format!("Failed to parse character page: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_building() {
        let a = HttpCharacterSource::new("https://rickandmortyapi.com/api/", Duration::from_secs(5))
            .unwrap();
        let b = HttpCharacterSource::new("https://rickandmortyapi.com/api", Duration::from_secs(5))
            .unwrap();
        assert_eq!(a.endpoint, "https://rickandmortyapi.com/api/character");
        assert_eq!(a.endpoint, b.endpoint);
    }

    #[test]
    fn test_rejects_non_http_base() {
        let err = HttpCharacterSource::new("ftp://example.test", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, MortyError::Validation(_)));
        assert!(check_base_url("http://").is_err());
        assert_eq!(check_base_url(" http://localhost:9/api/ ").unwrap(), "http://localhost:9/api/");
    }

    #[test]
    fn test_parse_ok_page() {
        let body = r#"{"info":{"count":2,"pages":1,"next":null,"prev":null},
            "results":[{"id":1,"name":"Rick Sanchez","status":"Alive","species":"Human","gender":"Male","image":"a"},
                       {"id":2,"name":"Morty Smith","status":"Alive","species":"Human","gender":"Male","image":"b"}]}"#;
        let page = parse_page(200, body).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[1].name, "Morty Smith");
    }

    #[test]
    fn test_parse_past_last_page_is_empty() {
        let page = parse_page(404, r#"{"error":"There is nothing here"}"#).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn test_parse_server_error() {
        let err = parse_page(500, r#"{"error":"Internal"}"#).unwrap_err();
        match err {
            MortyError::Remote { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_garbage_body() {
        let err = parse_page(200, "<html>").unwrap_err();
        assert!(matches!(err, MortyError::Json(_)));
    }
}
