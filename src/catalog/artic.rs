//! Art Institute of Chicago public API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{
    errors::{FetchError, FetchResult},
    source::PageSource,
    types::{Page, Record},
};

pub const DEFAULT_BASE_URL: &str = "https://api.artic.edu/api/v1";

/// Fields requested from `/artworks`; everything a `Record` holds
pub const DEFAULT_FIELDS: &[&str] = &[
    "id",
    "title",
    "place_of_origin",
    "artist_display",
    "inscriptions",
    "date_start",
    "date_end",
];

/// Largest `limit` the `/artworks` endpoint accepts
pub const MAX_PAGE_SIZE: usize = 100;

/// Upper bound on error bodies kept in `FetchError::Status`
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Deserialize)]
struct ArticResponse {
    pagination: ArticPagination,
    #[serde(default)]
    data: Vec<Record>,
}

#[derive(Debug, Deserialize)]
struct ArticPagination {
    total: usize,
}

/// `PageSource` over the `/artworks` listing endpoint
#[derive(Debug, Clone)]
pub struct ArticClient {
    client: Client,
    base_url: String,
    fields: Vec<String>,
}

impl ArticClient {
    pub fn new(
        base_url: &str,
        fields: Vec<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            fields,
        })
    }

    fn request(&self, page_number: usize, limit: usize) -> reqwest::RequestBuilder {
        let url = format!("{}/artworks", self.base_url);
        let mut query = vec![
            ("page", page_number.to_string()),
            ("limit", limit.to_string()),
        ];
        if !self.fields.is_empty() {
            query.push(("fields", self.fields.join(",")));
        }
        self.client.get(url).query(&query)
    }
}

/// Decode an `/artworks` listing body into a page
pub fn parse_page(body: &str) -> FetchResult<Page> {
    let response: ArticResponse = serde_json::from_str(body)?;
    Ok(Page::new(response.data, response.pagination.total))
}

#[async_trait]
impl PageSource for ArticClient {
    async fn fetch_page(&self, page_number: usize, limit: usize) -> FetchResult<Page> {
        let request = self.request(page_number, limit).build()?;
        debug!("Fetching catalog page from: {}", request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_page(&body)
    }

    fn name(&self) -> &str {
        "artic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ArticClient {
        ArticClient::new(
            "https://api.example.test/v1/",
            DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            Duration::from_secs(5),
            "artpicker-test",
        )
        .unwrap()
    }

    #[test]
    fn test_request_url_carries_page_and_limit() {
        let request = client().request(3, 12).build().unwrap();
        let url = request.url();

        assert_eq!(url.path(), "/v1/artworks");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("page".to_string(), "3".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "12".to_string())));
        assert!(pairs
            .iter()
            .any(|(k, v)| k == "fields" && v.starts_with("id,title")));
    }

    #[test]
    fn test_parse_page() {
        let body = r#"{
            "pagination": {"total": 125908, "limit": 12, "offset": 0, "total_pages": 10493, "current_page": 1},
            "data": [
                {"id": 1, "title": "Nighthawks", "place_of_origin": "United States",
                 "artist_display": "Edward Hopper", "inscriptions": null,
                 "date_start": 1942, "date_end": 1942},
                {"id": 2, "title": "The Bedroom", "place_of_origin": "France",
                 "artist_display": "Vincent van Gogh", "inscriptions": "Vincent",
                 "date_start": 1889, "date_end": 1889}
            ]
        }"#;

        let page = parse_page(body).unwrap();
        assert_eq!(page.total, 125908);
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].title, "Nighthawks");
        assert_eq!(page.records[1].inscriptions.as_deref(), Some("Vincent"));
    }

    #[test]
    fn test_parse_page_rejects_malformed_body() {
        assert!(matches!(parse_page("<html>"), Err(FetchError::Decode(_))));
        assert!(matches!(parse_page(r#"{"data": []}"#), Err(FetchError::Decode(_))));
    }
}
