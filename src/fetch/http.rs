//! HTTP fetcher for the remote fleet service.

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::debug;

use super::{FetchError, Fetcher};
use crate::cache::{EntityRecord, EntityType};

/// Maximum length of an error body kept in `FetchError::Status`.
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Pulls `GET {base_url}/{entity path}` and decodes a JSON array of records.
/// Clone is cheap; `reqwest::Client` shares its connection pool.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, entity_type: EntityType) -> String {
        format!("{}/{}", self.base_url, entity_type.path())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, entity_type: EntityType) -> Result<Vec<EntityRecord>, FetchError> {
        let url = self.url_for(entity_type);
        debug!(%url, "Pulling {}", entity_type);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        response
            .json::<Vec<EntityRecord>>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}
