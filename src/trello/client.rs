use reqwest::StatusCode;
use thiserror::Error;

use super::{Board, Card, List};

/// Base URL for the Trello API. This is NOT the same as the boards URL
/// that project cards carry in their descriptions.
pub const API_BASE_URL: &str = "https://api.trello.com/1";

#[derive(Debug, Error)]
pub enum TrelloError {
    #[error("request to {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {path} returned status code {status}")]
    Status { path: String, status: StatusCode },
    #[error("response from {path} could not be decoded: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Path where the cards this user is a member of can be queried.
pub fn owned_cards_path() -> String {
    "/members/me/cards".to_string()
}

/// Path where the cards on a list can be queried.
pub fn cards_on_list_path(list_id: &str) -> String {
    format!("/lists/{}/cards", list_id)
}

/// Path where the lists on a board can be queried.
pub fn lists_on_board_path(board_id: &str) -> String {
    format!("/boards/{}/lists", board_id)
}

/// Path where a single board can be queried.
pub fn board_path(board_id: &str) -> String {
    format!("/boards/{}", board_id)
}

/// Client for the Trello REST API. Cheap to clone; the key and token are
/// sent as query parameters on every request and never logged.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    key: String,
    token: String,
}

impl Client {
    pub fn new(key: &str, token: &str) -> Self {
        Self::with_base_url(API_BASE_URL, key, token)
    }

    /// Client against a non-default base URL (mock servers).
    pub fn with_base_url(base_url: &str, key: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            token: token.to_string(),
        }
    }

    pub async fn owned_cards(&self) -> Result<Vec<Card>, TrelloError> {
        self.get(&owned_cards_path()).await
    }

    pub async fn cards_on_list(&self, list_id: &str) -> Result<Vec<Card>, TrelloError> {
        self.get(&cards_on_list_path(list_id)).await
    }

    pub async fn lists_on_board(&self, board_id: &str) -> Result<Vec<List>, TrelloError> {
        self.get(&lists_on_board_path(board_id)).await
    }

    pub async fn board(&self, board_id: &str) -> Result<Board, TrelloError> {
        self.get(&board_path(board_id)).await
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, TrelloError> {
        log::debug!("Making request to {}", path);

        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(&[("key", self.key.as_str()), ("token", self.token.as_str())])
            .send()
            .await
            .map_err(|source| TrelloError::Request {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrelloError::Status {
                path: path.to_string(),
                status,
            });
        }

        response.json().await.map_err(|source| TrelloError::Decode {
            path: path.to_string(),
            source,
        })
    }
}
