pub mod client;
pub mod fetcher;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A Trello card returned via the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(rename = "desc", default)]
    pub description: String,
    #[serde(rename = "due", default)]
    pub due_by: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "idBoard", default)]
    pub board_id: String,
}

/// A Trello list returned via the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct List {
    pub id: String,
    pub name: String,
}

/// A Trello board returned via the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(rename = "prefs", default)]
    pub preferences: Preferences,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Preferences {
    /// Scaled background images, smallest first.
    #[serde(rename = "backgroundImageScaled", default)]
    pub background_images: Vec<BackgroundImage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackgroundImage {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn decodes_a_card_with_a_due_date() {
        let body = r#"{
            "id": "cardId",
            "name": "My Card",
            "desc": "Some description",
            "due": "2020-05-15T10:30:00.000Z",
            "url": "https://trello.com/c/abcd1234/my-card",
            "idBoard": "boardId"
        }"#;

        let card: Card = serde_json::from_str(body).unwrap();

        assert_eq!(card.id, "cardId");
        assert_eq!(card.name, "My Card");
        assert_eq!(card.description, "Some description");
        assert_eq!(
            card.due_by,
            Some(Utc.with_ymd_and_hms(2020, 5, 15, 10, 30, 0).unwrap())
        );
        assert_eq!(card.url, "https://trello.com/c/abcd1234/my-card");
        assert_eq!(card.board_id, "boardId");
    }

    #[test]
    fn decodes_a_card_with_a_null_due_date() {
        let body = r#"{"id": "cardId", "name": "My Card", "due": null, "idBoard": "boardId"}"#;

        let card: Card = serde_json::from_str(body).unwrap();

        assert_eq!(card.due_by, None);
        assert_eq!(card.description, "");
    }

    #[test]
    fn decodes_a_board_with_background_images() {
        let body = r#"{
            "id": "boardId",
            "name": "My Project",
            "prefs": {
                "backgroundImageScaled": [
                    {"url": "https://example.com/75x100.jpg", "width": 75, "height": 100},
                    {"url": "https://example.com/144x192.jpg", "width": 144, "height": 192}
                ]
            }
        }"#;

        let board: Board = serde_json::from_str(body).unwrap();

        assert_eq!(board.name, "My Project");
        assert_eq!(
            board.preferences.background_images[0].url,
            "https://example.com/75x100.jpg"
        );
    }

    #[test]
    fn decodes_a_board_with_no_background_images() {
        let body = r#"{"id": "boardId", "name": "My Project", "prefs": {}}"#;

        let board: Board = serde_json::from_str(body).unwrap();

        assert!(board.preferences.background_images.is_empty());
    }
}
