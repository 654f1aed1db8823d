use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use futures::future::join_all;
use regex::Regex;
use thiserror::Error;

use super::client::{Client, TrelloError};
use super::{Board, Card, List};
use crate::core::action::Action;

/// Matches the board URL a project card carries in its description.
static BOARD_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://trello\.com/b/(\w+)").unwrap());

/// The list on a project board that holds its next task.
const TODO_LIST_NAME: &str = "Todo";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Trello(#[from] TrelloError),
    #[error("project card {0:?} has no board URL in its description")]
    MissingBoardUrl(String),
}

/// Anything that can answer the Trello queries the fetcher needs.
#[async_trait]
pub trait CardSource: Send + Sync {
    async fn owned_cards(&self) -> Result<Vec<Card>, TrelloError>;
    async fn cards_on_list(&self, list_id: &str) -> Result<Vec<Card>, TrelloError>;
    async fn lists_on_board(&self, board_id: &str) -> Result<Vec<List>, TrelloError>;
    async fn board(&self, board_id: &str) -> Result<Board, TrelloError>;
}

#[async_trait]
impl CardSource for Client {
    async fn owned_cards(&self) -> Result<Vec<Card>, TrelloError> {
        Client::owned_cards(self).await
    }

    async fn cards_on_list(&self, list_id: &str) -> Result<Vec<Card>, TrelloError> {
        Client::cards_on_list(self, list_id).await
    }

    async fn lists_on_board(&self, board_id: &str) -> Result<Vec<List>, TrelloError> {
        Client::lists_on_board(self, board_id).await
    }

    async fn board(&self, board_id: &str) -> Result<Board, TrelloError> {
        Client::board(self, board_id).await
    }
}

/// Aggregates Trello cards into the next-actions set: the user's owned
/// cards, everything on the next-actions list, and the first Todo card of
/// each project board.
pub struct Fetcher<C> {
    client: C,
    next_actions_list_id: String,
    projects_list_id: String,
}

impl<C: CardSource> Fetcher<C> {
    pub fn new(client: C, next_actions_list_id: &str, projects_list_id: &str) -> Self {
        Self {
            client,
            next_actions_list_id: next_actions_list_id.to_string(),
            projects_list_id: projects_list_id.to_string(),
        }
    }

    pub async fn fetch(&self) -> Result<Vec<Action>, FetchError> {
        let mut cards = self.client.owned_cards().await?;
        cards.extend(self.client.cards_on_list(&self.next_actions_list_id).await?);

        let project_cards = self.client.cards_on_list(&self.projects_list_id).await?;
        let todo_cards = join_all(
            project_cards
                .iter()
                .map(|project_card| self.first_todo_card(project_card)),
        )
        .await;
        for result in todo_cards {
            if let Some(card) = result? {
                cards.push(card);
            }
        }

        self.to_actions(cards).await
    }

    /// The first card on the project's Todo list. A board without a Todo
    /// list, or with an empty one, contributes nothing.
    async fn first_todo_card(&self, project_card: &Card) -> Result<Option<Card>, FetchError> {
        let board_id = board_id_from_description(&project_card.description)
            .ok_or_else(|| FetchError::MissingBoardUrl(project_card.name.clone()))?;

        let lists = self.client.lists_on_board(&board_id).await?;
        let Some(todo_list) = lists.into_iter().find(|list| list.name == TODO_LIST_NAME) else {
            log::debug!("Project board {} has no {} list", board_id, TODO_LIST_NAME);
            return Ok(None);
        };

        let mut cards = self.client.cards_on_list(&todo_list.id).await?;
        if cards.is_empty() {
            Ok(None)
        } else {
            Ok(Some(cards.remove(0)))
        }
    }

    /// Decorate cards with their board's name and smallest background
    /// image. Each board is looked up once per fetch.
    async fn to_actions(&self, cards: Vec<Card>) -> Result<Vec<Action>, FetchError> {
        let mut boards: HashMap<String, Board> = HashMap::new();
        let mut actions = Vec::with_capacity(cards.len());

        for card in cards {
            if !boards.contains_key(&card.board_id) {
                let board = self.client.board(&card.board_id).await?;
                boards.insert(card.board_id.clone(), board);
            }
            let board = &boards[&card.board_id];

            actions.push(Action {
                id: card.id,
                name: card.name,
                url: card.url,
                image_url: board
                    .preferences
                    .background_images
                    .first()
                    .map(|image| image.url.clone()),
                project_name: Some(board.name.clone()),
                due_by: card.due_by,
            });
        }

        Ok(actions)
    }
}

fn board_id_from_description(description: &str) -> Option<String> {
    BOARD_URL_RE
        .captures(description)
        .map(|captures| captures[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trello::{BackgroundImage, Preferences};
    use chrono::{TimeZone, Utc};
    use reqwest::StatusCode;

    fn card(id: &str, name: &str, board_id: &str) -> Card {
        Card {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            due_by: None,
            url: String::new(),
            board_id: board_id.to_string(),
        }
    }

    fn board(id: &str, name: &str, image_urls: &[&str]) -> Board {
        Board {
            id: id.to_string(),
            name: name.to_string(),
            preferences: Preferences {
                background_images: image_urls
                    .iter()
                    .map(|url| BackgroundImage {
                        url: url.to_string(),
                    })
                    .collect(),
            },
        }
    }

    #[derive(Default)]
    struct FakeTrello {
        owned: Vec<Card>,
        list_cards: HashMap<String, Vec<Card>>,
        board_lists: HashMap<String, Vec<List>>,
        boards: HashMap<String, Board>,
    }

    fn not_found(path: String) -> TrelloError {
        TrelloError::Status {
            path,
            status: StatusCode::NOT_FOUND,
        }
    }

    #[async_trait]
    impl CardSource for FakeTrello {
        async fn owned_cards(&self) -> Result<Vec<Card>, TrelloError> {
            Ok(self.owned.clone())
        }

        async fn cards_on_list(&self, list_id: &str) -> Result<Vec<Card>, TrelloError> {
            self.list_cards
                .get(list_id)
                .cloned()
                .ok_or_else(|| not_found(format!("/lists/{}/cards", list_id)))
        }

        async fn lists_on_board(&self, board_id: &str) -> Result<Vec<List>, TrelloError> {
            self.board_lists
                .get(board_id)
                .cloned()
                .ok_or_else(|| not_found(format!("/boards/{}/lists", board_id)))
        }

        async fn board(&self, board_id: &str) -> Result<Board, TrelloError> {
            self.boards
                .get(board_id)
                .cloned()
                .ok_or_else(|| not_found(format!("/boards/{}", board_id)))
        }
    }

    fn fake_with_empty_lists() -> FakeTrello {
        let mut fake = FakeTrello::default();
        fake.list_cards.insert("nextActionsList".to_string(), vec![]);
        fake.list_cards.insert("projectsList".to_string(), vec![]);
        fake
    }

    fn fetcher(fake: FakeTrello) -> Fetcher<FakeTrello> {
        Fetcher::new(fake, "nextActionsList", "projectsList")
    }

    #[tokio::test]
    async fn owned_cards_become_actions_with_project_name_and_image() {
        let mut fake = fake_with_empty_lists();
        let mut owned = card("cardId", "a name", "boardId");
        owned.url = "https://example.com".to_string();
        fake.owned.push(owned);
        fake.boards.insert(
            "boardId".to_string(),
            board(
                "boardId",
                "My Project",
                &["https://example.com/75x100.jpg", "https://example.com/144x192.jpg"],
            ),
        );

        let actions = fetcher(fake).fetch().await.unwrap();

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].id, "cardId");
        assert_eq!(actions[0].name, "a name");
        assert_eq!(actions[0].url, "https://example.com");
        assert_eq!(actions[0].project_name.as_deref(), Some("My Project"));
        assert_eq!(
            actions[0].image_url.as_deref(),
            Some("https://example.com/75x100.jpg")
        );
    }

    #[tokio::test]
    async fn next_actions_list_cards_become_actions() {
        let mut fake = fake_with_empty_lists();
        fake.list_cards.insert(
            "nextActionsList".to_string(),
            vec![card("listCard", "from the list", "boardId")],
        );
        fake.boards
            .insert("boardId".to_string(), board("boardId", "My Project", &[]));

        let actions = fetcher(fake).fetch().await.unwrap();

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].id, "listCard");
        assert_eq!(actions[0].image_url, None);
    }

    #[tokio::test]
    async fn each_project_contributes_its_first_todo_card() {
        let mut fake = fake_with_empty_lists();
        let mut project_card = card("projectCard", "My Project", "ownBoard");
        project_card.description = "See https://trello.com/b/projectBoard9/my-project".to_string();
        fake.list_cards
            .insert("projectsList".to_string(), vec![project_card]);
        fake.board_lists.insert(
            "projectBoard9".to_string(),
            vec![
                List {
                    id: "doneList".to_string(),
                    name: "Done".to_string(),
                },
                List {
                    id: "todoList".to_string(),
                    name: "Todo".to_string(),
                },
            ],
        );
        fake.list_cards.insert(
            "todoList".to_string(),
            vec![
                card("firstTodo", "first todo", "projectBoard9"),
                card("secondTodo", "second todo", "projectBoard9"),
            ],
        );
        fake.boards.insert(
            "projectBoard9".to_string(),
            board("projectBoard9", "My Project", &[]),
        );

        let actions = fetcher(fake).fetch().await.unwrap();

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].id, "firstTodo");
        assert_eq!(actions[0].project_name.as_deref(), Some("My Project"));
    }

    #[tokio::test]
    async fn a_project_card_without_a_board_url_is_an_error() {
        let mut fake = fake_with_empty_lists();
        let mut project_card = card("projectCard", "a broken project", "ownBoard");
        project_card.description = "no board link here".to_string();
        fake.list_cards
            .insert("projectsList".to_string(), vec![project_card]);

        let result = fetcher(fake).fetch().await;

        assert!(matches!(result, Err(FetchError::MissingBoardUrl(name)) if name == "a broken project"));
    }

    #[tokio::test]
    async fn a_board_without_a_todo_list_contributes_nothing() {
        let mut fake = fake_with_empty_lists();
        let mut project_card = card("projectCard", "My Project", "ownBoard");
        project_card.description = "https://trello.com/b/projectBoard9".to_string();
        fake.list_cards
            .insert("projectsList".to_string(), vec![project_card]);
        fake.board_lists.insert(
            "projectBoard9".to_string(),
            vec![List {
                id: "doingList".to_string(),
                name: "Doing".to_string(),
            }],
        );

        let actions = fetcher(fake).fetch().await.unwrap();

        assert!(actions.is_empty());
    }

    #[tokio::test]
    async fn an_empty_todo_list_contributes_nothing() {
        let mut fake = fake_with_empty_lists();
        let mut project_card = card("projectCard", "My Project", "ownBoard");
        project_card.description = "https://trello.com/b/projectBoard9".to_string();
        fake.list_cards
            .insert("projectsList".to_string(), vec![project_card]);
        fake.board_lists.insert(
            "projectBoard9".to_string(),
            vec![List {
                id: "todoList".to_string(),
                name: "Todo".to_string(),
            }],
        );
        fake.list_cards.insert("todoList".to_string(), vec![]);

        let actions = fetcher(fake).fetch().await.unwrap();

        assert!(actions.is_empty());
    }

    #[tokio::test]
    async fn due_dates_are_carried_through() {
        let due = Utc.with_ymd_and_hms(2020, 5, 15, 10, 30, 0).unwrap();
        let mut fake = fake_with_empty_lists();
        let mut owned = card("cardId", "a name", "boardId");
        owned.due_by = Some(due);
        fake.owned.push(owned);
        fake.boards
            .insert("boardId".to_string(), board("boardId", "My Project", &[]));

        let actions = fetcher(fake).fetch().await.unwrap();

        assert_eq!(actions[0].due_by, Some(due));
    }

    #[tokio::test]
    async fn a_trello_error_fails_the_whole_fetch() {
        let mut fake = FakeTrello::default();
        fake.owned.push(card("cardId", "a name", "boardId"));
        // No lists configured, so the next-actions lookup fails.

        let result = fetcher(fake).fetch().await;

        assert!(matches!(result, Err(FetchError::Trello(_))));
    }

    #[test]
    fn extracts_the_board_id_from_a_description() {
        assert_eq!(
            board_id_from_description("See https://trello.com/b/abc123XY/my-project for details"),
            Some("abc123XY".to_string())
        );
        assert_eq!(board_id_from_description("no url"), None);
    }
}
