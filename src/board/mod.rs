//! The remote task board.
//!
//! [`BoardService`] is the narrow set of operations the publisher needs:
//! find a board by name, find a card on it by short id, comment on the
//! card, list the board's lists, and move the card to one of them.
//! [`TrelloClient`] implements it against the Trello REST API.

mod trello;

pub use trello::{DEFAULT_API_BASE_URL, TrelloClient, TrelloSettings};

use crate::error::Result;
use serde::Deserialize;

/// A board on the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
}

/// A card on a board.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Card {
    pub id: String,
    /// Short numeric id, unique within the board.
    #[serde(rename = "idShort")]
    pub short_id: u64,
    #[serde(default)]
    pub name: String,
}

/// A list (workflow column) on a board.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BoardList {
    pub id: String,
    pub name: String,
}

/// Operations on the remote task board.
///
/// Lookups return `Ok(None)` when nothing matches; errors are reserved for
/// authorization and transport failures.
pub trait BoardService {
    /// Search boards by name and return the first match.
    fn search_board(&self, name: &str) -> Result<Option<Board>>;

    /// Find a card on `board` by its short id.
    fn find_card_by_short_id(&self, board: &Board, short_id: u64) -> Result<Option<Card>>;

    /// Post a comment on `card`.
    fn add_comment(&self, card: &Card, text: &str) -> Result<()>;

    /// All open lists on `board`.
    fn lists_for_board(&self, board: &Board) -> Result<Vec<BoardList>>;

    /// Move `card` to `list`.
    fn move_card(&self, card: &Card, list: &BoardList) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn card_reads_short_id_and_tolerates_missing_name() {
        let card: Card = serde_json::from_value(json!({
            "id": "5f1c",
            "idShort": 42,
            "idList": "ignored"
        }))
        .unwrap();

        assert_eq!(card.id, "5f1c");
        assert_eq!(card.short_id, 42);
        assert_eq!(card.name, "");
    }

    #[test]
    fn lists_deserialize_from_array() {
        let lists: Vec<BoardList> = serde_json::from_value(json!([
            {"id": "l1", "name": "Testing", "closed": false},
            {"id": "l2", "name": "Done", "closed": false}
        ]))
        .unwrap();

        assert_eq!(lists[1].name, "Done");
    }
}
