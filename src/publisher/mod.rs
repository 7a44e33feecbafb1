//! Publishing directives to the task board.
//!
//! Directives are grouped by board name and each board is resolved once.
//! Within a board, directives are handled in ascending revision order so
//! comments land on a card in the order the commits were made, whatever
//! order they were loaded in.


use crate::board::{Board, BoardList, BoardService};
use crate::error::{CardsError, Result};
use crate::parser::CommentDirective;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// What to do when a board, card or target list cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LookupFailurePolicy {
    /// Log the failure, skip the affected directive and carry on (default).
    #[default]
    Skip,
    /// Abort the publish pass on the first lookup failure.
    FailFast,
}

/// A directive that was not (fully) applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDirective {
    pub board: String,
    pub card_id: u64,
    pub revision: u64,
    pub reason: String,
}

/// Summary of a publish pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Comments posted.
    pub comments: usize,
    /// Cards moved to another list.
    pub moves: usize,
    /// Directives skipped because a lookup failed.
    pub skipped: Vec<SkippedDirective>,
}

/// Posts directives through a [`BoardService`].
pub struct Publisher<'a> {
    service: &'a dyn BoardService,
    policy: LookupFailurePolicy,
}

/// Per-board state for one pass; lists are fetched at most once.
struct BoardGroup {
    board: Board,
    lists: Option<Vec<BoardList>>,
}

impl<'a> Publisher<'a> {
    pub fn new(service: &'a dyn BoardService, policy: LookupFailurePolicy) -> Self {
        Self { service, policy }
    }

    /// Publish every directive, grouped by board and ordered by revision.
    pub fn publish(&self, directives: &[CommentDirective]) -> Result<PublishReport> {
        let mut report = PublishReport::default();

        for (board_name, mut group) in group_by_board(directives) {
            group.sort_by_key(|directive| directive.revision);

            let Some(board) = self.service.search_board(board_name)? else {
                for directive in &group {
                    self.lookup_failed(
                        &mut report,
                        directive,
                        format!("board '{}' not found", board_name),
                    )?;
                }
                continue;
            };
            info!(board = %board.name, directives = group.len(), "Publishing to board");

            let mut state = BoardGroup { board, lists: None };
            for directive in group {
                self.publish_one(&mut state, directive, &mut report)?;
            }
        }

        Ok(report)
    }

    fn publish_one(
        &self,
        state: &mut BoardGroup,
        directive: &CommentDirective,
        report: &mut PublishReport,
    ) -> Result<()> {
        let Some(card) = self
            .service
            .find_card_by_short_id(&state.board, directive.card_id)?
        else {
            return self.lookup_failed(
                report,
                directive,
                format!(
                    "card {} not found on board '{}'",
                    directive.card_id, state.board.name
                ),
            );
        };

        let text = directive.comment_text();
        self.service.add_comment(&card, &text)?;
        report.comments += 1;
        info!(
            card = directive.card_id,
            board = %state.board.name,
            comment = %text,
            "Posted comment"
        );

        let Some(list_name) = directive.list.as_deref() else {
            return Ok(());
        };

        if state.lists.is_none() {
            state.lists = Some(self.service.lists_for_board(&state.board)?);
        }
        let lists = state.lists.as_deref().unwrap_or_default();

        match find_single_list(lists, list_name) {
            Ok(list) => {
                self.service.move_card(&card, list)?;
                report.moves += 1;
                info!(card = directive.card_id, list = %list.name, "Moved card");
                Ok(())
            }
            Err(reason) => self.lookup_failed(
                report,
                directive,
                format!("{} on board '{}'", reason, state.board.name),
            ),
        }
    }

    fn lookup_failed(
        &self,
        report: &mut PublishReport,
        directive: &CommentDirective,
        reason: String,
    ) -> Result<()> {
        match self.policy {
            LookupFailurePolicy::FailFast => Err(CardsError::LookupError(format!(
                "r{} card {}: {}",
                directive.revision, directive.card_id, reason
            ))),
            LookupFailurePolicy::Skip => {
                warn!(
                    revision = directive.revision,
                    card = directive.card_id,
                    "Skipping directive: {}",
                    reason
                );
                report.skipped.push(SkippedDirective {
                    board: directive.board.clone(),
                    card_id: directive.card_id,
                    revision: directive.revision,
                    reason,
                });
                Ok(())
            }
        }
    }
}

/// Group directives by board name, keeping input order within a group.
fn group_by_board(directives: &[CommentDirective]) -> BTreeMap<&str, Vec<&CommentDirective>> {
    let mut groups: BTreeMap<&str, Vec<&CommentDirective>> = BTreeMap::new();
    for directive in directives {
        groups
            .entry(directive.board.as_str())
            .or_default()
            .push(directive);
    }
    debug!(boards = groups.len(), "Grouped directives by board");
    groups
}

/// The one list whose name equals `name` exactly.
fn find_single_list<'l>(
    lists: &'l [BoardList],
    name: &str,
) -> std::result::Result<&'l BoardList, String> {
    let mut matches = lists.iter().filter(|list| list.name == name);
    match (matches.next(), matches.next()) {
        (Some(list), None) => Ok(list),
        (None, _) => Err(format!("no list named '{}'", name)),
        (Some(_), Some(_)) => Err(format!("more than one list named '{}'", name)),
    }
}
