//! Commit message parsing.
//!
//! A commit message is read line by line. Each line may carry one directive:
//!
//! ```text
//! [<verb>] <board name> card <card-id> [<message>]
//! ```
//!
//! The leading run of directive lines is what counts: the first line with no
//! `card` token ends parsing of that message. Any other malformed line is
//! skipped and parsing carries on with the next one.

mod verbs;


pub use verbs::{DEFAULT_VERBS, VerbMapping};

use crate::commits::CommitRecord;
use thiserror::Error;

/// The keyword separating the board name from the card id.
pub const CARD_KEYWORD: &str = "card";

/// A directive parsed from one line, before it is tied to a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveLine {
    /// Board name, trimmed and non-empty.
    pub board: String,
    /// Short id of the card on the board.
    pub card_id: u64,
    /// List to move the card to, if the line started with a verb.
    pub list: Option<String>,
    /// Free text after the card id; may be empty.
    pub message: String,
}

impl DirectiveLine {
    /// Tie this directive to the commit it came from.
    pub fn attach(self, commit: &CommitRecord) -> CommentDirective {
        CommentDirective {
            board: self.board,
            card_id: self.card_id,
            list: self.list,
            message: self.message,
            author: commit.author.clone(),
            revision: commit.revision,
        }
    }
}

/// A directive ready to publish: where to comment, what to say, and who said it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDirective {
    pub board: String,
    pub card_id: u64,
    pub list: Option<String>,
    pub message: String,
    pub author: String,
    pub revision: u64,
}

impl CommentDirective {
    /// Comment text as posted to the card: `revision:author - message`.
    pub fn comment_text(&self) -> String {
        format!("{}:{} - {}", self.revision, self.author, self.message)
    }
}

/// Why a line did not produce a directive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("no 'card' token")]
    MissingCardToken,

    #[error("board name is empty")]
    EmptyBoardName,

    #[error("board name cannot be 'card'")]
    BoardNamedCard,

    #[error("no card id after 'card'")]
    MissingCardId,

    #[error("card id '{0}' is not a positive number")]
    InvalidCardId(String),
}

/// What happened to a single line of a commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// The line produced a directive.
    Parsed { line_no: usize, directive: DirectiveLine },
    /// The line was malformed and skipped.
    Skipped {
        line_no: usize,
        line: String,
        reason: LineError,
    },
    /// The line had no `card` token; no later line of the message was read.
    Stopped { line_no: usize, line: String },
}

/// Ordered outcomes for every line that was examined in one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMessage {
    pub outcomes: Vec<LineOutcome>,
}

impl ParsedMessage {
    /// Directives from the lines that parsed, in line order.
    pub fn directives(&self) -> impl Iterator<Item = &DirectiveLine> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            LineOutcome::Parsed { directive, .. } => Some(directive),
            _ => None,
        })
    }

    /// Lines that were skipped as malformed, with the reason.
    pub fn skipped(&self) -> impl Iterator<Item = (usize, &str, &LineError)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            LineOutcome::Skipped {
                line_no,
                line,
                reason,
            } => Some((*line_no, line.as_str(), reason)),
            _ => None,
        })
    }

    /// Consume the outcomes, keeping only the directives.
    pub fn into_directives(self) -> Vec<DirectiveLine> {
        self.outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                LineOutcome::Parsed { directive, .. } => Some(directive),
                _ => None,
            })
            .collect()
    }
}

/// Parses commit messages against a verb mapping.
#[derive(Debug, Clone, Default)]
pub struct MessageParser {
    verbs: VerbMapping,
}

impl MessageParser {
    pub fn new(verbs: VerbMapping) -> Self {
        Self { verbs }
    }

    /// Parse every line of `message` until one lacks a `card` token.
    pub fn parse_message(&self, message: &str) -> ParsedMessage {
        let mut outcomes = Vec::new();

        for (index, line) in split_lines(message).enumerate() {
            let line_no = index + 1;
            match self.parse_line(line) {
                Ok(directive) => outcomes.push(LineOutcome::Parsed { line_no, directive }),
                Err(LineError::MissingCardToken) => {
                    outcomes.push(LineOutcome::Stopped {
                        line_no,
                        line: line.to_string(),
                    });
                    break;
                }
                Err(reason) => outcomes.push(LineOutcome::Skipped {
                    line_no,
                    line: line.to_string(),
                    reason,
                }),
            }
        }

        ParsedMessage { outcomes }
    }

    /// Parse a single line into a directive.
    pub fn parse_line(&self, line: &str) -> Result<DirectiveLine, LineError> {
        let mut tokens: Vec<&str> = line.split(' ').collect();

        let list = tokens
            .first()
            .and_then(|first| self.verbs.list_for(first))
            .map(str::to_string);
        if list.is_some() {
            tokens.remove(0);
        }

        let card_at = tokens
            .iter()
            .position(|token| token.eq_ignore_ascii_case(CARD_KEYWORD))
            .ok_or(LineError::MissingCardToken)?;

        let board = tokens[..card_at].join(" ").trim().to_string();
        if board.is_empty() {
            return Err(LineError::EmptyBoardName);
        }
        if board.eq_ignore_ascii_case(CARD_KEYWORD) {
            return Err(LineError::BoardNamedCard);
        }

        let id_token = tokens.get(card_at + 1).ok_or(LineError::MissingCardId)?;
        let card_id = parse_card_id(id_token)?;

        let message = tokens
            .get(card_at + 2..)
            .map(|rest| rest.join(" "))
            .unwrap_or_default()
            .trim()
            .to_string();

        Ok(DirectiveLine {
            board,
            card_id,
            list,
            message,
        })
    }
}

/// Split on CRLF, CR or LF.
fn split_lines(message: &str) -> impl Iterator<Item = &str> {
    message
        .split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

/// Strip every non-digit from `token` and read what is left as a positive id.
fn parse_card_id(token: &str) -> Result<u64, LineError> {
    let digits: String = token.chars().filter(char::is_ascii_digit).collect();
    match digits.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(LineError::InvalidCardId(token.to_string())),
    }
}
