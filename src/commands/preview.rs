//! Implementation of the `commitcards preview` command.
//!
//! Shows what `run` would post without any credentials or remote calls.

use super::{repo_path, since, verb_mapping};
use crate::cli::PreviewArgs;
use crate::commits::CommitLoader;
use crate::config::Config;
use crate::error::Result;
use crate::parser::MessageParser;
use crate::pipeline::{self, Collected};
use chrono::Utc;

/// Execute the `commitcards preview` command.
pub fn cmd_preview(config: &Config, args: &PreviewArgs) -> Result<()> {
    let parser = MessageParser::new(verb_mapping(config, &args.source.verbs)?);
    let repo = repo_path(config, &args.source);
    let since = since(config, args.source.since, Utc::now());

    let mut loader = CommitLoader::new(config.git_timeout());
    let collected = pipeline::load_directives(&mut loader, repo.as_deref(), Some(since), &parser)?;

    let lines = render(&collected);
    if lines.is_empty() {
        println!("No card directives in commits since {}", since.to_rfc3339());
    }
    for line in lines {
        println!("{}", line);
    }

    Ok(())
}

/// One output line per directive, then one per skipped line.
fn render(collected: &Collected) -> Vec<String> {
    let directives = collected.directives.iter().map(|d| {
        let target = match &d.list {
            Some(list) => format!("{} #{} -> {}", d.board, d.card_id, list),
            None => format!("{} #{}", d.board, d.card_id),
        };
        format!("r{} {}: {} {}", d.revision, d.author, target, d.message)
            .trim_end()
            .to_string()
    });

    let skipped = collected.skipped.iter().map(|s| {
        format!(
            "r{} {}: skipped line {} ({}): {}",
            s.revision, s.author, s.line_no, s.reason, s.line
        )
    });

    directives.chain(skipped).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{CommentDirective, LineError};
    use crate::pipeline::SkippedLine;

    fn directive(list: Option<&str>, message: &str) -> CommentDirective {
        CommentDirective {
            board: "Web Site".to_string(),
            card_id: 12,
            list: list.map(str::to_string),
            message: message.to_string(),
            author: "Alice".to_string(),
            revision: 40,
        }
    }

    #[test]
    fn renders_directives_then_skipped_lines() {
        let collected = Collected {
            directives: vec![
                directive(Some("Testing"), "header fixed"),
                directive(None, ""),
            ],
            skipped: vec![SkippedLine {
                revision: 41,
                author: "Bob".to_string(),
                line_no: 2,
                line: "Web card abc".to_string(),
                reason: LineError::InvalidCardId("abc".to_string()),
            }],
        };

        assert_eq!(
            render(&collected),
            vec![
                "r40 Alice: Web Site #12 -> Testing header fixed",
                "r40 Alice: Web Site #12",
                "r41 Bob: skipped line 2 (card id 'abc' is not a positive number): Web card abc",
            ]
        );
    }

    #[test]
    fn nothing_to_render() {
        assert!(render(&Collected::default()).is_empty());
    }
}
