//! Implementation of the `commitcards verbs` command.

use super::verb_mapping;
use crate::cli::VerbsArgs;
use crate::config::Config;
use crate::error::Result;
use crate::parser::VerbMapping;

/// Print the verb-to-list mapping a run would use.
pub fn cmd_verbs(config: &Config, args: &VerbsArgs) -> Result<()> {
    let verbs = verb_mapping(config, &args.verbs)?;
    for line in render(&verbs) {
        println!("{}", line);
    }
    Ok(())
}

fn render(verbs: &VerbMapping) -> Vec<String> {
    let width = verbs.iter().map(|(verb, _)| verb.len()).max().unwrap_or(0);
    verbs
        .iter()
        .map(|(verb, list)| format!("{:width$}  -> {}", verb, list, width = width))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_sorted_aligned_table() {
        let verbs = VerbMapping::from_pairs([("testing", "Testing"), ("done", "Done")]);
        assert_eq!(
            render(&verbs),
            vec!["done     -> Done", "testing  -> Testing"]
        );
    }

    #[test]
    fn default_table_has_every_verb() {
        let lines = render(&VerbMapping::default());
        assert_eq!(lines.len(), 6);
        assert!(lines.iter().any(|l| l.starts_with("waiting") && l.ends_with("User Acceptance")));
    }
}
