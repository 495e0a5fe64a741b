//! Subcommand selection from leading tokens.

use tracing::debug;

use crate::command::Command;
use crate::error::SyntaxError;
use crate::tokenizer::Repository;

/// The innermost command selected by [`resolve`].
#[derive(Debug)]
pub struct Resolved<'a> {
    pub command: &'a mut Command,
    /// Command names from the root to `command`.
    pub path: Vec<String>,
    /// Repository with the consumed subcommand names removed.
    pub repository: Repository,
}

/// Descends into subcommands while the first leading token names one.
///
/// # Errors
///
/// Returns [`SyntaxError::PositionalBeforeFlags`] if leading tokens remain
/// after descent and flags were given as well.
pub fn resolve(root: &mut Command, mut repository: Repository) -> Result<Resolved<'_>, SyntaxError> {
    let mut path = vec![root.name.clone()];
    let mut current = root;

    while let Some(index) = repository
        .leading
        .first()
        .and_then(|token| current.subcommand_index(token))
    {
        current = &mut current.subcommands[index];
        let token = repository.leading.remove(0);
        debug!(subcommand = %token, "Descending into subcommand");
        path.push(token);
    }

    if !repository.leading.is_empty() && !repository.flags.is_empty() {
        return Err(SyntaxError::PositionalBeforeFlags {
            positionals: repository.leading,
            flags: repository.flags.into_keys().collect(),
        });
    }

    Ok(Resolved {
        command: current,
        path,
        repository,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn tree() -> Command {
        Command::new("calc")
            .with_subcommand(Command::new("sum"))
            .with_subcommand(Command::new("remote").with_subcommand(Command::new("add")))
    }

    #[test]
    fn test_descends_through_nested_subcommands() {
        let mut root = tree();
        let repo = tokenize(["remote", "add", "origin"]).unwrap();
        let resolved = resolve(&mut root, repo).unwrap();
        assert_eq!(resolved.command.name(), "add");
        assert_eq!(resolved.path, vec!["calc", "remote", "add"]);
        assert_eq!(resolved.repository.leading, vec!["origin"]);
    }

    #[test]
    fn test_stops_at_first_unknown_token() {
        let mut root = tree();
        let repo = tokenize(["1", "sum"]).unwrap();
        let resolved = resolve(&mut root, repo).unwrap();
        assert_eq!(resolved.command.name(), "calc");
        assert_eq!(resolved.repository.leading, vec!["1", "sum"]);
    }

    #[test]
    fn test_subcommand_path_may_precede_flags() {
        let mut root = tree();
        let repo = tokenize(["sum", "--help"]).unwrap();
        let resolved = resolve(&mut root, repo).unwrap();
        assert_eq!(resolved.command.name(), "sum");
        assert!(resolved.repository.leading.is_empty());
    }

    #[test]
    fn test_unresolved_leading_tokens_with_flags_fail() {
        let mut root = tree();
        let repo = tokenize(["sum", "1", "--help"]).unwrap();
        let err = resolve(&mut root, repo).unwrap_err();
        assert_eq!(
            err,
            SyntaxError::PositionalBeforeFlags {
                positionals: vec!["1".to_string()],
                flags: vec!["help".to_string()],
            }
        );
    }
}
