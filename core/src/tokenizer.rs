//! Classification of a raw argument vector into a [`Repository`].
//!
//! Tokens are consumed in three phases:
//!
//! 1. **Leading**: every token up to the first flag-shaped one (`-x`,
//!    `--name`). These are subcommand names or command-level arguments.
//! 2. **Flags**: long flags (`--name`, `--name=value`, `--name value`) and
//!    short flags (`-x`, `-x value`, or the cluster `-abc`).
//! 3. **Trailing**: starts at the first non-flag token after a flag. Every
//!    remaining token is a positional; a flag-shaped token here is an error.
//!
//! # Examples
//!
//! ```
//! use argbind_core::tokenize;
//!
//! let repo = tokenize(["sub", "--amount", "10", "-v", "file.txt"]).unwrap();
//! assert_eq!(repo.leading, vec!["sub"]);
//! assert_eq!(repo.flags["amount"].value, "10");
//! assert!(repo.flags["amount"].long);
//! assert_eq!(repo.flags["v"].value, "file.txt");
//! assert!(repo.trailing.is_empty());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::SyntaxError;

/// Raw value recorded for one flag token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagEntry {
    /// Text after `=` or the consumed next token; empty when neither exists.
    pub value: String,
    /// `true` for `--name`, `false` for `-x`.
    pub long: bool,
}

impl FlagEntry {
    pub fn new(value: impl Into<String>, long: bool) -> Self {
        Self {
            value: value.into(),
            long,
        }
    }
}

/// Result of tokenizing one argument vector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Tokens before the first flag.
    pub leading: Vec<String>,
    /// Flag name (without dashes) to its raw value. Later duplicates win.
    pub flags: BTreeMap<String, FlagEntry>,
    /// Tokens after the flags.
    pub trailing: Vec<String>,
}

impl Repository {
    /// Returns `true` if no tokens were recorded at all.
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.flags.is_empty() && self.trailing.is_empty()
    }
}

/// Returns `true` for `--...` tokens.
pub fn is_long_flag(token: &str) -> bool {
    token.starts_with("--")
}

/// Returns `true` for any `-...` token, including long ones.
pub fn is_short_flag(token: &str) -> bool {
    token.starts_with('-')
}

fn is_flag(token: &str) -> bool {
    is_long_flag(token) || is_short_flag(token)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Flags,
    Trailing,
}

/// Splits `args` into leading tokens, flag entries and trailing tokens.
///
/// # Errors
///
/// Returns [`SyntaxError::EmptyFlagName`] for `-`, `--` and `--=value`, and
/// [`SyntaxError::FlagAfterPositional`] when a flag follows a trailing
/// positional.
pub fn tokenize<I, S>(args: I) -> Result<Repository, SyntaxError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();

    let split = args.iter().position(|a| is_flag(a)).unwrap_or(args.len());
    let mut repo = Repository {
        leading: args[..split].to_vec(),
        ..Repository::default()
    };

    let rest = &args[split..];
    let mut phase = Phase::Flags;
    let mut i = 0;

    while i < rest.len() {
        let token = &rest[i];
        // Value for a flag, if the next token is not itself a flag.
        let next_value = rest.get(i + 1).filter(|next| !is_flag(next));

        if phase == Phase::Trailing {
            if is_flag(token) {
                return Err(SyntaxError::FlagAfterPositional {
                    token: token.clone(),
                });
            }
            trace!(token = %token, "Trailing positional");
            repo.trailing.push(token.clone());
            i += 1;
            continue;
        }

        if let Some(body) = token.strip_prefix("--") {
            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (body, None),
            };
            if name.is_empty() {
                return Err(SyntaxError::EmptyFlagName {
                    token: token.clone(),
                });
            }

            let value = match (inline, next_value) {
                (Some(value), _) => value.to_string(),
                (None, Some(next)) => {
                    i += 1;
                    next.clone()
                }
                (None, None) => String::new(),
            };
            trace!(flag = name, value = %value, "Long flag");
            repo.flags
                .insert(name.to_string(), FlagEntry::new(value, true));
        } else if let Some(body) = token.strip_prefix('-') {
            let mut chars = body.chars();
            match (chars.next(), chars.next()) {
                (None, _) => {
                    return Err(SyntaxError::EmptyFlagName {
                        token: token.clone(),
                    });
                }
                (Some(short), None) => {
                    let value = match next_value {
                        Some(next) => {
                            i += 1;
                            next.clone()
                        }
                        None => String::new(),
                    };
                    trace!(flag = %short, value = %value, "Short flag");
                    repo.flags
                        .insert(short.to_string(), FlagEntry::new(value, false));
                }
                (Some(_), Some(_)) => {
                    trace!(cluster = body, "Short flag cluster");
                    for short in body.chars() {
                        repo.flags
                            .insert(short.to_string(), FlagEntry::new("", false));
                    }
                }
            }
        } else {
            phase = Phase::Trailing;
            trace!(token = %token, "Trailing positional");
            repo.trailing.push(token.clone());
        }

        i += 1;
    }

    debug!(
        leading = repo.leading.len(),
        flags = repo.flags.len(),
        trailing = repo.trailing.len(),
        "Tokenized arguments"
    );
    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(entries: &[(&str, &str, bool)]) -> BTreeMap<String, FlagEntry> {
        entries
            .iter()
            .map(|(name, value, long)| (name.to_string(), FlagEntry::new(*value, *long)))
            .collect()
    }

    #[test]
    fn test_long_flag_forms() {
        let cases: &[(&[&str], &[(&str, &str, bool)])] = &[
            (&["--key", "value"], &[("key", "value", true)]),
            (&["--key=value"], &[("key", "value", true)]),
            (&["--key='value'"], &[("key", "'value'", true)]),
            (&["--key="], &[("key", "", true)]),
            (&["--key", "ikey=ivalue"], &[("key", "ikey=ivalue", true)]),
            (&["--key=ikey=ivalue"], &[("key", "ikey=ivalue", true)]),
            (
                &["--akey", "--bkey", "value"],
                &[("akey", "", true), ("bkey", "value", true)],
            ),
        ];

        for (args, expected) in cases {
            let repo = tokenize(args.iter().copied()).unwrap();
            assert_eq!(repo.flags, flags(expected), "args: {args:?}");
            assert!(repo.leading.is_empty());
            assert!(repo.trailing.is_empty());
        }
    }

    #[test]
    fn test_empty_long_names_are_rejected() {
        for args in [vec!["--=ikey=ivalue"], vec!["--", "ikey=ivalue"], vec!["-"]] {
            let err = tokenize(args.clone()).unwrap_err();
            assert!(
                matches!(err, SyntaxError::EmptyFlagName { .. }),
                "args: {args:?}"
            );
        }
    }

    #[test]
    fn test_short_flag_forms() {
        let cases: &[(&[&str], &[(&str, &str, bool)])] = &[
            (&["-k", "value"], &[("k", "value", false)]),
            (
                &["-abc"],
                &[("a", "", false), ("b", "", false), ("c", "", false)],
            ),
            (
                &["-a", "-b", "-c"],
                &[("a", "", false), ("b", "", false), ("c", "", false)],
            ),
            (
                &["-a", "-b", "-c", "value"],
                &[("a", "", false), ("b", "", false), ("c", "value", false)],
            ),
        ];

        for (args, expected) in cases {
            let repo = tokenize(args.iter().copied()).unwrap();
            assert_eq!(repo.flags, flags(expected), "args: {args:?}");
        }
    }

    #[test]
    fn test_cluster_never_consumes_a_value() {
        let repo = tokenize(["-abc", "value"]).unwrap();
        assert_eq!(
            repo.flags,
            flags(&[("a", "", false), ("b", "", false), ("c", "", false)])
        );
        assert_eq!(repo.trailing, vec!["value"]);
    }

    #[test]
    fn test_only_positionals_stay_leading() {
        let repo = tokenize(["command", "subcommand", "argument"]).unwrap();
        assert_eq!(repo.leading, vec!["command", "subcommand", "argument"]);
        assert!(repo.flags.is_empty());
        assert!(repo.trailing.is_empty());
    }

    #[test]
    fn test_mixed_leading_flags_trailing() {
        let repo = tokenize([
            "command",
            "subcommand",
            "--flag",
            "flag-value",
            "argument",
        ])
        .unwrap();
        assert_eq!(repo.leading, vec!["command", "subcommand"]);
        assert_eq!(repo.flags, flags(&[("flag", "flag-value", true)]));
        assert_eq!(repo.trailing, vec!["argument"]);

        let repo = tokenize([
            "command",
            "subcommand",
            "--flag",
            "flag-value",
            "--another-flag=argument",
        ])
        .unwrap();
        assert_eq!(
            repo.flags,
            flags(&[("flag", "flag-value", true), ("another-flag", "argument", true)])
        );
        assert!(repo.trailing.is_empty());
    }

    #[test]
    fn test_flag_after_trailing_positional_is_rejected() {
        let err = tokenize([
            "command",
            "subcommand",
            "--flag",
            "flag-value",
            "incorrect-argument",
            "--another-flag=argument",
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SyntaxError::FlagAfterPositional {
                token: "--another-flag=argument".to_string()
            }
        );
    }

    #[test]
    fn test_last_duplicate_wins() {
        let repo = tokenize(["--name", "first", "--name=second"]).unwrap();
        assert_eq!(repo.flags, flags(&[("name", "second", true)]));
    }

    #[test]
    fn test_tokenizing_is_deterministic() {
        let args = ["a", "--x", "1", "-yz", "b", "c"];
        assert_eq!(tokenize(args).unwrap(), tokenize(args).unwrap());
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize(Vec::<String>::new()).unwrap().is_empty());
    }
}
