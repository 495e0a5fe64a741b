//! Assignment of repository tokens onto a command's flags and arguments.

use tracing::debug;

use crate::command::Command;
use crate::error::BindError;
use crate::schema::Binding;
use crate::tokenizer::Repository;

fn matches_short(name: &str, short: char) -> bool {
    let mut chars = name.chars();
    chars.next() == Some(short) && chars.next().is_none()
}

/// Binds raw values from `repository` onto `command`.
///
/// Leading tokens fill arguments first, trailing tokens continue where they
/// stopped. Tokens beyond the declared arguments are dropped. Flags are
/// matched by long name or short alias depending on how they were spelled.
///
/// # Errors
///
/// Returns [`BindError::UnknownFlag`] for a flag the command does not
/// declare.
pub fn bind(command: &mut Command, repository: &Repository) -> Result<(), BindError> {
    let mut slots = command.arguments.iter_mut();
    let mut dropped = 0usize;

    for token in &repository.leading {
        match slots.next() {
            Some(argument) => argument.bind_raw(token.as_str()),
            None => dropped += 1,
        }
    }

    for (name, entry) in &repository.flags {
        let flag = command.flags.iter_mut().find(|f| {
            if entry.long {
                f.name == *name
            } else {
                matches_short(name, f.short)
            }
        });
        let Some(flag) = flag else {
            return Err(BindError::UnknownFlag {
                flag: name.clone(),
                long: entry.long,
                command: command.name.clone(),
            });
        };
        flag.bind_raw(entry.value.as_str());
    }

    for token in &repository.trailing {
        match slots.next() {
            Some(argument) => argument.bind_raw(token.as_str()),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(command = %command.name, dropped, "Dropped excess positional arguments");
    }
    Ok(())
}
