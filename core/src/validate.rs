//! Coercion and constraint checks over a bound command.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. every set flag, in declaration order: coerce, run its checks, then
//!    count it towards its group (a second set member of a mutually
//!    exclusive group fails right away);
//! 2. every always-together group with some but not all members set;
//! 3. every argument, in declaration order: missing value, coerce, checks.

use tracing::debug;

use crate::command::Command;
use crate::error::ValidationError;
use crate::schema::{Binding, GroupKind};

/// Validates the values bound onto `command`.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate(command: &mut Command) -> Result<(), ValidationError> {
    let Command {
        name,
        flags,
        groups,
        arguments,
        ..
    } = command;
    debug!(command = %name, "Validating bound values");

    for group in groups.iter_mut() {
        group.met = 0;
    }

    for flag in flags.iter_mut().filter(|f| f.is_set()) {
        flag.coerce_and_check()?;

        let Some(id) = flag.group else {
            continue;
        };
        let Some(group) = groups.get_mut(id.0) else {
            continue;
        };
        group.met += 1;
        if group.kind == GroupKind::MutuallyExclusive && group.met > 1 {
            return Err(ValidationError::MutuallyExclusive {
                flags: group.members.clone(),
            });
        }
    }

    for group in groups.iter() {
        if group.kind == GroupKind::AlwaysTogether
            && group.met > 0
            && group.met < group.members.len()
        {
            return Err(ValidationError::AlwaysTogether {
                flags: group.members.clone(),
            });
        }
    }

    for argument in arguments.iter_mut() {
        if !argument.is_set() {
            return Err(ValidationError::MissingValue {
                argument: argument.name.clone(),
            });
        }
        argument.coerce_and_check()?;
    }

    debug!(command = %name, "Validation passed");
    Ok(())
}
