//! Command schema declaration and the run pipeline.
//!
//! A [`Command`] is declared once with the `with_*` builders and then run
//! against an argument vector:
//!
//! ```text
//! args -> tokenize -> resolve subcommand -> bind -> validate -> action
//! ```
//!
//! Binding and validation write into the command's flags, arguments and
//! group counters, so both take `&mut self`. Clone the command to run the
//! same schema from several threads.
//!
//! # Examples
//!
//! ```
//! use argbind_core::{ArgumentDecl, Command, FlagDecl, Kind, Outcome};
//!
//! let mut calc = Command::new("calc")
//!     .with_description("Do some basic arithmetic")
//!     .with_mutually_exclusive_flags([
//!         FlagDecl::new("sum", 's', Kind::BOOL),
//!         FlagDecl::new("diff", 'd', Kind::BOOL),
//!     ])
//!     .with_arguments([
//!         ArgumentDecl::new("x", Kind::INT64),
//!         ArgumentDecl::new("y", Kind::INT64),
//!     ]);
//!
//! let invocation = calc.parse(["--sum", "true", "1", "2"]).unwrap();
//! let ctx = invocation.context();
//! assert_eq!(ctx.flag::<bool>("sum"), Some(true));
//! assert_eq!(ctx.arg::<i64>("x"), Some(1));
//! assert_eq!(ctx.arg::<i64>("y"), Some(2));
//!
//! assert!(calc.run(["-s", "-d", "1", "2"]).is_err());
//! assert!(matches!(calc.run(["--help"]).unwrap(), Outcome::Help(_)));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::bind::bind;
use crate::error::{ActionError, DeclarationError, Error, Result};
use crate::kind::{FromValue, Kind, Value};
use crate::schema::{ArgumentDecl, Binding, FlagDecl, Group, GroupId, GroupKind};
use crate::tokenizer::tokenize;
use crate::validate::validate;
use crate::walk::resolve;

/// Long name of the flag every command declares.
pub const HELP_FLAG: &str = "help";
/// Short alias of the help flag.
pub const HELP_SHORT: char = 'h';

/// Callback executed after a successful parse.
pub type Action = Arc<dyn Fn(&Context<'_>) -> std::result::Result<(), ActionError> + Send + Sync>;

/// The declared shape of one command.
#[derive(Clone)]
pub struct Command {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) deprecated: bool,
    pub(crate) subcommands: Vec<Command>,
    pub(crate) flags: Vec<FlagDecl>,
    pub(crate) groups: Vec<Group>,
    pub(crate) arguments: Vec<ArgumentDecl>,
    pub(crate) action: Option<Action>,
}

impl Command {
    /// Creates a command with only the built-in help flag.
    pub fn new(name: impl Into<String>) -> Self {
        let help = FlagDecl::new(HELP_FLAG, HELP_SHORT, Kind::BOOL)
            .with_description("Print this message");
        Self {
            name: name.into(),
            description: String::new(),
            deprecated: false,
            subcommands: Vec::new(),
            flags: vec![help],
            groups: Vec::new(),
            arguments: Vec::new(),
            action: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// Adds unconstrained flags.
    ///
    /// # Panics
    ///
    /// Panics if a long name or short alias is already declared.
    pub fn with_flags(self, flags: impl IntoIterator<Item = FlagDecl>) -> Self {
        self.with_group(GroupKind::Default, flags)
    }

    /// Adds flags of which at most one may be set.
    ///
    /// # Panics
    ///
    /// Panics if a long name or short alias is already declared.
    pub fn with_mutually_exclusive_flags(self, flags: impl IntoIterator<Item = FlagDecl>) -> Self {
        self.with_group(GroupKind::MutuallyExclusive, flags)
    }

    /// Adds flags that must be set all together or not at all.
    ///
    /// # Panics
    ///
    /// Panics if a long name or short alias is already declared.
    pub fn with_always_together_flags(self, flags: impl IntoIterator<Item = FlagDecl>) -> Self {
        self.with_group(GroupKind::AlwaysTogether, flags)
    }

    /// Adds positional arguments after the existing ones.
    ///
    /// # Panics
    ///
    /// Panics on a duplicate or empty argument name.
    pub fn with_arguments(mut self, arguments: impl IntoIterator<Item = ArgumentDecl>) -> Self {
        for argument in arguments {
            if let Err(err) = self.add_argument(argument) {
                panic!("invalid command: {err}");
            }
        }
        self
    }

    /// Adds a nested command.
    ///
    /// # Panics
    ///
    /// Panics if a subcommand with the same name exists.
    pub fn with_subcommand(mut self, subcommand: Command) -> Self {
        if let Err(err) = self.add_subcommand(subcommand) {
            panic!("invalid command: {err}");
        }
        self
    }

    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&Context<'_>) -> std::result::Result<(), ActionError> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    fn with_group(mut self, kind: GroupKind, flags: impl IntoIterator<Item = FlagDecl>) -> Self {
        if let Err(err) = self.add_group(kind, flags) {
            panic!("invalid command: {err}");
        }
        self
    }

    /// Declares a group of flags, rejecting the whole batch on conflict.
    pub fn add_group(
        &mut self,
        kind: GroupKind,
        flags: impl IntoIterator<Item = FlagDecl>,
    ) -> std::result::Result<GroupId, DeclarationError> {
        let flags: Vec<FlagDecl> = flags.into_iter().collect();

        for (i, flag) in flags.iter().enumerate() {
            if flag.name.is_empty() || flag.name.starts_with('-') || flag.name.contains('=') {
                return Err(DeclarationError::InvalidFlagName(flag.name.clone()));
            }
            if flag.short == '-' || flag.short.is_whitespace() {
                return Err(DeclarationError::InvalidShortAlias {
                    short: flag.short,
                    flag: flag.name.clone(),
                });
            }
            let earlier = &flags[..i];
            if self.flag(&flag.name).is_some() || earlier.iter().any(|f| f.name == flag.name) {
                return Err(DeclarationError::DuplicateFlag {
                    flag: flag.name.clone(),
                    command: self.name.clone(),
                });
            }
            if self.flag_by_short(flag.short).is_some()
                || earlier.iter().any(|f| f.short == flag.short)
            {
                return Err(DeclarationError::DuplicateShort {
                    short: flag.short,
                    command: self.name.clone(),
                });
            }
        }

        let id = GroupId(self.groups.len());
        let mut group = Group::new(id, kind);
        for mut flag in flags {
            flag.group = Some(id);
            group.members.push(flag.name.clone());
            self.flags.push(flag);
        }
        self.groups.push(group);
        Ok(id)
    }

    pub fn add_argument(
        &mut self,
        argument: ArgumentDecl,
    ) -> std::result::Result<(), DeclarationError> {
        if argument.name.is_empty() {
            return Err(DeclarationError::InvalidArgumentName(self.name.clone()));
        }
        if self.argument(&argument.name).is_some() {
            return Err(DeclarationError::DuplicateArgument {
                argument: argument.name,
                command: self.name.clone(),
            });
        }
        self.arguments.push(argument);
        Ok(())
    }

    pub fn add_subcommand(
        &mut self,
        subcommand: Command,
    ) -> std::result::Result<(), DeclarationError> {
        if self.find_subcommand(&subcommand.name).is_some() {
            return Err(DeclarationError::DuplicateSubcommand {
                subcommand: subcommand.name,
                command: self.name.clone(),
            });
        }
        self.subcommands.push(subcommand);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn subcommands(&self) -> &[Command] {
        &self.subcommands
    }

    /// Flags in declaration order, help flag first.
    pub fn flags(&self) -> &[FlagDecl] {
        &self.flags
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn arguments(&self) -> &[ArgumentDecl] {
        &self.arguments
    }

    pub fn find_subcommand(&self, name: &str) -> Option<&Command> {
        self.subcommands.iter().find(|c| c.name == name)
    }

    /// Follows `path` down the subcommand tree.
    pub fn find_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Command> {
        path.iter()
            .try_fold(self, |current, name| current.find_subcommand(name.as_ref()))
    }

    pub(crate) fn subcommand_index(&self, name: &str) -> Option<usize> {
        self.subcommands.iter().position(|c| c.name == name)
    }

    /// Looks up a flag by long name.
    pub fn flag(&self, name: &str) -> Option<&FlagDecl> {
        self.flags.iter().find(|f| f.name == name)
    }

    /// Looks up a flag by short alias.
    pub fn flag_by_short(&self, short: char) -> Option<&FlagDecl> {
        self.flags.iter().find(|f| f.short == short)
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentDecl> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// Whether the help flag was bound in the last parse.
    pub fn help_requested(&self) -> bool {
        self.flag(HELP_FLAG).is_some_and(|f| f.is_set())
    }

    /// Clears bound values and group counters in the whole tree.
    pub fn reset(&mut self) {
        for flag in &mut self.flags {
            flag.bound = None;
        }
        for argument in &mut self.arguments {
            argument.bound = None;
        }
        for group in &mut self.groups {
            group.met = 0;
        }
        for subcommand in &mut self.subcommands {
            subcommand.reset();
        }
    }

    /// Tokenizes `args`, selects the subcommand, binds and validates.
    ///
    /// Validation is skipped when the help flag is set; check
    /// [`Invocation::help_requested`].
    ///
    /// # Errors
    ///
    /// Returns the first syntax, binding or validation failure.
    pub fn parse<I, S>(&mut self, args: I) -> Result<Invocation<'_>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reset();
        let repository = tokenize(args)?;
        let resolved = resolve(self, repository)?;
        let command = resolved.command;

        bind(command, &resolved.repository)?;
        warn_deprecated(command, &resolved.path);

        if command.help_requested() {
            debug!(command = %command.name, "Help requested, skipping validation");
            return Ok(Invocation {
                command,
                path: resolved.path,
                help_requested: true,
            });
        }

        validate(command)?;
        Ok(Invocation {
            command,
            path: resolved.path,
            help_requested: false,
        })
    }

    /// Parses `args` and runs the selected command's action.
    ///
    /// # Errors
    ///
    /// Returns the first parse failure, or [`Error::Action`] if the action
    /// failed.
    pub fn run<I, S>(&mut self, args: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = self.parse(args)?;
        if invocation.help_requested {
            return Ok(Outcome::Help(invocation.command.help()));
        }
        invocation.execute()?;
        Ok(Outcome::Completed)
    }
}

fn warn_deprecated(command: &Command, path: &[String]) {
    if command.deprecated {
        warn!(command = %path.join(" "), "Command is deprecated");
    }
    for flag in command.flags.iter().filter(|f| f.deprecated && f.is_set()) {
        warn!(command = %path.join(" "), flag = %flag.name, "Flag is deprecated");
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("deprecated", &self.deprecated)
            .field("subcommands", &self.subcommands)
            .field("flags", &self.flags)
            .field("groups", &self.groups)
            .field("arguments", &self.arguments)
            .field("action", &self.action.is_some())
            .finish()
    }
}

/// Result of [`Command::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Validation passed and the action (if any) succeeded.
    Completed,
    /// The help flag was set; carries the rendered help text.
    Help(String),
}

/// A parsed invocation of one command in the tree.
#[derive(Debug)]
pub struct Invocation<'a> {
    command: &'a Command,
    path: Vec<String>,
    help_requested: bool,
}

impl<'a> Invocation<'a> {
    /// The selected (innermost) command.
    pub fn command(&self) -> &'a Command {
        self.command
    }

    /// Command names from the root to the selected command.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn help_requested(&self) -> bool {
        self.help_requested
    }

    pub fn context(&self) -> Context<'_> {
        Context {
            command: self.command,
            path: &self.path,
        }
    }

    /// Typed values bound in this invocation.
    pub fn bindings(&self) -> Bindings {
        Bindings {
            path: self.path.clone(),
            flags: self
                .command
                .flags
                .iter()
                .filter_map(|f| f.value().map(|v| (f.name.clone(), v.clone())))
                .collect(),
            arguments: self
                .command
                .arguments
                .iter()
                .filter_map(|a| a.value().map(|v| (a.name.clone(), v.clone())))
                .collect(),
        }
    }

    /// Runs the selected command's action, if it has one.
    pub fn execute(&self) -> Result<()> {
        let Some(action) = &self.command.action else {
            debug!(command = %self.command.name, "No action declared");
            return Ok(());
        };
        action(&self.context()).map_err(|source| Error::Action {
            command: self.command.name.clone(),
            source,
        })
    }
}

/// Snapshot of typed values, suitable for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bindings {
    pub path: Vec<String>,
    pub flags: BTreeMap<String, Value>,
    pub arguments: BTreeMap<String, Value>,
}

/// Read access to the values of a validated command.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    command: &'a Command,
    path: &'a [String],
}

impl<'a> Context<'a> {
    pub fn command(&self) -> &'a Command {
        self.command
    }

    pub fn path(&self) -> &'a [String] {
        self.path
    }

    /// Typed value of the flag with long name `name`.
    ///
    /// `None` if the flag is unknown, was not set, or holds another type.
    pub fn flag<T: FromValue>(&self, name: &str) -> Option<T> {
        self.command.flag(name)?.value()?.get()
    }

    /// Typed value of the argument `name`.
    pub fn arg<T: FromValue>(&self, name: &str) -> Option<T> {
        self.command.argument(name)?.value()?.get()
    }

    /// Whether the flag with long name `name` was given.
    pub fn is_set(&self, name: &str) -> bool {
        self.command.flag(name).is_some_and(|f| f.is_set())
    }
}
