//! Error types for every stage of the parse, bind and validate pipeline.
//!
//! Each stage reports its own enum so callers can match on the failure they
//! care about; [`Error`] wraps the recoverable ones for the top-level
//! [`Command::run`](crate::Command::run) entry point.

use thiserror::Error;

use crate::kind::Kind;

/// Boxed error returned by a command action.
pub type ActionError = Box<dyn std::error::Error + Send + Sync>;

/// Programmer mistakes detected while a schema is being declared.
///
/// These are not caused by user input. The `with_*` builder methods on
/// [`Command`](crate::Command) panic with this error's message; the
/// `add_*` methods return it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// Two flags on one command share a long name.
    #[error("long flag '--{flag}' is already defined for command '{command}'")]
    DuplicateFlag { flag: String, command: String },
    /// Two flags on one command share a short alias.
    #[error("short flag '-{short}' is already defined for command '{command}'")]
    DuplicateShort { short: char, command: String },
    /// Two arguments on one command share a name.
    #[error("argument '{argument}' is already defined for command '{command}'")]
    DuplicateArgument { argument: String, command: String },
    /// Two subcommands of one parent share a name.
    #[error("subcommand '{subcommand}' is already defined on command '{command}'")]
    DuplicateSubcommand { subcommand: String, command: String },
    /// Long flag name is empty, starts with `-` or contains `=`.
    #[error("invalid flag name '{0}'")]
    InvalidFlagName(String),
    /// Short alias is `-` or whitespace, which no token can spell.
    #[error("invalid short alias '{short}' for flag '{flag}'")]
    InvalidShortAlias { short: char, flag: String },
    /// Argument name is empty.
    #[error("argument name cannot be empty on command '{0}'")]
    InvalidArgumentName(String),
    /// A group refers to a flag the command does not declare.
    #[error("group on command '{command}' refers to undeclared flag '{flag}'")]
    UnknownGroupMember { flag: String, command: String },
}

/// Malformed argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// `--`, `-` or `--=value`.
    #[error("flag name cannot be empty: '{token}'")]
    EmptyFlagName { token: String },
    /// A flag token showed up after the first trailing positional.
    #[error("flags are not allowed after positional arguments: '{token}'")]
    FlagAfterPositional { token: String },
    /// Leading tokens that did not resolve to subcommands were mixed with flags.
    #[error("met positional arguments {positionals:?} before flags {flags:?}")]
    PositionalBeforeFlags {
        positionals: Vec<String>,
        flags: Vec<String>,
    },
}

/// Failure to map a repository onto the selected command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The flag name or alias is not declared on the command.
    #[error("unexpected flag '{}{flag}' for command '{command}'", flag_prefix(.long))]
    UnknownFlag {
        flag: String,
        long: bool,
        command: String,
    },
}

fn flag_prefix(long: &bool) -> &'static str {
    if *long { "--" } else { "-" }
}

/// Raw text that does not parse as the declared kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid {kind} syntax: '{raw}'")]
    InvalidInteger { raw: String, kind: Kind },
    #[error("value '{raw}' is out of range for {kind}")]
    IntegerOutOfRange { raw: String, kind: Kind },
    #[error("invalid {kind} syntax: '{raw}'")]
    InvalidFloat { raw: String, kind: Kind },
    #[error("value '{raw}' is out of range for {kind}")]
    FloatOutOfRange { raw: String, kind: Kind },
    #[error("invalid bool syntax: '{raw}'")]
    InvalidBool { raw: String },
}

/// Failures found while validating bound values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The bound text did not coerce to the declared kind.
    #[error("invalid value for '{name}': {source}")]
    Format {
        name: String,
        #[source]
        source: FormatError,
    },
    /// A custom validator rejected the value.
    #[error("invalid value for '{name}': {message}")]
    Check { name: String, message: String },
    /// More than one member of a mutually exclusive group was set.
    #[error("flags {flags:?} are mutually exclusive")]
    MutuallyExclusive { flags: Vec<String> },
    /// Some but not all members of an always-together group were set.
    #[error("flags {flags:?} have to be passed together")]
    AlwaysTogether { flags: Vec<String> },
    /// A declared argument received no value.
    #[error("missing value for argument '{argument}'")]
    MissingValue { argument: String },
}

/// Unrecognised kind name in a declaration document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value kind '{0}'")]
pub struct UnknownKind(pub String);

/// Any recoverable failure of a single invocation.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The command's action returned an error.
    #[error("command '{command}' failed: {source}")]
    Action {
        command: String,
        #[source]
        source: ActionError,
    },
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
