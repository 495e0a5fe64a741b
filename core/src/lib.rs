//! Declarative command-line argument binding.
//!
//! A command tree is declared once and then run against an argument vector.
//! The pipeline stages are public so each can be used on its own:
//!
//! - [`tokenize`] splits raw arguments into a [`Repository`] of leading
//!   positionals, flags and trailing positionals.
//! - [`resolve`] walks leading tokens down the subcommand tree.
//! - [`bind`] assigns raw values onto the selected command's flags and
//!   arguments.
//! - [`validate`] coerces values to their declared [`Kind`], runs custom
//!   checks and enforces flag group constraints.
//!
//! [`Command::parse`] and [`Command::run`] chain the stages and, for `run`,
//! call the command's action. Command trees can also be loaded from YAML or
//! JSON through [`CommandDocument`].
//!
//! # Example
//!
//! ```
//! use argbind_core::*;
//!
//! let mut echo = Command::new("echo")
//!     .with_flags([FlagDecl::new("amount", 'n', Kind::INT32)
//!         .with_check(|v| match v.get::<i32>() {
//!             Some(n) if n > 0 => Ok(()),
//!             _ => Err("must be positive".to_string()),
//!         })])
//!     .with_mutually_exclusive_flags([
//!         FlagDecl::new("lowercase", 'l', Kind::BOOL),
//!         FlagDecl::new("uppercase", 'u', Kind::BOOL),
//!     ])
//!     .with_arguments([ArgumentDecl::new("message", Kind::STRING)]);
//!
//! let err = echo.parse(["hello", "-n", "3"]).unwrap_err();
//! assert!(matches!(err, Error::Syntax(_)));
//!
//! let invocation = echo.parse(["-u", "true", "-n", "3", "hello"]).unwrap();
//! let ctx = invocation.context();
//! assert_eq!(ctx.flag::<i32>("amount"), Some(3));
//! assert_eq!(ctx.flag::<bool>("uppercase"), Some(true));
//! assert_eq!(ctx.arg::<String>("message").as_deref(), Some("hello"));
//!
//! let err = echo.parse(["-n", "0", "hello"]).unwrap_err();
//! assert_eq!(err.to_string(), "invalid value for 'amount': must be positive");
//! ```

mod bind;
mod command;
pub mod document;
mod error;
mod help;
mod kind;
mod schema;
mod tokenizer;
mod validate;
mod walk;

pub use bind::bind;
pub use command::{
    Action, Bindings, Command, Context, HELP_FLAG, HELP_SHORT, Invocation, Outcome,
};
pub use document::{CommandDocument, DocumentError};
pub use error::{
    ActionError, BindError, DeclarationError, Error, FormatError, Result, SyntaxError,
    UnknownKind, ValidationError,
};
pub use kind::{Coercer, FloatWidth, FromValue, IntWidth, Kind, Value, coerce};
pub use schema::{
    ArgumentDecl, Binding, BoundValue, Check, FlagDecl, Group, GroupId, GroupKind,
};
pub use tokenizer::{FlagEntry, Repository, is_long_flag, is_short_flag, tokenize};
pub use validate::validate;
pub use walk::{Resolved, resolve};
