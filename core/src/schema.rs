//! Declared flags, arguments and flag groups.
//!
//! [`FlagDecl`] and [`ArgumentDecl`] differ only in how they are bound (by
//! name versus by position). Both implement [`Binding`], which owns the
//! shared coerce-then-check step run by the validator.

use std::fmt;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::kind::{Kind, Value};

/// Custom validator attached to a flag or argument.
///
/// Runs after coercion succeeded. The returned message is wrapped in
/// [`ValidationError::Check`] together with the entity name.
pub type Check = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// State of a flag or argument within one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    /// Text assigned by the binder, not yet coerced.
    Raw(String),
    /// Value produced by the kind's coercer.
    Typed(Value),
}

/// Common behavior of flags and arguments.
pub trait Binding {
    fn name(&self) -> &str;
    fn kind(&self) -> Kind;
    fn checks(&self) -> &[Check];
    fn bound(&self) -> Option<&BoundValue>;
    fn bound_mut(&mut self) -> &mut Option<BoundValue>;

    /// Whether the binder assigned anything.
    fn is_set(&self) -> bool {
        self.bound().is_some()
    }

    /// Typed value, once validation coerced it.
    fn value(&self) -> Option<&Value> {
        match self.bound() {
            Some(BoundValue::Typed(value)) => Some(value),
            _ => None,
        }
    }

    /// Stores raw text from the binder.
    fn bind_raw(&mut self, raw: impl Into<String>)
    where
        Self: Sized,
    {
        *self.bound_mut() = Some(BoundValue::Raw(raw.into()));
    }

    /// Coerces a raw bound value and runs the custom checks in order.
    ///
    /// Does nothing for unbound entities. The first failing check wins.
    fn coerce_and_check(&mut self) -> Result<(), ValidationError> {
        let kind = self.kind();
        let name = self.name().to_string();

        let value = match self.bound_mut().take() {
            None => return Ok(()),
            Some(BoundValue::Typed(value)) => value,
            Some(BoundValue::Raw(raw)) => match kind.coerce(&raw) {
                Ok(value) => value,
                Err(source) => {
                    *self.bound_mut() = Some(BoundValue::Raw(raw));
                    return Err(ValidationError::Format { name, source });
                }
            },
        };

        let result = self
            .checks()
            .iter()
            .try_for_each(|check| check(&value))
            .map_err(|message| ValidationError::Check { name, message });
        *self.bound_mut() = Some(BoundValue::Typed(value));
        result
    }
}

/// A named option, spelled `--name` or `-x`.
///
/// # Examples
///
/// ```
/// use argbind_core::{FlagDecl, Kind};
///
/// let flag = FlagDecl::new("amount", 'n', Kind::INT32)
///     .with_description("How many times to repeat")
///     .with_check(|v| match v.get::<i32>() {
///         Some(n) if n > 0 => Ok(()),
///         _ => Err("must be positive".into()),
///     });
/// assert_eq!(flag.name, "amount");
/// assert_eq!(flag.short, 'n');
/// ```
#[derive(Clone)]
pub struct FlagDecl {
    pub name: String,
    pub short: char,
    pub description: String,
    pub kind: Kind,
    pub deprecated: bool,
    pub(crate) checks: Vec<Check>,
    pub(crate) bound: Option<BoundValue>,
    pub(crate) group: Option<GroupId>,
}

impl FlagDecl {
    pub fn new(name: impl Into<String>, short: char, kind: Kind) -> Self {
        Self {
            name: name.into(),
            short,
            description: String::new(),
            kind,
            deprecated: false,
            checks: Vec::new(),
            bound: None,
            group: None,
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

    /// Appends a custom validator.
    pub fn with_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.checks.push(Arc::new(check));
        self
    }

    /// Group this flag was declared in.
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }
}

impl Binding for FlagDecl {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> Kind {
        self.kind
    }

    fn checks(&self) -> &[Check] {
        &self.checks
    }

    fn bound(&self) -> Option<&BoundValue> {
        self.bound.as_ref()
    }

    fn bound_mut(&mut self) -> &mut Option<BoundValue> {
        &mut self.bound
    }
}

impl fmt::Debug for FlagDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagDecl")
            .field("name", &self.name)
            .field("short", &self.short)
            .field("kind", &self.kind)
            .field("deprecated", &self.deprecated)
            .field("checks", &self.checks.len())
            .field("bound", &self.bound)
            .field("group", &self.group)
            .finish()
    }
}

/// A positional parameter, bound in declaration order.
#[derive(Clone)]
pub struct ArgumentDecl {
    pub name: String,
    pub description: String,
    pub kind: Kind,
    pub(crate) checks: Vec<Check>,
    pub(crate) bound: Option<BoundValue>,
}

impl ArgumentDecl {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            checks: Vec::new(),
            bound: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a custom validator.
    pub fn with_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.checks.push(Arc::new(check));
        self
    }
}

impl Binding for ArgumentDecl {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> Kind {
        self.kind
    }

    fn checks(&self) -> &[Check] {
        &self.checks
    }

    fn bound(&self) -> Option<&BoundValue> {
        self.bound.as_ref()
    }

    fn bound_mut(&mut self) -> &mut Option<BoundValue> {
        &mut self.bound
    }
}

impl fmt::Debug for ArgumentDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentDecl")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("checks", &self.checks.len())
            .field("bound", &self.bound)
            .finish()
    }
}

/// Constraint applied to the members of a [`Group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// No constraint.
    Default,
    /// At most one member may be set.
    MutuallyExclusive,
    /// Either none or all members must be set.
    AlwaysTogether,
}

/// Sequential identifier of a group within one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub usize);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// A set of flags declared together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub kind: GroupKind,
    /// Long names of the member flags, in declaration order.
    pub members: Vec<String>,
    /// Members observed set during the last validation.
    pub(crate) met: usize,
}

impl Group {
    pub(crate) fn new(id: GroupId, kind: GroupKind) -> Self {
        Self {
            id,
            kind,
            members: Vec::new(),
            met: 0,
        }
    }

    pub fn met(&self) -> usize {
        self.met
    }
}
