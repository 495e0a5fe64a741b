//! Declaration documents: command trees described in YAML or JSON.
//!
//! A document mirrors the builder API without the parts that need code
//! (custom checks and actions):
//!
//! ```yaml
//! name: echo
//! description: Print a message
//! flags:
//!   - { name: amount, short: n, kind: int32 }
//!   - { name: lowercase, short: l, kind: bool }
//!   - { name: uppercase, short: u, kind: bool }
//! groups:
//!   - kind: mutually_exclusive
//!     flags: [lowercase, uppercase]
//! arguments:
//!   - { name: message, kind: string }
//! ```
//!
//! Flags not named by any entry of `groups` form one unconstrained group.
//! Flags keep the order of the `flags` list, which is the order help lists
//! them and validation visits them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::command::Command;
use crate::error::DeclarationError;
use crate::kind::Kind;
use crate::schema::{ArgumentDecl, FlagDecl, GroupKind};

/// Errors that can occur while loading a declaration document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document parsed but describes an invalid command tree.
    #[error("invalid declaration: {0}")]
    Declaration(#[from] DeclarationError),

    /// File extension is not `.json`, `.yaml` or `.yml`.
    #[error("unsupported document format: '{0}'")]
    UnsupportedFormat(String),
}

/// One command and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
    #[serde(default)]
    pub flags: Vec<FlagDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupDocument>,
    #[serde(default)]
    pub arguments: Vec<ArgumentDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<CommandDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagDocument {
    pub name: String,
    pub short: char,
    pub kind: Kind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
}

/// Constraint applied to a set of already listed flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDocument {
    pub kind: ConstraintKind,
    /// Long names of flags from the command's `flags` list.
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    MutuallyExclusive,
    AlwaysTogether,
}

impl From<ConstraintKind> for GroupKind {
    fn from(kind: ConstraintKind) -> Self {
        match kind {
            ConstraintKind::MutuallyExclusive => GroupKind::MutuallyExclusive,
            ConstraintKind::AlwaysTogether => GroupKind::AlwaysTogether,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDocument {
    pub name: String,
    pub kind: Kind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl FlagDocument {
    fn to_decl(&self) -> FlagDecl {
        FlagDecl::new(self.name.as_str(), self.short, self.kind)
            .with_description(self.description.as_str())
            .deprecated(self.deprecated)
    }
}

impl CommandDocument {
    /// Loads a document, choosing the parser from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnsupportedFormat`] for an unknown extension,
    /// [`DocumentError::Io`] if the file cannot be read, or the parser's error
    /// if the contents are malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let reader = match extension {
            "json" | "yaml" | "yml" => std::io::BufReader::new(std::fs::File::open(path)?),
            _ => return Err(DocumentError::UnsupportedFormat(path.display().to_string())),
        };
        debug!(path = %path.display(), "Loading declaration document");

        let document = if extension == "json" {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        Ok(document)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builds the command tree this document describes.
    ///
    /// # Errors
    ///
    /// Returns a [`DeclarationError`] for duplicate names, invalid names, or
    /// a group member that is not listed under `flags` (or already belongs
    /// to another group).
    pub fn into_command(self) -> Result<Command, DeclarationError> {
        let CommandDocument {
            name,
            description,
            deprecated,
            flags,
            groups,
            arguments,
            subcommands,
        } = self;
        let mut command = Command::new(name.as_str())
            .with_description(description)
            .deprecated(deprecated);

        let mut claimed = vec![false; flags.len()];
        let mut constrained = Vec::with_capacity(groups.len());
        for group in &groups {
            let mut members = Vec::with_capacity(group.flags.len());
            for member in &group.flags {
                let Some(index) = flags.iter().position(|f| f.name == *member) else {
                    return Err(DeclarationError::UnknownGroupMember {
                        flag: member.clone(),
                        command: name,
                    });
                };
                if claimed[index] {
                    return Err(DeclarationError::DuplicateFlag {
                        flag: member.clone(),
                        command: name,
                    });
                }
                claimed[index] = true;
                members.push(flags[index].to_decl());
            }
            constrained.push((GroupKind::from(group.kind), members));
        }

        let unconstrained: Vec<FlagDecl> = flags
            .iter()
            .zip(&claimed)
            .filter(|(_, claimed)| !**claimed)
            .map(|(flag, _)| flag.to_decl())
            .collect();
        if !unconstrained.is_empty() {
            command.add_group(GroupKind::Default, unconstrained)?;
        }
        for (kind, members) in constrained {
            command.add_group(kind, members)?;
        }
        // Help first, then the order of the `flags` list.
        command
            .flags
            .sort_by_key(|flag| flags.iter().position(|f| f.name == flag.name));

        for argument in arguments {
            command.add_argument(
                ArgumentDecl::new(argument.name, argument.kind)
                    .with_description(argument.description),
            )?;
        }

        for subcommand in subcommands {
            command.add_subcommand(subcommand.into_command()?)?;
        }

        Ok(command)
    }
}
