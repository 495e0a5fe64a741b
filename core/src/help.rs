//! Plain-text usage line and help page for a [`Command`].

use std::fmt::Write as _;

use crate::command::Command;
use crate::schema::GroupKind;

const DEPRECATED: &str = "[DEPRECATED] ";

impl Command {
    /// POSIX-style usage line.
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind_core::{ArgumentDecl, Command, FlagDecl, Kind};
    ///
    /// let echo = Command::new("echo")
    ///     .with_flags([FlagDecl::new("amount", 'n', Kind::INT32)])
    ///     .with_mutually_exclusive_flags([
    ///         FlagDecl::new("uppercase", 'u', Kind::BOOL),
    ///         FlagDecl::new("lowercase", 'l', Kind::BOOL),
    ///     ])
    ///     .with_arguments([ArgumentDecl::new("message", Kind::STRING)]);
    ///
    /// assert_eq!(echo.usage(), "echo [ -n ] [ -u | -l ] message");
    /// ```
    pub fn usage(&self) -> String {
        let mut out = self.name.clone();

        if !self.subcommands.is_empty() {
            let names: Vec<&str> = self.subcommands.iter().map(|c| c.name()).collect();
            let _ = write!(out, " [ {} ]", names.join(" | "));
        }

        for group in &self.groups {
            let shorts: Vec<String> = group
                .members
                .iter()
                .filter_map(|name| self.flag(name))
                .map(|flag| format!("-{}", flag.short))
                .collect();
            if shorts.is_empty() {
                continue;
            }
            match group.kind {
                GroupKind::Default => {
                    for short in &shorts {
                        let _ = write!(out, " [ {short} ]");
                    }
                }
                GroupKind::MutuallyExclusive => {
                    let _ = write!(out, " [ {} ]", shorts.join(" | "));
                }
                GroupKind::AlwaysTogether => {
                    let _ = write!(out, " [ {} ]", shorts.join(" "));
                }
            }
        }

        for argument in &self.arguments {
            let _ = write!(out, " {}", argument.name);
        }

        out
    }

    /// Full help page: usage, description, flags, arguments, subcommands.
    pub fn help(&self) -> String {
        let mut out = String::new();

        if self.deprecated {
            out.push_str(DEPRECATED);
        }
        out.push_str(&self.usage());
        out.push('\n');
        if !self.description.is_empty() {
            out.push_str(&self.description);
            out.push('\n');
        }

        out.push_str("\nFlags:\n");
        for flag in &self.flags {
            let marker = if flag.deprecated { DEPRECATED } else { "" };
            let head = format!("{marker}-{} | --{} [{}]", flag.short, flag.name, flag.kind);
            entry(&mut out, &head, &flag.description);
        }

        if !self.arguments.is_empty() {
            out.push_str("\nArguments:\n");
            for argument in &self.arguments {
                let head = format!("{} [{}]", argument.name, argument.kind);
                entry(&mut out, &head, &argument.description);
            }
        }

        if !self.subcommands.is_empty() {
            out.push_str("\nSubcommands:\n");
            for subcommand in &self.subcommands {
                let mut description = subcommand.description.clone();
                if subcommand.deprecated {
                    description.push_str(" [DEPRECATED]");
                }
                entry(&mut out, &subcommand.name, description.trim_start());
            }
        }

        out
    }
}

/// One indented help line, `head - description` or just `head`.
fn entry(out: &mut String, head: &str, description: &str) {
    if description.is_empty() {
        let _ = writeln!(out, "    {head}");
    } else {
        let _ = writeln!(out, "    {head} - {description}");
    }
}

#[cfg(test)]
mod tests {
    use crate::command::Command;
    use crate::kind::Kind;
    use crate::schema::{ArgumentDecl, FlagDecl};

    fn calc() -> Command {
        Command::new("calc")
            .with_description("Do some basic arithmetic operations")
            .with_mutually_exclusive_flags([
                FlagDecl::new("sum", 's', Kind::BOOL).with_description("Add"),
                FlagDecl::new("diff", 'd', Kind::BOOL)
                    .with_description("Subtract")
                    .deprecated(true),
            ])
            .with_always_together_flags([
                FlagDecl::new("separator", 'p', Kind::STRING),
                FlagDecl::new("separator-amount", 'a', Kind::INT32),
            ])
            .with_arguments([
                ArgumentDecl::new("x", Kind::INT64).with_description("First operand"),
                ArgumentDecl::new("y", Kind::INT64).with_description("Second operand"),
            ])
            .with_subcommand(Command::new("sum").with_description("Sum two integers"))
            .with_subcommand(
                Command::new("diff")
                    .with_description("Subtract two integers")
                    .deprecated(true),
            )
    }

    #[test]
    fn test_usage_lists_groups_in_declaration_order() {
        assert_eq!(
            calc().usage(),
            "calc [ sum | diff ] [ -s | -d ] [ -p -a ] x y"
        );
        assert_eq!(Command::new("bare").usage(), "bare");
    }

    #[test]
    fn test_help_page() {
        let expected = "\
calc [ sum | diff ] [ -s | -d ] [ -p -a ] x y
Do some basic arithmetic operations

Flags:
    -h | --help [bool] - Print this message
    -s | --sum [bool] - Add
    [DEPRECATED] -d | --diff [bool] - Subtract
    -p | --separator [string]
    -a | --separator-amount [int32]

Arguments:
    x [int64] - First operand
    y [int64] - Second operand

Subcommands:
    sum - Sum two integers
    diff - Subtract two integers [DEPRECATED]
";
        assert_eq!(calc().help(), expected);
    }

    #[test]
    fn test_deprecated_command_is_marked() {
        let help = Command::new("old").deprecated(true).help();
        assert!(help.starts_with("[DEPRECATED] old\n"));
    }
}
