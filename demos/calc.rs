//! Arithmetic on two integers.
//!
//! The root command picks the operation with a mutually exclusive flag pair,
//! the `sum` and `diff` subcommands fix it.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argbind-demos --example calc -- --sum true 3 4
//! cargo run -p argbind-demos --example calc -- diff 10 4
//! cargo run -p argbind-demos --example calc -- --help
//! ```

use argbind_core::{ActionError, ArgumentDecl, Command, Context, FlagDecl, Kind, Outcome};

fn operands(verb: &str) -> [ArgumentDecl; 2] {
    [
        ArgumentDecl::new("x", Kind::INT64)
            .with_description(format!("First operand in {verb} operation")),
        ArgumentDecl::new("y", Kind::INT64)
            .with_description(format!("Second operand in {verb} operation")),
    ]
}

fn xy(ctx: &Context<'_>) -> Result<(i64, i64), ActionError> {
    let x = ctx.arg::<i64>("x").ok_or("missing operand 'x'")?;
    let y = ctx.arg::<i64>("y").ok_or("missing operand 'y'")?;
    Ok((x, y))
}

fn sum(x: i64, y: i64) -> Result<i64, ActionError> {
    Ok(x.checked_add(y).ok_or("integer overflow")?)
}

fn diff(x: i64, y: i64) -> Result<i64, ActionError> {
    Ok(x.checked_sub(y).ok_or("integer overflow")?)
}

fn calc(ctx: &Context<'_>) -> Result<(), ActionError> {
    let (x, y) = xy(ctx)?;
    let result = if ctx.flag::<bool>("sum") == Some(true) {
        sum(x, y)?
    } else if ctx.flag::<bool>("diff") == Some(true) {
        diff(x, y)?
    } else {
        0
    };
    println!("{result}");
    Ok(())
}

fn root() -> Command {
    Command::new("calc")
        .with_description("Do some basic arithmetic operations")
        .with_arguments(operands("sum"))
        .with_mutually_exclusive_flags([
            FlagDecl::new("sum", 's', Kind::BOOL).with_description("Do '+' arithmetic operation"),
            FlagDecl::new("diff", 'd', Kind::BOOL).with_description("Do '-' arithmetic operation"),
        ])
        .with_action(calc)
        .with_subcommand(
            Command::new("sum")
                .with_description("Calculate sum of two integers")
                .with_arguments(operands("sum"))
                .with_action(|ctx| {
                    let (x, y) = xy(ctx)?;
                    println!("{}", sum(x, y)?);
                    Ok(())
                }),
        )
        .with_subcommand(
            Command::new("diff")
                .with_description("Calculate difference between two integers")
                .with_arguments(operands("diff"))
                .with_action(|ctx| {
                    let (x, y) = xy(ctx)?;
                    println!("{}", diff(x, y)?);
                    Ok(())
                }),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    match root().run(std::env::args().skip(1)) {
        Ok(Outcome::Completed) => {}
        Ok(Outcome::Help(text)) => print!("{text}"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
