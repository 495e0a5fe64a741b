//! Prints a message a given number of times.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argbind-demos --example echo -- --uppercase true hello 3
//! cargo run -p argbind-demos --example echo -- -h
//! ```

use argbind_core::{ArgumentDecl, Command, FlagDecl, Kind, Outcome};

fn root() -> Command {
    Command::new("echo")
        .with_description("Just prints <message> in format you specified")
        .with_mutually_exclusive_flags([
            FlagDecl::new("uppercase", 'u', Kind::BOOL)
                .with_description("Print <message> in uppercase"),
            FlagDecl::new("lowercase", 'l', Kind::BOOL)
                .with_description("Print <message> in lowercase"),
        ])
        .with_arguments([
            ArgumentDecl::new("message", Kind::STRING).with_description("Message to print"),
            ArgumentDecl::new("amount", Kind::INT32)
                .with_description("Print <message> `n` times")
                .with_check(|v| match v.get::<i32>() {
                    Some(n) if n >= 0 => Ok(()),
                    _ => Err("amount cannot be negative".to_string()),
                }),
        ])
        .with_action(|ctx| {
            let mut message = ctx.arg::<String>("message").unwrap_or_default();
            if ctx.flag::<bool>("uppercase") == Some(true) {
                message = message.to_uppercase();
            }
            if ctx.flag::<bool>("lowercase") == Some(true) {
                message = message.to_lowercase();
            }
            for _ in 0..ctx.arg::<i32>("amount").unwrap_or(1) {
                println!("{message}");
            }
            Ok(())
        })
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
