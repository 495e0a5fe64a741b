use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use argbind_core::{
    ArgumentDecl, BindError, Binding, Command, Error, FlagDecl, Kind, Outcome, SyntaxError,
    ValidationError,
};

fn echo() -> Command {
    Command::new("echo")
        .with_flags([FlagDecl::new("amount", 'n', Kind::INT64)])
        .with_mutually_exclusive_flags([
            FlagDecl::new("lowercase", 'l', Kind::BOOL),
            FlagDecl::new("uppercase", 'u', Kind::BOOL),
        ])
        .with_always_together_flags([
            FlagDecl::new("separator", 's', Kind::STRING),
            FlagDecl::new("separator-amount", 'a', Kind::INT64),
        ])
}

fn expect_amount(expected: i64) -> Command {
    echo().with_action(move |ctx| match ctx.flag::<i64>("amount") {
        None => Err("amount MUST be set".into()),
        Some(n) if n != expected => Err(format!("amount expected {expected}, got {n}").into()),
        Some(_) => Ok(()),
    })
}

#[test]
fn long_and_short_flag_reach_the_action() {
    assert_eq!(
        expect_amount(10).run(["--amount", "10"]).unwrap(),
        Outcome::Completed
    );
    assert_eq!(expect_amount(10).run(["-n", "10"]).unwrap(), Outcome::Completed);
}

#[test]
fn invalid_amount_is_a_format_error() {
    let err = echo().run(["--amount", "invalid-amount"]).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::Format { ref name, .. }) if name == "amount"
    ));
}

#[test]
fn single_exclusive_member_is_accepted() {
    let mut command = echo().with_action(|ctx| {
        if ctx.flag::<bool>("lowercase") != Some(true) {
            return Err("lowercase flag is not set or with incorrect value".into());
        }
        Ok(())
    });
    command
        .run(["--amount", "10", "--lowercase", "true"])
        .unwrap();
}

#[test]
fn both_exclusive_members_fail() {
    let err = echo()
        .run(["--amount", "10", "--lowercase", "true", "--uppercase", "true"])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::MutuallyExclusive { .. })
    ));
}

#[test]
fn always_together_members() {
    echo()
        .run(["--separator", "smth", "--separator-amount", "3"])
        .unwrap();

    let err = echo().run(["--separator", "smth"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"flags ["separator", "separator-amount"] have to be passed together"#
    );
}

#[test]
fn unknown_flag_is_a_bind_error() {
    let err = echo().run(["--colour", "red"]).unwrap_err();
    assert!(matches!(err, Error::Bind(BindError::UnknownFlag { long: true, .. })));
}

#[test]
fn action_error_is_wrapped_with_command_name() {
    let err = expect_amount(3).run(["-n", "4"]).unwrap_err();
    assert_eq!(err.to_string(), "command 'echo' failed: amount expected 3, got 4");
    assert!(std::error::Error::source(&err).is_some());
}

fn calc(log: Arc<Mutex<Vec<String>>>) -> Command {
    let operands = || {
        [
            ArgumentDecl::new("x", Kind::INT64).with_description("First operand"),
            ArgumentDecl::new("y", Kind::INT64).with_description("Second operand"),
        ]
    };
    let sum_log = Arc::clone(&log);
    let diff_log = log;

    Command::new("calc")
        .with_description("Do some basic arithmetic operations")
        .with_subcommand(
            Command::new("sum")
                .with_arguments(operands())
                .with_action(move |ctx| {
                    let (x, y) = (ctx.arg::<i64>("x"), ctx.arg::<i64>("y"));
                    let total = x.zip(y).map(|(x, y)| x + y).ok_or("operands missing")?;
                    sum_log.lock().unwrap().push(format!("{} = {total}", ctx.path().join(" ")));
                    Ok(())
                }),
        )
        .with_subcommand(
            Command::new("diff")
                .deprecated(true)
                .with_arguments(operands())
                .with_action(move |ctx| {
                    let x = ctx.arg::<i64>("x").unwrap_or_default();
                    let y = ctx.arg::<i64>("y").unwrap_or_default();
                    diff_log.lock().unwrap().push(format!("diff = {}", x - y));
                    Ok(())
                }),
        )
}

#[test]
fn subcommand_actions_receive_their_arguments() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut command = calc(Arc::clone(&log));

    command.run(["sum", "3", "4"]).unwrap();
    command.run(["diff", "10", "4"]).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["calc sum = 7", "diff = 6"]);
}

#[test]
fn root_without_action_completes() {
    let mut command = calc(Arc::default());
    assert_eq!(command.run(Vec::<String>::new()).unwrap(), Outcome::Completed);
}

#[test]
fn positional_before_flags_is_rejected() {
    let mut command = calc(Arc::default());
    let err = command.run(["sum", "3", "--help"]).unwrap_err();
    assert!(matches!(
        err,
        Error::Syntax(SyntaxError::PositionalBeforeFlags { .. })
    ));
}

#[test]
fn help_short_circuits_validation_and_action() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut command = Command::new("calc")
        .with_arguments([ArgumentDecl::new("x", Kind::INT64)])
        .with_action(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

    let Outcome::Help(text) = command.run(["--help"]).unwrap() else {
        panic!("expected help outcome");
    };
    assert!(text.starts_with("calc x\n"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    command.run(["1"]).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn help_of_selected_subcommand_is_rendered() {
    let mut command = calc(Arc::default());
    let Outcome::Help(text) = command.run(["sum", "-h"]).unwrap() else {
        panic!("expected help outcome");
    };
    assert!(text.starts_with("sum x y\n"));
    assert!(text.contains("    x [int64] - First operand\n"));
}

#[test]
fn custom_checks_run_in_order_after_coercion() {
    let mut command = Command::new("serve").with_flags([FlagDecl::new("port", 'p', Kind::INT32)
        .with_check(|v| match v.get::<i32>() {
            Some(p) if p > 0 => Ok(()),
            _ => Err("port must be positive".to_string()),
        })
        .with_check(|v| match v.get::<i32>() {
            Some(p) if p < 65536 => Ok(()),
            _ => Err("port must be below 65536".to_string()),
        })]);

    assert_eq!(
        command.run(["-p", "0"]).unwrap_err().to_string(),
        "invalid value for 'port': port must be positive"
    );
    assert_eq!(
        command.run(["-p", "70000"]).unwrap_err().to_string(),
        "invalid value for 'port': port must be below 65536"
    );
    command.run(["-p", "8080"]).unwrap();
}

#[test]
fn repeated_runs_do_not_leak_state() {
    let mut command = echo();

    let invocation = command.parse(["--lowercase"]).unwrap();
    assert_eq!(invocation.context().flag::<bool>("lowercase"), Some(true));

    let invocation = command.parse(["--uppercase"]).unwrap();
    let ctx = invocation.context();
    assert_eq!(ctx.flag::<bool>("uppercase"), Some(true));
    assert!(!ctx.is_set("lowercase"));
    assert_eq!(ctx.flag::<bool>("lowercase"), None);
}

#[test]
fn wrong_type_lookup_yields_none() {
    let mut command = echo();
    let invocation = command.parse(["-n", "5"]).unwrap();
    let ctx = invocation.context();
    assert_eq!(ctx.flag::<i64>("amount"), Some(5));
    assert_eq!(ctx.flag::<i32>("amount"), None);
    assert_eq!(ctx.flag::<String>("amount"), None);
    assert_eq!(ctx.flag::<i64>("missing"), None);
}

#[test]
fn cloned_commands_run_on_separate_threads() {
    let template = echo();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let mut command = template.clone();
            std::thread::spawn(move || {
                let amount = i.to_string();
                let invocation = command.parse(["-n", amount.as_str()]).unwrap();
                invocation.context().flag::<i64>("amount")
            })
        })
        .collect();

    let results: Vec<Option<i64>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![Some(0), Some(1), Some(2), Some(3)]);
    assert!(!template.flag("amount").unwrap().is_set());
}
