use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use tasklist_client::app::{Outcome, TodoApp};
use tasklist_client::cli::{Cli, Command};
use tasklist_client::error::ClientError;
use tasklist_client::gateway::gateway_from_config;
use tasklist_client::prompt::TerminalPrompter;
use tasklist_client::render::{render_json, render_list};
use tasklist_core::config::{Config, load_config_with_fallback};
use tasklist_core::error::AppError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn print_list(app: &TodoApp, json: bool) {
    let view = app.view();
    if json {
        println!("{}", render_json(&view));
    } else {
        println!("{}", render_list(&view));
    }
}

fn run_command(app: &mut TodoApp, command: Command) -> Outcome {
    match command {
        Command::Add { text } => app.add(&text),
        Command::Done { id } => app.toggle_complete(id),
        Command::Edit { id, text: None } => app.start_edit(id),
        Command::Edit { id, text: Some(text) } => match app.start_edit(id) {
            Outcome::Changed => app.save_edit(id, &text),
            outcome => outcome,
        },
        Command::Save { id, text } => app.save_edit(id, &text),
        Command::Cancel { id } => app.cancel_edit(id),
        Command::Delete { id } => app.delete(id),
        Command::ClearCompleted => app.remove_completed(),
        Command::ClearAll => app.remove_all(),
        Command::List => Outcome::Unchanged,
        Command::Reload => app.load(),
    }
}

fn build_app(cli: &Cli, base: &Config) -> Result<TodoApp, AppError> {
    let config = cli.effective_config(base)?;
    let gateway = gateway_from_config(&config.client).map_err(|err| match err {
        ClientError::Local(err) => err,
        other => AppError::invalid_input(other.to_string()),
    })?;
    Ok(TodoApp::new(
        gateway,
        Box::new(TerminalPrompter::new(cli.yes)),
    ))
}

fn run_interactive(app: &mut TodoApp, json: bool) -> Result<(), AppError> {
    let mut input = String::new();
    print_list(app, json);

    loop {
        input.clear();
        // The prompter reads confirmations from stdin too, so the lock is
        // only held for this one line.
        let bytes = io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tasklist".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        let Some(command) = cli.command else {
            continue;
        };
        let show_list = matches!(command, Command::List)
            || run_command(app, command) == Outcome::Changed;
        if show_list {
            print_list(app, json || cli.json);
        }
    }

    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    init_tracing();
    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error {
        tracing::warn!(error = %err, "ignoring unreadable config file, using defaults");
    }

    let mut app = match build_app(&cli, &loaded.config) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };
    app.load();

    let Some(command) = cli.command else {
        if let Err(err) = run_interactive(&mut app, cli.json) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    };

    if run_command(&mut app, command) == Outcome::Rejected {
        std::process::exit(1);
    }
    print_list(&app, cli.json);
}
